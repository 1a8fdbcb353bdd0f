//! Durable state record.
//!
//! One JSON object holds everything that survives between runs:
//! the enabled and manual-pause flags, both baseline snapshot maps, the
//! journal toggle, and the last-run timestamp. Stored at
//! `~/.config/restday/state.json` by default.
//!
//! Fields this version does not know about are kept in a flattened map and
//! written back unchanged, so a newer or older build rewriting the record
//! never drops the other one's data.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::RecordError;
use crate::paths;
use crate::store::{EntryId, LimitScope};

/// Everything restday persists between runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateRecord {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default)]
    pub manual_pause: bool,
    /// First-observed limits of the shared configuration groups.
    #[serde(default)]
    pub original_limits: BTreeMap<EntryId, u32>,
    /// First-observed limits of the per-collection overrides.
    #[serde(default)]
    pub original_deck_limits: BTreeMap<EntryId, u32>,
    /// Set by the first capture, even when the store had no entries.
    /// Records written before this field existed rely on
    /// [`StateRecord::has_baseline`]'s non-empty-map fallback.
    #[serde(default)]
    pub baseline_captured: bool,
    #[serde(default = "default_true")]
    pub log_actions: bool,
    #[serde(default)]
    pub last_run: Option<DateTime<Utc>>,
    /// Fields written by other versions; preserved on save.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

fn default_true() -> bool {
    true
}

impl Default for StateRecord {
    fn default() -> Self {
        Self {
            enabled: true,
            manual_pause: false,
            original_limits: BTreeMap::new(),
            original_deck_limits: BTreeMap::new(),
            baseline_captured: false,
            log_actions: true,
            last_run: None,
            extra: serde_json::Map::new(),
        }
    }
}

impl StateRecord {
    /// Whether a baseline capture has ever happened.
    pub fn has_baseline(&self) -> bool {
        self.baseline_captured
            || !self.original_limits.is_empty()
            || !self.original_deck_limits.is_empty()
    }

    /// The snapshot map for one scope.
    pub fn baseline_for(&self, scope: LimitScope) -> &BTreeMap<EntryId, u32> {
        match scope {
            LimitScope::Group => &self.original_limits,
            LimitScope::Deck => &self.original_deck_limits,
        }
    }

    pub fn baseline_for_mut(&mut self, scope: LimitScope) -> &mut BTreeMap<EntryId, u32> {
        match scope {
            LimitScope::Group => &mut self.original_limits,
            LimitScope::Deck => &mut self.original_deck_limits,
        }
    }
}

/// Loads and saves the [`StateRecord`] file.
pub struct RecordStore {
    path: PathBuf,
}

impl RecordStore {
    /// Record store at the default location.
    ///
    /// # Errors
    /// Returns an error if the data directory cannot be created.
    pub fn open() -> Result<Self, RecordError> {
        Ok(Self {
            path: paths::state_file()?,
        })
    }

    /// Record store at an explicit location.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load from disk, or the defaults when the file does not exist yet.
    /// Nothing is written until [`RecordStore::save`].
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(&self) -> Result<StateRecord, RecordError> {
        match fs::read_to_string(&self.path) {
            Ok(content) => Ok(serde_json::from_str(&content)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(StateRecord::default()),
            Err(e) => Err(e.into()),
        }
    }

    /// Persist to disk.
    ///
    /// # Errors
    /// Returns an error if the record cannot be serialized or written.
    pub fn save(&self, record: &StateRecord) -> Result<(), RecordError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let content = serde_json::to_string_pretty(record)?;
        fs::write(&self.path, content)?;
        Ok(())
    }
}
