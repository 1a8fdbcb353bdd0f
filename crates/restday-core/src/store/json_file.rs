//! File-backed config store used by the CLI.
//!
//! The collection file is a JSON object with two entry lists:
//!
//! ```json
//! {
//!   "deck_configs":   [{ "id": "1", "name": "Default", "new_per_day": 20 }],
//!   "deck_overrides": [{ "id": "d7", "name": "Kanji",  "new_per_day": 10 }]
//! }
//! ```
//!
//! A missing or unparseable file is the "host not ready" condition and
//! surfaces as [`StoreError::Unavailable`] from the first operation that
//! needs it. Updates accumulate in memory and reach the disk on
//! [`ConfigStore::flush`].

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::{ConfigEntry, ConfigStore, LimitScope};
use crate::error::StoreError;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct CollectionFile {
    #[serde(default)]
    deck_configs: Vec<ConfigEntry>,
    #[serde(default)]
    deck_overrides: Vec<ConfigEntry>,
}

impl CollectionFile {
    fn entries(&self, scope: LimitScope) -> &Vec<ConfigEntry> {
        match scope {
            LimitScope::Group => &self.deck_configs,
            LimitScope::Deck => &self.deck_overrides,
        }
    }

    fn entries_mut(&mut self, scope: LimitScope) -> &mut Vec<ConfigEntry> {
        match scope {
            LimitScope::Group => &mut self.deck_configs,
            LimitScope::Deck => &mut self.deck_overrides,
        }
    }
}

/// Config store backed by a single JSON collection file.
pub struct JsonFileStore {
    path: PathBuf,
    cache: Option<CollectionFile>,
    dirty: bool,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            cache: None,
            dirty: false,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn loaded(&mut self) -> Result<&mut CollectionFile, StoreError> {
        if self.cache.is_none() {
            let raw = fs::read_to_string(&self.path).map_err(|e| {
                StoreError::Unavailable(format!("cannot read {}: {e}", self.path.display()))
            })?;
            let parsed: CollectionFile = serde_json::from_str(&raw).map_err(|e| {
                StoreError::Unavailable(format!("cannot parse {}: {e}", self.path.display()))
            })?;
            self.cache = Some(parsed);
        }
        self.cache
            .as_mut()
            .ok_or_else(|| StoreError::Unavailable("collection not loaded".to_string()))
    }
}

impl ConfigStore for JsonFileStore {
    fn list_entries(&mut self, scope: LimitScope) -> Result<Vec<ConfigEntry>, StoreError> {
        Ok(self.loaded()?.entries(scope).clone())
    }

    fn update_entry(
        &mut self,
        scope: LimitScope,
        id: &str,
        new_per_day: u32,
    ) -> Result<(), StoreError> {
        let file = self.loaded()?;
        let entry = file
            .entries_mut(scope)
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or_else(|| StoreError::UpdateFailed {
                entry: id.to_string(),
                reason: format!("no such {} entry", scope.label()),
            })?;
        if entry.new_per_day != new_per_day {
            entry.new_per_day = new_per_day;
            self.dirty = true;
        }
        Ok(())
    }

    fn flush(&mut self) -> Result<(), StoreError> {
        if !self.dirty {
            return Ok(());
        }
        let file = self.loaded()?;
        let content = serde_json::to_string_pretty(file)
            .map_err(|e| StoreError::FlushFailed(e.to_string()))?;
        fs::write(&self.path, content).map_err(|e| StoreError::FlushFailed(e.to_string()))?;
        self.dirty = false;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collection_json() -> &'static str {
        r#"{
            "deck_configs": [
                { "id": "1", "name": "Default", "new_per_day": 20 },
                { "id": "2", "name": "Intense", "new_per_day": 50 }
            ],
            "deck_overrides": [
                { "id": "d1", "name": "Kanji", "new_per_day": 10 }
            ]
        }"#
    }

    #[test]
    fn missing_file_is_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = JsonFileStore::new(dir.path().join("absent.json"));
        let err = store.list_entries(LimitScope::Group).unwrap_err();
        assert!(matches!(err, StoreError::Unavailable(_)));
    }

    #[test]
    fn corrupt_file_is_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("collection.json");
        fs::write(&path, "{ not json").unwrap();
        let mut store = JsonFileStore::new(&path);
        let err = store.list_entries(LimitScope::Group).unwrap_err();
        assert!(matches!(err, StoreError::Unavailable(_)));
    }

    #[test]
    fn lists_both_scopes_in_file_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("collection.json");
        fs::write(&path, collection_json()).unwrap();
        let mut store = JsonFileStore::new(&path);

        let groups = store.list_entries(LimitScope::Group).unwrap();
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].id, "1");
        assert_eq!(groups[1].new_per_day, 50);

        let decks = store.list_entries(LimitScope::Deck).unwrap();
        assert_eq!(decks.len(), 1);
        assert_eq!(decks[0].name, "Kanji");
    }

    #[test]
    fn update_without_flush_leaves_file_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("collection.json");
        fs::write(&path, collection_json()).unwrap();
        let mut store = JsonFileStore::new(&path);

        store.update_entry(LimitScope::Group, "1", 0).unwrap();

        let mut fresh = JsonFileStore::new(&path);
        let groups = fresh.list_entries(LimitScope::Group).unwrap();
        assert_eq!(groups[0].new_per_day, 20);
    }

    #[test]
    fn flush_persists_updates() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("collection.json");
        fs::write(&path, collection_json()).unwrap();
        let mut store = JsonFileStore::new(&path);

        store.update_entry(LimitScope::Group, "1", 0).unwrap();
        store.update_entry(LimitScope::Deck, "d1", 0).unwrap();
        store.flush().unwrap();

        let mut fresh = JsonFileStore::new(&path);
        assert_eq!(fresh.list_entries(LimitScope::Group).unwrap()[0].new_per_day, 0);
        assert_eq!(fresh.list_entries(LimitScope::Deck).unwrap()[0].new_per_day, 0);
    }

    #[test]
    fn update_unknown_entry_fails_without_poisoning_store() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("collection.json");
        fs::write(&path, collection_json()).unwrap();
        let mut store = JsonFileStore::new(&path);

        let err = store.update_entry(LimitScope::Group, "99", 0).unwrap_err();
        assert!(matches!(err, StoreError::UpdateFailed { .. }));

        store.update_entry(LimitScope::Group, "2", 0).unwrap();
        store.flush().unwrap();
        let mut fresh = JsonFileStore::new(&path);
        assert_eq!(fresh.list_entries(LimitScope::Group).unwrap()[1].new_per_day, 0);
    }

    #[test]
    fn flush_with_no_updates_is_a_no_op() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = JsonFileStore::new(dir.path().join("absent.json"));
        // Nothing dirty, so the missing file is never touched.
        store.flush().unwrap();
    }
}
