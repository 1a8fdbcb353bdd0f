//! Best-effort action journal.
//!
//! One JSON line per mutating action, appended to `actions.log`:
//!
//! ```json
//! {"timestamp":"2025-03-01T09:00:00Z","action":"blocked new cards","day":"Saturday","rest_day":true,"details":{"changed":1}}
//! ```
//!
//! Journal I/O never interrupts a run: every failure is downgraded to a
//! `log::warn!` and the caller proceeds.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::paths;

#[derive(Debug, Serialize)]
struct JournalLine<'a> {
    timestamp: DateTime<Utc>,
    action: &'a str,
    day: &'a str,
    rest_day: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<&'a serde_json::Value>,
}

/// Append-only journal of mutating actions.
pub struct ActionJournal {
    path: Option<PathBuf>,
}

impl ActionJournal {
    /// Journal at the default location. Falls back to a disabled journal
    /// when the data directory cannot be created.
    pub fn open() -> Self {
        match paths::journal_file() {
            Ok(path) => Self::with_path(path),
            Err(e) => {
                log::warn!("action journal unavailable: {e}");
                Self::disabled()
            }
        }
    }

    /// Journal at an explicit location.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
        }
    }

    /// Journal that drops every line.
    pub fn disabled() -> Self {
        Self { path: None }
    }

    pub fn is_enabled(&self) -> bool {
        self.path.is_some()
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Append one line. Failures are logged and swallowed.
    pub fn record(
        &self,
        timestamp: DateTime<Utc>,
        action: &str,
        day: &str,
        rest_day: bool,
        details: Option<&serde_json::Value>,
    ) {
        let Some(path) = &self.path else {
            return;
        };
        let line = JournalLine {
            timestamp,
            action,
            day,
            rest_day,
            details,
        };
        if let Err(e) = append_line(path, &line) {
            log::warn!("action journal write failed: {e}");
        }
    }
}

fn append_line(path: &Path, line: &JournalLine<'_>) -> std::io::Result<()> {
    let json = serde_json::to_string(line)?;
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    writeln!(file, "{json}")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn ts() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).unwrap()
    }

    #[test]
    fn records_one_parseable_line_per_action() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("actions.log");
        let journal = ActionJournal::with_path(&path);

        journal.record(ts(), "blocked new cards", "Saturday", true, None);
        let details = serde_json::json!({ "changed": 2 });
        journal.record(ts(), "restored original limits", "Monday", false, Some(&details));

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 2);

        let first: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first["action"], "blocked new cards");
        assert_eq!(first["day"], "Saturday");
        assert_eq!(first["rest_day"], true);
        assert!(first.get("details").is_none());

        let second: serde_json::Value = serde_json::from_str(lines[1]).unwrap();
        assert_eq!(second["rest_day"], false);
        assert_eq!(second["details"]["changed"], 2);
    }

    #[test]
    fn disabled_journal_writes_nothing() {
        let journal = ActionJournal::disabled();
        assert!(!journal.is_enabled());
        journal.record(ts(), "anything", "Monday", false, None);
    }

    #[test]
    fn write_failure_does_not_panic() {
        let dir = tempfile::tempdir().unwrap();
        // The journal path is a directory, so every append fails.
        let journal = ActionJournal::with_path(dir.path());
        journal.record(ts(), "anything", "Monday", false, None);
    }
}
