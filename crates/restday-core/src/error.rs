//! Core error types for restday-core.
//!
//! Two layers: [`StoreError`] is what a [`crate::store::ConfigStore`]
//! implementation reports, [`CoreError`] is what controller operations
//! return to the presentation layer. Only `StoreUnavailable` aborts a run;
//! everything else is either collected into the report (per-entry write
//! failures) or swallowed with a warning (journal I/O).

use thiserror::Error;

/// Core error type for restday-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// The host collection store is not ready; the run was aborted with no
    /// state mutated.
    #[error("host collection store is unavailable")]
    StoreUnavailable,

    /// Restore was requested before any baseline was ever captured.
    #[error("no baseline recorded; nothing to restore")]
    NoBaselineRecorded,

    /// State record load/save errors
    #[error("state record error: {0}")]
    Record(#[from] RecordError),
}

/// Errors reported by config store adapters.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The backing store cannot be reached at all (host not ready,
    /// collection file missing or unreadable).
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// A single entry update failed; the batch continues without it.
    #[error("failed to update entry '{entry}': {reason}")]
    UpdateFailed { entry: String, reason: String },

    /// Committing batched writes failed after the updates were accepted.
    #[error("failed to flush pending updates: {0}")]
    FlushFailed(String),
}

/// State record persistence errors.
#[derive(Error, Debug)]
pub enum RecordError {
    /// IO errors while reading or writing the record file
    #[error("state record IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The record file exists but does not parse as the expected JSON
    #[error("state record parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
