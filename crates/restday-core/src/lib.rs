//! # Restday Core Library
//!
//! Core business logic for Restday, the rest-day guard for
//! spaced-repetition collections. On every run it decides whether today is
//! a study day or a rest day and sets each configuration entry's
//! `new_per_day` limit accordingly: zeroed on weekends (or while manually
//! paused), restored from a one-time baseline snapshot on weekdays.
//!
//! ## Architecture
//!
//! - **Calendar**: pure weekday classification, injected clock throughout
//! - **Store**: the [`ConfigStore`] adapter boundary to the host collection
//! - **Snapshot**: one-time baseline capture of the user's own limits
//! - **Mutator**: idempotent limit application with per-entry failure
//!   collection and a single flush per batch
//! - **Controller**: the mode state machine tying it all together
//! - **Record**: the durable JSON state blob, unknown fields preserved
//! - **Journal**: best-effort JSON-lines audit trail
//!
//! ## Key Components
//!
//! - [`Controller`]: evaluate, pause/resume, enable/disable, restore
//! - [`ConfigStore`]: host adapter trait ([`MemoryStore`] for tests,
//!   [`JsonFileStore`] for a collection file)
//! - [`StateRecord`]: everything persisted between runs

pub mod calendar;
pub mod controller;
pub mod error;
pub mod journal;
pub mod mutator;
pub mod paths;
pub mod record;
pub mod snapshot;
pub mod store;

pub use controller::{mode_for, CheckReport, Controller, EntryStatus, Mode, StatusReport};
pub use error::{CoreError, RecordError, Result, StoreError};
pub use journal::ActionJournal;
pub use mutator::{LimitChange, MutationOutcome, WriteFailure};
pub use record::{RecordStore, StateRecord};
pub use store::{ConfigEntry, ConfigStore, EntryId, JsonFileStore, LimitScope, MemoryStore};
