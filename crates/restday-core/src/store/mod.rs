//! Config store adapter boundary.
//!
//! The host application owns the configuration entries; the core only ever
//! reads and rewrites the `new_per_day` field through [`ConfigStore`]. Two
//! implementations ship with the crate: [`JsonFileStore`] backs the CLI with
//! a collection file, [`MemoryStore`] backs tests and serves as the
//! reference for host adapters.

mod json_file;
mod memory;

pub use json_file::JsonFileStore;
pub use memory::MemoryStore;

use serde::{Deserialize, Serialize};

use crate::error::StoreError;

/// Stable entry identifier assigned by the host store.
pub type EntryId = String;

/// Which family of limits a pass operates on.
///
/// Shared configuration groups are the source of truth; per-collection deck
/// overrides are a second, symmetric family flowing through the same
/// snapshot and mutation contracts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LimitScope {
    Group,
    Deck,
}

impl LimitScope {
    pub const ALL: [LimitScope; 2] = [LimitScope::Group, LimitScope::Deck];

    /// Short label for reports and journal lines.
    pub fn label(self) -> &'static str {
        match self {
            LimitScope::Group => "group",
            LimitScope::Deck => "deck",
        }
    }
}

/// A named bundle of scheduling limits owned by the host store.
///
/// The core never creates or deletes entries; `new_per_day` is the only
/// field it writes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigEntry {
    pub id: EntryId,
    pub name: String,
    pub new_per_day: u32,
}

/// Host collection adapter. Every external store implements this trait.
///
/// Enumeration order is the store's own and is preserved in change reports.
/// Updates may be batched internally; [`ConfigStore::flush`] commits
/// whatever the batch accepted, even if individual updates failed.
pub trait ConfigStore {
    /// All entries in `scope`, in the store's enumeration order.
    fn list_entries(&mut self, scope: LimitScope) -> Result<Vec<ConfigEntry>, StoreError>;

    /// Rewrite the `new_per_day` field of one entry.
    fn update_entry(
        &mut self,
        scope: LimitScope,
        id: &str,
        new_per_day: u32,
    ) -> Result<(), StoreError>;

    /// Commit batched writes.
    fn flush(&mut self) -> Result<(), StoreError>;

    /// Hide already-queued new cards until unburied. Returns how many cards
    /// were affected.
    fn bury_new_queue(&mut self) -> Result<u32, StoreError> {
        Ok(0) // default no-op
    }

    /// Reveal cards hidden by [`ConfigStore::bury_new_queue`].
    fn unbury_new_queue(&mut self) -> Result<u32, StoreError> {
        Ok(0) // default no-op
    }
}
