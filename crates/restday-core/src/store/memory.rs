//! In-memory config store.
//!
//! The test double for the whole suite and the reference point for host
//! adapter authors. Supports failure injection: the store can be taken
//! offline as a whole or partway through a batch, or individual entries
//! can be made to fail their updates while the rest of the batch
//! proceeds. Also models a small new card queue so the bury/unbury
//! capability is exercisable.

use std::collections::HashSet;

use super::{ConfigEntry, ConfigStore, LimitScope};
use crate::error::StoreError;

/// In-memory [`ConfigStore`] implementation.
#[derive(Debug)]
pub struct MemoryStore {
    groups: Vec<ConfigEntry>,
    decks: Vec<ConfigEntry>,
    available: bool,
    failing: HashSet<String>,
    fail_after: Option<usize>,
    updates_done: usize,
    fail_flush: bool,
    flush_calls: usize,
    queued_new: u32,
    buried: u32,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            groups: Vec::new(),
            decks: Vec::new(),
            available: true,
            failing: HashSet::new(),
            fail_after: None,
            updates_done: 0,
            fail_flush: false,
            flush_calls: 0,
            queued_new: 0,
            buried: 0,
        }
    }

    /// Convenience constructor for one entry.
    pub fn entry(id: &str, name: &str, new_per_day: u32) -> ConfigEntry {
        ConfigEntry {
            id: id.to_string(),
            name: name.to_string(),
            new_per_day,
        }
    }

    pub fn with_groups(mut self, groups: Vec<ConfigEntry>) -> Self {
        self.groups = groups;
        self
    }

    pub fn with_decks(mut self, decks: Vec<ConfigEntry>) -> Self {
        self.decks = decks;
        self
    }

    /// Seed the new card queue for bury/unbury tests.
    pub fn with_queued_new(mut self, count: u32) -> Self {
        self.queued_new = count;
        self
    }

    /// Take the whole store offline (or back online).
    pub fn set_available(&mut self, available: bool) {
        self.available = available;
    }

    /// Make updates to `id` fail while the rest of the batch proceeds.
    pub fn fail_entry(&mut self, id: &str) {
        self.failing.insert(id.to_string());
    }

    /// Take the store offline after `n` more successful updates, as a host
    /// that dies mid-batch would.
    pub fn unavailable_after_updates(&mut self, n: usize) {
        self.fail_after = Some(n);
    }

    /// Make `flush` fail without taking the store offline.
    pub fn fail_flush(&mut self) {
        self.fail_flush = true;
    }

    /// Add an entry, as the host does when the user creates one.
    pub fn insert_entry(&mut self, scope: LimitScope, entry: ConfigEntry) {
        match scope {
            LimitScope::Group => self.groups.push(entry),
            LimitScope::Deck => self.decks.push(entry),
        }
    }

    /// How many times `flush` has been called.
    pub fn flush_calls(&self) -> usize {
        self.flush_calls
    }

    /// Current `new_per_day` of one entry, for assertions.
    pub fn value_of(&self, scope: LimitScope, id: &str) -> Option<u32> {
        let entries = match scope {
            LimitScope::Group => &self.groups,
            LimitScope::Deck => &self.decks,
        };
        entries.iter().find(|e| e.id == id).map(|e| e.new_per_day)
    }

    /// How many cards are currently buried.
    pub fn buried(&self) -> u32 {
        self.buried
    }

    fn check_available(&self) -> Result<(), StoreError> {
        if self.available {
            Ok(())
        } else {
            Err(StoreError::Unavailable("memory store offline".to_string()))
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigStore for MemoryStore {
    fn list_entries(&mut self, scope: LimitScope) -> Result<Vec<ConfigEntry>, StoreError> {
        self.check_available()?;
        let entries = match scope {
            LimitScope::Group => &self.groups,
            LimitScope::Deck => &self.decks,
        };
        Ok(entries.clone())
    }

    fn update_entry(
        &mut self,
        scope: LimitScope,
        id: &str,
        new_per_day: u32,
    ) -> Result<(), StoreError> {
        self.check_available()?;
        if let Some(n) = self.fail_after {
            if self.updates_done >= n {
                return Err(StoreError::Unavailable(
                    "memory store lost mid-batch".to_string(),
                ));
            }
        }
        if self.failing.contains(id) {
            return Err(StoreError::UpdateFailed {
                entry: id.to_string(),
                reason: "injected update failure".to_string(),
            });
        }
        let entries = match scope {
            LimitScope::Group => &mut self.groups,
            LimitScope::Deck => &mut self.decks,
        };
        let entry = entries
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or_else(|| StoreError::UpdateFailed {
                entry: id.to_string(),
                reason: format!("no such {} entry", scope.label()),
            })?;
        entry.new_per_day = new_per_day;
        self.updates_done += 1;
        Ok(())
    }

    fn flush(&mut self) -> Result<(), StoreError> {
        self.check_available()?;
        self.flush_calls += 1;
        if self.fail_flush {
            return Err(StoreError::FlushFailed("injected flush failure".to_string()));
        }
        Ok(())
    }

    fn bury_new_queue(&mut self) -> Result<u32, StoreError> {
        self.check_available()?;
        let moved = self.queued_new;
        self.buried += moved;
        self.queued_new = 0;
        Ok(moved)
    }

    fn unbury_new_queue(&mut self) -> Result<u32, StoreError> {
        self.check_available()?;
        let moved = self.buried;
        self.queued_new += moved;
        self.buried = 0;
        Ok(moved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offline_store_reports_unavailable() {
        let mut store = MemoryStore::new();
        store.set_available(false);
        assert!(matches!(
            store.list_entries(LimitScope::Group),
            Err(StoreError::Unavailable(_))
        ));
        assert!(matches!(store.flush(), Err(StoreError::Unavailable(_))));
    }

    #[test]
    fn injected_entry_failure_is_scoped_to_that_entry() {
        let mut store = MemoryStore::new().with_groups(vec![
            MemoryStore::entry("1", "Default", 20),
            MemoryStore::entry("2", "Intense", 50),
        ]);
        store.fail_entry("1");

        assert!(store.update_entry(LimitScope::Group, "1", 0).is_err());
        store.update_entry(LimitScope::Group, "2", 0).unwrap();
        assert_eq!(store.value_of(LimitScope::Group, "1"), Some(20));
        assert_eq!(store.value_of(LimitScope::Group, "2"), Some(0));
    }

    #[test]
    fn store_can_vanish_after_some_updates() {
        let mut store = MemoryStore::new().with_groups(vec![
            MemoryStore::entry("1", "Default", 20),
            MemoryStore::entry("2", "Intense", 50),
        ]);
        store.unavailable_after_updates(1);

        store.update_entry(LimitScope::Group, "1", 0).unwrap();
        assert!(matches!(
            store.update_entry(LimitScope::Group, "2", 0),
            Err(StoreError::Unavailable(_))
        ));
        assert_eq!(store.value_of(LimitScope::Group, "1"), Some(0));
        assert_eq!(store.value_of(LimitScope::Group, "2"), Some(50));
    }

    #[test]
    fn bury_then_unbury_restores_the_queue() {
        let mut store = MemoryStore::new().with_queued_new(7);
        assert_eq!(store.bury_new_queue().unwrap(), 7);
        assert_eq!(store.buried(), 7);
        // Burying again moves nothing.
        assert_eq!(store.bury_new_queue().unwrap(), 0);
        assert_eq!(store.unbury_new_queue().unwrap(), 7);
        assert_eq!(store.buried(), 0);
    }
}
