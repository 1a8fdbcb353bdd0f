//! Limit mutation: planning and applying `new_per_day` changes.
//!
//! Planning is pure: a [`LimitPlan`] pairs every entry of one scope with its
//! target value. Applying skips entries already at their target, collects
//! per-entry failures without rolling back, and flushes the store exactly
//! once per batch when anything was written. The split keeps dry-run and
//! the real pass on the same code path.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::error::{CoreError, Result, StoreError};
use crate::store::{ConfigEntry, ConfigStore, EntryId, LimitScope};

/// One intended entry write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedWrite {
    pub entry: ConfigEntry,
    pub target: u32,
}

/// The work list for one scope.
#[derive(Debug, Clone)]
pub struct LimitPlan {
    pub scope: LimitScope,
    pub writes: Vec<PlannedWrite>,
}

/// A performed (or, under dry-run, planned) change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LimitChange {
    pub scope: LimitScope,
    pub id: EntryId,
    pub name: String,
    pub from: u32,
    pub to: u32,
}

/// An entry write that failed while the rest of the batch continued.
#[derive(Debug, Clone, Serialize)]
pub struct WriteFailure {
    pub scope: LimitScope,
    pub id: EntryId,
    pub name: String,
    pub reason: String,
}

/// What applying a batch of plans did.
#[derive(Debug, Clone, Default, Serialize)]
pub struct MutationOutcome {
    pub changes: Vec<LimitChange>,
    pub failures: Vec<WriteFailure>,
    /// Flush failed after individual updates were accepted. Non-fatal.
    pub flush_error: Option<String>,
}

/// Plan to set every entry in `entries` to `target`.
pub fn plan_uniform(scope: LimitScope, entries: &[ConfigEntry], target: u32) -> LimitPlan {
    LimitPlan {
        scope,
        writes: entries
            .iter()
            .map(|entry| PlannedWrite {
                entry: entry.clone(),
                target,
            })
            .collect(),
    }
}

/// Plan to return every entry to its baseline value.
///
/// Entries absent from the baseline are never written; their names come back
/// in the second tuple element so the caller can report them.
pub fn plan_restore(
    scope: LimitScope,
    entries: &[ConfigEntry],
    baseline: &BTreeMap<EntryId, u32>,
) -> (LimitPlan, Vec<String>) {
    let mut writes = Vec::new();
    let mut unbacked = Vec::new();
    for entry in entries {
        match baseline.get(&entry.id) {
            Some(&original) => writes.push(PlannedWrite {
                entry: entry.clone(),
                target: original,
            }),
            None => unbacked.push(entry.name.clone()),
        }
    }
    (LimitPlan { scope, writes }, unbacked)
}

/// Execute a batch of plans against the store.
///
/// Entries already at their target are skipped, which is what makes an
/// immediate repeat run report no changes. When `dry_run` is set nothing is
/// written and the returned changes are the ones a real pass would make.
/// After a batch that wrote anything, `flush` is called exactly once.
///
/// # Errors
/// Only [`CoreError::StoreUnavailable`]; any other store failure is
/// collected into the outcome instead.
pub fn apply_plans<S: ConfigStore + ?Sized>(
    store: &mut S,
    plans: &[LimitPlan],
    dry_run: bool,
) -> Result<MutationOutcome> {
    let mut outcome = MutationOutcome::default();
    let mut wrote = false;

    for plan in plans {
        for write in &plan.writes {
            let entry = &write.entry;
            if entry.new_per_day == write.target {
                continue;
            }
            if !dry_run {
                match store.update_entry(plan.scope, &entry.id, write.target) {
                    Ok(()) => wrote = true,
                    Err(StoreError::Unavailable(reason)) => {
                        log::warn!("store vanished mid-batch: {reason}");
                        return Err(CoreError::StoreUnavailable);
                    }
                    Err(e) => {
                        outcome.failures.push(WriteFailure {
                            scope: plan.scope,
                            id: entry.id.clone(),
                            name: entry.name.clone(),
                            reason: e.to_string(),
                        });
                        continue;
                    }
                }
            }
            outcome.changes.push(LimitChange {
                scope: plan.scope,
                id: entry.id.clone(),
                name: entry.name.clone(),
                from: entry.new_per_day,
                to: write.target,
            });
        }
    }

    if wrote {
        match store.flush() {
            Ok(()) => {}
            Err(StoreError::Unavailable(reason)) => {
                log::warn!("store vanished at flush: {reason}");
                return Err(CoreError::StoreUnavailable);
            }
            Err(e) => outcome.flush_error = Some(e.to_string()),
        }
    }

    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn two_groups() -> Vec<ConfigEntry> {
        vec![
            MemoryStore::entry("1", "Default", 20),
            MemoryStore::entry("2", "Intense", 50),
        ]
    }

    #[test]
    fn zeroing_changes_every_entry_and_flushes_once() {
        let mut store = MemoryStore::new().with_groups(two_groups());
        let entries = store.list_entries(LimitScope::Group).unwrap();
        let plan = plan_uniform(LimitScope::Group, &entries, 0);

        let outcome = apply_plans(&mut store, &[plan], false).unwrap();
        assert_eq!(outcome.changes.len(), 2);
        assert_eq!(outcome.changes[0].from, 20);
        assert_eq!(outcome.changes[0].to, 0);
        assert_eq!(store.value_of(LimitScope::Group, "1"), Some(0));
        assert_eq!(store.value_of(LimitScope::Group, "2"), Some(0));
        assert_eq!(store.flush_calls(), 1);
    }

    #[test]
    fn entries_already_at_target_are_skipped() {
        let mut store = MemoryStore::new().with_groups(two_groups());
        let entries = store.list_entries(LimitScope::Group).unwrap();
        apply_plans(&mut store, &[plan_uniform(LimitScope::Group, &entries, 0)], false).unwrap();

        // Re-plan from the store's current (zeroed) state.
        let entries = store.list_entries(LimitScope::Group).unwrap();
        let outcome =
            apply_plans(&mut store, &[plan_uniform(LimitScope::Group, &entries, 0)], false)
                .unwrap();
        assert!(outcome.changes.is_empty());
        // No writes, so no second flush either.
        assert_eq!(store.flush_calls(), 1);
    }

    #[test]
    fn dry_run_reports_changes_without_writing() {
        let mut store = MemoryStore::new().with_groups(two_groups());
        let entries = store.list_entries(LimitScope::Group).unwrap();
        let plan = plan_uniform(LimitScope::Group, &entries, 0);

        let outcome = apply_plans(&mut store, &[plan], true).unwrap();
        assert_eq!(outcome.changes.len(), 2);
        assert_eq!(store.value_of(LimitScope::Group, "1"), Some(20));
        assert_eq!(store.flush_calls(), 0);
    }

    #[test]
    fn restore_plan_splits_unbacked_entries() {
        let mut baseline = BTreeMap::new();
        baseline.insert("1".to_string(), 20);
        let entries = vec![
            MemoryStore::entry("1", "Default", 0),
            MemoryStore::entry("3", "Added later", 15),
        ];

        let (plan, unbacked) = plan_restore(LimitScope::Group, &entries, &baseline);
        assert_eq!(plan.writes.len(), 1);
        assert_eq!(plan.writes[0].target, 20);
        assert_eq!(unbacked, vec!["Added later".to_string()]);
    }

    #[test]
    fn failing_entry_is_collected_and_batch_continues() {
        let mut store = MemoryStore::new().with_groups(two_groups());
        store.fail_entry("1");
        let entries = store.list_entries(LimitScope::Group).unwrap();

        let outcome =
            apply_plans(&mut store, &[plan_uniform(LimitScope::Group, &entries, 0)], false)
                .unwrap();
        assert_eq!(outcome.failures.len(), 1);
        assert_eq!(outcome.failures[0].id, "1");
        assert_eq!(outcome.changes.len(), 1);
        assert_eq!(outcome.changes[0].id, "2");
        assert_eq!(store.value_of(LimitScope::Group, "1"), Some(20));
        assert_eq!(store.value_of(LimitScope::Group, "2"), Some(0));
        // What succeeded is still flushed.
        assert_eq!(store.flush_calls(), 1);
    }

    #[test]
    fn flush_failure_is_reported_but_not_fatal() {
        let mut store = MemoryStore::new().with_groups(two_groups());
        store.fail_flush();
        let entries = store.list_entries(LimitScope::Group).unwrap();

        let outcome =
            apply_plans(&mut store, &[plan_uniform(LimitScope::Group, &entries, 0)], false)
                .unwrap();
        assert_eq!(outcome.changes.len(), 2);
        assert!(outcome.flush_error.is_some());
        assert_eq!(store.value_of(LimitScope::Group, "1"), Some(0));
    }

    #[test]
    fn unavailable_store_aborts() {
        let mut store = MemoryStore::new().with_groups(two_groups());
        let entries = store.list_entries(LimitScope::Group).unwrap();
        store.set_available(false);

        let result = apply_plans(&mut store, &[plan_uniform(LimitScope::Group, &entries, 0)], false);
        assert!(matches!(result, Err(CoreError::StoreUnavailable)));
    }

    #[test]
    fn one_flush_covers_both_scopes() {
        let mut store = MemoryStore::new()
            .with_groups(two_groups())
            .with_decks(vec![MemoryStore::entry("d1", "Kanji", 10)]);
        let groups = store.list_entries(LimitScope::Group).unwrap();
        let decks = store.list_entries(LimitScope::Deck).unwrap();
        let plans = [
            plan_uniform(LimitScope::Group, &groups, 0),
            plan_uniform(LimitScope::Deck, &decks, 0),
        ];

        let outcome = apply_plans(&mut store, &plans, false).unwrap();
        assert_eq!(outcome.changes.len(), 3);
        assert_eq!(store.flush_calls(), 1);
        assert_eq!(store.value_of(LimitScope::Deck, "d1"), Some(0));
    }
}
