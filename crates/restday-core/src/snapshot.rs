//! One-time baseline capture.
//!
//! The baseline remembers the user's own limit values from before this tool
//! ever wrote anything. It is captured exactly once, before the first
//! mutation, and afterwards only [`clear_baseline`] (the explicit
//! forget-baseline action) can empty it for a deliberate recapture.

use crate::record::StateRecord;
use crate::store::{ConfigEntry, LimitScope};

/// Capture the baseline if it has never been captured.
///
/// Returns true when this call performed the capture, so the caller can
/// journal it. A record with a baseline already present is left untouched,
/// whatever the entries currently read. An empty store still counts as
/// captured, tracked by the record's explicit flag.
pub fn ensure_baseline(
    record: &mut StateRecord,
    groups: &[ConfigEntry],
    decks: &[ConfigEntry],
) -> bool {
    if record.has_baseline() {
        return false;
    }
    capture_scope(record, LimitScope::Group, groups);
    capture_scope(record, LimitScope::Deck, decks);
    record.baseline_captured = true;
    true
}

fn capture_scope(record: &mut StateRecord, scope: LimitScope, entries: &[ConfigEntry]) {
    let map = record.baseline_for_mut(scope);
    for entry in entries {
        map.insert(entry.id.clone(), entry.new_per_day);
    }
}

/// Forget the baseline entirely. The next [`ensure_baseline`] call captures
/// whatever the store holds at that moment.
pub fn clear_baseline(record: &mut StateRecord) {
    record.original_limits.clear();
    record.original_deck_limits.clear();
    record.baseline_captured = false;
}
