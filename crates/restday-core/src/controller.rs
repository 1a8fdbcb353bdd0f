//! Mode controller: the rest-day state machine.
//!
//! The machine has no stored "current state". Every invocation recomputes
//! the operating mode from the durable record flags and the calendar, then
//! drives the snapshot manager and the limit mutator to make the store
//! match. That makes it safe to run unconditionally on every host startup:
//! a repeat invocation with nothing changed is a no-op.
//!
//! ## Decision order
//!
//! ```text
//! disabled?       -> Disabled        (stamp last_run only)
//! manual pause?   -> ManuallyPaused  (zero both scopes)
//! rest day?       -> WeekendBlocked  (zero both scopes)
//! otherwise       -> Active          (restore baselines)
//! ```
//!
//! The store and the clock are injected: the store as a [`ConfigStore`]
//! value, the clock as a `DateTime<Local>` argument on every operation.

use chrono::{DateTime, Local, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::calendar::{day_name, is_rest_day};
use crate::error::{CoreError, Result, StoreError};
use crate::journal::ActionJournal;
use crate::mutator::{self, LimitChange, LimitPlan, WriteFailure};
use crate::record::{RecordStore, StateRecord};
use crate::snapshot;
use crate::store::{ConfigEntry, ConfigStore, EntryId, LimitScope};

/// Derived operating mode. Recomputed every run, never stored, so the
/// stored flags can never drift apart from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    Active,
    WeekendBlocked,
    ManuallyPaused,
    Disabled,
}

impl Mode {
    /// Short human label for rendering.
    pub fn label(self) -> &'static str {
        match self {
            Mode::Active => "active",
            Mode::WeekendBlocked => "weekend blocked",
            Mode::ManuallyPaused => "manually paused",
            Mode::Disabled => "disabled",
        }
    }
}

/// Pure mode derivation. Manual pause dominates the calendar; the enabled
/// flag dominates everything.
pub fn mode_for(record: &StateRecord, rest_day: bool) -> Mode {
    if !record.enabled {
        Mode::Disabled
    } else if record.manual_pause {
        Mode::ManuallyPaused
    } else if rest_day {
        Mode::WeekendBlocked
    } else {
        Mode::Active
    }
}

/// Outcome of one controller operation, for the presentation layer.
#[derive(Debug, Clone, Serialize)]
pub struct CheckReport {
    pub mode: Mode,
    pub day: &'static str,
    pub rest_day: bool,
    /// True when this run performed the one-time baseline capture.
    pub captured_baseline: bool,
    pub changes: Vec<LimitChange>,
    /// Names of entries with no recorded baseline; never mutated by restore.
    pub unbacked: Vec<String>,
    pub failures: Vec<WriteFailure>,
    /// Cards hidden from (or returned to) the new queue, for hosts that
    /// support burial.
    pub buried: u32,
    pub unburied: u32,
    pub dry_run: bool,
    pub warnings: Vec<String>,
}

impl CheckReport {
    fn bare(mode: Mode, date: NaiveDate, dry_run: bool) -> Self {
        Self {
            mode,
            day: day_name(date),
            rest_day: is_rest_day(date),
            captured_baseline: false,
            changes: Vec::new(),
            unbacked: Vec::new(),
            failures: Vec::new(),
            buried: 0,
            unburied: 0,
            dry_run,
            warnings: Vec::new(),
        }
    }

    /// True when the store was left exactly as found.
    pub fn is_noop(&self) -> bool {
        self.changes.is_empty() && self.buried == 0 && self.unburied == 0
    }
}

/// One entry's current value next to its baseline, for status rendering.
#[derive(Debug, Clone, Serialize)]
pub struct EntryStatus {
    pub scope: LimitScope,
    pub id: EntryId,
    pub name: String,
    pub current: u32,
    pub baseline: Option<u32>,
}

/// Read-only snapshot of flags, mode, and per-entry limits.
#[derive(Debug, Clone, Serialize)]
pub struct StatusReport {
    pub mode: Mode,
    pub day: &'static str,
    pub rest_day: bool,
    pub enabled: bool,
    pub manual_pause: bool,
    pub baseline_captured: bool,
    pub last_run: Option<DateTime<Utc>>,
    pub entries: Vec<EntryStatus>,
}

/// The state machine. Owns the injected store plus the record and journal
/// handles.
///
/// Not safe for concurrent use: two interleaved evaluations could race on
/// the captured-once baseline, so callers serialize invocations. `&mut
/// self` on every operation enforces that per instance.
pub struct Controller<S: ConfigStore> {
    store: S,
    records: RecordStore,
    journal: ActionJournal,
}

impl<S: ConfigStore> Controller<S> {
    pub fn new(store: S, records: RecordStore, journal: ActionJournal) -> Self {
        Self {
            store,
            records,
            journal,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    // ── Operations ───────────────────────────────────────────────────

    /// Evaluate the machine once, as the host startup hook does.
    ///
    /// With `dry_run` set, reports the changes a real pass would make and
    /// touches neither the store, the record file, nor the journal.
    ///
    /// # Errors
    /// [`CoreError::StoreUnavailable`] when the host store cannot be used;
    /// the record file is left as it was.
    pub fn run_check(&mut self, now: DateTime<Local>, dry_run: bool) -> Result<CheckReport> {
        let mut record = self.records.load()?;
        self.evaluate(&mut record, now, dry_run)
    }

    /// Set the manual pause and apply the blocked state immediately.
    ///
    /// While disabled, only the flag is recorded; it takes effect when the
    /// machine is re-enabled.
    pub fn pause(&mut self, now: DateTime<Local>) -> Result<CheckReport> {
        let mut record = self.records.load()?;
        let already = record.manual_pause;
        record.manual_pause = true;

        if !record.enabled {
            self.records.save(&record)?;
            let mut report = CheckReport::bare(Mode::Disabled, now.date_naive(), false);
            report
                .warnings
                .push("disabled; pause recorded but nothing applied".to_string());
            return Ok(report);
        }

        if !already {
            self.journal_line(&record, now, "manual pause set", None);
        }
        let mut report = self.evaluate(&mut record, now, false)?;
        if already {
            report.warnings.push("manual pause was already set".to_string());
        }
        Ok(report)
    }

    /// Clear the manual pause and re-run the full decision.
    ///
    /// Resuming does not restore unconditionally: on a rest day the
    /// calendar immediately re-blocks, so limits only come back when the
    /// day actually allows it.
    pub fn resume(&mut self, now: DateTime<Local>) -> Result<CheckReport> {
        let mut record = self.records.load()?;
        let was_paused = record.manual_pause;
        record.manual_pause = false;

        if !record.enabled {
            self.records.save(&record)?;
            let mut report = CheckReport::bare(Mode::Disabled, now.date_naive(), false);
            report
                .warnings
                .push("disabled; pause cleared but nothing applied".to_string());
            return Ok(report);
        }

        if was_paused {
            self.journal_line(&record, now, "manual pause cleared", None);
        }
        let mut report = self.evaluate(&mut record, now, false)?;
        if !was_paused {
            report.warnings.push("manual pause was not set".to_string());
        }
        Ok(report)
    }

    /// Flip the enabled flag. Enabling immediately re-runs the decision;
    /// disabling freezes the machine.
    pub fn set_enabled(&mut self, now: DateTime<Local>, enabled: bool) -> Result<CheckReport> {
        let mut record = self.records.load()?;
        let changed = record.enabled != enabled;
        record.enabled = enabled;

        if changed {
            let action = if enabled {
                "automation enabled"
            } else {
                "automation disabled"
            };
            self.journal_line(&record, now, action, None);
        }
        let mut report = self.evaluate(&mut record, now, false)?;
        if !changed {
            let state = if enabled { "enabled" } else { "disabled" };
            report.warnings.push(format!("automation was already {state}"));
        }
        Ok(report)
    }

    /// Put every baselined entry back to its original value and reveal any
    /// cards a blocked day buried, whatever today says. The user's explicit
    /// recovery action: it works even while disabled and touches neither
    /// the flags nor `last_run`.
    ///
    /// # Errors
    /// [`CoreError::NoBaselineRecorded`] when capture has never happened;
    /// [`CoreError::StoreUnavailable`] when the store cannot be used.
    pub fn restore_original(&mut self, now: DateTime<Local>) -> Result<CheckReport> {
        let record = self.records.load()?;
        if !record.has_baseline() {
            return Err(CoreError::NoBaselineRecorded);
        }

        let groups = self.list(LimitScope::Group)?;
        let decks = self.list(LimitScope::Deck)?;
        let (plans, unbacked) = restore_plans(&record, &groups, &decks);

        let outcome = mutator::apply_plans(&mut self.store, &plans, false)?;
        let date = now.date_naive();
        let mut report = CheckReport::bare(mode_for(&record, is_rest_day(date)), date, false);
        report.changes = outcome.changes;
        report.failures = outcome.failures;
        report.unbacked = unbacked;
        if let Some(flush_err) = outcome.flush_error {
            report.warnings.push(format!("flush failed: {flush_err}"));
        }

        match self.store.unbury_new_queue() {
            Ok(count) => report.unburied = count,
            Err(StoreError::Unavailable(reason)) => {
                log::warn!("store vanished during queue update: {reason}");
                return Err(CoreError::StoreUnavailable);
            }
            Err(e) => report.warnings.push(format!("queue update failed: {e}")),
        }

        if !report.is_noop() {
            let details = serde_json::json!({
                "changed": report.changes.len(),
                "failed": report.failures.len(),
                "unburied": report.unburied,
            });
            self.journal_line(&record, now, "restored original limits", Some(details));
        }
        Ok(report)
    }

    /// Forget the baseline so the next run recaptures whatever the store
    /// holds then. The escape hatch for deliberately re-seeding.
    pub fn forget_baseline(&mut self, now: DateTime<Local>) -> Result<()> {
        let mut record = self.records.load()?;
        snapshot::clear_baseline(&mut record);
        self.records.save(&record)?;
        self.journal_line(&record, now, "baseline cleared", None);
        Ok(())
    }

    /// Read-only snapshot for status rendering. Nothing is mutated.
    pub fn status(&mut self, now: DateTime<Local>) -> Result<StatusReport> {
        let record = self.records.load()?;
        let date = now.date_naive();
        let rest_day = is_rest_day(date);

        let mut entries = Vec::new();
        for scope in LimitScope::ALL {
            let listed = self.list(scope)?;
            let baseline = record.baseline_for(scope);
            for entry in listed {
                let original = baseline.get(&entry.id).copied();
                entries.push(EntryStatus {
                    scope,
                    id: entry.id,
                    name: entry.name,
                    current: entry.new_per_day,
                    baseline: original,
                });
            }
        }

        Ok(StatusReport {
            mode: mode_for(&record, rest_day),
            day: day_name(date),
            rest_day,
            enabled: record.enabled,
            manual_pause: record.manual_pause,
            baseline_captured: record.has_baseline(),
            last_run: record.last_run,
            entries,
        })
    }

    // ── Evaluation ───────────────────────────────────────────────────

    fn evaluate(
        &mut self,
        record: &mut StateRecord,
        now: DateTime<Local>,
        dry_run: bool,
    ) -> Result<CheckReport> {
        let date = now.date_naive();
        let rest_day = is_rest_day(date);

        if !record.enabled {
            let report = CheckReport::bare(Mode::Disabled, date, dry_run);
            if !dry_run {
                record.last_run = Some(now.with_timezone(&Utc));
                self.records.save(record)?;
            }
            return Ok(report);
        }

        let groups = self.list(LimitScope::Group)?;
        let decks = self.list(LimitScope::Deck)?;

        let captured = snapshot::ensure_baseline(record, &groups, &decks);
        if captured && !dry_run {
            // Make the capture durable before the first write hits the
            // store; a store lost mid-batch must not cost the baseline.
            self.records.save(record)?;
            let details = serde_json::json!({
                "groups": record.original_limits.len(),
                "decks": record.original_deck_limits.len(),
            });
            self.journal_line(record, now, "captured baseline", Some(details));
        }

        let mode = mode_for(record, rest_day);
        let blocked = matches!(mode, Mode::ManuallyPaused | Mode::WeekendBlocked);
        let (plans, unbacked) = if blocked {
            let plans = vec![
                mutator::plan_uniform(LimitScope::Group, &groups, 0),
                mutator::plan_uniform(LimitScope::Deck, &decks, 0),
            ];
            (plans, Vec::new())
        } else {
            restore_plans(record, &groups, &decks)
        };

        let outcome = mutator::apply_plans(&mut self.store, &plans, dry_run)?;

        let mut report = CheckReport::bare(mode, date, dry_run);
        report.captured_baseline = captured;
        report.changes = outcome.changes;
        report.failures = outcome.failures;
        report.unbacked = unbacked;
        if let Some(flush_err) = outcome.flush_error {
            report.warnings.push(format!("flush failed: {flush_err}"));
        }

        if !dry_run {
            match if blocked {
                self.store.bury_new_queue()
            } else {
                self.store.unbury_new_queue()
            } {
                Ok(count) if blocked => report.buried = count,
                Ok(count) => report.unburied = count,
                Err(StoreError::Unavailable(reason)) => {
                    log::warn!("store vanished during queue update: {reason}");
                    return Err(CoreError::StoreUnavailable);
                }
                Err(e) => report.warnings.push(format!("queue update failed: {e}")),
            }
        }

        if !dry_run && !report.is_noop() {
            let action = match mode {
                Mode::ManuallyPaused => "paused new cards",
                Mode::WeekendBlocked => "blocked new cards",
                _ => "restored weekday limits",
            };
            let details = serde_json::json!({
                "changed": report.changes.len(),
                "failed": report.failures.len(),
                "buried": report.buried,
                "unburied": report.unburied,
            });
            self.journal_line(record, now, action, Some(details));
        }

        if !dry_run {
            record.last_run = Some(now.with_timezone(&Utc));
            self.records.save(record)?;
        }

        log::debug!(
            "evaluated {:?}: {} changes, {} failures",
            mode,
            report.changes.len(),
            report.failures.len()
        );
        Ok(report)
    }

    fn list(&mut self, scope: LimitScope) -> Result<Vec<ConfigEntry>> {
        self.store.list_entries(scope).map_err(|e| {
            log::debug!("cannot enumerate {} entries: {e}", scope.label());
            CoreError::StoreUnavailable
        })
    }

    fn journal_line(
        &self,
        record: &StateRecord,
        now: DateTime<Local>,
        action: &str,
        details: Option<serde_json::Value>,
    ) {
        if !record.log_actions {
            return;
        }
        let date = now.date_naive();
        self.journal.record(
            now.with_timezone(&Utc),
            action,
            day_name(date),
            is_rest_day(date),
            details.as_ref(),
        );
    }
}

/// Restore plans for both scopes, with the combined unbacked names.
fn restore_plans(
    record: &StateRecord,
    groups: &[ConfigEntry],
    decks: &[ConfigEntry],
) -> (Vec<LimitPlan>, Vec<String>) {
    let (group_plan, mut unbacked) = mutator::plan_restore(
        LimitScope::Group,
        groups,
        record.baseline_for(LimitScope::Group),
    );
    let (deck_plan, deck_unbacked) =
        mutator::plan_restore(LimitScope::Deck, decks, record.baseline_for(LimitScope::Deck));
    unbacked.extend(deck_unbacked);
    (vec![group_plan, deck_plan], unbacked)
}
