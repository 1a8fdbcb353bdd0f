//! Command implementations and the wiring they share.

pub mod check;
pub mod preview;
pub mod restore;
pub mod status;
pub mod toggle;

use std::path::PathBuf;

use restday_core::{ActionJournal, CheckReport, Controller, JsonFileStore, RecordStore, StatusReport};

/// File locations resolved from the global command-line options, with the
/// defaults under the user data directory.
pub struct Paths {
    pub collection: Option<PathBuf>,
    pub state: Option<PathBuf>,
    pub journal: Option<PathBuf>,
}

impl Paths {
    /// Build the controller over the collection file store.
    pub fn controller(&self) -> Result<Controller<JsonFileStore>, Box<dyn std::error::Error>> {
        let collection = match &self.collection {
            Some(path) => path.clone(),
            None => restday_core::paths::data_dir()?.join("collection.json"),
        };
        let records = match &self.state {
            Some(path) => RecordStore::with_path(path),
            None => RecordStore::open()?,
        };
        let journal = match &self.journal {
            Some(path) => ActionJournal::with_path(path),
            None => ActionJournal::open(),
        };
        Ok(Controller::new(
            JsonFileStore::new(collection),
            records,
            journal,
        ))
    }
}

fn day_kind(rest_day: bool) -> &'static str {
    if rest_day {
        "rest day"
    } else {
        "study day"
    }
}

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "yes"
    } else {
        "no"
    }
}

/// Render a [`CheckReport`] as plain lines, or as pretty JSON.
pub(crate) fn print_report(
    report: &CheckReport,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    if json {
        println!("{}", serde_json::to_string_pretty(report)?);
        return Ok(());
    }

    println!(
        "mode: {} ({}, {})",
        report.mode.label(),
        report.day,
        day_kind(report.rest_day)
    );
    if report.dry_run {
        println!("dry run: nothing was written");
    }
    if report.captured_baseline {
        println!("captured baseline of original limits");
    }
    for change in &report.changes {
        println!(
            "{} '{}': {} -> {}",
            change.scope.label(),
            change.name,
            change.from,
            change.to
        );
    }
    if report.changes.is_empty() {
        println!("no limit changes");
    }
    for name in &report.unbacked {
        println!("no baseline for '{name}'; left untouched");
    }
    for failure in &report.failures {
        println!(
            "failed: {} '{}': {}",
            failure.scope.label(),
            failure.name,
            failure.reason
        );
    }
    if report.buried > 0 {
        println!("buried {} queued new cards", report.buried);
    }
    if report.unburied > 0 {
        println!("unburied {} new cards", report.unburied);
    }
    for warning in &report.warnings {
        println!("warning: {warning}");
    }
    Ok(())
}

/// Render a [`StatusReport`] as plain lines, or as pretty JSON.
pub(crate) fn print_status(
    status: &StatusReport,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    if json {
        println!("{}", serde_json::to_string_pretty(status)?);
        return Ok(());
    }

    println!(
        "mode: {} ({}, {})",
        status.mode.label(),
        status.day,
        day_kind(status.rest_day)
    );
    println!("enabled: {}", yes_no(status.enabled));
    println!("manual pause: {}", yes_no(status.manual_pause));
    println!("baseline captured: {}", yes_no(status.baseline_captured));
    match &status.last_run {
        Some(at) => println!("last run: {}", at.to_rfc3339()),
        None => println!("last run: never"),
    }
    if status.entries.is_empty() {
        println!("no entries");
    } else {
        println!("entries:");
        for entry in &status.entries {
            match entry.baseline {
                Some(baseline) => println!(
                    "  {} '{}': {} (baseline {})",
                    entry.scope.label(),
                    entry.name,
                    entry.current,
                    baseline
                ),
                None => println!(
                    "  {} '{}': {} (no baseline)",
                    entry.scope.label(),
                    entry.name,
                    entry.current
                ),
            }
        }
    }
    Ok(())
}
