use chrono::Local;

use super::Paths;

pub fn run(paths: &Paths, dry_run: bool, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let mut controller = paths.controller()?;
    let report = controller.run_check(Local::now(), dry_run)?;
    super::print_report(&report, json)
}
