use chrono::Local;

use super::Paths;

pub fn run(paths: &Paths, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let mut controller = paths.controller()?;
    let report = controller.restore_original(Local::now())?;
    super::print_report(&report, json)
}

pub fn run_forget(paths: &Paths, yes: bool) -> Result<(), Box<dyn std::error::Error>> {
    if !yes {
        eprintln!("forgetting the baseline loses the recorded original limits; pass --yes to confirm");
        std::process::exit(1);
    }
    let mut controller = paths.controller()?;
    controller.forget_baseline(Local::now())?;
    println!("baseline cleared");
    Ok(())
}
