use chrono::Local;

use super::Paths;

pub fn run(paths: &Paths, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let mut controller = paths.controller()?;
    let status = controller.status(Local::now())?;
    super::print_status(&status, json)
}
