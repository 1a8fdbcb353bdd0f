use chrono::Local;

use super::Paths;

/// The four flag-flip commands share one code path.
pub enum Toggle {
    Pause,
    Resume,
    Enable,
    Disable,
}

pub fn run(paths: &Paths, toggle: Toggle, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let mut controller = paths.controller()?;
    let now = Local::now();
    let report = match toggle {
        Toggle::Pause => controller.pause(now)?,
        Toggle::Resume => controller.resume(now)?,
        Toggle::Enable => controller.set_enabled(now, true)?,
        Toggle::Disable => controller.set_enabled(now, false)?,
    };
    super::print_report(&report, json)
}
