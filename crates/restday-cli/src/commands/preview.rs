use chrono::Local;
use restday_core::calendar;

pub fn run(days: u32) -> Result<(), Box<dyn std::error::Error>> {
    let today = Local::now().date_naive();
    for day in calendar::outlook(today, days) {
        let kind = if day.rest_day { "rest" } else { "study" };
        println!("{} {:<9} {}", day.date, day.day, kind);
    }
    Ok(())
}
