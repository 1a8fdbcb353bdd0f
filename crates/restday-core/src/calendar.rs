//! Calendar oracle: weekday classification for the blocking decision.
//!
//! Pure functions over [`NaiveDate`]; nothing here reads the system clock.
//! Callers resolve "now" themselves and pass the date in, which keeps every
//! weekday reachable from tests.

use chrono::{Datelike, Days, NaiveDate, Weekday};
use serde::Serialize;

/// Longest span [`outlook`] will classify; larger requests are truncated.
pub const MAX_OUTLOOK_DAYS: u32 = 366;

/// True iff `date` falls on Saturday or Sunday.
pub fn is_rest_day(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// English weekday label for `date`, for display and journaling.
pub fn day_name(date: NaiveDate) -> &'static str {
    match date.weekday() {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

/// One day in the rest/study outlook produced by [`outlook`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DayOutlook {
    pub date: NaiveDate,
    pub day: &'static str,
    pub rest_day: bool,
}

/// Classifies the next `days` days starting at `from`.
///
/// Spans are truncated to [`MAX_OUTLOOK_DAYS`] entries, and stop early if
/// they would run off the end of the representable calendar.
pub fn outlook(from: NaiveDate, days: u32) -> Vec<DayOutlook> {
    (0..days.min(MAX_OUTLOOK_DAYS))
        .map_while(|offset| from.checked_add_days(Days::new(u64::from(offset))))
        .map(|date| DayOutlook {
            date,
            day: day_name(date),
            rest_day: is_rest_day(date),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use proptest::prelude::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_monday_through_friday_are_study_days() {
        // 2025-03-03 is a Monday.
        assert!(!is_rest_day(date(2025, 3, 3)));
        assert!(!is_rest_day(date(2025, 3, 4)));
        assert!(!is_rest_day(date(2025, 3, 5)));
        assert!(!is_rest_day(date(2025, 3, 6)));
        assert!(!is_rest_day(date(2025, 3, 7)));
    }

    #[test]
    fn test_saturday_and_sunday_are_rest_days() {
        assert!(is_rest_day(date(2025, 3, 8)));
        assert!(is_rest_day(date(2025, 3, 9)));
    }

    #[test]
    fn test_day_names_cover_the_week() {
        let expected = [
            "Monday",
            "Tuesday",
            "Wednesday",
            "Thursday",
            "Friday",
            "Saturday",
            "Sunday",
        ];
        for (offset, name) in expected.iter().enumerate() {
            let d = date(2025, 3, 3) + Duration::days(offset as i64);
            assert_eq!(day_name(d), *name);
        }
    }

    #[test]
    fn test_outlook_spans_requested_days() {
        let days = outlook(date(2025, 3, 3), 7);
        assert_eq!(days.len(), 7);
        assert_eq!(days[0].day, "Monday");
        assert!(!days[0].rest_day);
        assert!(days[5].rest_day);
        assert!(days[6].rest_day);
        assert_eq!(days[6].date, date(2025, 3, 9));
    }

    #[test]
    fn test_outlook_zero_days_is_empty() {
        assert!(outlook(date(2025, 3, 3), 0).is_empty());
    }

    #[test]
    fn test_outlook_caps_oversized_spans() {
        let days = outlook(date(2025, 3, 3), u32::MAX);
        assert_eq!(days.len(), MAX_OUTLOOK_DAYS as usize);
    }

    #[test]
    fn test_outlook_stops_at_the_calendar_end() {
        let start = NaiveDate::MAX - Duration::days(3);
        let days = outlook(start, 10);
        assert_eq!(days.len(), 4);
        assert_eq!(days[3].date, NaiveDate::MAX);
    }

    proptest! {
        #[test]
        fn prop_rest_day_matches_weekday_index(offset in 0i64..20_000) {
            let d = date(1970, 1, 1) + Duration::days(offset);
            let from_monday = d.weekday().num_days_from_monday();
            prop_assert_eq!(is_rest_day(d), from_monday >= 5);
        }

        #[test]
        fn prop_exactly_two_rest_days_per_week(offset in 0i64..20_000) {
            let start = date(1970, 1, 1) + Duration::days(offset);
            let rest = outlook(start, 7).iter().filter(|o| o.rest_day).count();
            prop_assert_eq!(rest, 2);
        }
    }
}
