//! Local time source

use chrono::{Local, NaiveDateTime};
use g1hud_core::sources::WallClock;

/// Minutes since the Unix epoch of a local date-time
pub fn local_minutes(datetime: NaiveDateTime) -> i64 {
    datetime.and_utc().timestamp().div_euclid(60)
}

/// Current local time
pub fn local_wall_clock() -> WallClock {
    WallClock::from_local_minutes(local_minutes(Local::now().naive_local()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, NaiveDate, Timelike};
    use g1hud_core::sources::Weekday;

    #[test]
    fn test_matches_chrono_fields() {
        // 2026-10-16 was a Friday
        let datetime = NaiveDate::from_ymd_opt(2026, 10, 16)
            .unwrap()
            .and_hms_opt(21, 47, 30)
            .unwrap();
        let clock = WallClock::from_local_minutes(local_minutes(datetime));
        assert_eq!(clock.hour as u32, datetime.hour());
        assert_eq!(clock.minute as u32, datetime.minute());
        assert_eq!(
            clock.weekday,
            Weekday::from_sunday_index(datetime.weekday().num_days_from_sunday() as u8)
        );
        assert_eq!(clock.weekday, Weekday::Fri);
    }

    #[test]
    fn test_now_is_in_range() {
        let clock = local_wall_clock();
        assert!(clock.hour < 24);
        assert!(clock.minute < 60);
    }
}
