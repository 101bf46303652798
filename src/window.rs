use chrono::{DateTime, SecondsFormat, Timelike, Utc};
use chrono_tz::America::New_York;

use crate::model::ViewingWindow;

const AFTERNOON_START_HOUR: u32 = 15;
const PRIME_START_HOUR: u32 = 19;
const LATE_START_HOUR: u32 = 22;

/// Buckets a kickoff by its Eastern civil hour. DST is resolved through the
/// tz database, so a 23:30Z kickoff is Prime in September and Afternoon
/// in December.
pub fn classify_window(kickoff: DateTime<Utc>) -> ViewingWindow {
    window_for_hour(kickoff.with_timezone(&New_York).hour())
}

pub fn window_for_hour(hour: u32) -> ViewingWindow {
    if hour < AFTERNOON_START_HOUR {
        ViewingWindow::Noon
    } else if hour < PRIME_START_HOUR {
        ViewingWindow::Afternoon
    } else if hour < LATE_START_HOUR {
        ViewingWindow::Prime
    } else {
        ViewingWindow::Late
    }
}

/// `7:30 PM` style kickoff in Eastern time.
pub fn format_kickoff_time(kickoff: DateTime<Utc>) -> String {
    kickoff
        .with_timezone(&New_York)
        .format("%-I:%M %p")
        .to_string()
}

/// `Sat, Sep 6` style calendar date in Eastern time.
pub fn format_kickoff_date(kickoff: DateTime<Utc>) -> String {
    kickoff
        .with_timezone(&New_York)
        .format("%a, %b %-d")
        .to_string()
}

pub fn format_iso(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn hour_boundaries_are_closed_open() {
        assert_eq!(window_for_hour(0), ViewingWindow::Noon);
        assert_eq!(window_for_hour(14), ViewingWindow::Noon);
        assert_eq!(window_for_hour(15), ViewingWindow::Afternoon);
        assert_eq!(window_for_hour(18), ViewingWindow::Afternoon);
        assert_eq!(window_for_hour(19), ViewingWindow::Prime);
        assert_eq!(window_for_hour(21), ViewingWindow::Prime);
        assert_eq!(window_for_hour(22), ViewingWindow::Late);
        assert_eq!(window_for_hour(23), ViewingWindow::Late);
    }

    #[test]
    fn every_hour_maps_to_a_window() {
        for hour in 0..24 {
            assert!(ViewingWindow::ALL.contains(&window_for_hour(hour)));
        }
    }

    #[test]
    fn daylight_saving_shifts_the_bucket() {
        // 23:30Z is 19:30 EDT in September but 18:30 EST in November.
        let september = Utc.with_ymd_and_hms(2025, 9, 6, 23, 30, 0).unwrap();
        let november = Utc.with_ymd_and_hms(2025, 11, 22, 23, 30, 0).unwrap();
        assert_eq!(classify_window(september), ViewingWindow::Prime);
        assert_eq!(classify_window(november), ViewingWindow::Afternoon);
    }

    #[test]
    fn late_window_from_utc_past_midnight() {
        // 02:30Z Sunday is 22:30 EDT Saturday.
        let kickoff = Utc.with_ymd_and_hms(2025, 9, 7, 2, 30, 0).unwrap();
        assert_eq!(classify_window(kickoff), ViewingWindow::Late);
        assert_eq!(format_kickoff_date(kickoff), "Sat, Sep 6");
    }

    #[test]
    fn formats_eastern_display_strings() {
        let kickoff = Utc.with_ymd_and_hms(2025, 9, 6, 23, 30, 0).unwrap();
        assert_eq!(format_kickoff_time(kickoff), "7:30 PM");
        assert_eq!(format_kickoff_date(kickoff), "Sat, Sep 6");
        assert_eq!(format_iso(kickoff), "2025-09-06T23:30:00.000Z");

        let noon = Utc.with_ymd_and_hms(2025, 9, 6, 16, 0, 0).unwrap();
        assert_eq!(format_kickoff_time(noon), "12:00 PM");
    }
}
