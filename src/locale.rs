//! English UI strings and time formatting helpers.

use chrono::{NaiveDateTime, Weekday};
use log::warn;
use std::fmt::Write;

pub const TXT_FEELS_LIKE: &str = "Feels Like";
pub const TXT_SUNRISE: &str = "Sunrise";
pub const TXT_SUNSET: &str = "Sunset";
pub const TXT_WIND: &str = "Wind";
pub const TXT_HUMIDITY: &str = "Humidity";
pub const TXT_UV_INDEX: &str = "UV Index";
pub const TXT_PRESSURE: &str = "Pressure";
pub const TXT_AIR_QUALITY: &str = "Air Quality";
pub const TXT_VISIBILITY: &str = "Visibility";
pub const TXT_INDOOR_TEMPERATURE: &str = "Temperature";
pub const TXT_INDOOR_HUMIDITY: &str = "Humidity";

/// Placeholder drawn for unavailable sensor readings.
pub const TXT_UNAVAILABLE: &str = "--";

/// Three-letter weekday label.
pub fn weekday_abbrev(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Mon",
        Weekday::Tue => "Tue",
        Weekday::Wed => "Wed",
        Weekday::Thu => "Thu",
        Weekday::Fri => "Fri",
        Weekday::Sat => "Sat",
        Weekday::Sun => "Sun",
    }
}

/// Format a local time with a strftime pattern.
///
/// A malformed pattern yields an empty string instead of panicking.
pub fn strftime(time: &NaiveDateTime, pattern: &str) -> String {
    let mut out = String::new();
    if write!(out, "{}", time.format(pattern)).is_err() {
        warn!("Invalid time format pattern {:?}", pattern);
        out.clear();
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn sample_time() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 10, 19)
            .unwrap()
            .and_hms_opt(7, 5, 0)
            .unwrap()
    }

    #[test]
    fn test_strftime_patterns() {
        assert_eq!(strftime(&sample_time(), "%H:%M"), "07:05");
        assert_eq!(strftime(&sample_time(), "%a, %d %b"), "Sat, 19 Oct");
    }

    #[test]
    fn test_invalid_pattern_is_empty() {
        assert_eq!(strftime(&sample_time(), "%Q"), "");
    }

    #[test]
    fn test_weekday_labels() {
        assert_eq!(weekday_abbrev(Weekday::Sun), "Sun");
        assert_eq!(weekday_abbrev(Weekday::Sun.succ()), "Mon");
    }
}
