//! Completed-at timestamp parsing.

use crate::utils::config::{DATETIME_FORMATS, DATE_FORMATS};
use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// Parse a completed-at cell
///
/// Tries RFC 3339 first (normalised to UTC), then the naive date-time layouts,
/// then date-only layouts at midnight.
pub fn parse_completed_at(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.naive_utc());
    }

    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(value, fmt).ok())
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd_hms(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, s)
            .unwrap()
    }

    #[test]
    fn test_date_only() {
        assert_eq!(parse_completed_at("2024-01-04"), Some(ymd_hms(2024, 1, 4, 0, 0, 0)));
        assert_eq!(parse_completed_at("2024/01/04"), Some(ymd_hms(2024, 1, 4, 0, 0, 0)));
        assert_eq!(parse_completed_at("01/04/2024"), Some(ymd_hms(2024, 1, 4, 0, 0, 0)));
    }

    #[test]
    fn test_date_time_layouts() {
        assert_eq!(
            parse_completed_at(" 2024-01-04 13:45:10 "),
            Some(ymd_hms(2024, 1, 4, 13, 45, 10))
        );
        assert_eq!(
            parse_completed_at("2024/01/04 13:45"),
            Some(ymd_hms(2024, 1, 4, 13, 45, 0))
        );
        assert_eq!(
            parse_completed_at("1/4/2024 9:05"),
            Some(ymd_hms(2024, 1, 4, 9, 5, 0))
        );
    }

    #[test]
    fn test_minutes_and_fractional_seconds() {
        assert_eq!(
            parse_completed_at("2024-01-04 13:45"),
            Some(ymd_hms(2024, 1, 4, 13, 45, 0))
        );
        assert_eq!(
            parse_completed_at("2024-01-04 13:45:10.123"),
            NaiveDate::from_ymd_opt(2024, 1, 4)
                .unwrap()
                .and_hms_milli_opt(13, 45, 10, 123)
        );
        assert_eq!(
            parse_completed_at("2024-01-04T13:45:10.5"),
            NaiveDate::from_ymd_opt(2024, 1, 4)
                .unwrap()
                .and_hms_milli_opt(13, 45, 10, 500)
        );
    }

    #[test]
    fn test_rfc3339_normalised_to_utc() {
        assert_eq!(
            parse_completed_at("2024-01-04T08:00:00+08:00"),
            Some(ymd_hms(2024, 1, 4, 0, 0, 0))
        );
    }

    #[test]
    fn test_rejects_garbage() {
        assert_eq!(parse_completed_at(""), None);
        assert_eq!(parse_completed_at("yesterday"), None);
        assert_eq!(parse_completed_at("2024-13-45"), None);
    }
}
