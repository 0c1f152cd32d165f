use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::timesheet::device::Device;

/// Naive timestamp layouts accepted besides RFC 3339. Naive values are read as UTC.
const NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
];

/// One row of the raw timesheet export.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawEntry {
    pub user_id: String,
    pub organization_id: String,
    #[serde(default)]
    pub time_in: Option<String>,
    #[serde(default)]
    pub time_out: Option<String>,
    #[serde(default)]
    pub device: Option<String>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub amount: Option<f64>,
}

/// One row of the cleaned output, in output column order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CleanEntry {
    pub user_id: String,
    pub organization_id: String,
    /// Calendar date of the clock-in.
    pub date: NaiveDate,
    pub duration_minutes: f64,
    pub device: Device,
    pub amount_usd: f64,
}

/// Parse an RFC 3339 or `YYYY-MM-DD HH:MM[:SS]` timestamp.
pub fn parse_timestamp(value: &str) -> Option<DateTime<FixedOffset>> {
    let value = value.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Some(parsed);
    }

    NAIVE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .map(|naive| naive.and_utc().fixed_offset())
}

/// A present, non-blank cell.
pub(crate) fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use chrono::{Datelike, Timelike};

    use super::*;

    #[test]
    fn test_parse_naive_formats() {
        let ts = parse_timestamp("2024-01-15 09:30:15").unwrap();
        assert_eq!((ts.hour(), ts.minute(), ts.second()), (9, 30, 15));

        let ts = parse_timestamp("2024-01-15 09:30").unwrap();
        assert_eq!((ts.hour(), ts.minute()), (9, 30));

        assert!(parse_timestamp("2024-01-15T09:30:00").is_some());
    }

    #[test]
    fn test_parse_rfc3339_keeps_offset() {
        let ts = parse_timestamp("2024-01-15T23:30:00+08:00").unwrap();
        assert_eq!(ts.day(), 15);
        assert_eq!(ts.offset().local_minus_utc(), 8 * 3600);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(parse_timestamp("yesterday").is_none());
        assert!(parse_timestamp("2024-13-01 10:00").is_none());
        assert!(parse_timestamp("").is_none());
    }

    #[test]
    fn test_non_blank() {
        assert_eq!(non_blank(&Some("  x ".to_string())), Some("x"));
        assert_eq!(non_blank(&Some("   ".to_string())), None);
        assert_eq!(non_blank(&None), None);
    }
}
