//! Publication timestamp parsing

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

const OFFSET_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f%:z",
    "%Y-%m-%d %H:%M:%S%.f%:z",
    "%Y-%m-%dT%H:%M%:z",
    "%Y-%m-%d %H:%M%:z",
];

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Parse an RFC 2822 or ISO 8601 timestamp into UTC
///
/// A trailing `Z` means UTC and timestamps without an offset are taken as
/// UTC. Returns `None` for anything else; callers decide whether an undated
/// record is dropped or kept.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }

    let iso = match s.strip_suffix('Z').or_else(|| s.strip_suffix('z')) {
        Some(body) => format!("{}+00:00", body),
        None => s.to_string(),
    };

    for format in OFFSET_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(&iso, format) {
            return Some(dt.with_timezone(&Utc));
        }
    }
    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
            return Some(naive.and_utc());
        }
    }

    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, TimeZone, Timelike};

    #[test]
    fn test_rfc2822() {
        let dt = parse_timestamp("Mon, 01 Jan 2024 12:00:00 +0000").unwrap();
        assert_eq!(dt, Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap());
    }

    #[test]
    fn test_rfc2822_with_offset_is_normalized() {
        let dt = parse_timestamp("Mon, 01 Jan 2024 20:00:00 +0800").unwrap();
        assert_eq!(dt.hour(), 12);
    }

    #[test]
    fn test_iso8601_zulu() {
        let dt = parse_timestamp("2024-01-01T12:00:00Z").unwrap();
        assert_eq!(dt.year(), 2024);
        assert_eq!(dt.hour(), 12);
    }

    #[test]
    fn test_iso8601_with_offset() {
        let dt = parse_timestamp("2024-01-01T12:00:00+08:00").unwrap();
        assert_eq!(dt, Utc.with_ymd_and_hms(2024, 1, 1, 4, 0, 0).unwrap());
    }

    #[test]
    fn test_iso8601_space_separator_and_fraction() {
        let dt = parse_timestamp("2024-01-01 12:00:00.250Z").unwrap();
        assert_eq!(dt.minute(), 0);
        assert_eq!(dt.nanosecond(), 250_000_000);
    }

    #[test]
    fn test_naive_is_utc() {
        let dt = parse_timestamp("2024-01-01T12:00:00").unwrap();
        assert_eq!(dt, Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap());
        let date_only = parse_timestamp("2024-01-01").unwrap();
        assert_eq!(date_only, Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_empty_and_invalid() {
        assert!(parse_timestamp("").is_none());
        assert!(parse_timestamp("   ").is_none());
        assert!(parse_timestamp("invalid date").is_none());
        assert!(parse_timestamp("2024-13-45T99:00:00Z").is_none());
    }
}
