use crate::error::{ProcessingError, Result};
use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// Formats accepted for naive timestamps, tried in order
const NAIVE_FORMATS: [&str; 6] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

/// Parse an ISO-8601 style timestamp.
///
/// Offset-qualified values (RFC 3339) are converted to UTC and returned
/// without their offset. A bare date is taken as midnight.
pub fn parse_timestamp(value: &str) -> Result<NaiveDateTime> {
    let trimmed = value.trim();

    for format in NAIVE_FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Ok(parsed);
        }
    }

    if let Ok(parsed) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(parsed.naive_utc());
    }

    if let Some(parsed) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
    {
        return Ok(parsed);
    }

    Err(ProcessingError::InvalidTimestamp {
        value: value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn test_parse_common_formats() {
        let expected = NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(14, 0, 0)
            .unwrap();

        assert_eq!(parse_timestamp("2024-01-01 14:00:00").unwrap(), expected);
        assert_eq!(parse_timestamp("2024-01-01T14:00:00").unwrap(), expected);
        assert_eq!(parse_timestamp("2024-01-01 14:00").unwrap(), expected);
        assert_eq!(parse_timestamp("2024-01-01T14:00:00.000").unwrap(), expected);
        assert_eq!(parse_timestamp(" 2024-01-01 14:00:00 ").unwrap(), expected);
    }

    #[test]
    fn test_parse_offset_converts_to_utc() {
        let parsed = parse_timestamp("2024-01-01T15:00:00+01:00").unwrap();
        assert_eq!(parsed.hour(), 14);
    }

    #[test]
    fn test_parse_date_only() {
        let parsed = parse_timestamp("2024-03-05").unwrap();
        assert_eq!(parsed.day(), 5);
        assert_eq!(parsed.hour(), 0);
    }

    #[test]
    fn test_parse_invalid() {
        let err = parse_timestamp("yesterday").unwrap_err();
        assert!(matches!(err, ProcessingError::InvalidTimestamp { .. }));
    }
}
