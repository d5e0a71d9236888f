//! RFC3339 timestamp parsing with consistent error handling.

use chrono::{DateTime, Utc};

/// Parses an RFC3339 timestamp string into UTC.
///
/// # Examples
///
/// ```
/// use realmlore_domain::common::parse_datetime;
/// use chrono::Datelike;
///
/// let dt = parse_datetime("2026-01-15T10:30:00Z").unwrap();
/// assert_eq!(dt.year(), 2026);
/// ```
pub fn parse_datetime(s: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    DateTime::parse_from_rfc3339(s).map(|dt| dt.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn parses_utc_timestamp() {
        let dt = parse_datetime("2026-01-10T08:15:00Z").unwrap();
        assert_eq!(dt.year(), 2026);
        assert_eq!(dt.day(), 10);
        assert_eq!(dt.minute(), 15);
    }

    #[test]
    fn converts_offsets_to_utc() {
        let dt = parse_datetime("2026-01-10T10:30:00+02:00").unwrap();
        assert_eq!(dt.hour(), 8);
    }

    #[test]
    fn rejects_date_only() {
        assert!(parse_datetime("2026-01-10").is_err());
        assert!(parse_datetime("").is_err());
    }
}
