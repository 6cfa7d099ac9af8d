use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

// ── TimestampParser ───────────────────────────────────────────────────────────

/// Parses the timestamp text forms found in exported order datasets.
pub struct TimestampParser;

impl TimestampParser {
    /// Naive date-time patterns tried in order after RFC 3339.
    const FORMATS: &'static [&'static str] = &[
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M",
        "%Y-%m-%dT%H:%M",
    ];

    /// Parse `s` into a naive timestamp.
    ///
    /// Accepts:
    /// * `YYYY-MM-DD HH:MM:SS[.f]` and the `T`-separated variant
    /// * RFC 3339 with `Z` or a numeric offset, normalised to UTC
    /// * bare `YYYY-MM-DD`, read as midnight
    ///
    /// Returns `None` for empty or unrecognised input.
    pub fn parse(s: &str) -> Option<NaiveDateTime> {
        let s = s.trim();
        if s.is_empty() {
            return None;
        }

        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return Some(dt.with_timezone(&Utc).naive_utc());
        }

        for fmt in Self::FORMATS {
            if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
                return Some(naive);
            }
        }

        Self::parse_date(s).and_then(|d| d.and_hms_opt(0, 0, 0))
    }

    /// Parse a `YYYY-MM-DD` calendar date.
    pub fn parse_date(s: &str) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn test_parse_space_separated() {
        let ts = TimestampParser::parse("2017-10-02 10:56:33").unwrap();
        assert_eq!((ts.year(), ts.month(), ts.day()), (2017, 10, 2));
        assert_eq!((ts.hour(), ts.minute(), ts.second()), (10, 56, 33));
    }

    #[test]
    fn test_parse_fractional_seconds() {
        let ts = TimestampParser::parse("2017-10-02 10:56:33.250").unwrap();
        assert_eq!(ts.nanosecond(), 250_000_000);
    }

    #[test]
    fn test_parse_t_separated() {
        let ts = TimestampParser::parse("2018-01-15T08:00:00").unwrap();
        assert_eq!(ts.hour(), 8);
    }

    #[test]
    fn test_parse_rfc3339_offset_normalised_to_utc() {
        let ts = TimestampParser::parse("2018-01-15T01:30:00-03:00").unwrap();
        assert_eq!(ts.hour(), 4);
        assert_eq!(ts.minute(), 30);
    }

    #[test]
    fn test_parse_rfc3339_zulu() {
        let ts = TimestampParser::parse("2018-01-15T23:59:59Z").unwrap();
        assert_eq!(ts.day(), 15);
        assert_eq!(ts.hour(), 23);
    }

    #[test]
    fn test_parse_date_only_is_midnight() {
        let ts = TimestampParser::parse("2018-06-01").unwrap();
        assert_eq!((ts.hour(), ts.minute(), ts.second()), (0, 0, 0));
        assert_eq!(ts.day(), 1);
    }

    #[test]
    fn test_parse_trims_whitespace() {
        assert!(TimestampParser::parse("  2018-06-01 12:00:00 ").is_some());
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(TimestampParser::parse("").is_none());
        assert!(TimestampParser::parse("yesterday").is_none());
        assert!(TimestampParser::parse("2018-13-01 00:00:00").is_none());
        assert!(TimestampParser::parse("2018-02-30").is_none());
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(
            TimestampParser::parse_date("2024-01-02"),
            NaiveDate::from_ymd_opt(2024, 1, 2)
        );
        assert!(TimestampParser::parse_date("02/01/2024").is_none());
    }
}
