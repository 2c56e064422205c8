//! Field-level parsing for the rescue request CSV.

use chrono::{DateTime, NaiveDateTime, Utc};

/// Offset-aware timestamp layouts, tried after RFC 3339.
const OFFSET_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S%.f%:z", "%Y-%m-%d %H:%M:%S%.f%z"];

/// Naive timestamp layouts, interpreted as UTC.
const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
];

/// Parses a request timestamp. Offset-bearing values are converted to UTC;
/// values without an offset are taken as UTC.
#[must_use]
pub fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in OFFSET_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(s, format) {
            return Some(dt.with_timezone(&Utc));
        }
    }
    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
            return Some(naive.and_utc());
        }
    }
    None
}

/// Parses a boolean flag column. Returns `None` for values that are not a
/// recognized spelling of true or false.
#[must_use]
pub fn parse_flag(s: &str) -> Option<bool> {
    match s.trim().to_ascii_lowercase().as_str() {
        "true" | "t" | "1" | "yes" | "y" => Some(true),
        "false" | "f" | "0" | "no" | "n" | "" => Some(false),
        _ => None,
    }
}

/// Parses a coordinate column. Returns `None` if missing or unparseable;
/// range checks happen on the pair.
#[must_use]
pub fn parse_coordinate(s: Option<&str>) -> Option<f64> {
    s?.trim().parse::<f64>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_rfc3339() {
        let dt = parse_timestamp("2018-08-17T10:23:45+05:30").unwrap();
        assert_eq!(dt.to_string(), "2018-08-17 04:53:45 UTC");
    }

    #[test]
    fn parses_space_separated_with_offset() {
        let dt = parse_timestamp("2018-08-17 10:23:45.123456+05:30").unwrap();
        assert_eq!(dt.to_string(), "2018-08-17 04:53:45.123456 UTC");
    }

    #[test]
    fn parses_naive_as_utc() {
        let dt = parse_timestamp("2018-08-17T10:23:45.000").unwrap();
        assert_eq!(dt.to_string(), "2018-08-17 10:23:45 UTC");
        let dt = parse_timestamp("2018-08-17 10:23:45").unwrap();
        assert_eq!(dt.to_string(), "2018-08-17 10:23:45 UTC");
    }

    #[test]
    fn rejects_invalid_timestamp() {
        assert!(parse_timestamp("yesterday").is_none());
        assert!(parse_timestamp("").is_none());
    }

    #[test]
    fn parses_flags() {
        assert_eq!(parse_flag("True"), Some(true));
        assert_eq!(parse_flag("1"), Some(true));
        assert_eq!(parse_flag("false"), Some(false));
        assert_eq!(parse_flag(""), Some(false));
        assert_eq!(parse_flag("maybe"), None);
    }

    #[test]
    fn parses_coordinates() {
        assert_eq!(parse_coordinate(Some(" 9.4981 ")), Some(9.4981));
        assert_eq!(parse_coordinate(Some("n/a")), None);
        assert_eq!(parse_coordinate(None), None);
    }
}
