use chrono::{NaiveDateTime, Weekday};

// ── Timestamp parsing ─────────────────────────────────────────────────────────

/// Date-time layouts found in the published city files.
const TIMESTAMP_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

/// Parse a naive (zone-less) trip timestamp.
///
/// Returns `None` for empty strings or unrecognised layouts.
pub fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
}

// ── Weekdays ──────────────────────────────────────────────────────────────────

/// Weekdays in Monday-first order.
pub const WEEKDAYS: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

/// Full English name of `day`.
pub fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

/// Match a full weekday name, ignoring case.
///
/// Abbreviations are rejected, unlike `Weekday::from_str`.
pub fn parse_weekday(s: &str) -> Option<Weekday> {
    let s = s.trim();
    WEEKDAYS
        .into_iter()
        .find(|&d| weekday_name(d).eq_ignore_ascii_case(s))
}

// ── Months ────────────────────────────────────────────────────────────────────

/// Full English name of calendar month `n` (1–12), or `None` when out of range.
pub fn month_name(n: u32) -> Option<&'static str> {
    let month = chrono::Month::try_from(u8::try_from(n).ok()?).ok()?;
    Some(month.name())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn test_parse_timestamp_iso_space() {
        let ts = parse_timestamp("2017-06-23 15:09:32").unwrap();
        assert_eq!(ts.month(), 6);
        assert_eq!(ts.day(), 23);
        assert_eq!(ts.hour(), 15);
    }

    #[test]
    fn test_parse_timestamp_fractional_and_t_separator() {
        assert!(parse_timestamp("2017-06-23 15:09:32.123").is_some());
        assert!(parse_timestamp("2017-06-23T15:09:32").is_some());
        assert!(parse_timestamp("2017-06-23T15:09:32.5").is_some());
    }

    #[test]
    fn test_parse_timestamp_us_layout() {
        let ts = parse_timestamp("3/1/2017 07:05").unwrap();
        assert_eq!(ts.month(), 3);
        assert_eq!(ts.day(), 1);
        assert_eq!(ts.hour(), 7);
    }

    #[test]
    fn test_parse_timestamp_trims_whitespace() {
        assert!(parse_timestamp("  2017-01-01 00:00:00 ").is_some());
    }

    #[test]
    fn test_parse_timestamp_rejects_garbage() {
        assert!(parse_timestamp("").is_none());
        assert!(parse_timestamp("not a date").is_none());
        assert!(parse_timestamp("2017-13-01 00:00:00").is_none());
    }

    #[test]
    fn test_weekday_names_round_trip() {
        for day in WEEKDAYS {
            assert_eq!(parse_weekday(weekday_name(day)), Some(day));
        }
        assert_eq!(parse_weekday("sUnDaY"), Some(Weekday::Sun));
        assert_eq!(parse_weekday("sun"), None);
    }

    #[test]
    fn test_month_name() {
        assert_eq!(month_name(1), Some("January"));
        assert_eq!(month_name(12), Some("December"));
        assert_eq!(month_name(0), None);
        assert_eq!(month_name(13), None);
    }
}
