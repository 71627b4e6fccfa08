use chrono::{DateTime, NaiveDate, NaiveDateTime};

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d"];
const DATE_TIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Parses a date-like string down to its calendar day.
///
/// Time of day and any offset are dropped; the date is taken as written,
/// not shifted into another zone.
pub fn parse_day(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(raw, format) {
            return Some(date);
        }
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.date_naive());
    }

    DATE_TIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .map(|dt| dt.date())
}

/// Validates a 24-hour `H:MM`/`HH:MM` check-in time and returns it zero-padded.
pub fn normalize_check_in_time(raw: &str) -> Option<String> {
    let (hours, minutes) = raw.split_once(':')?;

    let all_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
    if hours.is_empty() || hours.len() > 2 || minutes.len() != 2 {
        return None;
    }
    if !all_digits(hours) || !all_digits(minutes) {
        return None;
    }

    let hour: u32 = hours.parse().ok()?;
    let minute: u32 = minutes.parse().ok()?;
    if hour > 23 || minute > 59 {
        return None;
    }

    Some(format!("{hour:02}:{minute:02}"))
}

/// `"true"`, `"1"` (any case, trimmed) count as set.
pub fn is_truthy(raw: &str) -> bool {
    matches!(raw.trim().to_ascii_lowercase().as_str(), "true" | "1")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn parses_plain_and_timestamped_dates() {
        assert_eq!(parse_day("2025-08-12"), Some(day(2025, 8, 12)));
        assert_eq!(parse_day("2025/08/12"), Some(day(2025, 8, 12)));
        assert_eq!(parse_day(" 2025-08-12 "), Some(day(2025, 8, 12)));
        assert_eq!(parse_day("2025-08-12T23:30:00+06:00"), Some(day(2025, 8, 12)));
        assert_eq!(parse_day("2025-08-12T23:30:00Z"), Some(day(2025, 8, 12)));
        assert_eq!(parse_day("2025-08-12 08:15:00"), Some(day(2025, 8, 12)));
    }

    #[test]
    fn rejects_garbage_dates() {
        assert_eq!(parse_day(""), None);
        assert_eq!(parse_day("yesterday"), None);
        assert_eq!(parse_day("2025-02-30"), None);
        assert_eq!(parse_day("2025-13-01"), None);
    }

    #[test]
    fn check_in_time_pattern() {
        assert_eq!(normalize_check_in_time("09:30").as_deref(), Some("09:30"));
        assert_eq!(normalize_check_in_time("9:30").as_deref(), Some("09:30"));
        assert_eq!(normalize_check_in_time("23:59").as_deref(), Some("23:59"));
        assert_eq!(normalize_check_in_time("0:00").as_deref(), Some("00:00"));

        for bad in ["25:61", "24:00", "12:60", "12:5", "123:00", ":30", "12-30", "ab:cd", "12:30:00", ""] {
            assert_eq!(normalize_check_in_time(bad), None, "{bad} should be rejected");
        }
    }

    #[test]
    fn truthy_flags() {
        assert!(is_truthy("true"));
        assert!(is_truthy("TRUE"));
        assert!(is_truthy("1"));
        assert!(!is_truthy("yes"));
        assert!(!is_truthy("0"));
        assert!(!is_truthy(""));
    }
}
