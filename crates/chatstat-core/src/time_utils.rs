use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Weekday};

use crate::error::{ChatStatError, Result};

/// Date token layout used by the transcript exporter.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// 12-hour clock with meridiem, after `.` has been stripped from the token.
pub const TIME_FORMAT: &str = "%I:%M %p";

// ── Token parsing ─────────────────────────────────────────────────────────────

/// Parse an ISO calendar date token such as `"2023-01-05"`.
pub fn parse_date_token(token: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(token.trim(), DATE_FORMAT).map_err(|e| {
        ChatStatError::MalformedEntry {
            entry: token.to_string(),
            reason: format!("invalid date: {}", e),
        }
    })
}

/// Normalise a raw time token: drop every `.` (so `"p.m."` reads `"pm"`),
/// turn no-break spaces into plain spaces and trim.
pub fn normalize_time_token(token: &str) -> String {
    token
        .chars()
        .filter(|c| *c != '.')
        .map(|c| match c {
            '\u{202f}' | '\u{00a0}' => ' ',
            other => other,
        })
        .collect::<String>()
        .trim()
        .to_string()
}

/// Parse an already normalised 12-hour time token such as `"10:05 am"`.
pub fn parse_time_token(token: &str) -> Result<NaiveTime> {
    NaiveTime::parse_from_str(token, TIME_FORMAT).map_err(|e| ChatStatError::MalformedEntry {
        entry: token.to_string(),
        reason: format!("invalid time: {}", e),
    })
}

// ── Derived fields ────────────────────────────────────────────────────────────

/// Full English name of `weekday`.
pub fn weekday_name(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

/// Seconds from `earlier` to `later`; negative when the input runs backwards.
pub fn elapsed_seconds(earlier: NaiveDateTime, later: NaiveDateTime) -> f64 {
    (later - earlier).num_seconds() as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    // ── parse_date_token ──────────────────────────────────────────────────────

    #[test]
    fn test_parse_date_token_iso() {
        let date = parse_date_token("2023-01-05").unwrap();
        assert_eq!(date.year(), 2023);
        assert_eq!(date.month(), 1);
        assert_eq!(date.day(), 5);
        assert_eq!(date.weekday(), Weekday::Thu);
    }

    #[test]
    fn test_parse_date_token_rejects_garbage() {
        assert!(matches!(
            parse_date_token("2023-13-40"),
            Err(ChatStatError::MalformedEntry { .. })
        ));
        assert!(parse_date_token("yesterday").is_err());
    }

    // ── normalize_time_token ──────────────────────────────────────────────────

    #[test]
    fn test_normalize_time_token_strips_dots() {
        assert_eq!(normalize_time_token("10:05 a.m."), "10:05 am");
        assert_eq!(normalize_time_token(" 3:45 p.m. "), "3:45 pm");
    }

    #[test]
    fn test_normalize_time_token_no_break_space() {
        assert_eq!(normalize_time_token("9:01\u{202f}PM"), "9:01 PM");
        assert_eq!(normalize_time_token("9:01\u{00a0}AM"), "9:01 AM");
    }

    // ── parse_time_token ──────────────────────────────────────────────────────

    #[test]
    fn test_parse_time_token_morning() {
        let t = parse_time_token("10:05 AM").unwrap();
        assert_eq!((t.hour(), t.minute()), (10, 5));
    }

    #[test]
    fn test_parse_time_token_afternoon_lowercase() {
        let t = parse_time_token("3:45 pm").unwrap();
        assert_eq!((t.hour(), t.minute()), (15, 45));
    }

    #[test]
    fn test_parse_time_token_midnight_and_noon() {
        assert_eq!(parse_time_token("12:00 AM").unwrap().hour(), 0);
        assert_eq!(parse_time_token("12:30 PM").unwrap().hour(), 12);
    }

    #[test]
    fn test_parse_time_token_requires_meridiem() {
        assert!(parse_time_token("15:45").is_err());
    }

    // ── weekday_name / elapsed_seconds ────────────────────────────────────────

    #[test]
    fn test_weekday_name_all_days() {
        assert_eq!(weekday_name(Weekday::Mon), "Monday");
        assert_eq!(weekday_name(Weekday::Sun), "Sunday");
    }

    #[test]
    fn test_elapsed_seconds() {
        let a = NaiveDate::from_ymd_opt(2023, 1, 5)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap();
        let b = NaiveDate::from_ymd_opt(2023, 1, 5)
            .unwrap()
            .and_hms_opt(10, 5, 0)
            .unwrap();
        assert_eq!(elapsed_seconds(a, b), 300.0);
        assert_eq!(elapsed_seconds(b, a), -300.0);
    }

    #[test]
    fn test_elapsed_seconds_across_midnight() {
        let a = NaiveDate::from_ymd_opt(2023, 1, 5)
            .unwrap()
            .and_hms_opt(23, 59, 0)
            .unwrap();
        let b = NaiveDate::from_ymd_opt(2023, 1, 6)
            .unwrap()
            .and_hms_opt(0, 1, 0)
            .unwrap();
        assert_eq!(elapsed_seconds(a, b), 120.0);
    }
}
