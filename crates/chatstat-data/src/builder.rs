//! Message builder: turns one authored entry into a [`Message`].

use chrono::{Datelike, Timelike};

use chatstat_core::error::{ChatStatError, Result};
use chatstat_core::models::{Message, Mood};
use chatstat_core::time_utils::{normalize_time_token, parse_date_token, parse_time_token};

use crate::parser::SEPARATOR;
use crate::registry::AuthorRegistry;

/// Separator between the date and time tokens.
const DATE_TIME_SEPARATOR: &str = ", ";

/// Parse `entry` into the message at position `index`.
///
/// Structural problems (missing separators, unparseable date or time) yield
/// [`ChatStatError::MalformedEntry`]. A name missing from `registry` yields
/// [`ChatStatError::AuthorNotFound`].
pub fn build_message(index: usize, entry: &str, registry: &AuthorRegistry) -> Result<Message> {
    let (stamp, rest) = entry
        .split_once(SEPARATOR)
        .ok_or_else(|| malformed(entry, "missing \" - \" separator"))?;

    let (date_token, time_token) = stamp
        .split_once(DATE_TIME_SEPARATOR)
        .ok_or_else(|| malformed(entry, "missing \", \" between date and time"))?;

    let raw_date = date_token.trim().to_string();
    let raw_time = normalize_time_token(time_token);

    let date = parse_date_token(&raw_date).map_err(|e| malformed(entry, &e.to_string()))?;
    let time = parse_time_token(&raw_time).map_err(|e| malformed(entry, &e.to_string()))?;

    let (name, text) = match rest.split_once(':') {
        Some((name, body)) => (name.trim(), body.trim().to_string()),
        None => (rest.trim(), String::new()),
    };
    let author = registry.find(name)?;

    Ok(Message {
        index,
        raw_date,
        raw_time,
        date,
        time,
        weekday: date.weekday(),
        month: date.month0(),
        hour: time.hour(),
        author,
        text,
        mood: Mood::Unclassified,
    })
}

fn malformed(entry: &str, reason: &str) -> ChatStatError {
    ChatStatError::MalformedEntry {
        entry: entry.to_string(),
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chatstat_core::models::AuthorId;
    use chrono::{NaiveDate, NaiveTime, Weekday};

    fn registry() -> AuthorRegistry {
        AuthorRegistry::build([
            "2023-01-05, 10:00 AM - Alice: x",
            "2023-01-05, 10:00 AM - Bob: x",
        ])
    }

    // ── happy path ────────────────────────────────────────────────────────────

    #[test]
    fn test_build_message_fields() {
        let msg = build_message(7, "2023-01-05, 10:15 PM - Bob: See you", &registry()).unwrap();

        assert_eq!(msg.index, 7);
        assert_eq!(msg.raw_date, "2023-01-05");
        assert_eq!(msg.raw_time, "10:15 PM");
        assert_eq!(msg.date, NaiveDate::from_ymd_opt(2023, 1, 5).unwrap());
        assert_eq!(msg.time, NaiveTime::from_hms_opt(22, 15, 0).unwrap());
        assert_eq!(msg.weekday, Weekday::Thu);
        assert_eq!(msg.weekday_name(), "Thursday");
        assert_eq!(msg.month, 0);
        assert_eq!(msg.hour, 22);
        assert_eq!(msg.author, AuthorId(1));
        assert_eq!(msg.text, "See you");
        assert_eq!(msg.mood, Mood::Unclassified);
    }

    #[test]
    fn test_build_message_dotted_meridiem() {
        let msg = build_message(0, "2023-12-31, 9:05 a.m. - Alice: hi", &registry()).unwrap();
        assert_eq!(msg.raw_time, "9:05 am");
        assert_eq!(msg.hour, 9);
        assert_eq!(msg.month, 11);
        assert_eq!(msg.weekday_name(), "Sunday");
    }

    #[test]
    fn test_build_message_midnight_hour() {
        let msg = build_message(0, "2023-06-01, 12:10 AM - Alice: late", &registry()).unwrap();
        assert_eq!(msg.hour, 0);
    }

    #[test]
    fn test_build_message_keeps_colons_and_separators_in_body() {
        let msg = build_message(
            0,
            "2023-01-05, 10:00 AM - Alice: meet at 10:30 - bring snacks",
            &registry(),
        )
        .unwrap();
        assert_eq!(msg.text, "meet at 10:30 - bring snacks");
    }

    #[test]
    fn test_build_message_without_colon_has_empty_body() {
        let msg = build_message(0, "2023-01-05, 10:00 AM - Alice", &registry()).unwrap();
        assert_eq!(msg.text, "");
        assert_eq!(msg.author, AuthorId(0));
    }

    // ── failures ──────────────────────────────────────────────────────────────

    #[test]
    fn test_build_message_missing_time_is_malformed() {
        let result = build_message(0, "2023-01-05 - Alice: hi", &registry());
        assert!(matches!(result, Err(ChatStatError::MalformedEntry { .. })));
    }

    #[test]
    fn test_build_message_bad_date_is_malformed() {
        let result = build_message(0, "2023-02-30, 10:00 AM - Alice: hi", &registry());
        assert!(matches!(result, Err(ChatStatError::MalformedEntry { .. })));
    }

    #[test]
    fn test_build_message_bad_time_is_malformed() {
        let result = build_message(0, "2023-01-05, 25:00 - Alice: hi", &registry());
        assert!(matches!(result, Err(ChatStatError::MalformedEntry { .. })));
    }

    #[test]
    fn test_build_message_unknown_author() {
        let result = build_message(0, "2023-01-05, 10:00 AM - Zed: hi", &registry());
        assert!(matches!(result, Err(ChatStatError::AuthorNotFound(n)) if n == "Zed"));
    }
}
