use std::collections::BTreeMap;
use std::fmt;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Weekday};
use serde::{Deserialize, Serialize};

use crate::error::{ChatStatError, Result};
use crate::stats;
use crate::time_utils::weekday_name;

/// Stable handle for a participant, assigned in order of first appearance.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct AuthorId(pub usize);

/// Sentiment label assigned by a mood classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MoodLabel {
    Positive,
    Negative,
    Neutral,
}

impl fmt::Display for MoodLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            MoodLabel::Positive => "positive",
            MoodLabel::Negative => "negative",
            MoodLabel::Neutral => "neutral",
        };
        f.write_str(s)
    }
}

/// Classification state of a single message.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum Mood {
    /// No classification pass has touched this message yet.
    #[default]
    Unclassified,
    /// Label plus the classifier's confidence in `[0, 1]`.
    Classified { label: MoodLabel, confidence: f64 },
}

impl Mood {
    pub fn label(&self) -> Option<MoodLabel> {
        match self {
            Mood::Unclassified => None,
            Mood::Classified { label, .. } => Some(*label),
        }
    }
}

/// A chat participant together with the accumulators filled in while the
/// transcript is processed.
///
/// Accumulators are only grown through the `record_*` methods; once the
/// aggregation pass has finished the author is read-only.
#[derive(Debug, Clone)]
pub struct Author {
    /// Registry handle.
    pub id: AuthorId,
    /// Display name exactly as it appears in the transcript.
    pub name: String,
    departure_count: u32,
    /// Indices into the message sequence, in transcript order.
    messages: Vec<usize>,
    /// Seconds this author waited for someone else to answer.
    response_times: Vec<f64>,
    mentions: BTreeMap<AuthorId, u32>,
    turns: u32,
}

impl Author {
    /// Create an author with empty accumulators.
    pub fn new(id: AuthorId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            departure_count: 0,
            messages: Vec::new(),
            response_times: Vec::new(),
            mentions: BTreeMap::new(),
            turns: 0,
        }
    }

    // ── Accumulators ──────────────────────────────────────────────────────────

    pub fn record_message(&mut self, index: usize) {
        self.messages.push(index);
    }

    pub fn record_response_time(&mut self, seconds: f64) {
        self.response_times.push(seconds);
    }

    pub fn record_departure(&mut self) {
        self.departure_count += 1;
    }

    pub fn record_mention(&mut self, other: AuthorId) {
        *self.mentions.entry(other).or_insert(0) += 1;
    }

    pub fn record_turn(&mut self) {
        self.turns += 1;
    }

    // ── Read access ───────────────────────────────────────────────────────────

    pub fn departure_count(&self) -> u32 {
        self.departure_count
    }

    /// Indices of the messages this author wrote.
    pub fn message_indices(&self) -> &[usize] {
        &self.messages
    }

    pub fn message_count(&self) -> usize {
        self.messages.len()
    }

    pub fn response_times(&self) -> &[f64] {
        &self.response_times
    }

    pub fn mentions(&self) -> &BTreeMap<AuthorId, u32> {
        &self.mentions
    }

    /// Number of maximal same-author runs this author started.
    pub fn turns(&self) -> u32 {
        self.turns
    }

    // ── Response-time statistics ──────────────────────────────────────────────

    /// Mean response time in seconds.
    pub fn avg_response_time(&self) -> Result<f64> {
        stats::mean(&self.response_times).ok_or_else(|| self.no_response_data())
    }

    pub fn min_response_time(&self) -> Result<f64> {
        stats::min(&self.response_times).ok_or_else(|| self.no_response_data())
    }

    pub fn max_response_time(&self) -> Result<f64> {
        stats::max(&self.response_times).ok_or_else(|| self.no_response_data())
    }

    fn no_response_data(&self) -> ChatStatError {
        ChatStatError::NoResponseData(self.name.clone())
    }
}

/// One authored transcript entry after parsing.
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    /// Position in the parsed message sequence.
    pub index: usize,
    /// Date token as written, e.g. `"2023-01-05"`.
    pub raw_date: String,
    /// Time token with `.` removed, e.g. `"10:00 am"`.
    pub raw_time: String,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub weekday: Weekday,
    /// Zero-based month, 0 = January.
    pub month: u32,
    /// Hour of day on a 24-hour clock.
    pub hour: u32,
    pub author: AuthorId,
    /// Body text, trimmed. Empty for bodies that could not be split off.
    pub text: String,
    pub mood: Mood,
}

impl Message {
    /// Combined date and time of the entry.
    pub fn date_time(&self) -> NaiveDateTime {
        self.date.and_time(self.time)
    }

    /// Full English weekday name, e.g. `"Thursday"`.
    pub fn weekday_name(&self) -> &'static str {
        weekday_name(self.weekday)
    }

    /// Body length in characters.
    pub fn text_len(&self) -> usize {
        self.text.chars().count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_message(text: &str) -> Message {
        let date = NaiveDate::from_ymd_opt(2023, 1, 5).unwrap();
        let time = NaiveTime::from_hms_opt(22, 15, 0).unwrap();
        Message {
            index: 0,
            raw_date: "2023-01-05".to_string(),
            raw_time: "10:15 pm".to_string(),
            date,
            time,
            weekday: Weekday::Thu,
            month: 0,
            hour: 22,
            author: AuthorId(0),
            text: text.to_string(),
            mood: Mood::default(),
        }
    }

    // ── Author ────────────────────────────────────────────────────────────────

    #[test]
    fn test_author_starts_empty() {
        let author = Author::new(AuthorId(3), "Alice");
        assert_eq!(author.id, AuthorId(3));
        assert_eq!(author.name, "Alice");
        assert_eq!(author.message_count(), 0);
        assert_eq!(author.departure_count(), 0);
        assert_eq!(author.turns(), 0);
        assert!(author.response_times().is_empty());
        assert!(author.mentions().is_empty());
    }

    #[test]
    fn test_author_response_time_stats() {
        let mut author = Author::new(AuthorId(0), "Alice");
        author.record_response_time(300.0);
        author.record_response_time(120.0);
        author.record_response_time(60.0);

        assert!((author.avg_response_time().unwrap() - 160.0).abs() < 1e-9);
        assert_eq!(author.min_response_time().unwrap(), 60.0);
        assert_eq!(author.max_response_time().unwrap(), 300.0);
    }

    #[test]
    fn test_author_response_time_without_data_fails() {
        let author = Author::new(AuthorId(0), "Alice");
        assert!(matches!(
            author.avg_response_time(),
            Err(ChatStatError::NoResponseData(name)) if name == "Alice"
        ));
        assert!(author.min_response_time().is_err());
        assert!(author.max_response_time().is_err());
    }

    #[test]
    fn test_author_mentions_accumulate() {
        let mut author = Author::new(AuthorId(0), "Alice");
        author.record_mention(AuthorId(1));
        author.record_mention(AuthorId(1));
        author.record_mention(AuthorId(2));
        assert_eq!(author.mentions().get(&AuthorId(1)), Some(&2));
        assert_eq!(author.mentions().get(&AuthorId(2)), Some(&1));
    }

    #[test]
    fn test_author_departures_accumulate() {
        let mut author = Author::new(AuthorId(0), "Alice");
        author.record_departure();
        author.record_departure();
        assert_eq!(author.departure_count(), 2);
    }

    // ── Message ───────────────────────────────────────────────────────────────

    #[test]
    fn test_message_date_time_combines_fields() {
        let msg = make_message("hi");
        let expected = NaiveDate::from_ymd_opt(2023, 1, 5)
            .unwrap()
            .and_hms_opt(22, 15, 0)
            .unwrap();
        assert_eq!(msg.date_time(), expected);
    }

    #[test]
    fn test_message_weekday_name() {
        assert_eq!(make_message("hi").weekday_name(), "Thursday");
    }

    #[test]
    fn test_message_text_len_counts_chars() {
        assert_eq!(make_message("héllo").text_len(), 5);
        assert_eq!(make_message("").text_len(), 0);
    }

    // ── Mood ──────────────────────────────────────────────────────────────────

    #[test]
    fn test_mood_default_is_unclassified() {
        assert_eq!(Mood::default(), Mood::Unclassified);
        assert_eq!(Mood::default().label(), None);
    }

    #[test]
    fn test_mood_label_of_classified() {
        let mood = Mood::Classified {
            label: MoodLabel::Negative,
            confidence: 0.9,
        };
        assert_eq!(mood.label(), Some(MoodLabel::Negative));
    }

    #[test]
    fn test_mood_serde_tagged() {
        let mood = Mood::Classified {
            label: MoodLabel::Positive,
            confidence: 0.5,
        };
        let json = serde_json::to_string(&mood).unwrap();
        assert_eq!(
            json,
            r#"{"state":"classified","label":"positive","confidence":0.5}"#
        );
        let json = serde_json::to_string(&Mood::Unclassified).unwrap();
        assert_eq!(json, r#"{"state":"unclassified"}"#);
    }

    #[test]
    fn test_mood_label_display() {
        assert_eq!(MoodLabel::Positive.to_string(), "positive");
        assert_eq!(MoodLabel::Negative.to_string(), "negative");
        assert_eq!(MoodLabel::Neutral.to_string(), "neutral");
    }
}
