//! Read-only reporting views over an aggregated [`ChatStat`].
//!
//! Per-author queries fail locally with [`ChatStatError::EmptyAuthorCollection`]
//! or [`ChatStatError::NoResponseData`]; the ranking and [`ChatReport`]
//! builders skip the affected author instead of failing.

use std::collections::BTreeMap;

use chatstat_core::error::{ChatStatError, Result};
use chatstat_core::models::{AuthorId, Message, MoodLabel};
use chatstat_core::stats::{population_stdev, round_to};
use chatstat_core::time_utils::weekday_name;
use chrono::Weekday;
use serde::Serialize;

use crate::aggregator::ChatStat;

// ── Row types ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PostCount {
    pub author: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResponseRanking {
    pub author: String,
    /// Mean seconds this author waited for a reply.
    pub avg_response_time: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TurnCount {
    pub author: String,
    pub turns: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DepartureCount {
    pub author: String,
    pub departures: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MessageExtreme {
    pub author: String,
    pub text: String,
    pub length: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayCount {
    pub day: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MentionCount {
    pub author: String,
    pub count: u32,
}

/// Mood counts for one author.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MoodTally {
    pub author: String,
    pub positive: usize,
    pub negative: usize,
    pub neutral: usize,
    /// `negative / positive`, `0` when there are no positive messages.
    pub negativity_ratio: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MoodSummary {
    /// Sorted by negativity ratio, most negative first.
    pub tallies: Vec<MoodTally>,
    /// Messages that have not been through a classification pass.
    pub unclassified: usize,
}

/// Everything known about one participant. Statistics that need data the
/// author does not have are `None`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuthorSummary {
    pub name: String,
    pub message_count: usize,
    pub turns: u32,
    pub departures: u32,
    pub length_histogram: Vec<usize>,
    pub length_stdev: Option<f64>,
    pub avg_response_time: Option<f64>,
    pub min_response_time: Option<f64>,
    pub max_response_time: Option<f64>,
    pub mentions: Vec<MentionCount>,
}

/// Full export of every view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatReport {
    pub total_posts: usize,
    pub post_counts: Vec<PostCount>,
    pub authors: Vec<AuthorSummary>,
    pub conversation_killers: Vec<ResponseRanking>,
    pub turn_ranking: Vec<TurnCount>,
    pub departures: Vec<DepartureCount>,
    pub longest_messages: Vec<MessageExtreme>,
    pub shortest_messages: Vec<MessageExtreme>,
    pub messages_by_month: BTreeMap<u32, usize>,
    pub messages_by_day: Vec<DayCount>,
    pub messages_by_hour: BTreeMap<u32, usize>,
    pub mood: MoodSummary,
}

// ── Views ─────────────────────────────────────────────────────────────────────

impl ChatStat {
    fn author_name(&self, id: AuthorId) -> String {
        self.author(id).name.clone()
    }

    fn ensure_messages(&self, id: AuthorId) -> Result<()> {
        if self.author(id).message_count() == 0 {
            return Err(ChatStatError::EmptyAuthorCollection(self.author_name(id)));
        }
        Ok(())
    }

    pub fn message_count(&self, id: AuthorId) -> usize {
        self.author(id).message_count()
    }

    /// Longest body; the earliest one wins a tie.
    pub fn longest_message(&self, id: AuthorId) -> Result<&Message> {
        self.extreme_message(id, |candidate, best| candidate > best)
    }

    /// Shortest body; the earliest one wins a tie.
    pub fn shortest_message(&self, id: AuthorId) -> Result<&Message> {
        self.extreme_message(id, |candidate, best| candidate < best)
    }

    fn extreme_message(
        &self,
        id: AuthorId,
        better: impl Fn(usize, usize) -> bool,
    ) -> Result<&Message> {
        let mut best: Option<&Message> = None;
        for msg in self.messages_of(id) {
            let replace = match best {
                Some(b) => better(msg.text_len(), b.text_len()),
                None => true,
            };
            if replace {
                best = Some(msg);
            }
        }
        best.ok_or_else(|| ChatStatError::EmptyAuthorCollection(self.author_name(id)))
    }

    /// Body lengths of the author's messages, in transcript order.
    pub fn length_histogram(&self, id: AuthorId) -> Vec<usize> {
        self.messages_of(id).map(|m| m.text_len()).collect()
    }

    /// Population standard deviation of body lengths, one decimal place.
    pub fn length_stdev(&self, id: AuthorId) -> Result<f64> {
        self.ensure_messages(id)?;
        let lengths: Vec<f64> = self
            .length_histogram(id)
            .into_iter()
            .map(|l| l as f64)
            .collect();
        let stdev = population_stdev(&lengths)
            .ok_or_else(|| ChatStatError::EmptyAuthorCollection(self.author_name(id)))?;
        Ok(round_to(stdev, 1))
    }

    pub fn avg_response_time(&self, id: AuthorId) -> Result<f64> {
        self.author(id).avg_response_time()
    }

    pub fn min_response_time(&self, id: AuthorId) -> Result<f64> {
        self.author(id).min_response_time()
    }

    pub fn max_response_time(&self, id: AuthorId) -> Result<f64> {
        self.author(id).max_response_time()
    }

    /// Authors by average response time, fastest answered first. Authors
    /// without response data are left out.
    pub fn conversation_killer_ranking(&self) -> Vec<ResponseRanking> {
        let mut ranking: Vec<ResponseRanking> = self
            .authors()
            .iter()
            .filter_map(|a| {
                a.avg_response_time().ok().map(|avg| ResponseRanking {
                    author: a.name.clone(),
                    avg_response_time: avg,
                })
            })
            .collect();
        ranking.sort_by(|a, b| a.avg_response_time.total_cmp(&b.avg_response_time));
        ranking
    }

    /// The slowest-answered author, if anyone has response data.
    pub fn conversation_killer(&self) -> Option<ResponseRanking> {
        self.conversation_killer_ranking().pop()
    }

    /// Turn counts, highest first. Authors without messages are left out.
    pub fn turn_ranking(&self) -> Vec<TurnCount> {
        let mut ranking: Vec<TurnCount> = self
            .authors()
            .iter()
            .filter(|a| a.message_count() > 0)
            .map(|a| TurnCount {
                author: a.name.clone(),
                turns: a.turns(),
            })
            .collect();
        ranking.sort_by(|a, b| b.turns.cmp(&a.turns));
        ranking
    }

    /// Message counts, highest first.
    pub fn post_counts(&self) -> Vec<PostCount> {
        let mut counts: Vec<PostCount> = self
            .authors()
            .iter()
            .map(|a| PostCount {
                author: a.name.clone(),
                count: a.message_count(),
            })
            .collect();
        counts.sort_by(|a, b| b.count.cmp(&a.count));
        counts
    }

    /// Departure counts, lowest first.
    pub fn departure_counts(&self) -> Vec<DepartureCount> {
        let mut counts: Vec<DepartureCount> = self
            .authors()
            .iter()
            .map(|a| DepartureCount {
                author: a.name.clone(),
                departures: a.departure_count(),
            })
            .collect();
        counts.sort_by_key(|c| c.departures);
        counts
    }

    /// Each author's longest message, longest first.
    pub fn longest_messages(&self) -> Vec<MessageExtreme> {
        let mut rows = self.extremes(Self::longest_message);
        rows.sort_by(|a, b| b.length.cmp(&a.length));
        rows
    }

    /// Each author's shortest message, shortest first.
    pub fn shortest_messages(&self) -> Vec<MessageExtreme> {
        let mut rows = self.extremes(Self::shortest_message);
        rows.sort_by_key(|r| r.length);
        rows
    }

    fn extremes(
        &self,
        pick: impl Fn(&Self, AuthorId) -> Result<&Message>,
    ) -> Vec<MessageExtreme> {
        self.authors()
            .iter()
            .filter_map(|a| {
                pick(self, a.id).ok().map(|m| MessageExtreme {
                    author: a.name.clone(),
                    text: m.text.clone(),
                    length: m.text_len(),
                })
            })
            .collect()
    }

    /// Messages per zero-based month; all twelve months are present.
    pub fn messages_by_month(&self) -> BTreeMap<u32, usize> {
        let mut months: BTreeMap<u32, usize> = (0..12).map(|m| (m, 0)).collect();
        for msg in self.messages() {
            *months.entry(msg.month).or_insert(0) += 1;
        }
        months
    }

    /// Messages per observed weekday, Monday first.
    pub fn messages_by_day(&self) -> Vec<(Weekday, usize)> {
        let mut days: BTreeMap<u32, (Weekday, usize)> = BTreeMap::new();
        for msg in self.messages() {
            days.entry(msg.weekday.num_days_from_monday())
                .or_insert((msg.weekday, 0))
                .1 += 1;
        }
        days.into_values().collect()
    }

    /// Messages per observed hour of day.
    pub fn messages_by_hour(&self) -> BTreeMap<u32, usize> {
        let mut hours = BTreeMap::new();
        for msg in self.messages() {
            *hours.entry(msg.hour).or_insert(0) += 1;
        }
        hours
    }

    /// Who `id` mentioned and how often, most mentioned first.
    pub fn mentions(&self, id: AuthorId) -> Vec<(AuthorId, u32)> {
        let mut mentions: Vec<(AuthorId, u32)> = self
            .author(id)
            .mentions()
            .iter()
            .map(|(other, count)| (*other, *count))
            .collect();
        mentions.sort_by(|a, b| b.1.cmp(&a.1));
        mentions
    }

    /// Mood counts over the author's classified messages.
    pub fn mood_tally(&self, id: AuthorId) -> MoodTally {
        let mut tally = MoodTally {
            author: self.author_name(id),
            positive: 0,
            negative: 0,
            neutral: 0,
            negativity_ratio: 0.0,
        };
        for label in self.messages_of(id).filter_map(|m| m.mood.label()) {
            match label {
                MoodLabel::Positive => tally.positive += 1,
                MoodLabel::Negative => tally.negative += 1,
                MoodLabel::Neutral => tally.neutral += 1,
            }
        }
        if tally.positive > 0 {
            tally.negativity_ratio = tally.negative as f64 / tally.positive as f64;
        }
        tally
    }

    /// Mood tallies for every author plus the total unclassified count.
    pub fn mood_summary(&self) -> MoodSummary {
        let mut tallies: Vec<MoodTally> =
            self.authors().iter().map(|a| self.mood_tally(a.id)).collect();
        tallies.sort_by(|a, b| b.negativity_ratio.total_cmp(&a.negativity_ratio));
        let unclassified = self
            .messages()
            .iter()
            .filter(|m| m.mood.label().is_none())
            .count();
        MoodSummary {
            tallies,
            unclassified,
        }
    }

    /// Every statistic for one author; unavailable values are `None`.
    pub fn author_summary(&self, id: AuthorId) -> AuthorSummary {
        let author = self.author(id);
        AuthorSummary {
            name: author.name.clone(),
            message_count: author.message_count(),
            turns: author.turns(),
            departures: author.departure_count(),
            length_histogram: self.length_histogram(id),
            length_stdev: self.length_stdev(id).ok(),
            avg_response_time: author.avg_response_time().ok(),
            min_response_time: author.min_response_time().ok(),
            max_response_time: author.max_response_time().ok(),
            mentions: self
                .mentions(id)
                .into_iter()
                .map(|(other, count)| MentionCount {
                    author: self.author_name(other),
                    count,
                })
                .collect(),
        }
    }

    /// Assemble the full report.
    pub fn report(&self) -> ChatReport {
        ChatReport {
            total_posts: self.total_number_of_posts(),
            post_counts: self.post_counts(),
            authors: self.authors().iter().map(|a| self.author_summary(a.id)).collect(),
            conversation_killers: self.conversation_killer_ranking(),
            turn_ranking: self.turn_ranking(),
            departures: self.departure_counts(),
            longest_messages: self.longest_messages(),
            shortest_messages: self.shortest_messages(),
            messages_by_month: self.messages_by_month(),
            messages_by_day: self
                .messages_by_day()
                .into_iter()
                .map(|(day, count)| DayCount {
                    day: weekday_name(day).to_string(),
                    count,
                })
                .collect(),
            messages_by_hour: self.messages_by_hour(),
            mood: self.mood_summary(),
        }
    }
}
