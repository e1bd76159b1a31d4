//! The aggregation engine.
//!
//! [`ChatStat`] owns the participants and the parsed message sequence of one
//! transcript. Construction parses the entries, counts departures and runs a
//! single forward pass over the messages to fill every per-author
//! accumulator. Read-only projections live in [`crate::report`].

use chatstat_core::error::{ChatStatError, Result};
use chatstat_core::models::{Author, AuthorId, Message, Mood};
use chatstat_core::sentiment::MoodClassifier;
use chatstat_core::time_utils::elapsed_seconds;
use tracing::{debug, info, warn};

use crate::builder::build_message;
use crate::departures::count_departures;
use crate::parser::{assemble_entries, Entry, EntryKind};
use crate::registry::AuthorRegistry;

/// Statistics state for a single transcript.
#[derive(Debug, Clone)]
pub struct ChatStat {
    registry: AuthorRegistry,
    messages: Vec<Message>,
    system_entries: usize,
    malformed_entries: usize,
    departures_recorded: usize,
}

impl ChatStat {
    /// Parse raw transcript lines and aggregate them.
    ///
    /// Fails with [`ChatStatError::InvalidInput`] when there is no non-blank
    /// line at all.
    pub fn from_lines<I, S>(lines: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let lines: Vec<S> = lines.into_iter().collect();
        if lines.iter().all(|l| l.as_ref().trim().is_empty()) {
            return Err(ChatStatError::InvalidInput(
                "transcript contains no lines".to_string(),
            ));
        }
        Self::from_entries(&assemble_entries(lines))
    }

    /// Build from already assembled entries.
    ///
    /// Malformed authored entries are logged and discarded. An authored entry
    /// whose author is missing from the registry aborts construction, since the
    /// registry is built from those very entries.
    pub fn from_entries(entries: &[Entry]) -> Result<Self> {
        let authored: Vec<&str> = entries
            .iter()
            .filter(|e| e.kind == EntryKind::Authored)
            .map(|e| e.text.as_str())
            .collect();
        let system: Vec<&str> = entries
            .iter()
            .filter(|e| e.kind == EntryKind::System)
            .map(|e| e.text.as_str())
            .collect();

        let mut registry = AuthorRegistry::build(authored.iter().copied());

        let mut messages = Vec::with_capacity(authored.len());
        let mut malformed_entries = 0;
        for entry in &authored {
            match build_message(messages.len(), entry, &registry) {
                Ok(message) => messages.push(message),
                Err(e @ ChatStatError::MalformedEntry { .. }) => {
                    malformed_entries += 1;
                    warn!("Discarding entry: {}", e);
                }
                Err(e) => return Err(e),
            }
        }

        let departures_recorded = count_departures(system.iter().copied(), &mut registry);

        let mut stat = Self {
            registry,
            messages,
            system_entries: system.len(),
            malformed_entries,
            departures_recorded,
        };
        stat.populate_accumulators();

        debug!(
            "ChatStat: {} messages from {} authors ({} malformed, {} system entries)",
            stat.messages.len(),
            stat.registry.len(),
            stat.malformed_entries,
            stat.system_entries
        );
        Ok(stat)
    }

    /// Single forward pass over the messages.
    ///
    /// Appends every message to its author, counts turns and mentions, and
    /// attributes each cross-author gap to the author who was waiting.
    fn populate_accumulators(&mut self) {
        let messages = &self.messages;
        let registry = &mut self.registry;

        let handles: Vec<(AuthorId, String)> = registry
            .authors()
            .iter()
            .map(|a| (a.id, format!("@{}", a.name)))
            .collect();

        for (idx, msg) in messages.iter().enumerate() {
            let author = registry.get_mut(msg.author);
            author.record_message(idx);

            for (other, handle) in &handles {
                if *other != msg.author && mentions_handle(&msg.text, handle) {
                    author.record_mention(*other);
                }
            }

            let Some(prev) = idx.checked_sub(1).map(|i| &messages[i]) else {
                author.record_turn();
                continue;
            };
            if prev.author == msg.author {
                continue;
            }
            author.record_turn();

            let delta = elapsed_seconds(prev.date_time(), msg.date_time());
            registry.get_mut(prev.author).record_response_time(delta);
        }
    }

    /// Explicit mood-classification pass. Returns how many messages were labelled.
    pub fn classify_messages(&mut self, classifier: &dyn MoodClassifier) -> usize {
        for msg in self.messages.iter_mut() {
            let (label, confidence) = classifier.classify(&msg.text);
            msg.mood = Mood::Classified { label, confidence };
        }
        info!("Classified {} messages", self.messages.len());
        self.messages.len()
    }

    // ── Accessors ─────────────────────────────────────────────────────────────

    pub fn authors(&self) -> &[Author] {
        self.registry.authors()
    }

    pub fn author(&self, id: AuthorId) -> &Author {
        self.registry.get(id)
    }

    /// Look up a participant by exact display name.
    pub fn find_author(&self, name: &str) -> Result<&Author> {
        self.registry.find(name).map(|id| self.registry.get(id))
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Messages written by `id`, in transcript order.
    pub fn messages_of(&self, id: AuthorId) -> impl Iterator<Item = &Message> + '_ {
        self.registry
            .get(id)
            .message_indices()
            .iter()
            .map(move |&i| &self.messages[i])
    }

    pub fn total_number_of_posts(&self) -> usize {
        self.messages.len()
    }

    pub fn system_entries(&self) -> usize {
        self.system_entries
    }

    pub fn malformed_entries(&self) -> usize {
        self.malformed_entries
    }

    pub fn departures_recorded(&self) -> usize {
        self.departures_recorded
    }
}

/// `handle` occurs in `text` and is not just the prefix of a longer word,
/// so `"@Alice"` does not mention `Al`.
fn mentions_handle(text: &str, handle: &str) -> bool {
    text.match_indices(handle).any(|(start, _)| {
        text[start + handle.len()..]
            .chars()
            .next()
            .map_or(true, |c| !(c.is_alphanumeric() || c == '_'))
    })
}
