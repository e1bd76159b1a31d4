//! Line classification and entry assembly.
//!
//! Folds the raw transcript lines into logical entries: every line that
//! starts with a year opens a new entry, anything else continues the entry
//! that is currently open.

use std::sync::OnceLock;

use regex::Regex;
use tracing::debug;

/// Separator between the timestamp and the rest of an entry.
pub const SEPARATOR: &str = " - ";

fn year_prefix() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\d{4}").expect("regex is valid"))
}

// ── LineKind ──────────────────────────────────────────────────────────────────

/// Disposition of a single trimmed transcript line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    /// `"<date>, <time> - <author>: <body>"`
    AuthoredStart,
    /// Timestamped line without an `author:` segment (departures, subject changes).
    SystemStart,
    /// Belongs to whichever entry is open.
    Continuation,
}

/// Classify one trimmed line.
pub fn classify_line(line: &str) -> LineKind {
    if !year_prefix().is_match(line) {
        return LineKind::Continuation;
    }
    match header_segment(line) {
        // Starts with digits but has no separator: pasted addresses and the like.
        None => LineKind::Continuation,
        Some(segment) if segment.contains(':') => LineKind::AuthoredStart,
        Some(_) => LineKind::SystemStart,
    }
}

/// The segment between the first and second `" - "`, where the author
/// name and its colon live. Later separators belong to the body.
pub fn header_segment(entry: &str) -> Option<&str> {
    entry.split(SEPARATOR).nth(1)
}

// ── Entry ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Authored,
    System,
}

/// One logical transcript entry with its continuation lines folded in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub kind: EntryKind,
    pub text: String,
}

impl Entry {
    fn new(kind: EntryKind, line: &str) -> Self {
        Self {
            kind,
            text: line.to_string(),
        }
    }

    fn append(&mut self, line: &str) {
        self.text.push(' ');
        self.text.push_str(line);
    }
}

/// Fold raw lines into entries, in transcript order.
///
/// Lines are trimmed and blank lines skipped. A continuation line that
/// arrives before any entry has been opened is dropped.
pub fn assemble_entries<I, S>(lines: I) -> Vec<Entry>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut entries: Vec<Entry> = Vec::new();
    let mut dropped = 0usize;

    for raw in lines {
        let line = raw.as_ref().trim_start_matches('\u{feff}').trim();
        if line.is_empty() {
            continue;
        }

        match classify_line(line) {
            LineKind::AuthoredStart => entries.push(Entry::new(EntryKind::Authored, line)),
            LineKind::SystemStart => entries.push(Entry::new(EntryKind::System, line)),
            LineKind::Continuation => match entries.last_mut() {
                Some(open) => open.append(line),
                None => {
                    dropped += 1;
                    debug!("Dropping continuation line with no open entry: {:?}", line);
                }
            },
        }
    }

    debug!(
        "Assembled {} entries ({} orphan lines dropped)",
        entries.len(),
        dropped
    );
    entries
}
