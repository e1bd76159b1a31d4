//! Top-level analysis pipeline.
//!
//! Reads a transcript, assembles entries, aggregates them into a
//! [`ChatStat`] and records run metadata alongside it.

use std::path::Path;

use chatstat_core::error::{ChatStatError, Result};
use chrono::Utc;
use tracing::info;

use crate::aggregator::ChatStat;
use crate::parser::assemble_entries;
use crate::reader::read_transcript;

// ── Public types ──────────────────────────────────────────────────────────────

/// Metadata produced alongside the aggregated statistics.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct AnalysisMetadata {
    /// RFC 3339 timestamp when this result was generated.
    pub generated_at: String,
    /// Raw lines handed to the parser, blank ones included.
    pub lines_read: usize,
    /// Logical entries after continuation folding.
    pub entries_assembled: usize,
    pub system_entries: usize,
    /// Authored entries discarded because they could not be parsed.
    pub malformed_entries: usize,
    pub messages_parsed: usize,
    pub authors: usize,
    /// Wall-clock seconds spent parsing and aggregating.
    pub parse_time_seconds: f64,
}

/// The complete output of [`analyze_transcript`].
#[derive(Debug, Clone)]
pub struct AnalysisResult {
    pub stat: ChatStat,
    pub metadata: AnalysisMetadata,
}

// ── Public functions ──────────────────────────────────────────────────────────

/// Run the pipeline over in-memory transcript lines.
pub fn analyze_transcript<S: AsRef<str>>(lines: &[S]) -> Result<AnalysisResult> {
    if lines.iter().all(|l| l.as_ref().trim().is_empty()) {
        return Err(ChatStatError::InvalidInput(
            "transcript contains no lines".to_string(),
        ));
    }

    let start = std::time::Instant::now();

    // ── Step 1: Assemble entries ──────────────────────────────────────────────
    let entries = assemble_entries(lines.iter().map(|l| l.as_ref()));

    // ── Step 2: Aggregate ─────────────────────────────────────────────────────
    let stat = ChatStat::from_entries(&entries)?;
    let parse_time = start.elapsed().as_secs_f64();

    // ── Step 3: Build result ──────────────────────────────────────────────────
    let metadata = AnalysisMetadata {
        generated_at: Utc::now().to_rfc3339(),
        lines_read: lines.len(),
        entries_assembled: entries.len(),
        system_entries: stat.system_entries(),
        malformed_entries: stat.malformed_entries(),
        messages_parsed: stat.total_number_of_posts(),
        authors: stat.authors().len(),
        parse_time_seconds: parse_time,
    };

    info!(
        "Parsed {} messages from {} authors in {:.3}s",
        metadata.messages_parsed, metadata.authors, metadata.parse_time_seconds
    );

    Ok(AnalysisResult { stat, metadata })
}

/// Read `path` and run [`analyze_transcript`] over its lines.
pub fn analyze_file(path: &Path) -> Result<AnalysisResult> {
    let lines = read_transcript(path)?;
    analyze_transcript(lines.as_slice())
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    const TRANSCRIPT: &[&str] = &[
        "\u{feff}2023-01-05, 10:00 AM - Alice: Hello",
        "and welcome",
        "",
        "2023-01-05, 10:05 AM - Bob: Hi",
        "2023-01-05 10:06 AM - Bob: broken stamp",
        "2023-01-05, 10:07 AM - Bob left",
    ];

    #[test]
    fn test_analyze_transcript_metadata() {
        let result = analyze_transcript(TRANSCRIPT).unwrap();
        let meta = &result.metadata;

        assert_eq!(meta.lines_read, 6);
        assert_eq!(meta.entries_assembled, 4);
        assert_eq!(meta.system_entries, 1);
        assert_eq!(meta.malformed_entries, 1);
        assert_eq!(meta.messages_parsed, 2);
        assert_eq!(meta.authors, 2);
        assert!(meta.parse_time_seconds >= 0.0);
        assert!(!meta.generated_at.is_empty());

        assert_eq!(result.stat.messages()[0].text, "Hello and welcome");
        assert_eq!(result.stat.find_author("Bob").unwrap().departure_count(), 1);
    }

    #[test]
    fn test_analyze_transcript_rejects_blank_input() {
        let result = analyze_transcript(&["", "  "]);
        assert!(matches!(result, Err(ChatStatError::InvalidInput(_))));
    }

    #[test]
    fn test_analyze_transcript_without_messages() {
        let result = analyze_transcript(&["just some text", "2023-01-05, 10:00 AM - Bob left"])
            .unwrap();
        assert_eq!(result.metadata.messages_parsed, 0);
        assert_eq!(result.metadata.authors, 0);
        assert_eq!(result.metadata.system_entries, 1);
    }

    #[test]
    fn test_analyze_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("chat.txt");
        let mut file = std::fs::File::create(&path).unwrap();
        for line in TRANSCRIPT {
            writeln!(file, "{}", line).unwrap();
        }
        drop(file);

        let result = analyze_file(&path).unwrap();
        assert_eq!(result.metadata.messages_parsed, 2);
    }

    #[test]
    fn test_analyze_file_missing() {
        let dir = TempDir::new().unwrap();
        let result = analyze_file(&dir.path().join("missing.txt"));
        assert!(matches!(result, Err(ChatStatError::FileRead { .. })));
    }

    #[test]
    fn test_metadata_serializes() {
        let result = analyze_transcript(TRANSCRIPT).unwrap();
        let json = serde_json::to_value(&result.metadata).unwrap();
        assert_eq!(json["messages_parsed"], 2);
    }
}
