//! Training corpus discovery for the mood classifier.
//!
//! A corpus directory holds JSON-lines files whose names start with
//! `positive` or `negative` (for example `positive_tweets.json`). Each line
//! is an object with a `text` field.

use std::io::BufRead;
use std::path::{Path, PathBuf};

use chatstat_core::error::{ChatStatError, Result};
use chatstat_core::models::MoodLabel;
use serde::Deserialize;
use tracing::{debug, info, warn};

#[derive(Debug, Deserialize)]
struct CorpusLine {
    text: String,
}

/// A labelled training example.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingDocument {
    pub text: String,
    pub label: MoodLabel,
}

/// Label implied by a corpus file name, if any.
fn label_for(path: &Path) -> Option<MoodLabel> {
    let ext = path.extension()?.to_str()?;
    if ext != "json" && ext != "jsonl" {
        return None;
    }
    let name = path.file_name()?.to_str()?.to_lowercase();
    if name.starts_with("positive") {
        Some(MoodLabel::Positive)
    } else if name.starts_with("negative") {
        Some(MoodLabel::Negative)
    } else {
        None
    }
}

/// Corpus files under `dir`, sorted by path.
pub fn find_corpus_files(dir: &Path) -> Vec<(PathBuf, MoodLabel)> {
    let mut files: Vec<(PathBuf, MoodLabel)> = walkdir::WalkDir::new(dir)
        .follow_links(true)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .filter_map(|entry| {
            let label = label_for(entry.path())?;
            Some((entry.into_path(), label))
        })
        .collect();
    files.sort_by(|a, b| a.0.cmp(&b.0));
    files
}

/// Load at most `per_label_limit` documents of each label from `dir`.
///
/// Lines that are not JSON objects with a `text` field are skipped with a
/// warning. A missing directory is a [`ChatStatError::Corpus`] error.
pub fn load_training_corpus(dir: &Path, per_label_limit: usize) -> Result<Vec<TrainingDocument>> {
    if !dir.is_dir() {
        return Err(ChatStatError::Corpus(format!(
            "corpus directory does not exist: {}",
            dir.display()
        )));
    }

    let files = find_corpus_files(dir);
    if files.is_empty() {
        warn!("No corpus files found in {}", dir.display());
    }

    let mut documents = Vec::new();
    let mut positive = 0usize;
    let mut negative = 0usize;

    for (path, label) in &files {
        let taken = match label {
            MoodLabel::Positive => &mut positive,
            MoodLabel::Negative => &mut negative,
            MoodLabel::Neutral => continue,
        };
        if *taken >= per_label_limit {
            continue;
        }

        let file = std::fs::File::open(path).map_err(|source| ChatStatError::FileRead {
            path: path.clone(),
            source,
        })?;

        for (line_no, line) in std::io::BufReader::new(file).lines().enumerate() {
            if *taken >= per_label_limit {
                break;
            }
            let line = match line {
                Ok(l) => l,
                Err(e) => {
                    warn!("Stopped reading {}: {}", path.display(), e);
                    break;
                }
            };
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            match serde_json::from_str::<CorpusLine>(trimmed) {
                Ok(parsed) => {
                    documents.push(TrainingDocument {
                        text: parsed.text,
                        label: *label,
                    });
                    *taken += 1;
                }
                Err(e) => warn!(
                    "Skipping line {} of {}: {}",
                    line_no + 1,
                    path.display(),
                    e
                ),
            }
        }
        debug!("Loaded corpus file {}", path.display());
    }

    info!(
        "Loaded {} positive and {} negative training documents",
        positive, negative
    );
    Ok(documents)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    fn write_jsonl(dir: &Path, name: &str, texts: &[&str]) {
        let mut file = std::fs::File::create(dir.join(name)).unwrap();
        for text in texts {
            writeln!(file, "{}", serde_json::json!({ "text": text })).unwrap();
        }
    }

    // ── discovery ─────────────────────────────────────────────────────────────

    #[test]
    fn test_label_for_file_names() {
        assert_eq!(label_for(Path::new("positive_tweets.json")), Some(MoodLabel::Positive));
        assert_eq!(label_for(Path::new("a/Negative.jsonl")), Some(MoodLabel::Negative));
        assert_eq!(label_for(Path::new("positive.txt")), None);
        assert_eq!(label_for(Path::new("tweets.json")), None);
    }

    #[test]
    fn test_find_corpus_files_recursive_and_sorted() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir(dir.path().join("nested")).unwrap();
        write_jsonl(dir.path(), "positive_b.json", &["x"]);
        write_jsonl(&dir.path().join("nested"), "negative.json", &["y"]);
        write_jsonl(dir.path(), "readme.json", &["z"]);

        let files = find_corpus_files(dir.path());
        assert_eq!(files.len(), 2);
        assert!(files[0].0 < files[1].0);
    }

    // ── loading ───────────────────────────────────────────────────────────────

    #[test]
    fn test_load_training_corpus_labels_documents() {
        let dir = TempDir::new().unwrap();
        write_jsonl(dir.path(), "positive.json", &["so happy", "great day"]);
        write_jsonl(dir.path(), "negative.json", &["awful mess"]);

        let docs = load_training_corpus(dir.path(), 100).unwrap();
        assert_eq!(docs.len(), 3);
        assert_eq!(
            docs.iter().filter(|d| d.label == MoodLabel::Positive).count(),
            2
        );
        assert!(docs
            .iter()
            .any(|d| d.text == "awful mess" && d.label == MoodLabel::Negative));
    }

    #[test]
    fn test_load_training_corpus_respects_limit_per_label() {
        let dir = TempDir::new().unwrap();
        write_jsonl(dir.path(), "positive_1.json", &["a1", "a2"]);
        write_jsonl(dir.path(), "positive_2.json", &["a3"]);
        write_jsonl(dir.path(), "negative.json", &["b1", "b2", "b3"]);

        let docs = load_training_corpus(dir.path(), 2).unwrap();
        let pos: Vec<&str> = docs
            .iter()
            .filter(|d| d.label == MoodLabel::Positive)
            .map(|d| d.text.as_str())
            .collect();
        assert_eq!(pos, vec!["a1", "a2"]);
        assert_eq!(
            docs.iter().filter(|d| d.label == MoodLabel::Negative).count(),
            2
        );
    }

    #[test]
    fn test_load_training_corpus_skips_malformed_lines() {
        let dir = TempDir::new().unwrap();
        let mut file = std::fs::File::create(dir.path().join("positive.jsonl")).unwrap();
        writeln!(file, "not json").unwrap();
        writeln!(file, "{{\"other\": 1}}").unwrap();
        writeln!(file).unwrap();
        writeln!(file, "{{\"text\": \"fine\"}}").unwrap();
        drop(file);

        let docs = load_training_corpus(dir.path(), 10).unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].text, "fine");
    }

    #[test]
    fn test_load_training_corpus_missing_directory() {
        let dir = TempDir::new().unwrap();
        let result = load_training_corpus(&dir.path().join("missing"), 10);
        assert!(matches!(result, Err(ChatStatError::Corpus(_))));
    }

    #[test]
    fn test_load_training_corpus_empty_directory() {
        let dir = TempDir::new().unwrap();
        assert!(load_training_corpus(dir.path(), 10).unwrap().is_empty());
    }
}
