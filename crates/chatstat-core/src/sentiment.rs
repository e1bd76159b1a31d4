//! Mood classification for message bodies.
//!
//! The aggregation code only sees the [`MoodClassifier`] trait. The bundled
//! [`NaiveBayesClassifier`] is a Bernoulli Naive-Bayes model over
//! "contains(word)" features, trained from positive/negative example texts.

use std::collections::{HashMap, HashSet};

use tracing::debug;

use crate::error::{ChatStatError, Result};
use crate::models::MoodLabel;

/// Posterior probability a label must exceed to be reported instead of neutral.
pub const DEFAULT_MIN_CERTAINTY: f64 = 0.85;

/// Shortest token treated as a word.
const MIN_WORD_LEN: usize = 3;

/// Smoothing constant added to every feature count (expected likelihood).
const SMOOTHING: f64 = 0.5;

/// A read-only text classifier.
pub trait MoodClassifier {
    /// Label `text` and return the classifier's confidence in `[0, 1]`.
    fn classify(&self, text: &str) -> (MoodLabel, f64);
}

/// Split `text` into the lowercase words the classifier looks at.
pub fn tokenize(text: &str) -> HashSet<String> {
    text.split_whitespace()
        .filter(|w| w.chars().count() >= MIN_WORD_LEN)
        .map(|w| w.to_lowercase())
        .collect()
}

// ── Model ─────────────────────────────────────────────────────────────────────

/// Per-label document statistics.
#[derive(Debug, Default, Clone)]
struct LabelModel {
    documents: usize,
    /// Number of documents containing each word.
    word_documents: HashMap<String, usize>,
}

impl LabelModel {
    /// Smoothed probability that a document of this label contains `word`.
    fn word_probability(&self, word: &str) -> f64 {
        let count = self.word_documents.get(word).copied().unwrap_or(0) as f64;
        (count + SMOOTHING) / (self.documents as f64 + 2.0 * SMOOTHING)
    }
}

/// Bernoulli Naive-Bayes classifier over positive and negative examples.
#[derive(Debug, Clone)]
pub struct NaiveBayesClassifier {
    positive: LabelModel,
    negative: LabelModel,
    vocabulary: HashSet<String>,
    /// Log-likelihood of a document containing none of the vocabulary.
    absent_positive: f64,
    absent_negative: f64,
    min_certainty: f64,
}

impl NaiveBayesClassifier {
    /// Train on `(text, label)` pairs. Neutral examples are ignored.
    ///
    /// Fails with [`ChatStatError::Corpus`] unless both positive and negative
    /// examples are present.
    pub fn train<'a, I>(documents: I, min_certainty: f64) -> Result<Self>
    where
        I: IntoIterator<Item = (&'a str, MoodLabel)>,
    {
        let mut positive = LabelModel::default();
        let mut negative = LabelModel::default();
        let mut vocabulary = HashSet::new();

        for (text, label) in documents {
            let model = match label {
                MoodLabel::Positive => &mut positive,
                MoodLabel::Negative => &mut negative,
                MoodLabel::Neutral => continue,
            };
            model.documents += 1;
            for word in tokenize(text) {
                *model.word_documents.entry(word.clone()).or_insert(0) += 1;
                vocabulary.insert(word);
            }
        }

        if positive.documents == 0 || negative.documents == 0 {
            return Err(ChatStatError::Corpus(format!(
                "need positive and negative examples, got {} positive and {} negative",
                positive.documents, negative.documents
            )));
        }

        let absent = |model: &LabelModel| -> f64 {
            vocabulary
                .iter()
                .map(|w| (1.0 - model.word_probability(w)).ln())
                .sum()
        };
        let absent_positive = absent(&positive);
        let absent_negative = absent(&negative);

        debug!(
            "Trained classifier on {} positive / {} negative documents, {} features",
            positive.documents,
            negative.documents,
            vocabulary.len()
        );

        Ok(Self {
            positive,
            negative,
            vocabulary,
            absent_positive,
            absent_negative,
            min_certainty,
        })
    }

    /// Number of distinct word features.
    pub fn vocabulary_size(&self) -> usize {
        self.vocabulary.len()
    }

    /// Posterior `(P(positive), P(negative))` for `text`.
    pub fn probabilities(&self, text: &str) -> (f64, f64) {
        let total = (self.positive.documents + self.negative.documents) as f64;
        let mut log_pos = (self.positive.documents as f64 / total).ln() + self.absent_positive;
        let mut log_neg = (self.negative.documents as f64 / total).ln() + self.absent_negative;

        // Swap the "absent" term for the "present" term of every known word.
        for word in tokenize(text) {
            if !self.vocabulary.contains(&word) {
                continue;
            }
            let p = self.positive.word_probability(&word);
            let n = self.negative.word_probability(&word);
            log_pos += p.ln() - (1.0 - p).ln();
            log_neg += n.ln() - (1.0 - n).ln();
        }

        // Normalise in log space.
        let top = log_pos.max(log_neg);
        let pos = (log_pos - top).exp();
        let neg = (log_neg - top).exp();
        (pos / (pos + neg), neg / (pos + neg))
    }
}

impl MoodClassifier for NaiveBayesClassifier {
    fn classify(&self, text: &str) -> (MoodLabel, f64) {
        let (prob_pos, prob_neg) = self.probabilities(text);
        let label = if prob_neg > self.min_certainty {
            MoodLabel::Negative
        } else if prob_pos > self.min_certainty {
            MoodLabel::Positive
        } else {
            MoodLabel::Neutral
        };
        (label, prob_pos.max(prob_neg))
    }
}
