use clap::{CommandFactory, Parser};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::sentiment::DEFAULT_MIN_CERTAINTY;

// ── Settings (CLI) ─────────────────────────────────────────────────────────────

/// Conversation statistics for exported chat transcripts
#[derive(Parser, Debug, Clone)]
#[command(
    name = "chatstat",
    about = "Conversation statistics for exported chat transcripts",
    version
)]
pub struct Settings {
    /// Exported transcript file
    pub transcript: PathBuf,

    /// Output format
    #[arg(long, default_value = "text", value_parser = ["text", "json"])]
    pub format: String,

    /// Show detailed statistics for one participant
    #[arg(long)]
    pub author: Option<String>,

    /// Classify the mood of every message
    #[arg(long)]
    pub classify: bool,

    /// Directory holding positive*/negative* training files
    #[arg(long)]
    pub corpus_dir: Option<PathBuf>,

    /// Training documents read per label
    #[arg(long, default_value = "1000")]
    pub training_size: usize,

    /// Probability a label must exceed to count as positive or negative (0.5-1.0)
    #[arg(long, default_value_t = DEFAULT_MIN_CERTAINTY, value_parser = parse_certainty)]
    pub min_certainty: f64,

    /// Logging level
    #[arg(long, default_value = "WARNING", value_parser = ["DEBUG", "INFO", "WARNING", "ERROR", "CRITICAL"])]
    pub log_level: String,

    /// Log file path
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,

    /// Clear saved configuration
    #[arg(long)]
    pub clear: bool,
}

fn parse_certainty(raw: &str) -> Result<f64, String> {
    let value: f64 = raw
        .parse()
        .map_err(|_| format!("`{}` is not a number", raw))?;
    if (0.5..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(format!("{} is not in 0.5..=1.0", value))
    }
}

// ── LastUsedParams ─────────────────────────────────────────────────────────────

/// Persisted last-used parameters saved to `~/.chatstat/last_used.json`.
#[derive(Debug, Serialize, Deserialize, Default, Clone)]
pub struct LastUsedParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub corpus_dir: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub training_size: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_certainty: Option<f64>,
}

impl LastUsedParams {
    /// Default location, under the home directory.
    pub fn config_path() -> PathBuf {
        Self::config_path_in(&dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
    }

    /// Config path rooted at `base_dir`.
    pub fn config_path_in(base_dir: &std::path::Path) -> PathBuf {
        base_dir.join(".chatstat").join("last_used.json")
    }

    /// Load persisted params; `Default` when absent or unreadable.
    pub fn load_from(path: &std::path::Path) -> Self {
        let Ok(content) = std::fs::read_to_string(path) else {
            return Self::default();
        };
        serde_json::from_str(&content).unwrap_or_default()
    }

    /// Atomically write params to `path`, creating parent directories.
    pub fn save_to(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;

        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, &json)?;
        std::fs::rename(&tmp, path)?;

        Ok(())
    }

    /// Delete the config file at `path` if it exists.
    pub fn clear_at(path: &std::path::Path) -> Result<(), std::io::Error> {
        if path.exists() {
            std::fs::remove_file(path)?;
        }
        Ok(())
    }
}

// ── Settings impl ──────────────────────────────────────────────────────────────

impl Settings {
    /// Parse process arguments, fill unset flags from the last run and
    /// persist the result.
    pub fn load_with_last_used() -> Self {
        Self::load_with_last_used_impl(
            std::env::args_os().collect(),
            &LastUsedParams::config_path(),
        )
    }

    /// Same as [`Settings::load_with_last_used`] with explicit args and
    /// config path.
    pub fn load_with_last_used_impl(
        args: Vec<std::ffi::OsString>,
        config_path: &std::path::Path,
    ) -> Self {
        let matches = Settings::command().get_matches_from(args.clone());
        let mut settings = Settings::parse_from(args);

        if settings.clear {
            let _ = LastUsedParams::clear_at(config_path);
            return Self::apply_debug_flag(settings);
        }

        let last = LastUsedParams::load_from(config_path);

        // CLI always wins over persisted values.
        if !is_arg_explicitly_set(&matches, "format") {
            if let Some(v) = last.format {
                settings.format = v;
            }
        }
        if !is_arg_explicitly_set(&matches, "corpus_dir") && settings.corpus_dir.is_none() {
            settings.corpus_dir = last.corpus_dir;
        }
        if !is_arg_explicitly_set(&matches, "training_size") {
            if let Some(v) = last.training_size {
                settings.training_size = v;
            }
        }
        if !is_arg_explicitly_set(&matches, "min_certainty") {
            if let Some(v) = last.min_certainty.filter(|v| (0.5..=1.0).contains(v)) {
                settings.min_certainty = v;
            }
        }

        settings = Self::apply_debug_flag(settings);

        let params = LastUsedParams::from(&settings);
        let _ = params.save_to(config_path);

        settings
    }

    /// `--debug` overrides the log level.
    fn apply_debug_flag(mut settings: Settings) -> Settings {
        if settings.debug {
            settings.log_level = "DEBUG".to_string();
        }
        settings
    }
}

// ── Conversion ─────────────────────────────────────────────────────────────────

impl From<&Settings> for LastUsedParams {
    fn from(s: &Settings) -> Self {
        LastUsedParams {
            format: Some(s.format.clone()),
            corpus_dir: s.corpus_dir.clone(),
            training_size: Some(s.training_size),
            min_certainty: Some(s.min_certainty),
        }
    }
}

/// Returns `true` when `name` was supplied on the command line.
fn is_arg_explicitly_set(matches: &clap::ArgMatches, name: &str) -> bool {
    matches.value_source(name) == Some(clap::parser::ValueSource::CommandLine)
}

// ── Tests ──────────────────────────────────────────────────────────────────────
