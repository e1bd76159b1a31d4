use std::path::PathBuf;
use thiserror::Error;

/// All errors produced by chatstat.
#[derive(Error, Debug)]
pub enum ChatStatError {
    /// A file could not be opened or read from disk.
    #[error("Failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A JSON document could not be parsed.
    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// An entry that looked like a new message could not be split into
    /// date, time, author and body.
    #[error("Malformed entry \"{entry}\": {reason}")]
    MalformedEntry { entry: String, reason: String },

    /// A display name has no matching participant.
    #[error("Author not found: {0}")]
    AuthorNotFound(String),

    /// A per-author statistic needs at least one message.
    #[error("Author {0} has no messages")]
    EmptyAuthorCollection(String),

    /// A response-time statistic was requested for an author with no deltas.
    #[error("No response data for author {0}")]
    NoResponseData(String),

    /// The transcript as a whole is unusable.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The training corpus is missing or unusable.
    #[error("Corpus error: {0}")]
    Corpus(String),

    /// Pass-through for any raw I/O error that does not carry a path.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Convenience alias used throughout the chatstat crates.
pub type Result<T> = std::result::Result<T, ChatStatError>;
