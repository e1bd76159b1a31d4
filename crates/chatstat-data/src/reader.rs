//! Transcript file loading.
//!
//! Exported chat logs are occasionally not valid UTF-8 (truncated emoji,
//! legacy encodings), so bytes are decoded lossily rather than rejected.

use std::path::Path;

use chatstat_core::error::{ChatStatError, Result};
use tracing::{debug, warn};

/// Read `path` and split it into lines. Line terminators are removed; a
/// `\r\n` ending counts as one terminator.
pub fn read_transcript(path: &Path) -> Result<Vec<String>> {
    let bytes = std::fs::read(path).map_err(|source| ChatStatError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;

    let text = match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(e) => {
            warn!(
                "{} is not valid UTF-8; invalid bytes were replaced",
                path.display()
            );
            String::from_utf8_lossy(e.as_bytes()).into_owned()
        }
    };

    let lines: Vec<String> = text.lines().map(str::to_string).collect();
    debug!("Read {} lines from {}", lines.len(), path.display());
    Ok(lines)
}
