//! Shared building blocks for chatstat.
//!
//! Models, errors, date/time token parsing, numeric helpers, display
//! formatting, the mood classifier and command-line settings.

pub mod error;
pub mod formatting;
pub mod models;
pub mod sentiment;
pub mod settings;
pub mod stats;
pub mod time_utils;

pub use error::{ChatStatError, Result};
