//! Transcript ingestion and statistics for chatstat.
//!
//! Reads exported chat transcripts, folds them into entries, parses authored
//! entries into messages and aggregates per-author statistics. Reporting
//! views and the top-level analysis pipeline live here as well.

pub mod aggregator;
pub mod analysis;
pub mod builder;
pub mod corpus;
pub mod departures;
pub mod parser;
pub mod reader;
pub mod registry;
pub mod report;

pub use chatstat_core as core;
