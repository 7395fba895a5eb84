//! # CLI Module
//!
//! User-facing commands of tunetally. Each command opens the store, wires the
//! components from [`crate::config::Settings`] and reports progress through
//! the console macros.
//!
//! ## Commands
//!
//! - [`ingest`] - Runs one capped ingestion pass for a source
//! - [`analyze`] - Aggregates stored rows, writes the text report and chart
//! - [`info`] - Shows row counts of every stored table
//!
//! ## Typical Usage
//!
//! ```bash
//! tunetally ingest lastfm            # up to 25 new artists per run
//! tunetally ingest lastfm            # next 25, skipping stored ones
//! tunetally analyze lastfm           # lastfm_bucket_results.txt + chart
//! tunetally ingest genius --query "Adele" --query "Drake"
//! tunetally info
//! ```
//!
//! ## Error Handling
//!
//! Commands never return errors to `main`: failures are printed with
//! `error!`, which exits with status 1. Empty results are warnings.

use clap::ValueEnum;

mod analyze;
mod info;
mod ingest;

pub use analyze::analyze;
pub use info::info;
pub use ingest::ingest;

/// Remote catalog a command operates on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SourceKind {
    Spotify,
    Lastfm,
    Genius,
}

impl SourceKind {
    pub fn display_name(&self) -> &'static str {
        match self {
            SourceKind::Spotify => "Spotify",
            SourceKind::Lastfm => "Last.fm",
            SourceKind::Genius => "Genius",
        }
    }

    /// Name of the source on the command line.
    pub fn command_name(&self) -> &'static str {
        match self {
            SourceKind::Spotify => "spotify",
            SourceKind::Lastfm => "lastfm",
            SourceKind::Genius => "genius",
        }
    }
}
