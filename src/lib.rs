//! tunetally library
//!
//! Fetches music chart metadata from Spotify, Last.fm and Genius, stores it in
//! a local SQLite database through bounded, resumable ingestion runs, and
//! computes descriptive statistics rendered as text reports and bar charts.
//!
//! # Modules
//!
//! - `analysis` - Aggregations over stored rows plus report and chart writers
//! - `cli` - Command-line interface implementations
//! - `config` - Environment loading and the `Settings` struct
//! - `ingest` - The incremental ingestor driving capped insertion runs
//! - `management` - SQLite dedup store and the Spotify token cache
//! - `sources` - Remote catalog adapters
//! - `types` - Records, keys and table rows
//! - `utils` - Small helpers shared across modules
//!
//! # Example
//!
//! ```
//! use tunetally::{config, ingest::Ingestor, management::Store};
//!
//! #[tokio::main]
//! async fn main() -> tunetally::Res<()> {
//!     config::load_env().await?;
//!     let settings = config::Settings::from_env()?;
//!     let mut store = Store::open(&settings.db_path)?;
//!     let ingestor = Ingestor::new(settings.ingest);
//!     // ingestor.run(&mut source, &query, &mut store).await?;
//!     Ok(())
//! }
//! ```

pub mod analysis;
pub mod cli;
pub mod config;
pub mod ingest;
pub mod management;
pub mod sources;
pub mod types;
pub mod utils;

/// A convenient Result type alias for operations that may fail.
///
/// Used by the CLI glue where errors of several modules meet. The library
/// modules return their own typed errors, all of which convert into this
/// boxed form with `?`.
pub type Res<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Prints an informational message with a blue bullet point.
///
/// # Example
///
/// ```
/// info!("Fetching Last.fm chart...");
/// info!("Found {} candidates", count);
/// ```
#[macro_export]
macro_rules! info {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "o".blue().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a success message with a green checkmark.
///
/// # Example
///
/// ```
/// success!("Inserted {} new rows", inserted);
/// ```
#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "✓".green().bold(), std::format_args!($($arg)*));
  })
}

/// Prints an error message with a red exclamation mark and exits the program.
///
/// Terminates the process with exit code 1 right after printing, so it is
/// only used by the CLI layer for unrecoverable errors.
///
/// # Example
///
/// ```
/// error!("Cannot open database: {}", e);
/// // Program exits here - code after this will not execute
/// ```
#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".red().bold(), std::format_args!($($arg)*));
    std::process::exit(1);
  })
}

/// Prints a warning message with a yellow exclamation mark.
///
/// # Example
///
/// ```
/// warning!("No genres for artist {}, using Unknown", name);
/// ```
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".yellow().bold(), std::format_args!($($arg)*));
  })
}
