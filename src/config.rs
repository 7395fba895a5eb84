//! Configuration management for tunetally.
//!
//! This module loads configuration values from environment variables and a
//! `.env` file and gathers them into an explicit [`Settings`] struct that is
//! handed to every component at construction time. Nothing in the crate
//! reads the environment after `Settings` has been built.
//!
//! The configuration system follows a hierarchical approach:
//! 1. Command-line flags (applied by the CLI on top of `Settings`)
//! 2. Environment variables
//! 3. `.env` file in the local data directory
//! 4. Application defaults

use std::{env, fmt, path::PathBuf};

pub const APP_DIR: &str = "tunetally";

pub const DEFAULT_TARGET_TOTAL: u64 = 100;
pub const DEFAULT_PER_RUN_CAP: u64 = 25;
pub const DEFAULT_SPOTIFY_API_URL: &str = "https://api.spotify.com/v1";
pub const DEFAULT_SPOTIFY_TOKEN_URL: &str = "https://accounts.spotify.com/api/token";
pub const DEFAULT_SPOTIFY_PLAYLIST: &str = "Billboard Hot 100";
pub const DEFAULT_LASTFM_API_URL: &str = "https://ws.audioscrobbler.com/2.0/";
pub const DEFAULT_GENIUS_API_URL: &str = "https://api.genius.com";

/// Ranked artist names searched on Genius when `GENIUS_ARTISTS` is unset.
pub const DEFAULT_GENIUS_ARTISTS: &[&str] = &[
    "The Beatles",
    "Michael Jackson",
    "Madonna",
    "Elvis Presley",
    "Taylor Swift",
    "Elton John",
    "Mariah Carey",
    "Rihanna",
    "Drake",
    "Eminem",
    "Whitney Houston",
    "Stevie Wonder",
    "The Rolling Stones",
    "Janet Jackson",
    "Beyonce",
    "Prince",
    "Bruno Mars",
    "Ed Sheeran",
    "Lady Gaga",
    "Bee Gees",
    "Katy Perry",
    "Adele",
    "Justin Bieber",
    "Usher",
    "Ariana Grande",
    "Frank Sinatra",
    "Bob Dylan",
    "Led Zeppelin",
    "Pink Floyd",
    "Queen",
    "David Bowie",
    "Bruce Springsteen",
    "Aretha Franklin",
    "Ray Charles",
    "Marvin Gaye",
    "Bob Marley",
    "Jimi Hendrix",
    "U2",
    "Coldplay",
    "Kanye West",
    "Jay-Z",
    "Kendrick Lamar",
    "Celine Dion",
    "Billy Joel",
    "Phil Collins",
    "Fleetwood Mac",
    "ABBA",
    "The Eagles",
    "Chicago",
    "Diana Ross",
    "Tina Turner",
    "Cher",
    "Lionel Richie",
    "Garth Brooks",
    "Shania Twain",
    "Dolly Parton",
    "Johnny Cash",
    "Kenny Rogers",
    "George Michael",
    "Bon Jovi",
    "Metallica",
    "AC/DC",
    "Aerosmith",
    "Guns N' Roses",
    "Nirvana",
    "Red Hot Chili Peppers",
    "Linkin Park",
    "Green Day",
    "Maroon 5",
    "Britney Spears",
    "Christina Aguilera",
    "Jennifer Lopez",
    "Shakira",
    "Pitbull",
    "Post Malone",
    "The Weeknd",
    "Bad Bunny",
    "Billie Eilish",
    "Dua Lipa",
    "Harry Styles",
    "One Direction",
    "Backstreet Boys",
    "*NSYNC",
    "Nicki Minaj",
    "Lil Wayne",
    "Travis Scott",
    "Cardi B",
    "SZA",
    "Chris Brown",
    "Alicia Keys",
    "Kelly Clarkson",
    "Pink",
    "Miley Cyrus",
    "Selena Gomez",
    "Doja Cat",
    "Olivia Rodrigo",
    "Imagine Dragons",
    "The Chainsmokers",
    "Calvin Harris",
    "Sam Smith",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid { key: &'static str, value: String },
    Io(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Missing(key) => write!(f, "{} must be set", key),
            ConfigError::Invalid { key, value } => {
                write!(f, "{} has an invalid value: {:?}", key, value)
            }
            ConfigError::Io(msg) => write!(f, "cannot load environment: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Loads environment variables from a `.env` file in the local data directory.
///
/// Creates the `tunetally` directory if it doesn't exist and loads variables
/// from `tunetally/.env` below the platform-specific local data directory.
/// A missing `.env` file is not an error; every value has either a default or
/// is checked when the component that needs it is built.
///
/// # Directory Structure
///
/// - Linux: `~/.local/share/tunetally/.env`
/// - macOS: `~/Library/Application Support/tunetally/.env`
/// - Windows: `%LOCALAPPDATA%/tunetally/.env`
///
/// # Errors
///
/// Returns `ConfigError::Io` if the directory cannot be created or the file
/// exists but cannot be parsed.
pub async fn load_env() -> Result<(), ConfigError> {
    let path = app_dir().join(".env");
    if let Some(parent) = path.parent() {
        async_fs::create_dir_all(parent)
            .await
            .map_err(|e| ConfigError::Io(e.to_string()))?;
    }

    if path.is_file() {
        dotenv::from_path(&path).map_err(|e| ConfigError::Io(e.to_string()))?;
    }
    Ok(())
}

/// Returns `<data_local_dir>/tunetally`, falling back to `./tunetally`.
pub fn app_dir() -> PathBuf {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push(APP_DIR);
    path
}

/// Bounds of one ingestion run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IngestSettings {
    /// Number of stored rows repeated runs converge to.
    pub target_total: u64,
    /// Maximum number of rows a single run may insert.
    pub per_run_cap: u64,
}

impl Default for IngestSettings {
    fn default() -> Self {
        Self {
            target_total: DEFAULT_TARGET_TOTAL,
            per_run_cap: DEFAULT_PER_RUN_CAP,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpotifySettings {
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    pub api_url: String,
    pub token_url: String,
    pub playlist: String,
    pub token_cache: PathBuf,
}

impl SpotifySettings {
    /// Returns `(client_id, client_secret)` or the name of the missing one.
    pub fn credentials(&self) -> Result<(&str, &str), ConfigError> {
        let id = self
            .client_id
            .as_deref()
            .ok_or(ConfigError::Missing("SPOTIFY_API_AUTH_CLIENT_ID"))?;
        let secret = self
            .client_secret
            .as_deref()
            .ok_or(ConfigError::Missing("SPOTIFY_API_AUTH_CLIENT_SECRET"))?;
        Ok((id, secret))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LastfmSettings {
    pub api_key: Option<String>,
    pub api_url: String,
}

impl LastfmSettings {
    pub fn api_key(&self) -> Result<&str, ConfigError> {
        self.api_key
            .as_deref()
            .ok_or(ConfigError::Missing("LASTFM_API_KEY"))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeniusSettings {
    pub access_token: Option<String>,
    pub api_url: String,
    pub artists: Vec<String>,
}

impl GeniusSettings {
    pub fn access_token(&self) -> Result<&str, ConfigError> {
        self.access_token
            .as_deref()
            .ok_or(ConfigError::Missing("GENIUS_ACCESS_TOKEN"))
    }
}

/// Every runtime parameter of the application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub db_path: PathBuf,
    pub output_dir: PathBuf,
    pub ingest: IngestSettings,
    pub spotify: SpotifySettings,
    pub lastfm: LastfmSettings,
    pub genius: GeniusSettings,
}

impl Settings {
    /// Builds settings from the process environment.
    ///
    /// # Example
    ///
    /// ```
    /// let settings = Settings::from_env()?;
    /// println!("database at {}", settings.db_path.display());
    /// ```
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds settings from an arbitrary key lookup. Empty values count as
    /// unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let db_path = get("TUNETALLY_DB_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| app_dir().join("music.db"));
        let output_dir = get("TUNETALLY_OUTPUT_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("."));

        let ingest = IngestSettings {
            target_total: parse_positive(
                "TUNETALLY_TARGET_TOTAL",
                get("TUNETALLY_TARGET_TOTAL"),
                DEFAULT_TARGET_TOTAL,
            )?,
            per_run_cap: parse_positive(
                "TUNETALLY_PER_RUN_CAP",
                get("TUNETALLY_PER_RUN_CAP"),
                DEFAULT_PER_RUN_CAP,
            )?,
        };

        let spotify = SpotifySettings {
            client_id: get("SPOTIFY_API_AUTH_CLIENT_ID"),
            client_secret: get("SPOTIFY_API_AUTH_CLIENT_SECRET"),
            api_url: get("SPOTIFY_API_URL").unwrap_or_else(|| DEFAULT_SPOTIFY_API_URL.to_string()),
            token_url: get("SPOTIFY_API_TOKEN_URL")
                .unwrap_or_else(|| DEFAULT_SPOTIFY_TOKEN_URL.to_string()),
            playlist: get("SPOTIFY_PLAYLIST")
                .unwrap_or_else(|| DEFAULT_SPOTIFY_PLAYLIST.to_string()),
            token_cache: app_dir().join("cache/spotify_token.json"),
        };

        let lastfm = LastfmSettings {
            api_key: get("LASTFM_API_KEY"),
            api_url: get("LASTFM_API_URL").unwrap_or_else(|| DEFAULT_LASTFM_API_URL.to_string()),
        };

        let genius = GeniusSettings {
            access_token: get("GENIUS_ACCESS_TOKEN"),
            api_url: get("GENIUS_API_URL").unwrap_or_else(|| DEFAULT_GENIUS_API_URL.to_string()),
            artists: match get("GENIUS_ARTISTS") {
                Some(list) => split_list(&list),
                None => DEFAULT_GENIUS_ARTISTS
                    .iter()
                    .map(|s| s.to_string())
                    .collect(),
            },
        };

        Ok(Self {
            db_path,
            output_dir,
            ingest,
            spotify,
            lastfm,
            genius,
        })
    }
}

/// Splits a `;` separated list, dropping blank entries.
pub fn split_list(value: &str) -> Vec<String> {
    value
        .split(';')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_positive(key: &'static str, value: Option<String>, default: u64) -> Result<u64, ConfigError> {
    match value {
        None => Ok(default),
        Some(raw) => match raw.trim().parse::<u64>() {
            Ok(n) if n > 0 => Ok(n),
            _ => Err(ConfigError::Invalid { key, value: raw }),
        },
    }
}
