use std::fmt;

use rusqlite::types::{ToSql, ToSqlOutput};
use serde::{Deserialize, Serialize};
use tabled::Tabled;

/// Genre stored for songs whose artist carries no genre on Spotify.
pub const UNKNOWN_GENRE: &str = "Unknown";

/// Key a stored row is unique by: a remote id when the catalog has one,
/// otherwise the entity name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NaturalKey {
    Id(i64),
    Text(String),
}

impl fmt::Display for NaturalKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NaturalKey::Id(id) => write!(f, "{}", id),
            NaturalKey::Text(text) => write!(f, "{}", text),
        }
    }
}

impl ToSql for NaturalKey {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        match self {
            NaturalKey::Id(id) => Ok(ToSqlOutput::from(*id)),
            NaturalKey::Text(text) => Ok(ToSqlOutput::from(text.as_str())),
        }
    }
}

/// What to ask a catalog for. The meaning of the terms is source specific:
/// a playlist name for Spotify, an optional country for Last.fm, a ranked
/// list of artist names for Genius.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    pub terms: Vec<String>,
}

impl Query {
    pub fn new(terms: Vec<String>) -> Self {
        Self {
            terms: terms
                .into_iter()
                .map(|t| t.trim().to_string())
                .filter(|t| !t.is_empty())
                .collect(),
        }
    }

    pub fn single(term: &str) -> Self {
        Self::new(vec![term.to_string()])
    }

    pub fn first(&self) -> Option<&str> {
        self.terms.first().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LastfmArtist {
    pub name: String,
    pub listeners: u64,
    pub playcount: u64,
    pub rank: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeniusArtist {
    pub genius_id: i64,
    pub name: String,
    pub rank: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpotifySong {
    pub track_id: String,
    pub name: String,
    pub artist_name: String,
    pub popularity: u32,
    pub genre: String,
    pub rank: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Token {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: u64,
    pub obtained_at: u64,
}

#[derive(Tabled)]
pub struct TableCountRow {
    pub table: String,
    pub rows: u64,
}

#[derive(Tabled)]
pub struct SummaryTableRow {
    pub group: String,
    pub count: u64,
    pub value: String,
}

// Spotify payloads

#[derive(Debug, Clone, Deserialize)]
pub struct ClientCredentialsResponse {
    pub access_token: String,
    #[serde(default = "default_token_type")]
    pub token_type: String,
    #[serde(default = "default_expires_in")]
    pub expires_in: u64,
}

fn default_token_type() -> String {
    "Bearer".to_string()
}

fn default_expires_in() -> u64 {
    3600
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlaylistSearchResponse {
    pub playlists: PlaylistPage,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlaylistPage {
    // Spotify returns null entries for playlists that are no longer available.
    pub items: Vec<Option<PlaylistRef>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlaylistRef {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlaylistTracksPage {
    pub items: Vec<PlaylistItem>,
    pub next: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlaylistItem {
    pub track: Option<TrackObject>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TrackObject {
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub artists: Vec<ArtistRef>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ArtistRef {
    pub id: Option<String>,
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ArtistObject {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub popularity: u32,
    #[serde(default)]
    pub genres: Vec<String>,
}

// Last.fm payloads

#[derive(Debug, Clone, Deserialize)]
pub struct LastfmTopArtistsResponse {
    /// Present for `chart.gettopartists`.
    pub artists: Option<LastfmArtistList>,
    /// Present for `geo.gettopartists`.
    pub topartists: Option<LastfmArtistList>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LastfmArtistList {
    #[serde(default)]
    pub artist: Vec<LastfmArtistEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LastfmArtistEntry {
    pub name: String,
    #[serde(default)]
    pub listeners: Option<String>,
    #[serde(default)]
    pub playcount: Option<String>,
    #[serde(rename = "@attr", default)]
    pub attr: Option<LastfmRankAttr>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LastfmRankAttr {
    pub rank: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LastfmErrorResponse {
    pub error: u32,
    pub message: String,
}

// Genius payloads

#[derive(Debug, Clone, Deserialize)]
pub struct GeniusSearchResponse {
    pub response: GeniusSearchBlock,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GeniusSearchBlock {
    #[serde(default)]
    pub hits: Vec<GeniusHit>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GeniusHit {
    pub result: GeniusHitResult,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GeniusHitResult {
    pub primary_artist: GeniusPrimaryArtist,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GeniusPrimaryArtist {
    pub id: i64,
    pub name: String,
}
