//! # Catalog Sources
//!
//! Adapters for the remote music catalogs tunetally ingests from. Each
//! adapter wraps one web API and turns its nested JSON into flat, ranked
//! records that the store understands.
//!
//! ```text
//! Ingestor
//!     ↓  fetch(query, limit)
//! CatalogSource
//!     ├── Spotify  (client-credentials bearer token, playlist tracks + artist genres)
//!     ├── Last.fm  (api_key query parameter, top artists chart)
//!     └── Genius   (access_token query parameter, artist search)
//!          ↓
//! HTTP Layer (reqwest, serde_json)
//! ```
//!
//! ## Decoding
//!
//! Responses are read as text and decoded into the serde types from
//! [`crate::types`]. A body that does not match the documented shape fails
//! with [`FetchError::Malformed`] instead of panicking on a missing key.
//! Optional upstream fields fall back to documented defaults (a missing
//! genre becomes `"Unknown"`, missing Last.fm counters become `0`).
//!
//! ## Errors
//!
//! - [`FetchError::Transient`] - network failure or non-success status. There
//!   is no automatic retry; running the ingestor again is the retry.
//! - [`FetchError::Empty`] - the query matched nothing. Not fatal.
//! - [`FetchError::Malformed`] - undecodable response body.
//! - [`FetchError::Auth`] - missing credentials or rejected token.

use std::fmt;

use reqwest::{RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;

use crate::{config::ConfigError, management::Record, types::Query};

pub mod genius;
pub mod lastfm;
pub mod spotify;

pub use genius::GeniusSource;
pub use lastfm::LastfmSource;
pub use spotify::SpotifySource;

#[derive(Debug)]
pub enum FetchError {
    Transient(String),
    Empty(String),
    Malformed(String),
    Auth(String),
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchError::Transient(msg) => write!(f, "request failed: {}", msg),
            FetchError::Empty(msg) => write!(f, "no results: {}", msg),
            FetchError::Malformed(msg) => write!(f, "malformed response: {}", msg),
            FetchError::Auth(msg) => write!(f, "authentication failed: {}", msg),
        }
    }
}

impl std::error::Error for FetchError {}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        FetchError::Transient(err.to_string())
    }
}

impl From<ConfigError> for FetchError {
    fn from(err: ConfigError) -> Self {
        FetchError::Auth(err.to_string())
    }
}

/// A remote catalog that yields ranked records.
#[allow(async_fn_in_trait)]
pub trait CatalogSource {
    type Record: Record;

    /// Human readable name of what this source yields, e.g. "Last.fm artists".
    fn label(&self) -> &'static str;

    /// Returns at most `limit` records ordered by the source's rank.
    async fn fetch(&mut self, query: &Query, limit: usize)
    -> Result<Vec<Self::Record>, FetchError>;
}

/// Sends a request and returns the status and raw body.
pub(crate) async fn send(
    request: RequestBuilder,
    context: &str,
) -> Result<(StatusCode, String), FetchError> {
    let response = request
        .send()
        .await
        .map_err(|e| FetchError::Transient(format!("{}: {}", context, e)))?;
    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| FetchError::Transient(format!("{}: {}", context, e)))?;
    Ok((status, body))
}

/// Sends a request, checks the status and decodes the JSON body into `T`.
pub(crate) async fn send_json<T: DeserializeOwned>(
    request: RequestBuilder,
    context: &str,
) -> Result<T, FetchError> {
    let (status, body) = send(request, context).await?;
    check_status(status, context)?;
    decode(&body, context)
}

pub fn check_status(status: StatusCode, context: &str) -> Result<(), FetchError> {
    if status.is_success() {
        return Ok(());
    }
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            Err(FetchError::Auth(format!("{}: HTTP {}", context, status)))
        }
        _ => Err(FetchError::Transient(format!("{}: HTTP {}", context, status))),
    }
}

pub fn decode<T: DeserializeOwned>(body: &str, context: &str) -> Result<T, FetchError> {
    serde_json::from_str(body).map_err(|e| FetchError::Malformed(format!("{}: {}", context, e)))
}
