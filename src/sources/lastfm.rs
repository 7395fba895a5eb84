use reqwest::{Client, Url};

use crate::{
    config::LastfmSettings,
    sources::{CatalogSource, FetchError, check_status, decode, send},
    types::{LastfmArtist, LastfmErrorResponse, LastfmTopArtistsResponse, Query},
};

// https://www.last.fm/api/errorcodes
const LASTFM_INVALID_API_KEY: u32 = 10;
const LASTFM_SUSPENDED_API_KEY: u32 = 26;

/// Top artists from Last.fm: the global chart for an empty query, or the
/// chart of the country named by the first query term.
pub struct LastfmSource {
    client: Client,
    settings: LastfmSettings,
}

impl LastfmSource {
    pub fn new(settings: LastfmSettings) -> Result<Self, FetchError> {
        settings.api_key()?;
        Ok(Self {
            client: Client::new(),
            settings,
        })
    }

    fn top_artists_url(&self, query: &Query, limit: usize) -> Result<Url, FetchError> {
        let api_key = self.settings.api_key()?;
        let limit = limit.to_string();
        let mut params: Vec<(&str, &str)> = vec![
            ("api_key", api_key),
            ("format", "json"),
            ("limit", &limit),
            ("page", "1"),
        ];
        match query.first() {
            Some(country) => {
                params.push(("method", "geo.gettopartists"));
                params.push(("country", country));
            }
            None => params.push(("method", "chart.gettopartists")),
        }

        Url::parse_with_params(&self.settings.api_url, &params)
            .map_err(|e| FetchError::Transient(format!("invalid Last.fm url: {}", e)))
    }
}

impl CatalogSource for LastfmSource {
    type Record = LastfmArtist;

    fn label(&self) -> &'static str {
        "Last.fm artists"
    }

    async fn fetch(&mut self, query: &Query, limit: usize) -> Result<Vec<LastfmArtist>, FetchError> {
        let url = self.top_artists_url(query, limit)?;
        let (status, body) = send(self.client.get(url), "Last.fm top artists").await?;

        // Last.fm reports API errors as a JSON body, usually alongside a 4xx.
        if let Some(err) = parse_error_body(&body) {
            return Err(err);
        }
        check_status(status, "Last.fm top artists")?;

        parse_top_artists(&body, limit)
    }
}

/// Classifies a Last.fm error body. Returns `None` when `body` is not one.
pub fn parse_error_body(body: &str) -> Option<FetchError> {
    let err = serde_json::from_str::<LastfmErrorResponse>(body).ok()?;
    Some(match err.error {
        LASTFM_INVALID_API_KEY | LASTFM_SUSPENDED_API_KEY => {
            FetchError::Auth(format!("Last.fm error {}: {}", err.error, err.message))
        }
        _ => FetchError::Transient(format!("Last.fm error {}: {}", err.error, err.message)),
    })
}

/// Decodes a `chart.gettopartists` or `geo.gettopartists` body.
///
/// Counters arrive as strings and default to 0 when absent. The rank comes
/// from `@attr.rank` and falls back to the 1-based position in the list.
pub fn parse_top_artists(body: &str, limit: usize) -> Result<Vec<LastfmArtist>, FetchError> {
    let response: LastfmTopArtistsResponse = decode(body, "Last.fm top artists")?;
    let list = response.artists.or(response.topartists).ok_or_else(|| {
        FetchError::Malformed("Last.fm top artists: missing artists list".to_string())
    })?;

    let mut artists = Vec::with_capacity(list.artist.len());
    for (idx, entry) in list.artist.into_iter().enumerate() {
        let rank = match entry.attr {
            Some(attr) => {
                let rank = parse_number(&attr.rank, "rank", &entry.name)?;
                u32::try_from(rank).map_err(|_| {
                    FetchError::Malformed(format!(
                        "Last.fm artist {:?}: rank out of range: {}",
                        entry.name, rank
                    ))
                })?
            }
            None => idx as u32 + 1,
        };
        let listeners = match entry.listeners.as_deref() {
            Some(raw) => parse_number(raw, "listeners", &entry.name)?,
            None => 0,
        };
        let playcount = match entry.playcount.as_deref() {
            Some(raw) => parse_number(raw, "playcount", &entry.name)?,
            None => 0,
        };

        artists.push(LastfmArtist {
            name: entry.name,
            listeners,
            playcount,
            rank,
        });
    }

    if artists.is_empty() {
        return Err(FetchError::Empty("Last.fm returned no artists".to_string()));
    }

    artists.sort_by_key(|a| a.rank);
    artists.truncate(limit);
    Ok(artists)
}

fn parse_number(raw: &str, field: &str, artist: &str) -> Result<u64, FetchError> {
    raw.trim().parse::<u64>().map_err(|_| {
        FetchError::Malformed(format!(
            "Last.fm artist {:?}: {} is not a number: {:?}",
            artist, field, raw
        ))
    })
}
