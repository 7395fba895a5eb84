use reqwest::{Client, Url};

use crate::{
    config::GeniusSettings,
    sources::{CatalogSource, FetchError, decode, send_json},
    types::{GeniusArtist, GeniusPrimaryArtist, GeniusSearchResponse, Query},
};

/// Resolves a ranked list of artist names to Genius artist ids. The query
/// terms are the names; a name's position is its rank.
pub struct GeniusSource {
    client: Client,
    settings: GeniusSettings,
}

impl GeniusSource {
    pub fn new(settings: GeniusSettings) -> Result<Self, FetchError> {
        settings.access_token()?;
        Ok(Self {
            client: Client::new(),
            settings,
        })
    }

    /// Query over the configured artist list.
    pub fn default_query(&self) -> Query {
        Query::new(self.settings.artists.clone())
    }

    async fn search(&self, name: &str) -> Result<Option<GeniusPrimaryArtist>, FetchError> {
        let url = Url::parse_with_params(
            &format!("{}/search", self.settings.api_url.trim_end_matches('/')),
            &[("q", name), ("access_token", self.settings.access_token()?)],
        )
        .map_err(|e| FetchError::Transient(format!("invalid Genius url: {}", e)))?;

        let response: GeniusSearchResponse = send_json(self.client.get(url), "Genius search").await?;
        Ok(first_primary_artist(response))
    }
}

impl CatalogSource for GeniusSource {
    type Record = GeniusArtist;

    fn label(&self) -> &'static str {
        "Genius artists"
    }

    async fn fetch(&mut self, query: &Query, limit: usize) -> Result<Vec<GeniusArtist>, FetchError> {
        let mut artists = Vec::new();
        for (idx, name) in query.terms.iter().take(limit).enumerate() {
            if let Some(primary) = self.search(name).await? {
                artists.push(GeniusArtist {
                    genius_id: primary.id,
                    name: primary.name,
                    rank: idx as u32 + 1,
                });
            }
        }

        if artists.is_empty() {
            return Err(FetchError::Empty(
                "Genius search found none of the requested artists".to_string(),
            ));
        }
        Ok(artists)
    }
}

/// Decodes a Genius search body and returns the primary artist of the first
/// hit, if any.
pub fn parse_search(body: &str) -> Result<Option<GeniusPrimaryArtist>, FetchError> {
    let response: GeniusSearchResponse = decode(body, "Genius search")?;
    Ok(first_primary_artist(response))
}

fn first_primary_artist(response: GeniusSearchResponse) -> Option<GeniusPrimaryArtist> {
    response
        .response
        .hits
        .into_iter()
        .next()
        .map(|hit| hit.result.primary_artist)
}
