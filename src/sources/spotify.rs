use std::collections::HashMap;

use reqwest::{Client, Url};

use crate::{
    config::SpotifySettings,
    management::TokenManager,
    sources::{CatalogSource, FetchError, decode, send_json},
    types::{
        ArtistObject, PlaylistRef, PlaylistSearchResponse, PlaylistTracksPage, Query, SpotifySong,
        TrackObject, UNKNOWN_GENRE,
    },
};

/// Largest page `/playlists/{id}/tracks` serves.
const TRACKS_PAGE_LIMIT: usize = 100;

/// Songs of a Spotify playlist, each tagged with the popularity and first
/// genre of its first artist. The query's first term is the playlist name.
pub struct SpotifySource {
    client: Client,
    settings: SpotifySettings,
    tokens: TokenManager,
    artists: HashMap<String, ArtistObject>,
}

impl SpotifySource {
    pub async fn new(settings: SpotifySettings) -> Result<Self, FetchError> {
        settings.credentials()?;
        let tokens = TokenManager::load_or_new(settings.token_cache.clone()).await;
        Ok(Self {
            client: Client::new(),
            settings,
            tokens,
            artists: HashMap::new(),
        })
    }

    /// Query for the configured playlist.
    pub fn default_query(&self) -> Query {
        Query::single(&self.settings.playlist)
    }

    async fn token(&mut self) -> Result<String, FetchError> {
        self.tokens
            .get_valid_token(&self.client, &self.settings)
            .await
    }

    fn api_url(&self, path: &str) -> String {
        format!("{}/{}", self.settings.api_url.trim_end_matches('/'), path)
    }

    async fn find_playlist(&mut self, name: &str) -> Result<PlaylistRef, FetchError> {
        let token = self.token().await?;
        let url = Url::parse_with_params(
            &self.api_url("search"),
            &[("q", name), ("type", "playlist"), ("limit", "1")],
        )
        .map_err(|e| FetchError::Transient(format!("invalid Spotify url: {}", e)))?;

        let response: PlaylistSearchResponse = send_json(
            self.client.get(url).bearer_auth(token),
            "Spotify playlist search",
        )
        .await?;
        first_playlist(response, name)
    }

    async fn playlist_tracks(
        &mut self,
        playlist_id: &str,
        limit: usize,
    ) -> Result<Vec<TrackObject>, FetchError> {
        let mut tracks: Vec<TrackObject> = Vec::new();
        let mut next = Some(format!(
            "{}?limit={}&offset=0",
            self.api_url(&format!("playlists/{}/tracks", playlist_id)),
            limit.clamp(1, TRACKS_PAGE_LIMIT)
        ));

        while let Some(page_url) = next {
            if tracks.len() >= limit {
                break;
            }
            let token = self.token().await?;
            let page: PlaylistTracksPage = send_json(
                self.client.get(&page_url).bearer_auth(token),
                "Spotify playlist tracks",
            )
            .await?;

            tracks.extend(page.items.into_iter().filter_map(|item| item.track));
            next = page.next;
        }

        tracks.truncate(limit);
        Ok(tracks)
    }

    async fn artist(&mut self, artist_id: &str) -> Result<ArtistObject, FetchError> {
        if let Some(artist) = self.artists.get(artist_id) {
            return Ok(artist.clone());
        }

        let token = self.token().await?;
        let artist: ArtistObject = send_json(
            self.client
                .get(self.api_url(&format!("artists/{}", artist_id)))
                .bearer_auth(token),
            "Spotify artist",
        )
        .await?;

        self.artists.insert(artist_id.to_string(), artist.clone());
        Ok(artist)
    }
}

impl CatalogSource for SpotifySource {
    type Record = SpotifySong;

    fn label(&self) -> &'static str {
        "Spotify songs"
    }

    async fn fetch(&mut self, query: &Query, limit: usize) -> Result<Vec<SpotifySong>, FetchError> {
        let name = query
            .first()
            .map(str::to_string)
            .unwrap_or_else(|| self.settings.playlist.clone());

        let playlist = self.find_playlist(&name).await?;
        let tracks = self.playlist_tracks(&playlist.id, limit).await?;

        let mut songs = Vec::with_capacity(tracks.len());
        for (idx, track) in tracks.iter().enumerate() {
            let artist_id = track.artists.first().and_then(|a| a.id.clone());
            let artist = match artist_id {
                Some(id) => Some(self.artist(&id).await?),
                None => None,
            };
            if let Some(song) = build_song(track, artist.as_ref(), idx as u32 + 1) {
                songs.push(song);
            }
        }

        if songs.is_empty() {
            return Err(FetchError::Empty(format!(
                "playlist {:?} has no playable tracks",
                playlist.name
            )));
        }
        Ok(songs)
    }
}

/// Decodes a playlist search body and returns the first playlist.
pub fn parse_playlist_search(body: &str, name: &str) -> Result<PlaylistRef, FetchError> {
    let response: PlaylistSearchResponse = decode(body, "Spotify playlist search")?;
    first_playlist(response, name)
}

fn first_playlist(response: PlaylistSearchResponse, name: &str) -> Result<PlaylistRef, FetchError> {
    response
        .playlists
        .items
        .into_iter()
        .flatten()
        .next()
        .ok_or_else(|| FetchError::Empty(format!("no playlist found with name {:?}", name)))
}

/// First genre of the list or `"Unknown"`.
pub fn primary_genre(genres: &[String]) -> String {
    genres
        .iter()
        .map(|g| g.trim())
        .find(|g| !g.is_empty())
        .unwrap_or(UNKNOWN_GENRE)
        .to_string()
}

/// Flattens a playlist track and its first artist's details into a song.
/// Returns `None` for local files and tracks without any artist.
pub fn build_song(track: &TrackObject, artist: Option<&ArtistObject>, rank: u32) -> Option<SpotifySong> {
    let track_id = track.id.clone()?;
    let first_artist = track.artists.first()?;

    Some(SpotifySong {
        track_id,
        name: track.name.clone(),
        artist_name: first_artist.name.clone(),
        popularity: artist.map(|a| a.popularity).unwrap_or(0),
        genre: artist
            .map(|a| primary_genre(&a.genres))
            .unwrap_or_else(|| UNKNOWN_GENRE.to_string()),
        rank,
    })
}
