use std::path::PathBuf;

use base64::{Engine, engine::general_purpose::STANDARD};
use chrono::Utc;
use reqwest::{Client, StatusCode, header::AUTHORIZATION};

use crate::{
    config::SpotifySettings,
    sources::{FetchError, check_status, decode, send},
    types::{ClientCredentialsResponse, Token},
};

/// Seconds before expiry at which a cached token is already treated as stale.
const EXPIRY_MARGIN_SECS: u64 = 240;

/// Caches the Spotify client-credentials token on disk and exchanges a new
/// one when the cached token is missing or about to expire.
pub struct TokenManager {
    path: PathBuf,
    token: Option<Token>,
}

impl TokenManager {
    pub fn new(path: PathBuf) -> Self {
        TokenManager { path, token: None }
    }

    pub async fn load(path: PathBuf) -> Result<Self, String> {
        let content = async_fs::read_to_string(&path)
            .await
            .map_err(|e| e.to_string())?;
        let token: Token = serde_json::from_str(&content).map_err(|e| e.to_string())?;
        Ok(Self {
            path,
            token: Some(token),
        })
    }

    /// Loads the cached token, starting empty when there is none.
    pub async fn load_or_new(path: PathBuf) -> Self {
        match Self::load(path.clone()).await {
            Ok(mgr) => mgr,
            Err(_) => Self::new(path),
        }
    }

    pub async fn persist(&self) -> Result<(), String> {
        let Some(token) = &self.token else {
            return Ok(());
        };
        if let Some(parent) = self.path.parent() {
            async_fs::create_dir_all(parent)
                .await
                .map_err(|e| e.to_string())?;
        }

        let json = serde_json::to_string_pretty(token).map_err(|e| e.to_string())?;
        async_fs::write(&self.path, json)
            .await
            .map_err(|e| e.to_string())
    }

    pub async fn get_valid_token(
        &mut self,
        client: &Client,
        settings: &SpotifySettings,
    ) -> Result<String, FetchError> {
        let now = Utc::now().timestamp() as u64;
        if let Some(token) = &self.token {
            if !is_expired(token, now) {
                return Ok(token.access_token.clone());
            }
        }

        let token = request_token(client, settings).await?;
        let access_token = token.access_token.clone();
        self.token = Some(token);
        // a failed cache write only costs a token exchange next run
        let _ = self.persist().await;

        Ok(access_token)
    }
}

pub fn is_expired(token: &Token, now: u64) -> bool {
    now + EXPIRY_MARGIN_SECS >= token.obtained_at + token.expires_in
}

/// `Basic base64(client_id:client_secret)`
pub fn basic_auth_header(client_id: &str, client_secret: &str) -> String {
    let encoded = STANDARD.encode(format!("{}:{}", client_id, client_secret));
    format!("Basic {}", encoded)
}

async fn request_token(client: &Client, settings: &SpotifySettings) -> Result<Token, FetchError> {
    let (client_id, client_secret) = settings.credentials()?;

    let request = client
        .post(&settings.token_url)
        .header(AUTHORIZATION, basic_auth_header(client_id, client_secret))
        .form(&[("grant_type", "client_credentials")]);

    let (status, body) = send(request, "Spotify token exchange").await?;
    // invalid_client and invalid_grant come back as 400
    if status == StatusCode::BAD_REQUEST {
        return Err(FetchError::Auth(format!(
            "Spotify token exchange: HTTP {}: {}",
            status, body
        )));
    }
    check_status(status, "Spotify token exchange")?;
    let res: ClientCredentialsResponse = decode(&body, "Spotify token exchange")?;

    Ok(Token {
        access_token: res.access_token,
        token_type: res.token_type,
        expires_in: res.expires_in,
        obtained_at: Utc::now().timestamp() as u64,
    })
}
