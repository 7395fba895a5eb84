use reqwest::StatusCode;
use tunetally::management::{TokenManager, basic_auth_header, is_expired};
use tunetally::sources::genius::parse_search;
use tunetally::sources::lastfm::{parse_error_body, parse_top_artists};
use tunetally::sources::spotify::{build_song, parse_playlist_search, primary_genre};
use tunetally::sources::{FetchError, check_status, decode};
use tunetally::types::{ArtistObject, ArtistRef, Token, TrackObject};

const CHART_BODY: &str = r#"{
  "artists": {
    "artist": [
      {"name": "Taylor Swift", "listeners": "5000", "playcount": "900000", "@attr": {"rank": "1"}},
      {"name": "The Weeknd", "listeners": "4000", "playcount": "500000", "@attr": {"rank": "2"}},
      {"name": "Drake", "listeners": "3000", "playcount": "400000", "@attr": {"rank": "3"}}
    ]
  }
}"#;

#[test]
fn test_parse_chart_top_artists() {
    let artists = parse_top_artists(CHART_BODY, 10).unwrap();

    assert_eq!(artists.len(), 3);
    assert_eq!(artists[0].name, "Taylor Swift");
    assert_eq!(artists[0].listeners, 5000);
    assert_eq!(artists[0].playcount, 900000);
    assert_eq!(artists[2].rank, 3);
}

#[test]
fn test_parse_top_artists_truncates_to_limit() {
    let artists = parse_top_artists(CHART_BODY, 2).unwrap();
    let names: Vec<&str> = artists.iter().map(|a| a.name.as_str()).collect();
    assert_eq!(names, vec!["Taylor Swift", "The Weeknd"]);
}

#[test]
fn test_parse_geo_top_artists_without_rank_or_counters() {
    let body = r#"{"topartists": {"artist": [
        {"name": "Stromae", "listeners": "10"},
        {"name": "Angele"}
    ]}}"#;
    let artists = parse_top_artists(body, 10).unwrap();

    assert_eq!(artists[0].rank, 1);
    assert_eq!(artists[0].playcount, 0);
    assert_eq!(artists[1].name, "Angele");
    assert_eq!(artists[1].rank, 2);
    assert_eq!(artists[1].listeners, 0);
}

#[test]
fn test_parse_top_artists_failures() {
    let missing = parse_top_artists(r#"{"something": {}}"#, 10);
    assert!(matches!(missing, Err(FetchError::Malformed(_))));

    let not_json = parse_top_artists("<html>busy</html>", 10);
    assert!(matches!(not_json, Err(FetchError::Malformed(_))));

    let bad_counter =
        parse_top_artists(r#"{"artists": {"artist": [{"name": "X", "listeners": "many"}]}}"#, 10);
    assert!(matches!(bad_counter, Err(FetchError::Malformed(_))));

    let empty = parse_top_artists(r#"{"artists": {"artist": []}}"#, 10);
    assert!(matches!(empty, Err(FetchError::Empty(_))));
}

#[test]
fn test_parse_top_artists_rejects_rank_out_of_range() {
    let body = r#"{"artists": {"artist": [
        {"name": "X", "listeners": "1", "@attr": {"rank": "4294967296"}}
    ]}}"#;
    assert!(matches!(
        parse_top_artists(body, 10),
        Err(FetchError::Malformed(_))
    ));
}

#[test]
fn test_lastfm_error_body_classification() {
    let invalid_key = r#"{"error": 10, "message": "Invalid API key"}"#;
    assert!(matches!(parse_error_body(invalid_key), Some(FetchError::Auth(_))));

    let suspended = r#"{"error": 26, "message": "Suspended API key"}"#;
    assert!(matches!(parse_error_body(suspended), Some(FetchError::Auth(_))));

    let rate_limited = r#"{"error": 29, "message": "Rate limit exceeded"}"#;
    assert!(matches!(
        parse_error_body(rate_limited),
        Some(FetchError::Transient(_))
    ));

    assert!(parse_error_body(CHART_BODY).is_none());
    assert!(parse_error_body("not json").is_none());
}

#[test]
fn test_playlist_search_skips_null_items() {
    let body = r#"{"playlists": {"items": [null, {"id": "pl1", "name": "Billboard Hot 100"}]}}"#;
    let playlist = parse_playlist_search(body, "Billboard Hot 100").unwrap();
    assert_eq!(playlist.id, "pl1");

    let none = parse_playlist_search(r#"{"playlists": {"items": [null]}}"#, "Nothing");
    assert!(matches!(none, Err(FetchError::Empty(_))));
}

#[test]
fn test_primary_genre_defaults_to_unknown() {
    assert_eq!(primary_genre(&[]), "Unknown");
    assert_eq!(primary_genre(&[" ".to_string()]), "Unknown");
    assert_eq!(
        primary_genre(&["dance pop".to_string(), "pop".to_string()]),
        "dance pop"
    );
}

fn track(id: Option<&str>, artists: Vec<&str>) -> TrackObject {
    TrackObject {
        id: id.map(str::to_string),
        name: "Song".to_string(),
        artists: artists
            .into_iter()
            .map(|name| ArtistRef {
                id: Some(format!("id-{}", name)),
                name: name.to_string(),
            })
            .collect(),
    }
}

#[test]
fn test_build_song_uses_first_artist() {
    let artist = ArtistObject {
        id: "id-SZA".to_string(),
        name: "SZA".to_string(),
        popularity: 88,
        genres: vec!["r&b".to_string()],
    };
    let song = build_song(&track(Some("t1"), vec!["SZA", "Kendrick Lamar"]), Some(&artist), 4)
        .unwrap();

    assert_eq!(song.track_id, "t1");
    assert_eq!(song.artist_name, "SZA");
    assert_eq!(song.genre, "r&b");
    assert_eq!(song.popularity, 88);
    assert_eq!(song.rank, 4);
}

#[test]
fn test_build_song_rejects_unusable_tracks() {
    assert!(build_song(&track(None, vec!["SZA"]), None, 1).is_none());
    assert!(build_song(&track(Some("t1"), vec![]), None, 1).is_none());

    let unknown = build_song(&track(Some("t2"), vec!["Someone"]), None, 2).unwrap();
    assert_eq!(unknown.genre, "Unknown");
}

#[test]
fn test_genius_search_first_hit() {
    let body = r#"{"response": {"hits": [
        {"result": {"primary_artist": {"id": 1421, "name": "Kendrick Lamar"}}},
        {"result": {"primary_artist": {"id": 9, "name": "Other"}}}
    ]}}"#;
    let artist = parse_search(body).unwrap().unwrap();
    assert_eq!(artist.id, 1421);
    assert_eq!(artist.name, "Kendrick Lamar");

    assert!(parse_search(r#"{"response": {"hits": []}}"#).unwrap().is_none());
    assert!(matches!(parse_search("{}"), Err(FetchError::Malformed(_))));
}

#[test]
fn test_check_status_classification() {
    assert!(check_status(StatusCode::OK, "x").is_ok());
    assert!(matches!(
        check_status(StatusCode::UNAUTHORIZED, "x"),
        Err(FetchError::Auth(_))
    ));
    assert!(matches!(
        check_status(StatusCode::FORBIDDEN, "x"),
        Err(FetchError::Auth(_))
    ));
    assert!(matches!(
        check_status(StatusCode::BAD_GATEWAY, "x"),
        Err(FetchError::Transient(_))
    ));
}

#[test]
fn test_decode_failure_is_malformed() {
    let result: Result<Token, FetchError> = decode("[1, 2]", "token");
    assert!(matches!(result, Err(FetchError::Malformed(_))));
}

#[test]
fn test_basic_auth_header() {
    assert_eq!(basic_auth_header("abc", "def"), "Basic YWJjOmRlZg==");
}

#[test]
fn test_token_expiry_margin() {
    let token = Token {
        access_token: "t".to_string(),
        token_type: "Bearer".to_string(),
        expires_in: 3600,
        obtained_at: 1_000,
    };

    assert!(!is_expired(&token, 1_000));
    assert!(!is_expired(&token, 1_000 + 3600 - 241));
    assert!(is_expired(&token, 1_000 + 3600 - 240));
    assert!(is_expired(&token, 10_000));
}

fn token_cache_path(name: &str) -> std::path::PathBuf {
    std::env::temp_dir()
        .join(format!("tunetally_tokens_{}", std::process::id()))
        .join(name)
}

#[tokio::test]
async fn test_token_cache_round_trip() {
    let path = token_cache_path("round_trip/spotify_token.json");
    let token = Token {
        access_token: "cached".to_string(),
        token_type: "Bearer".to_string(),
        expires_in: 3600,
        obtained_at: 1_700_000_000,
    };
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(&path, serde_json::to_string(&token).unwrap()).unwrap();

    let manager = TokenManager::load(path.clone()).await.unwrap();
    std::fs::remove_file(&path).unwrap();
    manager.persist().await.unwrap();

    let written: Token = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(written.access_token, "cached");
    assert_eq!(written.expires_in, 3600);
    assert_eq!(written.obtained_at, 1_700_000_000);

    let _ = std::fs::remove_file(&path);
}

#[tokio::test]
async fn test_unreadable_token_cache_starts_empty() {
    let missing = token_cache_path("missing/spotify_token.json");
    assert!(TokenManager::load(missing.clone()).await.is_err());

    // Nothing to write without a token
    let manager = TokenManager::load_or_new(missing.clone()).await;
    manager.persist().await.unwrap();
    assert!(!missing.exists());

    let garbage = token_cache_path("garbage/spotify_token.json");
    std::fs::create_dir_all(garbage.parent().unwrap()).unwrap();
    std::fs::write(&garbage, "{ not a token").unwrap();
    assert!(TokenManager::load(garbage.clone()).await.is_err());

    let manager = TokenManager::load_or_new(garbage.clone()).await;
    manager.persist().await.unwrap();
    assert_eq!(std::fs::read_to_string(&garbage).unwrap(), "{ not a token");

    let _ = std::fs::remove_file(&garbage);
}
