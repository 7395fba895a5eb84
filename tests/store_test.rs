use tunetally::management::{Store, StoreError};
use tunetally::types::{GeniusArtist, LastfmArtist, NaturalKey, SpotifySong};

// Helper function to create a Last.fm artist
fn lastfm(name: &str, listeners: u64, playcount: u64, rank: u32) -> LastfmArtist {
    LastfmArtist {
        name: name.to_string(),
        listeners,
        playcount,
        rank,
    }
}

// Helper function to create a Spotify song
fn song(track_id: &str, artist: &str, genre: &str, rank: u32) -> SpotifySong {
    SpotifySong {
        track_id: track_id.to_string(),
        name: format!("Song {}", track_id),
        artist_name: artist.to_string(),
        popularity: 80,
        genre: genre.to_string(),
        rank,
    }
}

fn temp_db_path(name: &str) -> std::path::PathBuf {
    std::env::temp_dir().join(format!(
        "tunetally_{}_{}.db",
        name,
        std::process::id()
    ))
}

#[test]
fn test_empty_store_counts_zero() {
    let store = Store::open_in_memory().unwrap();

    assert_eq!(store.count::<LastfmArtist>().unwrap(), 0);
    assert_eq!(store.count::<GeniusArtist>().unwrap(), 0);
    assert_eq!(store.count::<SpotifySong>().unwrap(), 0);
}

#[test]
fn test_insert_and_exists_by_key() {
    let mut store = Store::open_in_memory().unwrap();
    store.insert(&lastfm("Drake", 10, 100, 1)).unwrap();

    assert_eq!(store.count::<LastfmArtist>().unwrap(), 1);
    assert!(
        store
            .exists_by_key::<LastfmArtist>(&NaturalKey::Text("Drake".to_string()))
            .unwrap()
    );
    assert!(
        !store
            .exists_by_key::<LastfmArtist>(&NaturalKey::Text("Adele".to_string()))
            .unwrap()
    );
}

#[test]
fn test_insert_duplicate_key_is_rejected() {
    let mut store = Store::open_in_memory().unwrap();
    store.insert(&lastfm("Drake", 10, 100, 1)).unwrap();

    // Same name, different numbers and rank: still the same natural key
    let err = store.insert(&lastfm("Drake", 20, 200, 7)).unwrap_err();
    match err {
        StoreError::DuplicateKey { table, key } => {
            assert_eq!(table, "lastfm_top_artists");
            assert_eq!(key, NaturalKey::Text("Drake".to_string()));
        }
        other => panic!("expected DuplicateKey, got {:?}", other),
    }

    // The first row is untouched
    let rows = store.query_ordered::<LastfmArtist>(10).unwrap();
    assert_eq!(rows, vec![lastfm("Drake", 10, 100, 1)]);
}

#[test]
fn test_insert_if_absent_skips_existing_key() {
    let mut store = Store::open_in_memory().unwrap();

    assert!(store.insert_if_absent(&lastfm("Drake", 10, 100, 1)).unwrap());
    assert!(!store.insert_if_absent(&lastfm("Drake", 10, 100, 1)).unwrap());
    assert!(store.insert_if_absent(&lastfm("Adele", 5, 50, 2)).unwrap());

    assert_eq!(store.count::<LastfmArtist>().unwrap(), 2);
}

#[test]
fn test_surrogate_ids_increase_monotonically() {
    let mut store = Store::open_in_memory().unwrap();
    store.insert(&lastfm("Drake", 10, 100, 3)).unwrap();
    store.insert(&lastfm("Adele", 10, 100, 1)).unwrap();
    store.insert(&lastfm("Queen", 10, 100, 2)).unwrap();

    let ids: Vec<i64> = ["Drake", "Adele", "Queen"]
        .iter()
        .map(|name| {
            store
                .row_id::<LastfmArtist>(&NaturalKey::Text(name.to_string()))
                .unwrap()
                .unwrap()
        })
        .collect();

    assert!(ids[0] < ids[1] && ids[1] < ids[2]);
    assert_eq!(
        store
            .row_id::<LastfmArtist>(&NaturalKey::Text("Nobody".to_string()))
            .unwrap(),
        None
    );
}

#[test]
fn test_genius_artist_keyed_by_integer_id() {
    let mut store = Store::open_in_memory().unwrap();
    let beatles = GeniusArtist {
        genius_id: 586,
        name: "The Beatles".to_string(),
        rank: 1,
    };
    store.insert(&beatles).unwrap();

    assert!(
        store
            .exists_by_key::<GeniusArtist>(&NaturalKey::Id(586))
            .unwrap()
    );

    // A different name under the same id is a duplicate
    let renamed = GeniusArtist {
        name: "Beatles".to_string(),
        ..beatles.clone()
    };
    assert!(matches!(
        store.insert(&renamed),
        Err(StoreError::DuplicateKey { .. })
    ));
    assert_eq!(
        store.row_id::<GeniusArtist>(&NaturalKey::Id(586)).unwrap(),
        Some(586)
    );
}

#[test]
fn test_query_ordered_sorts_by_rank_and_limits() {
    let mut store = Store::open_in_memory().unwrap();
    store.insert(&lastfm("C", 1, 1, 3)).unwrap();
    store.insert(&lastfm("A", 1, 1, 1)).unwrap();
    store.insert(&lastfm("B", 1, 1, 2)).unwrap();

    let rows = store.query_ordered::<LastfmArtist>(2).unwrap();
    let names: Vec<&str> = rows.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["A", "B"]);
}

#[test]
fn test_spotify_songs_reuse_artist_and_genre_rows() {
    let mut store = Store::open_in_memory().unwrap();
    store.insert(&song("t1", "SZA", "r&b", 1)).unwrap();
    store.insert(&song("t2", "SZA", "r&b", 2)).unwrap();
    store.insert(&song("t3", "Morgan Wallen", "Unknown", 3)).unwrap();

    let counts: Vec<(String, u64)> = store
        .table_counts()
        .unwrap()
        .into_iter()
        .map(|row| (row.table, row.rows))
        .collect();

    assert!(counts.contains(&("spotify_songs".to_string(), 3)));
    assert!(counts.contains(&("spotify_artists".to_string(), 2)));
    assert!(counts.contains(&("spotify_genres".to_string(), 2)));

    let rows = store.query_ordered::<SpotifySong>(10).unwrap();
    assert_eq!(rows[2], song("t3", "Morgan Wallen", "Unknown", 3));
}

#[test]
fn test_duplicate_song_leaves_no_orphan_rows() {
    let mut store = Store::open_in_memory().unwrap();
    store.insert(&song("t1", "SZA", "r&b", 1)).unwrap();

    // Same track id with a new artist and genre: rejected as a whole
    let err = store.insert(&song("t1", "Someone Else", "polka", 1));
    assert!(matches!(err, Err(StoreError::DuplicateKey { .. })));
    assert!(!store.insert_if_absent(&song("t1", "Someone Else", "polka", 1)).unwrap());

    let counts: Vec<(String, u64)> = store
        .table_counts()
        .unwrap()
        .into_iter()
        .map(|row| (row.table, row.rows))
        .collect();
    assert!(counts.contains(&("spotify_artists".to_string(), 1)));
    assert!(counts.contains(&("spotify_genres".to_string(), 1)));
}

#[test]
fn test_store_file_survives_reopen() {
    let path = temp_db_path("reopen");
    let _ = std::fs::remove_file(&path);

    {
        let mut store = Store::open(&path).unwrap();
        store.insert(&lastfm("Drake", 10, 100, 1)).unwrap();
    }

    {
        let mut store = Store::open(&path).unwrap();
        assert_eq!(store.count::<LastfmArtist>().unwrap(), 1);
        assert!(!store.insert_if_absent(&lastfm("Drake", 10, 100, 1)).unwrap());
    }

    let _ = std::fs::remove_file(&path);
}
