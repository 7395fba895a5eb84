use rusqlite::{Connection, Row, params};

use crate::types::{GeniusArtist, LastfmArtist, NaturalKey, SpotifySong};

/// A catalog record the store knows how to persist.
///
/// Each implementor owns one table (Spotify songs also own their artist and
/// genre lookup tables) whose natural key is declared `UNIQUE` or
/// `PRIMARY KEY` in `SCHEMA`, so the store never relies on application code
/// alone for uniqueness.
pub trait Record: Sized {
    const TABLE: &'static str;
    const KEY_COLUMN: &'static str;
    /// Idempotent DDL, run every time a store is opened.
    const SCHEMA: &'static str;
    /// Selects rows ordered by rank; `?1` is the row limit.
    const SELECT_ORDERED: &'static str;

    fn natural_key(&self) -> NaturalKey;
    fn rank(&self) -> u32;

    /// Writes the record. Fails with a constraint violation when the key exists.
    fn write(&self, conn: &Connection) -> rusqlite::Result<()>;
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self>;
}

impl Record for LastfmArtist {
    const TABLE: &'static str = "lastfm_top_artists";
    const KEY_COLUMN: &'static str = "artist_name";
    const SCHEMA: &'static str = r#"
        CREATE TABLE IF NOT EXISTS lastfm_top_artists (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            artist_name TEXT NOT NULL UNIQUE,
            listeners INTEGER NOT NULL,
            playcount INTEGER NOT NULL,
            rank INTEGER NOT NULL
        );
    "#;
    const SELECT_ORDERED: &'static str = r#"
        SELECT artist_name, listeners, playcount, rank
        FROM lastfm_top_artists
        ORDER BY rank ASC, id ASC
        LIMIT ?1
    "#;

    fn natural_key(&self) -> NaturalKey {
        NaturalKey::Text(self.name.clone())
    }

    fn rank(&self) -> u32 {
        self.rank
    }

    fn write(&self, conn: &Connection) -> rusqlite::Result<()> {
        conn.execute(
            "INSERT INTO lastfm_top_artists (artist_name, listeners, playcount, rank) VALUES (?1, ?2, ?3, ?4)",
            params![
                self.name,
                self.listeners as i64,
                self.playcount as i64,
                self.rank
            ],
        )?;
        Ok(())
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            name: row.get(0)?,
            listeners: row.get::<_, i64>(1)?.max(0) as u64,
            playcount: row.get::<_, i64>(2)?.max(0) as u64,
            rank: row.get(3)?,
        })
    }
}

impl Record for GeniusArtist {
    const TABLE: &'static str = "genius_artists";
    const KEY_COLUMN: &'static str = "genius_artist_id";
    const SCHEMA: &'static str = r#"
        CREATE TABLE IF NOT EXISTS genius_artists (
            genius_artist_id INTEGER PRIMARY KEY,
            artist_name TEXT NOT NULL,
            rank INTEGER NOT NULL
        );
    "#;
    const SELECT_ORDERED: &'static str = r#"
        SELECT genius_artist_id, artist_name, rank
        FROM genius_artists
        ORDER BY rank ASC, genius_artist_id ASC
        LIMIT ?1
    "#;

    fn natural_key(&self) -> NaturalKey {
        NaturalKey::Id(self.genius_id)
    }

    fn rank(&self) -> u32 {
        self.rank
    }

    fn write(&self, conn: &Connection) -> rusqlite::Result<()> {
        conn.execute(
            "INSERT INTO genius_artists (genius_artist_id, artist_name, rank) VALUES (?1, ?2, ?3)",
            params![self.genius_id, self.name, self.rank],
        )?;
        Ok(())
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            genius_id: row.get(0)?,
            name: row.get(1)?,
            rank: row.get(2)?,
        })
    }
}

impl Record for SpotifySong {
    const TABLE: &'static str = "spotify_songs";
    const KEY_COLUMN: &'static str = "spotify_track_id";
    const SCHEMA: &'static str = r#"
        CREATE TABLE IF NOT EXISTS spotify_artists (
            artist_id INTEGER PRIMARY KEY AUTOINCREMENT,
            artist_name TEXT NOT NULL UNIQUE
        );

        CREATE TABLE IF NOT EXISTS spotify_genres (
            genre_id INTEGER PRIMARY KEY AUTOINCREMENT,
            genre_name TEXT NOT NULL UNIQUE
        );

        CREATE TABLE IF NOT EXISTS spotify_songs (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            spotify_track_id TEXT NOT NULL UNIQUE,
            song_name TEXT NOT NULL,
            artist_id INTEGER NOT NULL REFERENCES spotify_artists(artist_id),
            popularity INTEGER NOT NULL,
            genre_id INTEGER NOT NULL REFERENCES spotify_genres(genre_id),
            rank INTEGER NOT NULL
        );

        CREATE INDEX IF NOT EXISTS spotify_songs_genre_idx ON spotify_songs(genre_id);
    "#;
    const SELECT_ORDERED: &'static str = r#"
        SELECT s.spotify_track_id, s.song_name, a.artist_name, s.popularity, g.genre_name, s.rank
        FROM spotify_songs s
        JOIN spotify_artists a ON s.artist_id = a.artist_id
        JOIN spotify_genres g ON s.genre_id = g.genre_id
        ORDER BY s.rank ASC, s.id ASC
        LIMIT ?1
    "#;

    fn natural_key(&self) -> NaturalKey {
        NaturalKey::Text(self.track_id.clone())
    }

    fn rank(&self) -> u32 {
        self.rank
    }

    fn write(&self, conn: &Connection) -> rusqlite::Result<()> {
        let artist_id = lookup_id(
            conn,
            "INSERT OR IGNORE INTO spotify_artists (artist_name) VALUES (?1)",
            "SELECT artist_id FROM spotify_artists WHERE artist_name = ?1",
            &self.artist_name,
        )?;
        let genre_id = lookup_id(
            conn,
            "INSERT OR IGNORE INTO spotify_genres (genre_name) VALUES (?1)",
            "SELECT genre_id FROM spotify_genres WHERE genre_name = ?1",
            &self.genre,
        )?;

        conn.execute(
            "INSERT INTO spotify_songs (spotify_track_id, song_name, artist_id, popularity, genre_id, rank) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                self.track_id,
                self.name,
                artist_id,
                self.popularity,
                genre_id,
                self.rank
            ],
        )?;
        Ok(())
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            track_id: row.get(0)?,
            name: row.get(1)?,
            artist_name: row.get(2)?,
            popularity: row.get(3)?,
            genre: row.get(4)?,
            rank: row.get(5)?,
        })
    }
}

/// Inserts a lookup value if missing and returns its surrogate id.
fn lookup_id(conn: &Connection, insert: &str, select: &str, value: &str) -> rusqlite::Result<i64> {
    conn.execute(insert, params![value])?;
    conn.query_row(select, params![value], |row| row.get(0))
}
