use std::{fmt, fs, path::Path};

use rusqlite::{Connection, OptionalExtension, TransactionBehavior, ffi, params};

use crate::{
    management::Record,
    types::{GeniusArtist, LastfmArtist, NaturalKey, SpotifySong, TableCountRow},
};

/// Tables listed by `tunetally info`, in display order.
pub const STORED_TABLES: &[&str] = &[
    LastfmArtist::TABLE,
    GeniusArtist::TABLE,
    SpotifySong::TABLE,
    "spotify_artists",
    "spotify_genres",
];

#[derive(Debug)]
pub enum StoreError {
    Io(std::io::Error),
    Database(rusqlite::Error),
    DuplicateKey { table: &'static str, key: NaturalKey },
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Io(error) => write!(f, "filesystem error: {error}"),
            StoreError::Database(error) => write!(f, "database error: {error}"),
            StoreError::DuplicateKey { table, key } => {
                write!(f, "{table} already contains key {key}")
            }
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StoreError::Io(error) => Some(error),
            StoreError::Database(error) => Some(error),
            StoreError::DuplicateKey { .. } => None,
        }
    }
}

impl From<std::io::Error> for StoreError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Database(value)
    }
}

/// SQLite-backed dedup store. The connection lives as long as the store and
/// is closed when it is dropped.
pub struct Store {
    conn: Connection,
}

impl Store {
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        Self::from_connection(Connection::open(path)?)
    }

    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self, StoreError> {
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        conn.execute_batch(LastfmArtist::SCHEMA)?;
        conn.execute_batch(GeniusArtist::SCHEMA)?;
        conn.execute_batch(SpotifySong::SCHEMA)?;
        Ok(Self { conn })
    }

    pub fn count<R: Record>(&self) -> Result<u64, StoreError> {
        Ok(count_table(&self.conn, R::TABLE)?)
    }

    pub fn exists_by_key<R: Record>(&self, key: &NaturalKey) -> Result<bool, StoreError> {
        Ok(key_exists::<R>(&self.conn, key)?)
    }

    /// Persists `record` in its own transaction. A key that is already stored
    /// is rejected by the table's unique constraint and reported as
    /// `StoreError::DuplicateKey`.
    pub fn insert<R: Record>(&mut self, record: &R) -> Result<(), StoreError> {
        let tx = self.conn.transaction()?;
        match record.write(&tx) {
            Ok(()) => {
                tx.commit()?;
                Ok(())
            }
            Err(err) if is_unique_violation(&err) => Err(StoreError::DuplicateKey {
                table: R::TABLE,
                key: record.natural_key(),
            }),
            Err(err) => Err(err.into()),
        }
    }

    /// Writes `record` unless its key is already stored. The check and the
    /// write share one immediate transaction. Returns whether a row was
    /// written.
    pub fn insert_if_absent<R: Record>(&mut self, record: &R) -> Result<bool, StoreError> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        if key_exists::<R>(&tx, &record.natural_key())? {
            return Ok(false);
        }
        match record.write(&tx) {
            Ok(()) => {
                tx.commit()?;
                Ok(true)
            }
            Err(err) if is_unique_violation(&err) => Ok(false),
            Err(err) => Err(err.into()),
        }
    }

    /// Up to `limit` rows ordered by rank ascending.
    pub fn query_ordered<R: Record>(&self, limit: usize) -> Result<Vec<R>, StoreError> {
        let mut stmt = self.conn.prepare(R::SELECT_ORDERED)?;
        let rows = stmt
            .query_map(params![limit as i64], |row| R::from_row(row))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    /// Surrogate row id of a stored key, if present.
    pub fn row_id<R: Record>(&self, key: &NaturalKey) -> Result<Option<i64>, StoreError> {
        let sql = format!(
            "SELECT rowid FROM {} WHERE {} = ?1",
            R::TABLE,
            R::KEY_COLUMN
        );
        Ok(self
            .conn
            .query_row(&sql, params![key], |row| row.get(0))
            .optional()?)
    }

    pub fn table_counts(&self) -> Result<Vec<TableCountRow>, StoreError> {
        STORED_TABLES
            .iter()
            .map(|table| {
                Ok(TableCountRow {
                    table: table.to_string(),
                    rows: count_table(&self.conn, table)?,
                })
            })
            .collect()
    }
}

fn count_table(conn: &Connection, table: &str) -> rusqlite::Result<u64> {
    let count: i64 = conn.query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |row| {
        row.get(0)
    })?;
    Ok(count.max(0) as u64)
}

fn key_exists<R: Record>(conn: &Connection, key: &NaturalKey) -> rusqlite::Result<bool> {
    let sql = format!(
        "SELECT 1 FROM {} WHERE {} = ?1 LIMIT 1",
        R::TABLE,
        R::KEY_COLUMN
    );
    let found: Option<i64> = conn.query_row(&sql, params![key], |row| row.get(0)).optional()?;
    Ok(found.is_some())
}

fn is_unique_violation(err: &rusqlite::Error) -> bool {
    match err {
        rusqlite::Error::SqliteFailure(failure, _) => {
            failure.extended_code == ffi::SQLITE_CONSTRAINT_UNIQUE
                || failure.extended_code == ffi::SQLITE_CONSTRAINT_PRIMARYKEY
        }
        _ => false,
    }
}
