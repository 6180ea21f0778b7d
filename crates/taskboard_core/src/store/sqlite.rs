//! Blob store over the `blobs` table of a migrated SQLite database.

use super::{KeyValueBlobStore, StoreResult};
use crate::db::{open_db, open_db_in_memory};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;

pub struct SqliteBlobStore {
    conn: Connection,
    key: String,
}

impl SqliteBlobStore {
    /// Opens (and migrates) the database file at `path`.
    pub fn open(path: impl AsRef<Path>, key: impl Into<String>) -> StoreResult<Self> {
        Ok(Self::from_connection(open_db(path)?, key))
    }

    pub fn open_in_memory(key: impl Into<String>) -> StoreResult<Self> {
        Ok(Self::from_connection(open_db_in_memory()?, key))
    }

    /// Wraps a connection already returned by `db::open_db*`.
    pub fn from_connection(conn: Connection, key: impl Into<String>) -> Self {
        Self {
            conn,
            key: key.into(),
        }
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

impl KeyValueBlobStore for SqliteBlobStore {
    fn key(&self) -> &str {
        &self.key
    }

    fn get(&self) -> StoreResult<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM blobs WHERE key = ?1;",
                [self.key.as_str()],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    fn set(&mut self, value: &str) -> StoreResult<()> {
        self.conn.execute(
            "INSERT INTO blobs (key, value, updated_at)
             VALUES (?1, ?2, strftime('%s', 'now') * 1000)
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at;",
            params![self.key.as_str(), value],
        )?;
        Ok(())
    }
}
