//! SQLite-backed preference store.
//!
//! # Invariants
//! - The connection is migrated before the store is constructed.
//! - Writes upsert by key and refresh `updated_at`.

use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use super::{PrefError, PrefResult, PreferenceStore};
use crate::db::{open_db, open_db_in_memory, DbError};

pub struct SqlitePreferenceStore {
    conn: Mutex<Connection>,
}

impl SqlitePreferenceStore {
    /// Opens (and migrates) a preference database file.
    pub fn open(path: impl AsRef<Path>) -> PrefResult<Self> {
        Ok(Self::from_connection(open_db(path)?))
    }

    pub fn open_in_memory() -> PrefResult<Self> {
        Ok(Self::from_connection(open_db_in_memory()?))
    }

    /// Wraps a connection returned by `db::open_db*`.
    pub fn from_connection(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
        }
    }

    fn conn(&self) -> PrefResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| PrefError::Unavailable("sqlite connection lock poisoned"))
    }
}

impl PreferenceStore for SqlitePreferenceStore {
    fn get_raw(&self, key: &str) -> PrefResult<Option<String>> {
        let value = self
            .conn()?
            .query_row(
                "SELECT value FROM preferences WHERE key = ?1;",
                [key],
                |row| row.get::<_, String>(0),
            )
            .optional()
            .map_err(DbError::statement(Some(key)))?;
        Ok(value)
    }

    fn set_raw(&self, key: &str, value: &str) -> PrefResult<()> {
        self.conn()?.execute(
            "INSERT INTO preferences (key, value, updated_at)
             VALUES (?1, ?2, strftime('%s', 'now') * 1000)
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at;",
            params![key, value],
        )
        .map_err(DbError::statement(Some(key)))?;
        Ok(())
    }

    fn remove(&self, key: &str) -> PrefResult<()> {
        self.conn()?
            .execute("DELETE FROM preferences WHERE key = ?1;", [key])
            .map_err(DbError::statement(Some(key)))?;
        Ok(())
    }

    fn clear(&self) -> PrefResult<()> {
        self.conn()?
            .execute("DELETE FROM preferences;", [])
            .map_err(DbError::statement(None))?;
        Ok(())
    }
}
