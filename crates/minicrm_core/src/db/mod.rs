//! SQLite bootstrap for the preference store.
//!
//! # Responsibility
//! - Open and configure SQLite connections.
//! - Apply schema migrations in deterministic order.
//!
//! # Invariants
//! - Migration version is tracked via `PRAGMA user_version`.
//! - Preferences are not read or written before migrations succeed.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod migrations;
mod open;

pub use open::{open_db, open_db_in_memory};

pub type DbResult<T> = Result<T, DbError>;

/// Failure while opening, migrating or querying the preference database.
#[derive(Debug)]
pub enum DbError {
    Open {
        mode: &'static str,
        source: rusqlite::Error,
    },
    /// Reading or writing `user_version`, or the migration transaction itself.
    Schema(rusqlite::Error),
    Migration {
        version: u32,
        name: &'static str,
        source: rusqlite::Error,
    },
    UnsupportedSchemaVersion {
        db_version: u32,
        latest_supported: u32,
    },
    /// A statement on the `preferences` table; `key` is `None` for bulk
    /// statements.
    Statement {
        key: Option<String>,
        source: rusqlite::Error,
    },
}

impl DbError {
    /// Wraps a statement failure on `key`.
    pub(crate) fn statement(key: Option<&str>) -> impl FnOnce(rusqlite::Error) -> Self + '_ {
        move |source| Self::Statement {
            key: key.map(str::to_string),
            source,
        }
    }
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Open { mode, source } => {
                write!(f, "cannot open {mode} preference database: {source}")
            }
            Self::Schema(err) => write!(f, "preference schema check failed: {err}"),
            Self::Migration {
                version,
                name,
                source,
            } => write!(f, "preference migration {version} ({name}) failed: {source}"),
            Self::UnsupportedSchemaVersion {
                db_version,
                latest_supported,
            } => write!(
                f,
                "preference database schema version {db_version} is newer than supported {latest_supported}"
            ),
            Self::Statement {
                key: Some(key),
                source,
            } => write!(f, "preference `{key}` query failed: {source}"),
            Self::Statement { key: None, source } => {
                write!(f, "preference query failed: {source}")
            }
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Open { source, .. }
            | Self::Migration { source, .. }
            | Self::Statement { source, .. } => Some(source),
            Self::Schema(err) => Some(err),
            Self::UnsupportedSchemaVersion { .. } => None,
        }
    }
}
