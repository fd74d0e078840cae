//! Key-value preference persistence.
//!
//! # Responsibility
//! - Define the raw string store contract used to keep view preferences
//!   (filters, sort options, search text) across restarts.
//! - Provide a typed JSON wrapper whose failures are logged, never raised.
//!
//! # Invariants
//! - `Preferences::get` always yields a value: stored, or the caller default.
//! - `Preferences::set` reports failure as `false` and a `warn` event.

mod memory;
mod sqlite;

pub use memory::MemoryPreferenceStore;
pub use sqlite::SqlitePreferenceStore;

use log::warn;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};

use crate::db::DbError;

pub const FILTERS_KEY: &str = "mini-seller-filters";
pub const SORT_OPTIONS_KEY: &str = "mini-seller-sort-options";
pub const SEARCH_QUERY_KEY: &str = "mini-seller-search-query";

pub type PrefResult<T> = Result<T, PrefError>;

#[derive(Debug)]
pub enum PrefError {
    Db(DbError),
    Encoding(serde_json::Error),
    /// The backing store is unusable, e.g. a poisoned lock.
    Unavailable(&'static str),
}

impl Display for PrefError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Encoding(err) => write!(f, "preference encoding failed: {err}"),
            Self::Unavailable(details) => write!(f, "preference store unavailable: {details}"),
        }
    }
}

impl Error for PrefError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Encoding(err) => Some(err),
            Self::Unavailable(_) => None,
        }
    }
}

impl From<DbError> for PrefError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<serde_json::Error> for PrefError {
    fn from(value: serde_json::Error) -> Self {
        Self::Encoding(value)
    }
}

/// Raw string key-value store.
pub trait PreferenceStore {
    fn get_raw(&self, key: &str) -> PrefResult<Option<String>>;
    fn set_raw(&self, key: &str, value: &str) -> PrefResult<()>;
    fn remove(&self, key: &str) -> PrefResult<()>;
    fn clear(&self) -> PrefResult<()>;
}

/// Typed, best-effort facade over a [`PreferenceStore`].
pub struct Preferences<P: PreferenceStore> {
    store: P,
}

impl<P: PreferenceStore> Preferences<P> {
    pub fn new(store: P) -> Self {
        Self { store }
    }

    /// Reads and decodes `key`, returning `default` when the key is missing
    /// or the stored value cannot be read or decoded.
    pub fn get<T: DeserializeOwned>(&self, key: &str, default: T) -> T {
        match self.try_get(key) {
            Ok(Some(value)) => value,
            Ok(None) => default,
            Err(err) => {
                warn!("event=pref_get module=prefs status=error key={key} error={err}");
                default
            }
        }
    }

    /// Encodes and writes `value`. Returns whether the write succeeded.
    pub fn set<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> bool {
        let result = serde_json::to_string(value)
            .map_err(PrefError::from)
            .and_then(|encoded| self.store.set_raw(key, &encoded));
        log_outcome("pref_set", key, result)
    }

    pub fn remove(&self, key: &str) -> bool {
        log_outcome("pref_remove", key, self.store.remove(key))
    }

    pub fn clear(&self) -> bool {
        log_outcome("pref_clear", "*", self.store.clear())
    }

    pub fn store(&self) -> &P {
        &self.store
    }

    fn try_get<T: DeserializeOwned>(&self, key: &str) -> PrefResult<Option<T>> {
        match self.store.get_raw(key)? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }
}

fn log_outcome(event: &str, key: &str, result: PrefResult<()>) -> bool {
    match result {
        Ok(()) => true,
        Err(err) => {
            warn!("event={event} module=prefs status=error key={key} error={err}");
            false
        }
    }
}
