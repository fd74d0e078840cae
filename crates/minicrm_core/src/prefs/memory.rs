//! Process-local preference store.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use super::{PrefError, PrefResult, PreferenceStore};

#[derive(Debug, Default)]
pub struct MemoryPreferenceStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryPreferenceStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> PrefResult<MutexGuard<'_, HashMap<String, String>>> {
        self.entries
            .lock()
            .map_err(|_| PrefError::Unavailable("memory store lock poisoned"))
    }
}

impl PreferenceStore for MemoryPreferenceStore {
    fn get_raw(&self, key: &str) -> PrefResult<Option<String>> {
        Ok(self.entries()?.get(key).cloned())
    }

    fn set_raw(&self, key: &str, value: &str) -> PrefResult<()> {
        self.entries()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> PrefResult<()> {
        self.entries()?.remove(key);
        Ok(())
    }

    fn clear(&self) -> PrefResult<()> {
        self.entries()?.clear();
        Ok(())
    }
}
