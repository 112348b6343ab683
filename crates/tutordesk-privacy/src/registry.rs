//! Per-session preference stores
//!
//! Each signed-in user session gets its own store, opened when the
//! session starts and dropped when it ends. Stores are never shared
//! across sessions.

use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

use crate::error::PrivacyError;
use crate::preferences::{PreferenceSet, PreferenceStore};
use crate::Result;

pub struct PreferenceRegistry {
    /// session id -> store
    stores: Arc<RwLock<HashMap<String, PreferenceStore>>>,
}

impl PreferenceRegistry {
    pub fn new() -> Self {
        Self {
            stores: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Open a store with the default preferences.
    /// Opening an already open session returns its existing store.
    pub fn open(&self, session_id: &str) -> PreferenceStore {
        self.open_with(session_id, PreferenceSet::default())
    }

    /// Open a store seeded with `preferences`
    pub fn open_with(&self, session_id: &str, preferences: PreferenceSet) -> PreferenceStore {
        let mut stores = self.stores.write();
        if let Some(existing) = stores.get(session_id) {
            return existing.clone();
        }

        let store = PreferenceStore::with_preferences(preferences);
        stores.insert(session_id.to_string(), store.clone());

        tracing::info!(session_id = %session_id, "Opened preference store");

        store
    }

    /// Store for an open session; fails if the session was never opened
    pub fn store(&self, session_id: &str) -> Result<PreferenceStore> {
        self.stores
            .read()
            .get(session_id)
            .cloned()
            .ok_or_else(|| PrivacyError::NotInitialized(session_id.to_string()))
    }

    /// Tear down a session's store, returning its final preferences
    pub fn close(&self, session_id: &str) -> Result<PreferenceSet> {
        let store = self
            .stores
            .write()
            .remove(session_id)
            .ok_or_else(|| PrivacyError::NotInitialized(session_id.to_string()))?;

        tracing::info!(session_id = %session_id, "Closed preference store");

        Ok(store.get_preferences())
    }

    pub fn is_open(&self, session_id: &str) -> bool {
        self.stores.read().contains_key(session_id)
    }

    pub fn len(&self) -> usize {
        self.stores.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.stores.read().is_empty()
    }
}

impl Default for PreferenceRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for PreferenceRegistry {
    fn clone(&self) -> Self {
        Self {
            stores: Arc::clone(&self.stores),
        }
    }
}
