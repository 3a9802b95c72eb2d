//! Persistence contract: the saved-state blob and the key-value store it lives in

use crate::error::StoreError;
use crate::puzzle::Group;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Persisted progress for one effective date
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedState {
    /// Whether the session reached a terminal outcome
    pub completed: bool,
    /// Whether the terminal outcome was a win
    #[serde(default)]
    pub is_win: bool,
    pub mistakes: usize,
    /// Solved groups in discovery order
    #[serde(rename = "solvedGroupsData", default)]
    pub solved_groups: Vec<Group>,
}

impl SavedState {
    pub fn to_json(&self) -> Result<String, StoreError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, StoreError> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Key-value store for serialized sessions
pub trait PersistenceStore {
    /// Read the blob stored under `key`, if any
    fn load(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Write `blob` under `key`, replacing any previous value
    fn save(&mut self, key: &str, blob: &str) -> Result<(), StoreError>;
}

impl<T: PersistenceStore + ?Sized> PersistenceStore for Box<T> {
    fn load(&self, key: &str) -> Result<Option<String>, StoreError> {
        (**self).load(key)
    }

    fn save(&mut self, key: &str, blob: &str) -> Result<(), StoreError> {
        (**self).save(key, blob)
    }
}

/// Read and decode a saved state
pub fn load_state<S: PersistenceStore + ?Sized>(
    store: &S,
    key: &str,
) -> Result<Option<SavedState>, StoreError> {
    match store.load(key)? {
        Some(blob) => SavedState::from_json(&blob).map(Some),
        None => Ok(None),
    }
}

/// Encode and write a saved state
pub fn save_state<S: PersistenceStore + ?Sized>(
    store: &mut S,
    key: &str,
    state: &SavedState,
) -> Result<(), StoreError> {
    store.save(key, &state.to_json()?)
}

/// In-memory store, used for practice games and tests
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl PersistenceStore for MemoryStore {
    fn load(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.get(key).cloned())
    }

    fn save(&mut self, key: &str, blob: &str) -> Result<(), StoreError> {
        self.entries.insert(key.to_string(), blob.to_string());
        Ok(())
    }
}
