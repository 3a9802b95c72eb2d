//! `localStorage` backend for daily progress

use connections_core::{PersistenceStore, StoreError};
use wasm_bindgen::JsValue;
use web_sys::Storage;

/// Saved sessions in the page's `localStorage`.
///
/// When storage is missing (private browsing, sandboxed frames, node) every
/// call fails with [`StoreError::Unavailable`] and the game falls back to
/// playing in memory.
pub struct LocalStorageStore {
    storage: Option<Storage>,
}

impl LocalStorageStore {
    pub fn open() -> Self {
        let storage = web_sys::window().and_then(|w| w.local_storage().ok().flatten());
        Self { storage }
    }

    pub fn is_available(&self) -> bool {
        self.storage.is_some()
    }

    fn storage(&self) -> Result<&Storage, StoreError> {
        self.storage
            .as_ref()
            .ok_or_else(|| StoreError::Unavailable("localStorage is not available".to_string()))
    }
}

fn js_error(e: JsValue) -> StoreError {
    StoreError::Unavailable(e.as_string().unwrap_or_else(|| format!("{:?}", e)))
}

impl PersistenceStore for LocalStorageStore {
    fn load(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.storage()?.get_item(key).map_err(js_error)
    }

    fn save(&mut self, key: &str, blob: &str) -> Result<(), StoreError> {
        self.storage()?.set_item(key, blob).map_err(js_error)
    }
}
