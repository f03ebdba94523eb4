//! Browser LocalStorage backend

use super::KeyValueStore;
use crate::error::{PersistError, PersistResult};

/// `window.localStorage`, looked up on every access so a storage that
/// appears or disappears at runtime is handled
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalStorage;

impl LocalStorage {
    fn storage() -> PersistResult<web_sys::Storage> {
        web_sys::window()
            .ok_or_else(|| PersistError::Unavailable("no window".into()))?
            .local_storage()
            .map_err(|e| PersistError::Unavailable(format!("{:?}", e)))?
            .ok_or_else(|| PersistError::Unavailable("localStorage disabled".into()))
    }
}

impl KeyValueStore for LocalStorage {
    fn get_item(&self, key: &str) -> PersistResult<Option<String>> {
        Self::storage()?
            .get_item(key)
            .map_err(|e| PersistError::Unavailable(format!("{:?}", e)))
    }

    fn set_item(&mut self, key: &str, value: &str) -> PersistResult<()> {
        Self::storage()?
            .set_item(key, value)
            .map_err(|e| PersistError::Unavailable(format!("{:?}", e)))
    }
}
