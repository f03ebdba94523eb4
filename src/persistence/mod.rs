//! Progress save/load
//!
//! Progress is stored under two keys of a string key-value store, the same way
//! browser LocalStorage holds it:
//! - `upgradeLevels`: JSON object of category name to level
//! - `coins`: the coin balance as a JSON integer
//!
//! Any load failure is recovered by the caller with [`Progress::default`];
//! nothing here is allowed to stop the simulation.

pub mod store;

#[cfg(target_arch = "wasm32")]
pub mod web;

use std::collections::BTreeMap;

use crate::error::PersistResult;
use crate::upgrades::{Progress, UpgradeKind};

pub use store::{FileStore, MemoryStore};

/// Key for the upgrade level map
pub const LEVELS_KEY: &str = "upgradeLevels";
/// Key for the coin balance
pub const COINS_KEY: &str = "coins";

/// Flat string key-value storage
pub trait KeyValueStore {
    fn get_item(&self, key: &str) -> PersistResult<Option<String>>;
    fn set_item(&mut self, key: &str, value: &str) -> PersistResult<()>;
}

/// Load/save of player progress
pub trait ProgressStore {
    /// Missing keys yield defaults; unreadable or corrupt data is an error
    fn load_progress(&self) -> PersistResult<Progress>;
    fn save_progress(&mut self, progress: &Progress) -> PersistResult<()>;
}

impl<S: KeyValueStore + ?Sized> ProgressStore for S {
    fn load_progress(&self) -> PersistResult<Progress> {
        let mut progress = Progress::default();

        if let Some(json) = self.get_item(LEVELS_KEY)? {
            let stored: BTreeMap<String, u32> = serde_json::from_str(&json)?;
            for (key, level) in stored {
                if UpgradeKind::from_key(&key).is_some() {
                    progress.levels.insert(key, level);
                } else {
                    log::debug!("Ignoring unknown upgrade '{}'", key);
                }
            }
        }

        if let Some(coins) = self.get_item(COINS_KEY)? {
            progress.currency = serde_json::from_str(coins.trim())?;
        }

        Ok(progress)
    }

    fn save_progress(&mut self, progress: &Progress) -> PersistResult<()> {
        let levels = serde_json::to_string(&progress.levels)?;
        self.set_item(LEVELS_KEY, &levels)?;
        self.set_item(COINS_KEY, &progress.currency.to_string())?;
        Ok(())
    }
}

/// Load progress, substituting defaults on any failure
pub fn load_or_default(store: &dyn ProgressStore) -> Progress {
    match store.load_progress() {
        Ok(progress) => {
            log::info!("Loaded progress ({} coins)", progress.currency);
            progress
        }
        Err(e) => {
            log::warn!("Failed to load progress, using defaults: {}", e);
            Progress::default()
        }
    }
}

/// Save progress; failures are logged and otherwise ignored
pub fn save_or_warn(store: &mut dyn ProgressStore, progress: &Progress) -> bool {
    match store.save_progress(progress) {
        Ok(()) => {
            log::info!("Progress saved ({} coins)", progress.currency);
            true
        }
        Err(e) => {
            log::warn!("Failed to save progress: {}", e);
            false
        }
    }
}
