//! Key-value store backends for native builds and tests

use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::KeyValueStore;
use crate::error::PersistResult;

/// In-process store; nothing survives the process
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    items: BTreeMap<String, String>,
}

impl KeyValueStore for MemoryStore {
    fn get_item(&self, key: &str) -> PersistResult<Option<String>> {
        Ok(self.items.get(key).cloned())
    }

    fn set_item(&mut self, key: &str, value: &str) -> PersistResult<()> {
        self.items.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// One file per key under a directory
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl KeyValueStore for FileStore {
    fn get_item(&self, key: &str) -> PersistResult<Option<String>> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Writes to a temp file first, then renames over the old value
    fn set_item(&mut self, key: &str, value: &str) -> PersistResult<()> {
        fs::create_dir_all(&self.dir)?;
        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::ProgressStore;
    use crate::upgrades::Progress;

    fn temp_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "slingshot-flight-{}-{}",
            name,
            std::process::id()
        ));
        let _ = fs::remove_dir_all(&dir);
        dir
    }

    #[test]
    fn test_file_store_round_trip() {
        let dir = temp_dir("roundtrip");
        let mut store = FileStore::new(&dir);
        assert_eq!(store.get_item("coins").unwrap(), None);

        let mut progress = Progress::default();
        progress.currency = 70;
        progress.levels.insert("engine".into(), 2);
        store.save_progress(&progress).unwrap();

        let reopened = FileStore::new(&dir);
        assert_eq!(reopened.load_progress().unwrap(), progress);
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_missing_dir_loads_defaults() {
        let store = FileStore::new(temp_dir("missing"));
        assert_eq!(store.load_progress().unwrap(), Progress::default());
    }
}
