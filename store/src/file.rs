//! JSON file backend: one object file holding every key.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::{KvStore, StoreError};

/// File name used inside a data directory.
pub const STORE_FILE_NAME: &str = "cosigner.json";

/// A [`KvStore`] persisted as a single JSON object.
///
/// The whole map is cached in memory and rewritten on every mutation via a
/// temp file + rename, so a crash mid-write leaves the previous file intact.
pub struct JsonFileStore {
    path: PathBuf,
    entries: Mutex<BTreeMap<String, String>>,
}

impl JsonFileStore {
    /// Open (or lazily create) the store file at `path`.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let entries = if path.exists() {
            let raw = std::fs::read_to_string(&path)?;
            if raw.trim().is_empty() {
                BTreeMap::new()
            } else {
                serde_json::from_str(&raw).map_err(|e| {
                    StoreError::Corruption(format!("{}: {e}", path.display()))
                })?
            }
        } else {
            BTreeMap::new()
        };
        tracing::debug!(path = %path.display(), keys = entries.len(), "opened store");
        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    /// Open the store file inside `data_dir`, creating the directory if needed.
    pub fn open_in_dir(data_dir: &Path) -> Result<Self, StoreError> {
        std::fs::create_dir_all(data_dir)?;
        Self::open(data_dir.join(STORE_FILE_NAME))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self, entries: &BTreeMap<String, String>) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(entries).map_err(|e| {
            StoreError::Serialization {
                key: "*".to_string(),
                reason: e.to_string(),
            }
        })?;
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, json)?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, BTreeMap<String, String>>, StoreError> {
        self.entries
            .lock()
            .map_err(|_| StoreError::Backend("store lock poisoned".to_string()))
    }
}

impl KvStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn put(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut entries = self.lock()?;
        entries.insert(key.to_string(), value.to_string());
        self.flush(&entries)
    }

    fn delete(&self, key: &str) -> Result<(), StoreError> {
        let mut entries = self.lock()?;
        if entries.remove(key).is_some() {
            self.flush(&entries)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn put_get_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        {
            let store = JsonFileStore::open_in_dir(dir.path()).unwrap();
            store.put("a", "1").unwrap();
            store.put_json("b", &vec![1, 2, 3]).unwrap();
        }
        let store = JsonFileStore::open_in_dir(dir.path()).unwrap();
        assert_eq!(store.get("a").unwrap().as_deref(), Some("1"));
        assert_eq!(store.get_json::<Vec<u32>>("b").unwrap(), Some(vec![1, 2, 3]));
        assert_eq!(store.get("missing").unwrap(), None);
    }

    #[test]
    fn delete_removes_key() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::open_in_dir(dir.path()).unwrap();
        store.put("k", "v").unwrap();
        store.delete("k").unwrap();
        store.delete("never-written").unwrap();
        assert_eq!(store.get("k").unwrap(), None);
    }

    #[test]
    fn corrupted_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(STORE_FILE_NAME);
        std::fs::write(&path, "{not json").unwrap();
        assert!(matches!(
            JsonFileStore::open(&path),
            Err(StoreError::Corruption(_))
        ));
    }

    #[test]
    fn wrong_shape_is_serialization_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::open_in_dir(dir.path()).unwrap();
        store.put("n", "\"text\"").unwrap();
        assert!(matches!(
            store.get_json::<u32>("n"),
            Err(StoreError::Serialization { .. })
        ));
    }
}
