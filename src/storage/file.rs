//! File-backed key-value storage
//!
//! All keys live in a single JSON object on disk. The document is loaded
//! once on open and rewritten in full after every mutation, so a crash
//! leaves either the old or the new document in place.

use crate::storage::error::{StorageError, StorageResult};
use crate::storage::KeyValueStore;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// File name of the storage document inside the data directory
pub const STORAGE_FILE: &str = "local_storage.json";

/// Durable storage persisted as `<data_dir>/local_storage.json`
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    entries: Mutex<BTreeMap<String, String>>,
}

impl FileStorage {
    /// Open (or lazily create) the storage document in `data_dir`
    pub fn open(data_dir: impl AsRef<Path>) -> StorageResult<Self> {
        let path = data_dir.as_ref().join(STORAGE_FILE);
        let entries = Self::load(&path)?;

        tracing::debug!("Opened storage at {:?} ({} keys)", path, entries.len());

        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    /// Like [`FileStorage::open`], but a corrupt document is logged and
    /// replaced by empty storage on the next write
    pub fn open_or_reset(data_dir: impl AsRef<Path>) -> StorageResult<Self> {
        match Self::open(data_dir.as_ref()) {
            Err(StorageError::Corruption { path, reason }) => {
                tracing::warn!("Discarding corrupt storage at {:?}: {}", path, reason);
                Ok(Self {
                    path,
                    entries: Mutex::new(BTreeMap::new()),
                })
            }
            other => other,
        }
    }

    /// Location of the backing document
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(path: &Path) -> StorageResult<BTreeMap<String, String>> {
        if !path.exists() {
            return Ok(BTreeMap::new());
        }

        let content = std::fs::read_to_string(path)?;
        if content.trim().is_empty() {
            return Ok(BTreeMap::new());
        }

        serde_json::from_str(&content).map_err(|e| StorageError::Corruption {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    fn save(&self, entries: &BTreeMap<String, String>) -> StorageResult<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(entries)?;
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, content)?;
        std::fs::rename(&tmp, &self.path)?;

        Ok(())
    }
}

impl KeyValueStore for FileStorage {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        let entries = self
            .entries
            .lock()
            .map_err(|e| StorageError::Lock(e.to_string()))?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|e| StorageError::Lock(e.to_string()))?;
        if entries.get(key).map(String::as_str) == Some(value) {
            return Ok(());
        }

        // Memory only changes once the document is on disk.
        let mut next = entries.clone();
        next.insert(key.to_string(), value.to_string());
        self.save(&next)?;
        *entries = next;
        Ok(())
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|e| StorageError::Lock(e.to_string()))?;
        if !entries.contains_key(key) {
            return Ok(());
        }

        let mut next = entries.clone();
        next.remove(key);
        self.save(&next)?;
        *entries = next;
        Ok(())
    }
}
