//! Client-local key-value storage backends.
//!
//! The account store mirrors its list into a single slot of one of these.

use crate::error::StorageError;
use std::collections::HashMap;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Synchronous string key-value storage.
pub trait KeyValueStorage {
    /// Read the value stored under `key`, if any.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Overwrite the value stored under `key`.
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// In-process storage. Contents vanish with the value.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    slots: HashMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage pre-seeded with one slot.
    pub fn with_slot(key: impl Into<String>, value: impl Into<String>) -> Self {
        let mut slots = HashMap::new();
        slots.insert(key.into(), value.into());
        Self { slots }
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.slots.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.slots.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Directory-backed storage: slot `key` lives in `<dir>/<key>.json`.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Use `dir` as the storage root. It is created on first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file backing `key`.
    pub fn slot_path(&self, key: &str) -> Result<PathBuf, StorageError> {
        if !is_valid_key(key) {
            return Err(StorageError::InvalidKey(key.to_string()));
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl KeyValueStorage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.slot_path(key)?;
        match std::fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StorageError::Io { path, source }),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.slot_path(key)?;

        std::fs::create_dir_all(&self.dir).map_err(|source| StorageError::Io {
            path: self.dir.clone(),
            source,
        })?;

        // Write beside the target and rename over it so readers never see a partial slot.
        let io_err = |source| StorageError::Io {
            path: path.clone(),
            source,
        };
        let mut tmp = tempfile::NamedTempFile::new_in(&self.dir).map_err(io_err)?;
        tmp.write_all(value.as_bytes()).map_err(io_err)?;
        tmp.as_file().sync_all().map_err(io_err)?;
        tmp.persist(&path).map_err(|e| StorageError::Persist {
            path: path.clone(),
            source: e.error,
        })?;

        tracing::debug!("Wrote {} bytes to {}", value.len(), path.display());
        Ok(())
    }
}

fn is_valid_key(key: &str) -> bool {
    !key.is_empty()
        && !key.starts_with('.')
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn memory_storage_overwrites() {
        let mut storage = MemoryStorage::new();
        assert_eq!(storage.get("accounts").unwrap(), None);
        storage.set("accounts", "[]").unwrap();
        storage.set("accounts", "[1]").unwrap();
        assert_eq!(storage.get("accounts").unwrap().as_deref(), Some("[1]"));
    }

    #[test]
    fn file_storage_missing_slot_reads_none() {
        let dir = tempdir().unwrap();
        let storage = FileStorage::new(dir.path());
        assert_eq!(storage.get("accounts").unwrap(), None);
    }

    #[test]
    fn file_storage_persists_across_instances() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("nested").join("store");

        let mut writer = FileStorage::new(&nested);
        writer.set("accounts", "[\"first\"]").unwrap();
        writer.set("accounts", "[\"second\"]").unwrap();

        let reader = FileStorage::new(&nested);
        assert_eq!(reader.get("accounts").unwrap().as_deref(), Some("[\"second\"]"));
        assert!(nested.join("accounts.json").exists());
    }

    #[test]
    fn file_storage_rejects_bad_keys() {
        let dir = tempdir().unwrap();
        let mut storage = FileStorage::new(dir.path());
        for key in ["", "../escape", "a/b", ".hidden", "sp ace"] {
            assert!(
                matches!(storage.set(key, "x"), Err(StorageError::InvalidKey(_))),
                "key {key:?} should be rejected"
            );
        }
    }
}
