//! File-backed key-value storage.
//!
//! Stores every key of one profile in a single JSON object file
//! (`{data_dir}/guest_storage.json` by default). Each `set` rewrites the file
//! through a temporary sibling and a rename, so the value is on disk before
//! the call returns and a crash never leaves a half-written file.

use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use mindneox_core::storage::key_value::KeyValueStorage;
use mindneox_types::error::StorageError;
use tracing::warn;

use crate::filesystem::write_atomic;

/// Default file name inside the data directory.
pub const STORAGE_FILE_NAME: &str = "guest_storage.json";

type Entries = BTreeMap<String, String>;

/// JSON-file implementation of `KeyValueStorage`.
pub struct FileStorage {
    path: PathBuf,
    /// Serializes read-modify-write cycles within this process.
    write_lock: Mutex<()>,
}

impl FileStorage {
    /// Create a storage backed by the given file. The file is created lazily.
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            write_lock: Mutex::new(()),
        }
    }

    /// Storage at `{data_dir}/guest_storage.json`.
    pub fn in_data_dir(data_dir: &Path) -> Self {
        Self::new(data_dir.join(STORAGE_FILE_NAME))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_entries(&self) -> Result<Entries, StorageError> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Entries::new()),
            Err(e) => return Err(StorageError::Io(format!("{}: {e}", self.path.display()))),
        };

        if content.trim().is_empty() {
            return Ok(Entries::new());
        }

        serde_json::from_str(&content)
            .map_err(|e| StorageError::Corrupt(format!("{}: {e}", self.path.display())))
    }

    fn write_entries(&self, entries: &Entries) -> Result<(), StorageError> {
        let json = serde_json::to_string_pretty(entries)
            .map_err(|e| StorageError::Io(format!("failed to serialize entries: {e}")))?;

        write_atomic(&self.path, &json)
            .map_err(|e| StorageError::Io(format!("{}: {e}", self.path.display())))
    }

    /// Load entries for modification. A corrupt file is replaced rather than
    /// blocking all future writes.
    fn entries_for_update(&self) -> Result<Entries, StorageError> {
        match self.read_entries() {
            Err(StorageError::Corrupt(reason)) => {
                warn!(%reason, "discarding corrupt guest storage file");
                Ok(Entries::new())
            }
            other => other,
        }
    }
}

impl KeyValueStorage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.read_entries()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut entries = self.entries_for_update()?;
        entries.insert(key.to_string(), value.to_string());
        self.write_entries(&entries)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut entries = self.entries_for_update()?;
        if entries.remove(key).is_some() {
            self.write_entries(&entries)?;
        }
        Ok(())
    }
}
