//! Storage selection for the guest usage counter.
//!
//! The counter lives in the data directory when it can be written. When it
//! cannot (read-only home, bad `MINDNEOX_DATA_DIR`), the client keeps working
//! with a process-local map and the count lasts until exit.

use std::fs::OpenOptions;
use std::path::Path;

use mindneox_core::storage::key_value::KeyValueStorage;
use mindneox_types::error::StorageError;
use tracing::warn;

use super::file::FileStorage;
use super::memory::MemoryStorage;

/// The storage backing the guest counter for one run of the client.
pub enum GuestStorage {
    File(FileStorage),
    Memory(MemoryStorage),
}

impl GuestStorage {
    /// File storage in `data_dir` if it is writable, in-memory otherwise.
    pub fn in_data_dir(data_dir: &Path) -> Self {
        let file = FileStorage::in_data_dir(data_dir);
        let writable = std::fs::create_dir_all(data_dir).and_then(|()| {
            OpenOptions::new()
                .create(true)
                .append(true)
                .open(file.path())
                .map(drop)
        });

        match writable {
            Ok(()) => Self::File(file),
            Err(e) => {
                warn!(
                    path = %file.path().display(),
                    error = %e,
                    "guest storage is not writable, keeping the usage count in memory"
                );
                Self::Memory(MemoryStorage::new())
            }
        }
    }

    pub fn is_persistent(&self) -> bool {
        matches!(self, Self::File(_))
    }
}

impl KeyValueStorage for GuestStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        match self {
            Self::File(storage) => storage.get(key),
            Self::Memory(storage) => storage.get(key),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        match self {
            Self::File(storage) => storage.set(key, value),
            Self::Memory(storage) => storage.set(key, value),
        }
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        match self {
            Self::File(storage) => storage.remove(key),
            Self::Memory(storage) => storage.remove(key),
        }
    }
}
