//! Key-value storage trait.
//!
//! Models browser-style local storage: string values under string keys,
//! scoped to one profile. Implementations live in mindneox-infra.

use std::sync::Arc;

use mindneox_types::error::StorageError;

/// Synchronous string key-value storage.
///
/// Calls complete before returning so a value written just before the
/// process exits is not lost.
pub trait KeyValueStorage: Send + Sync {
    /// Get a value by key. Returns None if the key does not exist.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Set a value for a key (upsert).
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete a key. No-op if key does not exist.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

impl<T: KeyValueStorage + ?Sized> KeyValueStorage for Arc<T> {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        (**self).remove(key)
    }
}
