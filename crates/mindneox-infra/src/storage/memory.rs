//! In-memory key-value storage.

use std::sync::Arc;

use dashmap::DashMap;
use mindneox_core::storage::key_value::KeyValueStorage;
use mindneox_types::error::StorageError;

/// `DashMap`-backed implementation of `KeyValueStorage`.
///
/// Cloning produces a shared view of the same map, so a second limiter built
/// from a clone behaves like a page reload in the same browser profile.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    values: Arc<DashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.values.get(key).map(|v| v.value().clone()))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.values.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_get_roundtrip() {
        let storage = MemoryStorage::new();
        storage.set("guestConversationCount", "3").unwrap();
        assert_eq!(
            storage.get("guestConversationCount").unwrap().as_deref(),
            Some("3")
        );
    }

    #[test]
    fn test_get_nonexistent_returns_none() {
        let storage = MemoryStorage::new();
        assert!(storage.get("missing").unwrap().is_none());
    }

    #[test]
    fn test_remove_nonexistent_is_noop() {
        let storage = MemoryStorage::new();
        storage.remove("nope").unwrap();
        assert!(storage.get("nope").unwrap().is_none());
    }

    #[test]
    fn test_clones_share_state() {
        let storage = MemoryStorage::new();
        let reloaded = storage.clone();
        storage.set("k", "v").unwrap();
        assert_eq!(reloaded.get("k").unwrap().as_deref(), Some("v"));

        reloaded.remove("k").unwrap();
        assert!(storage.get("k").unwrap().is_none());
    }
}
