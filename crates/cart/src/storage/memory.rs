//! In-memory key-value store.

use std::collections::HashMap;

use tokio::sync::RwLock;

use super::{KeyValueStore, StorageError};

/// A key-value store backed by a `HashMap`.
///
/// Contents are lost when the store is dropped.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with one entry.
    #[must_use]
    pub fn with_entry(key: impl Into<String>, value: impl Into<String>) -> Self {
        let mut entries = HashMap::new();
        entries.insert(key.into(), value.into());
        Self {
            entries: RwLock::new(entries),
        }
    }
}

impl KeyValueStore for MemoryStore {
    async fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries
            .write()
            .await
            .insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    async fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        self.entries.write().await.remove(key);
        Ok(())
    }
}
