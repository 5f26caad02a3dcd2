//! Integration tests for GoMarketplace.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p go-marketplace-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `cart_provider` - Provider mounting, context access and hydration
//! - `cart_persistence` - What ends up in storage, using `FileStore` directories
//!
//! This library holds the fixtures shared by those tests.

use std::sync::Mutex;

use go_marketplace_cart::{KeyValueStore, MemoryStore, StorageError};
use go_marketplace_core::{Price, Product};

/// A `MemoryStore` that also records every value written, in order.
#[derive(Debug, Default)]
pub struct RecordingStore {
    inner: MemoryStore,
    writes: Mutex<Vec<String>>,
    fail_writes: bool,
}

impl RecordingStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store that rejects every write.
    #[must_use]
    pub fn failing() -> Self {
        Self {
            fail_writes: true,
            ..Self::default()
        }
    }

    /// Create a store pre-populated with one entry.
    #[must_use]
    pub fn with_entry(key: &str, value: &str) -> Self {
        Self {
            inner: MemoryStore::with_entry(key, value),
            ..Self::default()
        }
    }

    /// Every value written so far.
    #[must_use]
    pub fn writes(&self) -> Vec<String> {
        self.writes
            .lock()
            .map(|writes| writes.clone())
            .unwrap_or_default()
    }
}

impl KeyValueStore for RecordingStore {
    async fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.inner.get_item(key).await
    }

    async fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        if self.fail_writes {
            return Err(StorageError::Unavailable("writes disabled".to_string()));
        }
        if let Ok(mut writes) = self.writes.lock() {
            writes.push(value.to_owned());
        }
        self.inner.set_item(key, value).await
    }

    async fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        self.inner.remove_item(key).await
    }
}

/// A product with a derived title and image.
#[must_use]
pub fn product(id: &str, cents: i64) -> Product {
    Product::new(
        id,
        format!("Product {id}"),
        format!("https://cdn.example/{id}.png"),
        Price::from_cents(cents),
    )
}
