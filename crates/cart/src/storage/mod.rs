//! Key-value storage backends.
//!
//! The cart treats storage as an external string-to-string map with
//! whole-value overwrites. Durability and atomicity are whatever the backend
//! provides.
//!
//! - [`MemoryStore`] - In-process map, for tests and ephemeral sessions
//! - [`FileStore`] - One file per key inside a directory

use std::future::Future;

use thiserror::Error;

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

/// Errors returned by storage backends.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Filesystem I/O failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The backend cannot serve requests right now.
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// An asynchronous string key-value store.
///
/// Implementations must be shareable across tasks: the cart reads through
/// one handle and writes from a background task.
pub trait KeyValueStore: Send + Sync + 'static {
    /// Read the value stored under `key`, or `None` if the key is absent.
    fn get_item(
        &self,
        key: &str,
    ) -> impl Future<Output = Result<Option<String>, StorageError>> + Send;

    /// Store `value` under `key`, replacing any previous value.
    fn set_item(
        &self,
        key: &str,
        value: &str,
    ) -> impl Future<Output = Result<(), StorageError>> + Send;

    /// Remove `key`. Removing an absent key is not an error.
    fn remove_item(&self, key: &str) -> impl Future<Output = Result<(), StorageError>> + Send;
}
