//! Unified cart error type.
//!
//! Cart mutations themselves cannot fail; every variant here comes from either
//! the provider guard or the persistence boundary.

use go_marketplace_core::CartListError;
use thiserror::Error;

use crate::storage::StorageError;

/// Cart-level error type.
#[derive(Debug, Error)]
pub enum CartError {
    /// The cart was used without an active provider scope.
    #[error("use_cart must be used within a CartProvider")]
    OutsideProvider,

    /// The key-value store failed.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// The persisted cart could not be decoded.
    #[error("Malformed cart data: {0}")]
    Malformed(#[from] CartListError),

    /// The cart could not be encoded.
    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    /// The background writer has stopped and no longer accepts snapshots.
    #[error("Persistence worker stopped")]
    PersisterClosed,
}

/// Result type alias for `CartError`.
pub type Result<T> = std::result::Result<T, CartError>;
