//! GoMarketplace Cart - Persistent cart store with provider-scoped access.
//!
//! # Architecture
//!
//! - [`CartStore`] holds the current [`CartList`](go_marketplace_core::CartList)
//!   and exposes `add_to_cart`, `increment` and `decrement`
//! - [`Persister`] writes every new snapshot to a [`KeyValueStore`] from a
//!   background task, in order
//! - [`CartProvider`] builds one store per session, hydrates it from storage
//!   and makes it reachable through [`use_cart`] inside its scope
//!
//! Mutations never fail. Errors only come from storage, decoding persisted
//! data, or using the cart outside a provider.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod error;
pub mod persist;
pub mod provider;
pub mod storage;
pub mod store;

pub use config::{CartConfig, ConfigError, DEFAULT_STORAGE_KEY, PersistPolicy};
pub use error::{CartError, Result};
pub use persist::{PersistTicket, Persister};
pub use provider::{CartProvider, use_cart};
pub use storage::{FileStore, KeyValueStore, MemoryStore, StorageError};
pub use store::CartStore;
