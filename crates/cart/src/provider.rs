//! Cart provider and context access.
//!
//! A [`CartProvider`] owns the one [`CartStore`] of a session. Code running
//! inside [`CartProvider::scope`] reaches that store through [`use_cart`];
//! anywhere else `use_cart` fails with [`CartError::OutsideProvider`] before
//! touching the cart.
//!
//! The context is a Tokio task-local. Tasks spawned from inside a scope do not
//! inherit it; pass them a cloned [`CartStore`] instead.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use go_marketplace_cart::{CartConfig, CartProvider, MemoryStore, use_cart};
//! use go_marketplace_core::{Price, Product};
//!
//! # async fn example() -> go_marketplace_cart::Result<()> {
//! let provider = CartProvider::mount(Arc::new(MemoryStore::new()), &CartConfig::default()).await?;
//!
//! provider
//!     .scope(async {
//!         let cart = use_cart()?;
//!         cart.add_to_cart(Product::new("sku-1", "Mug", "mug.png", Price::from_cents(1200)));
//!         go_marketplace_cart::Result::Ok(())
//!     })
//!     .await?;
//!
//! provider.unmount().await?;
//! # Ok(())
//! # }
//! ```

use std::future::Future;
use std::sync::Arc;

use go_marketplace_core::CartList;
use tracing::{debug, info, instrument, warn};

use crate::config::CartConfig;
use crate::error::{CartError, Result};
use crate::persist::Persister;
use crate::storage::KeyValueStore;
use crate::store::CartStore;

tokio::task_local! {
    static CURRENT_CART: CartStore;
}

/// Get the cart of the innermost active provider scope.
///
/// # Errors
///
/// Returns `CartError::OutsideProvider` when called outside
/// [`CartProvider::scope`] or [`CartProvider::sync_scope`].
pub fn use_cart() -> Result<CartStore> {
    CURRENT_CART
        .try_with(CartStore::clone)
        .map_err(|_| CartError::OutsideProvider)
}

/// Owner of one session's cart.
pub struct CartProvider<S: KeyValueStore> {
    storage: Arc<S>,
    storage_key: String,
    strict_hydration: bool,
    store: CartStore,
}

impl<S: KeyValueStore> CartProvider<S> {
    /// Create a provider with an empty, not yet hydrated cart.
    ///
    /// # Panics
    ///
    /// Panics if called outside of a Tokio runtime.
    #[must_use]
    pub fn new(storage: Arc<S>, config: &CartConfig) -> Self {
        let persister = Persister::spawn(
            Arc::clone(&storage),
            config.storage_key.clone(),
            config.persist,
        );

        Self {
            storage,
            storage_key: config.storage_key.clone(),
            strict_hydration: config.strict_hydration,
            store: CartStore::new(persister, config.prune_empty),
        }
    }

    /// Create a provider and load the persisted cart.
    ///
    /// # Errors
    ///
    /// See [`load`](Self::load).
    pub async fn mount(storage: Arc<S>, config: &CartConfig) -> Result<Self> {
        let provider = Self::new(storage, config);
        provider.load().await?;
        Ok(provider)
    }

    /// Read the persisted cart and hydrate the store with it.
    ///
    /// A missing key or an empty value leaves the cart empty. Malformed data
    /// is discarded with a warning, or returned as `CartError::Malformed` when
    /// strict hydration is configured.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage read fails, or if the data is malformed
    /// and strict hydration is on.
    #[instrument(skip(self), fields(key = %self.storage_key))]
    pub async fn load(&self) -> Result<()> {
        let raw = self.storage.get_item(&self.storage_key).await?;

        let loaded = match raw.as_deref().map(str::trim) {
            None | Some("") => {
                debug!("No persisted cart found");
                None
            }
            Some(raw) => match CartList::from_json(raw) {
                Ok(list) => Some(list),
                Err(e) if self.strict_hydration => return Err(e.into()),
                Err(e) => {
                    warn!(error = %e, "Discarding malformed persisted cart");
                    None
                }
            },
        };

        if let Some(list) = &loaded {
            info!(items = list.len(), "Cart restored");
        }
        self.store.hydrate(loaded);
        Ok(())
    }

    /// The provider's store.
    #[must_use]
    pub const fn store(&self) -> &CartStore {
        &self.store
    }

    /// Run `fut` with this provider's cart as the active context.
    pub async fn scope<F: Future>(&self, fut: F) -> F::Output {
        CURRENT_CART.scope(self.store.clone(), fut).await
    }

    /// Run `f` with this provider's cart as the active context.
    pub fn sync_scope<R>(&self, f: impl FnOnce() -> R) -> R {
        CURRENT_CART.sync_scope(self.store.clone(), f)
    }

    /// Wait for pending writes, then tear the provider down.
    ///
    /// # Errors
    ///
    /// Returns `CartError::PersisterClosed` if the writer is gone.
    pub async fn unmount(self) -> Result<()> {
        self.store.flush().await?;
        debug!(key = %self.storage_key, "Cart provider unmounted");
        Ok(())
    }
}
