//! The cart store.
//!
//! [`CartStore`] owns the current [`CartList`] and is the only thing that
//! replaces it. Each operation runs the pure transform from the core crate,
//! publishes the result to subscribers, then hands the same snapshot to the
//! [`Persister`]. In-memory state is therefore always updated synchronously
//! and in call order; persistence trails behind.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use go_marketplace_core::{CartList, Product, ProductId};
use tokio::sync::watch;
use tracing::debug;

use crate::error::Result;
use crate::persist::{PersistTicket, Persister};

/// Shared cart state and its operations.
///
/// This struct is cheaply cloneable via `Arc`; every clone refers to the same
/// cart, so a clone handed out by the provider keeps a stable identity.
#[derive(Clone)]
pub struct CartStore {
    inner: Arc<CartStoreInner>,
}

struct CartStoreInner {
    products: watch::Sender<Arc<CartList>>,
    persister: Persister,
    prune_empty: bool,
    hydrated: AtomicBool,
}

impl CartStore {
    /// Create an empty store that persists through `persister`.
    ///
    /// When `prune_empty` is set, lines whose quantity drops to zero or below
    /// on [`decrement`](Self::decrement) are removed.
    #[must_use]
    pub fn new(persister: Persister, prune_empty: bool) -> Self {
        let (products, _) = watch::channel(Arc::new(CartList::new()));
        Self {
            inner: Arc::new(CartStoreInner {
                products,
                persister,
                prune_empty,
                hydrated: AtomicBool::new(false),
            }),
        }
    }

    /// The current cart snapshot.
    #[must_use]
    pub fn products(&self) -> Arc<CartList> {
        Arc::clone(&self.inner.products.borrow())
    }

    /// Subscribe to cart changes.
    ///
    /// The receiver is notified only when the list actually changes, so a
    /// no-op such as incrementing an unknown id does not wake subscribers.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Arc<CartList>> {
        self.inner.products.subscribe()
    }

    /// Replace the current list with one loaded from storage.
    ///
    /// Only the first call has any effect; `None` leaves the list as it is.
    /// Hydration is not persisted. Returns `true` if the list was replaced.
    pub fn hydrate(&self, loaded: Option<CartList>) -> bool {
        if self.inner.hydrated.swap(true, Ordering::AcqRel) {
            debug!("Cart already hydrated, ignoring");
            return false;
        }

        match loaded {
            Some(list) => {
                debug!(items = list.len(), "Hydrating cart");
                self.inner.products.send_replace(Arc::new(list));
                true
            }
            None => false,
        }
    }

    /// Returns `true` once [`hydrate`](Self::hydrate) has been called.
    #[must_use]
    pub fn is_hydrated(&self) -> bool {
        self.inner.hydrated.load(Ordering::Acquire)
    }

    /// Add one unit of `product`, overwriting the display fields of an
    /// existing line for the same id.
    pub fn add_to_cart(&self, product: Product) -> PersistTicket {
        debug!(product_id = %product.id, "Adding product to cart");
        self.apply(|list| list.with_added(product))
    }

    /// Increase the quantity of `id` by one.
    pub fn increment(&self, id: &ProductId) -> PersistTicket {
        debug!(product_id = %id, "Incrementing cart line");
        self.apply(|list| list.with_incremented(id))
    }

    /// Decrease the quantity of `id` by one.
    pub fn decrement(&self, id: &ProductId) -> PersistTicket {
        debug!(product_id = %id, "Decrementing cart line");
        let prune_empty = self.inner.prune_empty;
        self.apply(|list| {
            let next = list.with_decremented(id);
            if prune_empty { next.without_empty() } else { next }
        })
    }

    /// Wait for every write queued so far.
    ///
    /// # Errors
    ///
    /// Returns `CartError::PersisterClosed` if the writer is gone.
    pub async fn flush(&self) -> Result<()> {
        self.inner.persister.flush().await
    }

    /// Run `mutate` against the current list, publish the result and queue it
    /// for persistence.
    fn apply(&self, mutate: impl FnOnce(&CartList) -> CartList) -> PersistTicket {
        let mut snapshot = self.products();
        self.inner.products.send_if_modified(|current| {
            let next = mutate(current);
            if next == **current {
                return false;
            }
            *current = Arc::new(next);
            snapshot = Arc::clone(current);
            true
        });
        self.inner.persister.persist(snapshot)
    }
}

impl std::fmt::Debug for CartStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CartStore")
            .field("items", &self.inner.products.borrow().len())
            .field("prune_empty", &self.inner.prune_empty)
            .field("hydrated", &self.is_hydrated())
            .finish_non_exhaustive()
    }
}
