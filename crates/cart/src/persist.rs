//! Background persistence of cart snapshots.
//!
//! Mutations hand finished snapshots to a [`Persister`], which forwards them
//! to a single writer task. The writer handles them one at a time in
//! submission order, so an older snapshot can never land after a newer one.
//!
//! Callers get a [`PersistTicket`] back. Dropping it is fire-and-forget;
//! awaiting [`PersistTicket::wait`] reports the outcome of that write.

use std::sync::Arc;

use go_marketplace_core::CartList;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, error, instrument, warn};

use crate::config::PersistPolicy;
use crate::error::{CartError, Result};
use crate::storage::KeyValueStore;

enum Command {
    Write {
        snapshot: Arc<CartList>,
        done: oneshot::Sender<Result<()>>,
    },
    Flush(oneshot::Sender<()>),
}

/// Handle to the writer task for one storage key.
///
/// Cloning is cheap. The writer stops once every clone has been dropped and
/// the queued snapshots have been written.
#[derive(Debug, Clone)]
pub struct Persister {
    tx: mpsc::UnboundedSender<Command>,
}

impl Persister {
    /// Start a writer task that stores snapshots under `key`.
    ///
    /// # Panics
    ///
    /// Panics if called outside of a Tokio runtime.
    pub fn spawn<S: KeyValueStore>(
        storage: Arc<S>,
        key: impl Into<String>,
        policy: PersistPolicy,
    ) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        tokio::spawn(run_writer(storage, key.into(), policy, rx));
        Self { tx }
    }

    /// Queue `snapshot` for writing.
    pub fn persist(&self, snapshot: Arc<CartList>) -> PersistTicket {
        let (done, rx) = oneshot::channel();
        if self.tx.send(Command::Write { snapshot, done }).is_err() {
            warn!("Persistence worker stopped, cart snapshot dropped");
            return PersistTicket { rx: None };
        }
        PersistTicket { rx: Some(rx) }
    }

    /// Wait until every snapshot queued before this call has been handled.
    ///
    /// # Errors
    ///
    /// Returns `CartError::PersisterClosed` if the writer is gone.
    pub async fn flush(&self) -> Result<()> {
        let (done, rx) = oneshot::channel();
        self.tx
            .send(Command::Flush(done))
            .map_err(|_| CartError::PersisterClosed)?;
        rx.await.map_err(|_| CartError::PersisterClosed)
    }
}

/// Outcome of a single queued write.
#[derive(Debug)]
pub struct PersistTicket {
    rx: Option<oneshot::Receiver<Result<()>>>,
}

impl PersistTicket {
    /// Wait for the write to finish.
    ///
    /// # Errors
    ///
    /// Returns the storage or serialization error of the final attempt, or
    /// `CartError::PersisterClosed` if the snapshot never reached the writer.
    pub async fn wait(self) -> Result<()> {
        let rx = self.rx.ok_or(CartError::PersisterClosed)?;
        rx.await.map_err(|_| CartError::PersisterClosed)?
    }
}

async fn run_writer<S: KeyValueStore>(
    storage: Arc<S>,
    key: String,
    policy: PersistPolicy,
    mut rx: mpsc::UnboundedReceiver<Command>,
) {
    while let Some(command) = rx.recv().await {
        match command {
            Command::Write { snapshot, done } => {
                let result = write_snapshot(storage.as_ref(), &key, &snapshot, policy).await;
                // Receiver dropped means nobody is waiting on this write
                let _ = done.send(result);
            }
            Command::Flush(done) => {
                let _ = done.send(());
            }
        }
    }
    debug!(key = %key, "Persistence worker stopped");
}

#[instrument(skip(storage, snapshot, policy), fields(items = snapshot.len()))]
async fn write_snapshot<S: KeyValueStore>(
    storage: &S,
    key: &str,
    snapshot: &CartList,
    policy: PersistPolicy,
) -> Result<()> {
    let payload = snapshot.to_json().map_err(|e| {
        error!(error = %e, "Failed to serialize cart");
        CartError::Serialize(e)
    })?;

    let max_attempts = policy.max_attempts.max(1);
    let mut attempt = 1;
    loop {
        match storage.set_item(key, &payload).await {
            Ok(()) => {
                debug!(attempt, "Cart persisted");
                return Ok(());
            }
            Err(e) if attempt < max_attempts => {
                warn!(error = %e, attempt, max_attempts, "Cart write failed, retrying");
                tokio::time::sleep(policy.backoff * attempt).await;
                attempt += 1;
            }
            Err(e) => {
                error!(error = %e, attempts = attempt, "Cart write failed");
                return Err(e.into());
            }
        }
    }
}
