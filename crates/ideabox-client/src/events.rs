//! Change notifications.
//!
//! Every critical section of the [`DataStore`](crate::DataStore) ends by
//! publishing what it touched: cache keys, operation statuses and session
//! changes.  Subscribers pick the keys they care about.

use tokio::sync::broadcast;
use tracing::{trace, warn};

use ideabox_store::ChangeKey;

use crate::status::Operation;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Change {
    /// A cached record or view changed.
    Cache(ChangeKey),
    /// The status of an operation changed.
    Status(Operation),
    /// Auth or refresh token changed.
    Session,
}

impl From<ChangeKey> for Change {
    fn from(key: ChangeKey) -> Self {
        Self::Cache(key)
    }
}

/// Fan-out of [`Change`]s over a broadcast channel.
#[derive(Debug, Clone)]
pub struct EventBus {
    tx: broadcast::Sender<Change>,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    pub fn publish(&self, changes: impl IntoIterator<Item = Change>) {
        for change in changes {
            // No subscribers is not an error.
            if self.tx.send(change.clone()).is_err() {
                trace!(?change, "No subscriber for change");
            }
        }
    }

    /// Receive only the listed changes.
    pub fn subscribe(&self, keys: impl IntoIterator<Item = Change>) -> Subscription {
        Subscription {
            rx: self.tx.subscribe(),
            filter: Some(keys.into_iter().collect()),
        }
    }

    pub fn subscribe_all(&self) -> Subscription {
        Subscription {
            rx: self.tx.subscribe(),
            filter: None,
        }
    }
}

/// Receiving half handed to listeners.
pub struct Subscription {
    rx: broadcast::Receiver<Change>,
    filter: Option<Vec<Change>>,
}

impl Subscription {
    fn wants(&self, change: &Change) -> bool {
        self.filter
            .as_ref()
            .map_or(true, |keys| keys.contains(change))
    }

    /// Wait for the next matching change.  `None` once the store is gone.
    pub async fn recv(&mut self) -> Option<Change> {
        loop {
            match self.rx.recv().await {
                Ok(change) if self.wants(&change) => return Some(change),
                Ok(_) => continue,
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!(skipped, "Change subscriber lagged behind");
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }

    /// Next matching change already queued, without waiting.
    pub fn try_recv(&mut self) -> Option<Change> {
        loop {
            match self.rx.try_recv() {
                Ok(change) if self.wants(&change) => return Some(change),
                Ok(_) => continue,
                Err(broadcast::error::TryRecvError::Lagged(skipped)) => {
                    warn!(skipped, "Change subscriber lagged behind");
                }
                Err(_) => return None,
            }
        }
    }

    /// Every matching change already queued.
    pub fn drain(&mut self) -> Vec<Change> {
        std::iter::from_fn(|| self.try_recv()).collect()
    }
}
