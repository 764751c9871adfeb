//! Collection snapshot feed for live note-list subscriptions.
//!
//! A [`CollectionFeed`] fans full-collection snapshots out to any number of
//! subscribers over `tokio::sync::broadcast`, retaining the most recent
//! snapshot so that a new subscriber sees the current state immediately and
//! every change after it. Subscriptions are independent and restartable:
//! dropping one and subscribing again replays the current snapshot first.
//!
//! Slow receivers skip forward to newer snapshots. Every snapshot carries the
//! full collection state, so the latest one is always sufficient.

use std::sync::Mutex;

use tokio::sync::broadcast;

use crate::error::{Error, Result};
use crate::models::Document;

/// The full ordered contents of a collection at a point in time, as reported
/// by the document-store collaborator. Ordering is the backend's; no
/// client-side sort is imposed.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Snapshot {
    pub documents: Vec<Document>,
}

impl Snapshot {
    pub fn new(documents: Vec<Document>) -> Self {
        Self { documents }
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

/// Broadcast feed of collection snapshots with last-snapshot retention.
pub struct CollectionFeed {
    tx: broadcast::Sender<Snapshot>,
    // Guards the retained snapshot AND the send, so subscribe() can atomically
    // read the current state and attach before the next publish.
    last: Mutex<Option<Snapshot>>,
}

impl CollectionFeed {
    /// Create a new feed with the given broadcast buffer capacity.
    ///
    /// Recommended: [`crate::defaults::FEED_CAPACITY`] for production, a
    /// small value for tests exercising lag behavior.
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self {
            tx,
            last: Mutex::new(None),
        }
    }

    /// Publish a snapshot: retain it as the current state and fan it out.
    ///
    /// With no active subscribers the snapshot is still retained, so the next
    /// subscriber starts from it.
    pub fn publish(&self, snapshot: Snapshot) {
        let mut last = self.last.lock().unwrap();
        tracing::debug!(
            documents = snapshot.len(),
            subscriber_count = self.tx.receiver_count(),
            "collection feed publish"
        );
        *last = Some(snapshot.clone());
        let _ = self.tx.send(snapshot);
    }

    /// Subscribe to the feed. The subscription delivers the current snapshot
    /// (if one exists) first, then every subsequent publish.
    pub fn subscribe(&self) -> DocumentSubscription {
        let last = self.last.lock().unwrap();
        let rx = self.tx.subscribe();
        DocumentSubscription {
            pending: last.clone(),
            rx,
        }
    }

    /// Returns the number of active subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

/// One subscriber's live view of a collection.
///
/// `recv` is an infinite sequence of snapshots: it stays pending until the
/// collection changes and only errors once the feed itself is gone.
pub struct DocumentSubscription {
    pending: Option<Snapshot>,
    rx: broadcast::Receiver<Snapshot>,
}

impl DocumentSubscription {
    /// Wait for the next snapshot.
    ///
    /// The first call returns the snapshot that was current at subscribe time
    /// (if any). Lagged receivers skip ahead to the newest retained snapshot.
    /// Returns [`Error::SubscriptionClosed`] once the feed has been dropped.
    pub async fn recv(&mut self) -> Result<Snapshot> {
        if let Some(snapshot) = self.pending.take() {
            return Ok(snapshot);
        }
        loop {
            match self.rx.recv().await {
                Ok(snapshot) => return Ok(snapshot),
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::debug!(skipped, "subscription lagged, skipping to newer snapshot");
                    continue;
                }
                Err(broadcast::error::RecvError::Closed) => return Err(Error::SubscriptionClosed),
            }
        }
    }
}
