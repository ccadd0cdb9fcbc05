// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Change hub routing document changes to collection subscribers

use crate::document::Change;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock, Weak};
use tokio::sync::mpsc;

/// Sender for change delivery
pub type ChangeSender = mpsc::UnboundedSender<Change>;
/// Receiver for change delivery
pub type ChangeReceiver = mpsc::UnboundedReceiver<Change>;

/// Subscriber handle for unsubscribing
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriberId(pub u64);

type Subscribers = Arc<RwLock<HashMap<SubscriberId, (String, ChangeSender)>>>;

/// Routes changes to the subscribers of the changed collection
#[derive(Clone, Default)]
pub struct ChangeHub {
    subscribers: Subscribers,
    next_id: Arc<AtomicU64>,
}

impl ChangeHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe to changes in one collection
    pub fn subscribe(&self, collection: &str) -> Subscription {
        let (tx, rx) = mpsc::unbounded_channel();
        let id = SubscriberId(self.next_id.fetch_add(1, Ordering::Relaxed));

        let mut subs = self.subscribers.write().unwrap_or_else(|e| e.into_inner());
        subs.insert(id, (collection.to_string(), tx));

        Subscription {
            id,
            collection: collection.to_string(),
            receiver: rx,
            subscribers: Arc::downgrade(&self.subscribers),
        }
    }

    /// Publish a change to every subscriber of its collection
    pub fn publish(&self, change: &Change) {
        let subs = self.subscribers.read().unwrap_or_else(|e| e.into_inner());
        for (collection, tx) in subs.values() {
            if *collection == change.collection {
                let _ = tx.send(change.clone());
            }
        }
    }

    /// Get count of active subscribers
    pub fn subscriber_count(&self) -> usize {
        self.subscribers
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .len()
    }
}

/// Live handle on a collection's changes.
///
/// Delivery ends when the handle is dropped or [`Subscription::unsubscribe`]d.
/// The handle does not keep the hub alive: once every hub clone (and so
/// every store sharing it) is gone, the channel closes.
pub struct Subscription {
    id: SubscriberId,
    collection: String,
    receiver: ChangeReceiver,
    subscribers: Weak<RwLock<HashMap<SubscriberId, (String, ChangeSender)>>>,
}

impl Subscription {
    pub fn id(&self) -> SubscriberId {
        self.id
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// Next pending change, without waiting
    pub fn try_next(&mut self) -> Option<Change> {
        self.receiver.try_recv().ok()
    }

    /// Wait for the next change. Returns `None` once the hub is gone.
    pub async fn next(&mut self) -> Option<Change> {
        self.receiver.recv().await
    }

    /// Every change pending right now
    pub fn drain(&mut self) -> Vec<Change> {
        std::iter::from_fn(|| self.try_next()).collect()
    }

    pub fn unsubscribe(self) {
        drop(self);
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(subscribers) = self.subscribers.upgrade() {
            let mut subs = subscribers.write().unwrap_or_else(|e| e.into_inner());
            subs.remove(&self.id);
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("collection", &self.collection)
            .finish()
    }
}

#[cfg(test)]
#[path = "hub_tests.rs"]
mod tests;
