//! In-process change notifications for one browsing context.
//!
//! Every successful collection mutation publishes exactly one
//! [`ChangeEvent`] tagged with the collection kind, so a listener interested
//! in the cart is not woken by wishlist changes.

use mosso_core::CollectionKind;
use serde::Serialize;

use crate::storage::ContextId;
use crate::subscription::{Listeners, Subscription};

/// A collection was changed by a store in this context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ChangeEvent {
    pub kind: CollectionKind,
    pub origin: ContextId,
}

/// Publish/subscribe channel shared by the stores and observers of one
/// browsing context. Cheap to clone; clones share listeners.
#[derive(Debug, Clone, Default)]
pub struct NotificationChannel {
    listeners: Listeners<ChangeEvent>,
}

impl NotificationChannel {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Listen for changes to one collection kind.
    pub fn subscribe<F>(&self, kind: CollectionKind, callback: F) -> Subscription
    where
        F: Fn(&ChangeEvent) + Send + Sync + 'static,
    {
        self.listeners.add(move |event: &ChangeEvent| {
            if event.kind == kind {
                callback(event);
            }
        })
    }

    /// Listen for changes to any collection.
    pub fn subscribe_all<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&ChangeEvent) + Send + Sync + 'static,
    {
        self.listeners.add(callback)
    }

    pub fn publish(&self, event: ChangeEvent) {
        tracing::trace!(kind = %event.kind, origin = %event.origin, "Publishing change");
        self.listeners.emit(&event);
    }

    /// Number of live subscriptions.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.listeners.len()
    }
}
