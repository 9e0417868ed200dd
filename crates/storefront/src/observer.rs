//! Mounted observers of a collection.
//!
//! An observer is anything that displays a collection and must refresh when
//! it changes: the cart badge, a page body, an event stream. Mounting
//! subscribes to the store and then reads the backing store once; from then
//! on every change notification triggers a re-read. Dropping the observer
//! unmounts it.

use std::sync::{Arc, Mutex, PoisonError};

use mosso_core::Collection;
use tokio::sync::watch;

use crate::store::SharedCollectionStore;
use crate::subscription::Subscription;

/// Lifecycle of a mounted observer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObserverPhase {
    Unhydrated,
    Hydrated,
}

struct ObserverState<C> {
    // Held across every read-and-send, so a change arriving mid-hydration
    // waits for it and then re-reads.
    phase: Mutex<ObserverPhase>,
    sender: watch::Sender<C>,
}

impl<C: Collection> ObserverState<C> {
    fn phase(&self) -> ObserverPhase {
        *self.phase.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn hydrate(&self, store: &SharedCollectionStore<C>) {
        let mut phase = self.phase.lock().unwrap_or_else(PoisonError::into_inner);
        self.sender.send_replace(store.refresh());
        *phase = ObserverPhase::Hydrated;
    }

    fn on_change(&self, store: &SharedCollectionStore<C>) {
        let phase = self.phase.lock().unwrap_or_else(PoisonError::into_inner);
        // Before hydration the hydrating read is still to come.
        if *phase == ObserverPhase::Hydrated {
            self.sender.send_replace(store.fresh());
        }
    }
}

/// A mounted view of one collection.
pub struct CollectionObserver<C: Collection> {
    state: Arc<ObserverState<C>>,
    _subscription: Subscription,
}

impl<C: Collection> std::fmt::Debug for CollectionObserver<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CollectionObserver")
            .field("kind", &C::KIND)
            .field("phase", &self.state.phase())
            .finish_non_exhaustive()
    }
}

impl<C: Collection> CollectionObserver<C> {
    /// Mount an observer on `store`.
    #[must_use]
    pub fn mount(store: &SharedCollectionStore<C>) -> Self {
        let (sender, _) = watch::channel(C::default());
        let state = Arc::new(ObserverState {
            phase: Mutex::new(ObserverPhase::Unhydrated),
            sender,
        });

        let subscription = {
            let state = Arc::clone(&state);
            let observed = store.clone();
            store.subscribe(move || state.on_change(&observed))
        };
        state.hydrate(store);

        tracing::debug!(kind = %C::KIND, context = %store.storage().id(), "Observer mounted");

        Self {
            state,
            _subscription: subscription,
        }
    }

    #[must_use]
    pub fn phase(&self) -> ObserverPhase {
        self.state.phase()
    }

    #[must_use]
    pub fn is_hydrated(&self) -> bool {
        self.phase() == ObserverPhase::Hydrated
    }

    /// The collection as last read by this observer.
    #[must_use]
    pub fn snapshot(&self) -> C {
        self.state.sender.borrow().clone()
    }

    /// A receiver that is marked changed on every refresh.
    #[must_use]
    pub fn watch(&self) -> watch::Receiver<C> {
        self.state.sender.subscribe()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::time::Duration;

    use mosso_core::{Cart, ProductId, Wishlist};

    use super::*;
    use crate::channel::NotificationChannel;
    use crate::storage::{InMemoryStorage, SharedStorage};
    use crate::store::{CartStore, WishlistStore};

    #[test]
    fn test_mount_hydrates_from_storage() {
        let shared = SharedStorage::new(InMemoryStorage::with_items([(
            "mosso-cart",
            "[[1,2],[7,1]]",
        )]));
        let store = CartStore::new(shared.context(), NotificationChannel::new());

        let observer = CollectionObserver::mount(&store);
        assert!(observer.is_hydrated());
        assert_eq!(
            observer.snapshot(),
            Cart::from_pairs([(ProductId::new(1), 2), (ProductId::new(7), 1)])
        );
    }

    #[test]
    fn test_observer_in_other_context_sees_add() {
        let shared = SharedStorage::new(InMemoryStorage::new());
        let a = CartStore::new(shared.context(), NotificationChannel::new());
        let b = CartStore::new(shared.context(), NotificationChannel::new());

        let observer_b = CollectionObserver::mount(&b);
        a.add_to_cart(ProductId::new(5), 1).unwrap();

        assert_eq!(observer_b.snapshot().quantity_of(ProductId::new(5)), Some(1));
    }

    #[test]
    fn test_observers_in_same_context_stay_in_step() {
        let shared = SharedStorage::new(InMemoryStorage::new());
        let store = WishlistStore::new(shared.context(), NotificationChannel::new());

        let badge = CollectionObserver::mount(&store);
        let page = CollectionObserver::mount(&store);
        store.toggle(ProductId::new(2)).unwrap();

        assert!(badge.snapshot().contains(ProductId::new(2)));
        assert_eq!(badge.snapshot(), page.snapshot());
    }

    #[test]
    fn test_drop_unmounts() {
        let shared = SharedStorage::new(InMemoryStorage::new());
        let channel = NotificationChannel::new();
        let store: SharedCollectionStore<Wishlist> =
            SharedCollectionStore::new(shared.context(), channel.clone());

        let observer = CollectionObserver::mount(&store);
        assert_eq!(channel.subscriber_count(), 1);
        drop(observer);
        assert_eq!(channel.subscriber_count(), 0);
    }

    #[tokio::test]
    async fn test_watch_receiver_wakes_on_change() {
        let shared = SharedStorage::new(InMemoryStorage::new());
        let store = CartStore::new(shared.context(), NotificationChannel::new());
        let observer = CollectionObserver::mount(&store);
        let mut receiver = observer.watch();

        let writer = store.clone();
        tokio::task::spawn_blocking(move || writer.add_to_cart(ProductId::new(4), 3))
            .await
            .unwrap()
            .unwrap();

        tokio::time::timeout(Duration::from_secs(1), receiver.changed())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(receiver.borrow().quantity_of(ProductId::new(4)), Some(3));
    }

    #[test]
    fn test_mount_racing_writes_ends_current() {
        for _ in 0..50 {
            let shared = SharedStorage::new(InMemoryStorage::new());
            let store = CartStore::new(shared.context(), NotificationChannel::new());
            let writer = CartStore::new(shared.context(), NotificationChannel::new());

            let writes = std::thread::spawn(move || {
                for id in 1..=20 {
                    writer.add_to_cart(ProductId::new(id), 1).unwrap();
                }
            });
            let observer = CollectionObserver::mount(&store);
            writes.join().unwrap();

            assert_eq!(observer.snapshot(), store.fresh());
            assert_eq!(observer.snapshot().count(), 20);
        }
    }
}
