//! Shared local collection store.
//!
//! A [`SharedCollectionStore`] owns the in-memory snapshot of one collection
//! for one browsing context and is the only way to change it.
//!
//! # Mutation contract
//!
//! Every mutating operation:
//!
//! 1. re-reads the collection from storage (never from the snapshot),
//! 2. applies the operation to that fresh value,
//! 3. writes the result back,
//! 4. replaces the snapshot with a re-read of storage, so writes other
//!    contexts made while ours was dispatched are kept,
//! 5. publishes one [`ChangeEvent`] for the collection kind.
//!
//! Re-reading first means a write made by another context since our last
//! read is built upon rather than overwritten. Two contexts that both start
//! from the same stale value can still lose one update; the consistency model
//! is last-writer-wins with no locking or versioning.
//!
//! # Failure model
//!
//! Persisted data that does not parse is logged and treated as an empty
//! collection. Only a storage I/O failure surfaces as [`StoreError`], and a
//! failed fresh read aborts the mutation before anything is written.

mod cart;
mod wishlist;

use std::sync::{Arc, PoisonError, RwLock, Weak};

use mosso_core::{Collection, CollectionError, CollectionKind};
use thiserror::Error;

use crate::channel::{ChangeEvent, NotificationChannel};
use crate::storage::{ContextStorage, StorageError};
use crate::subscription::Subscription;

pub use cart::{CartStore, DEFAULT_ADD_QUANTITY};
pub use wishlist::WishlistStore;

/// Errors from store mutations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backing storage could not be read or written.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// The updated collection could not be serialized.
    #[error("{0}")]
    Encode(#[from] CollectionError),
}

struct StoreInner<C> {
    storage: ContextStorage,
    channel: NotificationChannel,
    snapshot: RwLock<Option<C>>,
    // Keeps the snapshot in step with writes from other contexts.
    _storage_events: Subscription,
}

/// Store for one collection in one browsing context.
///
/// Cheap to clone; clones share the snapshot.
pub struct SharedCollectionStore<C: Collection> {
    inner: Arc<StoreInner<C>>,
}

impl<C: Collection> Clone for SharedCollectionStore<C> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<C: Collection> std::fmt::Debug for SharedCollectionStore<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SharedCollectionStore")
            .field("kind", &C::KIND)
            .field("context", &self.inner.storage.id())
            .field("hydrated", &self.is_hydrated())
            .finish()
    }
}

impl<C: Collection> SharedCollectionStore<C> {
    /// Create the store for `C` over a context's storage and channel.
    ///
    /// The store starts unhydrated; storage is first read by [`read`](Self::read)
    /// or by the first mutation.
    #[must_use]
    pub fn new(storage: ContextStorage, channel: NotificationChannel) -> Self {
        let inner = Arc::new_cyclic(|weak: &Weak<StoreInner<C>>| {
            let weak = weak.clone();
            let storage_events = storage.on_storage(move |event| {
                if event.key != C::storage_key() {
                    return;
                }
                if let Some(inner) = weak.upgrade() {
                    let store = Self { inner };
                    if store.is_hydrated() {
                        store.refresh();
                    }
                }
            });

            StoreInner {
                storage,
                channel,
                snapshot: RwLock::new(None),
                _storage_events: storage_events,
            }
        });

        Self { inner }
    }

    /// Which collection this store manages.
    #[must_use]
    pub const fn kind(&self) -> CollectionKind {
        C::KIND
    }

    /// Whether storage has been read at least once.
    #[must_use]
    pub fn is_hydrated(&self) -> bool {
        self.inner
            .snapshot
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// The current best-known collection.
    ///
    /// Hydrates from storage on first use. Never fails: missing, malformed
    /// or unreadable data yields the empty collection.
    #[must_use]
    pub fn read(&self) -> C {
        let cached = self
            .inner
            .snapshot
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        cached.unwrap_or_else(|| self.refresh())
    }

    /// Re-read storage and replace the snapshot.
    ///
    /// If storage cannot be read the previous snapshot is kept (or the
    /// empty collection when there is none).
    pub fn refresh(&self) -> C {
        let mut snapshot = self
            .inner
            .snapshot
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        let value = match self.load() {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(kind = %C::KIND, error = %e, "Failed to read collection, keeping last snapshot");
                snapshot.clone().unwrap_or_default()
            }
        };
        *snapshot = Some(value.clone());
        value
    }

    /// Read storage without touching the snapshot.
    #[must_use]
    pub fn fresh(&self) -> C {
        self.load().unwrap_or_else(|e| {
            tracing::warn!(kind = %C::KIND, error = %e, "Failed to read collection, using empty");
            C::default()
        })
    }

    /// Apply `operation` to the freshly persisted collection, write the
    /// result back and notify this context's listeners.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if storage cannot be read or written. Nothing is
    /// written or published in that case.
    pub fn mutate<R>(&self, operation: impl FnOnce(&mut C) -> R) -> Result<R, StoreError> {
        let mut collection = self.load()?;
        let output = operation(&mut collection);

        let encoded = collection.encode()?;
        self.inner.storage.set_item(C::storage_key(), &encoded)?;

        // Other contexts may have written (and we may have refreshed) while
        // the write was being dispatched, so the snapshot is re-read rather
        // than taken from `collection`.
        {
            let mut snapshot = self
                .inner
                .snapshot
                .write()
                .unwrap_or_else(PoisonError::into_inner);
            let current = self.load().unwrap_or_else(|e| {
                tracing::warn!(kind = %C::KIND, error = %e, "Failed to re-read collection after write");
                collection
            });
            *snapshot = Some(current);
        }

        self.inner.channel.publish(ChangeEvent {
            kind: C::KIND,
            origin: self.inner.storage.id(),
        });

        Ok(output)
    }

    /// Listen for any change to this collection: mutations in this context
    /// and storage events from other contexts or processes.
    ///
    /// When the callback runs the store's own snapshot is already current.
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn() + Send + Sync + 'static,
    {
        let callback = Arc::new(callback);

        let local = {
            let callback = Arc::clone(&callback);
            self.inner
                .channel
                .subscribe(C::KIND, move |_event: &ChangeEvent| callback())
        };
        let remote = self.inner.storage.on_storage(move |event| {
            if event.key == C::storage_key() {
                callback();
            }
        });

        local.join(remote)
    }

    /// The storage handle this store writes through.
    #[must_use]
    pub fn storage(&self) -> &ContextStorage {
        &self.inner.storage
    }

    fn load(&self) -> Result<C, StorageError> {
        let raw = self.inner.storage.get_item(C::storage_key())?;
        Ok(raw.map_or_else(C::default, |raw| decode_or_empty(&raw)))
    }
}

/// Decode persisted text, falling back to the empty collection.
fn decode_or_empty<C: Collection>(raw: &str) -> C {
    match C::decode(raw) {
        Ok(collection) => collection,
        Err(e) => {
            tracing::warn!(
                kind = %C::KIND,
                error = %e,
                "Discarding malformed persisted collection"
            );
            C::default()
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    use mosso_core::{Cart, ProductId, Wishlist};

    use super::*;
    use crate::storage::{InMemoryStorage, SharedStorage, StorageArea};

    fn store<C: Collection>(shared: &SharedStorage) -> SharedCollectionStore<C> {
        SharedCollectionStore::new(shared.context(), NotificationChannel::new())
    }

    #[test]
    fn test_read_hydrates_empty_when_absent() {
        let shared = SharedStorage::new(InMemoryStorage::new());
        let cart: SharedCollectionStore<Cart> = store(&shared);
        assert!(!cart.is_hydrated());
        assert!(cart.read().is_empty());
        assert!(cart.is_hydrated());
    }

    #[test]
    fn test_read_hydrates_persisted_value() {
        let shared = SharedStorage::new(InMemoryStorage::with_items([(
            "mosso-cart",
            "[[1,2],[7,1]]",
        )]));
        let cart: SharedCollectionStore<Cart> = store(&shared);
        let value = cart.read();
        assert_eq!(value.quantity_of(ProductId::new(1)), Some(2));
        assert_eq!(value.quantity_of(ProductId::new(7)), Some(1));
    }

    #[test]
    fn test_malformed_data_hydrates_empty() {
        let shared = SharedStorage::new(InMemoryStorage::with_items([
            ("mosso-cart", "{not json"),
            ("mosso-wishlist", "{not json"),
        ]));
        let cart: SharedCollectionStore<Cart> = store(&shared);
        let wishlist: SharedCollectionStore<Wishlist> = store(&shared);
        assert!(cart.read().is_empty());
        assert!(wishlist.read().is_empty());
    }

    #[test]
    fn test_mutation_overwrites_malformed_data() {
        let shared = SharedStorage::new(InMemoryStorage::with_items([(
            "mosso-wishlist",
            "{not json",
        )]));
        let wishlist: SharedCollectionStore<Wishlist> = store(&shared);
        wishlist.mutate(|w| w.toggle(ProductId::new(2))).unwrap();
        assert_eq!(
            shared.area().get_item("mosso-wishlist").unwrap().as_deref(),
            Some("[2]")
        );
    }

    #[test]
    fn test_mutate_reads_fresh_not_cached() {
        let shared = SharedStorage::new(InMemoryStorage::new());
        let ours: SharedCollectionStore<Cart> = store(&shared);
        let theirs: SharedCollectionStore<Cart> = store(&shared);

        // Hydrate ours, then let another context write behind it.
        assert!(ours.read().is_empty());
        theirs.mutate(|c| c.add(ProductId::new(1), 1)).unwrap();

        ours.mutate(|c| c.add(ProductId::new(2), 1)).unwrap();

        let persisted = theirs.fresh();
        assert_eq!(persisted.quantity_of(ProductId::new(1)), Some(1));
        assert_eq!(persisted.quantity_of(ProductId::new(2)), Some(1));
    }

    #[test]
    fn test_mutation_publishes_exactly_once() {
        let shared = SharedStorage::new(InMemoryStorage::new());
        let channel = NotificationChannel::new();
        let cart: SharedCollectionStore<Cart> =
            SharedCollectionStore::new(shared.context(), channel.clone());

        let calls = Arc::new(AtomicUsize::new(0));
        let _subscription = {
            let calls = Arc::clone(&calls);
            channel.subscribe_all(move |_| {
                calls.fetch_add(1, Ordering::SeqCst);
            })
        };

        cart.mutate(|c| c.add(ProductId::new(1), 1)).unwrap();
        cart.mutate(|c| c.remove(ProductId::new(99))).unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_snapshot_follows_other_context_writes() {
        let shared = SharedStorage::new(InMemoryStorage::new());
        let ours: SharedCollectionStore<Wishlist> = store(&shared);
        let theirs: SharedCollectionStore<Wishlist> = store(&shared);

        assert!(ours.read().is_empty());
        theirs.mutate(|w| w.toggle(ProductId::new(4))).unwrap();
        assert!(ours.read().contains(ProductId::new(4)));
    }

    #[test]
    fn test_subscribe_sees_local_and_remote_changes() {
        let shared = SharedStorage::new(InMemoryStorage::new());
        let ours: SharedCollectionStore<Cart> = store(&shared);
        let theirs: SharedCollectionStore<Cart> = store(&shared);
        let unrelated: SharedCollectionStore<Wishlist> = store(&shared);

        let calls = Arc::new(AtomicUsize::new(0));
        let subscription = {
            let calls = Arc::clone(&calls);
            ours.subscribe(move || {
                calls.fetch_add(1, Ordering::SeqCst);
            })
        };

        ours.mutate(|c| c.add(ProductId::new(1), 1)).unwrap();
        theirs.mutate(|c| c.add(ProductId::new(2), 1)).unwrap();
        unrelated.mutate(|w| w.toggle(ProductId::new(3))).unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 2);

        drop(subscription);
        ours.mutate(|c| c.clear()).unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_dropping_store_releases_storage_listener() {
        let shared = SharedStorage::new(InMemoryStorage::new());
        let writer = shared.context();
        let cart: SharedCollectionStore<Cart> =
            SharedCollectionStore::new(shared.context(), NotificationChannel::new());
        assert_eq!(shared.listener_count(), 1);

        drop(cart);
        assert_eq!(shared.listener_count(), 0);
        writer.set_item("mosso-cart", "[[1,1]]").unwrap();
    }

    #[test]
    fn test_write_during_dispatch_is_not_rolled_back() {
        let shared = SharedStorage::new(InMemoryStorage::new());
        let ours: SharedCollectionStore<Cart> = store(&shared);
        let theirs = shared.context();

        // Another context answers our write with one of its own.
        let replied = Arc::new(AtomicBool::new(false));
        let _reply = {
            let writer = theirs.clone();
            let replied = Arc::clone(&replied);
            theirs.on_storage(move |_| {
                if !replied.swap(true, Ordering::SeqCst) {
                    writer.set_item("mosso-cart", "[[1,1],[9,4]]").unwrap();
                }
            })
        };

        assert!(ours.read().is_empty());
        ours.mutate(|c| c.add(ProductId::new(1), 1)).unwrap();

        assert!(replied.load(Ordering::SeqCst));
        assert_eq!(ours.read(), ours.fresh());
        assert_eq!(ours.read().quantity_of(ProductId::new(9)), Some(4));
    }
}
