//! One browsing context: the equivalent of a tab.

use mosso_core::{Cart, Wishlist};

use crate::channel::NotificationChannel;
use crate::observer::CollectionObserver;
use crate::storage::{ContextId, SharedStorage};
use crate::store::{CartStore, WishlistStore};

/// A context id, its notification channel and one store per collection.
///
/// Built once and handed to whatever needs the stores. Cheap to clone;
/// clones are the same context.
#[derive(Debug, Clone)]
pub struct BrowsingContext {
    id: ContextId,
    shared: SharedStorage,
    channel: NotificationChannel,
    cart: CartStore,
    wishlist: WishlistStore,
}

impl BrowsingContext {
    #[must_use]
    pub fn open(shared: &SharedStorage) -> Self {
        let storage = shared.context();
        let channel = NotificationChannel::new();

        Self {
            id: storage.id(),
            shared: shared.clone(),
            cart: CartStore::new(storage.clone(), channel.clone()),
            wishlist: WishlistStore::new(storage, channel.clone()),
            channel,
        }
    }

    #[must_use]
    pub const fn id(&self) -> ContextId {
        self.id
    }

    #[must_use]
    pub const fn shared(&self) -> &SharedStorage {
        &self.shared
    }

    #[must_use]
    pub const fn channel(&self) -> &NotificationChannel {
        &self.channel
    }

    #[must_use]
    pub const fn cart(&self) -> &CartStore {
        &self.cart
    }

    #[must_use]
    pub const fn wishlist(&self) -> &WishlistStore {
        &self.wishlist
    }

    #[must_use]
    pub fn observe_cart(&self) -> CollectionObserver<Cart> {
        CollectionObserver::mount(&self.cart)
    }

    #[must_use]
    pub fn observe_wishlist(&self) -> CollectionObserver<Wishlist> {
        CollectionObserver::mount(&self.wishlist)
    }
}
