//! Wishlist operations over the shared store.

use mosso_core::{ProductId, Wishlist};

use super::{SharedCollectionStore, StoreError};

pub type WishlistStore = SharedCollectionStore<Wishlist>;

impl SharedCollectionStore<Wishlist> {
    /// Flip membership of a product, deciding against freshly read storage.
    /// Returns whether the product is now a member.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if storage cannot be read or written.
    pub fn toggle(&self, product_id: ProductId) -> Result<bool, StoreError> {
        let member = self.mutate(|wishlist| wishlist.toggle(product_id))?;
        tracing::debug!(product_id = %product_id, member, "Toggled wishlist");
        Ok(member)
    }

    /// Membership according to the current snapshot. Does not re-read
    /// storage once hydrated.
    #[must_use]
    pub fn is_member(&self, product_id: ProductId) -> bool {
        self.read().contains(product_id)
    }

    #[must_use]
    pub fn wishlist(&self) -> Wishlist {
        self.read()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.read().iter().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::channel::NotificationChannel;
    use crate::storage::{InMemoryStorage, SharedStorage, StorageArea};

    fn wishlist_store(shared: &SharedStorage) -> WishlistStore {
        WishlistStore::new(shared.context(), NotificationChannel::new())
    }

    #[test]
    fn test_toggle_twice_restores_membership() {
        let shared = SharedStorage::new(InMemoryStorage::new());
        let store = wishlist_store(&shared);
        let id = ProductId::new(3);

        assert!(!store.is_member(id));
        assert!(store.toggle(id).unwrap());
        assert!(store.is_member(id));
        assert!(!store.toggle(id).unwrap());
        assert!(!store.is_member(id));
        assert!(store.is_empty());
    }

    #[test]
    fn test_toggle_reads_fresh_across_contexts() {
        let shared = SharedStorage::new(InMemoryStorage::new());
        let a = wishlist_store(&shared);
        let b = wishlist_store(&shared);
        let id = ProductId::new(8);

        // b hydrates before a adds, then toggles: it must remove, not re-add.
        assert!(!b.is_member(id));
        a.toggle(id).unwrap();
        assert!(!b.toggle(id).unwrap());
        assert!(!a.is_member(id));
    }

    #[test]
    fn test_persisted_layout() {
        let shared = SharedStorage::new(InMemoryStorage::new());
        let store = wishlist_store(&shared);
        for n in [1, 3, 8] {
            store.toggle(ProductId::new(n)).unwrap();
        }
        assert_eq!(
            shared.area().get_item("mosso-wishlist").unwrap().as_deref(),
            Some("[1,3,8]")
        );
        assert_eq!(wishlist_store(&shared).len(), 3);
    }
}
