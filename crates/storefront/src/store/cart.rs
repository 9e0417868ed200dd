//! Cart operations over the shared store.

use mosso_core::{Cart, ProductId};

use super::{SharedCollectionStore, StoreError};

/// Quantity used by [`CartStore::add_to_cart`] callers that do not pick one.
pub const DEFAULT_ADD_QUANTITY: i64 = 1;

pub type CartStore = SharedCollectionStore<Cart>;

impl SharedCollectionStore<Cart> {
    /// Add `quantity` units of a product, inserting it if absent.
    ///
    /// A non-positive `quantity` decrements; a line that drops to zero is
    /// removed.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if storage cannot be read or written.
    pub fn add_to_cart(&self, product_id: ProductId, quantity: i64) -> Result<Cart, StoreError> {
        tracing::debug!(product_id = %product_id, quantity, "Adding to cart");
        self.mutate(|cart| {
            cart.add(product_id, quantity);
            cart.clone()
        })
    }

    /// Remove a product's line. Absent products are a no-op.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if storage cannot be read or written.
    pub fn remove_from_cart(&self, product_id: ProductId) -> Result<Cart, StoreError> {
        tracing::debug!(product_id = %product_id, "Removing from cart");
        self.mutate(|cart| {
            cart.remove(product_id);
            cart.clone()
        })
    }

    /// Set a product's quantity; zero or less removes it.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if storage cannot be read or written.
    pub fn update_quantity(
        &self,
        product_id: ProductId,
        quantity: i64,
    ) -> Result<Cart, StoreError> {
        tracing::debug!(product_id = %product_id, quantity, "Updating cart quantity");
        self.mutate(|cart| {
            cart.set_quantity(product_id, quantity);
            cart.clone()
        })
    }

    /// # Errors
    ///
    /// Returns `StoreError` if storage cannot be read or written.
    pub fn clear_cart(&self) -> Result<Cart, StoreError> {
        tracing::debug!("Clearing cart");
        self.mutate(|cart| {
            cart.clear();
            cart.clone()
        })
    }

    /// Current cart snapshot.
    #[must_use]
    pub fn cart(&self) -> Cart {
        self.read()
    }

    /// Number of distinct products in the cart.
    #[must_use]
    pub fn count(&self) -> usize {
        self.read().count()
    }

    #[must_use]
    pub fn quantity_of(&self, product_id: ProductId) -> Option<u32> {
        self.read().quantity_of(product_id)
    }

    /// Sum of quantities across all lines.
    #[must_use]
    pub fn total_units(&self) -> u64 {
        self.read().total_units()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::channel::NotificationChannel;
    use crate::storage::{InMemoryStorage, SharedStorage, StorageArea};

    fn id(n: i32) -> ProductId {
        ProductId::new(n)
    }

    fn cart_store(shared: &SharedStorage) -> CartStore {
        CartStore::new(shared.context(), NotificationChannel::new())
    }

    #[test]
    fn test_add_then_update_to_zero_scenario() {
        let shared = SharedStorage::new(InMemoryStorage::new());
        let store = cart_store(&shared);

        store.add_to_cart(id(1), DEFAULT_ADD_QUANTITY).unwrap();
        let cart = store.add_to_cart(id(1), 2).unwrap();
        assert_eq!(cart, Cart::from_pairs([(id(1), 3)]));
        assert_eq!(store.count(), 1);

        let cart = store.update_quantity(id(1), 0).unwrap();
        assert!(cart.lines().next().is_none());
        assert_eq!(store.count(), 0);
    }

    #[test]
    fn test_count_is_distinct_products() {
        let shared = SharedStorage::new(InMemoryStorage::new());
        let store = cart_store(&shared);
        store.add_to_cart(id(1), 3).unwrap();
        store.add_to_cart(id(2), 1).unwrap();
        assert_eq!(store.count(), 2);
        assert_eq!(store.total_units(), 4);
    }

    #[test]
    fn test_remove_absent_is_noop() {
        let shared = SharedStorage::new(InMemoryStorage::new());
        let store = cart_store(&shared);
        store.add_to_cart(id(7), 1).unwrap();
        let cart = store.remove_from_cart(id(8)).unwrap();
        assert_eq!(cart.quantity_of(id(7)), Some(1));
    }

    #[test]
    fn test_negative_update_removes() {
        let shared = SharedStorage::new(InMemoryStorage::new());
        let store = cart_store(&shared);
        store.add_to_cart(id(3), 2).unwrap();
        store.update_quantity(id(3), -4).unwrap();
        assert_eq!(store.quantity_of(id(3)), None);
    }

    #[test]
    fn test_persisted_layout() {
        let shared = SharedStorage::new(InMemoryStorage::new());
        let store = cart_store(&shared);
        store.add_to_cart(id(1), 2).unwrap();
        store.add_to_cart(id(7), 1).unwrap();
        assert_eq!(
            shared.area().get_item("mosso-cart").unwrap().as_deref(),
            Some("[[1,2],[7,1]]")
        );

        let reopened = cart_store(&shared);
        assert_eq!(
            reopened.cart(),
            Cart::from_pairs([(id(1), 2), (id(7), 1)])
        );
    }

    #[test]
    fn test_clear_cart() {
        let shared = SharedStorage::new(InMemoryStorage::new());
        let store = cart_store(&shared);
        store.add_to_cart(id(1), 1).unwrap();
        store.add_to_cart(id(2), 1).unwrap();
        store.clear_cart().unwrap();
        assert_eq!(store.count(), 0);
        assert_eq!(
            shared.area().get_item("mosso-cart").unwrap().as_deref(),
            Some("[]")
        );
    }

    #[test]
    fn test_other_context_sees_add() {
        let shared = SharedStorage::new(InMemoryStorage::new());
        let a = cart_store(&shared);
        let b = cart_store(&shared);

        assert_eq!(b.count(), 0);
        a.add_to_cart(id(5), 1).unwrap();
        assert_eq!(b.quantity_of(id(5)), Some(1));
    }
}
