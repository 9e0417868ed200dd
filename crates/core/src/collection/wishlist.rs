//! The wishlist: a set of product ids.

use crate::types::ProductId;

use super::{Collection, CollectionError, CollectionKind};

/// Membership set of product ids, kept in insertion order.
///
/// Equality ignores order.
#[derive(Debug, Clone, Default)]
pub struct Wishlist {
    ids: Vec<ProductId>,
}

impl Wishlist {
    #[must_use]
    pub const fn new() -> Self {
        Self { ids: Vec::new() }
    }

    #[must_use]
    pub fn contains(&self, product_id: ProductId) -> bool {
        self.ids.contains(&product_id)
    }

    /// Add `product_id`. Returns `false` if it was already present.
    pub fn insert(&mut self, product_id: ProductId) -> bool {
        if self.contains(product_id) {
            return false;
        }
        self.ids.push(product_id);
        true
    }

    /// Remove `product_id`. Returns `false` if it was absent.
    pub fn remove(&mut self, product_id: ProductId) -> bool {
        let before = self.ids.len();
        self.ids.retain(|id| *id != product_id);
        self.ids.len() != before
    }

    /// Flip membership of `product_id` and return the new membership.
    pub fn toggle(&mut self, product_id: ProductId) -> bool {
        if self.remove(product_id) {
            false
        } else {
            self.ids.push(product_id);
            true
        }
    }

    /// Ids in the order they were added.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = ProductId> + '_ {
        self.ids.iter().copied()
    }
}

impl FromIterator<ProductId> for Wishlist {
    fn from_iter<I: IntoIterator<Item = ProductId>>(iter: I) -> Self {
        let mut wishlist = Self::new();
        for id in iter {
            wishlist.insert(id);
        }
        wishlist
    }
}

impl PartialEq for Wishlist {
    fn eq(&self, other: &Self) -> bool {
        self.ids.len() == other.ids.len() && self.ids.iter().all(|id| other.contains(*id))
    }
}

impl Eq for Wishlist {}

impl Collection for Wishlist {
    const KIND: CollectionKind = CollectionKind::Wishlist;

    fn decode(raw: &str) -> Result<Self, CollectionError> {
        let ids: Vec<ProductId> =
            serde_json::from_str(raw).map_err(|source| CollectionError::Malformed {
                kind: Self::KIND,
                source,
            })?;
        Ok(ids.into_iter().collect())
    }

    fn encode(&self) -> Result<String, CollectionError> {
        serde_json::to_string(&self.ids).map_err(|source| CollectionError::Encode {
            kind: Self::KIND,
            source,
        })
    }

    fn len(&self) -> usize {
        self.ids.len()
    }
}
