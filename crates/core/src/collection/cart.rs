//! The cart: a quantity per product id.

use crate::types::ProductId;

use super::{Collection, CollectionError, CollectionKind};

/// One cart entry. `quantity` is always at least 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CartLine {
    pub product_id: ProductId,
    pub quantity: u32,
}

/// Quantity map from product id to a positive quantity.
///
/// Lines keep the position they were first added at. No line ever holds a
/// quantity of zero: every operation that would leave one removes the line
/// instead. Equality ignores line order.
#[derive(Debug, Clone, Default)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    #[must_use]
    pub const fn new() -> Self {
        Self { lines: Vec::new() }
    }

    /// Build a cart from `(id, quantity)` pairs.
    ///
    /// A repeated id takes the later quantity but keeps its first position;
    /// pairs with a quantity of zero or less are dropped.
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (ProductId, i64)>,
    {
        let mut cart = Self::new();
        for (product_id, quantity) in pairs {
            cart.set_quantity(product_id, quantity);
        }
        cart
    }

    /// Quantity held for `product_id`, if it is in the cart.
    #[must_use]
    pub fn quantity_of(&self, product_id: ProductId) -> Option<u32> {
        self.position(product_id)
            .and_then(|index| self.lines.get(index))
            .map(|line| line.quantity)
    }

    #[must_use]
    pub fn contains(&self, product_id: ProductId) -> bool {
        self.position(product_id).is_some()
    }

    /// Number of distinct products. This is the cart badge count; it is not
    /// the number of units.
    #[must_use]
    pub fn count(&self) -> usize {
        self.lines.len()
    }

    /// Sum of all quantities.
    #[must_use]
    pub fn total_units(&self) -> u64 {
        self.lines.iter().map(|line| u64::from(line.quantity)).sum()
    }

    /// Lines in the order they were first added.
    pub fn lines(&self) -> impl ExactSizeIterator<Item = CartLine> + '_ {
        self.lines.iter().copied()
    }

    /// Add `delta` units of `product_id`, inserting the line if absent.
    ///
    /// A negative or zero `delta` is a decrement: when the resulting
    /// quantity is not positive the line is removed, and an absent product
    /// stays absent.
    pub fn add(&mut self, product_id: ProductId, delta: i64) {
        let current = self.quantity_of(product_id).map_or(0, i64::from);
        self.set_quantity(product_id, current.saturating_add(delta));
    }

    /// Remove the line for `product_id`. Returns whether a line was removed.
    pub fn remove(&mut self, product_id: ProductId) -> bool {
        match self.position(product_id) {
            Some(index) => {
                self.lines.remove(index);
                true
            }
            None => false,
        }
    }

    /// Set the quantity for `product_id`; zero or less removes the line.
    pub fn set_quantity(&mut self, product_id: ProductId, quantity: i64) {
        if quantity <= 0 {
            self.remove(product_id);
            return;
        }

        let quantity = u32::try_from(quantity).unwrap_or(u32::MAX);
        match self.position(product_id).and_then(|index| self.lines.get_mut(index)) {
            Some(line) => line.quantity = quantity,
            None => self.lines.push(CartLine {
                product_id,
                quantity,
            }),
        }
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    fn position(&self, product_id: ProductId) -> Option<usize> {
        self.lines
            .iter()
            .position(|line| line.product_id == product_id)
    }
}

impl PartialEq for Cart {
    fn eq(&self, other: &Self) -> bool {
        self.lines.len() == other.lines.len()
            && self
                .lines
                .iter()
                .all(|line| other.quantity_of(line.product_id) == Some(line.quantity))
    }
}

impl Eq for Cart {}

impl Collection for Cart {
    const KIND: CollectionKind = CollectionKind::Cart;

    fn decode(raw: &str) -> Result<Self, CollectionError> {
        let pairs: Vec<(ProductId, i64)> =
            serde_json::from_str(raw).map_err(|source| CollectionError::Malformed {
                kind: Self::KIND,
                source,
            })?;
        Ok(Self::from_pairs(pairs))
    }

    fn encode(&self) -> Result<String, CollectionError> {
        let pairs: Vec<(ProductId, u32)> = self
            .lines
            .iter()
            .map(|line| (line.product_id, line.quantity))
            .collect();
        serde_json::to_string(&pairs).map_err(|source| CollectionError::Encode {
            kind: Self::KIND,
            source,
        })
    }

    fn len(&self) -> usize {
        self.count()
    }
}
