//! Collections joined with catalog products for display.

use mosso_core::{Cart, CurrencyCode, Price, Product, ProductId, Wishlist};
use serde::Serialize;

use super::Catalog;

/// A cart line with its product resolved.
#[derive(Debug, Clone, Serialize)]
pub struct CartLineView {
    pub product: Product,
    pub quantity: u32,
    pub line_total: Price,
    /// Formatted `line_total`, e.g. `$370.00`.
    pub line_total_display: String,
}

/// What the cart page shows.
#[derive(Debug, Clone, Serialize)]
pub struct CartSummary {
    pub lines: Vec<CartLineView>,
    pub subtotal: Price,
    pub subtotal_display: String,
    /// Distinct product ids stored in the cart, including ids the catalog
    /// no longer lists.
    pub count: usize,
}

impl CartSummary {
    #[must_use]
    pub fn build(cart: &Cart, catalog: &Catalog) -> Self {
        let lines: Vec<CartLineView> = cart
            .lines()
            .filter_map(|line| {
                let product = catalog.get(line.product_id)?;
                let line_total = product.price.times(line.quantity);
                Some(CartLineView {
                    product: product.clone(),
                    quantity: line.quantity,
                    line_total,
                    line_total_display: line_total.display(),
                })
            })
            .collect();

        let currency = lines
            .first()
            .map_or_else(CurrencyCode::default, |line| line.line_total.currency_code);
        let subtotal = Price::new(
            lines.iter().map(|line| line.line_total.amount).sum(),
            currency,
        );

        Self {
            subtotal_display: subtotal.display(),
            subtotal,
            count: cart.count(),
            lines,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// What the wishlist page shows.
#[derive(Debug, Clone, Serialize)]
pub struct WishlistSummary {
    /// Wishlisted products in catalog order.
    pub products: Vec<Product>,
    pub count: usize,
}

impl WishlistSummary {
    #[must_use]
    pub fn build(wishlist: &Wishlist, catalog: &Catalog) -> Self {
        let products: Vec<Product> = catalog
            .all()
            .iter()
            .filter(|p| wishlist.contains(p.id))
            .cloned()
            .collect();
        Self {
            count: products.len(),
            products,
        }
    }

    #[must_use]
    pub fn contains(&self, id: ProductId) -> bool {
        self.products.iter().any(|p| p.id == id)
    }
}
