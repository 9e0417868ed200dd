//! Static product catalog.
//!
//! The catalog is an ordered, immutable list of products loaded once at
//! start-up, either from the built-in data file or from a configured JSON
//! file of the same shape. Collections are never validated against it;
//! views filter out ids it does not know.

mod summary;

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use mosso_core::{Product, ProductId, ProductStyle};
use serde::Serialize;
use thiserror::Error;

pub use summary::{CartLineView, CartSummary, WishlistSummary};

/// Products shown per page of the collections listing.
pub const PRODUCTS_PER_PAGE: usize = 8;

/// Products shown on the home page.
pub const FEATURED_COUNT: usize = 6;

const BUILTIN_CATALOG: &str = include_str!("../../data/catalog.json");

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read catalog {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid catalog data: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("duplicate product id {0} in catalog")]
    DuplicateId(ProductId),
}

/// One page of a (possibly filtered) product listing.
#[derive(Debug, Clone, Serialize)]
pub struct CatalogPage {
    pub products: Vec<Product>,
    /// 1-based page number that was requested.
    pub page: usize,
    pub total_pages: usize,
    pub total_products: usize,
    pub style: Option<ProductStyle>,
}

/// The product catalog. Cheap to clone.
#[derive(Debug, Clone)]
pub struct Catalog {
    products: Arc<Vec<Product>>,
}

impl Catalog {
    /// The catalog compiled into the binary.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` if the built-in data does not parse.
    pub fn builtin() -> Result<Self, CatalogError> {
        Self::from_json(BUILTIN_CATALOG)
    }

    /// Load a catalog from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` if the file cannot be read or parsed, or
    /// lists an id twice.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| CatalogError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let catalog = Self::from_json(&json)?;
        tracing::info!(path = %path.display(), products = catalog.len(), "Loaded catalog");
        Ok(catalog)
    }

    /// # Errors
    ///
    /// Returns `CatalogError` if `json` is not a product array or lists an
    /// id twice.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let products: Vec<Product> = serde_json::from_str(json)?;
        Self::from_products(products)
    }

    /// # Errors
    ///
    /// Returns `CatalogError::DuplicateId` if two products share an id.
    pub fn from_products(products: Vec<Product>) -> Result<Self, CatalogError> {
        let mut seen = HashSet::with_capacity(products.len());
        if let Some(duplicate) = products.iter().find(|p| !seen.insert(p.id)) {
            return Err(CatalogError::DuplicateId(duplicate.id));
        }
        Ok(Self {
            products: Arc::new(products),
        })
    }

    #[must_use]
    pub fn all(&self) -> &[Product] {
        &self.products
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.products.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    #[must_use]
    pub fn get(&self, id: ProductId) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    #[must_use]
    pub fn contains(&self, id: ProductId) -> bool {
        self.get(id).is_some()
    }

    pub fn by_style(&self, style: ProductStyle) -> impl Iterator<Item = &Product> {
        self.products.iter().filter(move |p| p.style == style)
    }

    /// Style filters in display order.
    #[must_use]
    pub const fn styles(&self) -> &'static [ProductStyle] {
        &ProductStyle::ALL
    }

    #[must_use]
    pub fn featured(&self) -> &[Product] {
        &self.products[..FEATURED_COUNT.min(self.products.len())]
    }

    /// Every product other than `id`, in catalog order.
    pub fn related(&self, id: ProductId) -> impl Iterator<Item = &Product> {
        self.products.iter().filter(move |p| p.id != id)
    }

    /// One page of the listing, optionally filtered by style.
    ///
    /// Pages are 1-based; page 0 is treated as page 1. A page past the end
    /// is empty but still reports the totals.
    #[must_use]
    pub fn page(&self, style: Option<ProductStyle>, page: usize) -> CatalogPage {
        let page = page.max(1);
        let matching: Vec<&Product> = self
            .products
            .iter()
            .filter(|p| style.is_none_or(|s| p.style == s))
            .collect();

        let total_products = matching.len();
        let products = matching
            .into_iter()
            .skip((page - 1).saturating_mul(PRODUCTS_PER_PAGE))
            .take(PRODUCTS_PER_PAGE)
            .cloned()
            .collect();

        CatalogPage {
            products,
            page,
            total_pages: total_products.div_ceil(PRODUCTS_PER_PAGE),
            total_products,
            style,
        }
    }
}
