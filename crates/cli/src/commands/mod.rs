//! Command implementations.
//!
//! Commands write their output to any `io::Write` so they can be exercised
//! against a buffer in tests.

pub mod cart;
pub mod catalog;
pub mod wishlist;

use std::path::Path;

use mosso_core::ProductId;
use mosso_storefront::{
    BrowsingContext, StoreError,
    catalog::{Catalog, CatalogError},
    storage::{FileStorage, SharedStorage},
};
use thiserror::Error;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CliError {
    /// Reading or writing the storage file failed.
    #[error("{0}")]
    Store(#[from] StoreError),

    /// Catalog could not be loaded.
    #[error("{0}")]
    Catalog(#[from] CatalogError),

    /// Writing command output failed.
    #[error("output error: {0}")]
    Output(#[from] std::io::Error),

    /// The catalog lists no such product.
    #[error("Unknown product: {0}")]
    UnknownProduct(ProductId),

    /// Style filter names no known style.
    #[error("Unknown style: {0}")]
    UnknownStyle(String),
}

/// The catalog plus one browsing context over the data directory.
pub struct Workspace {
    pub catalog: Catalog,
    pub context: BrowsingContext,
}

impl Workspace {
    /// Open the storage file in `data_dir` and load the catalog.
    ///
    /// # Errors
    ///
    /// Returns `CliError::Catalog` if the catalog cannot be loaded.
    pub fn open(data_dir: &Path, catalog_path: Option<&Path>) -> Result<Self, CliError> {
        let catalog = match catalog_path {
            Some(path) => Catalog::load(path)?,
            None => Catalog::builtin()?,
        };
        let storage = SharedStorage::new(FileStorage::in_dir(data_dir));
        tracing::debug!(data_dir = %data_dir.display(), "Opened workspace");

        Ok(Self {
            catalog,
            context: BrowsingContext::open(&storage),
        })
    }

    fn require_product(&self, product_id: ProductId) -> Result<(), CliError> {
        if self.catalog.contains(product_id) {
            Ok(())
        } else {
            Err(CliError::UnknownProduct(product_id))
        }
    }
}
