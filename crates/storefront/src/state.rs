//! Application state shared across handlers.

use std::sync::Arc;

use crate::catalog::Catalog;
use crate::config::StorefrontConfig;
use crate::context::BrowsingContext;
use crate::storage::SharedStorage;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc`. The server acts as a single
/// browsing context over the shared storage area; other processes using the
/// same data directory show up as external storage events.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    catalog: Catalog,
    storage: SharedStorage,
    context: BrowsingContext,
}

impl AppState {
    /// Create a new application state, opening the server's browsing context.
    #[must_use]
    pub fn new(config: StorefrontConfig, catalog: Catalog, storage: SharedStorage) -> Self {
        let context = BrowsingContext::open(&storage);
        tracing::info!(context = %context.id(), products = catalog.len(), "Application state ready");

        Self {
            inner: Arc::new(AppStateInner {
                config,
                catalog,
                storage,
                context,
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.inner.catalog
    }

    /// The origin-wide storage area.
    #[must_use]
    pub fn storage(&self) -> &SharedStorage {
        &self.inner.storage
    }

    /// The server's browsing context.
    #[must_use]
    pub fn context(&self) -> &BrowsingContext {
        &self.inner.context
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("context", &self.inner.context.id())
            .field("products", &self.inner.catalog.len())
            .finish_non_exhaustive()
    }
}
