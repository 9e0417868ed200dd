//! Integration tests for Mosso.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p mosso-integration-tests
//! ```
//!
//! Each test spawns the storefront router on an ephemeral local port over a
//! fresh temporary data directory, then drives it with `reqwest`.
//!
//! # Test Categories
//!
//! - `catalog_api` - Styles, listing, featured and product detail
//! - `cart_api` - Cart mutations and summaries
//! - `wishlist_api` - Wishlist toggling and summaries
//! - `cross_context` - Writes from other processes and the event stream

use std::net::SocketAddr;
use std::time::Duration;

use mosso_core::CollectionKind;
use mosso_storefront::{
    BrowsingContext,
    catalog::Catalog,
    config::StorefrontConfig,
    routes,
    state::AppState,
    storage::{FileStorage, SharedStorage, StorageWatcher},
};
use tempfile::TempDir;
use tokio::task::JoinHandle;

/// A storefront served on `127.0.0.1` for the duration of a test.
pub struct TestServer {
    pub client: reqwest::Client,
    pub addr: SocketAddr,
    data_dir: TempDir,
    watcher: StorageWatcher,
    server: JoinHandle<()>,
}

impl TestServer {
    /// Start a server over an empty data directory.
    ///
    /// # Panics
    ///
    /// Panics if the temporary directory or listener cannot be created.
    #[allow(clippy::unwrap_used)]
    pub async fn spawn() -> Self {
        let data_dir = TempDir::new().unwrap();
        let storage = SharedStorage::new(FileStorage::in_dir(data_dir.path()));

        let config = StorefrontConfig {
            data_dir: data_dir.path().to_path_buf(),
            storage_poll_interval: None,
            ..StorefrontConfig::default()
        };
        let state = AppState::new(config, Catalog::builtin().unwrap(), storage.clone());

        // Polled by hand so tests decide when external writes are noticed.
        let watcher = StorageWatcher::new(
            storage,
            CollectionKind::ALL.map(|kind| kind.storage_key()),
            Duration::from_secs(3600),
        );
        watcher.poll_once().await;

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let app = routes::app(state);
        let server = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            client: reqwest::Client::new(),
            addr,
            data_dir,
            watcher,
            server,
        }
    }

    /// Absolute URL for `path`.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{path}", self.addr)
    }

    /// A browsing context in a separate "process": its own shared storage
    /// over the same data directory, invisible to the server until polled.
    #[must_use]
    pub fn external_context(&self) -> BrowsingContext {
        let storage = SharedStorage::new(FileStorage::in_dir(self.data_dir.path()));
        BrowsingContext::open(&storage)
    }

    /// Run one storage poll, as the background watcher would.
    pub async fn poll_storage(&self) -> Vec<String> {
        self.watcher.poll_once().await
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.server.abort();
    }
}
