//! Polling watcher for writes made by other processes.
//!
//! A browser delivers a `storage` event when another tab writes the same
//! origin's storage. Here another tab may be a separate process sharing the
//! storage file, so the watcher polls the tracked keys and dispatches an
//! external [`StorageEvent`](super::StorageEvent) whenever a value changed
//! without a write from this process.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;

use super::SharedStorage;

/// Background poller over a fixed set of keys.
#[derive(Debug, Clone)]
pub struct StorageWatcher {
    storage: SharedStorage,
    keys: Arc<[String]>,
    interval: Duration,
}

impl StorageWatcher {
    pub fn new<I, K>(storage: SharedStorage, keys: I, interval: Duration) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<String>,
    {
        Self {
            storage,
            keys: keys.into_iter().map(Into::into).collect(),
            interval,
        }
    }

    /// Run one poll on the blocking pool.
    pub async fn poll_once(&self) -> Vec<String> {
        let storage = self.storage.clone();
        let keys = Arc::clone(&self.keys);

        match tokio::task::spawn_blocking(move || storage.poll_external_changes(&keys)).await {
            Ok(Ok(changed)) => changed,
            Ok(Err(e)) => {
                tracing::warn!(error = %e, "Storage poll failed");
                Vec::new()
            }
            Err(e) => {
                tracing::error!(error = %e, "Storage poll task panicked");
                Vec::new()
            }
        }
    }

    /// Spawn the polling loop on the current tokio runtime.
    ///
    /// The loop runs until the returned handle is aborted or the runtime
    /// shuts down.
    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(async move {
            tracing::info!(
                interval_ms = self.interval.as_millis(),
                keys = ?self.keys,
                "Storage watcher started"
            );
            let mut ticker = tokio::time::interval(self.interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                self.poll_once().await;
            }
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::storage::{FileStorage, StorageArea};

    #[tokio::test]
    async fn test_poll_once_reports_external_file_writes() {
        let dir = tempfile::TempDir::new().unwrap();
        let shared = SharedStorage::new(FileStorage::in_dir(dir.path()));
        let context = shared.context();

        let events = Arc::new(AtomicUsize::new(0));
        let _subscription = {
            let events = Arc::clone(&events);
            context.on_storage(move |_| {
                events.fetch_add(1, Ordering::SeqCst);
            })
        };

        let watcher = StorageWatcher::new(
            shared.clone(),
            ["mosso-cart"],
            Duration::from_millis(10),
        );
        assert!(watcher.poll_once().await.is_empty());

        // Another process writing the same file.
        FileStorage::in_dir(dir.path())
            .set_item("mosso-cart", "[[8,2]]")
            .unwrap();

        assert_eq!(watcher.poll_once().await, vec!["mosso-cart".to_string()]);
        assert_eq!(events.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_spawned_watcher_can_be_aborted() {
        let shared = SharedStorage::new(crate::storage::InMemoryStorage::new());
        let handle =
            StorageWatcher::new(shared, ["mosso-cart"], Duration::from_millis(5)).spawn();
        tokio::time::sleep(Duration::from_millis(20)).await;
        handle.abort();
        assert!(handle.await.unwrap_err().is_cancelled());
    }
}
