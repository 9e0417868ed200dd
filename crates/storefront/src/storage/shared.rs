//! Origin-wide storage shared between browsing contexts.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use serde::Serialize;

use super::{StorageArea, StorageError};
use crate::subscription::{Listeners, Subscription};

/// Identifies one browsing context (one tab) within a [`SharedStorage`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ContextId(u64);

impl ContextId {
    #[must_use]
    pub const fn as_u64(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for ContextId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ctx-{}", self.0)
    }
}

/// Who changed a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "type", content = "context")]
pub enum EventSource {
    /// Another browsing context in this process.
    Context(ContextId),
    /// A writer outside this process, noticed by the watcher.
    External,
}

/// A key changed in the shared storage area.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StorageEvent {
    pub key: String,
    pub source: EventSource,
}

struct SharedInner {
    area: Arc<dyn StorageArea>,
    listeners: Listeners<StorageEvent>,
    next_context: AtomicU64,
    // Last value this process wrote or observed per key, used by the
    // watcher to tell external writes apart from our own.
    known: Mutex<HashMap<String, Option<String>>>,
}

/// The storage area of one origin, shared by all of its browsing contexts.
///
/// Cheap to clone.
#[derive(Clone)]
pub struct SharedStorage {
    inner: Arc<SharedInner>,
}

impl std::fmt::Debug for SharedStorage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SharedStorage")
            .field("listeners", &self.inner.listeners.len())
            .finish_non_exhaustive()
    }
}

impl SharedStorage {
    #[must_use]
    pub fn new(area: impl StorageArea + 'static) -> Self {
        Self::from_arc(Arc::new(area))
    }

    #[must_use]
    pub fn from_arc(area: Arc<dyn StorageArea>) -> Self {
        Self {
            inner: Arc::new(SharedInner {
                area,
                listeners: Listeners::new(),
                next_context: AtomicU64::new(1),
                known: Mutex::new(HashMap::new()),
            }),
        }
    }

    /// Open a handle for a new browsing context.
    #[must_use]
    pub fn context(&self) -> ContextStorage {
        let id = ContextId(self.inner.next_context.fetch_add(1, Ordering::Relaxed));
        tracing::debug!(context = %id, "Opened storage context");
        ContextStorage {
            id,
            shared: self.clone(),
        }
    }

    /// The underlying backend.
    #[must_use]
    pub fn area(&self) -> &dyn StorageArea {
        self.inner.area.as_ref()
    }

    /// Number of storage listeners across all contexts.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.inner.listeners.len()
    }

    /// Compare `keys` against the last value seen in this process and fire
    /// an external storage event for each one that changed. Returns the keys
    /// that changed.
    ///
    /// The first poll of a key only records its value.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be read.
    pub fn poll_external_changes(&self, keys: &[String]) -> Result<Vec<String>, StorageError> {
        let mut changed = Vec::new();
        for key in keys {
            let current = self.inner.area.get_item(key)?;
            let mut known = self.inner.known.lock().unwrap_or_else(PoisonError::into_inner);
            match known.get(key) {
                Some(previous) if *previous == current => {}
                Some(_) => {
                    known.insert(key.clone(), current);
                    changed.push(key.clone());
                }
                None => {
                    known.insert(key.clone(), current);
                }
            }
        }

        for key in &changed {
            tracing::debug!(key = %key, "External storage change detected");
            self.inner.listeners.emit(&StorageEvent {
                key: key.clone(),
                source: EventSource::External,
            });
        }

        Ok(changed)
    }

    fn record(&self, key: &str, value: Option<&str>) {
        self.inner
            .known
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), value.map(str::to_string));
    }
}

/// One browsing context's view of the shared storage.
///
/// Reads and writes go straight to the backend. Successful writes notify the
/// storage listeners of every other context.
#[derive(Clone, Debug)]
pub struct ContextStorage {
    id: ContextId,
    shared: SharedStorage,
}

impl ContextStorage {
    #[must_use]
    pub const fn id(&self) -> ContextId {
        self.id
    }

    /// The origin-wide storage this context belongs to.
    #[must_use]
    pub const fn shared(&self) -> &SharedStorage {
        &self.shared
    }

    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be read.
    pub fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.shared.inner.area.get_item(key)
    }

    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be written.
    pub fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.shared.inner.area.set_item(key, value)?;
        self.shared.record(key, Some(value));
        self.notify_others(key);
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be written.
    pub fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        self.shared.inner.area.remove_item(key)?;
        self.shared.record(key, None);
        self.notify_others(key);
        Ok(())
    }

    /// Observe changes made by other contexts or other processes.
    ///
    /// Writes made through this context are not reported here; they are
    /// announced on the context's own notification channel instead.
    pub fn on_storage<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&StorageEvent) + Send + Sync + 'static,
    {
        let own = self.id;
        self.shared.inner.listeners.add(move |event: &StorageEvent| {
            if event.source != EventSource::Context(own) {
                callback(event);
            }
        })
    }

    fn notify_others(&self, key: &str) {
        self.shared.inner.listeners.emit(&StorageEvent {
            key: key.to_string(),
            source: EventSource::Context(self.id),
        });
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::storage::InMemoryStorage;

    fn recorder(context: &ContextStorage) -> (Arc<Mutex<Vec<StorageEvent>>>, Subscription) {
        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&events);
        let subscription = context.on_storage(move |event| {
            sink.lock().unwrap().push(event.clone());
        });
        (events, subscription)
    }

    #[test]
    fn test_contexts_get_distinct_ids() {
        let shared = SharedStorage::new(InMemoryStorage::new());
        let a = shared.context();
        let b = shared.context();
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn test_write_notifies_other_contexts_only() {
        let shared = SharedStorage::new(InMemoryStorage::new());
        let writer = shared.context();
        let reader = shared.context();

        let (writer_events, _w) = recorder(&writer);
        let (reader_events, _r) = recorder(&reader);

        writer.set_item("mosso-cart", "[[1,1]]").unwrap();

        assert!(writer_events.lock().unwrap().is_empty());
        let seen = reader_events.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].key, "mosso-cart");
        assert_eq!(seen[0].source, EventSource::Context(writer.id()));
    }

    #[test]
    fn test_remove_notifies_other_contexts() {
        let shared = SharedStorage::new(InMemoryStorage::new());
        let writer = shared.context();
        let reader = shared.context();
        let (reader_events, _r) = recorder(&reader);

        writer.remove_item("mosso-wishlist").unwrap();
        assert_eq!(reader_events.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_poll_detects_writes_made_behind_our_back() {
        let backend: Arc<dyn StorageArea> = Arc::new(InMemoryStorage::new());
        let shared = SharedStorage::from_arc(Arc::clone(&backend));
        let context = shared.context();
        let (events, _s) = recorder(&context);
        let keys = vec!["mosso-cart".to_string()];

        // First poll only records the baseline.
        assert!(shared.poll_external_changes(&keys).unwrap().is_empty());

        backend.set_item("mosso-cart", "[[3,1]]").unwrap();
        assert_eq!(shared.poll_external_changes(&keys).unwrap(), keys);
        assert_eq!(events.lock().unwrap()[0].source, EventSource::External);

        // Unchanged since the last poll.
        assert!(shared.poll_external_changes(&keys).unwrap().is_empty());
    }

    #[test]
    fn test_poll_ignores_our_own_writes() {
        let shared = SharedStorage::new(InMemoryStorage::new());
        let context = shared.context();
        let keys = vec!["mosso-cart".to_string()];

        shared.poll_external_changes(&keys).unwrap();
        context.set_item("mosso-cart", "[[1,1]]").unwrap();
        assert!(shared.poll_external_changes(&keys).unwrap().is_empty());
    }
}
