//! Listener registries and the disposers they hand out.
//!
//! Both the in-process notification channel and the storage-event fan-out
//! keep their callbacks in a [`Listeners`] registry. Registering returns a
//! [`Subscription`]; dropping it (or calling [`Subscription::dispose`])
//! removes the callback again, so subscribe-on-mount / unsubscribe-on-unmount
//! is tied to ownership.

use std::sync::{Arc, Mutex, PoisonError, Weak};

type Callback<E> = Arc<dyn Fn(&E) + Send + Sync>;

struct Registry<E> {
    next_id: u64,
    entries: Vec<(u64, Callback<E>)>,
}

/// Something a [`Subscription`] can detach itself from.
trait Unsubscribe: Send + Sync {
    fn unsubscribe(&self, id: u64);
}

impl<E: 'static> Unsubscribe for Mutex<Registry<E>> {
    fn unsubscribe(&self, id: u64) {
        let mut registry = self.lock().unwrap_or_else(PoisonError::into_inner);
        registry.entries.retain(|(entry_id, _)| *entry_id != id);
    }
}

/// A registry of callbacks for events of type `E`.
pub struct Listeners<E> {
    registry: Arc<Mutex<Registry<E>>>,
}

impl<E> Clone for Listeners<E> {
    fn clone(&self) -> Self {
        Self {
            registry: Arc::clone(&self.registry),
        }
    }
}

impl<E: 'static> Default for Listeners<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: 'static> std::fmt::Debug for Listeners<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Listeners")
            .field("len", &self.len())
            .finish()
    }
}

impl<E: 'static> Listeners<E> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            registry: Arc::new(Mutex::new(Registry {
                next_id: 0,
                entries: Vec::new(),
            })),
        }
    }

    /// Register `callback`; it stays registered until the returned
    /// subscription is dropped.
    #[must_use = "dropping the subscription unregisters the listener immediately"]
    pub fn add<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&E) + Send + Sync + 'static,
    {
        let id = {
            let mut registry = self.registry.lock().unwrap_or_else(PoisonError::into_inner);
            let id = registry.next_id;
            registry.next_id += 1;
            registry.entries.push((id, Arc::new(callback)));
            id
        };

        let registry: Arc<dyn Unsubscribe> = self.registry.clone();
        Subscription {
            handles: vec![(Arc::downgrade(&registry), id)],
        }
    }

    /// Invoke every registered callback with `event`.
    ///
    /// The listener list is copied before dispatch, so callbacks may
    /// register, dispose, or trigger further events without deadlocking.
    /// A listener added during dispatch does not see the current event.
    pub fn emit(&self, event: &E) {
        let callbacks: Vec<Callback<E>> = {
            let registry = self.registry.lock().unwrap_or_else(PoisonError::into_inner);
            registry
                .entries
                .iter()
                .map(|(_, callback)| Arc::clone(callback))
                .collect()
        };

        for callback in callbacks {
            callback(event);
        }
    }

    /// Number of registered callbacks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.registry
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entries
            .len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Disposer for one or more registered listeners.
///
/// Unregisters on drop. Outliving the registry is harmless.
#[must_use = "dropping the subscription unregisters the listener immediately"]
pub struct Subscription {
    handles: Vec<(Weak<dyn Unsubscribe>, u64)>,
}

impl Subscription {
    /// Combine two subscriptions into one disposer.
    pub fn join(mut self, mut other: Self) -> Self {
        self.handles.append(&mut other.handles);
        self
    }

    /// Unregister now rather than at drop.
    pub fn dispose(self) {
        drop(self);
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        for (registry, id) in self.handles.drain(..) {
            if let Some(registry) = registry.upgrade() {
                registry.unsubscribe(id);
            }
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("listeners", &self.handles.len())
            .finish()
    }
}
