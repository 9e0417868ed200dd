//! Origin-scoped key-value storage.
//!
//! The collection store persists through a [`StorageArea`], the equivalent of
//! a browser's `localStorage`: small, synchronous, string keyed, and shared by
//! every browsing context of one origin.
//!
//! # Backends
//!
//! - [`InMemoryStorage`] - process-local, for tests and ephemeral profiles
//! - [`FileStorage`] - a JSON file on disk that survives restarts and is
//!   visible to other processes (the CLI, another server)
//!
//! # Contexts and storage events
//!
//! [`SharedStorage`] wraps a backend for a whole origin and hands out one
//! [`ContextStorage`] per browsing context. A write through one context fires
//! a [`StorageEvent`] at the storage listeners of every *other* context, never
//! at the writer. Writes made by other processes are picked up by the
//! [`StorageWatcher`] and reported with [`EventSource::External`].

mod area;
mod file;
mod memory;
mod shared;
mod watch;

pub use area::{StorageArea, StorageError};
pub use file::FileStorage;
pub use memory::InMemoryStorage;
pub use shared::{ContextId, ContextStorage, EventSource, SharedStorage, StorageEvent};
pub use watch::StorageWatcher;
