//! Mosso storefront library.
//!
//! The heart of the crate is the shared local collection store: the cart and
//! the wishlist, persisted in an origin-scoped key-value storage area and
//! kept consistent across browsing contexts by change notifications.
//!
//! - [`storage`]: storage areas, browsing-context handles and storage events
//! - [`store`]: the read-fresh-then-write collection store
//! - [`observer`]: mounted observers that refresh on every change
//! - [`context`]: one browsing context wiring the pieces together
//! - [`catalog`]: the static product catalog and view summaries
//! - [`routes`]: the JSON API served by the `mosso-storefront` binary

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod catalog;
pub mod channel;
pub mod config;
pub mod context;
pub mod error;
pub mod middleware;
pub mod observer;
pub mod routes;
pub mod state;
pub mod storage;
pub mod store;
pub mod subscription;

pub use context::BrowsingContext;
pub use store::{CartStore, SharedCollectionStore, StoreError, WishlistStore};
