//! Mosso Core - Shared types library.
//!
//! This crate provides the types shared by every Mosso component:
//! - `storefront` - Collection store, catalog provider and JSON API
//! - `cli` - Command-line access to the same persisted collections
//!
//! # Architecture
//!
//! The core crate contains only types and pure operations - no I/O, no
//! storage access, no event dispatch. Persisting and synchronizing the
//! collections is the storefront crate's job.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, prices, product styles and product records
//! - [`collection`] - The cart (quantity map) and wishlist (membership set)
//!   values together with their persisted JSON format

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod collection;
pub mod types;

pub use collection::{Cart, Collection, CollectionError, CollectionKind, Wishlist};
pub use types::*;
