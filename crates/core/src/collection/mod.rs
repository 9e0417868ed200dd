//! Collection values persisted by the storefront.
//!
//! Two collections exist, each stored under its own key as a JSON array:
//!
//! | Kind | Key | Format |
//! |------|-----|--------|
//! | [`Cart`] | `mosso-cart` | `[[productId, quantity], ...]` |
//! | [`Wishlist`] | `mosso-wishlist` | `[productId, ...]` |
//!
//! Both preserve insertion order, so the persisted arrays list entries in the
//! order they were first added.

mod cart;
mod wishlist;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use cart::{Cart, CartLine};
pub use wishlist::Wishlist;

/// Errors decoding or encoding a persisted collection.
#[derive(Debug, Error)]
pub enum CollectionError {
    /// Persisted text is not JSON or does not have the collection's shape.
    #[error("malformed {kind} data: {source}")]
    Malformed {
        kind: CollectionKind,
        #[source]
        source: serde_json::Error,
    },

    /// Serializing the collection failed.
    #[error("failed to encode {kind}: {source}")]
    Encode {
        kind: CollectionKind,
        #[source]
        source: serde_json::Error,
    },
}

/// Which collection a value, key or notification belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollectionKind {
    Cart,
    Wishlist,
}

impl CollectionKind {
    /// Both kinds, cart first.
    pub const ALL: [Self; 2] = [Self::Cart, Self::Wishlist];

    /// Key the collection is persisted under.
    #[must_use]
    pub const fn storage_key(&self) -> &'static str {
        match self {
            Self::Cart => "mosso-cart",
            Self::Wishlist => "mosso-wishlist",
        }
    }

    /// The kind persisted under `key`, if any.
    #[must_use]
    pub fn from_storage_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.storage_key() == key)
    }

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Cart => "cart",
            Self::Wishlist => "wishlist",
        }
    }
}

impl std::fmt::Display for CollectionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A collection value with a persisted text form.
///
/// Implementations are plain values: decoding never touches storage and the
/// empty collection is `Default::default()`.
pub trait Collection: Clone + Default + PartialEq + std::fmt::Debug + Send + Sync + 'static {
    /// Which collection this is.
    const KIND: CollectionKind;

    /// Parse the persisted text form.
    ///
    /// # Errors
    ///
    /// Returns `CollectionError::Malformed` if `raw` is not JSON or has the
    /// wrong shape.
    fn decode(raw: &str) -> Result<Self, CollectionError>;

    /// Render the persisted text form.
    ///
    /// # Errors
    ///
    /// Returns `CollectionError::Encode` if serialization fails.
    fn encode(&self) -> Result<String, CollectionError>;

    /// Number of distinct product ids held.
    fn len(&self) -> usize;

    /// Whether the collection holds no product ids.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Key the collection is persisted under.
    #[must_use]
    fn storage_key() -> &'static str {
        Self::KIND.storage_key()
    }
}
