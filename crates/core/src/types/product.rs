//! Product records supplied by the catalog.
//!
//! Products are read-only: nothing in the collection store ever creates,
//! changes or validates them.

use serde::{Deserialize, Serialize};

use super::{Price, ProductId};

/// Design style a product belongs to. Collections pages filter on this.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProductStyle {
    Modern,
    Classic,
    Minimalist,
    #[serde(rename = "Avant-Garde")]
    AvantGarde,
    Natural,
    Industrial,
}

impl ProductStyle {
    /// Every style, in the order the storefront lists its filters.
    pub const ALL: [Self; 6] = [
        Self::Modern,
        Self::Classic,
        Self::Minimalist,
        Self::AvantGarde,
        Self::Natural,
        Self::Industrial,
    ];

    /// Display label, identical to the serialized form.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Modern => "Modern",
            Self::Classic => "Classic",
            Self::Minimalist => "Minimalist",
            Self::AvantGarde => "Avant-Garde",
            Self::Natural => "Natural",
            Self::Industrial => "Industrial",
        }
    }
}

impl std::fmt::Display for ProductStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Error returned when a string names no known style.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown product style: {0}")]
pub struct ParseStyleError(pub String);

impl std::str::FromStr for ProductStyle {
    type Err = ParseStyleError;

    /// Parses a style label case-insensitively; `avant-garde`, `avantgarde`
    /// and `avant_garde` all name the same style.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .chars()
            .filter(|c| !matches!(c, '-' | '_' | ' '))
            .collect::<String>()
            .to_lowercase();

        Self::ALL
            .into_iter()
            .find(|style| style.label().replace('-', "").to_lowercase() == normalized)
            .ok_or_else(|| ParseStyleError(s.to_string()))
    }
}

/// A single label/value row of a product's specification table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Specification {
    pub label: String,
    pub value: String,
}

/// A catalog product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    pub image_url: String,
    pub alt_text: String,
    pub style: ProductStyle,
    pub price: Price,
    #[serde(default)]
    pub specifications: Vec<Specification>,
    #[serde(default)]
    pub gallery_images: Vec<String>,
}

impl Product {
    /// The main image followed by the gallery, as the detail view shows them.
    pub fn images(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.image_url.as_str()).chain(self.gallery_images.iter().map(String::as_str))
    }
}
