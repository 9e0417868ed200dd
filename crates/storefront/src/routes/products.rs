//! Catalog route handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use mosso_core::{Product, ProductId, ProductStyle};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::catalog::CatalogPage;
use crate::error::{AppError, Result};
use crate::routes::blocking;
use crate::state::AppState;

/// Filter label that means "no style filter".
pub const ALL_STYLES: &str = "All Collections";

/// Listing query parameters.
#[derive(Debug, Deserialize)]
pub struct ListingQuery {
    pub style: Option<String>,
    pub page: Option<usize>,
}

/// Product detail with the products shown beneath it.
#[derive(Debug, Serialize)]
pub struct ProductDetail {
    pub product: Product,
    pub price_display: String,
    pub related: Vec<Product>,
    pub wishlisted: bool,
    /// Units of this product already in the cart.
    pub in_cart: u32,
}

/// Parse a style filter; empty, `all` and [`ALL_STYLES`] mean no filter.
fn parse_style_filter(raw: Option<&str>) -> Result<Option<ProductStyle>> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(raw) if raw.eq_ignore_ascii_case("all") || raw == ALL_STYLES => Ok(None),
        Some(raw) => raw
            .parse()
            .map(Some)
            .map_err(|e| AppError::BadRequest(format!("{e}"))),
    }
}

/// List style filters in display order.
#[instrument(skip(state))]
pub async fn styles(State(state): State<AppState>) -> Json<&'static [ProductStyle]> {
    Json(state.catalog().styles())
}

/// Paginated product listing.
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<ListingQuery>,
) -> Result<Json<CatalogPage>> {
    let style = parse_style_filter(query.style.as_deref())?;
    let page = state.catalog().page(style, query.page.unwrap_or(1));
    Ok(Json(page))
}

/// Products featured on the home page.
#[instrument(skip(state))]
pub async fn featured(State(state): State<AppState>) -> Json<Vec<Product>> {
    Json(state.catalog().featured().to_vec())
}

/// Product detail.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
) -> Result<Json<ProductDetail>> {
    let catalog = state.catalog();
    let product = catalog
        .get(id)
        .cloned()
        .ok_or_else(|| AppError::NotFound(format!("product {id}")))?;

    let context = state.context().clone();
    let (wishlisted, in_cart) = blocking(move || {
        Ok((
            context.wishlist().is_member(id),
            context.cart().quantity_of(id).unwrap_or(0),
        ))
    })
    .await?;

    Ok(Json(ProductDetail {
        price_display: product.price.display(),
        related: catalog.related(id).cloned().collect(),
        product,
        wishlisted,
        in_cart,
    }))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_style_filter() {
        assert_eq!(parse_style_filter(None).unwrap(), None);
        assert_eq!(parse_style_filter(Some("")).unwrap(), None);
        assert_eq!(parse_style_filter(Some("All Collections")).unwrap(), None);
        assert_eq!(
            parse_style_filter(Some("avant-garde")).unwrap(),
            Some(ProductStyle::AvantGarde)
        );
        assert!(matches!(
            parse_style_filter(Some("Baroque")),
            Err(AppError::BadRequest(_))
        ));
    }
}
