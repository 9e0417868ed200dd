//! Wishlist route handlers.

use axum::{
    Json,
    extract::{Path, State},
};
use mosso_core::ProductId;
use serde::Serialize;
use tracing::instrument;

use crate::catalog::WishlistSummary;
use crate::error::{AppError, Result, add_breadcrumb};
use crate::routes::blocking;
use crate::state::AppState;

/// Membership of one product.
#[derive(Debug, Serialize)]
pub struct WishlistStatus {
    pub product_id: ProductId,
    pub wishlisted: bool,
}

/// Wishlist page data.
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>) -> Result<Json<WishlistSummary>> {
    let wishlist_store = state.context().wishlist().clone();
    let wishlist = blocking(move || Ok(wishlist_store.wishlist())).await?;
    Ok(Json(WishlistSummary::build(&wishlist, state.catalog())))
}

/// Whether a product is wishlisted.
#[instrument(skip(state))]
pub async fn status(
    State(state): State<AppState>,
    Path(product_id): Path<ProductId>,
) -> Result<Json<WishlistStatus>> {
    let wishlist_store = state.context().wishlist().clone();
    let wishlisted = blocking(move || Ok(wishlist_store.is_member(product_id))).await?;
    Ok(Json(WishlistStatus {
        product_id,
        wishlisted,
    }))
}

/// Toggle a product's membership.
#[instrument(skip(state))]
pub async fn toggle(
    State(state): State<AppState>,
    Path(product_id): Path<ProductId>,
) -> Result<Json<WishlistStatus>> {
    if !state.catalog().contains(product_id) {
        return Err(AppError::NotFound(format!("product {product_id}")));
    }

    let wishlist_store = state.context().wishlist().clone();
    let wishlisted = blocking(move || Ok(wishlist_store.toggle(product_id)?)).await?;

    let message = if wishlisted {
        "Added to wishlist"
    } else {
        "Removed from wishlist"
    };
    let id_field = product_id.to_string();
    add_breadcrumb("wishlist", message, Some(&[("product_id", id_field.as_str())]));

    Ok(Json(WishlistStatus {
        product_id,
        wishlisted,
    }))
}
