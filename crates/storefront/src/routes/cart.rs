//! Cart route handlers.
//!
//! Every mutation goes through the server context's cart store, so it reads
//! the persisted cart fresh, writes it back and notifies observers before
//! the response is built.

use axum::{
    Json,
    extract::{Path, State},
};
use mosso_core::ProductId;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::catalog::CartSummary;
use crate::error::{AppError, Result, add_breadcrumb};
use crate::routes::blocking;
use crate::state::AppState;
use crate::store::DEFAULT_ADD_QUANTITY;

/// Add to cart request body.
#[derive(Debug, Deserialize)]
pub struct AddToCartRequest {
    pub product_id: ProductId,
    pub quantity: Option<i64>,
}

/// Update quantity request body.
#[derive(Debug, Deserialize)]
pub struct UpdateQuantityRequest {
    pub quantity: i64,
}

/// Cart badge.
#[derive(Debug, Serialize)]
pub struct CartCount {
    pub count: usize,
}

/// Cart page data.
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>) -> Result<Json<CartSummary>> {
    let cart_store = state.context().cart().clone();
    let cart = blocking(move || Ok(cart_store.cart())).await?;
    Ok(Json(CartSummary::build(&cart, state.catalog())))
}

/// Number of distinct products in the cart.
#[instrument(skip(state))]
pub async fn count(State(state): State<AppState>) -> Result<Json<CartCount>> {
    let cart_store = state.context().cart().clone();
    let count = blocking(move || Ok(cart_store.count())).await?;
    Ok(Json(CartCount { count }))
}

/// Add a product to the cart.
#[instrument(skip(state))]
pub async fn add(
    State(state): State<AppState>,
    Json(request): Json<AddToCartRequest>,
) -> Result<Json<CartSummary>> {
    let product_id = request.product_id;
    if !state.catalog().contains(product_id) {
        return Err(AppError::NotFound(format!("product {product_id}")));
    }
    let quantity = request.quantity.unwrap_or(DEFAULT_ADD_QUANTITY);

    let cart_store = state.context().cart().clone();
    let cart = blocking(move || Ok(cart_store.add_to_cart(product_id, quantity)?)).await?;

    let (id_field, quantity_field) = (product_id.to_string(), quantity.to_string());
    add_breadcrumb(
        "cart",
        "Added to cart",
        Some(&[("product_id", id_field.as_str()), ("quantity", quantity_field.as_str())]),
    );

    Ok(Json(CartSummary::build(&cart, state.catalog())))
}

/// Set a line's quantity; zero or less removes it.
#[instrument(skip(state))]
pub async fn update(
    State(state): State<AppState>,
    Path(product_id): Path<ProductId>,
    Json(request): Json<UpdateQuantityRequest>,
) -> Result<Json<CartSummary>> {
    let cart_store = state.context().cart().clone();
    let cart = blocking(move || Ok(cart_store.update_quantity(product_id, request.quantity)?))
        .await?;
    Ok(Json(CartSummary::build(&cart, state.catalog())))
}

/// Remove a line. Removing an absent product succeeds.
#[instrument(skip(state))]
pub async fn remove(
    State(state): State<AppState>,
    Path(product_id): Path<ProductId>,
) -> Result<Json<CartSummary>> {
    let cart_store = state.context().cart().clone();
    let cart = blocking(move || Ok(cart_store.remove_from_cart(product_id)?)).await?;

    let id_field = product_id.to_string();
    add_breadcrumb("cart", "Removed from cart", Some(&[("product_id", id_field.as_str())]));

    Ok(Json(CartSummary::build(&cart, state.catalog())))
}

/// Empty the cart.
#[instrument(skip(state))]
pub async fn clear(State(state): State<AppState>) -> Result<Json<CartSummary>> {
    let cart_store = state.context().cart().clone();
    let cart = blocking(move || Ok(cart_store.clear_cart()?)).await?;
    Ok(Json(CartSummary::build(&cart, state.catalog())))
}
