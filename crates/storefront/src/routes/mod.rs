//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET    /health                    - Health check
//!
//! # Catalog
//! GET    /api/styles                - Style filters
//! GET    /api/products              - Product listing (?style=&page=)
//! GET    /api/products/featured     - Home page products
//! GET    /api/products/{id}         - Product detail with related products
//!
//! # Cart
//! GET    /api/cart                  - Cart summary
//! GET    /api/cart/count            - Cart badge count
//! POST   /api/cart/items            - Add to cart
//! PUT    /api/cart/items/{id}       - Update quantity (<= 0 removes)
//! DELETE /api/cart/items/{id}       - Remove item
//! DELETE /api/cart                  - Clear cart
//!
//! # Wishlist
//! GET    /api/wishlist              - Wishlist summary
//! GET    /api/wishlist/{id}         - Membership of one product
//! POST   /api/wishlist/{id}/toggle  - Toggle membership
//!
//! # Events
//! GET    /api/events                - Server-sent cart / wishlist changes
//! ```

pub mod cart;
pub mod events;
pub mod products;
pub mod wishlist;

use axum::{
    Router,
    http::Request,
    middleware::from_fn,
    routing::{get, post, put},
};
use tower_http::trace::TraceLayer;

use crate::error::Result;
use crate::middleware::request_id_middleware;
use crate::state::AppState;

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index))
        .route("/featured", get(products::featured))
        .route("/{id}", get(products::show))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show).delete(cart::clear))
        .route("/count", get(cart::count))
        .route("/items", post(cart::add))
        .route("/items/{id}", put(cart::update).delete(cart::remove))
}

/// Create the wishlist routes router.
pub fn wishlist_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(wishlist::show))
        .route("/{id}", get(wishlist::status))
        .route("/{id}/toggle", post(wishlist::toggle))
}

/// Create all API routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/styles", get(products::styles))
        .nest("/products", product_routes())
        .nest("/cart", cart_routes())
        .nest("/wishlist", wishlist_routes())
        .route("/events", get(events::stream))
}

/// The full application: API routes, health check, tracing and request ids.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .nest("/api", routes())
        .with_state(state)
        .layer(from_fn(request_id_middleware))
        .layer(TraceLayer::new_for_http().make_span_with(|request: &Request<_>| {
            tracing::info_span!(
                "request",
                method = %request.method(),
                uri = %request.uri(),
                request_id = tracing::field::Empty,
            )
        }))
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running.
async fn health() -> &'static str {
    "ok"
}

/// Run storage-touching work on the blocking pool.
///
/// Store calls do synchronous file I/O and may run listener callbacks, so
/// handlers never call them directly on the async runtime.
pub(crate) async fn blocking<T, F>(work: F) -> Result<T>
where
    F: FnOnce() -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work).await?
}
