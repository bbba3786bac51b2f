//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                 - Liveness check
//! GET  /health/ready           - Readiness check (DB ping)
//!
//! # Products
//! GET  /api/products           - Filtered, sorted product listing
//! GET  /api/products/{id}      - Product detail
//!
//! # Cart (session-backed)
//! GET    /api/cart             - Current cart with totals
//! POST   /api/cart/items       - Add one unit of a configuration
//! PATCH  /api/cart/items       - Set a line's quantity (absolute)
//! DELETE /api/cart/items       - Remove a line
//! DELETE /api/cart             - Clear the cart
//! GET    /api/cart/count       - Item count badge
//!
//! # Orders
//! POST /api/orders             - Submit an order (records + WhatsApp notify)
//! ```

pub mod cart;
pub mod orders;
pub mod products;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index))
        .route("/{id}", get(products::show))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(cart::show).delete(cart::clear),
        )
        .route(
            "/items",
            post(cart::add).patch(cart::update).delete(cart::remove),
        )
        .route("/count", get(cart::count))
}

/// Create the order routes router.
pub fn order_routes() -> Router<AppState> {
    Router::new().route("/", post(orders::submit))
}

/// Create the complete API router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .nest("/api/products", product_routes())
        .nest("/api/cart", cart_routes())
        .nest("/api/orders", order_routes())
}
