//! HTTP route handlers for the storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                 - Health check
//!
//! # Catalog
//! GET  /products               - Browse (`page`) or search (`q`), with filters
//!
//! # Cart
//! GET  /cart                   - Cart contents and totals
//! POST /cart/add               - Add a product (fetched from the backend)
//! POST /cart/update            - Set a line quantity (<= 0 removes)
//! POST /cart/remove            - Remove a line
//! POST /cart/clear             - Empty the cart
//!
//! # Checkout
//! GET  /checkout/summary       - Subtotal, shipping, VAT and total
//! POST /checkout               - Place the order
//!
//! # Orders
//! GET  /orders                 - Local order history
//! GET  /orders/current         - Most recent order of this process
//! GET  /orders/{id}            - Order detail
//! POST /orders/{id}/status     - Update status locally
//! GET  /account/orders         - Backend orders merged with local ones
//! ```

pub mod cart;
pub mod checkout;
pub mod orders;
pub mod products;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/update", post(cart::update))
        .route("/remove", post(cart::remove))
        .route("/clear", post(cart::clear))
}

/// Create the checkout routes router.
pub fn checkout_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(checkout::place))
        .route("/summary", get(checkout::summary))
}

/// Create the order routes router.
pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(orders::index))
        .route("/current", get(orders::current))
        .route("/{id}", get(orders::show))
        .route("/{id}/status", post(orders::update_status))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/products", get(products::index))
        .nest("/cart", cart_routes())
        .nest("/checkout", checkout_routes())
        .nest("/orders", order_routes())
        .route("/account/orders", get(orders::account))
}

/// Liveness health check endpoint.
async fn health() -> &'static str {
    "ok"
}
