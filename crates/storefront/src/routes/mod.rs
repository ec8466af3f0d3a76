//! HTTP route handlers for the storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET    /health               - Health check
//!
//! # Products
//! GET    /api/products         - Product listing (?category=All|Tops|...)
//! GET    /api/products/{id}    - Product detail
//!
//! # Cart
//! GET    /api/cart             - Cart contents and totals
//! GET    /api/cart/count       - Cart badge count
//! POST   /api/cart/add         - Add one unit of a variant
//! POST   /api/cart/update      - Set quantity
//! POST   /api/cart/remove      - Remove line(s)
//! POST   /api/cart/checkout    - Not implemented (501)
//!
//! # Stylist chat
//! GET    /api/chat             - Transcript with resolved recommendations
//! POST   /api/chat             - Send a message, wait for the reply
//! PUT    /api/chat/image       - Stage an image for the next message
//! DELETE /api/chat/image       - Clear the staged image
//! ```

pub mod cart;
pub mod chat;
pub mod products;

use axum::{
    Router,
    routing::{get, post, put},
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
        .route("/", get(cart::show))
        .route("/count", get(cart::count))
        .route("/add", post(cart::add))
        .route("/update", post(cart::update))
        .route("/remove", post(cart::remove))
        .route("/checkout", post(cart::checkout))
}

/// Create the chat routes router.
pub fn chat_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(chat::show).post(chat::post))
        .route("/image", put(chat::stage_image).delete(chat::clear_image))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .nest("/api/products", product_routes())
        .nest("/api/cart", cart_routes())
        .nest("/api/chat", chat_routes())
}

/// Liveness health check endpoint.
async fn health() -> &'static str {
    "ok"
}
