//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Home page (featured products, chat panel)
//! GET  /health                 - Liveness check
//!
//! # Products
//! GET  /products               - Product listing (?category=)
//! GET  /products/{id}          - Product detail
//!
//! # Cart (form posts redirect to /cart)
//! GET  /cart                   - Cart page
//! POST /cart/add               - Add product or change quantity by a signed delta
//! POST /cart/update            - Set quantity (0 removes)
//! POST /cart/remove            - Remove product
//! POST /cart/clear             - Empty the cart
//! GET  /cart/count             - Cart count badge (fragment)
//!
//! # Web chat (rate limited)
//! GET  /chat                   - Chat page
//! POST /chat                   - Send message, redirect to /chat
//! POST /chat/reset             - Start a new conversation
//!
//! # JSON API
//! POST /api/chat               - Relay a message (rate limited)
//! GET  /api/cart               - Cart contents
//! GET  /api/health             - Bot service health
//! GET  /api/languages          - Supported languages
//! GET  /api/tourism-info       - Quick facts
//! ```

pub mod api;
pub mod cart;
pub mod chat;
pub mod home;
pub mod products;

use axum::{
    Router,
    routing::{get, post},
};

pub use products::render_product_grid;

use crate::middleware::chat_rate_limiter;
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
        .route("/add", post(cart::add))
        .route("/update", post(cart::update))
        .route("/remove", post(cart::remove))
        .route("/clear", post(cart::clear))
        .route("/count", get(cart::count))
}

/// Create the web chat routes router.
pub fn chat_routes() -> Router<AppState> {
    let limited = Router::new()
        .route("/", post(chat::send))
        .route_layer(chat_rate_limiter());

    Router::new()
        .route("/", get(chat::show))
        .route("/reset", post(chat::reset))
        .merge(limited)
}

/// Create the JSON API routes router.
pub fn api_routes() -> Router<AppState> {
    let limited = Router::new()
        .route("/chat", post(api::chat::chat))
        .route_layer(chat_rate_limiter());

    Router::new()
        .route("/cart", get(cart::summary))
        .route("/health", get(api::info::health))
        .route("/languages", get(api::info::languages))
        .route("/tourism-info", get(api::info::tourism_info))
        .merge(limited)
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::home))
        .nest("/products", product_routes())
        .nest("/cart", cart_routes())
        .nest("/chat", chat_routes())
        .nest("/api", api_routes())
}
