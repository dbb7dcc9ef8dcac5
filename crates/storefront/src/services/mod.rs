//! Business logic services for storefront.
//!
//! # Services
//!
//! - `cart` - Per-visitor carts persisted under the data directory

pub mod cart;

pub use cart::{CartLineSummary, CartService, CartSummary, cart_key};
