//! Session-related types.
//!
//! Values kept in the visitor's server session.

/// Session keys.
pub mod keys {
    /// Key for the visitor's cart storage key.
    pub const CART_KEY: &str = "cart_key";

    /// Key for the web chat transcript.
    pub const CHAT_TRANSCRIPT: &str = "chat_transcript";
}
