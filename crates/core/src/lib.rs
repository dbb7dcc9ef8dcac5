//! Serendib Core - Shared types, cart state and chat relay.
//!
//! This crate provides the domain pieces used by every Serendib component:
//! - `storefront` - Public web storefront and chat API
//! - `cli` - Terminal chat client and local cart tools
//!
//! # Architecture
//!
//! The core crate contains types, state containers and ports (traits) - no
//! file access, no HTTP clients. Adapters that touch the outside world
//! (local storage files, the bot service) live in the storefront crate and
//! are injected through the ports defined here.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for IDs, prices, ratings and session ids
//! - [`catalog`] - Immutable product catalog
//! - [`cart`] - Cart store with an injected persistence port
//! - [`chat`] - Chat transcript, relay and `/api/chat` wire types

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod chat;
pub mod types;

pub use cart::{
    CartError, CartLine, CartSnapshot, CartStorage, CartStore, MAX_LINE_QUANTITY, MemoryStorage,
    SnapshotEntry, StorageError,
};
pub use catalog::{Catalog, CatalogError, Product};
pub use chat::{
    ChatBackend, ChatMessage, ChatRelay, ChatRole, ChatTranscript, FALLBACK_MESSAGE, RelayOutcome,
};
pub use types::*;
