//! Serendib Storefront library.
//!
//! This crate provides the storefront functionality as a library,
//! allowing it to be tested and reused.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod app;
pub mod config;
pub mod error;
pub mod filters;
pub mod middleware;
pub mod models;
pub mod rasa;
pub mod routes;
pub mod services;
pub mod state;
pub mod storage;

pub use app::{build_router, load_catalog};
pub use state::AppState;
pub use storage::LocalStorage;
