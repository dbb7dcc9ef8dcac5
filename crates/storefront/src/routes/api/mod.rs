//! JSON API handlers.

pub mod chat;
pub mod info;
