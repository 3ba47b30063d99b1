//! Use-case level entry points over the repository layer.
//!
//! # Responsibility
//! - Own connection lifecycle so callers never hold a `Connection`.
//! - Keep request handlers decoupled from SQLite details.

pub mod book_store;
