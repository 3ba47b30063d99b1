//! Domain model for the book catalog.
//!
//! # Responsibility
//! - Define the record shapes shared by validation, storage and callers.
//!
//! # Invariants
//! - A stored `Book` always carries a store-assigned `BookId`.
//! - `title` and `author` are never empty once a record is constructed.

pub mod book;
