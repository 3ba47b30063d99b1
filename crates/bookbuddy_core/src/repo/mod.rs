//! Repository layer for book persistence.
//!
//! # Responsibility
//! - Define the data access contract for the `books` table.
//! - Isolate SQLite query details from the store's connection handling.
//!
//! # Invariants
//! - Repository APIs return semantic errors (`NotFound`, `NoValidFields`)
//!   separately from SQLite transport errors.
//! - Repositories never re-run payload validation; callers validate first.

pub mod book_repo;
