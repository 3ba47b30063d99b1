//! Core domain logic for BookBuddy.
//! This crate owns book validation rules and the SQLite storage contract.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod validator;

pub use config::{BookBuddyConfig, ConfigError};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::book::{Book, BookFilter, BookId, BookPatch, BookValidationError, NewBook};
pub use repo::book_repo::{BookRepository, SqliteBookRepository, StoreError, StoreResult};
pub use service::book_store::BookStore;
pub use validator::{
    parse_book_patch, parse_new_book, validate_book_data, ValidationError, ValidationMode,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
