//! Request-handling surface for BookBuddy.
//!
//! Transport code (an HTTP server, a test harness) builds `ApiRequest`s and
//! serves the returned `ApiResponse`s; this crate owns the status mapping.

pub mod api;

pub use api::{ApiRequest, ApiResponse, BookApi, Method, StartupError};
