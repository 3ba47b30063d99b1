//! Request handlers for the book CRUD API.
//!
//! # Responsibility
//! - Map create/list/get/update/delete requests onto validator + store calls.
//! - Encode every outcome as a status-coded JSON envelope.
//!
//! # Invariants
//! - Handlers never panic; every failure becomes a response.
//! - Validation failures are answered before any storage call.
//! - Status codes: 201 created, 200 ok, 400 client error, 404 not found,
//!   500 storage failure.

use bookbuddy_core::{
    parse_book_patch, parse_new_book, BookBuddyConfig, BookFilter, BookId, BookStore,
    ConfigError, StoreError,
};
use log::info;
use serde_json::{json, Map, Value};
use std::collections::HashMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub const STATUS_OK: u16 = 200;
pub const STATUS_CREATED: u16 = 201;
pub const STATUS_BAD_REQUEST: u16 = 400;
pub const STATUS_NOT_FOUND: u16 = 404;
pub const STATUS_METHOD_NOT_ALLOWED: u16 = 405;
pub const STATUS_INTERNAL_ERROR: u16 = 500;

/// Response envelope returned by every handler.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Value,
}

impl ApiResponse {
    fn new(status: u16, body: Value) -> Self {
        Self { status, body }
    }

    fn message(status: u16, message: &str) -> Self {
        Self::new(status, json!({ "message": message }))
    }

    fn failure(status: u16, error: &str, message: impl Display) -> Self {
        Self::new(
            status,
            json!({ "error": error, "message": message.to_string() }),
        )
    }

    fn invalid_data(message: impl Display) -> Self {
        Self::failure(STATUS_BAD_REQUEST, "Invalid data", message)
    }

    /// Returns `true` for 2xx statuses.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// HTTP verbs routed by `BookApi::handle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

/// Transport-neutral request shape.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub query: HashMap<String, String>,
    pub body: Option<Value>,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: HashMap::new(),
            body: None,
        }
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.insert(key.into(), value.into());
        self
    }
}

/// Failure while constructing a `BookApi`.
#[derive(Debug)]
pub enum StartupError {
    Config(ConfigError),
    Store(StoreError),
}

impl Display for StartupError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Config(err) => write!(f, "invalid configuration: {err}"),
            Self::Store(err) => write!(f, "database initialization failed: {err}"),
        }
    }
}

impl Error for StartupError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Config(err) => Some(err),
            Self::Store(err) => Some(err),
        }
    }
}

impl From<ConfigError> for StartupError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<StoreError> for StartupError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

/// Book API bound to one configuration and one store.
///
/// Constructed by the caller and passed to whatever transport serves it.
#[derive(Debug, Clone)]
pub struct BookApi {
    config: BookBuddyConfig,
    store: BookStore,
}

impl BookApi {
    /// Validates `config` and ensures the `books` table exists.
    pub fn try_new(config: BookBuddyConfig) -> Result<Self, StartupError> {
        config.validate()?;
        let store = BookStore::from_config(&config);
        store.initialize()?;
        Ok(Self { config, store })
    }

    pub fn config(&self) -> &BookBuddyConfig {
        &self.config
    }

    /// Routes a request to its handler.
    ///
    /// `/books` accepts GET and POST; `/books/<id>` accepts GET, PUT and DELETE.
    pub fn handle(&self, request: &ApiRequest) -> ApiResponse {
        let response = match (route(&request.path), request.method) {
            (Route::Collection, Method::Post) => self.create_book(request.body.as_ref()),
            (Route::Collection, Method::Get) => self.list_books(&request.query),
            (Route::Item(id), Method::Get) => self.get_book(id),
            (Route::Item(id), Method::Put) => self.update_book(id, request.body.as_ref()),
            (Route::Item(id), Method::Delete) => self.delete_book(id),
            (Route::Collection | Route::Item(_), _) => ApiResponse::failure(
                STATUS_METHOD_NOT_ALLOWED,
                "Method not allowed",
                format!("{:?} is not supported on this path", request.method),
            ),
            (Route::Unknown, _) => {
                ApiResponse::failure(STATUS_NOT_FOUND, "Not found", "Unknown path")
            }
        };

        info!(
            "event=api_request module=api method={:?} route={} status={}",
            request.method,
            route_label(&request.path),
            response.status
        );
        response
    }

    /// `POST /books`
    pub fn create_book(&self, body: Option<&Value>) -> ApiResponse {
        let data = match json_object(body) {
            Ok(data) => data,
            Err(response) => return response,
        };
        let book = match parse_new_book(data, &self.config) {
            Ok(book) => book,
            Err(err) => return ApiResponse::invalid_data(err),
        };

        match self.store.add(&book) {
            Ok(book_id) => ApiResponse::new(
                STATUS_CREATED,
                json!({ "message": "Book added successfully", "book_id": book_id }),
            ),
            Err(err) => store_error_response(&err),
        }
    }

    /// `GET /books?genre=..&author=..`
    pub fn list_books(&self, query: &HashMap<String, String>) -> ApiResponse {
        let filter = BookFilter {
            genre: query.get("genre").cloned(),
            author: query.get("author").cloned(),
        };

        match self.store.list(&filter) {
            Ok(books) => to_json_response(STATUS_OK, &books),
            Err(err) => store_error_response(&err),
        }
    }

    /// `GET /books/<id>`
    pub fn get_book(&self, id: BookId) -> ApiResponse {
        match self.store.get(id) {
            Ok(book) => to_json_response(STATUS_OK, &book),
            Err(err) => store_error_response(&err),
        }
    }

    /// `PUT /books/<id>` with a partial payload.
    pub fn update_book(&self, id: BookId, body: Option<&Value>) -> ApiResponse {
        let data = match json_object(body) {
            Ok(data) => data,
            Err(response) => return response,
        };
        let patch = match parse_book_patch(data, &self.config) {
            Ok(patch) => patch,
            Err(err) => return ApiResponse::invalid_data(err),
        };

        match self.store.update(id, &patch) {
            Ok(()) => ApiResponse::message(STATUS_OK, "Book updated successfully"),
            Err(err) => store_error_response(&err),
        }
    }

    /// `DELETE /books/<id>`
    pub fn delete_book(&self, id: BookId) -> ApiResponse {
        match self.store.delete(id) {
            Ok(()) => ApiResponse::message(STATUS_OK, "Book deleted successfully"),
            Err(err) => store_error_response(&err),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Route {
    Collection,
    Item(BookId),
    Unknown,
}

fn route(path: &str) -> Route {
    let trimmed = path.trim_end_matches('/');
    match trimmed.strip_prefix("/books") {
        Some("") => Route::Collection,
        Some(rest) => rest
            .strip_prefix('/')
            .and_then(|id| id.parse::<BookId>().ok())
            .map_or(Route::Unknown, Route::Item),
        None => Route::Unknown,
    }
}

fn route_label(path: &str) -> &'static str {
    match route(path) {
        Route::Collection => "/books",
        Route::Item(_) => "/books/{id}",
        Route::Unknown => "unknown",
    }
}

fn json_object(body: Option<&Value>) -> Result<&Map<String, Value>, ApiResponse> {
    body.and_then(Value::as_object)
        .ok_or_else(|| ApiResponse::invalid_data("Request body must be a JSON object"))
}

fn store_error_response(err: &StoreError) -> ApiResponse {
    match err {
        StoreError::NotFound(_) => ApiResponse::failure(STATUS_NOT_FOUND, "Book not found", err),
        StoreError::NoValidFields => ApiResponse::invalid_data(err),
        _ => ApiResponse::failure(STATUS_INTERNAL_ERROR, "Database error", err),
    }
}

fn to_json_response<T: serde::Serialize + ?Sized>(status: u16, payload: &T) -> ApiResponse {
    match serde_json::to_value(payload) {
        Ok(body) => ApiResponse::new(status, body),
        Err(err) => ApiResponse::failure(STATUS_INTERNAL_ERROR, "Serialization error", err),
    }
}

#[cfg(test)]
mod tests {
    use super::{route, Route};

    #[test]
    fn route_parses_collection_and_item_paths() {
        assert_eq!(route("/books"), Route::Collection);
        assert_eq!(route("/books/"), Route::Collection);
        assert_eq!(route("/books/12"), Route::Item(12));
        assert_eq!(route("/books/abc"), Route::Unknown);
        assert_eq!(route("/bookshelf"), Route::Unknown);
        assert_eq!(route("/authors"), Route::Unknown);
    }
}
