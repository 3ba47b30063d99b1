//! Book repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide insert/select/update/delete over the `books` table.
//! - Map SQLite failures into a typed `StoreError`.
//!
//! # Invariants
//! - `list_books` returns rows in insertion order (`id ASC`).
//! - `update_book` touches only the columns set in the patch.
//! - Read paths reject rows that violate record invariants.

use crate::db::migrations::latest_version;
use crate::db::DbError;
use crate::model::book::{Book, BookFilter, BookId, BookPatch, NewBook};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, ErrorCode, OptionalExtension, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};

const BOOK_SELECT_SQL: &str = "SELECT
    id,
    title,
    author,
    published_year,
    genre
FROM books";

pub type StoreResult<T> = Result<T, StoreError>;

/// Storage-side failure for book operations.
#[derive(Debug)]
pub enum StoreError {
    /// No row has this identifier.
    NotFound(BookId),
    /// An update named none of the mutable columns.
    NoValidFields,
    /// A SQLite constraint rejected the write.
    Conflict(String),
    /// Any other SQLite or bootstrap failure.
    Db(DbError),
    /// A persisted row does not satisfy record invariants.
    InvalidData(String),
    /// The connection was not bootstrapped through `db::open_db*`.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
}

impl StoreError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(_) => write!(f, "No book exists with the provided ID"),
            Self::NoValidFields => write!(f, "No valid fields to update"),
            Self::Conflict(message) => write!(f, "constraint violation: {message}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted book data: {message}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection schema version {actual_version} does not match expected {expected_version}"
            ),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        match value {
            DbError::Sqlite(err) => Self::from(err),
            other => Self::Db(other),
        }
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        match &value {
            rusqlite::Error::SqliteFailure(failure, message)
                if failure.code == ErrorCode::ConstraintViolation =>
            {
                Self::Conflict(
                    message
                        .clone()
                        .unwrap_or_else(|| failure.to_string()),
                )
            }
            _ => Self::Db(DbError::Sqlite(value)),
        }
    }
}

/// Repository interface for book CRUD operations.
pub trait BookRepository {
    fn create_book(&self, book: &NewBook) -> StoreResult<BookId>;
    fn get_book(&self, id: BookId) -> StoreResult<Option<Book>>;
    fn list_books(&self, filter: &BookFilter) -> StoreResult<Vec<Book>>;
    fn update_book(&self, id: BookId, patch: &BookPatch) -> StoreResult<()>;
    fn delete_book(&self, id: BookId) -> StoreResult<()>;
}

/// SQLite-backed book repository over a borrowed connection.
pub struct SqliteBookRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteBookRepository<'conn> {
    /// Wraps a connection returned by `db::open_db` / `db::open_db_in_memory`.
    ///
    /// # Errors
    /// - `UninitializedConnection` when the schema was not bootstrapped.
    pub fn try_new(conn: &'conn Connection) -> StoreResult<Self> {
        let actual_version: u32 =
            conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
        let expected_version = latest_version();
        if actual_version != expected_version {
            return Err(StoreError::UninitializedConnection {
                expected_version,
                actual_version,
            });
        }
        Ok(Self { conn })
    }

    fn exists(&self, id: BookId) -> StoreResult<bool> {
        let found = self
            .conn
            .query_row("SELECT 1 FROM books WHERE id = ?1;", [id], |_| Ok(()))
            .optional()?;
        Ok(found.is_some())
    }
}

impl BookRepository for SqliteBookRepository<'_> {
    fn create_book(&self, book: &NewBook) -> StoreResult<BookId> {
        self.conn.execute(
            "INSERT INTO books (title, author, published_year, genre)
             VALUES (?1, ?2, ?3, ?4);",
            params![
                book.title.as_str(),
                book.author.as_str(),
                book.published_year,
                book.genre.as_str(),
            ],
        )?;

        Ok(self.conn.last_insert_rowid())
    }

    fn get_book(&self, id: BookId) -> StoreResult<Option<Book>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{BOOK_SELECT_SQL} WHERE id = ?1;"))?;

        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_book_row(row)?));
        }

        Ok(None)
    }

    fn list_books(&self, filter: &BookFilter) -> StoreResult<Vec<Book>> {
        let mut sql = format!("{BOOK_SELECT_SQL} WHERE 1 = 1");
        let mut bind_values: Vec<Value> = Vec::new();

        if let Some(genre) = &filter.genre {
            sql.push_str(" AND genre = ?");
            bind_values.push(Value::Text(genre.clone()));
        }

        if let Some(author) = &filter.author {
            sql.push_str(" AND author = ?");
            bind_values.push(Value::Text(author.clone()));
        }

        sql.push_str(" ORDER BY id ASC");

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut books = Vec::new();

        while let Some(row) = rows.next()? {
            books.push(parse_book_row(row)?);
        }

        Ok(books)
    }

    fn update_book(&self, id: BookId, patch: &BookPatch) -> StoreResult<()> {
        if !self.exists(id)? {
            return Err(StoreError::NotFound(id));
        }

        let mut assignments: Vec<&str> = Vec::new();
        let mut bind_values: Vec<Value> = Vec::new();

        if let Some(title) = &patch.title {
            assignments.push("title = ?");
            bind_values.push(Value::Text(title.clone()));
        }
        if let Some(author) = &patch.author {
            assignments.push("author = ?");
            bind_values.push(Value::Text(author.clone()));
        }
        if let Some(year) = patch.published_year {
            assignments.push("published_year = ?");
            bind_values.push(Value::Integer(i64::from(year)));
        }
        if let Some(genre) = &patch.genre {
            assignments.push("genre = ?");
            bind_values.push(Value::Text(genre.clone()));
        }

        if assignments.is_empty() {
            return Err(StoreError::NoValidFields);
        }

        bind_values.push(Value::Integer(id));
        let sql = format!("UPDATE books SET {} WHERE id = ?;", assignments.join(", "));
        let changed = self.conn.execute(&sql, params_from_iter(bind_values))?;

        // Row deleted between the existence check and the write.
        if changed == 0 {
            return Err(StoreError::NotFound(id));
        }

        Ok(())
    }

    fn delete_book(&self, id: BookId) -> StoreResult<()> {
        let changed = self.conn.execute("DELETE FROM books WHERE id = ?1;", [id])?;

        if changed == 0 {
            return Err(StoreError::NotFound(id));
        }

        Ok(())
    }
}

fn parse_book_row(row: &Row<'_>) -> StoreResult<Book> {
    let book = Book {
        id: row.get("id")?,
        title: row.get("title")?,
        author: row.get("author")?,
        published_year: row.get("published_year")?,
        genre: row.get("genre")?,
    };
    book.validate().map_err(|err| {
        StoreError::InvalidData(format!("row {} in books: {err}", book.id))
    })?;
    Ok(book)
}
