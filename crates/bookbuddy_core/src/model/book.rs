//! Book record model.
//!
//! # Responsibility
//! - Define stored, to-be-stored and partial-update shapes for books.
//! - Enforce non-empty title/author at construction time.
//!
//! # Invariants
//! - `Book::id` is assigned by the store and never changes.
//! - `BookPatch` never carries `id`; identity is not a mutable field.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Store-assigned row identifier. Monotonic and never reused.
pub type BookId = i64;

/// Column names a caller may set on create or update.
pub const MUTABLE_FIELDS: &[&str] = &["title", "author", "published_year", "genre"];

/// A persisted book record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    pub id: BookId,
    pub title: String,
    pub author: String,
    pub published_year: i32,
    pub genre: String,
}

impl Book {
    /// Drops the identifier, e.g. to compare against the inserted draft.
    pub fn to_new_book(&self) -> NewBook {
        NewBook {
            title: self.title.clone(),
            author: self.author.clone(),
            published_year: self.published_year,
            genre: self.genre.clone(),
        }
    }

    /// Re-checks construction invariants on a record read back from storage.
    pub fn validate(&self) -> Result<(), BookValidationError> {
        require_non_empty("title", &self.title)?;
        require_non_empty("author", &self.author)
    }
}

/// A book record before insertion; `id` is absent by construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewBook {
    pub title: String,
    pub author: String,
    pub published_year: i32,
    pub genre: String,
}

impl NewBook {
    /// Builds a draft record.
    ///
    /// # Errors
    /// - `EmptyField` when `title` or `author` is empty or whitespace-only.
    ///
    /// Year range and genre membership depend on configuration and are checked
    /// by `validator`, not here.
    pub fn new(
        title: impl Into<String>,
        author: impl Into<String>,
        published_year: i32,
        genre: impl Into<String>,
    ) -> Result<Self, BookValidationError> {
        let book = Self {
            title: title.into(),
            author: author.into(),
            published_year,
            genre: genre.into(),
        };
        require_non_empty("title", &book.title)?;
        require_non_empty("author", &book.author)?;
        Ok(book)
    }

    /// Attaches the identifier assigned by the store.
    pub fn into_book(self, id: BookId) -> Book {
        Book {
            id,
            title: self.title,
            author: self.author,
            published_year: self.published_year,
            genre: self.genre,
        }
    }
}

/// Partial update; `None` fields keep their stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookPatch {
    pub title: Option<String>,
    pub author: Option<String>,
    pub published_year: Option<i32>,
    pub genre: Option<String>,
}

impl BookPatch {
    /// Returns `true` when no mutable field is set.
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.author.is_none()
            && self.published_year.is_none()
            && self.genre.is_none()
    }

    /// Applies this patch to an in-memory record.
    pub fn apply_to(&self, book: &mut Book) {
        if let Some(title) = &self.title {
            book.title = title.clone();
        }
        if let Some(author) = &self.author {
            book.author = author.clone();
        }
        if let Some(year) = self.published_year {
            book.published_year = year;
        }
        if let Some(genre) = &self.genre {
            book.genre = genre.clone();
        }
    }
}

/// Equality filters for listing; unset filters match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookFilter {
    pub genre: Option<String>,
    pub author: Option<String>,
}

impl BookFilter {
    pub fn by_genre(genre: impl Into<String>) -> Self {
        Self {
            genre: Some(genre.into()),
            ..Self::default()
        }
    }

    pub fn by_author(author: impl Into<String>) -> Self {
        Self {
            author: Some(author.into()),
            ..Self::default()
        }
    }
}

/// Record-construction failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BookValidationError {
    EmptyField(&'static str),
}

impl Display for BookValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyField(field) => write!(f, "{field} cannot be empty"),
        }
    }
}

impl Error for BookValidationError {}

fn require_non_empty(field: &'static str, value: &str) -> Result<(), BookValidationError> {
    if value.trim().is_empty() {
        return Err(BookValidationError::EmptyField(field));
    }
    Ok(())
}
