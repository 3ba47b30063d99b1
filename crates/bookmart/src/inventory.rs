//! Book inventory for the BookMart simulation.
//!
//! # Invariants
//! - Titles are unique after trimming.
//! - Stock never goes below zero.

use crate::error::{SimError, SimResult};
use std::fmt::{Display, Formatter};

/// A stocked title.
#[derive(Debug, Clone, PartialEq)]
pub struct Book {
    pub title: String,
    pub author: String,
    pub price: f64,
    pub quantity: u32,
}

impl Book {
    /// Builds a stocked title.
    ///
    /// # Errors
    /// - `EmptyField` for a blank title or author.
    /// - `InvalidPrice` unless `price` is finite and positive.
    /// - `NegativeQuantity` for `quantity < 0` (or beyond `u32::MAX`).
    pub fn new(
        title: impl Into<String>,
        author: impl Into<String>,
        price: f64,
        quantity: i64,
    ) -> SimResult<Self> {
        let title = title.into().trim().to_string();
        let author = author.into().trim().to_string();
        if title.is_empty() {
            return Err(SimError::EmptyField("Title"));
        }
        if author.is_empty() {
            return Err(SimError::EmptyField("Author"));
        }
        if !price.is_finite() || price <= 0.0 {
            return Err(SimError::InvalidPrice(price));
        }
        let quantity = u32::try_from(quantity).map_err(|_| SimError::NegativeQuantity)?;

        Ok(Self {
            title,
            author,
            price,
            quantity,
        })
    }

    /// Removes `sold` copies from stock.
    pub fn sell(&mut self, sold: u32) -> SimResult<()> {
        if sold > self.quantity {
            return Err(SimError::InsufficientStock {
                available: self.quantity,
            });
        }
        self.quantity -= sold;
        Ok(())
    }
}

impl Display for Book {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Title: {}\nAuthor: {}\nPrice: ${:.2}\nQuantity: {}",
            self.title, self.author, self.price, self.quantity
        )
    }
}

/// Titles in insertion order.
#[derive(Debug, Default)]
pub struct Inventory {
    books: Vec<Book>,
}

impl Inventory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a title; fails if the trimmed title is already stocked.
    pub fn add_book(&mut self, book: Book) -> SimResult<()> {
        if self.get(&book.title).is_some() {
            return Err(SimError::DuplicateBook(book.title));
        }
        self.books.push(book);
        Ok(())
    }

    /// Case-insensitive substring match on title or author.
    pub fn search(&self, query: &str) -> Vec<&Book> {
        let needle = query.trim().to_lowercase();
        self.books
            .iter()
            .filter(|book| {
                book.title.to_lowercase().contains(&needle)
                    || book.author.to_lowercase().contains(&needle)
            })
            .collect()
    }

    /// Exact title lookup (input is trimmed).
    pub fn get(&self, title: &str) -> Option<&Book> {
        let title = title.trim();
        self.books.iter().find(|book| book.title == title)
    }

    pub fn get_mut(&mut self, title: &str) -> Option<&mut Book> {
        let title = title.trim();
        self.books.iter_mut().find(|book| book.title == title)
    }

    pub fn books(&self) -> &[Book] {
        &self.books
    }

    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }
}
