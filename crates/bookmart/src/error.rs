//! Error type shared by the BookMart simulation.

use std::error::Error;
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, PartialEq)]
pub enum SimError {
    EmptyField(&'static str),
    InvalidPrice(f64),
    NegativeQuantity,
    DuplicateBook(String),
    InvalidEmail,
    InvalidPhone,
    DuplicateCustomer,
    CustomerNotFound,
    BookNotFound,
    NonPositiveQuantity,
    InsufficientStock { available: u32 },
}

impl Display for SimError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyField(field) => write!(f, "{field} cannot be empty"),
            Self::InvalidPrice(_) => write!(f, "Price must be a positive number"),
            Self::NegativeQuantity => write!(f, "Quantity cannot be negative"),
            Self::DuplicateBook(title) => {
                write!(f, "Book `{title}` already exists in inventory")
            }
            Self::InvalidEmail => write!(f, "Invalid email format"),
            Self::InvalidPhone => write!(f, "Invalid phone number format"),
            Self::DuplicateCustomer => write!(f, "A customer with this email already exists"),
            Self::CustomerNotFound => write!(f, "Customer not found"),
            Self::BookNotFound => write!(f, "Book not found"),
            Self::NonPositiveQuantity => write!(f, "Quantity must be positive"),
            Self::InsufficientStock { available } => {
                write!(f, "Only {available} copies available")
            }
        }
    }
}

impl Error for SimError {}

pub type SimResult<T> = Result<T, SimError>;
