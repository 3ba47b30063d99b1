//! Sales transactions for the BookMart simulation.
//!
//! # Invariants
//! - A transaction copies the buyer's identity at sale time; later registry
//!   changes do not alter recorded sales.
//! - Stock is decremented only when the sale is recorded.

use crate::customer::{Customer, CustomerRegistry};
use crate::error::{SimError, SimResult};
use crate::inventory::Inventory;
use chrono::{DateTime, Local};
use log::info;
use std::fmt::{Display, Formatter};

/// Buyer identity captured on a transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomerSnapshot {
    pub name: String,
    pub email: String,
    pub phone: String,
}

impl From<&Customer> for CustomerSnapshot {
    fn from(customer: &Customer) -> Self {
        Self {
            name: customer.name.clone(),
            email: customer.email.clone(),
            phone: customer.phone.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    pub customer: CustomerSnapshot,
    pub book_title: String,
    pub quantity_sold: u32,
    pub total_amount: f64,
    pub sold_at: DateTime<Local>,
}

impl Display for Transaction {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Transaction Date: {}\nCustomer: {}\nBook: {}\nQuantity: {}\nTotal Amount: ${:.2}",
            self.sold_at.format("%Y-%m-%d %H:%M"),
            self.customer.name,
            self.book_title,
            self.quantity_sold,
            self.total_amount
        )
    }
}

/// Recorded sales in order of creation.
#[derive(Debug, Default)]
pub struct SalesLedger {
    transactions: Vec<Transaction>,
}

impl SalesLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sells `quantity` copies of `book_title` to the customer with `email`.
    ///
    /// # Errors
    /// Checked in order: `CustomerNotFound`, `BookNotFound`,
    /// `NonPositiveQuantity`, `InsufficientStock`.
    pub fn create_sale(
        &mut self,
        inventory: &mut Inventory,
        customers: &CustomerRegistry,
        email: &str,
        book_title: &str,
        quantity: i64,
    ) -> SimResult<&Transaction> {
        self.create_sale_at(inventory, customers, email, book_title, quantity, Local::now())
    }

    /// Same as `create_sale` with an explicit timestamp.
    pub fn create_sale_at(
        &mut self,
        inventory: &mut Inventory,
        customers: &CustomerRegistry,
        email: &str,
        book_title: &str,
        quantity: i64,
        sold_at: DateTime<Local>,
    ) -> SimResult<&Transaction> {
        let customer = customers.find(email).ok_or(SimError::CustomerNotFound)?;
        let book = inventory
            .get_mut(book_title)
            .ok_or(SimError::BookNotFound)?;
        if quantity <= 0 {
            return Err(SimError::NonPositiveQuantity);
        }
        let quantity = u32::try_from(quantity).map_err(|_| SimError::InsufficientStock {
            available: book.quantity,
        })?;

        book.sell(quantity)?;

        let transaction = Transaction {
            customer: CustomerSnapshot::from(customer),
            book_title: book.title.clone(),
            quantity_sold: quantity,
            total_amount: book.price * f64::from(quantity),
            sold_at,
        };
        info!(
            "event=sale_created module=sales status=ok quantity={} remaining_stock={}",
            quantity, book.quantity
        );

        self.transactions.push(transaction);
        Ok(&self.transactions[self.transactions.len() - 1])
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }
}
