//! BookMart: an in-memory bookstore simulation.
//!
//! Inventory, customers and the sales ledger are plain values owned by a
//! `BookMart`; the menu front-end drives them through `run_menu`.

pub mod customer;
pub mod error;
pub mod inventory;
pub mod menu;
pub mod sales;

pub use customer::{Customer, CustomerRegistry};
pub use error::{SimError, SimResult};
pub use inventory::{Book, Inventory};
pub use menu::run_menu;
pub use sales::{CustomerSnapshot, SalesLedger, Transaction};

/// All simulation state for one session.
#[derive(Debug, Default)]
pub struct BookMart {
    pub inventory: Inventory,
    pub customers: CustomerRegistry,
    pub ledger: SalesLedger,
}

impl BookMart {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a sale against this shop's inventory and customers.
    pub fn sell(&mut self, email: &str, book_title: &str, quantity: i64) -> SimResult<&Transaction> {
        self.ledger.create_sale(
            &mut self.inventory,
            &self.customers,
            email,
            book_title,
            quantity,
        )
    }
}
