//! Line-oriented menu front-end.
//!
//! # Invariants
//! - Input errors are printed and the loop continues; only `Exit` or end of
//!   input stops it.

use crate::customer::Customer;
use crate::inventory::Book;
use crate::BookMart;
use std::io::{self, BufRead, Write};

const SEPARATOR: &str = "------------------------------";

/// Runs the main menu until the user exits or input ends.
pub fn run_menu<R: BufRead, W: Write>(input: R, output: W, shop: &mut BookMart) -> io::Result<()> {
    let mut session = Session { input, output };

    loop {
        writeln!(session.output, "\nWelcome to BookMart!")?;
        writeln!(session.output, "1. Book Management")?;
        writeln!(session.output, "2. Customer Management")?;
        writeln!(session.output, "3. Sales Management")?;
        writeln!(session.output, "4. Exit")?;

        let Some(choice) = session.prompt("Enter your choice: ")? else {
            return Ok(());
        };
        match choice.trim() {
            "1" => book_menu(&mut session, shop)?,
            "2" => customer_menu(&mut session, shop)?,
            "3" => sales_menu(&mut session, shop)?,
            "4" => {
                writeln!(session.output, "Thank you for using BookMart!")?;
                return Ok(());
            }
            _ => writeln!(session.output, "Invalid choice. Please try again.")?,
        }
    }
}

struct Session<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Session<R, W> {
    /// Prints `label` and reads one line; `None` at end of input.
    fn prompt(&mut self, label: &str) -> io::Result<Option<String>> {
        write!(self.output, "{label}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }

    /// Reads a line, or reports end of input as an error message.
    fn field(&mut self, label: &str) -> io::Result<Result<String, String>> {
        Ok(self
            .prompt(label)?
            .ok_or_else(|| "input ended".to_string()))
    }

    fn number<T: std::str::FromStr>(&mut self, label: &str) -> io::Result<Result<T, String>> {
        Ok(self.field(label)?.and_then(|raw| {
            raw.trim()
                .parse::<T>()
                .map_err(|_| format!("`{}` is not a valid number", raw.trim()))
        }))
    }

    fn report(&mut self, result: Result<String, String>) -> io::Result<()> {
        match result {
            Ok(message) => writeln!(self.output, "{message}"),
            Err(message) => writeln!(self.output, "Error: {message}"),
        }
    }
}

fn book_menu<R: BufRead, W: Write>(
    session: &mut Session<R, W>,
    shop: &mut BookMart,
) -> io::Result<()> {
    writeln!(session.output, "\nBook Management")?;
    writeln!(session.output, "1. Add Book")?;
    writeln!(session.output, "2. View All Books")?;
    writeln!(session.output, "3. Search Books")?;

    let choice = session.number::<u32>("Enter your choice: ")?;
    match choice {
        Ok(1) => {
            let result = add_book(session, shop)?;
            session.report(result)
        }
        Ok(2) => {
            if shop.inventory.is_empty() {
                return writeln!(session.output, "No books in inventory.");
            }
            for book in shop.inventory.books() {
                writeln!(session.output, "\n{book}\n{SEPARATOR}")?;
            }
            Ok(())
        }
        Ok(3) => {
            let query = match session.field("Enter search term (title or author): ")? {
                Ok(query) => query,
                Err(message) => return session.report(Err(message)),
            };
            let results = shop.inventory.search(&query);
            if results.is_empty() {
                return writeln!(session.output, "No matching books found.");
            }
            for book in results {
                writeln!(session.output, "\n{book}\n{SEPARATOR}")?;
            }
            Ok(())
        }
        Ok(_) => writeln!(session.output, "Invalid choice."),
        Err(message) => session.report(Err(message)),
    }
}

fn add_book<R: BufRead, W: Write>(
    session: &mut Session<R, W>,
    shop: &mut BookMart,
) -> io::Result<Result<String, String>> {
    let title = match session.field("Enter book title: ")? {
        Ok(value) => value,
        Err(message) => return Ok(Err(message)),
    };
    let author = match session.field("Enter author name: ")? {
        Ok(value) => value,
        Err(message) => return Ok(Err(message)),
    };
    let price = match session.number::<f64>("Enter price: ")? {
        Ok(value) => value,
        Err(message) => return Ok(Err(message)),
    };
    let quantity = match session.number::<i64>("Enter quantity: ")? {
        Ok(value) => value,
        Err(message) => return Ok(Err(message)),
    };

    Ok(Book::new(title, author, price, quantity)
        .and_then(|book| shop.inventory.add_book(book))
        .map(|()| "Book added successfully!".to_string())
        .map_err(|err| err.to_string()))
}

fn customer_menu<R: BufRead, W: Write>(
    session: &mut Session<R, W>,
    shop: &mut BookMart,
) -> io::Result<()> {
    writeln!(session.output, "\nCustomer Management")?;
    writeln!(session.output, "1. Add Customer")?;
    writeln!(session.output, "2. View All Customers")?;

    match session.number::<u32>("Enter your choice: ")? {
        Ok(1) => {
            let result = add_customer(session, shop)?;
            session.report(result)
        }
        Ok(2) => {
            if shop.customers.is_empty() {
                return writeln!(session.output, "No customers registered.");
            }
            for customer in shop.customers.customers() {
                writeln!(session.output, "\n{customer}\n{SEPARATOR}")?;
            }
            Ok(())
        }
        Ok(_) => writeln!(session.output, "Invalid choice."),
        Err(message) => session.report(Err(message)),
    }
}

fn add_customer<R: BufRead, W: Write>(
    session: &mut Session<R, W>,
    shop: &mut BookMart,
) -> io::Result<Result<String, String>> {
    let mut values = Vec::with_capacity(3);
    for label in ["Enter customer name: ", "Enter email: ", "Enter phone number: "] {
        match session.field(label)? {
            Ok(value) => values.push(value),
            Err(message) => return Ok(Err(message)),
        }
    }
    let [name, email, phone]: [String; 3] = match values.try_into() {
        Ok(values) => values,
        Err(_) => return Ok(Err("incomplete customer input".to_string())),
    };

    Ok(Customer::new(name, email, phone)
        .and_then(|customer| shop.customers.add_customer(customer))
        .map(|()| "Customer added successfully!".to_string())
        .map_err(|err| err.to_string()))
}

fn sales_menu<R: BufRead, W: Write>(
    session: &mut Session<R, W>,
    shop: &mut BookMart,
) -> io::Result<()> {
    writeln!(session.output, "\nSales Management")?;
    writeln!(session.output, "1. Create Sale")?;
    writeln!(session.output, "2. View All Sales")?;

    match session.number::<u32>("Enter your choice: ")? {
        Ok(1) => {
            let result = create_sale(session, shop)?;
            session.report(result)
        }
        Ok(2) => {
            if shop.ledger.is_empty() {
                return writeln!(session.output, "No sales records found.");
            }
            for transaction in shop.ledger.transactions() {
                writeln!(session.output, "\n{transaction}\n{SEPARATOR}")?;
            }
            Ok(())
        }
        Ok(_) => writeln!(session.output, "Invalid choice."),
        Err(message) => session.report(Err(message)),
    }
}

fn create_sale<R: BufRead, W: Write>(
    session: &mut Session<R, W>,
    shop: &mut BookMart,
) -> io::Result<Result<String, String>> {
    let email = match session.field("Enter customer email: ")? {
        Ok(value) => value,
        Err(message) => return Ok(Err(message)),
    };
    let title = match session.field("Enter book title: ")? {
        Ok(value) => value,
        Err(message) => return Ok(Err(message)),
    };
    let quantity = match session.number::<i64>("Enter quantity: ")? {
        Ok(value) => value,
        Err(message) => return Ok(Err(message)),
    };

    Ok(shop
        .sell(&email, &title, quantity)
        .map(|transaction| format!("\nSale completed successfully!\n{transaction}"))
        .map_err(|err| err.to_string()))
}
