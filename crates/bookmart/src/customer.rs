//! Customer registry for the BookMart simulation.

use crate::error::{SimError, SimResult};
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt::{Display, Formatter};

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^@]+@[^@]+\.[^@]+").expect("valid email regex"));
static PHONE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\+?[\d\s-]{10,}$").expect("valid phone regex"));

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Customer {
    pub name: String,
    pub email: String,
    pub phone: String,
}

impl Customer {
    /// Builds a customer after checking all fields are set and well-formed.
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        phone: impl Into<String>,
    ) -> SimResult<Self> {
        let name = name.into().trim().to_string();
        let email = email.into().trim().to_string();
        let phone = phone.into().trim().to_string();

        for (field, value) in [("Name", &name), ("Email", &email), ("Phone", &phone)] {
            if value.is_empty() {
                return Err(SimError::EmptyField(field));
            }
        }
        if !EMAIL_RE.is_match(&email) {
            return Err(SimError::InvalidEmail);
        }
        if !PHONE_RE.is_match(&phone) {
            return Err(SimError::InvalidPhone);
        }

        Ok(Self { name, email, phone })
    }
}

impl Display for Customer {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Name: {}\nEmail: {}\nPhone: {}",
            self.name, self.email, self.phone
        )
    }
}

/// Registered customers, keyed by email.
#[derive(Debug, Default)]
pub struct CustomerRegistry {
    customers: Vec<Customer>,
}

impl CustomerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_customer(&mut self, customer: Customer) -> SimResult<()> {
        if self.find(&customer.email).is_some() {
            return Err(SimError::DuplicateCustomer);
        }
        self.customers.push(customer);
        Ok(())
    }

    pub fn find(&self, email: &str) -> Option<&Customer> {
        let email = email.trim();
        self.customers
            .iter()
            .find(|customer| customer.email == email)
    }

    pub fn customers(&self) -> &[Customer] {
        &self.customers
    }

    pub fn is_empty(&self) -> bool {
        self.customers.is_empty()
    }
}
