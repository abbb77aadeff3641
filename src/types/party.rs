//! Counterparty value objects
//!
//! Plain data attached to transactions: who was paid for a purchase and which
//! bank account a payment came from. No behavior beyond field access.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Postal address of a vendor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub street: String,
    pub city: String,
    /// Two-letter state or territory code
    pub state: String,
    /// Five-digit zip code
    pub zip: String,
}

impl Address {
    pub fn new(
        street: impl Into<String>,
        city: impl Into<String>,
        state: impl Into<String>,
        zip: impl Into<String>,
    ) -> Self {
        Address {
            street: street.into(),
            city: city.into(),
            state: state.into(),
            zip: zip.into(),
        }
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}, {} {}", self.street, self.city, self.state, self.zip)
    }
}

/// Merchant a purchase was made from
///
/// Stored by value on each purchase, so later edits to a vendor never
/// rewrite history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vendor {
    pub name: String,
    pub address: Address,
}

impl Vendor {
    pub fn new(name: impl Into<String>, address: Address) -> Self {
        Vendor {
            name: name.into(),
            address,
        }
    }
}

/// The user's bank account that bill payments are drawn from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BankAccount {
    pub bank_name: String,
    pub account_id: String,
}

impl BankAccount {
    pub fn new(bank_name: impl Into<String>, account_id: impl Into<String>) -> Self {
        BankAccount {
            bank_name: bank_name.into(),
            account_id: account_id.into(),
        }
    }
}
