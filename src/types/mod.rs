//! Types module
//!
//! Contains core data structures used throughout the application.
//! This module organizes types into logical submodules:
//! - `card`: Card identifiers, issuers, statuses and summaries
//! - `party`: Vendor, address and bank account value objects
//! - `transaction`: Ledger entries and their identifiers
//! - `error`: Error types for the credit ledger

pub mod card;
pub mod error;
pub mod party;
pub mod transaction;

pub use card::{CardId, CardIssuer, CardStatus, CardSummary};
pub use error::LedgerError;
pub use party::{Address, BankAccount, Vendor};
pub use transaction::{
    Fee, FeeReason, Payment, PaymentMethod, Purchase, PurchaseCategory, Transaction,
    TransactionId, TransactionKind,
};
