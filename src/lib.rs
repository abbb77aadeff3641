//! Credit Ledger Library
//! # Overview
//!
//! This library tracks one cardholder's credit cards: purchases, interest
//! fees and bill payments recorded against each card, with every change
//! persisted before it is reported.
//!
//! # Architecture
//!
//! The system is organized into several key components:
//!
//! - [`types`] - Core data types (card enums, transactions, value objects, errors)
//! - [`cli`] - CLI arguments parsing, validation and command execution
//! - [`core`] - Business logic components:
//!   - [`core::id_allocator`] - Durable monotonic ids for cards and transactions
//!   - [`core::credit_card`] - A card's ledger, balances and status lifecycle
//!   - [`core::user`] - The wallet of cards and cross-card queries
//!   - [`core::engine`] - Session orchestration and commit-after-save
//! - [`io`] - Counter files, JSON snapshots and CSV export
//! - [`config`] - Data directory and file locations
//! - [`logging`] - Diagnostic output through `tracing`
//!
//! # Transaction Types
//!
//! - **Purchase**: Adds its amount to the balance and carries an interest fee
//! - **Fee**: Adds its amount to the balance (1% interest on each purchase)
//! - **Payment**: Subtracts its amount from the balance
//!
//! # Card States
//!
//! Each card starts `active` (or `expired` if its expiration date has already
//! passed). Only active cards accept purchases. A card becomes `expired`
//! when a session opens after its expiration date, and can be reported
//! `lost` or `cancelled` at any time. Payments are accepted in every state.

// Module declarations
pub mod cli;
pub mod config;
pub mod core;
pub mod io;
pub mod logging;
pub mod types;

pub use config::LedgerConfig;
pub use core::{CreditCard, LedgerEngine, LedgerStorage, PurchaseOutcome, User};
pub use io::{write_cards_csv, write_transactions_csv};
pub use types::{
    CardId, CardIssuer, CardStatus, LedgerError, PaymentMethod, PurchaseCategory, Transaction,
    TransactionId,
};
