//! Core business logic module
//!
//! This module contains the ledger components:
//! - `traits` - Storage and clock seams
//! - `id_allocator` - Durable monotonic id sequences
//! - `transaction_factory` - Builds purchases, fees and payments with fresh ids
//! - `credit_card` - One card's ledger and status lifecycle
//! - `user` - The cardholder's wallet and cross-card queries
//! - `engine` - Session orchestration and commit-after-save
//! - `clock` - Deterministic clock for tests and replays

pub mod clock;
pub mod credit_card;
pub mod engine;
pub mod id_allocator;
pub mod traits;
pub mod transaction_factory;
pub mod user;

pub use clock::ManualClock;
pub use credit_card::{CreditCard, CREDIT_LIMIT};
pub use engine::{LedgerEngine, LedgerStorage};
pub use id_allocator::IdAllocator;
pub use traits::{Clock, CounterStore, SnapshotStore, SystemClock};
pub use transaction_factory::{TransactionFactory, INTEREST_RATE};
pub use user::{DeclineReason, PurchaseOutcome, User};
