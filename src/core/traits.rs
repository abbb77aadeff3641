//! Core traits for durable storage and time
//!
//! The ledger never touches the filesystem or the wall clock directly. It is
//! handed implementations of these traits, so the same code runs against
//! files in production and in-memory stores with a manual clock in tests.

use crate::core::user::User;
use crate::types::LedgerError;
use chrono::{DateTime, Local, NaiveDate, Utc};

/// Durable storage for one id counter
///
/// One instance exists per entity kind (cards, transactions). The stored
/// value is the last id handed out, `0` when nothing has been issued yet.
pub trait CounterStore {
    /// Read the last issued value
    fn load_counter(&self) -> Result<u64, LedgerError>;

    /// Durably record a newly issued value
    ///
    /// Must not return `Ok` until the value would survive a restart.
    fn store_counter(&mut self, value: u64) -> Result<(), LedgerError>;
}

/// Durable storage for the whole user aggregate
pub trait SnapshotStore {
    /// Load the saved user, `None` when no snapshot exists yet (first run)
    fn load_user(&self) -> Result<Option<User>, LedgerError>;

    /// Replace the saved user with this one
    fn save_user(&mut self, user: &User) -> Result<(), LedgerError>;
}

/// Source of the current time
pub trait Clock {
    /// Current instant, used to timestamp ledger entries
    fn now(&self) -> DateTime<Utc>;

    /// Current calendar date, used for card expiry checks
    fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }
}

/// Wall clock; `today` follows the local calendar
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}
