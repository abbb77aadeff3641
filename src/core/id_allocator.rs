//! Durable monotonic id allocation
//!
//! An [`IdAllocator`] hands out ids for one entity kind. The counter is read
//! from its [`CounterStore`] once at startup, and every allocation writes the
//! new value back before returning it. An id whose write failed is never
//! returned, so ids stay strictly increasing across restarts.

use crate::core::traits::CounterStore;
use crate::types::LedgerError;
use tracing::debug;

/// Monotonic id counter backed by durable storage
#[derive(Debug)]
pub struct IdAllocator<S: CounterStore> {
    kind: &'static str,
    store: S,
    last_issued: u64,
}

impl<S: CounterStore> IdAllocator<S> {
    /// Create an allocator that continues from the value persisted in `store`
    ///
    /// # Arguments
    ///
    /// * `kind` - Entity kind the ids are for, used in logs and errors
    /// * `store` - Durable home of this kind's counter
    ///
    /// # Errors
    ///
    /// Returns the store's error when the persisted value cannot be read.
    /// Callers treat this as a fatal startup error.
    pub fn initialize(kind: &'static str, store: S) -> Result<Self, LedgerError> {
        let last_issued = store.load_counter()?;
        debug!(kind, last_issued, "id counter initialized");
        Ok(IdAllocator {
            kind,
            store,
            last_issued,
        })
    }

    /// Allocate the next id
    ///
    /// Increments the counter, persists it, and only then returns it.
    ///
    /// # Errors
    ///
    /// Returns the store's error if the write fails. The in-memory counter is
    /// left unchanged in that case, so the failed id is offered again next time.
    pub fn next(&mut self) -> Result<u64, LedgerError> {
        let candidate = self
            .last_issued
            .checked_add(1)
            .ok_or_else(|| LedgerError::corrupt_counter(self.kind, "id space exhausted"))?;

        self.store.store_counter(candidate)?;
        self.last_issued = candidate;

        debug!(kind = self.kind, id = candidate, "id allocated");
        Ok(candidate)
    }

    /// Last id handed out, `0` if none
    pub fn last_issued(&self) -> u64 {
        self.last_issued
    }

    /// Entity kind this allocator serves
    pub fn kind(&self) -> &'static str {
        self.kind
    }
}
