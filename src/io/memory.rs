//! In-memory storage backends
//!
//! Used by tests and by callers that embed the ledger without a data
//! directory. Handles are cheap to clone and share state, so a test can keep
//! one handle, move another into an engine, and inspect what was persisted
//! or simulate a restart by opening a second engine on the same handle.
//!
//! Snapshots go through the same JSON encoding as the file store, so the
//! in-memory backend exercises the real snapshot schema.

use crate::core::traits::{CounterStore, SnapshotStore};
use crate::core::user::User;
use crate::io::snapshot::{decode_user, encode_user};
use crate::types::LedgerError;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

fn injected_failure(store: &str, operation: &str) -> LedgerError {
    LedgerError::Persistence {
        path: format!("<memory {}>", store),
        message: format!("injected {} failure", operation),
    }
}

/// Counter held in memory
#[derive(Debug, Clone, Default)]
pub struct MemoryCounterStore {
    value: Rc<Cell<u64>>,
    fail_reads: Rc<Cell<bool>>,
    fail_writes: Rc<Cell<bool>>,
}

impl MemoryCounterStore {
    /// Counter with nothing issued yet
    pub fn new() -> Self {
        Self::default()
    }

    /// Counter that already issued ids up to `value`
    pub fn with_value(value: u64) -> Self {
        let store = Self::default();
        store.value.set(value);
        store
    }

    /// Last persisted value
    pub fn value(&self) -> u64 {
        self.value.get()
    }

    /// Make subsequent loads fail
    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.set(fail);
    }

    /// Make subsequent stores fail
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.set(fail);
    }
}

impl CounterStore for MemoryCounterStore {
    fn load_counter(&self) -> Result<u64, LedgerError> {
        if self.fail_reads.get() {
            return Err(injected_failure("counter", "read"));
        }
        Ok(self.value.get())
    }

    fn store_counter(&mut self, value: u64) -> Result<(), LedgerError> {
        if self.fail_writes.get() {
            return Err(injected_failure("counter", "write"));
        }
        self.value.set(value);
        Ok(())
    }
}

/// Snapshot held in memory as encoded JSON
#[derive(Debug, Clone, Default)]
pub struct MemorySnapshotStore {
    encoded: Rc<RefCell<Option<String>>>,
    saves: Rc<Cell<usize>>,
    fail_writes: Rc<Cell<bool>>,
}

impl MemorySnapshotStore {
    /// Store with no snapshot (first run)
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of successful saves so far
    pub fn saves(&self) -> usize {
        self.saves.get()
    }

    /// Make subsequent saves fail
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.set(fail);
    }
}

impl SnapshotStore for MemorySnapshotStore {
    fn load_user(&self) -> Result<Option<User>, LedgerError> {
        match self.encoded.borrow().as_deref() {
            None => Ok(None),
            Some(json) => decode_user(json).map(Some),
        }
    }

    fn save_user(&mut self, user: &User) -> Result<(), LedgerError> {
        if self.fail_writes.get() {
            return Err(injected_failure("snapshot", "write"));
        }
        let json = encode_user(user)?;
        *self.encoded.borrow_mut() = Some(json);
        self.saves.set(self.saves.get() + 1);
        Ok(())
    }
}
