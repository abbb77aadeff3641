//! File-backed id counters
//!
//! Each counter lives in its own text file holding the last issued id as a
//! decimal integer. A missing or blank file is a fresh installation (`0`).
//! Anything else that does not parse is reported as corrupt rather than
//! silently reset, since resetting would reissue ids.

use crate::core::traits::CounterStore;
use crate::io::fs::write_atomically;
use crate::types::LedgerError;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Id counter stored in a single text file
#[derive(Debug, Clone)]
pub struct FileCounterStore {
    path: PathBuf,
}

impl FileCounterStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        FileCounterStore { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CounterStore for FileCounterStore {
    fn load_counter(&self) -> Result<u64, LedgerError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(0),
            Err(e) => return Err(LedgerError::persistence(&self.path, &e)),
        };

        let trimmed = content.trim();
        if trimmed.is_empty() {
            return Ok(0);
        }

        trimmed.parse::<u64>().map_err(|e| {
            LedgerError::corrupt_counter(&self.path, &format!("'{}': {}", trimmed, e))
        })
    }

    fn store_counter(&mut self, value: u64) -> Result<(), LedgerError> {
        write_atomically(&self.path, value.to_string().as_bytes())
    }
}
