//! Runtime configuration
//!
//! All state lives in one data directory: two id counter files and the user
//! snapshot. File names are fixed; only the directory is configurable.

use crate::core::engine::LedgerStorage;
use crate::io::{FileCounterStore, JsonSnapshotStore};
use std::path::{Path, PathBuf};

/// File holding the last issued card id
pub const CARD_COUNTER_FILE: &str = "card_id_counter.txt";
/// File holding the last issued transaction id
pub const TRANSACTION_COUNTER_FILE: &str = "transaction_id_counter.txt";
/// File holding the user snapshot
pub const SNAPSHOT_FILE: &str = "user.json";

/// Resolved locations of the ledger's files
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerConfig {
    pub data_dir: PathBuf,
    pub card_counter_file: PathBuf,
    pub transaction_counter_file: PathBuf,
    pub snapshot_file: PathBuf,
}

impl LedgerConfig {
    /// Configuration with every file inside `data_dir`
    pub fn from_data_dir(data_dir: impl AsRef<Path>) -> Self {
        let data_dir = data_dir.as_ref().to_path_buf();
        LedgerConfig {
            card_counter_file: data_dir.join(CARD_COUNTER_FILE),
            transaction_counter_file: data_dir.join(TRANSACTION_COUNTER_FILE),
            snapshot_file: data_dir.join(SNAPSHOT_FILE),
            data_dir,
        }
    }

    /// File-backed stores for this configuration
    pub fn file_storage(&self) -> LedgerStorage<FileCounterStore, JsonSnapshotStore> {
        LedgerStorage {
            card_counter: FileCounterStore::new(&self.card_counter_file),
            transaction_counter: FileCounterStore::new(&self.transaction_counter_file),
            snapshots: JsonSnapshotStore::new(&self.snapshot_file),
        }
    }
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self::from_data_dir(".")
    }
}
