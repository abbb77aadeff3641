//! I/O module
//!
//! Storage backends for the ledger and export formats.
//!
//! # Components
//!
//! - `counter_file` - Id counters kept in text files
//! - `snapshot` - Snapshot schema and the JSON file store
//! - `memory` - In-memory counter and snapshot stores
//! - `csv_format` - CSV export of cards and transaction logs
//! - `fs` - Atomic file replacement shared by the file stores

pub mod counter_file;
pub mod csv_format;
pub mod fs;
pub mod memory;
pub mod snapshot;

pub use counter_file::FileCounterStore;
pub use csv_format::{write_cards_csv, write_transactions_csv};
pub use memory::{MemoryCounterStore, MemorySnapshotStore};
pub use snapshot::{decode_user, encode_user, JsonSnapshotStore, UserSnapshot};
