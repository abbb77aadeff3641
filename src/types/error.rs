//! Error types for the credit ledger
//!
//! This module defines every error the ledger can report to its caller.
//! Errors carry enough context to be printed directly by the CLI.
//!
//! # Error Categories
//!
//! - **Lookup Errors**: a card id that is not in the user's wallet
//! - **Ledger Errors**: an operation the card's status does not allow
//! - **Persistence Errors**: counter or snapshot I/O, corrupt files
//! - **Input Errors**: values rejected by caller-side validation
//! - **Output Errors**: results that could not be written or exported

use super::card::{CardId, CardStatus};
use thiserror::Error;

/// Main error type for the credit ledger
///
/// No variant is retried internally. Every failure propagates to the caller,
/// which decides whether to report it and continue or abort.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LedgerError {
    /// No card with this id exists in the user's wallet
    #[error("Card {card} not found")]
    CardNotFound {
        /// The id that was looked up
        card: CardId,
    },

    /// The card's status does not permit the operation
    ///
    /// Raised by the card itself when a purchase reaches a card that is not
    /// active. The user layer screens this case first, so seeing it means a
    /// caller bypassed that check.
    #[error("Cannot record {operation} on card {card}: card is {status}")]
    InvalidOperation {
        /// Card the operation targeted
        card: CardId,
        /// Status the card was in
        status: CardStatus,
        /// Operation that was refused
        operation: String,
    },

    /// Durable write or read failed
    ///
    /// In-memory state must not be treated as committed when this is returned.
    #[error("Persistence failure on {path}: {message}")]
    Persistence {
        /// File (or store) that failed
        path: String,
        /// Description of the I/O failure
        message: String,
    },

    /// A counter file exists but does not hold a valid counter value
    #[error("Corrupt id counter in {path}: {message}")]
    CorruptCounter {
        /// Counter file path
        path: String,
        /// What was wrong with the content
        message: String,
    },

    /// Snapshot could not be encoded or decoded
    #[error("Snapshot error: {message}")]
    Snapshot {
        /// Description of the encoding problem
        message: String,
    },

    /// CSV export failed
    #[error("Export error: {message}")]
    Export {
        /// Description of the export failure
        message: String,
    },

    /// Writing a result to the caller's output failed
    ///
    /// Raised after the ledger operation itself completed; nothing stored
    /// is affected.
    #[error("Failed to write output: {message}")]
    Output {
        /// Description of the write failure
        message: String,
    },

    /// Input rejected before it reached the ledger
    #[error("Invalid input: {message}")]
    Validation {
        /// Why the input was rejected
        message: String,
    },

    /// The session was opened on an installation with no user profile yet
    #[error("No user profile found, run `init` first")]
    UserNotInitialized,

    /// `init` was requested but a user profile already exists
    #[error("A user profile already exists for {name}")]
    UserAlreadyInitialized {
        /// Name on the existing profile
        name: String,
    },
}

/// Output stream failures
///
/// Storage code maps its own I/O errors with [`LedgerError::persistence`],
/// so a bare `io::Error` reaching `?` comes from writing results.
impl From<std::io::Error> for LedgerError {
    fn from(error: std::io::Error) -> Self {
        LedgerError::Output {
            message: error.to_string(),
        }
    }
}

impl From<serde_json::Error> for LedgerError {
    fn from(error: serde_json::Error) -> Self {
        LedgerError::Snapshot {
            message: error.to_string(),
        }
    }
}

impl From<csv::Error> for LedgerError {
    fn from(error: csv::Error) -> Self {
        LedgerError::Export {
            message: error.to_string(),
        }
    }
}

impl LedgerError {
    /// Create a CardNotFound error
    pub fn card_not_found(card: CardId) -> Self {
        LedgerError::CardNotFound { card }
    }

    /// Create an InvalidOperation error
    pub fn invalid_operation(card: CardId, status: CardStatus, operation: &str) -> Self {
        LedgerError::InvalidOperation {
            card,
            status,
            operation: operation.to_string(),
        }
    }

    /// Create a Persistence error for a specific path
    pub fn persistence(path: impl AsRef<std::path::Path>, error: &std::io::Error) -> Self {
        LedgerError::Persistence {
            path: path.as_ref().display().to_string(),
            message: error.to_string(),
        }
    }

    /// Create a CorruptCounter error
    pub fn corrupt_counter(path: impl AsRef<std::path::Path>, message: &str) -> Self {
        LedgerError::CorruptCounter {
            path: path.as_ref().display().to_string(),
            message: message.to_string(),
        }
    }

    /// Create a Snapshot error
    pub fn snapshot(message: &str) -> Self {
        LedgerError::Snapshot {
            message: message.to_string(),
        }
    }

    /// Create a Validation error
    pub fn validation(message: impl Into<String>) -> Self {
        LedgerError::Validation {
            message: message.into(),
        }
    }

    /// Whether this error came from durable storage
    ///
    /// These are fatal to the operation that raised them: ids or snapshot
    /// state involved must not be considered issued or saved.
    pub fn is_persistence(&self) -> bool {
        matches!(
            self,
            LedgerError::Persistence { .. }
                | LedgerError::CorruptCounter { .. }
                | LedgerError::Snapshot { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::card_not_found(
        LedgerError::CardNotFound { card: 7 },
        "Card 7 not found"
    )]
    #[case::invalid_operation(
        LedgerError::InvalidOperation { card: 3, status: CardStatus::Lost, operation: "purchase".to_string() },
        "Cannot record purchase on card 3: card is lost"
    )]
    #[case::persistence(
        LedgerError::Persistence { path: "data/user.json".to_string(), message: "disk full".to_string() },
        "Persistence failure on data/user.json: disk full"
    )]
    #[case::corrupt_counter(
        LedgerError::CorruptCounter { path: "card_id_counter.txt".to_string(), message: "not a number".to_string() },
        "Corrupt id counter in card_id_counter.txt: not a number"
    )]
    #[case::output(
        LedgerError::Output { message: "Broken pipe".to_string() },
        "Failed to write output: Broken pipe"
    )]
    #[case::validation(
        LedgerError::Validation { message: "amount must be at least 1.00".to_string() },
        "Invalid input: amount must be at least 1.00"
    )]
    #[case::not_initialized(
        LedgerError::UserNotInitialized,
        "No user profile found, run `init` first"
    )]
    fn test_error_display(#[case] error: LedgerError, #[case] expected: &str) {
        assert_eq!(error.to_string(), expected);
    }

    #[rstest]
    #[case::card_not_found(
        LedgerError::card_not_found(9),
        LedgerError::CardNotFound { card: 9 }
    )]
    #[case::invalid_operation(
        LedgerError::invalid_operation(2, CardStatus::Expired, "purchase"),
        LedgerError::InvalidOperation { card: 2, status: CardStatus::Expired, operation: "purchase".to_string() }
    )]
    #[case::corrupt_counter(
        LedgerError::corrupt_counter("ids.txt", "empty"),
        LedgerError::CorruptCounter { path: "ids.txt".to_string(), message: "empty".to_string() }
    )]
    fn test_helper_functions(#[case] result: LedgerError, #[case] expected: LedgerError) {
        assert_eq!(result, expected);
    }

    #[rstest]
    #[case(LedgerError::Persistence { path: "x".into(), message: "y".into() }, true)]
    #[case(LedgerError::corrupt_counter("x", "y"), true)]
    #[case(LedgerError::snapshot("bad version"), true)]
    #[case(LedgerError::card_not_found(1), false)]
    #[case(LedgerError::validation("nope"), false)]
    #[case(LedgerError::Output { message: "closed".into() }, false)]
    fn test_is_persistence(#[case] error: LedgerError, #[case] expected: bool) {
        assert_eq!(error.is_persistence(), expected);
    }

    #[test]
    fn test_io_error_conversion_is_output_failure() {
        let io_error = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "Broken pipe");
        let error: LedgerError = io_error.into();
        assert!(matches!(error, LedgerError::Output { .. }));
        assert!(!error.is_persistence());
    }
}
