//! Card-related types for the credit ledger
//!
//! Identifiers, issuer networks and lifecycle status of a credit card, plus the
//! read-only summary row handed to callers that list cards.

use super::error::LedgerError;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Card identifier
///
/// Allocated from its own durable counter, never shared with transactions.
pub type CardId = u64;

/// Card network that issued the card
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CardIssuer {
    Visa,
    MasterCard,
    Amex,
}

impl fmt::Display for CardIssuer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CardIssuer::Visa => "Visa",
            CardIssuer::MasterCard => "MasterCard",
            CardIssuer::Amex => "Amex",
        };
        f.write_str(name)
    }
}

impl FromStr for CardIssuer {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "visa" => Ok(CardIssuer::Visa),
            "mastercard" => Ok(CardIssuer::MasterCard),
            "amex" => Ok(CardIssuer::Amex),
            other => Err(LedgerError::validation(format!(
                "unknown card issuer '{}' (expected visa, mastercard or amex)",
                other
            ))),
        }
    }
}

/// Lifecycle status of a card
///
/// `Active` is the only status that accepts purchases. There is no modeled
/// transition back to `Active` from any other status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CardStatus {
    Active,
    Expired,
    Cancelled,
    Lost,
}

impl CardStatus {
    /// Status a new card starts in, given its expiration date and today's date
    pub fn initial(expiration_date: NaiveDate, today: NaiveDate) -> Self {
        if expiration_date < today {
            CardStatus::Expired
        } else {
            CardStatus::Active
        }
    }
}

impl fmt::Display for CardStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CardStatus::Active => "active",
            CardStatus::Expired => "expired",
            CardStatus::Cancelled => "cancelled",
            CardStatus::Lost => "lost",
        };
        f.write_str(name)
    }
}

/// One row of the cards listing
#[derive(Debug, Clone, PartialEq)]
pub struct CardSummary {
    pub id: CardId,
    pub issuer: CardIssuer,
    pub status: CardStatus,
    pub issue_date: NaiveDate,
    pub expiration_date: NaiveDate,
    pub credit_limit: Decimal,
    pub balance: Decimal,
    pub available_credit: Decimal,
    /// Number of ledger entries on the card
    pub transactions: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[rstest]
    #[case("visa", CardIssuer::Visa)]
    #[case("VISA", CardIssuer::Visa)]
    #[case("MasterCard", CardIssuer::MasterCard)]
    #[case(" amex ", CardIssuer::Amex)]
    fn test_issuer_parsing(#[case] input: &str, #[case] expected: CardIssuer) {
        assert_eq!(input.parse::<CardIssuer>().unwrap(), expected);
    }

    #[test]
    fn test_issuer_parsing_rejects_unknown() {
        let err = "discover".parse::<CardIssuer>().unwrap_err();
        assert!(matches!(err, LedgerError::Validation { .. }));
    }

    #[rstest]
    #[case::future(date(2030, 1, 1), date(2026, 5, 1), CardStatus::Active)]
    #[case::same_day(date(2026, 5, 1), date(2026, 5, 1), CardStatus::Active)]
    #[case::past(date(2026, 4, 1), date(2026, 5, 1), CardStatus::Expired)]
    fn test_initial_status(
        #[case] expiration: NaiveDate,
        #[case] today: NaiveDate,
        #[case] expected: CardStatus,
    ) {
        assert_eq!(CardStatus::initial(expiration, today), expected);
    }
}
