//! Transaction-related types for the credit ledger
//!
//! This module defines the ledger entries recorded against a card. A
//! [`Transaction`] is a closed sum over the three entry kinds, each carrying
//! the shared header (id, amount, timestamp) plus its own payload.
//!
//! Entries are immutable once built: fields are private and only readable
//! through accessors. New entries are produced by
//! [`crate::core::TransactionFactory`], which allocates their ids.

use super::error::LedgerError;
use super::party::{BankAccount, Vendor};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Transaction identifier
///
/// Allocated from its own durable counter, never shared with cards.
pub type TransactionId = u64;

/// Discriminant of a ledger entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    /// Goods or services bought with the card; increases the balance
    Purchase,
    /// Charge levied by the issuer; increases the balance
    Fee,
    /// Money paid toward the card; decreases the balance
    Payment,
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TransactionKind::Purchase => "purchase",
            TransactionKind::Fee => "fee",
            TransactionKind::Payment => "payment",
        };
        f.write_str(name)
    }
}

/// Spending category of a purchase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PurchaseCategory {
    Car,
    Clothing,
    Food,
    Groceries,
    Lodging,
    Restaurant,
    Travel,
    Utilities,
}

impl PurchaseCategory {
    /// Every category, in menu order
    pub const ALL: [PurchaseCategory; 8] = [
        PurchaseCategory::Car,
        PurchaseCategory::Clothing,
        PurchaseCategory::Food,
        PurchaseCategory::Groceries,
        PurchaseCategory::Lodging,
        PurchaseCategory::Restaurant,
        PurchaseCategory::Travel,
        PurchaseCategory::Utilities,
    ];
}

impl fmt::Display for PurchaseCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PurchaseCategory::Car => "car",
            PurchaseCategory::Clothing => "clothing",
            PurchaseCategory::Food => "food",
            PurchaseCategory::Groceries => "groceries",
            PurchaseCategory::Lodging => "lodging",
            PurchaseCategory::Restaurant => "restaurant",
            PurchaseCategory::Travel => "travel",
            PurchaseCategory::Utilities => "utilities",
        };
        f.write_str(name)
    }
}

impl FromStr for PurchaseCategory {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        PurchaseCategory::ALL
            .into_iter()
            .find(|category| category.to_string() == wanted)
            .ok_or_else(|| {
                LedgerError::validation(format!(
                    "unknown purchase category '{}' (expected one of car, clothing, food, \
                     groceries, lodging, restaurant, travel, utilities)",
                    s.trim()
                ))
            })
    }
}

/// Why a fee was charged
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeeReason {
    /// Flat interest charged alongside every purchase
    Interest,
}

impl fmt::Display for FeeReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeeReason::Interest => f.write_str("interest"),
        }
    }
}

/// How a bill payment was made
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    Check,
    Online,
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PaymentMethod::Check => f.write_str("check"),
            PaymentMethod::Online => f.write_str("online"),
        }
    }
}

impl FromStr for PaymentMethod {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "check" => Ok(PaymentMethod::Check),
            "online" => Ok(PaymentMethod::Online),
            other => Err(LedgerError::validation(format!(
                "unknown payment method '{}' (expected check or online)",
                other
            ))),
        }
    }
}

/// A fee charged to a card
#[derive(Debug, Clone, PartialEq)]
pub struct Fee {
    id: TransactionId,
    amount: Decimal,
    timestamp: DateTime<Utc>,
    reason: FeeReason,
}

impl Fee {
    pub(crate) fn new(
        id: TransactionId,
        amount: Decimal,
        timestamp: DateTime<Utc>,
        reason: FeeReason,
    ) -> Self {
        Fee {
            id,
            amount,
            timestamp,
            reason,
        }
    }

    pub fn id(&self) -> TransactionId {
        self.id
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn reason(&self) -> FeeReason {
        self.reason
    }
}

/// A purchase made with a card
///
/// Carries the interest fee that was built alongside it. Recording the
/// purchase records that fee as its own ledger entry.
#[derive(Debug, Clone, PartialEq)]
pub struct Purchase {
    id: TransactionId,
    amount: Decimal,
    timestamp: DateTime<Utc>,
    category: PurchaseCategory,
    vendor: Vendor,
    interest_fee: Fee,
}

impl Purchase {
    pub(crate) fn new(
        id: TransactionId,
        amount: Decimal,
        timestamp: DateTime<Utc>,
        category: PurchaseCategory,
        vendor: Vendor,
        interest_fee: Fee,
    ) -> Self {
        Purchase {
            id,
            amount,
            timestamp,
            category,
            vendor,
            interest_fee,
        }
    }

    pub fn id(&self) -> TransactionId {
        self.id
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn category(&self) -> PurchaseCategory {
        self.category
    }

    pub fn vendor(&self) -> &Vendor {
        &self.vendor
    }

    pub fn interest_fee(&self) -> &Fee {
        &self.interest_fee
    }
}

/// A bill payment toward a card's balance
#[derive(Debug, Clone, PartialEq)]
pub struct Payment {
    id: TransactionId,
    amount: Decimal,
    timestamp: DateTime<Utc>,
    method: PaymentMethod,
    account: BankAccount,
}

impl Payment {
    pub(crate) fn new(
        id: TransactionId,
        amount: Decimal,
        timestamp: DateTime<Utc>,
        method: PaymentMethod,
        account: BankAccount,
    ) -> Self {
        Payment {
            id,
            amount,
            timestamp,
            method,
            account,
        }
    }

    pub fn id(&self) -> TransactionId {
        self.id
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn method(&self) -> PaymentMethod {
        self.method
    }

    /// Bank account the payment was drawn from
    pub fn account(&self) -> &BankAccount {
        &self.account
    }
}

/// One entry in a card's ledger
#[derive(Debug, Clone, PartialEq)]
pub enum Transaction {
    Purchase(Purchase),
    Fee(Fee),
    Payment(Payment),
}

impl Transaction {
    pub fn id(&self) -> TransactionId {
        match self {
            Transaction::Purchase(p) => p.id,
            Transaction::Fee(f) => f.id,
            Transaction::Payment(p) => p.id,
        }
    }

    pub fn amount(&self) -> Decimal {
        match self {
            Transaction::Purchase(p) => p.amount,
            Transaction::Fee(f) => f.amount,
            Transaction::Payment(p) => p.amount,
        }
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        match self {
            Transaction::Purchase(p) => p.timestamp,
            Transaction::Fee(f) => f.timestamp,
            Transaction::Payment(p) => p.timestamp,
        }
    }

    pub fn kind(&self) -> TransactionKind {
        match self {
            Transaction::Purchase(_) => TransactionKind::Purchase,
            Transaction::Fee(_) => TransactionKind::Fee,
            Transaction::Payment(_) => TransactionKind::Payment,
        }
    }

    pub fn as_purchase(&self) -> Option<&Purchase> {
        match self {
            Transaction::Purchase(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_fee(&self) -> Option<&Fee> {
        match self {
            Transaction::Fee(f) => Some(f),
            _ => None,
        }
    }

    pub fn as_payment(&self) -> Option<&Payment> {
        match self {
            Transaction::Payment(p) => Some(p),
            _ => None,
        }
    }
}
