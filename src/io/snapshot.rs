//! User snapshot schema and JSON store
//!
//! The ledger's in-memory types are not serialized directly. This module
//! defines a plain schema mirroring the data model (user, cards, tagged
//! transactions) and converts between it and the ledger types. The schema
//! carries a version number; unknown versions are rejected on load.
//!
//! Decoding re-checks what the ledger relies on: card ids are unique within
//! the user and each card's stored available credit matches its limit minus
//! its balance.

use crate::core::credit_card::CreditCard;
use crate::core::traits::SnapshotStore;
use crate::core::user::User;
use crate::io::fs::write_atomically;
use crate::types::{
    BankAccount, CardId, CardIssuer, CardStatus, Fee, FeeReason, LedgerError, Payment,
    PaymentMethod, Purchase, PurchaseCategory, Transaction, TransactionId, Vendor,
};
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Schema version written by this build
pub const SNAPSHOT_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserSnapshot {
    pub version: u32,
    pub name: String,
    pub bank_account: BankAccount,
    pub cards: Vec<CardSnapshot>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardSnapshot {
    pub id: CardId,
    pub issue_date: NaiveDate,
    pub expiration_date: NaiveDate,
    pub issuer: CardIssuer,
    pub status: CardStatus,
    pub credit_limit: Decimal,
    pub current_balance: Decimal,
    pub available_credit: Decimal,
    pub transactions: Vec<TransactionSnapshot>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeeSnapshot {
    pub id: TransactionId,
    pub amount: Decimal,
    pub timestamp: DateTime<Utc>,
    pub reason: FeeReason,
}

/// One ledger entry, tagged by `kind`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum TransactionSnapshot {
    Purchase {
        id: TransactionId,
        amount: Decimal,
        timestamp: DateTime<Utc>,
        category: PurchaseCategory,
        vendor: Vendor,
        interest_fee: FeeSnapshot,
    },
    Fee(FeeSnapshot),
    Payment {
        id: TransactionId,
        amount: Decimal,
        timestamp: DateTime<Utc>,
        method: PaymentMethod,
        account: BankAccount,
    },
}

impl From<&Fee> for FeeSnapshot {
    fn from(fee: &Fee) -> Self {
        FeeSnapshot {
            id: fee.id(),
            amount: fee.amount(),
            timestamp: fee.timestamp(),
            reason: fee.reason(),
        }
    }
}

impl From<FeeSnapshot> for Fee {
    fn from(snapshot: FeeSnapshot) -> Self {
        Fee::new(
            snapshot.id,
            snapshot.amount,
            snapshot.timestamp,
            snapshot.reason,
        )
    }
}

impl From<&Transaction> for TransactionSnapshot {
    fn from(transaction: &Transaction) -> Self {
        match transaction {
            Transaction::Purchase(purchase) => TransactionSnapshot::Purchase {
                id: purchase.id(),
                amount: purchase.amount(),
                timestamp: purchase.timestamp(),
                category: purchase.category(),
                vendor: purchase.vendor().clone(),
                interest_fee: purchase.interest_fee().into(),
            },
            Transaction::Fee(fee) => TransactionSnapshot::Fee(fee.into()),
            Transaction::Payment(payment) => TransactionSnapshot::Payment {
                id: payment.id(),
                amount: payment.amount(),
                timestamp: payment.timestamp(),
                method: payment.method(),
                account: payment.account().clone(),
            },
        }
    }
}

impl From<TransactionSnapshot> for Transaction {
    fn from(snapshot: TransactionSnapshot) -> Self {
        match snapshot {
            TransactionSnapshot::Purchase {
                id,
                amount,
                timestamp,
                category,
                vendor,
                interest_fee,
            } => Transaction::Purchase(Purchase::new(
                id,
                amount,
                timestamp,
                category,
                vendor,
                interest_fee.into(),
            )),
            TransactionSnapshot::Fee(fee) => Transaction::Fee(fee.into()),
            TransactionSnapshot::Payment {
                id,
                amount,
                timestamp,
                method,
                account,
            } => Transaction::Payment(Payment::new(id, amount, timestamp, method, account)),
        }
    }
}

impl From<&CreditCard> for CardSnapshot {
    fn from(card: &CreditCard) -> Self {
        CardSnapshot {
            id: card.id(),
            issue_date: card.issue_date(),
            expiration_date: card.expiration_date(),
            issuer: card.issuer(),
            status: card.status(),
            credit_limit: card.credit_limit(),
            current_balance: card.current_balance(),
            available_credit: card.available_credit(),
            transactions: card.transactions().iter().map(Into::into).collect(),
        }
    }
}

impl TryFrom<CardSnapshot> for CreditCard {
    type Error = LedgerError;

    fn try_from(snapshot: CardSnapshot) -> Result<Self, Self::Error> {
        let expected = snapshot
            .credit_limit
            .checked_sub(snapshot.current_balance);
        if expected != Some(snapshot.available_credit) {
            return Err(LedgerError::snapshot(&format!(
                "card {} has available credit {} but limit {} and balance {}",
                snapshot.id,
                snapshot.available_credit,
                snapshot.credit_limit,
                snapshot.current_balance
            )));
        }

        Ok(CreditCard::restore(
            snapshot.id,
            snapshot.issue_date,
            snapshot.expiration_date,
            snapshot.issuer,
            snapshot.status,
            snapshot.credit_limit,
            snapshot.current_balance,
            snapshot.transactions.into_iter().map(Into::into).collect(),
        ))
    }
}

impl From<&User> for UserSnapshot {
    fn from(user: &User) -> Self {
        UserSnapshot {
            version: SNAPSHOT_VERSION,
            name: user.name().to_string(),
            bank_account: user.bank_account().clone(),
            cards: user.cards().iter().map(Into::into).collect(),
        }
    }
}

impl TryFrom<UserSnapshot> for User {
    type Error = LedgerError;

    fn try_from(snapshot: UserSnapshot) -> Result<Self, Self::Error> {
        if snapshot.version != SNAPSHOT_VERSION {
            return Err(LedgerError::snapshot(&format!(
                "unsupported snapshot version {} (expected {})",
                snapshot.version, SNAPSHOT_VERSION
            )));
        }

        let mut cards: Vec<CreditCard> = Vec::with_capacity(snapshot.cards.len());
        for card in snapshot.cards {
            if cards.iter().any(|existing| existing.id() == card.id) {
                return Err(LedgerError::snapshot(&format!(
                    "card id {} appears more than once",
                    card.id
                )));
            }
            cards.push(card.try_into()?);
        }

        Ok(User::restore(snapshot.name, snapshot.bank_account, cards))
    }
}

/// Encode a user as pretty-printed JSON
pub fn encode_user(user: &User) -> Result<String, LedgerError> {
    Ok(serde_json::to_string_pretty(&UserSnapshot::from(user))?)
}

/// Decode a user from JSON produced by [`encode_user`]
pub fn decode_user(json: &str) -> Result<User, LedgerError> {
    let snapshot: UserSnapshot = serde_json::from_str(json)?;
    snapshot.try_into()
}

/// Snapshot kept in a single JSON file
///
/// A missing or empty file means no user has been created yet.
#[derive(Debug, Clone)]
pub struct JsonSnapshotStore {
    path: PathBuf,
}

impl JsonSnapshotStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        JsonSnapshotStore { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SnapshotStore for JsonSnapshotStore {
    fn load_user(&self) -> Result<Option<User>, LedgerError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(LedgerError::persistence(&self.path, &e)),
        };

        if content.trim().is_empty() {
            return Ok(None);
        }

        let user = decode_user(&content)?;
        debug!(path = %self.path.display(), cards = user.card_count(), "snapshot loaded");
        Ok(Some(user))
    }

    fn save_user(&mut self, user: &User) -> Result<(), LedgerError> {
        let json = encode_user(user)?;
        write_atomically(&self.path, json.as_bytes())?;
        debug!(path = %self.path.display(), "snapshot saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::clock::ManualClock;
    use crate::core::id_allocator::IdAllocator;
    use crate::core::transaction_factory::TransactionFactory;
    use crate::io::memory::MemoryCounterStore;
    use crate::types::Address;
    use chrono::TimeZone;
    use std::rc::Rc;
    use tempfile::tempdir;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn populated_user() -> User {
        let clock = ManualClock::starting_at(Utc.with_ymd_and_hms(2026, 7, 4, 15, 30, 0).unwrap());
        let mut factory = TransactionFactory::new(
            IdAllocator::initialize("transactions", MemoryCounterStore::new()).unwrap(),
            Rc::new(clock),
        );
        let mut user = User::new("Grace", BankAccount::new("Harbor Bank", "99-1"));
        let today = date(2026, 7, 4);
        user.add_card(CreditCard::new(5, date(2025, 3, 1), date(2029, 3, 1), CardIssuer::Amex, today))
            .unwrap();
        user.add_card(CreditCard::new(2, date(2024, 1, 1), date(2030, 1, 1), CardIssuer::Visa, today))
            .unwrap();

        let vendor = Vendor::new("Cafe Uno", Address::new("8 Bay St", "Miami", "FL", "33101"));
        let purchase = factory
            .purchase(Decimal::new(4250, 2), PurchaseCategory::Restaurant, vendor)
            .unwrap();
        user.purchase(5, purchase).unwrap();
        user.pay_bill(5, Decimal::new(1000, 2), PaymentMethod::Check, &mut factory)
            .unwrap();
        user.mark_lost(2).unwrap();
        user
    }

    #[test]
    fn test_round_trip_preserves_user() {
        let user = populated_user();
        let decoded = decode_user(&encode_user(&user).unwrap()).unwrap();
        assert_eq!(decoded, user);
    }

    #[test]
    fn test_transactions_are_tagged_by_kind() {
        let json = encode_user(&populated_user()).unwrap();
        assert!(json.contains("\"kind\": \"fee\""));
        assert!(json.contains("\"kind\": \"purchase\""));
        assert!(json.contains("\"kind\": \"payment\""));
        assert!(json.contains("\"version\": 1"));
    }

    #[test]
    fn test_unknown_version_rejected() {
        let mut snapshot = UserSnapshot::from(&populated_user());
        snapshot.version = 2;
        let json = serde_json::to_string(&snapshot).unwrap();

        let err = decode_user(&json).unwrap_err();
        assert!(matches!(err, LedgerError::Snapshot { .. }));
    }

    #[test]
    fn test_duplicate_card_ids_rejected() {
        let mut snapshot = UserSnapshot::from(&populated_user());
        snapshot.cards[1].id = snapshot.cards[0].id;
        let json = serde_json::to_string(&snapshot).unwrap();

        assert!(decode_user(&json).is_err());
    }

    #[test]
    fn test_inconsistent_available_credit_rejected() {
        let mut snapshot = UserSnapshot::from(&populated_user());
        snapshot.cards[0].available_credit = Decimal::new(2000, 0);
        let json = serde_json::to_string(&snapshot).unwrap();

        assert!(decode_user(&json).is_err());
    }

    #[test]
    fn test_out_of_range_balance_rejected() {
        let mut snapshot = UserSnapshot::from(&populated_user());
        snapshot.cards[0].current_balance = -Decimal::MAX;
        let json = serde_json::to_string(&snapshot).unwrap();

        let err = decode_user(&json).unwrap_err();
        assert!(matches!(err, LedgerError::Snapshot { .. }));
    }

    #[test]
    fn test_malformed_json_is_snapshot_error() {
        let err = decode_user("{ not json").unwrap_err();
        assert!(matches!(err, LedgerError::Snapshot { .. }));
    }

    #[test]
    fn test_file_store_missing_and_empty_mean_first_run() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("user.json");
        let store = JsonSnapshotStore::new(&path);
        assert!(store.load_user().unwrap().is_none());

        fs::write(&path, "  \n").unwrap();
        assert!(store.load_user().unwrap().is_none());
    }

    #[test]
    fn test_file_store_save_and_load() {
        let dir = tempdir().unwrap();
        let mut store = JsonSnapshotStore::new(dir.path().join("nested").join("user.json"));
        let user = populated_user();

        store.save_user(&user).unwrap();
        assert_eq!(store.load_user().unwrap(), Some(user));
    }
}
