//! Ledger session engine
//!
//! This module provides the `LedgerEngine` that a front end drives. It owns
//! the in-memory [`User`], both id allocators and the snapshot store, and
//! turns each request into a committed change.
//!
//! The engine enforces:
//! - Id counters are loaded before anything else; failure to load is fatal
//! - Card expiry is re-checked once when an existing user is opened
//! - Every mutating operation saves a snapshot before its result is kept
//!
//! # Commit model
//!
//! Mutations are applied to a copy of the user. The copy replaces the live
//! user only after the snapshot save succeeds, so a failed write leaves the
//! session exactly as it was before the request. Ids allocated for a failed
//! request stay consumed; gaps in the id sequence are expected.

use crate::core::credit_card::CreditCard;
use crate::core::id_allocator::IdAllocator;
use crate::core::traits::{Clock, CounterStore, SnapshotStore};
use crate::core::transaction_factory::TransactionFactory;
use crate::core::user::{PurchaseOutcome, User};
use crate::types::{
    BankAccount, CardId, CardIssuer, CardSummary, LedgerError, Payment, PaymentMethod, Purchase,
    PurchaseCategory, Transaction, TransactionId, Vendor,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::rc::Rc;
use tracing::{debug, info};

/// The three durable stores a ledger session needs
#[derive(Debug, Clone)]
pub struct LedgerStorage<C, S> {
    pub card_counter: C,
    pub transaction_counter: C,
    pub snapshots: S,
}

/// A running ledger session
pub struct LedgerEngine<C: CounterStore, S: SnapshotStore> {
    user: User,
    card_ids: IdAllocator<C>,
    transactions: TransactionFactory<C>,
    snapshots: S,
    clock: Rc<dyn Clock>,
}

struct Started<C: CounterStore, S> {
    card_ids: IdAllocator<C>,
    transactions: TransactionFactory<C>,
    snapshots: S,
    existing: Option<User>,
}

fn start<C: CounterStore, S: SnapshotStore>(
    storage: LedgerStorage<C, S>,
    clock: &Rc<dyn Clock>,
) -> Result<Started<C, S>, LedgerError> {
    let card_ids = IdAllocator::initialize("cards", storage.card_counter)?;
    let transaction_ids = IdAllocator::initialize("transactions", storage.transaction_counter)?;
    let existing = storage.snapshots.load_user()?;

    Ok(Started {
        card_ids,
        transactions: TransactionFactory::new(transaction_ids, Rc::clone(clock)),
        snapshots: storage.snapshots,
        existing,
    })
}

impl<C: CounterStore, S: SnapshotStore> LedgerEngine<C, S> {
    /// Open the session for an existing user
    ///
    /// Restores the saved user and expires any card whose expiration date has
    /// passed since the last session.
    ///
    /// # Errors
    ///
    /// - `UserNotInitialized` if no snapshot exists (first run)
    /// - Persistence errors if a counter or the snapshot cannot be read
    pub fn open(storage: LedgerStorage<C, S>, clock: Rc<dyn Clock>) -> Result<Self, LedgerError> {
        let started = start(storage, &clock)?;
        let user = started.existing.ok_or(LedgerError::UserNotInitialized)?;

        let mut engine = LedgerEngine {
            user,
            card_ids: started.card_ids,
            transactions: started.transactions,
            snapshots: started.snapshots,
            clock,
        };

        let today = engine.clock.today();
        let expired = engine.commit("refresh_expiries", |user, _| {
            Ok(user.refresh_expiries(today))
        })?;

        info!(
            user = engine.user.name(),
            cards = engine.user.card_count(),
            expired,
            "ledger opened"
        );
        Ok(engine)
    }

    /// Create the user on a fresh installation
    ///
    /// # Errors
    ///
    /// - `UserAlreadyInitialized` if a snapshot already exists
    /// - Persistence errors if a counter cannot be read or the first
    ///   snapshot cannot be written
    pub fn create(
        storage: LedgerStorage<C, S>,
        clock: Rc<dyn Clock>,
        name: &str,
        bank_account: BankAccount,
    ) -> Result<Self, LedgerError> {
        let started = start(storage, &clock)?;
        if let Some(existing) = started.existing {
            return Err(LedgerError::UserAlreadyInitialized {
                name: existing.name().to_string(),
            });
        }

        let user = User::new(name, bank_account);
        let mut snapshots = started.snapshots;
        snapshots.save_user(&user)?;
        info!(user = name, "user created");

        Ok(LedgerEngine {
            user,
            card_ids: started.card_ids,
            transactions: started.transactions,
            snapshots,
            clock,
        })
    }

    /// Apply `apply` to a copy of the user, save it, then make it live
    fn commit<T>(
        &mut self,
        operation: &str,
        apply: impl FnOnce(&mut User, &mut TransactionFactory<C>) -> Result<T, LedgerError>,
    ) -> Result<T, LedgerError> {
        let mut staged = self.user.clone();
        let value = apply(&mut staged, &mut self.transactions)?;

        if staged != self.user {
            self.snapshots.save_user(&staged)?;
            self.user = staged;
            debug!(operation, "change committed");
        }
        Ok(value)
    }

    /// Issue a new card and add it to the wallet
    ///
    /// # Errors
    ///
    /// Fails if the card id or the snapshot cannot be persisted.
    pub fn add_card(
        &mut self,
        issue_date: NaiveDate,
        expiration_date: NaiveDate,
        issuer: CardIssuer,
    ) -> Result<CardId, LedgerError> {
        let id = self.card_ids.next()?;
        let card = CreditCard::new(id, issue_date, expiration_date, issuer, self.clock.today());
        let status = card.status();

        self.commit("add_card", |user, _| user.add_card(card))?;
        info!(card = id, %issuer, %status, "card added");
        Ok(id)
    }

    pub fn remove_card(&mut self, card: CardId) -> Result<(), LedgerError> {
        self.commit("remove_card", |user, _| user.remove_card(card).map(|_| ()))?;
        info!(card, "card removed");
        Ok(())
    }

    /// Build and record a purchase
    ///
    /// The purchase and its interest fee get ids before the card checks run,
    /// so a declined purchase still consumes two transaction ids.
    ///
    /// # Errors
    ///
    /// `CardNotFound` for an unknown card (no ids consumed), or a persistence
    /// error. A declined purchase is `Ok(PurchaseOutcome::Declined(_))`.
    pub fn purchase(
        &mut self,
        card: CardId,
        amount: Decimal,
        category: PurchaseCategory,
        vendor: Vendor,
    ) -> Result<PurchaseOutcome, LedgerError> {
        self.user.resolve_card(card)?;
        self.commit("purchase", |user, factory| {
            let purchase = factory.purchase(amount, category, vendor)?;
            user.purchase(card, purchase)
        })
    }

    /// Record a bill payment from the user's bank account
    ///
    /// The amount is recorded as given; see [`User::pay_bill`].
    pub fn pay_bill(
        &mut self,
        card: CardId,
        amount: Decimal,
        method: PaymentMethod,
    ) -> Result<TransactionId, LedgerError> {
        self.commit("pay_bill", |user, factory| {
            user.pay_bill(card, amount, method, factory)
        })
    }

    pub fn mark_lost(&mut self, card: CardId) -> Result<(), LedgerError> {
        self.commit("mark_lost", |user, _| user.mark_lost(card))
    }

    pub fn mark_cancelled(&mut self, card: CardId) -> Result<(), LedgerError> {
        self.commit("mark_cancelled", |user, _| user.mark_cancelled(card))
    }

    pub fn user(&self) -> &User {
        &self.user
    }

    pub fn user_name(&self) -> &str {
        self.user.name()
    }

    pub fn has_card(&self, card: CardId) -> bool {
        self.user.has_card(card)
    }

    pub fn balance(&self, card: CardId) -> Result<Decimal, LedgerError> {
        self.user.balance(card)
    }

    pub fn available_credit(&self, card: CardId) -> Result<Decimal, LedgerError> {
        self.user.available_credit(card)
    }

    pub fn transactions_on_card(&self, card: CardId) -> Result<&[Transaction], LedgerError> {
        self.user.transactions_on_card(card)
    }

    pub fn cards_summary(&self) -> Vec<CardSummary> {
        self.user.cards_summary()
    }

    pub fn largest_purchase(&self) -> Option<&Purchase> {
        self.user.largest_purchase()
    }

    pub fn most_recent_payment(&self) -> Option<&Payment> {
        self.user.most_recent_payment()
    }

    pub fn most_recent_purchase_on_card(
        &self,
        card: CardId,
    ) -> Result<Option<&Purchase>, LedgerError> {
        self.user.most_recent_purchase_on_card(card)
    }

    pub fn total_spent(&self, category: PurchaseCategory) -> Decimal {
        self.user.total_spent(category)
    }

    pub fn total_fees(&self) -> Decimal {
        self.user.total_fees()
    }

    pub fn total_balance(&self) -> Decimal {
        self.user.total_balance()
    }

    pub fn total_available_credit(&self) -> Decimal {
        self.user.total_available_credit()
    }
}
