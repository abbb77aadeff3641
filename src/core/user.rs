//! The user's wallet of credit cards
//!
//! `User` routes per-card operations to the right [`CreditCard`] by id and
//! aggregates queries across every card. [`User::resolve_card`] is the single
//! lookup every per-card operation goes through, so an unknown id always
//! surfaces as `CardNotFound`.
//!
//! Aggregates scan cards in insertion order. Where a "best" entry is chosen
//! (largest purchase, most recent payment) a later card only replaces the
//! current best when it is strictly better.

use crate::core::credit_card::CreditCard;
use crate::core::traits::CounterStore;
use crate::core::transaction_factory::TransactionFactory;
use crate::types::{
    BankAccount, CardId, CardStatus, CardSummary, Fee, LedgerError, Payment, PaymentMethod,
    Purchase, PurchaseCategory, Transaction, TransactionId,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::warn;

/// Result of a purchase request that reached a card
#[derive(Debug, Clone, PartialEq)]
pub enum PurchaseOutcome {
    /// Purchase recorded under this transaction id
    Recorded(TransactionId),
    /// Purchase refused; nothing was recorded
    Declined(DeclineReason),
}

/// Why a purchase was refused
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DeclineReason {
    /// Card is not active
    CardNotActive(CardStatus),
    /// Purchase amount exceeds the card's available credit
    InsufficientCredit {
        available: Decimal,
        requested: Decimal,
    },
}

impl std::fmt::Display for DeclineReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DeclineReason::CardNotActive(status) => write!(f, "card is {}", status),
            DeclineReason::InsufficientCredit {
                available,
                requested,
            } => write!(
                f,
                "requested {:.2} exceeds available credit {:.2}",
                requested, available
            ),
        }
    }
}

/// The single account holder and their cards
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    name: String,
    bank_account: BankAccount,
    /// Insertion order is management order
    cards: Vec<CreditCard>,
}

impl User {
    pub fn new(name: impl Into<String>, bank_account: BankAccount) -> Self {
        User {
            name: name.into(),
            bank_account,
            cards: Vec::new(),
        }
    }

    pub(crate) fn restore(name: String, bank_account: BankAccount, cards: Vec<CreditCard>) -> Self {
        User {
            name,
            bank_account,
            cards,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn bank_account(&self) -> &BankAccount {
        &self.bank_account
    }

    pub fn cards(&self) -> &[CreditCard] {
        &self.cards
    }

    pub fn card_count(&self) -> usize {
        self.cards.len()
    }

    pub fn has_card(&self, id: CardId) -> bool {
        self.cards.iter().any(|card| card.id() == id)
    }

    /// Add a card at the end of the wallet
    ///
    /// # Errors
    ///
    /// Returns `Validation` if a card with the same id is already present.
    pub fn add_card(&mut self, card: CreditCard) -> Result<(), LedgerError> {
        if self.has_card(card.id()) {
            return Err(LedgerError::validation(format!(
                "card {} is already in the wallet",
                card.id()
            )));
        }
        self.cards.push(card);
        Ok(())
    }

    /// Remove a card and return it
    ///
    /// # Errors
    ///
    /// Returns `CardNotFound` if no card has this id.
    pub fn remove_card(&mut self, id: CardId) -> Result<CreditCard, LedgerError> {
        let index = self
            .cards
            .iter()
            .position(|card| card.id() == id)
            .ok_or_else(|| LedgerError::card_not_found(id))?;
        Ok(self.cards.remove(index))
    }

    /// Look up a card by id
    ///
    /// # Errors
    ///
    /// Returns `CardNotFound` if no card has this id.
    pub fn resolve_card(&self, id: CardId) -> Result<&CreditCard, LedgerError> {
        self.cards
            .iter()
            .find(|card| card.id() == id)
            .ok_or_else(|| LedgerError::card_not_found(id))
    }

    fn resolve_card_mut(&mut self, id: CardId) -> Result<&mut CreditCard, LedgerError> {
        self.cards
            .iter_mut()
            .find(|card| card.id() == id)
            .ok_or_else(|| LedgerError::card_not_found(id))
    }

    /// Record a fee on a card
    pub fn record_fee(&mut self, card: CardId, fee: Fee) -> Result<(), LedgerError> {
        self.resolve_card_mut(card)?.record_fee(fee)
    }

    /// Record an already-built payment on a card
    pub fn record_payment(&mut self, card: CardId, payment: Payment) -> Result<(), LedgerError> {
        self.resolve_card_mut(card)?.record_payment(payment)
    }

    /// Record a purchase if the card can take it
    ///
    /// The purchase is declined, not errored, when the card is not active or
    /// the amount exceeds its available credit. A purchase that passes these
    /// checks is always accepted by the card.
    ///
    /// # Errors
    ///
    /// Returns `CardNotFound` for an unknown card.
    pub fn purchase(
        &mut self,
        card: CardId,
        purchase: Purchase,
    ) -> Result<PurchaseOutcome, LedgerError> {
        let target = self.resolve_card_mut(card)?;

        let decline = if target.status() != CardStatus::Active {
            Some(DeclineReason::CardNotActive(target.status()))
        } else if purchase.amount() > target.available_credit() {
            Some(DeclineReason::InsufficientCredit {
                available: target.available_credit(),
                requested: purchase.amount(),
            })
        } else {
            None
        };

        if let Some(reason) = decline {
            warn!(card, %reason, "purchase declined");
            return Ok(PurchaseOutcome::Declined(reason));
        }

        let id = purchase.id();
        target.record_purchase(purchase)?;
        Ok(PurchaseOutcome::Recorded(id))
    }

    /// Pay toward a card's balance from the user's bank account
    ///
    /// The amount is not validated here. Keeping payments at or below the
    /// balance is the caller's responsibility.
    ///
    /// # Errors
    ///
    /// Returns `CardNotFound` for an unknown card (no id is allocated in that
    /// case), the factory's error if the id cannot be persisted, or
    /// `Validation` if the amount would put the balance out of range.
    pub fn pay_bill<S: CounterStore>(
        &mut self,
        card: CardId,
        amount: Decimal,
        method: PaymentMethod,
        factory: &mut TransactionFactory<S>,
    ) -> Result<TransactionId, LedgerError> {
        self.resolve_card(card)?;
        let payment = factory.payment(amount, method, self.bank_account.clone())?;
        let id = payment.id();
        self.record_payment(card, payment)?;
        Ok(id)
    }

    pub fn mark_lost(&mut self, card: CardId) -> Result<(), LedgerError> {
        self.resolve_card_mut(card)?.mark_lost();
        Ok(())
    }

    pub fn mark_cancelled(&mut self, card: CardId) -> Result<(), LedgerError> {
        self.resolve_card_mut(card)?.mark_cancelled();
        Ok(())
    }

    /// Expire every card whose expiration date is before `today`
    ///
    /// Returns the number of cards whose status changed.
    pub fn refresh_expiries(&mut self, today: NaiveDate) -> usize {
        self.cards
            .iter_mut()
            .map(|card| card.refresh_expiry(today))
            .filter(|changed| *changed)
            .count()
    }

    pub fn balance(&self, card: CardId) -> Result<Decimal, LedgerError> {
        Ok(self.resolve_card(card)?.current_balance())
    }

    pub fn available_credit(&self, card: CardId) -> Result<Decimal, LedgerError> {
        Ok(self.resolve_card(card)?.available_credit())
    }

    pub fn transactions_on_card(&self, card: CardId) -> Result<&[Transaction], LedgerError> {
        Ok(self.resolve_card(card)?.transactions())
    }

    pub fn most_recent_purchase_on_card(
        &self,
        card: CardId,
    ) -> Result<Option<&Purchase>, LedgerError> {
        Ok(self.resolve_card(card)?.most_recent_purchase())
    }

    pub fn cards_summary(&self) -> Vec<CardSummary> {
        self.cards.iter().map(CreditCard::summary).collect()
    }

    /// Largest purchase on any card
    pub fn largest_purchase(&self) -> Option<&Purchase> {
        let mut largest: Option<&Purchase> = None;
        for candidate in self.cards.iter().filter_map(CreditCard::largest_purchase) {
            match largest {
                Some(best) if candidate.amount() <= best.amount() => {}
                _ => largest = Some(candidate),
            }
        }
        largest
    }

    /// Latest payment on any card, compared by timestamp
    pub fn most_recent_payment(&self) -> Option<&Payment> {
        let mut latest: Option<&Payment> = None;
        for candidate in self.cards.iter().filter_map(CreditCard::most_recent_payment) {
            match latest {
                Some(best) if candidate.timestamp() <= best.timestamp() => {}
                _ => latest = Some(candidate),
            }
        }
        latest
    }

    pub fn total_spent(&self, category: PurchaseCategory) -> Decimal {
        self.cards
            .iter()
            .map(|card| card.total_spent(category))
            .sum()
    }

    pub fn total_fees(&self) -> Decimal {
        self.cards.iter().map(CreditCard::total_fees).sum()
    }

    pub fn total_balance(&self) -> Decimal {
        self.cards.iter().map(CreditCard::current_balance).sum()
    }

    pub fn total_available_credit(&self) -> Decimal {
        self.cards.iter().map(CreditCard::available_credit).sum()
    }
}
