//! Credit card ledger and lifecycle
//!
//! This module provides the `CreditCard` struct, which owns one card's
//! append-only transaction log together with its balance and status.
//!
//! The card is responsible for:
//! - Applying fees, payments and purchases to its balance
//! - Keeping `available_credit == credit_limit - current_balance` after every change
//! - Refusing purchases unless the card is active
//! - Answering queries over its own log (largest purchase, totals, most recent entries)
//!
//! # Caller contract for payments
//!
//! `record_payment` does not compare the payment with the balance. An
//! overpayment drives the balance negative and the available credit above the
//! limit. Callers that want to forbid overpayment must check before recording.

use crate::types::{
    CardId, CardIssuer, CardStatus, CardSummary, Fee, LedgerError, Payment, Purchase,
    PurchaseCategory, Transaction,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::{debug, info};

/// Credit limit every new card is issued with
pub const CREDIT_LIMIT: Decimal = Decimal::from_parts(2000, 0, 0, false, 0);

/// A single credit card and its ledger
#[derive(Debug, Clone, PartialEq)]
pub struct CreditCard {
    id: CardId,
    issue_date: NaiveDate,
    expiration_date: NaiveDate,
    issuer: CardIssuer,
    status: CardStatus,
    credit_limit: Decimal,
    current_balance: Decimal,
    available_credit: Decimal,
    /// Insertion order is recording order
    transactions: Vec<Transaction>,
}

impl CreditCard {
    /// Create a new card with a zero balance and the standard limit
    ///
    /// The initial status is `Expired` if `expiration_date` is already before
    /// `today`, `Active` otherwise.
    pub fn new(
        id: CardId,
        issue_date: NaiveDate,
        expiration_date: NaiveDate,
        issuer: CardIssuer,
        today: NaiveDate,
    ) -> Self {
        CreditCard {
            id,
            issue_date,
            expiration_date,
            issuer,
            status: CardStatus::initial(expiration_date, today),
            credit_limit: CREDIT_LIMIT,
            current_balance: Decimal::ZERO,
            available_credit: CREDIT_LIMIT,
            transactions: Vec::new(),
        }
    }

    /// Rebuild a card from saved state
    ///
    /// Available credit is derived from the limit and balance rather than
    /// trusted from storage.
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn restore(
        id: CardId,
        issue_date: NaiveDate,
        expiration_date: NaiveDate,
        issuer: CardIssuer,
        status: CardStatus,
        credit_limit: Decimal,
        current_balance: Decimal,
        transactions: Vec<Transaction>,
    ) -> Self {
        CreditCard {
            id,
            issue_date,
            expiration_date,
            issuer,
            status,
            credit_limit,
            current_balance,
            available_credit: credit_limit - current_balance,
            transactions,
        }
    }

    /// Record a fee against the card
    ///
    /// Allowed in every status.
    ///
    /// # Errors
    ///
    /// Returns `Validation` if the new balance is out of range. The card is
    /// left untouched in that case.
    pub fn record_fee(&mut self, fee: Fee) -> Result<(), LedgerError> {
        let amount = fee.amount();
        let (balance, available) =
            self.balances_after(amount, self.current_balance.checked_add(amount))?;
        self.transactions.push(Transaction::Fee(fee));
        self.set_balances(balance, available);
        Ok(())
    }

    /// Record a bill payment against the card
    ///
    /// Allowed in every status. The amount is not checked against the
    /// balance; see the module docs.
    ///
    /// # Errors
    ///
    /// Returns `Validation` if the new balance is out of range. The card is
    /// left untouched in that case.
    pub fn record_payment(&mut self, payment: Payment) -> Result<(), LedgerError> {
        let amount = payment.amount();
        let (balance, available) =
            self.balances_after(amount, self.current_balance.checked_sub(amount))?;
        self.transactions.push(Transaction::Payment(payment));
        self.set_balances(balance, available);
        debug!(card = self.id, %amount, balance = %self.current_balance, "payment recorded");
        Ok(())
    }

    /// Record a purchase and its interest fee
    ///
    /// Appends the interest fee, then the purchase. The balance grows by the
    /// purchase amount plus the fee.
    ///
    /// # Errors
    ///
    /// Returns `InvalidOperation` if the card is not active, or `Validation`
    /// if the new balance is out of range. The card is left untouched in
    /// either case.
    pub fn record_purchase(&mut self, purchase: Purchase) -> Result<(), LedgerError> {
        if self.status != CardStatus::Active {
            return Err(LedgerError::invalid_operation(
                self.id,
                self.status,
                "purchase",
            ));
        }

        let amount = purchase.amount();
        let fee = purchase.interest_fee().clone();
        let (balance, available) = self.balances_after(
            amount,
            self.current_balance
                .checked_add(fee.amount())
                .and_then(|with_fee| with_fee.checked_add(amount)),
        )?;

        self.transactions.push(Transaction::Fee(fee));
        self.transactions.push(Transaction::Purchase(purchase));
        self.set_balances(balance, available);

        debug!(card = self.id, %amount, balance = %self.current_balance, "purchase recorded");
        Ok(())
    }

    /// New balance and available credit, or an error if either overflows
    fn balances_after(
        &self,
        amount: Decimal,
        balance: Option<Decimal>,
    ) -> Result<(Decimal, Decimal), LedgerError> {
        balance
            .and_then(|balance| {
                self.credit_limit
                    .checked_sub(balance)
                    .map(|available| (balance, available))
            })
            .ok_or_else(|| {
                LedgerError::validation(format!(
                    "amount {} is out of range for card {}",
                    amount, self.id
                ))
            })
    }

    fn set_balances(&mut self, balance: Decimal, available: Decimal) {
        self.current_balance = balance;
        self.available_credit = available;
    }

    /// Largest purchase on the card
    ///
    /// Among equal amounts the earliest recorded wins.
    pub fn largest_purchase(&self) -> Option<&Purchase> {
        let mut largest: Option<&Purchase> = None;
        for purchase in self.purchases() {
            match largest {
                Some(best) if purchase.amount() <= best.amount() => {}
                _ => largest = Some(purchase),
            }
        }
        largest
    }

    /// Sum of all fees on the card
    pub fn total_fees(&self) -> Decimal {
        self.transactions
            .iter()
            .filter_map(Transaction::as_fee)
            .map(Fee::amount)
            .sum()
    }

    /// Sum of purchase amounts in `category` (fees excluded)
    pub fn total_spent(&self, category: PurchaseCategory) -> Decimal {
        self.purchases()
            .filter(|purchase| purchase.category() == category)
            .map(Purchase::amount)
            .sum()
    }

    /// Last payment by log position
    pub fn most_recent_payment(&self) -> Option<&Payment> {
        self.transactions
            .iter()
            .rev()
            .find_map(Transaction::as_payment)
    }

    /// Last purchase by log position
    pub fn most_recent_purchase(&self) -> Option<&Purchase> {
        self.transactions
            .iter()
            .rev()
            .find_map(Transaction::as_purchase)
    }

    fn purchases(&self) -> impl Iterator<Item = &Purchase> {
        self.transactions.iter().filter_map(Transaction::as_purchase)
    }

    /// Mark the card cancelled, whatever its current status
    pub fn mark_cancelled(&mut self) {
        info!(card = self.id, from = %self.status, "card cancelled");
        self.status = CardStatus::Cancelled;
    }

    /// Mark the card lost, whatever its current status
    pub fn mark_lost(&mut self) {
        info!(card = self.id, from = %self.status, "card reported lost");
        self.status = CardStatus::Lost;
    }

    /// Expire the card if its expiration date is before `today`
    ///
    /// Applies to any status, including cancelled and lost cards. Never moves
    /// a card back to `Active`. Returns whether the status changed.
    pub fn refresh_expiry(&mut self, today: NaiveDate) -> bool {
        if self.expiration_date < today && self.status != CardStatus::Expired {
            info!(card = self.id, from = %self.status, "card expired");
            self.status = CardStatus::Expired;
            return true;
        }
        false
    }

    pub fn id(&self) -> CardId {
        self.id
    }

    pub fn issue_date(&self) -> NaiveDate {
        self.issue_date
    }

    pub fn expiration_date(&self) -> NaiveDate {
        self.expiration_date
    }

    pub fn issuer(&self) -> CardIssuer {
        self.issuer
    }

    pub fn status(&self) -> CardStatus {
        self.status
    }

    pub fn credit_limit(&self) -> Decimal {
        self.credit_limit
    }

    pub fn current_balance(&self) -> Decimal {
        self.current_balance
    }

    pub fn available_credit(&self) -> Decimal {
        self.available_credit
    }

    /// The ledger, oldest entry first
    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn summary(&self) -> CardSummary {
        CardSummary {
            id: self.id,
            issuer: self.issuer,
            status: self.status,
            issue_date: self.issue_date,
            expiration_date: self.expiration_date,
            credit_limit: self.credit_limit,
            balance: self.current_balance,
            available_credit: self.available_credit,
            transactions: self.transactions.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{
        Address, BankAccount, FeeReason, PaymentMethod, TransactionKind, Vendor,
    };
    use chrono::{DateTime, TimeZone, Utc};
    use proptest::prelude::*;
    use rstest::rstest;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn at(second: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 5, 1, 10, 0, second).unwrap()
    }

    fn active_card() -> CreditCard {
        CreditCard::new(1, date(2025, 1, 1), date(2029, 1, 1), CardIssuer::Visa, date(2026, 5, 1))
    }

    fn vendor() -> Vendor {
        Vendor::new("Green Grocer", Address::new("5 Oak Ave", "Boise", "ID", "83702"))
    }

    /// Purchase with ids (2n-1, 2n) and a 1% fee, mirroring the factory
    fn purchase(n: u64, cents: i64, category: PurchaseCategory) -> Purchase {
        let amount = Decimal::new(cents, 2);
        let fee = Fee::new(
            2 * n - 1,
            amount * Decimal::new(1, 2),
            at(0),
            FeeReason::Interest,
        );
        Purchase::new(2 * n, amount, at(1), category, vendor(), fee)
    }

    fn payment(id: u64, cents: i64) -> Payment {
        Payment::new(
            id,
            Decimal::new(cents, 2),
            at(2),
            PaymentMethod::Online,
            BankAccount::new("First Bank", "001"),
        )
    }

    fn assert_credit_invariant(card: &CreditCard) {
        assert_eq!(
            card.available_credit(),
            card.credit_limit() - card.current_balance()
        );
    }

    #[test]
    fn test_new_card_has_full_credit() {
        let card = active_card();
        assert_eq!(card.status(), CardStatus::Active);
        assert_eq!(card.credit_limit(), Decimal::new(2000, 0));
        assert_eq!(card.current_balance(), Decimal::ZERO);
        assert_eq!(card.available_credit(), Decimal::new(2000, 0));
        assert!(card.transactions().is_empty());
    }

    #[test]
    fn test_new_card_past_expiration_starts_expired() {
        let card = CreditCard::new(
            1,
            date(2020, 1, 1),
            date(2024, 1, 1),
            CardIssuer::Amex,
            date(2026, 5, 1),
        );
        assert_eq!(card.status(), CardStatus::Expired);
    }

    #[test]
    fn test_purchase_scenario() {
        let mut card = active_card();

        card.record_purchase(purchase(1, 50000, PurchaseCategory::Groceries))
            .unwrap();

        assert_eq!(card.current_balance(), Decimal::new(50500, 2));
        assert_eq!(card.available_credit(), Decimal::new(149500, 2));
        let logged: Vec<_> = card
            .transactions()
            .iter()
            .map(|t| (t.kind(), t.amount()))
            .collect();
        assert_eq!(
            logged,
            vec![
                (TransactionKind::Fee, Decimal::new(500, 2)),
                (TransactionKind::Purchase, Decimal::new(50000, 2)),
            ]
        );
    }

    #[rstest]
    #[case::expired(CardStatus::Expired)]
    #[case::cancelled(CardStatus::Cancelled)]
    #[case::lost(CardStatus::Lost)]
    fn test_purchase_rejected_when_not_active(#[case] status: CardStatus) {
        let mut card = active_card();
        match status {
            CardStatus::Cancelled => card.mark_cancelled(),
            CardStatus::Lost => card.mark_lost(),
            _ => {
                card.refresh_expiry(date(2030, 1, 1));
            }
        }
        assert_eq!(card.status(), status);

        let result = card.record_purchase(purchase(1, 1000, PurchaseCategory::Car));

        assert_eq!(
            result,
            Err(LedgerError::invalid_operation(1, status, "purchase"))
        );
        assert_eq!(card.current_balance(), Decimal::ZERO);
        assert!(card.transactions().is_empty());
    }

    #[rstest]
    #[case::cancelled(CardStatus::Cancelled)]
    #[case::lost(CardStatus::Lost)]
    fn test_fees_and_payments_allowed_in_any_status(#[case] status: CardStatus) {
        let mut card = active_card();
        card.record_purchase(purchase(1, 10000, PurchaseCategory::Travel))
            .unwrap();
        if status == CardStatus::Lost {
            card.mark_lost();
        } else {
            card.mark_cancelled();
        }

        card.record_fee(Fee::new(10, Decimal::new(250, 2), at(3), FeeReason::Interest)).unwrap();
        card.record_payment(payment(11, 5000)).unwrap();

        assert_eq!(card.current_balance(), Decimal::new(5350, 2));
        assert_eq!(card.transactions().len(), 4);
        assert_credit_invariant(&card);
    }

    #[test]
    fn test_credit_invariant_holds_after_every_mutation() {
        let mut card = active_card();

        card.record_purchase(purchase(1, 12345, PurchaseCategory::Food))
            .unwrap();
        assert_credit_invariant(&card);
        card.record_fee(Fee::new(3, Decimal::new(99, 2), at(3), FeeReason::Interest)).unwrap();
        assert_credit_invariant(&card);
        card.record_payment(payment(4, 5000)).unwrap();
        assert_credit_invariant(&card);
        card.record_purchase(purchase(3, 100, PurchaseCategory::Car))
            .unwrap();
        assert_credit_invariant(&card);
    }

    #[test]
    fn test_overpayment_is_not_clamped() {
        let mut card = active_card();
        card.record_purchase(purchase(1, 10000, PurchaseCategory::Clothing))
            .unwrap();

        card.record_payment(payment(3, 20000)).unwrap();

        assert_eq!(card.current_balance(), Decimal::new(-9900, 2));
        assert_eq!(card.available_credit(), Decimal::new(209900, 2));
        assert!(card.available_credit() > card.credit_limit());
    }

    #[test]
    fn test_out_of_range_payment_leaves_card_untouched() {
        let mut card = active_card();
        card.record_purchase(purchase(1, 10000, PurchaseCategory::Clothing))
            .unwrap();
        let before = card.clone();

        let huge = Payment::new(
            3,
            Decimal::MAX,
            at(2),
            PaymentMethod::Online,
            BankAccount::new("First Bank", "001"),
        );
        let result = card.record_payment(huge);

        assert!(matches!(result, Err(LedgerError::Validation { .. })));
        assert_eq!(card, before);
    }

    #[test]
    fn test_out_of_range_fee_leaves_card_untouched() {
        let mut card = active_card();
        card.record_fee(Fee::new(1, Decimal::ONE, at(0), FeeReason::Interest))
            .unwrap();
        let before = card.clone();

        let result = card.record_fee(Fee::new(2, Decimal::MAX, at(1), FeeReason::Interest));

        assert!(matches!(result, Err(LedgerError::Validation { .. })));
        assert_eq!(card, before);
    }

    #[test]
    fn test_out_of_range_purchase_leaves_card_untouched() {
        let mut card = active_card();
        let fee = Fee::new(1, Decimal::MAX * Decimal::new(1, 2), at(0), FeeReason::Interest);
        let huge = Purchase::new(2, Decimal::MAX, at(1), PurchaseCategory::Car, vendor(), fee);

        let result = card.record_purchase(huge);

        assert!(matches!(result, Err(LedgerError::Validation { .. })));
        assert_eq!(card.current_balance(), Decimal::ZERO);
        assert!(card.transactions().is_empty());
    }

    #[derive(Debug, Clone)]
    enum Step {
        Charge(i64),
        Pay(i64),
        Buy(i64),
        Lose,
        Cancel,
    }

    fn step() -> impl Strategy<Value = Step> {
        prop_oneof![
            3 => (1i64..50_000).prop_map(Step::Charge),
            3 => (1i64..300_000).prop_map(Step::Pay),
            6 => (100i64..150_000).prop_map(Step::Buy),
            1 => Just(Step::Lose),
            1 => Just(Step::Cancel),
        ]
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 128,
            .. ProptestConfig::default()
        })]

        /// Available credit tracks the balance through any mix of entries and status changes
        #[test]
        fn property_credit_invariant_holds_for_any_sequence(
            start in 0usize..4,
            steps in proptest::collection::vec(step(), 0..40),
        ) {
            let mut card = active_card();
            match start {
                1 => card.mark_lost(),
                2 => card.mark_cancelled(),
                3 => {
                    card.refresh_expiry(date(2030, 1, 1));
                }
                _ => {}
            }

            for (n, step) in steps.into_iter().enumerate() {
                let id = n as u64 + 1;
                let balance = card.current_balance();
                let logged = card.transactions().len();

                match step {
                    Step::Charge(cents) => {
                        let amount = Decimal::new(cents, 2);
                        card.record_fee(Fee::new(id, amount, at(0), FeeReason::Interest))
                            .unwrap();
                        prop_assert_eq!(card.current_balance(), balance + amount);
                        prop_assert_eq!(card.transactions().len(), logged + 1);
                    }
                    Step::Pay(cents) => {
                        card.record_payment(payment(id, cents)).unwrap();
                        prop_assert_eq!(card.current_balance(), balance - Decimal::new(cents, 2));
                        prop_assert_eq!(card.transactions().len(), logged + 1);
                    }
                    Step::Buy(cents) => {
                        let active = card.status() == CardStatus::Active;
                        let result = card.record_purchase(purchase(id, cents, PurchaseCategory::Food));
                        if active {
                            prop_assert!(result.is_ok());
                            prop_assert_eq!(
                                card.current_balance(),
                                balance + Decimal::new(cents, 2) * Decimal::new(101, 2)
                            );
                            prop_assert_eq!(card.transactions().len(), logged + 2);
                        } else {
                            prop_assert!(
                                matches!(result, Err(LedgerError::InvalidOperation { .. })),
                                "purchase on {} card was not refused", card.status()
                            );
                            prop_assert_eq!(card.current_balance(), balance);
                            prop_assert_eq!(card.transactions().len(), logged);
                        }
                    }
                    Step::Lose => card.mark_lost(),
                    Step::Cancel => card.mark_cancelled(),
                }

                prop_assert_eq!(
                    card.available_credit(),
                    card.credit_limit() - card.current_balance()
                );
            }
        }
    }

    #[test]
    fn test_largest_purchase_empty_log() {
        assert!(active_card().largest_purchase().is_none());
    }

    #[test]
    fn test_largest_purchase_keeps_first_of_ties() {
        let mut card = active_card();
        card.record_purchase(purchase(1, 1000, PurchaseCategory::Food))
            .unwrap();
        card.record_purchase(purchase(2, 2500, PurchaseCategory::Food))
            .unwrap();
        card.record_purchase(purchase(3, 2500, PurchaseCategory::Food))
            .unwrap();

        let largest = card.largest_purchase().unwrap();
        assert_eq!(largest.id(), 4);
        assert_eq!(largest.amount(), Decimal::new(2500, 2));
    }

    #[test]
    fn test_totals() {
        let mut card = active_card();
        card.record_purchase(purchase(1, 10000, PurchaseCategory::Groceries))
            .unwrap();
        card.record_purchase(purchase(2, 5000, PurchaseCategory::Restaurant))
            .unwrap();
        card.record_purchase(purchase(3, 2000, PurchaseCategory::Groceries))
            .unwrap();

        assert_eq!(
            card.total_spent(PurchaseCategory::Groceries),
            Decimal::new(12000, 2)
        );
        assert_eq!(
            card.total_spent(PurchaseCategory::Lodging),
            Decimal::ZERO
        );
        assert_eq!(card.total_fees(), Decimal::new(170, 2));
    }

    #[test]
    fn test_most_recent_entries_by_log_position() {
        let mut card = active_card();
        assert!(card.most_recent_payment().is_none());
        assert!(card.most_recent_purchase().is_none());

        card.record_payment(payment(100, 100)).unwrap();
        card.record_purchase(purchase(1, 3000, PurchaseCategory::Car))
            .unwrap();
        card.record_payment(payment(101, 200)).unwrap();
        card.record_purchase(purchase(2, 4000, PurchaseCategory::Car))
            .unwrap();

        assert_eq!(card.most_recent_payment().map(Payment::id), Some(101));
        assert_eq!(card.most_recent_purchase().map(Purchase::id), Some(4));
    }

    #[test]
    fn test_payment_at_log_start_is_found() {
        let mut card = active_card();
        card.record_payment(payment(7, 100)).unwrap();
        assert_eq!(card.most_recent_payment().map(Payment::id), Some(7));
    }

    #[test]
    fn test_mark_transitions_are_unconditional() {
        let mut card = active_card();
        card.mark_cancelled();
        assert_eq!(card.status(), CardStatus::Cancelled);
        card.mark_lost();
        assert_eq!(card.status(), CardStatus::Lost);
    }

    #[rstest]
    #[case::before_expiry(date(2028, 12, 31), CardStatus::Active, false)]
    #[case::on_expiry(date(2029, 1, 1), CardStatus::Active, false)]
    #[case::after_expiry(date(2029, 1, 2), CardStatus::Expired, true)]
    fn test_refresh_expiry(
        #[case] today: NaiveDate,
        #[case] expected: CardStatus,
        #[case] changed: bool,
    ) {
        let mut card = active_card();
        assert_eq!(card.refresh_expiry(today), changed);
        assert_eq!(card.status(), expected);
    }

    #[test]
    fn test_refresh_expiry_applies_to_cancelled_cards() {
        let mut card = active_card();
        card.mark_cancelled();
        assert!(card.refresh_expiry(date(2029, 2, 1)));
        assert_eq!(card.status(), CardStatus::Expired);
    }

    #[test]
    fn test_refresh_expiry_never_reactivates() {
        let mut card = CreditCard::new(
            1,
            date(2020, 1, 1),
            date(2024, 1, 1),
            CardIssuer::Visa,
            date(2026, 1, 1),
        );
        assert!(!card.refresh_expiry(date(2023, 1, 1)));
        assert_eq!(card.status(), CardStatus::Expired);
    }

    #[test]
    fn test_summary_reflects_state() {
        let mut card = active_card();
        card.record_purchase(purchase(1, 10000, PurchaseCategory::Car))
            .unwrap();
        let summary = card.summary();
        assert_eq!(summary.id, 1);
        assert_eq!(summary.issuer, CardIssuer::Visa);
        assert_eq!(summary.balance, Decimal::new(10100, 2));
        assert_eq!(summary.available_credit, Decimal::new(189900, 2));
        assert_eq!(summary.transactions, 2);
    }
}
