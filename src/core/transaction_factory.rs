//! Construction of ledger entries
//!
//! Every entry gets its id from the transaction [`IdAllocator`] and its
//! timestamp from the [`Clock`] at the moment it is built. Building a purchase
//! builds its interest fee first, so the fee's id is one lower than the
//! purchase's and its timestamp is no later.

use crate::core::id_allocator::IdAllocator;
use crate::core::traits::{Clock, CounterStore};
use crate::types::{
    BankAccount, Fee, FeeReason, LedgerError, Payment, PaymentMethod, Purchase,
    PurchaseCategory, TransactionId, Vendor,
};
use rust_decimal::Decimal;
use std::rc::Rc;

/// Flat interest charged on every purchase (1%)
pub const INTEREST_RATE: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// Builds immutable ledger entries with freshly allocated ids
pub struct TransactionFactory<S: CounterStore> {
    ids: IdAllocator<S>,
    clock: Rc<dyn Clock>,
}

impl<S: CounterStore> TransactionFactory<S> {
    pub fn new(ids: IdAllocator<S>, clock: Rc<dyn Clock>) -> Self {
        TransactionFactory { ids, clock }
    }

    /// Build a fee
    ///
    /// # Errors
    ///
    /// Fails if the id allocation cannot be persisted.
    pub fn fee(&mut self, amount: Decimal, reason: FeeReason) -> Result<Fee, LedgerError> {
        let id = self.ids.next()?;
        Ok(Fee::new(id, amount, self.clock.now(), reason))
    }

    /// Build a purchase together with its interest fee
    ///
    /// The amount is not validated here; the caller enforces the minimum.
    ///
    /// # Errors
    ///
    /// Fails if either id allocation cannot be persisted. If the fee's id was
    /// issued and the purchase's was not, the fee's id is simply skipped.
    pub fn purchase(
        &mut self,
        amount: Decimal,
        category: PurchaseCategory,
        vendor: Vendor,
    ) -> Result<Purchase, LedgerError> {
        let interest_fee = self.fee(amount * INTEREST_RATE, FeeReason::Interest)?;
        let id = self.ids.next()?;
        Ok(Purchase::new(
            id,
            amount,
            self.clock.now(),
            category,
            vendor,
            interest_fee,
        ))
    }

    /// Build a bill payment drawn from `account`
    ///
    /// # Errors
    ///
    /// Fails if the id allocation cannot be persisted.
    pub fn payment(
        &mut self,
        amount: Decimal,
        method: PaymentMethod,
        account: BankAccount,
    ) -> Result<Payment, LedgerError> {
        let id = self.ids.next()?;
        Ok(Payment::new(id, amount, self.clock.now(), method, account))
    }

    /// Last transaction id handed out
    pub fn last_issued(&self) -> TransactionId {
        self.ids.last_issued()
    }
}
