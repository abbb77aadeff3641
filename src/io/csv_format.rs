//! CSV export of cards and ledgers
//!
//! This module centralizes the CSV output format:
//! - Card listing with balances and status
//! - One card's transaction log
//!
//! Amounts are written with two decimal places. Rows keep the order they are
//! given in (wallet order for cards, log order for transactions).

use crate::types::{CardSummary, LedgerError, Transaction};
use csv::Writer;
use std::io::Write;

/// Human-readable description of what a ledger entry was for
pub fn transaction_detail(transaction: &Transaction) -> String {
    match transaction {
        Transaction::Purchase(purchase) => {
            format!("{} at {}", purchase.category(), purchase.vendor().name)
        }
        Transaction::Fee(fee) => fee.reason().to_string(),
        Transaction::Payment(payment) => format!(
            "{} from {}",
            payment.method(),
            payment.account().bank_name
        ),
    }
}

/// Write a transaction log in CSV format
///
/// Columns: id, kind, amount, timestamp, detail
///
/// # Errors
///
/// Returns `Export` if the output cannot be written.
pub fn write_transactions_csv(
    transactions: &[Transaction],
    output: &mut dyn Write,
) -> Result<(), LedgerError> {
    let mut writer = Writer::from_writer(output);

    writer.write_record(["id", "kind", "amount", "timestamp", "detail"])?;

    for transaction in transactions {
        writer.write_record(&[
            transaction.id().to_string(),
            transaction.kind().to_string(),
            format!("{:.2}", transaction.amount()),
            transaction.timestamp().to_rfc3339(),
            transaction_detail(transaction),
        ])?;
    }

    writer.flush().map_err(|e| LedgerError::Export {
        message: format!("Failed to flush output: {}", e),
    })?;

    Ok(())
}

/// Write the cards listing in CSV format
///
/// Columns: id, issuer, status, issue_date, expiration_date, credit_limit,
/// balance, available_credit
///
/// # Errors
///
/// Returns `Export` if the output cannot be written.
pub fn write_cards_csv(cards: &[CardSummary], output: &mut dyn Write) -> Result<(), LedgerError> {
    let mut writer = Writer::from_writer(output);

    writer.write_record([
        "id",
        "issuer",
        "status",
        "issue_date",
        "expiration_date",
        "credit_limit",
        "balance",
        "available_credit",
    ])?;

    for card in cards {
        writer.write_record(&[
            card.id.to_string(),
            card.issuer.to_string(),
            card.status.to_string(),
            card.issue_date.to_string(),
            card.expiration_date.to_string(),
            format!("{:.2}", card.credit_limit),
            format!("{:.2}", card.balance),
            format!("{:.2}", card.available_credit),
        ])?;
    }

    writer.flush().map_err(|e| LedgerError::Export {
        message: format!("Failed to flush output: {}", e),
    })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{
        Address, BankAccount, CardIssuer, CardStatus, Fee, FeeReason, Payment, PaymentMethod,
        Purchase, PurchaseCategory, Vendor,
    };
    use chrono::{NaiveDate, TimeZone, Utc};
    use rstest::rstest;
    use rust_decimal::Decimal;

    fn summary(id: u64, status: CardStatus, balance_cents: i64) -> CardSummary {
        let balance = Decimal::new(balance_cents, 2);
        CardSummary {
            id,
            issuer: CardIssuer::Visa,
            status,
            issue_date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            expiration_date: NaiveDate::from_ymd_opt(2029, 1, 1).unwrap(),
            credit_limit: Decimal::new(2000, 0),
            balance,
            available_credit: Decimal::new(2000, 0) - balance,
            transactions: 0,
        }
    }

    #[rstest]
    #[case::empty(
        vec![],
        "id,issuer,status,issue_date,expiration_date,credit_limit,balance,available_credit\n"
    )]
    #[case::two_cards_in_given_order(
        vec![summary(4, CardStatus::Active, 50500), summary(1, CardStatus::Lost, 0)],
        "id,issuer,status,issue_date,expiration_date,credit_limit,balance,available_credit\n\
         4,Visa,active,2025-01-01,2029-01-01,2000.00,505.00,1495.00\n\
         1,Visa,lost,2025-01-01,2029-01-01,2000.00,0.00,2000.00\n"
    )]
    #[case::negative_balance(
        vec![summary(2, CardStatus::Active, -1250)],
        "id,issuer,status,issue_date,expiration_date,credit_limit,balance,available_credit\n\
         2,Visa,active,2025-01-01,2029-01-01,2000.00,-12.50,2012.50\n"
    )]
    fn test_write_cards_csv(#[case] cards: Vec<CardSummary>, #[case] expected: &str) {
        let mut output = Vec::new();
        write_cards_csv(&cards, &mut output).unwrap();
        assert_eq!(String::from_utf8(output).unwrap(), expected);
    }

    #[test]
    fn test_write_transactions_csv() {
        let at = Utc.with_ymd_and_hms(2026, 8, 9, 10, 11, 12).unwrap();
        let fee = Fee::new(1, Decimal::new(50000, 2) * Decimal::new(1, 2), at, FeeReason::Interest);
        let purchase = Purchase::new(
            2,
            Decimal::new(50000, 2),
            at,
            PurchaseCategory::Groceries,
            Vendor::new("Fresh Mart", Address::new("1 A St", "Reno", "NV", "89501")),
            fee.clone(),
        );
        let payment = Payment::new(
            3,
            Decimal::new(7500, 2),
            at,
            PaymentMethod::Online,
            BankAccount::new("Harbor Bank", "77"),
        );
        let log = vec![
            Transaction::Fee(fee),
            Transaction::Purchase(purchase),
            Transaction::Payment(payment),
        ];

        let mut output = Vec::new();
        write_transactions_csv(&log, &mut output).unwrap();

        assert_eq!(
            String::from_utf8(output).unwrap(),
            "id,kind,amount,timestamp,detail\n\
             1,fee,5.00,2026-08-09T10:11:12+00:00,interest\n\
             2,purchase,500.00,2026-08-09T10:11:12+00:00,groceries at Fresh Mart\n\
             3,payment,75.00,2026-08-09T10:11:12+00:00,online from Harbor Bank\n"
        );
    }
}
