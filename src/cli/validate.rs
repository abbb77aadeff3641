//! Input validation for CLI requests
//!
//! The ledger records what it is given. Range checks on dates and amounts,
//! and the shape of addresses, are enforced here before a request reaches
//! the engine.

use crate::types::LedgerError;
use chrono::NaiveDate;
use rust_decimal::Decimal;

/// Earliest accepted issue year
pub const MIN_ISSUE_YEAR: i32 = 2000;
/// Latest accepted expiration year
pub const MAX_EXPIRATION_YEAR: i32 = 2050;
/// Smallest purchase the ledger accepts
pub const MIN_PURCHASE: Decimal = Decimal::from_parts(100, 0, 0, false, 2);
/// Smallest balance that can be paid down
pub const MIN_PAYABLE_BALANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// US state, territory and district codes accepted in vendor addresses
pub const STATE_CODES: [&str; 57] = [
    "AK", "AL", "AR", "AS", "AZ", "CA", "CO", "CT", "DC", "DE", "FL", "GA", "GU", "HI", "IA",
    "ID", "IL", "IN", "KS", "KY", "LA", "MA", "MD", "ME", "MI", "MN", "MO", "MP", "MS", "MT",
    "NC", "ND", "NE", "NH", "NJ", "NM", "NV", "NY", "OH", "OK", "OR", "PA", "PR", "RI", "SC",
    "SD", "TN", "TX", "UM", "UT", "VA", "VI", "VT", "WA", "WI", "WV", "WY",
];

fn month_start(year: i32, month: u32, what: &str) -> Result<NaiveDate, LedgerError> {
    if !(1..=12).contains(&month) {
        return Err(LedgerError::validation(format!(
            "{} month must be between 1 and 12, got {}",
            what, month
        )));
    }
    NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(|| {
        LedgerError::validation(format!("{} date {}-{:02} is out of range", what, year, month))
    })
}

/// Validate a card's issue and expiration and build both dates
///
/// Cards are issued and expire on the first of the month. The issue year
/// must be between 2000 and `current_year`, the expiration year at most 2050,
/// and the card cannot expire before it was issued.
pub fn card_dates(
    issue_year: i32,
    issue_month: u32,
    expiration_year: i32,
    expiration_month: u32,
    current_year: i32,
) -> Result<(NaiveDate, NaiveDate), LedgerError> {
    if !(MIN_ISSUE_YEAR..=current_year).contains(&issue_year) {
        return Err(LedgerError::validation(format!(
            "Issue year must be between {} and {}, got {}",
            MIN_ISSUE_YEAR, current_year, issue_year
        )));
    }
    if expiration_year > MAX_EXPIRATION_YEAR {
        return Err(LedgerError::validation(format!(
            "Expiration year cannot be after {}, got {}",
            MAX_EXPIRATION_YEAR, expiration_year
        )));
    }

    let issue = month_start(issue_year, issue_month, "Issue")?;
    let expiration = month_start(expiration_year, expiration_month, "Expiration")?;

    if expiration < issue {
        return Err(LedgerError::validation(format!(
            "Expiration date {} is before the issue date {}",
            expiration, issue
        )));
    }
    Ok((issue, expiration))
}

pub fn purchase_amount(amount: Decimal) -> Result<Decimal, LedgerError> {
    if amount < MIN_PURCHASE {
        return Err(LedgerError::validation(format!(
            "The minimum purchase is {:.2}, got {}",
            MIN_PURCHASE, amount
        )));
    }
    Ok(amount)
}

/// Check a payment against the card's current balance
///
/// A payment must be positive and cannot exceed the balance, and a card
/// with less than one cent owed has nothing to pay.
pub fn payment_amount(amount: Decimal, balance: Decimal) -> Result<Decimal, LedgerError> {
    if balance < MIN_PAYABLE_BALANCE {
        return Err(LedgerError::validation("There is no balance to pay on this card"));
    }
    if amount <= Decimal::ZERO {
        return Err(LedgerError::validation(format!(
            "Payment must be greater than zero, got {}",
            amount
        )));
    }
    if amount > balance {
        return Err(LedgerError::validation(format!(
            "Payment of {} exceeds the balance of {:.2}",
            amount, balance
        )));
    }
    Ok(amount)
}

pub fn zip(value: &str) -> Result<String, LedgerError> {
    let value = value.trim();
    if value.len() == 5 && value.chars().all(|c| c.is_ascii_digit()) {
        Ok(value.to_string())
    } else {
        Err(LedgerError::validation(format!(
            "Zip code must be 5 digits, got '{}'",
            value
        )))
    }
}

/// Normalize a state abbreviation to upper case and check it is known
pub fn state(value: &str) -> Result<String, LedgerError> {
    let code = value.trim().to_ascii_uppercase();
    if STATE_CODES.contains(&code.as_str()) {
        Ok(code)
    } else {
        Err(LedgerError::validation(format!(
            "Unknown state abbreviation '{}'",
            value.trim()
        )))
    }
}
