//! Command execution
//!
//! Each invocation opens the ledger from the data directory, performs one
//! command and prints the result. Ledger output goes to the given writer;
//! diagnostics go through `tracing`.

use crate::cli::args::{AddCardArgs, CliArgs, Command, LedgerCommand, PurchaseArgs};
use crate::cli::validate;
use crate::config::LedgerConfig;
use crate::core::{Clock, LedgerEngine, PurchaseOutcome, SystemClock};
use crate::io::csv_format::transaction_detail;
use crate::io::{write_cards_csv, write_transactions_csv, FileCounterStore, JsonSnapshotStore};
use crate::types::{Address, BankAccount, LedgerError, Vendor};
use chrono::Datelike;
use std::io::{self, Write};
use std::rc::Rc;

type FileEngine = LedgerEngine<FileCounterStore, JsonSnapshotStore>;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M UTC";

/// Run the parsed command against the configured data directory
pub fn run(args: &CliArgs) -> Result<(), LedgerError> {
    let config = LedgerConfig::from_data_dir(&args.data_dir);
    let stdout = io::stdout();
    let mut out = stdout.lock();
    execute(&args.command, &config, Rc::new(SystemClock), &mut out)
}

/// Execute one command, writing its result to `out`
///
/// # Errors
///
/// Validation failures, unknown cards, a missing or existing user, and
/// persistence failures are all returned to the caller.
pub fn execute(
    command: &Command,
    config: &LedgerConfig,
    clock: Rc<dyn Clock>,
    out: &mut dyn Write,
) -> Result<(), LedgerError> {
    match command {
        Command::Init {
            name,
            bank,
            account,
        } => {
            FileEngine::create(
                config.file_storage(),
                clock,
                name,
                BankAccount::new(bank.as_str(), account.as_str()),
            )?;
            writeln!(out, "Created ledger for {}", name)?;
            Ok(())
        }
        Command::Ledger(command) => {
            let mut engine = FileEngine::open(config.file_storage(), Rc::clone(&clock))?;
            run_ledger_command(&mut engine, command, clock.as_ref(), out)
        }
    }
}

/// Run one command against an opened ledger
fn run_ledger_command(
    engine: &mut FileEngine,
    command: &LedgerCommand,
    clock: &dyn Clock,
    out: &mut dyn Write,
) -> Result<(), LedgerError> {
    match command {
        LedgerCommand::AddCard(card) => add_card(engine, card, clock, out)?,
        LedgerCommand::RemoveCard { card } => {
            engine.remove_card(*card)?;
            writeln!(out, "Removed card {}", card)?;
        }
        LedgerCommand::Cards => {
            let cards = engine.cards_summary();
            if cards.is_empty() {
                writeln!(out, "You have no cards")?;
            }
            for card in cards {
                writeln!(
                    out,
                    "{}  {:<10} {:<9} issued {}  expires {}  balance ${:.2}  available ${:.2}",
                    card.id,
                    card.issuer.to_string(),
                    card.status.to_string(),
                    card.issue_date,
                    card.expiration_date,
                    card.balance,
                    card.available_credit
                )?;
            }
        }
        LedgerCommand::Balance { card } => {
            let balance = engine.balance(*card)?;
            writeln!(out, "The current balance on card {} is ${:.2}", card, balance)?;
        }
        LedgerCommand::AvailableCredit { card } => {
            let available = engine.available_credit(*card)?;
            writeln!(out, "The available credit on card {} is ${:.2}", card, available)?;
        }
        LedgerCommand::Purchase(purchase) => make_purchase(engine, purchase, out)?,
        LedgerCommand::Pay {
            card,
            amount,
            method,
        } => {
            let amount = validate::payment_amount(*amount, engine.balance(*card)?)?;
            let id = engine.pay_bill(*card, amount, *method)?;
            writeln!(out, "Payment successful! Transaction id is {}", id)?;
        }
        LedgerCommand::LastPurchase { card } => match engine.most_recent_purchase_on_card(*card)? {
            Some(purchase) => writeln!(
                out,
                "Most recent purchase: ${:.2} at {} for {} on {}",
                purchase.amount(),
                purchase.vendor().name,
                purchase.category(),
                purchase.timestamp().date_naive()
            )?,
            None => writeln!(out, "You have no purchases on this card")?,
        },
        LedgerCommand::Transactions { card } => {
            let transactions = engine.transactions_on_card(*card)?;
            if transactions.is_empty() {
                writeln!(out, "No transactions on this card")?;
            }
            for transaction in transactions {
                writeln!(
                    out,
                    "{:>6}  {:<8} ${:.2}  {}  {}",
                    transaction.id(),
                    transaction.kind().to_string(),
                    transaction.amount(),
                    transaction.timestamp().format(TIMESTAMP_FORMAT),
                    transaction_detail(transaction)
                )?;
            }
        }
        LedgerCommand::MarkLost { card } => {
            engine.mark_lost(*card)?;
            writeln!(out, "Card {} marked as lost", card)?;
        }
        LedgerCommand::MarkCancelled { card } => {
            engine.mark_cancelled(*card)?;
            writeln!(out, "Card {} cancelled", card)?;
        }
        LedgerCommand::TotalBalance => {
            writeln!(out, "Total outstanding balance: ${:.2}", engine.total_balance())?;
        }
        LedgerCommand::TotalAvailable => {
            writeln!(
                out,
                "Total available credit: ${:.2}",
                engine.total_available_credit()
            )?;
        }
        LedgerCommand::LargestPurchase => match engine.largest_purchase() {
            Some(purchase) => writeln!(
                out,
                "Largest purchase: ${:.2} for {} at {}",
                purchase.amount(),
                purchase.category(),
                purchase.vendor().name
            )?,
            None => writeln!(out, "You have not made any purchases")?,
        },
        LedgerCommand::LastPayment => match engine.most_recent_payment() {
            Some(payment) => writeln!(
                out,
                "Last payment: ${:.2} via {} on {}",
                payment.amount(),
                payment.method(),
                payment.timestamp().format(TIMESTAMP_FORMAT)
            )?,
            None => writeln!(out, "You have not made any payments")?,
        },
        LedgerCommand::TotalFees => {
            writeln!(out, "Total interest fees charged: ${:.2}", engine.total_fees())?;
        }
        LedgerCommand::TotalSpent { category } => {
            writeln!(
                out,
                "Total spent on {}: ${:.2}",
                category,
                engine.total_spent(*category)
            )?;
        }
        LedgerCommand::Export { card: Some(card) } => {
            write_transactions_csv(engine.transactions_on_card(*card)?, out)?;
        }
        LedgerCommand::Export { card: None } => write_cards_csv(&engine.cards_summary(), out)?,
    }

    Ok(())
}

fn add_card(
    engine: &mut FileEngine,
    card: &AddCardArgs,
    clock: &dyn Clock,
    out: &mut dyn Write,
) -> Result<(), LedgerError> {
    let (issue_date, expiration_date) = validate::card_dates(
        card.issue_year,
        card.issue_month,
        card.expiration_year,
        card.expiration_month,
        clock.today().year(),
    )?;

    let id = engine.add_card(issue_date, expiration_date, card.issuer)?;
    writeln!(out, "The id of your new credit card is {}", id)?;
    Ok(())
}

fn make_purchase(
    engine: &mut FileEngine,
    purchase: &PurchaseArgs,
    out: &mut dyn Write,
) -> Result<(), LedgerError> {
    let amount = validate::purchase_amount(purchase.amount)?;
    let vendor = Vendor::new(
        purchase.vendor.as_str(),
        Address::new(
            purchase.street.as_str(),
            purchase.city.as_str(),
            validate::state(&purchase.state)?,
            validate::zip(&purchase.zip)?,
        ),
    );

    match engine.purchase(purchase.card, amount, purchase.category, vendor)? {
        PurchaseOutcome::Recorded(id) => {
            writeln!(out, "Purchase was successful! Transaction id is {}", id)?
        }
        PurchaseOutcome::Declined(reason) => writeln!(out, "Purchase declined: {}", reason)?,
    }
    Ok(())
}
