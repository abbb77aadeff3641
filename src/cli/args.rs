use crate::types::{CardId, CardIssuer, PaymentMethod, PurchaseCategory};
use clap::{ArgAction, Args, Parser, Subcommand};
use rust_decimal::Decimal;
use std::path::PathBuf;

/// Track credit cards, purchases and payments for a single cardholder
#[derive(Parser, Debug)]
#[command(name = "credit-ledger")]
#[command(
    about = "Track credit cards, purchases and payments for a single cardholder",
    long_about = None
)]
pub struct CliArgs {
    /// Directory holding the id counters and the user snapshot
    #[arg(
        long = "data-dir",
        value_name = "DIR",
        default_value = ".",
        global = true,
        help = "Directory holding the ledger files"
    )]
    pub data_dir: PathBuf,

    /// Diagnostic verbosity on stderr
    #[arg(
        short = 'v',
        long = "verbose",
        action = ArgAction::Count,
        global = true,
        help = "Increase log verbosity (-v info, -vv debug, -vvv trace)"
    )]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Create the cardholder on first run
    Init {
        #[arg(long)]
        name: String,
        #[arg(long)]
        bank: String,
        #[arg(long)]
        account: String,
    },
    #[command(flatten)]
    Ledger(LedgerCommand),
}

/// Commands that operate on an existing ledger
#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum LedgerCommand {
    /// Add a new credit card
    AddCard(AddCardArgs),
    /// Remove a credit card and its history
    RemoveCard { card: CardId },
    /// List all cards
    Cards,
    /// Show a card's current balance
    Balance { card: CardId },
    /// Show a card's available credit
    AvailableCredit { card: CardId },
    /// Make a purchase on a card
    Purchase(PurchaseArgs),
    /// Pay toward a card's balance from the bank account
    Pay {
        card: CardId,
        #[arg(long)]
        amount: Decimal,
        #[arg(long, value_name = "check|online")]
        method: PaymentMethod,
    },
    /// Show the most recent purchase on a card
    LastPurchase { card: CardId },
    /// Show a card's transaction log
    Transactions { card: CardId },
    /// Report a card as lost
    MarkLost { card: CardId },
    /// Cancel a card
    MarkCancelled { card: CardId },
    /// Sum of balances across all cards
    TotalBalance,
    /// Sum of available credit across all cards
    TotalAvailable,
    /// Show the largest purchase on any card
    LargestPurchase,
    /// Show the most recent payment on any card
    LastPayment,
    /// Total spent on one purchase category
    TotalSpent { category: PurchaseCategory },
    /// Sum of interest fees charged across all cards
    TotalFees,
    /// Write cards or a card's transactions as CSV to stdout
    Export {
        /// Export this card's transactions instead of the card list
        #[arg(long)]
        card: Option<CardId>,
    },
}

#[derive(Args, Debug, Clone, PartialEq)]
pub struct AddCardArgs {
    #[arg(long = "issue-year")]
    pub issue_year: i32,
    #[arg(long = "issue-month")]
    pub issue_month: u32,
    #[arg(long = "expiration-year")]
    pub expiration_year: i32,
    #[arg(long = "expiration-month")]
    pub expiration_month: u32,
    #[arg(long, value_name = "visa|mastercard|amex")]
    pub issuer: CardIssuer,
}

#[derive(Args, Debug, Clone, PartialEq)]
pub struct PurchaseArgs {
    pub card: CardId,
    #[arg(long)]
    pub amount: Decimal,
    #[arg(long)]
    pub category: PurchaseCategory,
    #[arg(long)]
    pub vendor: String,
    #[arg(long)]
    pub street: String,
    #[arg(long)]
    pub city: String,
    #[arg(long)]
    pub state: String,
    #[arg(long)]
    pub zip: String,
}
