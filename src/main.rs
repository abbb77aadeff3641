//! Credit Ledger CLI
//!
//! Command-line interface for managing a cardholder's credit cards.
//!
//! # Usage
//!
//! ```bash
//! credit-ledger init --name "Ada Lovelace" --bank "First Bank" --account 12345
//! credit-ledger add-card --issue-year 2024 --issue-month 3 \
//!     --expiration-year 2029 --expiration-month 3 --issuer visa
//! credit-ledger purchase 1 --amount 500 --category groceries --vendor "Fresh Mart" \
//!     --street "1 Main St" --city Reno --state NV --zip 89501
//! credit-ledger pay 1 --amount 505 --method online
//! credit-ledger --data-dir ~/.ledger -vv cards
//! credit-ledger export --card 1 > card-1.csv
//! ```
//!
//! Every command loads the ledger from the data directory (the current
//! directory by default), performs one operation, and persists the result
//! before printing it to stdout. Diagnostics go to stderr.
//!
//! # Exit Codes
//!
//! - 0: Success (a declined purchase is a successful request)
//! - 1: Error (validation failure, unknown card, missing ledger, I/O failure, etc.)

use credit_ledger::cli;
use credit_ledger::logging;
use std::process;

fn main() {
    // Parse command-line arguments using clap
    let args = cli::parse_args();

    logging::init_logging(args.verbose);

    if let Err(e) = cli::run(&args) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
