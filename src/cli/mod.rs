// CLI module
// Command-line interface, request validation and command execution

mod args;
mod commands;
pub mod validate;

pub use args::{AddCardArgs, CliArgs, Command, LedgerCommand, PurchaseArgs};
pub use commands::{execute, run};

use clap::Parser;

/// Parse command-line arguments using clap
///
/// If parsing fails (unknown subcommand, malformed amount, missing option,
/// or `--help`), clap prints the error or help text and exits the process.
pub fn parse_args() -> CliArgs {
    CliArgs::parse()
}
