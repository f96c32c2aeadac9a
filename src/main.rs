//! Rebate command line
//!
//! Applies fixture coupons to fixture carts and prints the result.

use std::process::ExitCode;

use tracing::error;

use crate::cli::{Cli, FAILED};

mod cli;
mod config;
mod observability;

fn main() -> ExitCode {
    let cli = match Cli::load() {
        Ok(cli) => cli,
        Err(error) => error.exit(),
    };

    if let Err(error) = observability::init(&cli.logging) {
        #[expect(
            clippy::print_stderr,
            reason = "logging not initialized yet, must use eprintln for setup errors"
        )]
        {
            eprintln!("Logging error: {error}");
        }

        return ExitCode::from(FAILED);
    }

    match cli.run() {
        Ok(code) => code,
        Err(error) => {
            error!(%error, "command failed");

            ExitCode::from(FAILED)
        }
    }
}
