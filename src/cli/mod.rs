use std::{io, process::ExitCode};

use clap::{Args, Parser, Subcommand, ValueEnum};
use jiff::Timestamp;
use rebate::{
    coupons::errors::CouponError,
    fixtures::{Fixture, FixtureError},
    receipt::ReceiptError,
};
use thiserror::Error;

use crate::config::{FixturesConfig, LoggingConfig};

mod apply;
mod coupons;
mod validate;

/// Exit code for a coupon that was rejected.
const REJECTED: u8 = 1;

/// Exit code for a command that could not run.
pub(crate) const FAILED: u8 = 2;

/// Errors raised while running a command.
#[derive(Debug, Error)]
pub(crate) enum CliError {
    /// Fixture loading failed.
    #[error(transparent)]
    Fixture(#[from] FixtureError),

    /// Receipt could not be built or printed.
    #[error(transparent)]
    Receipt(#[from] ReceiptError),

    /// JSON output failed.
    #[error("failed to write JSON output: {0}")]
    Json(#[from] serde_json::Error),

    /// Writing to stdout failed.
    #[error("failed to write output: {0}")]
    Io(#[from] io::Error),
}

#[derive(Debug, Parser)]
#[command(name = "rebate", about = "Storefront coupon engine", long_about = None)]
pub(crate) struct Cli {
    /// Logging output settings.
    #[command(flatten)]
    pub(crate) logging: LoggingConfig,

    /// Fixture settings.
    #[command(flatten)]
    fixtures: FixturesConfig,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Apply a coupon to a cart and print the receipt
    Apply(apply::ApplyArgs),

    /// Check whether a coupon is currently valid
    Validate(validate::ValidateArgs),

    /// List the coupons of a fixture set
    Coupons(coupons::CouponsArgs),
}

/// Fixture set selection shared by every command.
#[derive(Debug, Args)]
pub(crate) struct SetArgs {
    /// Fixture set name
    #[arg(long = "set", default_value = "storefront")]
    name: String,

    /// Evaluate at this instant (RFC 3339) instead of now
    #[arg(long)]
    at: Option<Timestamp>,
}

impl SetArgs {
    /// Products and coupons of the set, without a cart.
    fn catalog(&self, fixtures: &FixturesConfig) -> Result<Fixture<'static>, CliError> {
        Ok(Fixture::catalog_in(&fixtures.base_path, &self.name)?)
    }

    /// The whole set, with the named cart or the cart of the set's name.
    fn with_cart(
        &self,
        fixtures: &FixturesConfig,
        cart: Option<&str>,
    ) -> Result<Fixture<'static>, CliError> {
        Ok(Fixture::from_set_in(
            &fixtures.base_path,
            &self.name,
            cart.unwrap_or(&self.name),
        )?)
    }

    fn now(&self) -> Timestamp {
        self.at.unwrap_or_else(Timestamp::now)
    }
}

/// Output format.
#[derive(Clone, Copy, Debug, Default, ValueEnum)]
pub(crate) enum OutputFormat {
    /// Human-readable tables.
    #[default]
    Table,

    /// JSON documents.
    Json,
}

impl Cli {
    /// Load configuration from `.env`, the environment and CLI arguments.
    pub(crate) fn load() -> Result<Self, clap::Error> {
        // Load .env file if present (ignore if missing)
        _ = dotenvy::dotenv();

        Self::try_parse()
    }

    pub(crate) fn run(self) -> Result<ExitCode, CliError> {
        match self.command {
            Commands::Apply(args) => apply::run(&args, &self.fixtures),
            Commands::Validate(args) => validate::run(&args, &self.fixtures),
            Commands::Coupons(args) => coupons::run(&args, &self.fixtures),
        }
    }
}

/// Exit status of a coupon check. Rejections and calculation failures differ.
fn status<T>(result: &Result<T, CouponError>) -> u8 {
    match result {
        Ok(_) => 0,
        Err(error) if error.is_rejection() => REJECTED,
        Err(_) => FAILED,
    }
}
