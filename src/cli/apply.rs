use std::{
    io::{self, Write},
    process::ExitCode,
};

use clap::Args;
use rebate::{
    cart::Cart,
    coupons::apply::{CouponOutcome, apply_coupon},
    receipt::Receipt,
};
use rusty_money::{Money, iso::Currency};
use serde::Serialize;
use tracing::{info, warn};

use crate::{
    cli::{CliError, OutputFormat, SetArgs, status},
    config::FixturesConfig,
};

#[derive(Debug, Args)]
pub(crate) struct ApplyArgs {
    #[command(flatten)]
    set: SetArgs,

    /// Cart fixture name; defaults to the set name
    #[arg(long)]
    cart: Option<String>,

    /// Coupon code to apply
    #[arg(long)]
    coupon: String,

    /// Output format
    #[arg(long, value_enum, default_value_t)]
    format: OutputFormat,
}

/// JSON view of an applied (or rejected) coupon.
#[derive(Debug, Serialize)]
struct ApplyReport {
    success: bool,
    message: String,
    coupon: String,
    currency: &'static str,
    subtotal: String,
    discount: String,
    total: String,
    free_items: Vec<FreeItemReport>,
}

#[derive(Debug, Serialize)]
struct FreeItemReport {
    line: usize,
    product: String,
    variant: Option<String>,
    quantity: u32,
}

pub(crate) fn run(args: &ApplyArgs, fixtures: &FixturesConfig) -> Result<ExitCode, CliError> {
    let fixture = args.set.with_cart(fixtures, args.cart.as_deref())?;
    let cart = fixture.cart()?;
    let coupon = fixture.coupon(&args.coupon)?;
    let now = args.set.now();

    info!(code = %coupon.code, lines = cart.len(), %now, "applying coupon");

    let result = apply_coupon(coupon, &cart, now);
    let code = status(&result);

    if let Err(error) = &result
        && !error.is_rejection()
    {
        warn!(code = %coupon.code, %error, "coupon calculation failed");
    }

    let outcome = CouponOutcome::from(result);
    let receipt = Receipt::new(&cart, outcome.applied.as_ref())?;

    let mut out = io::stdout().lock();

    match args.format {
        OutputFormat::Table => {
            receipt.write_to(&mut out, &cart)?;
            writeln!(out, "{}", outcome.message)?;
        }
        OutputFormat::Json => {
            let report = report(&args.coupon, &outcome, &receipt, &cart);

            serde_json::to_writer_pretty(&mut out, &report)?;
            writeln!(out)?;
        }
    }

    Ok(ExitCode::from(code))
}

fn report(
    code: &str,
    outcome: &CouponOutcome<'_>,
    receipt: &Receipt<'_>,
    cart: &Cart<'_>,
) -> ApplyReport {
    let free_items = outcome
        .applied
        .iter()
        .flat_map(|applied| applied.free_items.iter())
        .map(|free| FreeItemReport {
            line: free.line,
            product: free.item.product_id().to_string(),
            variant: free.item.variant_id().map(ToString::to_string),
            quantity: free.quantity(),
        })
        .collect();

    ApplyReport {
        success: outcome.success,
        message: outcome.message.clone(),
        coupon: code.to_string(),
        currency: cart.currency().iso_alpha_code,
        subtotal: amount(&receipt.subtotal()),
        discount: amount(&receipt.discount()),
        total: amount(&receipt.total()),
        free_items,
    }
}

/// Plain decimal amount, without the currency symbol.
fn amount(money: &Money<'_, Currency>) -> String {
    money.amount().to_string()
}
