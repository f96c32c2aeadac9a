use std::{
    io::{self, Write},
    process::ExitCode,
};

use clap::Args;
use rebate::coupons::validity::is_coupon_valid;

use crate::{
    cli::{CliError, SetArgs, status},
    config::FixturesConfig,
};

#[derive(Debug, Args)]
pub(crate) struct ValidateArgs {
    #[command(flatten)]
    set: SetArgs,

    /// Coupon code to check
    #[arg(long)]
    coupon: String,
}

pub(crate) fn run(args: &ValidateArgs, fixtures: &FixturesConfig) -> Result<ExitCode, CliError> {
    let fixture = args.set.catalog(fixtures)?;
    let coupon = fixture.coupon(&args.coupon)?;
    let result = is_coupon_valid(coupon, args.set.now());

    let mut out = io::stdout().lock();

    match &result {
        Ok(()) => writeln!(out, "{}: valid", coupon.code)?,
        Err(error) => writeln!(out, "{}: {error}", coupon.code)?,
    }

    Ok(ExitCode::from(status(&result)))
}
