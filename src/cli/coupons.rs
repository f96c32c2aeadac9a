use std::{
    io::{self, Write},
    process::ExitCode,
};

use clap::Args;
use rebate::coupons::{Applicability, Coupon, CouponKind, CouponStatus, validity::is_coupon_valid};
use rust_decimal::Decimal;
use tabled::{
    builder::Builder,
    settings::{Color, Style, object::Rows},
};

use crate::{
    cli::{CliError, SetArgs},
    config::FixturesConfig,
};

#[derive(Debug, Args)]
pub(crate) struct CouponsArgs {
    #[command(flatten)]
    set: SetArgs,
}

pub(crate) fn run(args: &CouponsArgs, fixtures: &FixturesConfig) -> Result<ExitCode, CliError> {
    let fixture = args.set.catalog(fixtures)?;
    let now = args.set.now();

    let mut builder = Builder::default();

    builder.push_record([
        "Code",
        "Discount",
        "Applies To",
        "Status",
        "Usage",
        "Min Purchase",
        "Validity",
    ]);

    for coupon in fixture.coupons() {
        let validity = match is_coupon_valid(coupon, now) {
            Ok(()) => "valid".to_string(),
            Err(error) => error.to_string(),
        };

        builder.push_record([
            coupon.code.to_string(),
            discount_cell(coupon),
            scope_cell(&coupon.applicability),
            status_cell(coupon.status).to_string(),
            usage_cell(coupon),
            coupon
                .min_purchase
                .map_or_else(String::new, |min| min.to_string()),
            validity,
        ]);
    }

    let mut table = builder.build();

    table.with(Style::modern_rounded());
    table.modify(Rows::first(), Color::BOLD);

    writeln!(io::stdout().lock(), "{table}")?;

    Ok(ExitCode::SUCCESS)
}

fn discount_cell(coupon: &Coupon<'_>) -> String {
    match &coupon.kind {
        CouponKind::Percentage {
            percentage,
            max_discount,
        } => {
            let points = ((*percentage) * Decimal::ONE_HUNDRED).normalize();

            match max_discount {
                Some(max) => format!("{points}% off, up to {max}"),
                None => format!("{points}% off"),
            }
        }
        CouponKind::Bogo => "Buy one, get one free".to_string(),
    }
}

fn scope_cell(applicability: &Applicability) -> String {
    match applicability {
        Applicability::All => "everything".to_string(),
        Applicability::Category(category_id) => format!("category {category_id}"),
        Applicability::Product(product_id) => format!("product {product_id}"),
    }
}

fn status_cell(status: CouponStatus) -> &'static str {
    match status {
        CouponStatus::Active => "active",
        CouponStatus::Inactive => "inactive",
        CouponStatus::Expired => "expired",
    }
}

fn usage_cell(coupon: &Coupon<'_>) -> String {
    match coupon.usage_limit {
        Some(limit) => format!("{}/{limit}", coupon.used_count),
        None => coupon.used_count.to_string(),
    }
}
