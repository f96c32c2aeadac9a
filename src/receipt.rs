//! Receipt

use std::io;

use decimal_percentage::Percentage;
use rust_decimal::Decimal;
use rustc_hash::FxHashMap;
use rusty_money::{Money, MoneyError, iso::Currency};
use tabled::{
    builder::Builder,
    grid::config::HorizontalLine,
    settings::{
        Alignment, Color, Style, Theme,
        object::{Columns, Rows, Segment},
        style::BorderColor,
    },
};
use thiserror::Error;

use crate::{
    cart::Cart,
    coupons::{CouponCode, apply::AppliedCoupon},
    items::CartItem,
    pricing::{TotalPriceError, line_total},
    products::ProductVariant,
};

/// Errors that can occur when building a receipt.
#[derive(Debug, Error)]
pub enum ReceiptError {
    /// Error calculating line or cart totals.
    #[error(transparent)]
    TotalPrice(#[from] TotalPriceError),

    /// Wrapper for money errors.
    #[error(transparent)]
    Money(#[from] MoneyError),

    /// IO error
    #[error("IO error")]
    IO,
}

/// Checkout summary for a cart, with or without a coupon.
#[derive(Debug, Clone)]
pub struct Receipt<'a> {
    /// Code of the applied coupon, if any
    coupon_code: Option<CouponCode>,

    /// Free units keyed by cart line index
    free_quantities: FxHashMap<usize, u32>,

    /// Cart subtotal before the coupon
    subtotal: Money<'a, Currency>,

    /// Amount taken off by the coupon
    discount: Money<'a, Currency>,

    /// Amount to pay
    total: Money<'a, Currency>,

    currency: &'static Currency,
}

impl<'a> Receipt<'a> {
    /// Build a receipt for the cart and the coupon applied to it.
    ///
    /// The total is the subtotal less the discount and never drops below zero.
    ///
    /// # Errors
    ///
    /// Returns an error if the subtotal overflows or the discount is in another currency.
    pub fn new(cart: &Cart<'a>, applied: Option<&AppliedCoupon<'a>>) -> Result<Self, ReceiptError> {
        let currency = cart.currency();
        let subtotal = cart.subtotal()?;
        let zero = Money::from_minor(0, currency);

        let discount = applied.map_or(zero, |applied| applied.discount);
        let remaining = subtotal.sub(discount)?;

        let total = if remaining.to_minor_units() < 0 {
            zero
        } else {
            remaining
        };

        let free_quantities: FxHashMap<usize, u32> = applied
            .map(|applied| {
                applied
                    .free_items
                    .iter()
                    .map(|free| (free.line, free.quantity()))
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self {
            coupon_code: applied.map(|applied| applied.coupon.code.clone()),
            free_quantities,
            subtotal,
            discount,
            total,
            currency,
        })
    }

    /// Cart subtotal before the coupon
    #[must_use]
    pub fn subtotal(&self) -> Money<'a, Currency> {
        self.subtotal
    }

    /// Amount taken off by the coupon
    #[must_use]
    pub fn discount(&self) -> Money<'a, Currency> {
        self.discount
    }

    /// Amount to pay
    #[must_use]
    pub fn total(&self) -> Money<'a, Currency> {
        self.total
    }

    /// Code of the applied coupon
    #[must_use]
    pub fn coupon_code(&self) -> Option<&CouponCode> {
        self.coupon_code.as_ref()
    }

    /// Free units given away on a cart line
    #[must_use]
    pub fn free_quantity(&self, line: usize) -> u32 {
        self.free_quantities.get(&line).copied().unwrap_or(0)
    }

    /// Currency of every amount on the receipt
    #[must_use]
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }

    /// Calculate the savings made by the coupon.
    ///
    /// Differs from the discount only when the discount exceeds the subtotal.
    ///
    /// # Errors
    ///
    /// Returns a [`MoneyError`] if the subtraction operation fails.
    pub fn savings(&self) -> Result<Money<'a, Currency>, MoneyError> {
        self.subtotal.sub(self.total)
    }

    /// Savings as a share of the subtotal.
    ///
    /// # Errors
    ///
    /// Returns a [`MoneyError`] if the subtraction operation fails.
    pub fn savings_percent(&self) -> Result<Percentage, MoneyError> {
        let savings = Decimal::from(self.savings()?.to_minor_units());
        let subtotal = Decimal::from(self.subtotal.to_minor_units());

        Ok(Percentage::from(
            savings.checked_div(subtotal).unwrap_or(Decimal::ZERO),
        ))
    }

    /// Writes the receipt: one table row per cart line, then the totals.
    ///
    /// # Errors
    ///
    /// Returns an error if a line total cannot be computed or writing fails.
    pub fn write_to(&self, mut out: impl io::Write, cart: &Cart<'_>) -> Result<(), ReceiptError> {
        let mut builder = Builder::default();

        builder.push_record([
            "",
            "Item",
            "Variant",
            "Qty",
            "Unit Price",
            "Line Total",
            "Free",
        ]);

        for (idx, item) in cart.iter().enumerate() {
            builder.push_record(self.item_row(idx, item)?);
        }

        let mut table = builder.build();
        let mut theme = Theme::from(Style::modern_rounded());

        theme.remove_horizontal_lines();
        theme.insert_horizontal_line(
            1,
            HorizontalLine::new(Some('─'), Some('┼'), Some('├'), Some('┤')),
        );

        table
            .with(theme)
            .modify(Segment::all(), BorderColor::filled(Color::FG_BRIGHT_BLACK))
            .modify(Rows::first(), Color::BOLD)
            .modify(Columns::new(3..), Alignment::right());

        // Row 0 is the header, so cart line `idx` is row `idx + 1`.
        for idx in (0..cart.len()).filter(|&idx| self.free_quantity(idx) > 0) {
            table.modify((idx + 1, 6), Color::FG_GREEN);
        }

        writeln!(out, "\n{table}").map_err(|_err| ReceiptError::IO)?;

        self.write_totals(&mut out)
    }

    fn item_row(&self, idx: usize, item: &CartItem<'_>) -> Result<[String; 7], ReceiptError> {
        let free = self.free_quantity(idx);
        let unit_price = item
            .unit_price()
            .map_or_else(|| "-".to_string(), |price| price.to_string());

        Ok([
            format!("#{:<3}", idx + 1),
            item.product().name.clone(),
            item.variant().map(ProductVariant::label).unwrap_or_default(),
            item.quantity().to_string(),
            unit_price,
            line_total(item, self.currency)?.to_string(),
            if free > 0 {
                free.to_string()
            } else {
                String::new()
            },
        ])
    }

    /// Writes the totals under the table, labels and amounts right-aligned.
    fn write_totals(&self, out: &mut impl io::Write) -> Result<(), ReceiptError> {
        let coupon = self
            .coupon_code
            .as_ref()
            .map_or_else(|| "Coupon:".to_string(), |code| format!("Coupon {code}:"));
        let savings = format!(
            "({:.2}%) {}",
            percent_points(self.savings_percent()?),
            self.savings()?
        );

        // (label, amount, bold)
        let lines = [
            ("Subtotal:".to_string(), self.subtotal.to_string(), false),
            (coupon, format!("-{}", self.discount), false),
            ("Total:".to_string(), self.total.to_string(), true),
            ("Savings:".to_string(), savings, false),
        ];

        let label_width = lines
            .iter()
            .map(|(label, ..)| label.chars().count())
            .max()
            .unwrap_or_default();
        let amount_width = lines
            .iter()
            .map(|(_, amount, _)| amount.chars().count())
            .max()
            .unwrap_or_default();

        for (label, amount, bold) in &lines {
            let line = format!(" {label:>label_width$}  {amount:>amount_width$}  ");

            let written = if *bold {
                writeln!(out, "\x1b[1m{line}\x1b[22m")
            } else {
                writeln!(out, "{line}")
            };

            written.map_err(|_err| ReceiptError::IO)?;
        }

        writeln!(out).map_err(|_err| ReceiptError::IO)
    }
}

/// Converts a fractional percentage to percent points for display.
fn percent_points(percentage: Percentage) -> Decimal {
    ((percentage * Decimal::ONE) * Decimal::ONE_HUNDRED).round_dp(2)
}

#[cfg(test)]
mod tests {
    use decimal_percentage::Percentage;
    use jiff::Timestamp;
    use rusty_money::iso::{INR, USD};
    use testresult::TestResult;

    use crate::{
        coupons::{Coupon, apply::apply_coupon},
        items::CartItem,
        products::Product,
    };

    use super::*;

    fn cart<'a>(price: i64, quantity: u32) -> Result<Cart<'a>, crate::cart::CartError> {
        Cart::with_items(
            [CartItem::new(
                Product::new("tee", "Tee", Money::from_minor(price, INR)),
                quantity,
            )],
            INR,
        )
    }

    fn now() -> Result<Timestamp, jiff::Error> {
        "2026-03-15T12:00:00Z".parse()
    }

    #[test]
    fn receipt_without_coupon_charges_subtotal() -> TestResult {
        let cart = cart(100_00, 2)?;
        let receipt = Receipt::new(&cart, None)?;

        assert_eq!(receipt.subtotal(), Money::from_minor(200_00, INR));
        assert_eq!(receipt.discount(), Money::from_minor(0, INR));
        assert_eq!(receipt.total(), Money::from_minor(200_00, INR));
        assert_eq!(receipt.coupon_code(), None);
        assert_eq!(receipt.savings_percent()?, Percentage::from(Decimal::ZERO));

        Ok(())
    }

    #[test]
    fn receipt_takes_discount_off_total() -> TestResult {
        let cart = cart(100_00, 2)?;
        let coupon = Coupon::percentage_off("HALF", Percentage::from(Decimal::new(50, 2)));
        let applied = apply_coupon(&coupon, &cart, now()?)?;

        let receipt = Receipt::new(&cart, Some(&applied))?;

        assert_eq!(receipt.total(), Money::from_minor(100_00, INR));
        assert_eq!(receipt.savings()?, Money::from_minor(100_00, INR));
        assert_eq!(
            receipt.savings_percent()?,
            Percentage::from(Decimal::new(5, 1))
        );
        assert_eq!(receipt.coupon_code().map(CouponCode::as_str), Some("HALF"));

        Ok(())
    }

    #[test]
    fn receipt_records_free_quantities() -> TestResult {
        let cart = cart(300_00, 3)?;
        let applied = apply_coupon(&Coupon::bogo("BOGO"), &cart, now()?)?;

        let receipt = Receipt::new(&cart, Some(&applied))?;

        assert_eq!(receipt.free_quantity(0), 1);
        assert_eq!(receipt.free_quantity(1), 0);
        assert_eq!(receipt.total(), Money::from_minor(600_00, INR));

        Ok(())
    }

    #[test]
    fn total_never_drops_below_zero() -> TestResult {
        let cart = cart(10_00, 1)?;
        let mut applied = apply_coupon(&Coupon::bogo("BOGO"), &self::cart(10_00, 2)?, now()?)?;
        applied.discount = Money::from_minor(50_00, INR);

        let receipt = Receipt::new(&cart, Some(&applied))?;

        assert_eq!(receipt.total(), Money::from_minor(0, INR));
        assert_eq!(receipt.savings()?, Money::from_minor(10_00, INR));

        Ok(())
    }

    #[test]
    fn discount_in_another_currency_fails() -> TestResult {
        let cart = cart(10_00, 2)?;
        let mut applied = apply_coupon(&Coupon::bogo("BOGO"), &cart, now()?)?;
        applied.discount = Money::from_minor(10_00, USD);

        assert!(matches!(
            Receipt::new(&cart, Some(&applied)),
            Err(ReceiptError::Money(_))
        ));

        Ok(())
    }

    #[test]
    fn write_to_renders_lines_and_summary() -> TestResult {
        let cart = cart(300_00, 3)?;
        let applied = apply_coupon(&Coupon::bogo("BOGO"), &cart, now()?)?;
        let receipt = Receipt::new(&cart, Some(&applied))?;

        let mut out = Vec::new();
        receipt.write_to(&mut out, &cart)?;

        let rendered = String::from_utf8(out)?;

        assert!(rendered.contains("Tee"));
        assert!(rendered.contains("Coupon BOGO:"));
        assert!(rendered.contains("Subtotal:"));
        assert!(rendered.contains("(33.33%)"));

        Ok(())
    }

    #[test]
    fn totals_share_one_right_edge() -> TestResult {
        let cart = cart(300_00, 3)?;
        let applied = apply_coupon(&Coupon::bogo("BOGO"), &cart, now()?)?;
        let receipt = Receipt::new(&cart, Some(&applied))?;

        let mut out = Vec::new();
        receipt.write_to(&mut out, &cart)?;

        let rendered = String::from_utf8(out)?;
        let width = |label: &str| {
            rendered
                .lines()
                .find(|line| line.contains(label))
                .map(|line| line.chars().count())
        };

        assert!(width("Subtotal:").is_some(), "subtotal line missing");
        assert_eq!(width("Subtotal:"), width("Coupon BOGO:"));
        assert_eq!(width("Subtotal:"), width("Savings:"));

        Ok(())
    }
}
