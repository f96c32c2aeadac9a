//! Percentage Discount
//!
//! A percentage off every covered line, optionally capped.

use decimal_percentage::Percentage;
use rust_decimal::Decimal;
use rusty_money::{Money, iso::Currency};
use smallvec::SmallVec;

use crate::{
    coupons::applicability::ApplicableLine,
    discounts::{CouponDiscount, DiscountError, percent_of_minor, round_minor},
    pricing::line_total_minor,
};

/// Calculate a percentage discount over the covered lines.
///
/// The discount is summed unrounded across lines, clamped to `max_discount`
/// when set, and rounded once to the minor unit. It is never negative.
///
/// # Errors
///
/// - [`DiscountError::PercentConversion`]: the percentage calculation overflowed.
/// - [`DiscountError::Overflow`]: a line or the total overflowed.
pub fn percentage_discount<'a>(
    percentage: &Percentage,
    max_discount: Option<&Money<'a, Currency>>,
    lines: &[ApplicableLine<'_, 'a>],
    currency: &'a Currency,
) -> Result<CouponDiscount<'a>, DiscountError> {
    let mut discount = lines.iter().try_fold(Decimal::ZERO, |acc, (_, item)| {
        let line_total = line_total_minor(item).map_err(|_err| DiscountError::Overflow)?;

        acc.checked_add(percent_of_minor(percentage, line_total)?)
            .ok_or(DiscountError::Overflow)
    })?;

    if let Some(max_discount) = max_discount {
        discount = discount.min(Decimal::from(max_discount.to_minor_units()));
    }

    let amount = round_minor(discount.max(Decimal::ZERO))?;

    Ok(CouponDiscount {
        amount: Money::from_minor(amount, currency),
        free_items: SmallVec::new(),
    })
}
