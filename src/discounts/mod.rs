//! Discounts
//!
//! Discount calculators for each coupon kind. Calculators work on the cart
//! lines a coupon covers and know nothing about validity or minimum purchase.

use decimal_percentage::Percentage;
use rust_decimal::{
    Decimal, RoundingStrategy,
    prelude::{FromPrimitive, ToPrimitive},
};
use rusty_money::{Money, MoneyError, iso::Currency};
use smallvec::SmallVec;
use thiserror::Error;

use crate::items::CartItem;

pub mod bogo;
pub mod percentage;

pub use bogo::bogo_discount;
pub use percentage::percentage_discount;

/// Errors specific to discount calculations.
#[derive(Debug, Error, PartialEq)]
pub enum DiscountError {
    /// Percentage calculation could not be safely converted.
    #[error("percentage conversion overflowed or was not finite")]
    PercentConversion,

    /// Discount total did not fit in minor units.
    #[error("discount total overflowed")]
    Overflow,

    /// Wrapped money arithmetic or currency mismatch error.
    #[error(transparent)]
    Money(#[from] MoneyError),
}

/// A line given away by a BOGO coupon.
#[derive(Debug, Clone, PartialEq)]
pub struct FreeItem<'a> {
    /// Index of the line in the cart
    pub line: usize,

    /// The cart line, carrying the free quantity
    pub item: CartItem<'a>,
}

impl FreeItem<'_> {
    /// Units given away.
    pub fn quantity(&self) -> u32 {
        self.item.quantity()
    }
}

/// Free items granted by a coupon.
pub type FreeItems<'a> = SmallVec<[FreeItem<'a>; 4]>;

/// Result of a discount calculation.
#[derive(Debug, Clone, PartialEq)]
pub struct CouponDiscount<'a> {
    /// Amount taken off, rounded to the currency's minor unit
    pub amount: Money<'a, Currency>,

    /// Lines given away, for BOGO coupons
    pub free_items: FreeItems<'a>,
}

/// Calculate a percentage of an amount in minor units, without rounding.
///
/// # Errors
///
/// Returns [`DiscountError::PercentConversion`] if the result cannot be represented.
pub fn percent_of_minor(percent: &Percentage, minor: i64) -> Result<Decimal, DiscountError> {
    let minor = Decimal::from_i64(minor).ok_or(DiscountError::PercentConversion)?;

    // decimal_percentage doesn't expose the underlying Decimal
    ((*percent) * Decimal::ONE)
        .checked_mul(minor)
        .ok_or(DiscountError::PercentConversion)
}

/// Round a decimal amount of minor units to a whole minor unit.
///
/// # Errors
///
/// Returns [`DiscountError::Overflow`] if the rounded value does not fit in an `i64`.
pub fn round_minor(amount: Decimal) -> Result<i64, DiscountError> {
    amount
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        .ok_or(DiscountError::Overflow)
}

#[cfg(test)]
mod tests {
    use std::convert::TryFrom;

    use decimal_percentage::Percentage;
    use testresult::TestResult;

    use super::*;

    #[test]
    fn percent_of_minor_checked_mul_overflow_returns_error() -> TestResult {
        let percent = Percentage::try_from("100000000000000000000")?;
        let result = percent_of_minor(&percent, i64::MAX);

        assert!(matches!(result, Err(DiscountError::PercentConversion)));

        Ok(())
    }

    #[test]
    fn percent_of_minor_keeps_fractions() -> TestResult {
        let percent = Percentage::from(Decimal::new(15, 2));
        let result = percent_of_minor(&percent, 333)?;

        assert_eq!(result, Decimal::new(4995, 2));

        Ok(())
    }

    #[test]
    fn round_minor_rounds_half_away_from_zero() -> TestResult {
        assert_eq!(round_minor(Decimal::new(4950, 2))?, 50);
        assert_eq!(round_minor(Decimal::new(4949, 2))?, 49);

        Ok(())
    }

    #[test]
    fn round_minor_overflow_returns_error() {
        let result = round_minor(Decimal::MAX);

        assert_eq!(result, Err(DiscountError::Overflow));
    }
}
