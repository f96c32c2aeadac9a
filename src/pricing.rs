//! Prices

use rusty_money::{Money, MoneyError, iso::Currency};
use thiserror::Error;

use crate::items::CartItem;

/// Errors that can occur while calculating totals.
#[derive(Debug, Error, PartialEq)]
pub enum TotalPriceError {
    /// A line total did not fit in minor units.
    #[error("line total overflowed")]
    Overflow,

    /// Wrapped money arithmetic or currency mismatch error.
    #[error(transparent)]
    Money(#[from] MoneyError),
}

/// Calculates unit price x quantity for a line, in minor units.
///
/// # Errors
///
/// Returns [`TotalPriceError::Overflow`] if the product does not fit in an `i64`.
pub fn line_total_minor(item: &CartItem<'_>) -> Result<i64, TotalPriceError> {
    item.unit_price_minor()
        .checked_mul(i64::from(item.quantity()))
        .ok_or(TotalPriceError::Overflow)
}

/// Calculates unit price x quantity for a line.
///
/// # Errors
///
/// Returns [`TotalPriceError::Overflow`] if the product does not fit in an `i64`.
pub fn line_total<'a>(
    item: &CartItem<'a>,
    currency: &'a Currency,
) -> Result<Money<'a, Currency>, TotalPriceError> {
    Ok(Money::from_minor(line_total_minor(item)?, currency))
}

/// Calculates the total price of a list of cart lines.
///
/// An empty list totals to zero in the given currency.
///
/// # Errors
///
/// - [`TotalPriceError::Overflow`]: a line total overflowed.
/// - [`TotalPriceError::Money`]: wrapped money arithmetic or currency mismatch error.
pub fn total_price<'i, 'a: 'i>(
    items: impl IntoIterator<Item = &'i CartItem<'a>>,
    currency: &'a Currency,
) -> Result<Money<'a, Currency>, TotalPriceError> {
    items
        .into_iter()
        .try_fold(Money::from_minor(0, currency), |acc, item| {
            Ok(acc.add(line_total(item, currency)?)?)
        })
}
