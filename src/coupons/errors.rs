//! Coupon errors.

use rusty_money::{Money, iso::Currency};
use thiserror::Error;

use crate::{discounts::DiscountError, pricing::TotalPriceError};

/// Reasons a coupon could not be applied.
///
/// The first group are rejections meant for the shopper; their `Display`
/// output is the message to show. The rest are calculation failures.
#[derive(Debug, Error, PartialEq)]
pub enum CouponError {
    /// Status is not active.
    #[error("This coupon is not active.")]
    Inactive,

    /// The validity window has not started.
    #[error("This coupon is not yet valid.")]
    NotYetValid,

    /// The validity window has ended.
    #[error("This coupon has expired.")]
    Expired,

    /// Every redemption has been used.
    #[error("This coupon has reached its usage limit.")]
    UsageLimitReached,

    /// No line in the cart is covered by the coupon.
    #[error("This coupon does not apply to any items in your cart.")]
    NotApplicable,

    /// Cart subtotal is under the coupon's minimum purchase.
    #[error(
        "A minimum purchase of {} is required to use this coupon.",
        Money::from_minor(*minimum_minor, *currency)
    )]
    BelowMinimumPurchase {
        /// Minimum subtotal, in minor units
        minimum_minor: i64,

        /// Currency of the minimum
        currency: &'static Currency,
    },

    /// A coupon amount is not in the cart currency (coupon currency, cart currency).
    #[error("Coupon amount is in {0}, but cart is in {1}")]
    CurrencyMismatch(&'static str, &'static str),

    /// Discount calculation failed.
    #[error(transparent)]
    Discount(#[from] DiscountError),

    /// Subtotal calculation failed.
    #[error(transparent)]
    TotalPrice(#[from] TotalPriceError),
}

impl CouponError {
    /// Whether this is a rejection meant for the shopper rather than a calculation failure.
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            Self::Inactive
                | Self::NotYetValid
                | Self::Expired
                | Self::UsageLimitReached
                | Self::NotApplicable
                | Self::BelowMinimumPurchase { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::INR;

    use super::*;

    #[test]
    fn minimum_purchase_message_formats_amount() {
        let error = CouponError::BelowMinimumPurchase {
            minimum_minor: 500_00,
            currency: INR,
        };

        let message = error.to_string();

        assert!(message.starts_with("A minimum purchase of "));
        assert!(message.contains("500"));
    }

    #[test]
    fn rejections_are_distinguished_from_failures() {
        assert!(CouponError::Expired.is_rejection());
        assert!(CouponError::NotApplicable.is_rejection());
        assert!(!CouponError::CurrencyMismatch("USD", "INR").is_rejection());
        assert!(!CouponError::TotalPrice(TotalPriceError::Overflow).is_rejection());
    }
}
