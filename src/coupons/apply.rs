//! Applying Coupons

use jiff::Timestamp;
use rusty_money::{Money, iso::Currency};
use tracing::debug;

use crate::{
    cart::Cart,
    coupons::{
        Coupon, CouponKind, applicability::applicable_items, errors::CouponError,
        validity::is_coupon_valid,
    },
    discounts::{CouponDiscount, FreeItems, bogo_discount, percentage_discount},
};

/// Message shown when a coupon is applied.
pub const APPLIED_MESSAGE: &str = "Coupon applied successfully!";

/// A coupon applied to a cart.
#[derive(Debug, Clone, PartialEq)]
pub struct AppliedCoupon<'a> {
    /// The coupon that was applied
    pub coupon: Coupon<'a>,

    /// Amount taken off the cart, rounded to the minor unit
    pub discount: Money<'a, Currency>,

    /// Lines given away, for BOGO coupons
    pub free_items: FreeItems<'a>,
}

impl<'a> AppliedCoupon<'a> {
    fn new(coupon: &Coupon<'a>, discount: CouponDiscount<'a>) -> Self {
        Self {
            coupon: coupon.clone(),
            discount: discount.amount,
            free_items: discount.free_items,
        }
    }
}

/// Apply a coupon to a cart at `now`.
///
/// Runs validity, applicability and the minimum purchase check, then the
/// discount calculation for the coupon's kind. Stops at the first failure.
/// Nothing is mutated: the coupon's usage counter is left for the order
/// placement to increment.
///
/// # Errors
///
/// Returns a [`CouponError`]; see [`CouponError::is_rejection`] for telling
/// shopper-facing rejections from calculation failures.
pub fn apply_coupon<'a>(
    coupon: &Coupon<'a>,
    cart: &Cart<'a>,
    now: Timestamp,
) -> Result<AppliedCoupon<'a>, CouponError> {
    let result = try_apply(coupon, cart, now);

    match &result {
        Ok(applied) => debug!(
            code = %coupon.code,
            discount = %applied.discount,
            free_items = applied.free_items.len(),
            "coupon applied"
        ),
        Err(error) => debug!(code = %coupon.code, %error, "coupon rejected"),
    }

    result
}

fn try_apply<'a>(
    coupon: &Coupon<'a>,
    cart: &Cart<'a>,
    now: Timestamp,
) -> Result<AppliedCoupon<'a>, CouponError> {
    is_coupon_valid(coupon, now)?;

    let lines = applicable_items(coupon, cart.items());

    if lines.is_empty() {
        return Err(CouponError::NotApplicable);
    }

    let currency = cart.currency();

    ensure_currency(coupon, currency)?;

    if let Some(min_purchase) = &coupon.min_purchase {
        let subtotal = cart.subtotal()?;

        if subtotal.to_minor_units() < min_purchase.to_minor_units() {
            return Err(CouponError::BelowMinimumPurchase {
                minimum_minor: min_purchase.to_minor_units(),
                currency,
            });
        }
    }

    let discount = match &coupon.kind {
        CouponKind::Percentage {
            percentage,
            max_discount,
        } => percentage_discount(percentage, max_discount.as_ref(), &lines, currency)?,
        CouponKind::Bogo => bogo_discount(&lines, currency)?,
    };

    Ok(AppliedCoupon::new(coupon, discount))
}

fn ensure_currency(coupon: &Coupon<'_>, currency: &'static Currency) -> Result<(), CouponError> {
    match coupon
        .amounts()
        .find(|amount| amount.currency() != currency)
    {
        Some(amount) => Err(CouponError::CurrencyMismatch(
            amount.currency().iso_alpha_code,
            currency.iso_alpha_code,
        )),
        None => Ok(()),
    }
}

/// Outcome of applying a coupon, in the shape shown to shoppers.
#[derive(Debug, Clone, PartialEq)]
pub struct CouponOutcome<'a> {
    /// Whether the coupon was applied
    pub success: bool,

    /// Message to show
    pub message: String,

    /// The applied coupon, on success
    pub applied: Option<AppliedCoupon<'a>>,
}

impl<'a> From<Result<AppliedCoupon<'a>, CouponError>> for CouponOutcome<'a> {
    fn from(result: Result<AppliedCoupon<'a>, CouponError>) -> Self {
        match result {
            Ok(applied) => Self {
                success: true,
                message: APPLIED_MESSAGE.to_string(),
                applied: Some(applied),
            },
            Err(error) => Self {
                success: false,
                message: error.to_string(),
                applied: None,
            },
        }
    }
}
