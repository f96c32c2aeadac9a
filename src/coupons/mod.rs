//! Coupons
//!
//! Coupon definitions and the pipeline that turns a coupon and a cart into a
//! discount: validity, applicability, minimum purchase and then the discount
//! calculation for the coupon's kind.

use decimal_percentage::Percentage;
use jiff::Timestamp;
use rusty_money::{Money, iso::Currency};

use crate::{
    ids::Id,
    products::{CategoryId, ProductId},
};

pub mod applicability;
pub mod apply;
pub mod errors;
pub mod validity;

/// Coupon code, the customer-facing identifier of a coupon
pub type CouponCode = Id<Coupon<'static>>;

/// Lifecycle status set by store administrators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CouponStatus {
    /// Can be redeemed (subject to its window and usage limit)
    Active,

    /// Switched off
    Inactive,

    /// Marked as expired
    Expired,
}

/// Which cart lines a coupon covers.
#[derive(Debug, Clone, PartialEq)]
pub enum Applicability {
    /// Every line in the cart
    All,

    /// Lines whose product is listed under the category
    Category(CategoryId),

    /// Lines for the product
    Product(ProductId),
}

/// How a coupon computes its discount.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CouponKind<'a> {
    /// Percentage off the applicable lines, optionally capped.
    Percentage {
        /// Fraction taken off (0.5 is 50% off)
        percentage: Percentage,

        /// Upper bound on the total discount
        max_discount: Option<Money<'a, Currency>>,
    },

    /// Buy one, get one free, per cart line.
    Bogo,
}

/// Coupon
#[derive(Debug, Clone, PartialEq)]
pub struct Coupon<'a> {
    /// Coupon code
    pub code: CouponCode,

    /// Human readable description
    pub description: Option<String>,

    /// Discount calculation
    pub kind: CouponKind<'a>,

    /// Cart lines the coupon covers
    pub applicability: Applicability,

    /// Lifecycle status
    pub status: CouponStatus,

    /// Start of the validity window
    pub starts_at: Option<Timestamp>,

    /// End of the validity window
    pub ends_at: Option<Timestamp>,

    /// Maximum number of redemptions
    pub usage_limit: Option<u32>,

    /// Redemptions so far
    pub used_count: u32,

    /// Minimum cart subtotal required
    pub min_purchase: Option<Money<'a, Currency>>,
}

impl<'a> Coupon<'a> {
    /// Create an active, unrestricted coupon that applies to the whole cart.
    pub fn new(code: impl Into<CouponCode>, kind: CouponKind<'a>) -> Self {
        Self {
            code: code.into(),
            description: None,
            kind,
            applicability: Applicability::All,
            status: CouponStatus::Active,
            starts_at: None,
            ends_at: None,
            usage_limit: None,
            used_count: 0,
            min_purchase: None,
        }
    }

    /// Create an uncapped percentage-off coupon.
    pub fn percentage_off(code: impl Into<CouponCode>, percentage: Percentage) -> Self {
        Self::new(
            code,
            CouponKind::Percentage {
                percentage,
                max_discount: None,
            },
        )
    }

    /// Create a buy-one-get-one-free coupon.
    pub fn bogo(code: impl Into<CouponCode>) -> Self {
        Self::new(code, CouponKind::Bogo)
    }

    /// Restrict the coupon to some cart lines.
    #[must_use]
    pub fn with_applicability(mut self, applicability: Applicability) -> Self {
        self.applicability = applicability;
        self
    }

    /// Set the lifecycle status.
    #[must_use]
    pub fn with_status(mut self, status: CouponStatus) -> Self {
        self.status = status;
        self
    }

    /// Set the validity window.
    #[must_use]
    pub fn with_window(mut self, starts_at: Option<Timestamp>, ends_at: Option<Timestamp>) -> Self {
        self.starts_at = starts_at;
        self.ends_at = ends_at;
        self
    }

    /// Set the usage limit and the number of redemptions so far.
    #[must_use]
    pub fn with_usage(mut self, usage_limit: Option<u32>, used_count: u32) -> Self {
        self.usage_limit = usage_limit;
        self.used_count = used_count;
        self
    }

    /// Set the minimum cart subtotal.
    #[must_use]
    pub fn with_min_purchase(mut self, min_purchase: Money<'a, Currency>) -> Self {
        self.min_purchase = Some(min_purchase);
        self
    }

    /// Cap the discount of a percentage coupon. No effect on other kinds.
    #[must_use]
    pub fn with_max_discount(mut self, max: Money<'a, Currency>) -> Self {
        if let CouponKind::Percentage { max_discount, .. } = &mut self.kind {
            *max_discount = Some(max);
        }

        self
    }

    /// Every money value carried by the coupon.
    pub(crate) fn amounts(&self) -> impl Iterator<Item = &Money<'a, Currency>> {
        let cap = match &self.kind {
            CouponKind::Percentage { max_discount, .. } => max_discount.as_ref(),
            CouponKind::Bogo => None,
        };

        self.min_purchase.iter().chain(cap)
    }
}
