//! Coupon Fixtures

use decimal_percentage::Percentage;
use jiff::Timestamp;
use rust_decimal::{Decimal, prelude::FromPrimitive};
use rustc_hash::FxHashMap;
use serde::Deserialize;

use crate::{
    coupons::{Applicability, Coupon, CouponKind, CouponStatus},
    fixtures::{FixtureError, products::parse_money},
};

/// Wrapper for coupons in YAML
#[derive(Debug, Deserialize)]
pub struct CouponsFixture {
    /// Map of coupon code -> coupon fixture
    pub coupons: FxHashMap<String, CouponFixture>,
}

/// Coupon fixture from YAML
#[derive(Debug, Deserialize)]
pub struct CouponFixture {
    /// Human readable description
    #[serde(default)]
    pub description: Option<String>,

    /// Discount configuration
    pub discount: CouponDiscountFixture,

    /// Which lines the coupon covers
    #[serde(default)]
    pub applies_to: ScopeFixture,

    /// Category id, for category coupons
    #[serde(default)]
    pub category: Option<String>,

    /// Product key, for product coupons
    #[serde(default)]
    pub product: Option<String>,

    /// Lifecycle status
    #[serde(default)]
    pub status: StatusFixture,

    /// Start of the validity window (RFC 3339)
    #[serde(default)]
    pub starts_at: Option<Timestamp>,

    /// End of the validity window (RFC 3339)
    #[serde(default)]
    pub ends_at: Option<Timestamp>,

    /// Maximum number of redemptions
    #[serde(default)]
    pub usage_limit: Option<u32>,

    /// Redemptions so far
    #[serde(default)]
    pub used_count: u32,

    /// Minimum cart subtotal (e.g., "500.00 INR")
    #[serde(default)]
    pub min_purchase: Option<String>,
}

/// Coupon discount configuration from YAML fixtures
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CouponDiscountFixture {
    /// Percentage off the covered lines
    Percentage {
        /// Percent points off (e.g., 15 for 15%)
        value: f64,

        /// Upper bound on the discount (e.g., "500.00 INR")
        #[serde(default)]
        max_discount: Option<String>,
    },

    /// Buy one, get one free
    Bogo,
}

/// Coupon scope from YAML fixtures
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScopeFixture {
    /// Whole cart
    #[default]
    All,

    /// Lines in the `category`
    Category,

    /// Lines for the `product`
    Product,
}

/// Coupon status from YAML fixtures
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusFixture {
    /// Active
    #[default]
    Active,

    /// Inactive
    Inactive,

    /// Expired
    Expired,
}

impl From<StatusFixture> for CouponStatus {
    fn from(status: StatusFixture) -> Self {
        match status {
            StatusFixture::Active => CouponStatus::Active,
            StatusFixture::Inactive => CouponStatus::Inactive,
            StatusFixture::Expired => CouponStatus::Expired,
        }
    }
}

impl TryFrom<&CouponDiscountFixture> for CouponKind<'static> {
    type Error = FixtureError;

    fn try_from(config: &CouponDiscountFixture) -> Result<Self, Self::Error> {
        match config {
            CouponDiscountFixture::Percentage {
                value,
                max_discount,
            } => Ok(CouponKind::Percentage {
                percentage: parse_percent_points(*value)?,
                max_discount: parse_money(max_discount.as_deref())?,
            }),
            CouponDiscountFixture::Bogo => Ok(CouponKind::Bogo),
        }
    }
}

impl CouponFixture {
    /// Every price string set on the coupon.
    pub fn price_strs(&self) -> impl Iterator<Item = &str> {
        let cap = match &self.discount {
            CouponDiscountFixture::Percentage { max_discount, .. } => max_discount.as_deref(),
            CouponDiscountFixture::Bogo => None,
        };

        self.min_purchase.as_deref().into_iter().chain(cap)
    }

    /// Convert to a coupon with the given code.
    ///
    /// # Errors
    ///
    /// Returns an error if the discount or a price is invalid, or if a
    /// scoped coupon has no id for its scope.
    pub fn try_into_coupon(&self, code: &str) -> Result<Coupon<'static>, FixtureError> {
        let applicability = match self.applies_to {
            ScopeFixture::All => Applicability::All,
            ScopeFixture::Category => Applicability::Category(
                self.category
                    .as_deref()
                    .ok_or_else(|| FixtureError::MissingScopeId(code.to_string(), "category"))?
                    .into(),
            ),
            ScopeFixture::Product => Applicability::Product(
                self.product
                    .as_deref()
                    .ok_or_else(|| FixtureError::MissingScopeId(code.to_string(), "product"))?
                    .into(),
            ),
        };

        Ok(Coupon {
            code: code.into(),
            description: self.description.clone(),
            kind: CouponKind::try_from(&self.discount)?,
            applicability,
            status: self.status.into(),
            starts_at: self.starts_at,
            ends_at: self.ends_at,
            usage_limit: self.usage_limit,
            used_count: self.used_count,
            min_purchase: parse_money(self.min_purchase.as_deref())?,
        })
    }
}

/// Convert percent points (0 to 100) into a fractional percentage.
///
/// # Errors
///
/// Returns an error if the value is not finite or outside 0..=100.
pub fn parse_percent_points(points: f64) -> Result<Percentage, FixtureError> {
    let value = Decimal::from_f64(points)
        .filter(|value| (Decimal::ZERO..=Decimal::ONE_HUNDRED).contains(value))
        .ok_or_else(|| FixtureError::InvalidPercentage(points.to_string()))?;

    Ok(Percentage::from(value / Decimal::ONE_HUNDRED))
}
