//! Rebate
//!
//! Rebate is a storefront coupon engine: it decides whether a coupon may be
//! used against a cart and works out the discount it grants.
//!
//! Applying a coupon runs a fixed pipeline, stopping at the first failure:
//!
//! 1. [`coupons::validity`]: status, validity window and usage limit.
//! 2. [`coupons::applicability`]: which cart lines the coupon covers.
//! 3. Minimum purchase, against the whole cart subtotal.
//! 4. [`discounts`]: the calculation for the coupon's kind.
//!
//! The engine never reads the clock and never mutates the cart or the coupon.
//! Usage counters move through a [`redemptions::RedemptionLedger`] when an
//! order is placed.

pub mod cart;
pub mod coupons;
pub mod discounts;
pub mod fixtures;
pub mod ids;
pub mod items;
pub mod prelude;
pub mod pricing;
pub mod products;
pub mod receipt;
pub mod redemptions;
