//! Rebate prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    cart::{Cart, CartError},
    coupons::{
        Applicability, Coupon, CouponCode, CouponKind, CouponStatus,
        applicability::{applicable_items, does_coupon_apply},
        apply::{APPLIED_MESSAGE, AppliedCoupon, CouponOutcome, apply_coupon},
        errors::CouponError,
        validity::{is_coupon_valid, is_valid},
    },
    discounts::{
        CouponDiscount, DiscountError, FreeItem, FreeItems, bogo_discount, percentage_discount,
    },
    fixtures::{Fixture, FixtureError},
    ids::Id,
    items::CartItem,
    pricing::{TotalPriceError, total_price},
    products::{CategoryId, Product, ProductId, ProductVariant, VariantId},
    receipt::{Receipt, ReceiptError},
    redemptions::{InMemoryLedger, RedemptionError, RedemptionLedger},
};
