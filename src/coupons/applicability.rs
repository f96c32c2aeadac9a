//! Coupon Applicability

use smallvec::SmallVec;

use crate::{
    coupons::{Applicability, Coupon},
    items::CartItem,
};

/// A cart line covered by a coupon, with its index in the cart.
pub type ApplicableLine<'c, 'a> = (usize, &'c CartItem<'a>);

/// Cart lines covered by a coupon, in cart order.
pub type ApplicableLines<'c, 'a> = SmallVec<[ApplicableLine<'c, 'a>; 10]>;

/// Return whether the coupon covers a single line.
pub fn covers(applicability: &Applicability, item: &CartItem<'_>) -> bool {
    match applicability {
        Applicability::All => true,
        Applicability::Category(category_id) => item.product().is_in_category(category_id),
        Applicability::Product(product_id) => item.product_id() == product_id,
    }
}

/// Return whether the coupon covers at least one line of the cart.
///
/// An empty cart is never covered.
pub fn does_coupon_apply(coupon: &Coupon<'_>, items: &[CartItem<'_>]) -> bool {
    items
        .iter()
        .any(|item| covers(&coupon.applicability, item))
}

/// Return the lines of the cart the coupon covers.
pub fn applicable_items<'c, 'a>(
    coupon: &Coupon<'_>,
    items: &'c [CartItem<'a>],
) -> ApplicableLines<'c, 'a> {
    items
        .iter()
        .enumerate()
        .filter(|(_, item)| covers(&coupon.applicability, item))
        .collect()
}
