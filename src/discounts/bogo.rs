//! Buy One Get One Free
//!
//! Every second unit of a line is free. Units are counted per line and never
//! pooled across different lines.

use rusty_money::{Money, iso::Currency};

use crate::{
    coupons::applicability::{ApplicableLine, ApplicableLines},
    discounts::{CouponDiscount, DiscountError, FreeItem, FreeItems},
};

/// Calculate a buy-one-get-one-free discount over the covered lines.
///
/// Lines are visited from the most to the least expensive unit price (ties
/// keep cart order). Each line gives away `quantity / 2` units, rounded down.
/// The total is clamped at zero.
///
/// # Errors
///
/// Returns [`DiscountError::Overflow`] if the discount total does not fit in minor units.
pub fn bogo_discount<'a>(
    lines: &[ApplicableLine<'_, 'a>],
    currency: &'a Currency,
) -> Result<CouponDiscount<'a>, DiscountError> {
    let mut sorted: ApplicableLines<'_, 'a> = lines.iter().copied().collect();

    // `sort_by` is stable, so equal prices keep cart order.
    sorted.sort_by(|(_, a), (_, b)| b.unit_price_minor().cmp(&a.unit_price_minor()));

    let mut free_items = FreeItems::new();
    let mut total: i64 = 0;

    for (line, item) in sorted {
        let free_quantity = item.quantity() / 2;

        if free_quantity == 0 {
            continue;
        }

        let line_discount = item
            .unit_price_minor()
            .checked_mul(i64::from(free_quantity))
            .ok_or(DiscountError::Overflow)?;

        total = total
            .checked_add(line_discount)
            .ok_or(DiscountError::Overflow)?;

        free_items.push(FreeItem {
            line,
            item: item.with_quantity(free_quantity),
        });
    }

    Ok(CouponDiscount {
        amount: Money::from_minor(total.max(0), currency),
        free_items,
    })
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::INR;
    use testresult::TestResult;

    use crate::{items::CartItem, products::Product};

    use super::*;

    fn item<'a>(id: &str, price: i64, quantity: u32) -> CartItem<'a> {
        CartItem::new(Product::new(id, id, Money::from_minor(price, INR)), quantity)
    }

    #[test]
    fn single_line_gives_away_every_second_unit() -> TestResult {
        for quantity in 1..=7 {
            let items = [item("tee", 300_00, quantity)];
            let lines: Vec<_> = items.iter().enumerate().collect();

            let discount = bogo_discount(&lines, INR)?;
            let free = quantity / 2;

            assert_eq!(
                discount.amount,
                Money::from_minor(300_00 * i64::from(free), INR)
            );
            assert_eq!(
                discount.free_items.iter().map(FreeItem::quantity).sum::<u32>(),
                free
            );
        }

        Ok(())
    }

    #[test]
    fn quantities_are_not_pooled_across_lines() -> TestResult {
        let items = [item("tee", 300_00, 1), item("mug", 200_00, 1)];
        let lines: Vec<_> = items.iter().enumerate().collect();

        let discount = bogo_discount(&lines, INR)?;

        assert_eq!(discount.amount, Money::from_minor(0, INR));
        assert!(discount.free_items.is_empty());

        Ok(())
    }

    #[test]
    fn free_items_are_ordered_by_price_descending() -> TestResult {
        let items = [
            item("mug", 200_00, 2),
            item("tee", 300_00, 4),
            item("cap", 200_00, 3),
        ];
        let lines: Vec<_> = items.iter().enumerate().collect();

        let discount = bogo_discount(&lines, INR)?;

        let order: Vec<(usize, u32)> = discount
            .free_items
            .iter()
            .map(|free| (free.line, free.quantity()))
            .collect();

        assert_eq!(order, vec![(1, 2), (0, 1), (2, 1)]);
        assert_eq!(discount.amount, Money::from_minor(1_000_00, INR));

        Ok(())
    }

    #[test]
    fn negative_prices_never_give_a_negative_discount() -> TestResult {
        let items = [item("credit", -50_00, 4)];
        let lines: Vec<_> = items.iter().enumerate().collect();

        let discount = bogo_discount(&lines, INR)?;

        assert_eq!(discount.amount, Money::from_minor(0, INR));

        Ok(())
    }

    #[test]
    fn free_item_keeps_product() -> TestResult {
        let items = [item("tee", 300_00, 3)];
        let lines: Vec<_> = items.iter().enumerate().collect();

        let discount = bogo_discount(&lines, INR)?;
        let free = discount.free_items.first().ok_or("no free item")?;

        assert_eq!(free.item.product().name, "tee");
        assert_eq!(free.quantity(), 1);

        Ok(())
    }
}
