//! Checkout scenarios against the `storefront` fixture set.
//!
//! Catalog (INR):
//!
//! - Classic Tee (tops): 100.00
//! - Zip Hoodie (tops): 300.00
//! - Enamel Mug (home): 200.00
//! - Canvas Sneakers (footwear): 2499.00, on sale at 1999.00
//! - Slim Jeans (bottoms): 1499.00, with a 34" black variant at 1599.00 on sale at 1299.00
//!
//! Carts:
//!
//! - `two-tees`: 2 x tee = 200.00
//! - `three-hoodies`: 3 x hoodie = 900.00
//! - `small-order`: 2 x mug = 400.00
//! - `storefront`: 3 x tee, 2 x hoodie, mug, 2 x jeans (32"), sneakers = 6097.00

use std::fs;

use jiff::Timestamp;
use rusty_money::{Money, iso::INR};
use testresult::TestResult;

use rebate::{
    coupons::{
        apply::{APPLIED_MESSAGE, CouponOutcome, apply_coupon},
        errors::CouponError,
        validity::is_coupon_valid,
    },
    fixtures::Fixture,
    receipt::Receipt,
};

fn fixture(cart: &str) -> Result<Fixture<'static>, rebate::fixtures::FixtureError> {
    Fixture::from_set_in("./fixtures", "storefront", cart)
}

fn now() -> Result<Timestamp, jiff::Error> {
    "2026-03-15T12:00:00Z".parse()
}

#[test]
fn half_off_two_tees() -> TestResult {
    let fixture = fixture("two-tees")?;
    let cart = fixture.cart()?;

    let applied = apply_coupon(fixture.coupon("HALFOFF")?, &cart, now()?)?;

    assert_eq!(applied.discount, Money::from_minor(100_00, INR));
    assert!(applied.free_items.is_empty());

    Ok(())
}

#[test]
fn bogo_three_hoodies() -> TestResult {
    let fixture = fixture("three-hoodies")?;
    let cart = fixture.cart()?;

    let applied = apply_coupon(fixture.coupon("BOGO")?, &cart, now()?)?;
    let free = applied.free_items.first().ok_or("expected a free item")?;

    assert_eq!(applied.discount, Money::from_minor(300_00, INR));
    assert_eq!(applied.free_items.len(), 1);
    assert_eq!(free.line, 0);
    assert_eq!(free.quantity(), 1);
    assert_eq!(free.item.product().name, "Zip Hoodie");

    Ok(())
}

#[test]
fn minimum_purchase_not_met() -> TestResult {
    let fixture = fixture("small-order")?;
    let cart = fixture.cart()?;

    let result = apply_coupon(fixture.coupon("MIN500")?, &cart, now()?);

    assert_eq!(
        result,
        Err(CouponError::BelowMinimumPurchase {
            minimum_minor: 500_00,
            currency: INR,
        })
    );

    let outcome = CouponOutcome::from(result);

    assert!(!outcome.success);
    assert!(outcome.message.starts_with("A minimum purchase of"));

    Ok(())
}

#[test]
fn expired_coupon_is_rejected() -> TestResult {
    let fixture = fixture("two-tees")?;
    let cart = fixture.cart()?;

    let outcome = CouponOutcome::from(apply_coupon(fixture.coupon("WINTER24")?, &cart, now()?));

    assert!(!outcome.success);
    assert!(outcome.message.contains("expired"));
    assert!(outcome.applied.is_none());

    Ok(())
}

#[test]
fn expired_coupon_was_valid_inside_its_window() -> TestResult {
    let fixture = fixture("two-tees")?;
    let cart = fixture.cart()?;
    let during_sale: Timestamp = "2024-12-01T00:00:00Z".parse()?;

    let applied = apply_coupon(fixture.coupon("WINTER24")?, &cart, during_sale)?;

    assert_eq!(applied.discount, Money::from_minor(50_00, INR));

    Ok(())
}

#[test]
fn shopper_rejections_carry_their_messages() -> TestResult {
    let fixture = fixture("two-tees")?;
    let cart = fixture.cart()?;
    let now = now()?;

    let cases = [
        ("PAUSED", "This coupon is not active."),
        ("SPRING30", "This coupon is not yet valid."),
        ("LAUNCH", "This coupon has reached its usage limit."),
        (
            "MUGBOGO",
            "This coupon does not apply to any items in your cart.",
        ),
    ];

    for (code, message) in cases {
        let result = apply_coupon(fixture.coupon(code)?, &cart, now);

        assert!(
            result.as_ref().is_err_and(CouponError::is_rejection),
            "{code} should be rejected"
        );
        assert_eq!(CouponOutcome::from(result).message, message, "{code}");
    }

    Ok(())
}

#[test]
fn category_coupon_is_capped() -> TestResult {
    let fixture = fixture("storefront")?;
    let cart = fixture.cart()?;

    // Tops in the cart: 3 x 100.00 + 2 x 300.00 = 900.00; 20% is 180.00, capped at 100.00.
    let applied = apply_coupon(fixture.coupon("TOPS20")?, &cart, now()?)?;

    assert_eq!(applied.discount, Money::from_minor(100_00, INR));

    Ok(())
}

#[test]
fn bogo_across_mixed_cart_is_per_line() -> TestResult {
    let fixture = fixture("storefront")?;
    let cart = fixture.cart()?;

    let applied = apply_coupon(fixture.coupon("BOGO")?, &cart, now()?)?;

    // Jeans (1499.00, 1 free), hoodie (300.00, 1 free), tee (100.00, 1 free).
    let free: Vec<(usize, u32)> = applied
        .free_items
        .iter()
        .map(|free| (free.line, free.quantity()))
        .collect();

    assert_eq!(free, vec![(3, 1), (1, 1), (0, 1)]);
    assert_eq!(applied.discount, Money::from_minor(1_899_00, INR));

    Ok(())
}

#[test]
fn minimum_purchase_met_by_whole_cart() -> TestResult {
    let fixture = fixture("storefront")?;
    let cart = fixture.cart()?;

    let applied = apply_coupon(fixture.coupon("MIN500")?, &cart, now()?)?;

    // 10% of 6097.00, rounded to the paisa.
    assert_eq!(applied.discount, Money::from_minor(609_70, INR));

    Ok(())
}

#[test]
fn applying_twice_gives_the_same_result() -> TestResult {
    let fixture = fixture("storefront")?;
    let cart = fixture.cart()?;
    let coupon = fixture.coupon("TOPS20")?;
    let now = now()?;

    let first = apply_coupon(coupon, &cart, now)?;
    let second = apply_coupon(coupon, &cart, now)?;

    assert_eq!(first, second);
    assert_eq!(fixture.cart()?.items(), cart.items());
    assert_eq!(fixture.coupon("TOPS20")?, coupon);

    Ok(())
}

#[test]
fn receipt_totals_for_half_off() -> TestResult {
    let fixture = fixture("two-tees")?;
    let cart = fixture.cart()?;

    let outcome = CouponOutcome::from(apply_coupon(fixture.coupon("HALFOFF")?, &cart, now()?));
    let receipt = Receipt::new(&cart, outcome.applied.as_ref())?;

    assert_eq!(outcome.message, APPLIED_MESSAGE);
    assert_eq!(receipt.subtotal(), Money::from_minor(200_00, INR));
    assert_eq!(receipt.total(), Money::from_minor(100_00, INR));

    Ok(())
}

#[test]
fn coupons_validate_without_a_cart() -> TestResult {
    let dir = tempfile::tempdir()?;

    for kind in ["products", "coupons"] {
        fs::create_dir_all(dir.path().join(kind))?;
        fs::copy(
            format!("./fixtures/{kind}/storefront.yml"),
            dir.path().join(kind).join("catalog-only.yml"),
        )?;
    }

    let fixture = Fixture::catalog_in(dir.path(), "catalog-only")?;
    let now = now()?;

    assert!(fixture.items().is_empty());
    assert_eq!(is_coupon_valid(fixture.coupon("HALFOFF")?, now), Ok(()));
    assert_eq!(
        is_coupon_valid(fixture.coupon("WINTER24")?, now),
        Err(CouponError::Expired)
    );

    Ok(())
}
