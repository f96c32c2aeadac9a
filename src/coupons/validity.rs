//! Coupon Validity
//!
//! Time window, status and usage limit checks. The caller supplies `now` so
//! the same inputs always give the same answer.

use jiff::Timestamp;

use crate::coupons::{Coupon, CouponStatus, errors::CouponError};

/// Check whether a coupon can be redeemed at `now`.
///
/// Checks run in order and the first failure wins: status, start of the
/// window, end of the window, usage limit.
///
/// # Errors
///
/// - [`CouponError::Inactive`]: the status is not [`CouponStatus::Active`].
/// - [`CouponError::NotYetValid`]: `starts_at` is after `now`.
/// - [`CouponError::Expired`]: `ends_at` is before `now`.
/// - [`CouponError::UsageLimitReached`]: `used_count` has reached `usage_limit`.
pub fn is_coupon_valid(coupon: &Coupon<'_>, now: Timestamp) -> Result<(), CouponError> {
    if coupon.status != CouponStatus::Active {
        return Err(CouponError::Inactive);
    }

    if coupon.starts_at.is_some_and(|starts_at| starts_at > now) {
        return Err(CouponError::NotYetValid);
    }

    if coupon.ends_at.is_some_and(|ends_at| ends_at < now) {
        return Err(CouponError::Expired);
    }

    if coupon
        .usage_limit
        .is_some_and(|limit| coupon.used_count >= limit)
    {
        return Err(CouponError::UsageLimitReached);
    }

    Ok(())
}

/// Boolean form of [`is_coupon_valid`].
pub fn is_valid(coupon: &Coupon<'_>, now: Timestamp) -> bool {
    is_coupon_valid(coupon, now).is_ok()
}

#[cfg(test)]
mod tests {
    use jiff::SignedDuration;
    use testresult::TestResult;

    use super::*;

    fn now() -> Result<Timestamp, jiff::Error> {
        "2026-03-15T12:00:00Z".parse()
    }

    fn day() -> SignedDuration {
        SignedDuration::from_hours(24)
    }

    #[test]
    fn active_unrestricted_coupon_is_valid() -> TestResult {
        assert_eq!(is_coupon_valid(&Coupon::bogo("BOGO"), now()?), Ok(()));

        Ok(())
    }

    #[test]
    fn inactive_and_expired_statuses_are_invalid() -> TestResult {
        for status in [CouponStatus::Inactive, CouponStatus::Expired] {
            let coupon = Coupon::bogo("BOGO").with_status(status);

            assert_eq!(is_coupon_valid(&coupon, now()?), Err(CouponError::Inactive));
        }

        Ok(())
    }

    #[test]
    fn status_is_checked_before_window() -> TestResult {
        let now = now()?;
        let coupon = Coupon::bogo("BOGO")
            .with_status(CouponStatus::Inactive)
            .with_window(None, Some(now.checked_sub(day())?));

        assert_eq!(is_coupon_valid(&coupon, now), Err(CouponError::Inactive));

        Ok(())
    }

    #[test]
    fn future_start_is_not_yet_valid() -> TestResult {
        let now = now()?;
        let coupon = Coupon::bogo("BOGO").with_window(Some(now.checked_add(day())?), None);

        assert_eq!(is_coupon_valid(&coupon, now), Err(CouponError::NotYetValid));

        Ok(())
    }

    #[test]
    fn past_end_is_expired() -> TestResult {
        let now = now()?;
        let coupon = Coupon::bogo("BOGO").with_window(None, Some(now.checked_sub(day())?));

        assert_eq!(is_coupon_valid(&coupon, now), Err(CouponError::Expired));
        assert!(!is_valid(&coupon, now));

        Ok(())
    }

    #[test]
    fn window_bounds_are_inclusive() -> TestResult {
        let now = now()?;
        let coupon = Coupon::bogo("BOGO").with_window(Some(now), Some(now));

        assert!(is_valid(&coupon, now));

        Ok(())
    }

    #[test]
    fn exhausted_usage_limit_is_invalid() -> TestResult {
        let exhausted = Coupon::bogo("BOGO").with_usage(Some(10), 10);
        let remaining = Coupon::bogo("BOGO").with_usage(Some(10), 9);

        assert_eq!(
            is_coupon_valid(&exhausted, now()?),
            Err(CouponError::UsageLimitReached)
        );
        assert!(is_valid(&remaining, now()?));

        Ok(())
    }
}
