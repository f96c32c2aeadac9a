//! Redemptions
//!
//! Applying a coupon never touches its usage counter. The counter moves when
//! an order is placed, through a [`RedemptionLedger`], which checks the usage
//! limit and increments in one step.

use std::sync::Mutex;

use rustc_hash::FxHashMap;
use thiserror::Error;
use tracing::info;

use crate::coupons::{Coupon, CouponCode};

/// Errors raised when redeeming a coupon.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RedemptionError {
    /// The coupon has been redeemed as often as it may be.
    #[error("Coupon {code} has reached its usage limit of {limit}")]
    LimitReached {
        /// Coupon code
        code: CouponCode,

        /// Usage limit
        limit: u32,
    },

    /// Usage counter would overflow.
    #[error("Usage counter for coupon {0} overflowed")]
    Overflow(CouponCode),

    /// A thread panicked while holding the ledger lock.
    #[error("Redemption ledger lock was poisoned")]
    Poisoned,
}

/// Store of coupon usage counters.
pub trait RedemptionLedger {
    /// Record one redemption of the coupon, returning the new usage count.
    ///
    /// The limit check and the increment happen atomically: concurrent
    /// callers can never push the count past the coupon's usage limit.
    ///
    /// # Errors
    ///
    /// Returns [`RedemptionError::LimitReached`] when the coupon is used up.
    fn redeem(&self, coupon: &Coupon<'_>) -> Result<u32, RedemptionError>;

    /// Number of redemptions recorded for the coupon code.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    fn used_count(&self, code: &CouponCode) -> Result<Option<u32>, RedemptionError>;
}

/// In-memory ledger guarded by a mutex.
#[derive(Debug, Default)]
pub struct InMemoryLedger {
    counts: Mutex<FxHashMap<CouponCode, u32>>,
}

impl InMemoryLedger {
    /// Create an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }
}

impl RedemptionLedger for InMemoryLedger {
    fn redeem(&self, coupon: &Coupon<'_>) -> Result<u32, RedemptionError> {
        let mut counts = self
            .counts
            .lock()
            .map_err(|_err| RedemptionError::Poisoned)?;

        // First redemption seen by this ledger starts from the coupon's own count.
        let count = counts
            .entry(coupon.code.clone())
            .or_insert(coupon.used_count);

        if let Some(limit) = coupon.usage_limit.filter(|limit| *count >= *limit) {
            return Err(RedemptionError::LimitReached {
                code: coupon.code.clone(),
                limit,
            });
        }

        *count = count
            .checked_add(1)
            .ok_or_else(|| RedemptionError::Overflow(coupon.code.clone()))?;

        info!(code = %coupon.code, used_count = *count, "coupon redeemed");

        Ok(*count)
    }

    fn used_count(&self, code: &CouponCode) -> Result<Option<u32>, RedemptionError> {
        let counts = self
            .counts
            .lock()
            .map_err(|_err| RedemptionError::Poisoned)?;

        Ok(counts.get(code).copied())
    }
}
