//! Redemption service — discount math and the guarded usage-counter
//! increment behind the scanned-QR flow.
//!
//! DESIGN
//! ======
//! A quote is a pure computation over the coupon's discount settings.
//! Confirmation increments `usage_count` with one conditional UPDATE, so
//! two concurrent redemptions of the last remaining use can never both
//! succeed.

use sqlx::PgPool;
use uuid::Uuid;

use crate::services::coupon::{self, Coupon, CouponError, DiscountType};

#[cfg(test)]
#[path = "redeem_test.rs"]
mod tests;

// =============================================================================
// TYPES
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum RedeemError {
    #[error("coupon not found: {0}")]
    NotFound(Uuid),
    #[error("usage limit reached: {0}")]
    LimitReached(Uuid),
    #[error("amount must be a positive number")]
    InvalidAmount,
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// A discounted-price quote, before confirmation.
#[derive(Debug, Clone)]
pub struct RedeemQuote {
    pub coupon: Coupon,
    pub amount: f64,
    pub discounted: f64,
    /// False when the usage counter is already at its maximum — the UI can
    /// disable confirmation up front.
    pub redeemable: bool,
}

/// Outcome of a confirmed redemption.
#[derive(Debug, Clone)]
pub struct RedeemReceipt {
    pub discounted: f64,
    pub usage_count: i32,
    pub max_usage: Option<i32>,
}

// =============================================================================
// DISCOUNT MATH
// =============================================================================

/// Compute the discounted price for an entered amount, rounded to cents.
/// Fixed discounts floor at zero.
#[must_use]
pub fn apply_discount(discount_type: DiscountType, discount_value: f64, amount: f64) -> f64 {
    let discounted = match discount_type {
        DiscountType::Percentage => amount - amount * discount_value / 100.0,
        DiscountType::Fixed => (amount - discount_value).max(0.0),
    };
    (discounted * 100.0).round() / 100.0
}

/// Whether the usage counter still allows one more redemption.
#[must_use]
pub fn usage_allows_redemption(usage_count: i32, max_usage: Option<i32>) -> bool {
    max_usage.is_none_or(|max| usage_count < max)
}

// =============================================================================
// FLOW
// =============================================================================

fn map_coupon_error(err: CouponError) -> RedeemError {
    match err {
        CouponError::NotFound(id) => RedeemError::NotFound(id),
        CouponError::Validation(_) => RedeemError::InvalidAmount,
        CouponError::Database(e) => RedeemError::Database(e),
    }
}

/// Fetch the coupon behind a scanned QR id.
///
/// # Errors
///
/// Returns `NotFound` when the coupon is missing or deleted.
pub async fn lookup(pool: &PgPool, coupon_id: Uuid) -> Result<Coupon, RedeemError> {
    coupon::get_coupon(pool, coupon_id).await.map_err(map_coupon_error)
}

/// Compute the discounted price for a user-entered amount.
///
/// # Errors
///
/// Returns `InvalidAmount` for non-positive amounts and `NotFound` for a
/// missing coupon.
pub async fn quote(pool: &PgPool, coupon_id: Uuid, amount: f64) -> Result<RedeemQuote, RedeemError> {
    if !amount.is_finite() || amount <= 0.0 {
        return Err(RedeemError::InvalidAmount);
    }
    let coupon = lookup(pool, coupon_id).await?;
    let discounted = apply_discount(coupon.discount_type, coupon.discount_value, amount);
    let redeemable = usage_allows_redemption(coupon.usage_count, coupon.max_usage);
    Ok(RedeemQuote { coupon, amount, discounted, redeemable })
}

/// Confirm a redemption: increment the usage counter if under its maximum,
/// else reject without touching it.
///
/// # Errors
///
/// Returns `LimitReached` when the counter is at its configured maximum.
pub async fn confirm(pool: &PgPool, coupon_id: Uuid, amount: f64) -> Result<RedeemReceipt, RedeemError> {
    if !amount.is_finite() || amount <= 0.0 {
        return Err(RedeemError::InvalidAmount);
    }

    // Single conditional increment; the WHERE clause is the usage gate.
    let updated = sqlx::query_as::<_, (i32, Option<i32>, String, f64)>(
        "UPDATE coupons SET usage_count = usage_count + 1, updated_at = now() \
         WHERE id = $1 AND (max_usage IS NULL OR usage_count < max_usage) \
         RETURNING usage_count, max_usage, discount_type, discount_value",
    )
    .bind(coupon_id)
    .fetch_optional(pool)
    .await?;

    let Some((usage_count, max_usage, discount_type, discount_value)) = updated else {
        // Diagnose the miss: a missing coupon surfaces as NotFound through
        // the lookup; an existing one means the counter is exhausted.
        lookup(pool, coupon_id).await?;
        return Err(RedeemError::LimitReached(coupon_id));
    };

    let discount_type = DiscountType::from_str(&discount_type).unwrap_or(DiscountType::Percentage);
    let discounted = apply_discount(discount_type, discount_value, amount);
    tracing::info!(%coupon_id, usage_count, "coupon redeemed");
    Ok(RedeemReceipt { discounted, usage_count, max_usage })
}
