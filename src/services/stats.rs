//! Statistics service — dashboard aggregates over the coupon table.
//!
//! The numbers are recomputed from the full coupon list on every request;
//! the table is small and the arithmetic is trivial, so no caching.

use serde::Serialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::services::coupon::{self, Coupon, CouponError, CouponStatus};

#[cfg(test)]
#[path = "stats_test.rs"]
mod tests;

/// One entry in the top-coupons leaderboard.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TopCoupon {
    pub id: Uuid,
    pub title: String,
    pub code: String,
    pub usage_count: i32,
}

/// Aggregates shown on the dashboard and stats pages.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_coupons: usize,
    pub active_coupons: usize,
    pub expired_coupons: usize,
    pub archived_coupons: usize,
    /// Sum of usage counters across all coupons.
    pub total_redemptions: i64,
    /// Redemptions per coupon, rounded to the nearest integer.
    pub average_usage: i64,
    /// Share of active coupons, as a whole percentage. Zero when there are
    /// no coupons at all.
    pub active_rate: i64,
    /// Up to five coupons with the highest usage counters.
    pub top_coupons: Vec<TopCoupon>,
}

/// Number of entries in the top-coupons leaderboard.
const TOP_COUPONS: usize = 5;

/// Compute dashboard aggregates from coupon rows.
#[must_use]
pub fn compute_stats(coupons: &[Coupon]) -> DashboardStats {
    let total_coupons = coupons.len();
    let active_coupons = coupons.iter().filter(|c| c.status == CouponStatus::Active).count();
    let expired_coupons = coupons.iter().filter(|c| c.status == CouponStatus::Expired).count();
    let archived_coupons = coupons.iter().filter(|c| c.status == CouponStatus::Archived).count();
    let total_redemptions: i64 = coupons.iter().map(|c| i64::from(c.usage_count)).sum();

    #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
    let average_usage = if total_coupons == 0 {
        0
    } else {
        (total_redemptions as f64 / total_coupons as f64).round() as i64
    };
    #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
    let active_rate = if total_coupons == 0 {
        0
    } else {
        (active_coupons as f64 / total_coupons as f64 * 100.0).round() as i64
    };

    let mut by_usage: Vec<&Coupon> = coupons.iter().collect();
    by_usage.sort_by(|a, b| b.usage_count.cmp(&a.usage_count));
    let top_coupons = by_usage
        .into_iter()
        .take(TOP_COUPONS)
        .map(|c| TopCoupon { id: c.id, title: c.title.clone(), code: c.code.clone(), usage_count: c.usage_count })
        .collect();

    DashboardStats {
        total_coupons,
        active_coupons,
        expired_coupons,
        archived_coupons,
        total_redemptions,
        average_usage,
        active_rate,
        top_coupons,
    }
}

/// Load all coupons and compute their aggregates.
///
/// # Errors
///
/// Returns a database error if the coupon query fails.
pub async fn load_stats(pool: &PgPool) -> Result<DashboardStats, CouponError> {
    let coupons = coupon::list_coupons(pool).await?;
    Ok(compute_stats(&coupons))
}
