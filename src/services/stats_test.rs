use time::OffsetDateTime;
use uuid::Uuid;

use super::*;
use crate::services::coupon::DiscountType;

fn coupon(title: &str, status: CouponStatus, usage_count: i32) -> Coupon {
    Coupon {
        id: Uuid::new_v4(),
        title: title.into(),
        code: title.to_uppercase().replace(' ', ""),
        description: String::new(),
        discount_type: DiscountType::Percentage,
        discount_value: 10.0,
        expires_at: None,
        status,
        usage_count,
        max_usage: None,
        conditions: None,
        design_json: None,
        design_version: 0,
        created_at: OffsetDateTime::UNIX_EPOCH,
    }
}

#[test]
fn empty_table_yields_zeroes() {
    let stats = compute_stats(&[]);
    assert_eq!(stats.total_coupons, 0);
    assert_eq!(stats.total_redemptions, 0);
    assert_eq!(stats.average_usage, 0);
    assert_eq!(stats.active_rate, 0);
    assert!(stats.top_coupons.is_empty());
}

#[test]
fn counts_by_status() {
    let coupons = vec![
        coupon("a", CouponStatus::Active, 1),
        coupon("b", CouponStatus::Active, 2),
        coupon("c", CouponStatus::Expired, 3),
        coupon("d", CouponStatus::Archived, 0),
    ];
    let stats = compute_stats(&coupons);
    assert_eq!(stats.total_coupons, 4);
    assert_eq!(stats.active_coupons, 2);
    assert_eq!(stats.expired_coupons, 1);
    assert_eq!(stats.archived_coupons, 1);
}

#[test]
fn totals_and_average() {
    let coupons = vec![
        coupon("a", CouponStatus::Active, 45),
        coupon("b", CouponStatus::Active, 78),
        coupon("c", CouponStatus::Expired, 23),
    ];
    let stats = compute_stats(&coupons);
    assert_eq!(stats.total_redemptions, 146);
    // 146 / 3 = 48.67 → 49.
    assert_eq!(stats.average_usage, 49);
}

#[test]
fn active_rate_is_whole_percentage() {
    let coupons = vec![
        coupon("a", CouponStatus::Active, 0),
        coupon("b", CouponStatus::Active, 0),
        coupon("c", CouponStatus::Expired, 0),
    ];
    // 2/3 → 66.7% → 67.
    assert_eq!(compute_stats(&coupons).active_rate, 67);
}

#[test]
fn top_coupons_sorted_and_capped() {
    let coupons: Vec<Coupon> = (0..8)
        .map(|i| coupon(&format!("c{i}"), CouponStatus::Active, i * 10))
        .collect();
    let stats = compute_stats(&coupons);
    assert_eq!(stats.top_coupons.len(), 5);
    assert_eq!(stats.top_coupons[0].usage_count, 70);
    assert!(stats.top_coupons.windows(2).all(|w| w[0].usage_count >= w[1].usage_count));
}

#[test]
fn stats_serialize_camel_case() {
    let json = serde_json::to_value(compute_stats(&[coupon("a", CouponStatus::Active, 3)])).unwrap();
    assert_eq!(json["totalCoupons"], 1);
    assert_eq!(json["totalRedemptions"], 3);
    assert!(json.get("topCoupons").is_some());
}
