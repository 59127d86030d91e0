#![allow(clippy::float_cmp)]

use time::macros::date;
use uuid::Uuid;

use super::*;

fn sample_coupon() -> Coupon {
    Coupon {
        id: Uuid::new_v4(),
        title: "Welcome Deal".into(),
        code: "WELCOME20".into(),
        description: "Welcome discount for new customers".into(),
        discount_type: DiscountType::Percentage,
        discount_value: 20.0,
        expires_at: Some(date!(2026 - 12 - 31)),
        status: CouponStatus::Active,
        usage_count: 45,
        max_usage: Some(100),
        conditions: Some("First order, €25 minimum".into()),
        design_json: None,
        design_version: 0,
        created_at: OffsetDateTime::UNIX_EPOCH,
    }
}

fn valid_new_coupon() -> NewCoupon {
    NewCoupon {
        title: "Happy Hour".into(),
        code: "HAPPY5".into(),
        description: String::new(),
        discount_type: DiscountType::Fixed,
        discount_value: 5.0,
        expires_at: Some(date!(2026 - 11 - 30)),
        status: CouponStatus::Active,
        max_usage: Some(200),
        conditions: None,
    }
}

// =============================================================
// Enums
// =============================================================

#[test]
fn discount_type_str_roundtrip() {
    assert_eq!(DiscountType::from_str("percentage"), Some(DiscountType::Percentage));
    assert_eq!(DiscountType::from_str("fixed"), Some(DiscountType::Fixed));
    assert_eq!(DiscountType::from_str("bogus"), None);
    assert_eq!(DiscountType::Percentage.as_str(), "percentage");
}

#[test]
fn status_str_roundtrip() {
    for status in [CouponStatus::Active, CouponStatus::Expired, CouponStatus::Archived] {
        assert_eq!(CouponStatus::from_str(status.as_str()), Some(status));
    }
    assert_eq!(CouponStatus::from_str("paused"), None);
}

#[test]
fn discount_type_serde_lowercase() {
    assert_eq!(serde_json::to_string(&DiscountType::Percentage).unwrap(), "\"percentage\"");
    let back: DiscountType = serde_json::from_str("\"fixed\"").unwrap();
    assert_eq!(back, DiscountType::Fixed);
}

// =============================================================
// Validation
// =============================================================

#[test]
fn valid_coupon_passes() {
    assert!(validate_new_coupon(&valid_new_coupon()).is_ok());
}

#[test]
fn missing_title_rejected() {
    let mut new = valid_new_coupon();
    new.title = "   ".into();
    assert!(matches!(validate_new_coupon(&new), Err(CouponError::Validation("title is required"))));
}

#[test]
fn missing_code_rejected() {
    let mut new = valid_new_coupon();
    new.code = String::new();
    assert!(matches!(validate_new_coupon(&new), Err(CouponError::Validation("code is required"))));
}

#[test]
fn missing_expiry_rejected() {
    let mut new = valid_new_coupon();
    new.expires_at = None;
    assert!(matches!(validate_new_coupon(&new), Err(CouponError::Validation(_))));
}

#[test]
fn negative_discount_rejected() {
    let mut new = valid_new_coupon();
    new.discount_value = -1.0;
    assert!(validate_new_coupon(&new).is_err());
}

// =============================================================
// Code generation
// =============================================================

#[test]
fn generated_code_uses_title_prefix() {
    let code = generate_code("Weekend Gourmet");
    assert!(code.starts_with("WEE"), "unexpected code: {code}");
    assert_eq!(code.len(), 9);
}

#[test]
fn generated_code_skips_non_letters() {
    let code = generate_code("50% off!");
    assert!(code.starts_with("OFF"), "unexpected code: {code}");
}

#[test]
fn generated_code_falls_back_to_new() {
    let code = generate_code("2024!");
    assert!(code.starts_with("NEW"), "unexpected code: {code}");
    assert_eq!(code.len(), 9);
}

#[test]
fn generated_code_is_uppercase_alphanumeric() {
    let code = generate_code("Pranzo Business");
    assert!(code.chars().all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()));
}

#[test]
fn generated_codes_differ() {
    assert_ne!(generate_code("Same Title"), generate_code("Same Title"));
}

// =============================================================
// Display formatting
// =============================================================

#[test]
fn percentage_discount_display() {
    assert_eq!(format_discount(DiscountType::Percentage, 20.0), "20%");
}

#[test]
fn fixed_discount_display() {
    assert_eq!(format_discount(DiscountType::Fixed, 5.0), "€5");
}

#[test]
fn fractional_discount_display() {
    assert_eq!(format_discount(DiscountType::Fixed, 2.5), "€2.5");
}

#[test]
fn expiry_display_is_day_month_year() {
    assert_eq!(format_expiry(date!(2026 - 12 - 31)), "31/12/2026");
    assert_eq!(format_expiry(date!(2026 - 01 - 05)), "05/01/2026");
}

#[test]
fn coupon_display_helpers() {
    let coupon = sample_coupon();
    assert_eq!(coupon.discount_display(), "20%");
    assert_eq!(coupon.expiry_display(), "31/12/2026");
}

// =============================================================
// Design blob access
// =============================================================

#[test]
fn design_document_absent_when_no_blob() {
    assert!(sample_coupon().design_document().is_none());
}

#[test]
fn design_document_parses_stored_blob() {
    let mut coupon = sample_coupon();
    let doc = designer::design::DesignDocument::default();
    coupon.design_json = Some(serde_json::to_string(&doc).unwrap());
    let parsed = coupon.design_document().unwrap();
    assert_eq!(parsed.elements.len(), 4);
}

#[test]
fn design_document_tolerates_garbage_blob() {
    let mut coupon = sample_coupon();
    coupon.design_json = Some("not json".into());
    assert!(coupon.design_document().is_none());
}

// =============================================================
// Serialization of responses
// =============================================================

#[test]
fn coupon_serializes_dates_as_strings() {
    let json = serde_json::to_value(sample_coupon()).unwrap();
    assert_eq!(json["expires_at"], "2026-12-31");
    assert!(json["created_at"].is_string());
    assert_eq!(json["discount_type"], "percentage");
    assert_eq!(json["status"], "active");
}
