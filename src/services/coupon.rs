//! Coupon service — CRUD over Postgres, input validation, and display
//! formatting.
//!
//! DESIGN
//! ======
//! Coupons are plain rows; the designer's layout rides along as one opaque
//! `design_json` column guarded by `design_version`. Validation happens
//! before any write: a failed validation aborts the operation with nothing
//! committed.

use rand::Rng;
use sqlx::PgPool;
use time::{Date, OffsetDateTime};
use time::macros::format_description;
use uuid::Uuid;

use designer::design::DesignDocument;
use serde::{Deserialize, Serialize};

#[cfg(test)]
#[path = "coupon_test.rs"]
mod tests;

// =============================================================================
// TYPES
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum CouponError {
    #[error("coupon not found: {0}")]
    NotFound(Uuid),
    #[error("validation failed: {0}")]
    Validation(&'static str),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// How a coupon discounts the bill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiscountType {
    /// Percentage off the entered amount.
    Percentage,
    /// Fixed amount off, floored at zero.
    Fixed,
}

impl DiscountType {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Percentage => "percentage",
            Self::Fixed => "fixed",
        }
    }

    #[must_use]
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "percentage" => Some(Self::Percentage),
            "fixed" => Some(Self::Fixed),
            _ => None,
        }
    }
}

/// Lifecycle state of a coupon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CouponStatus {
    Active,
    Expired,
    Archived,
}

impl CouponStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Expired => "expired",
            Self::Archived => "archived",
        }
    }

    #[must_use]
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "active" => Some(Self::Active),
            "expired" => Some(Self::Expired),
            "archived" => Some(Self::Archived),
            _ => None,
        }
    }
}

/// A coupon row as stored and served.
#[derive(Debug, Clone, Serialize)]
pub struct Coupon {
    pub id: Uuid,
    pub title: String,
    pub code: String,
    pub description: String,
    pub discount_type: DiscountType,
    pub discount_value: f64,
    pub expires_at: Option<Date>,
    pub status: CouponStatus,
    pub usage_count: i32,
    pub max_usage: Option<i32>,
    pub conditions: Option<String>,
    /// Opaque serialized design blob, when one has been saved.
    pub design_json: Option<String>,
    pub design_version: i64,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl Coupon {
    /// Discount display string, e.g. `20%` or `€5`.
    #[must_use]
    pub fn discount_display(&self) -> String {
        format_discount(self.discount_type, self.discount_value)
    }

    /// Expiry display string in `dd/mm/yyyy`, empty when unset.
    #[must_use]
    pub fn expiry_display(&self) -> String {
        self.expires_at.map(format_expiry).unwrap_or_default()
    }

    /// The design blob parsed into a document, when present and readable.
    #[must_use]
    pub fn design_document(&self) -> Option<DesignDocument> {
        let raw = self.design_json.as_deref()?;
        match serde_json::from_str(raw) {
            Ok(doc) => Some(doc),
            Err(e) => {
                tracing::warn!(coupon_id = %self.id, error = %e, "unreadable design blob");
                None
            }
        }
    }
}

/// New-coupon input after route-level deserialization.
#[derive(Debug, Clone)]
pub struct NewCoupon {
    pub title: String,
    pub code: String,
    pub description: String,
    pub discount_type: DiscountType,
    pub discount_value: f64,
    pub expires_at: Option<Date>,
    pub status: CouponStatus,
    pub max_usage: Option<i32>,
    pub conditions: Option<String>,
}

/// Sparse coupon update. Only present fields are written.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct CouponUpdate {
    pub title: Option<String>,
    pub code: Option<String>,
    pub description: Option<String>,
    pub discount_type: Option<DiscountType>,
    pub discount_value: Option<f64>,
    pub expires_at: Option<Date>,
    pub status: Option<CouponStatus>,
    pub max_usage: Option<Option<i32>>,
    pub conditions: Option<String>,
}

// =============================================================================
// VALIDATION / FORMATTING
// =============================================================================

/// Check required fields for a new coupon: title, code, expiry date.
///
/// # Errors
///
/// Returns `Validation` naming the first missing field.
pub fn validate_new_coupon(coupon: &NewCoupon) -> Result<(), CouponError> {
    if coupon.title.trim().is_empty() {
        return Err(CouponError::Validation("title is required"));
    }
    if coupon.code.trim().is_empty() {
        return Err(CouponError::Validation("code is required"));
    }
    if coupon.expires_at.is_none() {
        return Err(CouponError::Validation("expiry date is required"));
    }
    if coupon.discount_value < 0.0 {
        return Err(CouponError::Validation("discount value must not be negative"));
    }
    Ok(())
}

/// Generate a coupon code: up to three A–Z characters from the title
/// (`NEW` when the title has none) plus six random uppercase alphanumerics.
#[must_use]
pub fn generate_code(title: &str) -> String {
    let prefix: String = title
        .to_uppercase()
        .chars()
        .filter(char::is_ascii_uppercase)
        .take(3)
        .collect();
    let prefix = if prefix.is_empty() { "NEW".to_owned() } else { prefix };

    let mut rng = rand::rng();
    let suffix: String = (0..6)
        .map(|_| char::from(rng.sample(rand::distr::Alphanumeric)).to_ascii_uppercase())
        .collect();

    format!("{prefix}{suffix}")
}

/// Discount display string, e.g. `20%` or `€5`.
#[must_use]
pub fn format_discount(discount_type: DiscountType, value: f64) -> String {
    match discount_type {
        DiscountType::Percentage => format!("{value}%"),
        DiscountType::Fixed => format!("€{value}"),
    }
}

/// Expiry display string in `dd/mm/yyyy`.
#[must_use]
pub fn format_expiry(date: Date) -> String {
    let format = format_description!("[day]/[month]/[year]");
    date.format(&format).unwrap_or_default()
}

// =============================================================================
// CRUD
// =============================================================================

type CouponRow = (
    Uuid,
    String,
    String,
    String,
    String,
    f64,
    Option<Date>,
    String,
    i32,
    Option<i32>,
    Option<String>,
    Option<String>,
    i64,
    OffsetDateTime,
);

const COUPON_COLUMNS: &str = "id, title, code, description, discount_type, discount_value, expires_at, \
     status, usage_count, max_usage, conditions, design_json, design_version, created_at";

fn row_to_coupon(row: CouponRow) -> Coupon {
    let (
        id,
        title,
        code,
        description,
        discount_type,
        discount_value,
        expires_at,
        status,
        usage_count,
        max_usage,
        conditions,
        design_json,
        design_version,
        created_at,
    ) = row;
    Coupon {
        id,
        title,
        code,
        description,
        discount_type: DiscountType::from_str(&discount_type).unwrap_or(DiscountType::Percentage),
        discount_value,
        expires_at,
        status: CouponStatus::from_str(&status).unwrap_or(CouponStatus::Active),
        usage_count,
        max_usage,
        conditions,
        design_json,
        design_version,
        created_at,
    }
}

/// Insert a new coupon after validation.
///
/// # Errors
///
/// Returns `Validation` when required fields are missing, or a database
/// error if the insert fails.
pub async fn create_coupon(pool: &PgPool, new: NewCoupon) -> Result<Coupon, CouponError> {
    validate_new_coupon(&new)?;

    let id = Uuid::new_v4();
    let row = sqlx::query_as::<_, CouponRow>(&format!(
        "INSERT INTO coupons (id, title, code, description, discount_type, discount_value, expires_at, status, max_usage, conditions) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) \
         RETURNING {COUPON_COLUMNS}"
    ))
    .bind(id)
    .bind(&new.title)
    .bind(&new.code)
    .bind(&new.description)
    .bind(new.discount_type.as_str())
    .bind(new.discount_value)
    .bind(new.expires_at)
    .bind(new.status.as_str())
    .bind(new.max_usage)
    .bind(&new.conditions)
    .fetch_one(pool)
    .await?;

    tracing::info!(coupon_id = %id, code = %new.code, "coupon created");
    Ok(row_to_coupon(row))
}

/// List all coupons, newest first.
///
/// # Errors
///
/// Returns a database error if the query fails.
pub async fn list_coupons(pool: &PgPool) -> Result<Vec<Coupon>, CouponError> {
    let rows = sqlx::query_as::<_, CouponRow>(&format!(
        "SELECT {COUPON_COLUMNS} FROM coupons ORDER BY created_at DESC"
    ))
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(row_to_coupon).collect())
}

/// Fetch one coupon by id.
///
/// # Errors
///
/// Returns `NotFound` when no row matches.
pub async fn get_coupon(pool: &PgPool, id: Uuid) -> Result<Coupon, CouponError> {
    let row = sqlx::query_as::<_, CouponRow>(&format!(
        "SELECT {COUPON_COLUMNS} FROM coupons WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or(CouponError::NotFound(id))?;

    Ok(row_to_coupon(row))
}

/// Apply a sparse update to a coupon's fields.
///
/// # Errors
///
/// Returns `NotFound` when no row matches, or `Validation` when an update
/// would blank a required field.
pub async fn update_coupon(pool: &PgPool, id: Uuid, update: &CouponUpdate) -> Result<Coupon, CouponError> {
    if update.title.as_deref().is_some_and(|t| t.trim().is_empty()) {
        return Err(CouponError::Validation("title is required"));
    }
    if update.code.as_deref().is_some_and(|c| c.trim().is_empty()) {
        return Err(CouponError::Validation("code is required"));
    }

    let row = sqlx::query_as::<_, CouponRow>(&format!(
        "UPDATE coupons SET \
             title = COALESCE($2, title), \
             code = COALESCE($3, code), \
             description = COALESCE($4, description), \
             discount_type = COALESCE($5, discount_type), \
             discount_value = COALESCE($6, discount_value), \
             expires_at = COALESCE($7, expires_at), \
             status = COALESCE($8, status), \
             max_usage = CASE WHEN $9 THEN $10 ELSE max_usage END, \
             conditions = COALESCE($11, conditions), \
             updated_at = now() \
         WHERE id = $1 \
         RETURNING {COUPON_COLUMNS}"
    ))
    .bind(id)
    .bind(&update.title)
    .bind(&update.code)
    .bind(&update.description)
    .bind(update.discount_type.map(DiscountType::as_str))
    .bind(update.discount_value)
    .bind(update.expires_at)
    .bind(update.status.map(CouponStatus::as_str))
    .bind(update.max_usage.is_some())
    .bind(update.max_usage.flatten())
    .bind(&update.conditions)
    .fetch_optional(pool)
    .await?
    .ok_or(CouponError::NotFound(id))?;

    Ok(row_to_coupon(row))
}

/// Delete a coupon by id.
///
/// # Errors
///
/// Returns `NotFound` when no row matches.
pub async fn delete_coupon(pool: &PgPool, id: Uuid) -> Result<(), CouponError> {
    let result = sqlx::query("DELETE FROM coupons WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(CouponError::NotFound(id));
    }
    tracing::info!(coupon_id = %id, "coupon deleted");
    Ok(())
}
