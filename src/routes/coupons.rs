//! Coupon CRUD routes.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::http::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use axum::response::{IntoResponse, Json, Response};
use serde::{Deserialize, Serialize};
use time::Date;
use uuid::Uuid;

use designer::design::DesignDocument;

use crate::services::coupon::{self, Coupon, CouponStatus, CouponUpdate, DiscountType, NewCoupon};
use crate::services::design;
use crate::state::AppState;

#[cfg(test)]
#[path = "coupons_test.rs"]
mod tests;

pub(crate) fn coupon_error_to_status(err: coupon::CouponError) -> StatusCode {
    match err {
        coupon::CouponError::NotFound(_) => StatusCode::NOT_FOUND,
        coupon::CouponError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
        coupon::CouponError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// `GET /api/coupons` — list all coupons, newest first.
pub async fn list_coupons(State(state): State<AppState>) -> Result<Json<Vec<Coupon>>, StatusCode> {
    let coupons = coupon::list_coupons(&state.pool)
        .await
        .map_err(coupon_error_to_status)?;
    Ok(Json(coupons))
}

#[derive(Deserialize)]
pub struct CreateCouponBody {
    pub title: Option<String>,
    pub code: Option<String>,
    pub description: Option<String>,
    pub discount_type: Option<DiscountType>,
    pub discount_value: Option<f64>,
    pub expires_at: Option<Date>,
    pub status: Option<CouponStatus>,
    pub max_usage: Option<i32>,
    pub conditions: Option<String>,
}

/// `POST /api/coupons` — create a coupon.
pub async fn create_coupon(
    State(state): State<AppState>,
    Json(body): Json<CreateCouponBody>,
) -> Result<(StatusCode, Json<Coupon>), StatusCode> {
    let new = NewCoupon {
        title: body.title.unwrap_or_default(),
        code: body.code.unwrap_or_default(),
        description: body.description.unwrap_or_default(),
        discount_type: body.discount_type.unwrap_or(DiscountType::Percentage),
        discount_value: body.discount_value.unwrap_or(0.0),
        expires_at: body.expires_at,
        status: body.status.unwrap_or(CouponStatus::Active),
        max_usage: body.max_usage,
        conditions: body.conditions,
    };
    let created = coupon::create_coupon(&state.pool, new)
        .await
        .map_err(coupon_error_to_status)?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// `GET /api/coupons/:id` — fetch one coupon.
pub async fn get_coupon(
    State(state): State<AppState>,
    Path(coupon_id): Path<Uuid>,
) -> Result<Json<Coupon>, StatusCode> {
    let found = coupon::get_coupon(&state.pool, coupon_id)
        .await
        .map_err(coupon_error_to_status)?;
    Ok(Json(found))
}

/// `PATCH /api/coupons/:id` — sparse coupon update.
pub async fn update_coupon(
    State(state): State<AppState>,
    Path(coupon_id): Path<Uuid>,
    Json(body): Json<CouponUpdate>,
) -> Result<Json<Coupon>, StatusCode> {
    let updated = coupon::update_coupon(&state.pool, coupon_id, &body)
        .await
        .map_err(coupon_error_to_status)?;
    Ok(Json(updated))
}

/// `DELETE /api/coupons/:id` — delete a coupon and drop its live session.
pub async fn delete_coupon(
    State(state): State<AppState>,
    Path(coupon_id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, StatusCode> {
    coupon::delete_coupon(&state.pool, coupon_id)
        .await
        .map_err(coupon_error_to_status)?;
    design::evict_session(&state, coupon_id).await;
    Ok(Json(serde_json::json!({ "ok": true })))
}

#[derive(Deserialize)]
pub struct GenerateCodeBody {
    pub title: Option<String>,
}

#[derive(Serialize)]
pub struct GenerateCodeResponse {
    pub code: String,
}

/// `POST /api/coupons/generate-code` — code suggestion from a title.
pub async fn generate_code(Json(body): Json<GenerateCodeBody>) -> Json<GenerateCodeResponse> {
    let code = coupon::generate_code(body.title.as_deref().unwrap_or_default());
    Json(GenerateCodeResponse { code })
}

#[derive(Serialize)]
struct CouponExport {
    coupon: Coupon,
    #[serde(skip_serializing_if = "Option::is_none")]
    design: Option<DesignDocument>,
}

/// `GET /api/coupons/:id/export.json` — download the coupon with its design.
///
/// The live session's document wins over the stored blob so an export taken
/// mid-edit matches what the designer shows.
pub async fn export_json(
    State(state): State<AppState>,
    Path(coupon_id): Path<Uuid>,
) -> Result<Response, StatusCode> {
    let found = coupon::get_coupon(&state.pool, coupon_id)
        .await
        .map_err(coupon_error_to_status)?;

    let live = design::live_document(&state, coupon_id).await;
    let parsed = live.or_else(|| found.design_document());
    let export = CouponExport { coupon: found, design: parsed };

    let body = serde_json::to_string_pretty(&export).map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;
    let filename = format!("coupon-{coupon_id}.json");

    Ok((
        [
            (CONTENT_TYPE, "application/json; charset=utf-8"),
            (CONTENT_DISPOSITION, &format!("attachment; filename=\"{filename}\"")),
        ],
        body,
    )
        .into_response())
}
