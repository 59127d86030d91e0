//! Redemption routes behind the scanned-QR flow.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::services::coupon::Coupon;
use crate::services::redeem::{self, RedeemError};
use crate::state::AppState;

#[cfg(test)]
#[path = "redeem_test.rs"]
mod tests;

pub(crate) fn redeem_error_to_status(err: RedeemError) -> StatusCode {
    match err {
        RedeemError::NotFound(_) => StatusCode::NOT_FOUND,
        RedeemError::LimitReached(_) => StatusCode::CONFLICT,
        RedeemError::InvalidAmount => StatusCode::UNPROCESSABLE_ENTITY,
        RedeemError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RedeemInfoResponse {
    #[serde(flatten)]
    pub coupon: Coupon,
    /// Display string for the discount, e.g. `20%` or `€5`.
    pub discount_display: String,
    pub expiry_display: String,
}

/// `GET /api/redeem/:id` — coupon details for a scanned QR id.
pub async fn redeem_info(
    State(state): State<AppState>,
    Path(coupon_id): Path<Uuid>,
) -> Result<Json<RedeemInfoResponse>, StatusCode> {
    let coupon = redeem::lookup(&state.pool, coupon_id)
        .await
        .map_err(redeem_error_to_status)?;
    let discount_display = coupon.discount_display();
    let expiry_display = coupon.expiry_display();
    Ok(Json(RedeemInfoResponse { coupon, discount_display, expiry_display }))
}

#[derive(Deserialize)]
pub struct AmountBody {
    pub amount: f64,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteResponse {
    pub amount: f64,
    pub discounted: f64,
    pub redeemable: bool,
}

/// `POST /api/redeem/:id/quote` — discounted price for an entered amount.
pub async fn quote(
    State(state): State<AppState>,
    Path(coupon_id): Path<Uuid>,
    Json(body): Json<AmountBody>,
) -> Result<Json<QuoteResponse>, StatusCode> {
    let quoted = redeem::quote(&state.pool, coupon_id, body.amount)
        .await
        .map_err(redeem_error_to_status)?;
    Ok(Json(QuoteResponse { amount: quoted.amount, discounted: quoted.discounted, redeemable: quoted.redeemable }))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmResponse {
    pub discounted: f64,
    pub usage_count: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_usage: Option<i32>,
}

/// `POST /api/redeem/:id/confirm` — increment usage if under the maximum.
pub async fn confirm(
    State(state): State<AppState>,
    Path(coupon_id): Path<Uuid>,
    Json(body): Json<AmountBody>,
) -> Result<Json<ConfirmResponse>, StatusCode> {
    let receipt = redeem::confirm(&state.pool, coupon_id, body.amount)
        .await
        .map_err(redeem_error_to_status)?;
    Ok(Json(ConfirmResponse {
        discounted: receipt.discounted,
        usage_count: receipt.usage_count,
        max_usage: receipt.max_usage,
    }))
}
