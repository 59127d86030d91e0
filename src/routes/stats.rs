//! Dashboard statistics route.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Json;

use crate::routes::coupons::coupon_error_to_status;
use crate::services::stats::{self, DashboardStats};
use crate::state::AppState;

/// `GET /api/stats` — aggregates over the coupon table.
pub async fn dashboard_stats(State(state): State<AppState>) -> Result<Json<DashboardStats>, StatusCode> {
    let computed = stats::load_stats(&state.pool)
        .await
        .map_err(coupon_error_to_status)?;
    Ok(Json(computed))
}
