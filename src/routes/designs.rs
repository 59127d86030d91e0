//! Designer session routes: open/save, drag/resize, element and style
//! edits, render, and the preview handoff.

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode, header::CONTENT_TYPE};
use axum::response::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use designer::design::{DesignDocument, DesignState, ElementPatch, StatePatch};
use designer::element::CanvasElement;
use designer::render::RenderTree;

use crate::services::design::{self, DesignError, DesignSnapshot, DragOutcome};
use crate::state::AppState;

#[cfg(test)]
#[path = "designs_test.rs"]
mod tests;

pub(crate) fn design_error_to_status(err: DesignError) -> StatusCode {
    match err {
        DesignError::CouponNotFound(_) | DesignError::ElementNotFound(_) => StatusCode::NOT_FOUND,
        DesignError::DuplicateElement(_) | DesignError::StaleVersion { .. } => StatusCode::CONFLICT,
        DesignError::NotAnImage(_) => StatusCode::BAD_REQUEST,
        DesignError::Serialize(_) | DesignError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// `GET /api/coupons/:id/design` — open the designer session.
pub async fn open_design(
    State(state): State<AppState>,
    Path(coupon_id): Path<Uuid>,
) -> Result<Json<DesignSnapshot>, StatusCode> {
    let snapshot = design::open_design(&state, coupon_id)
        .await
        .map_err(design_error_to_status)?;
    Ok(Json(snapshot))
}

#[derive(Deserialize)]
pub struct SaveDesignBody {
    pub state: DesignState,
    pub elements: Vec<CanvasElement>,
    pub version: i64,
}

#[derive(Serialize)]
pub struct SaveDesignResponse {
    pub version: i64,
}

/// `PUT /api/coupons/:id/design` — full save with version guard.
pub async fn save_design(
    State(state): State<AppState>,
    Path(coupon_id): Path<Uuid>,
    Json(body): Json<SaveDesignBody>,
) -> Result<Json<SaveDesignResponse>, StatusCode> {
    let doc = DesignDocument { state: body.state, elements: body.elements };
    let version = design::save_design(&state, coupon_id, doc, body.version)
        .await
        .map_err(design_error_to_status)?;
    Ok(Json(SaveDesignResponse { version }))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DragBody {
    pub element_id: String,
    pub left: f64,
    pub top: f64,
}

/// `POST /api/coupons/:id/design/drag` — snap and commit a drag position.
pub async fn drag_element(
    State(state): State<AppState>,
    Path(coupon_id): Path<Uuid>,
    Json(body): Json<DragBody>,
) -> Result<Json<DragOutcome>, StatusCode> {
    let outcome = design::drag_element(&state, coupon_id, &body.element_id, body.left, body.top)
        .await
        .map_err(design_error_to_status)?;
    Ok(Json(outcome))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResizeBody {
    pub element_id: String,
    pub width: f64,
    pub height: f64,
}

/// `POST /api/coupons/:id/design/resize` — commit a resize.
pub async fn resize_element(
    State(state): State<AppState>,
    Path(coupon_id): Path<Uuid>,
    Json(body): Json<ResizeBody>,
) -> Result<Json<serde_json::Value>, StatusCode> {
    design::resize_element(&state, coupon_id, &body.element_id, body.width, body.height)
        .await
        .map_err(design_error_to_status)?;
    Ok(Json(serde_json::json!({ "ok": true })))
}

/// `POST /api/coupons/:id/design/elements` — add an element. An omitted or
/// empty id gets a generated one.
pub async fn add_element(
    State(state): State<AppState>,
    Path(coupon_id): Path<Uuid>,
    Json(element): Json<CanvasElement>,
) -> Result<(StatusCode, Json<CanvasElement>), StatusCode> {
    let added = design::add_element(&state, coupon_id, element)
        .await
        .map_err(design_error_to_status)?;
    Ok((StatusCode::CREATED, Json(added)))
}

/// `PATCH /api/coupons/:id/design/elements/:element_id` — sparse element
/// update.
pub async fn patch_element(
    State(state): State<AppState>,
    Path((coupon_id, element_id)): Path<(Uuid, String)>,
    Json(patch): Json<ElementPatch>,
) -> Result<Json<CanvasElement>, StatusCode> {
    let updated = design::patch_element(&state, coupon_id, &element_id, &patch)
        .await
        .map_err(design_error_to_status)?;
    Ok(Json(updated))
}

/// `DELETE /api/coupons/:id/design/elements/:element_id` — remove an element.
pub async fn remove_element(
    State(state): State<AppState>,
    Path((coupon_id, element_id)): Path<(Uuid, String)>,
) -> Result<Json<serde_json::Value>, StatusCode> {
    design::remove_element(&state, coupon_id, &element_id)
        .await
        .map_err(design_error_to_status)?;
    Ok(Json(serde_json::json!({ "ok": true })))
}

#[derive(Serialize)]
pub struct UploadImageResponse {
    pub src: String,
}

/// `POST /api/coupons/:id/design/elements/:element_id/image` — attach raw
/// image bytes to an image element as a data URI.
pub async fn upload_image(
    State(state): State<AppState>,
    Path((coupon_id, element_id)): Path<(Uuid, String)>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<UploadImageResponse>, StatusCode> {
    if body.is_empty() {
        return Err(StatusCode::UNPROCESSABLE_ENTITY);
    }
    let content_type = headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("application/octet-stream")
        .to_owned();

    let src = design::set_element_image(&state, coupon_id, &element_id, &content_type, &body)
        .await
        .map_err(design_error_to_status)?;
    Ok(Json(UploadImageResponse { src }))
}

/// `PATCH /api/coupons/:id/design/state` — sparse design-state update.
pub async fn patch_state(
    State(state): State<AppState>,
    Path(coupon_id): Path<Uuid>,
    Json(patch): Json<StatePatch>,
) -> Result<Json<DesignState>, StatusCode> {
    let updated = design::patch_state(&state, coupon_id, &patch)
        .await
        .map_err(design_error_to_status)?;
    Ok(Json(updated))
}

/// `GET /api/coupons/:id/design/render` — the WYSIWYG render tree.
pub async fn render_design(
    State(state): State<AppState>,
    Path(coupon_id): Path<Uuid>,
) -> Result<Json<RenderTree>, StatusCode> {
    let tree = design::render_design(&state, coupon_id)
        .await
        .map_err(design_error_to_status)?;
    Ok(Json(tree))
}

/// `POST /api/coupons/:id/design/close` — final flush, then evict.
pub async fn close_design(
    State(state): State<AppState>,
    Path(coupon_id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, StatusCode> {
    design::close_design(&state, coupon_id)
        .await
        .map_err(design_error_to_status)?;
    Ok(Json(serde_json::json!({ "ok": true })))
}

// =============================================================================
// PREVIEW HANDOFF
// =============================================================================

/// `PUT /api/coupons/:id/preview-state` — park a snapshot for the preview
/// page.
pub async fn put_preview_state(
    State(state): State<AppState>,
    Path(coupon_id): Path<Uuid>,
    Json(doc): Json<DesignDocument>,
) -> Json<serde_json::Value> {
    design::put_handoff(&state, coupon_id, doc).await;
    Json(serde_json::json!({ "ok": true }))
}

/// `GET /api/coupons/:id/preview-state` — consume the parked snapshot.
pub async fn take_preview_state(
    State(state): State<AppState>,
    Path(coupon_id): Path<Uuid>,
) -> Result<Json<DesignDocument>, StatusCode> {
    design::take_handoff(&state, coupon_id)
        .await
        .map(Json)
        .ok_or(StatusCode::NOT_FOUND)
}

/// `DELETE /api/coupons/:id/preview-state` — abandon the parked snapshot.
pub async fn clear_preview_state(
    State(state): State<AppState>,
    Path(coupon_id): Path<Uuid>,
) -> Json<serde_json::Value> {
    design::clear_handoff(&state, coupon_id).await;
    Json(serde_json::json!({ "ok": true }))
}
