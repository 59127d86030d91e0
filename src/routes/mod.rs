//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! All endpoints live under `/api`; the designer, preview, and dashboard
//! frontends are separate clients of this API. CORS is wide open because
//! the service carries no credentials of its own — access control is the
//! hosting layer's concern.

pub mod coupons;
pub mod designs;
pub mod redeem;
pub mod stats;

use axum::Router;
use axum::http::StatusCode;
use axum::routing::{get, patch, post, put};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Build the application router.
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/coupons", get(coupons::list_coupons).post(coupons::create_coupon))
        .route("/api/coupons/generate-code", post(coupons::generate_code))
        .route(
            "/api/coupons/{id}",
            get(coupons::get_coupon)
                .patch(coupons::update_coupon)
                .delete(coupons::delete_coupon),
        )
        .route("/api/coupons/{id}/export.json", get(coupons::export_json))
        .route(
            "/api/coupons/{id}/design",
            get(designs::open_design).put(designs::save_design),
        )
        .route("/api/coupons/{id}/design/drag", post(designs::drag_element))
        .route("/api/coupons/{id}/design/resize", post(designs::resize_element))
        .route("/api/coupons/{id}/design/elements", post(designs::add_element))
        .route(
            "/api/coupons/{id}/design/elements/{element_id}",
            patch(designs::patch_element).delete(designs::remove_element),
        )
        .route(
            "/api/coupons/{id}/design/elements/{element_id}/image",
            post(designs::upload_image),
        )
        .route("/api/coupons/{id}/design/state", patch(designs::patch_state))
        .route("/api/coupons/{id}/design/render", get(designs::render_design))
        .route("/api/coupons/{id}/design/close", post(designs::close_design))
        .route(
            "/api/coupons/{id}/preview-state",
            put(designs::put_preview_state)
                .get(designs::take_preview_state)
                .delete(designs::clear_preview_state),
        )
        .route("/api/redeem/{id}", get(redeem::redeem_info))
        .route("/api/redeem/{id}/quote", post(redeem::quote))
        .route("/api/redeem/{id}/confirm", post(redeem::confirm))
        .route("/api/stats", get(stats::dashboard_stats))
        .route("/healthz", get(healthz))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}
