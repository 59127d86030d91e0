//! Design service — live designer sessions and their operations.
//!
//! DESIGN
//! ======
//! Each coupon under edit gets one in-memory `DesignSession` hydrated from
//! its `design_json` column (or the default layout seeded from the coupon's
//! text fields). Drag, resize, element, and style operations mutate the
//! session synchronously — the snap engine and the alignment detector run
//! against the live document — and bump its version. The persistence task
//! flushes dirty sessions on its own cadence.
//!
//! ERROR HANDLING
//! ==============
//! Full saves carry the client's version and are rejected as stale when an
//! in-flight save would overwrite newer state (LWW with a monotonic
//! counter). Closing a session flushes first and keeps the session alive if
//! that flush fails, so edits survive for the background retry.

use designer::align::{self, GuideSegment};
use designer::design::{DesignDocument, DesignState, ElementPatch, StatePatch};
use designer::element::{Bounds, CanvasElement, ElementKind};
use designer::render::{self, RenderTree};
use designer::snap;
use serde::Serialize;
use uuid::Uuid;

use crate::services::coupon::{DiscountType, format_discount, format_expiry};
use crate::services::persistence;
use crate::state::{AppState, DesignSession};

#[cfg(test)]
#[path = "design_test.rs"]
mod tests;

// =============================================================================
// TYPES
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum DesignError {
    #[error("coupon not found: {0}")]
    CouponNotFound(Uuid),
    #[error("element not found: {0}")]
    ElementNotFound(String),
    #[error("duplicate element id: {0}")]
    DuplicateElement(String),
    #[error("element is not an image: {0}")]
    NotAnImage(String),
    #[error("stale design version: incoming {incoming} < current {current}")]
    StaleVersion { incoming: i64, current: i64 },
    #[error("design serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Snapshot of a session returned to the designer page.
#[derive(Debug, Clone, Serialize)]
pub struct DesignSnapshot {
    pub state: DesignState,
    pub elements: Vec<CanvasElement>,
    pub version: i64,
}

/// Result of one drag step: the committed position plus the guide lines the
/// canvas should draw for this frame.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DragOutcome {
    pub x: f64,
    pub y: f64,
    /// X coordinates of vertical snap guides; empty when X moved freely.
    pub guides_x: Vec<f64>,
    /// Y coordinates of horizontal snap guides; empty when Y moved freely.
    pub guides_y: Vec<f64>,
    /// Equal-spacing segments, replaced wholesale every drag event.
    pub align_guides: Vec<GuideSegment>,
}

// =============================================================================
// HYDRATION
// =============================================================================

/// Seed a fresh design state from the coupon's stored fields, the way the
/// designer page does on first open.
fn seeded_state(
    title: &str,
    code: &str,
    description: &str,
    discount_type: DiscountType,
    discount_value: f64,
    expires_at: Option<time::Date>,
) -> DesignState {
    let mut state = DesignState::default();
    if !title.is_empty() {
        state.title = title.to_owned();
    }
    if !code.is_empty() {
        state.code = code.to_owned();
    }
    if !description.is_empty() {
        state.description = description.to_owned();
    }
    state.discount = format_discount(discount_type, discount_value);
    state.expiry = expires_at.map(format_expiry).unwrap_or_default();
    state
}

/// Load the session inputs for a coupon straight from Postgres.
async fn load_session(state: &AppState, coupon_id: Uuid) -> Result<DesignSession, DesignError> {
    let row = sqlx::query_as::<_, (String, String, String, String, f64, Option<time::Date>, Option<String>, i64)>(
        "SELECT title, code, description, discount_type, discount_value, expires_at, design_json, design_version \
         FROM coupons WHERE id = $1",
    )
    .bind(coupon_id)
    .fetch_optional(&state.pool)
    .await?
    .ok_or(DesignError::CouponNotFound(coupon_id))?;

    let (title, code, description, discount_type, discount_value, expires_at, design_json, design_version) = row;
    let discount_type = DiscountType::from_str(&discount_type).unwrap_or(DiscountType::Percentage);

    // A stored blob wins; an unreadable one falls back to the default
    // layout rather than blocking the designer.
    let doc = design_from_blob(coupon_id, design_json.as_deref()).unwrap_or_else(|| {
        DesignDocument::new(seeded_state(&title, &code, &description, discount_type, discount_value, expires_at))
    });

    tracing::info!(%coupon_id, version = design_version, "hydrated design session");
    Ok(DesignSession::new(doc, design_version))
}

fn design_from_blob(coupon_id: Uuid, blob: Option<&str>) -> Option<DesignDocument> {
    let raw = blob?;
    match serde_json::from_str(raw) {
        Ok(doc) => Some(doc),
        Err(e) => {
            tracing::warn!(%coupon_id, error = %e, "unreadable design blob; using default layout");
            None
        }
    }
}

/// Make sure a session exists for the coupon, hydrating from Postgres if
/// needed, then run `op` against it under the write lock.
async fn with_session<T>(
    state: &AppState,
    coupon_id: Uuid,
    op: impl FnOnce(&mut DesignSession) -> Result<T, DesignError>,
) -> Result<T, DesignError> {
    let hydrated = {
        let sessions = state.sessions.read().await;
        sessions.contains_key(&coupon_id)
    };

    // Fetch outside the lock; apply only if nobody hydrated meanwhile.
    if !hydrated {
        let session = load_session(state, coupon_id).await?;
        let mut sessions = state.sessions.write().await;
        sessions.entry(coupon_id).or_insert(session);
    }

    let mut sessions = state.sessions.write().await;
    let session = sessions
        .get_mut(&coupon_id)
        .ok_or(DesignError::CouponNotFound(coupon_id))?;
    op(session)
}

// =============================================================================
// SESSION OPERATIONS
// =============================================================================

/// Open (or re-open) the designer for a coupon and return its snapshot.
///
/// # Errors
///
/// Returns `CouponNotFound` if the coupon doesn't exist.
pub async fn open_design(state: &AppState, coupon_id: Uuid) -> Result<DesignSnapshot, DesignError> {
    with_session(state, coupon_id, |session| {
        Ok(DesignSnapshot {
            state: session.doc.state.clone(),
            elements: session.doc.elements.clone(),
            version: session.version,
        })
    })
    .await
}

/// Replace the whole document from a client save.
///
/// # Errors
///
/// Returns `StaleVersion` when `incoming_version` is older than the live
/// session — the guard against an out-of-order debounced save.
pub async fn save_design(
    state: &AppState,
    coupon_id: Uuid,
    doc: DesignDocument,
    incoming_version: i64,
) -> Result<i64, DesignError> {
    with_session(state, coupon_id, move |session| {
        if incoming_version < session.version {
            return Err(DesignError::StaleVersion { incoming: incoming_version, current: session.version });
        }
        session.doc = doc;
        session.touch();
        Ok(session.version)
    })
    .await
}

/// One drag-move step: snap the proposed position, commit it, and report
/// guide lines.
///
/// # Errors
///
/// Returns `ElementNotFound` if the dragged element isn't in the document.
pub async fn drag_element(
    state: &AppState,
    coupon_id: Uuid,
    element_id: &str,
    left: f64,
    top: f64,
) -> Result<DragOutcome, DesignError> {
    with_session(state, coupon_id, |session| {
        let element = session
            .doc
            .element(element_id)
            .ok_or_else(|| DesignError::ElementNotFound(element_id.to_owned()))?;
        let proposed = Bounds::new(left, top, element.width, element.height);
        let others = session.doc.other_bounds(element_id);
        let (canvas_w, canvas_h) = session.doc.canvas_size();

        let snapped = snap::snap_position(&proposed, &others, canvas_w, canvas_h);
        let settled = Bounds::new(snapped.left, snapped.top, proposed.width, proposed.height);
        let align_guides = align::alignment_guides(&settled, &others);

        session.doc.move_element(element_id, snapped.left, snapped.top);
        session.touch();

        Ok(DragOutcome {
            x: snapped.left,
            y: snapped.top,
            guides_x: snapped.guides_x,
            guides_y: snapped.guides_y,
            align_guides,
        })
    })
    .await
}

/// Commit a new element size from a resize gesture.
///
/// # Errors
///
/// Returns `ElementNotFound` if the element isn't in the document.
pub async fn resize_element(
    state: &AppState,
    coupon_id: Uuid,
    element_id: &str,
    width: f64,
    height: f64,
) -> Result<(), DesignError> {
    with_session(state, coupon_id, |session| {
        if !session.doc.resize_element(element_id, width, height) {
            return Err(DesignError::ElementNotFound(element_id.to_owned()));
        }
        session.touch();
        Ok(())
    })
    .await
}

/// Add an element. An empty id gets a generated one, prefixed by kind.
///
/// # Errors
///
/// Returns `DuplicateElement` when the id is already taken.
pub async fn add_element(
    state: &AppState,
    coupon_id: Uuid,
    mut element: CanvasElement,
) -> Result<CanvasElement, DesignError> {
    if element.id.is_empty() {
        element.id = format!("{}{}", id_prefix(&element.kind), Uuid::new_v4().simple());
    }
    with_session(state, coupon_id, move |session| {
        if !session.doc.add_element(element.clone()) {
            return Err(DesignError::DuplicateElement(element.id));
        }
        session.touch();
        Ok(element)
    })
    .await
}

fn id_prefix(kind: &ElementKind) -> &'static str {
    match kind {
        ElementKind::Title => "title",
        ElementKind::Qr => "qr",
        ElementKind::Code => "code",
        ElementKind::Desc => "desc",
        ElementKind::CustomText { .. } => "text",
        ElementKind::CustomImage { .. } => "img",
        ElementKind::Shape { .. } => "shape",
        ElementKind::Icon { .. } => "icon",
    }
}

/// Remove an element by id.
///
/// # Errors
///
/// Returns `ElementNotFound` if the element isn't in the document.
pub async fn remove_element(state: &AppState, coupon_id: Uuid, element_id: &str) -> Result<(), DesignError> {
    with_session(state, coupon_id, |session| {
        if session.doc.remove_element(element_id).is_none() {
            return Err(DesignError::ElementNotFound(element_id.to_owned()));
        }
        session.touch();
        Ok(())
    })
    .await
}

/// Apply a sparse update to one element and return its new value.
///
/// # Errors
///
/// Returns `ElementNotFound` if the element isn't in the document.
pub async fn patch_element(
    state: &AppState,
    coupon_id: Uuid,
    element_id: &str,
    patch: &ElementPatch,
) -> Result<CanvasElement, DesignError> {
    with_session(state, coupon_id, |session| {
        if !session.doc.apply_patch(element_id, patch) {
            return Err(DesignError::ElementNotFound(element_id.to_owned()));
        }
        session.touch();
        session
            .doc
            .element(element_id)
            .cloned()
            .ok_or_else(|| DesignError::ElementNotFound(element_id.to_owned()))
    })
    .await
}

/// Apply a sparse update to the shared design state.
///
/// # Errors
///
/// Returns `CouponNotFound` if the coupon doesn't exist.
pub async fn patch_state(state: &AppState, coupon_id: Uuid, patch: &StatePatch) -> Result<DesignState, DesignError> {
    with_session(state, coupon_id, |session| {
        session.doc.apply_state_patch(patch);
        session.touch();
        Ok(session.doc.state.clone())
    })
    .await
}

/// Store uploaded image bytes on an image element as a base64 data URI and
/// return the URI. Only the targeted element's update is affected; the rest
/// of the document stays untouched.
///
/// # Errors
///
/// Returns `NotAnImage` when the element exists but isn't an image element.
pub async fn set_element_image(
    state: &AppState,
    coupon_id: Uuid,
    element_id: &str,
    content_type: &str,
    bytes: &[u8],
) -> Result<String, DesignError> {
    use base64::Engine as _;

    let data_uri = format!(
        "data:{content_type};base64,{}",
        base64::engine::general_purpose::STANDARD.encode(bytes)
    );
    with_session(state, coupon_id, move |session| {
        let element = session
            .doc
            .element(element_id)
            .ok_or_else(|| DesignError::ElementNotFound(element_id.to_owned()))?;
        if !matches!(element.kind, ElementKind::CustomImage { .. }) {
            return Err(DesignError::NotAnImage(element_id.to_owned()));
        }
        session
            .doc
            .apply_patch(element_id, &ElementPatch { src: Some(data_uri.clone()), ..Default::default() });
        session.touch();
        Ok(data_uri)
    })
    .await
}

/// Render the live document to its visual tree (preview/export read path).
///
/// # Errors
///
/// Returns `CouponNotFound` if the coupon doesn't exist.
pub async fn render_design(state: &AppState, coupon_id: Uuid) -> Result<RenderTree, DesignError> {
    with_session(state, coupon_id, |session| Ok(render::render(&session.doc))).await
}

/// Flush a session and evict it from memory. If the final flush fails the
/// session is retained with its dirty state so the background task retries.
///
/// # Errors
///
/// Returns the flush error when the final write fails.
pub async fn close_design(state: &AppState, coupon_id: Uuid) -> Result<(), DesignError> {
    let snapshot = {
        let sessions = state.sessions.read().await;
        let Some(session) = sessions.get(&coupon_id) else {
            return Ok(());
        };
        if session.is_dirty() {
            Some((serde_json::to_string(&session.doc)?, session.version))
        } else {
            None
        }
    };

    if let Some((ref blob, version)) = snapshot {
        persistence::flush_design(&state.pool, coupon_id, blob, version).await?;
    }

    let mut sessions = state.sessions.write().await;
    // EDGE: keep the session if it was edited again after the snapshot.
    let still_dirty = match sessions.get_mut(&coupon_id) {
        Some(session) => {
            if let Some((_, version)) = &snapshot {
                session.flushed_version = session.flushed_version.max(*version);
            }
            session.is_dirty()
        }
        None => return Ok(()),
    };
    if still_dirty {
        tracing::warn!(%coupon_id, "retaining design session after close; newer edits pending");
    } else {
        sessions.remove(&coupon_id);
        tracing::info!(%coupon_id, "design session closed");
    }
    Ok(())
}

/// Drop a coupon's live session and pending handoff, e.g. after deletion.
pub async fn evict_session(state: &AppState, coupon_id: Uuid) {
    let mut sessions = state.sessions.write().await;
    sessions.remove(&coupon_id);
    drop(sessions);
    let mut handoff = state.handoff.write().await;
    handoff.remove(&coupon_id);
}

// =============================================================================
// PREVIEW HANDOFF
// =============================================================================

/// Park a `{state, elements}` snapshot for the preview page.
pub async fn put_handoff(state: &AppState, coupon_id: Uuid, doc: DesignDocument) {
    let mut handoff = state.handoff.write().await;
    handoff.insert(coupon_id, doc);
}

/// Consume the parked snapshot: it is removed as it is read.
pub async fn take_handoff(state: &AppState, coupon_id: Uuid) -> Option<DesignDocument> {
    let mut handoff = state.handoff.write().await;
    handoff.remove(&coupon_id)
}

/// Abandon a parked snapshot without consuming it.
pub async fn clear_handoff(state: &AppState, coupon_id: Uuid) {
    let mut handoff = state.handoff.write().await;
    handoff.remove(&coupon_id);
}

// =============================================================================
// HELPERS FOR OTHER SERVICES
// =============================================================================

/// The live document for a coupon, if a session is open.
pub async fn live_document(state: &AppState, coupon_id: Uuid) -> Option<DesignDocument> {
    let sessions = state.sessions.read().await;
    sessions.get(&coupon_id).map(|session| session.doc.clone())
}
