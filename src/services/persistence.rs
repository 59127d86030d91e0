//! Persistence service — background flush for dirty design sessions.
//!
//! DESIGN
//! ======
//! A background task snapshots dirty sessions under the lock, serializes
//! them, writes to Postgres lock-free, then sleeps before the next cycle.
//! The interval defaults to the designer's debounce window (600ms), so a
//! burst of drag events still becomes one write. Every write carries the
//! session's monotonic version and the UPDATE is guarded on
//! `design_version <= $version`, so a slow, stale write can never overwrite
//! a newer design.
//!
//! ERROR HANDLING
//! ==============
//! `flushed_version` advances only after a successful write. This
//! prioritizes durability over duplicate flush attempts: repeated upserts
//! are acceptable, silent data loss is not.

use std::time::Duration;

use sqlx::PgPool;
use tokio::task::JoinHandle;
use tracing::{debug, error, info};
use uuid::Uuid;

use crate::state::AppState;

#[cfg(test)]
#[path = "persistence_test.rs"]
mod tests;

const DEFAULT_DESIGN_FLUSH_INTERVAL_MS: u64 = 600;

pub(crate) fn env_parse<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr + Copy,
{
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}

/// Spawn the background flush task. Returns a handle for shutdown.
pub fn spawn_persistence_task(state: AppState) -> JoinHandle<()> {
    let flush_interval_ms = env_parse("DESIGN_FLUSH_INTERVAL_MS", DEFAULT_DESIGN_FLUSH_INTERVAL_MS);
    info!(flush_interval_ms, "design persistence flush configured");
    tokio::spawn(async move {
        loop {
            flush_all_dirty(&state).await;
            tokio::time::sleep(Duration::from_millis(flush_interval_ms)).await;
        }
    })
}

/// Write one design blob, refusing to clobber a newer stored version.
///
/// # Errors
///
/// Returns a database error if the write fails.
pub async fn flush_design(pool: &PgPool, coupon_id: Uuid, blob: &str, version: i64) -> Result<(), sqlx::Error> {
    let result = sqlx::query(
        "UPDATE coupons SET design_json = $2, design_version = $3, updated_at = now() \
         WHERE id = $1 AND design_version <= $3",
    )
    .bind(coupon_id)
    .bind(blob)
    .bind(version)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        // Coupon deleted, or a newer version is already stored.
        debug!(%coupon_id, version, "design flush matched no row");
    }
    Ok(())
}

async fn flush_all_dirty(state: &AppState) {
    // PHASE: SNAPSHOT DIRTY SESSIONS
    // WHY: serialize under the lock, then perform I/O lock-free.
    let batches = {
        let sessions = state.sessions.read().await;
        let mut collected = Vec::new();
        for (coupon_id, session) in sessions.iter() {
            if !session.is_dirty() {
                continue;
            }
            match serde_json::to_string(&session.doc) {
                Ok(blob) => collected.push(DirtyFlush { coupon_id: *coupon_id, blob, version: session.version }),
                Err(e) => error!(%coupon_id, error = %e, "design serialization failed; skipping flush"),
            }
        }
        collected
    };

    // PHASE: FLUSH PER SESSION + ACK VERSIONS
    // WHY: if a flush fails we intentionally keep the dirty state for retry.
    for batch in batches {
        match flush_design(&state.pool, batch.coupon_id, &batch.blob, batch.version).await {
            Ok(()) => ack_flushed(state, batch.coupon_id, batch.version).await,
            Err(e) => {
                error!(error = %e, coupon_id = %batch.coupon_id, "design flush failed");
            }
        }
    }
}

#[cfg(test)]
pub(crate) async fn flush_all_dirty_for_tests(state: &AppState) {
    flush_all_dirty(state).await;
}

#[derive(Debug)]
struct DirtyFlush {
    coupon_id: Uuid,
    blob: String,
    version: i64,
}

async fn ack_flushed(state: &AppState, coupon_id: Uuid, flushed_version: i64) {
    let mut sessions = state.sessions.write().await;
    let Some(session) = sessions.get_mut(&coupon_id) else {
        return;
    };
    // EDGE: edits made after the snapshot keep the session dirty because
    // `version` has already moved past the acked value.
    session.flushed_version = session.flushed_version.max(flushed_version);
}
