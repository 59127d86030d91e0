//! Magnetic snapping of a dragged element to nearby guide coordinates.
//!
//! While an element is dragged, its nine snap points are compared against
//! two target sets per axis: the canvas's own guide coordinates (edges and
//! center line) and the nine snap points of every other element. The single
//! closest target per axis wins; if it lies within [`SNAP_RADIUS`], the
//! proposed position is shifted so the candidate point lands exactly on the
//! target. Axes are resolved independently — a drag can snap on X while
//! moving freely on Y.
//!
//! This is a pure computation with no failure mode: "no snap found" is a
//! normal outcome, not an error.

#[cfg(test)]
#[path = "snap_test.rs"]
mod snap_test;

use crate::consts::SNAP_RADIUS;
use crate::element::{Bounds, Point};

/// Outcome of one snap pass.
#[derive(Debug, Clone, PartialEq)]
pub struct SnapResult {
    /// Corrected left edge. Equals the proposed left edge if X didn't snap.
    pub left: f64,
    /// Corrected top edge. Equals the proposed top edge if Y didn't snap.
    pub top: f64,
    /// Canvas-space X coordinates of vertical guide lines to draw. Empty if
    /// the X axis didn't snap.
    pub guides_x: Vec<f64>,
    /// Canvas-space Y coordinates of horizontal guide lines to draw. Empty
    /// if the Y axis didn't snap.
    pub guides_y: Vec<f64>,
}

impl SnapResult {
    /// True if either axis snapped.
    #[must_use]
    pub fn snapped(&self) -> bool {
        !self.guides_x.is_empty() || !self.guides_y.is_empty()
    }
}

/// Per-axis best candidate: the target coordinate and the snap point that
/// reached it.
struct AxisHit {
    target: f64,
    point: Point,
}

/// Compute the snapped position for an element at a proposed location.
///
/// `proposed` is the dragged element's bounding box at the pointer position;
/// `others` are the bounding boxes of every other element on the canvas.
/// Ties between equally close candidates keep the first encountered in
/// point-then-target iteration order (corners, edge midpoints, center;
/// canvas targets before element targets).
#[must_use]
pub fn snap_position(proposed: &Bounds, others: &[Bounds], canvas_width: f64, canvas_height: f64) -> SnapResult {
    let points = proposed.snap_points();

    // Canvas guide coordinates: both edges and the center line, per axis.
    let main_x = [0.0, canvas_width / 2.0, canvas_width];
    let main_y = [0.0, canvas_height / 2.0, canvas_height];

    let mut target_x: Vec<f64> = main_x.to_vec();
    let mut target_y: Vec<f64> = main_y.to_vec();
    for other in others {
        for pt in other.snap_points() {
            target_x.push(pt.x);
            target_y.push(pt.y);
        }
    }

    // Global per-axis minimum across all nine points. Strict `<` keeps the
    // first point/target pair that reaches the minimum.
    let mut min_dist_x = SNAP_RADIUS + 1.0;
    let mut min_dist_y = SNAP_RADIUS + 1.0;
    let mut hit_x: Option<AxisHit> = None;
    let mut hit_y: Option<AxisHit> = None;
    for pt in points {
        for &gx in &target_x {
            let dist = (pt.x - gx).abs();
            if dist < min_dist_x {
                min_dist_x = dist;
                hit_x = Some(AxisHit { target: gx, point: pt });
            }
        }
        for &gy in &target_y {
            let dist = (pt.y - gy).abs();
            if dist < min_dist_y {
                min_dist_y = dist;
                hit_y = Some(AxisHit { target: gy, point: pt });
            }
        }
    }

    let mut left = proposed.x;
    let mut top = proposed.y;
    let mut guides_x = Vec::new();
    let mut guides_y = Vec::new();

    if let Some(hit) = hit_x {
        if min_dist_x <= SNAP_RADIUS {
            left += hit.target - hit.point.x;
            guides_x.push(hit.target);
        }
    }
    if let Some(hit) = hit_y {
        if min_dist_y <= SNAP_RADIUS {
            top += hit.target - hit.point.y;
            guides_y.push(hit.target);
        }
    }

    SnapResult { left, top, guides_x, guides_y }
}
