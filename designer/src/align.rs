//! Equal-spacing alignment guides, in the style of presentation-software
//! smart guides.
//!
//! After a drag position has been snapped, this pass looks for pairs of
//! other elements that sit at (nearly) the same distance from the moved
//! element along one side — left, right, top, or bottom. Each such pair
//! yields two guide segments linking the pair members to the moved element,
//! so the UI can hint that the spacing is equal. The guide list is replaced
//! wholesale on every drag event; nothing is incremental.
//!
//! The scan is O(n²) per axis per event, which is fine for the single-digit
//! element counts a coupon canvas carries.

#[cfg(test)]
#[path = "align_test.rs"]
mod align_test;

use serde::Serialize;

use crate::consts::ALIGN_TOLERANCE;
use crate::element::Bounds;

/// One guide line segment in canvas coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GuideSegment {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

/// Which edge of a bounding box a distance is measured from.
#[derive(Clone, Copy)]
enum Side {
    Left,
    Right,
    Top,
    Bottom,
}

impl Side {
    fn coord(self, bounds: &Bounds) -> f64 {
        match self {
            Self::Left => bounds.x,
            Self::Right => bounds.right(),
            Self::Top => bounds.y,
            Self::Bottom => bounds.bottom(),
        }
    }
}

/// Detect equal-spacing guides for a moved element against all others.
///
/// Runs independently for the {left, right} sides on the X axis and the
/// {top, bottom} sides on the Y axis. A pair of other elements whose
/// distances to the moved element's side differ by at most
/// [`ALIGN_TOLERANCE`] (and whose first distance is nonzero) contributes two
/// segments, one per pair member.
#[must_use]
pub fn alignment_guides(moved: &Bounds, others: &[Bounds]) -> Vec<GuideSegment> {
    let mut segments = Vec::new();

    for side in [Side::Left, Side::Right] {
        let moved_x = side.coord(moved);
        // Distance from each other element's matching side, in document order.
        let dists: Vec<(f64, f64)> = others
            .iter()
            .map(|other| {
                let other_x = side.coord(other);
                ((moved_x - other_x).abs(), other_x)
            })
            .collect();
        for i in 0..dists.len() {
            for j in (i + 1)..dists.len() {
                if (dists[i].0 - dists[j].0).abs() <= ALIGN_TOLERANCE && dists[i].0 > 0.0 {
                    segments.push(GuideSegment { x1: dists[i].1, y1: others[i].y, x2: moved_x, y2: moved.y });
                    segments.push(GuideSegment { x1: dists[j].1, y1: others[j].y, x2: moved_x, y2: moved.y });
                }
            }
        }
    }

    for side in [Side::Top, Side::Bottom] {
        let moved_y = side.coord(moved);
        let dists: Vec<(f64, f64)> = others
            .iter()
            .map(|other| {
                let other_y = side.coord(other);
                ((moved_y - other_y).abs(), other_y)
            })
            .collect();
        for i in 0..dists.len() {
            for j in (i + 1)..dists.len() {
                if (dists[i].0 - dists[j].0).abs() <= ALIGN_TOLERANCE && dists[i].0 > 0.0 {
                    segments.push(GuideSegment { x1: others[i].x, y1: dists[i].1, x2: moved.x, y2: moved_y });
                    segments.push(GuideSegment { x1: others[j].x, y1: dists[j].1, x2: moved.x, y2: moved_y });
                }
            }
        }
    }

    segments
}
