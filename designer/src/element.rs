//! Element model: canvas elements, their variant data, and bounding-box
//! geometry.
//!
//! Every positionable item on the coupon canvas is a `CanvasElement`: a
//! bounding box plus an `ElementKind` discriminant. Fixed-role kinds (title,
//! QR, code, description) carry no data of their own — their displayed
//! content is derived from the shared [`crate::design::DesignState`] at
//! render time. Free kinds (text, image, shape, icon) carry their own style
//! fields. The serde shape matches the persisted design blob: a flat object
//! with a `"type"` tag and camelCase fields.

#[cfg(test)]
#[path = "element_test.rs"]
mod element_test;

use serde::{Deserialize, Serialize};

/// Unique identifier for a canvas element within one design document.
pub type ElementId = String;

/// A 2D point in canvas-local pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// Axis-aligned bounding box in canvas-local pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    /// Left edge.
    pub x: f64,
    /// Top edge.
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Bounds {
    #[must_use]
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    /// X coordinate of the right edge.
    #[must_use]
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Y coordinate of the bottom edge.
    #[must_use]
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// The nine snap points of this box, in fixed order: four corners, four
    /// edge midpoints, center. Snap resolution depends on this order — the
    /// first point to reach the minimum distance wins ties.
    #[must_use]
    pub fn snap_points(&self) -> [Point; 9] {
        let Self { x, y, width, height } = *self;
        [
            // Corners
            Point { x, y },
            Point { x: x + width, y },
            Point { x, y: y + height },
            Point { x: x + width, y: y + height },
            // Edge midpoints
            Point { x: x + width / 2.0, y },
            Point { x: x + width, y: y + height / 2.0 },
            Point { x: x + width / 2.0, y: y + height },
            Point { x, y: y + height / 2.0 },
            // Center
            Point { x: x + width / 2.0, y: y + height / 2.0 },
        ]
    }
}

/// Geometric primitive drawn by a shape element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    Rect,
    Circle,
    Line,
}

/// Decorative icon identifier. Wire names keep the icon-set identifiers the
/// design blob has always stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IconKind {
    #[serde(rename = "FaStar")]
    Star,
    #[serde(rename = "FaHeart")]
    Heart,
    #[serde(rename = "FaGift")]
    Gift,
    #[serde(rename = "FaCheck")]
    Check,
    #[serde(rename = "FaSmile")]
    Smile,
}

/// Variant data for a canvas element. Internally tagged so the wire format
/// stays the flat `{"type": "...", ...}` object of the design blob.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ElementKind {
    /// Coupon title; text and color come from the design state.
    Title,
    /// QR code carrying the coupon code.
    Qr,
    /// Coupon code rendered as monospace text.
    Code,
    /// Coupon description.
    Desc,
    /// Free-form text with its own typography.
    #[serde(rename_all = "camelCase")]
    CustomText {
        content: String,
        color: String,
        font_size: f64,
        font_family: String,
    },
    /// Uploaded image; `src` is a data URI, or empty until one is uploaded.
    CustomImage { src: String },
    /// Filled geometric shape.
    #[serde(rename_all = "camelCase")]
    Shape {
        shape: ShapeKind,
        color: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        stroke_width: Option<f64>,
    },
    /// Decorative icon.
    Icon { icon: IconKind, color: String },
}

/// One positionable, resizable item on the coupon canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanvasElement {
    /// Unique within the owning document for the lifetime of a session. An
    /// empty id is a request for the owner to assign one.
    #[serde(default)]
    pub id: ElementId,
    /// Left edge of the bounding box.
    pub x: f64,
    /// Top edge of the bounding box.
    pub y: f64,
    pub width: f64,
    pub height: f64,
    #[serde(flatten)]
    pub kind: ElementKind,
}

impl CanvasElement {
    /// The element's bounding box.
    #[must_use]
    pub fn bounds(&self) -> Bounds {
        Bounds { x: self.x, y: self.y, width: self.width, height: self.height }
    }
}
