//! Shared numeric constants for the designer crate.

// ── Snapping ────────────────────────────────────────────────────

/// Maximum distance in canvas pixels at which a candidate snap point is
/// pulled onto a target coordinate.
pub const SNAP_RADIUS: f64 = 5.0;

/// Maximum difference between two element distances for them to count as
/// equally spaced from the moved element.
pub const ALIGN_TOLERANCE: f64 = 2.0;

// ── Text ────────────────────────────────────────────────────────

/// Smallest font size accepted for free-text elements.
pub const MIN_FONT_SIZE: f64 = 8.0;

/// Largest font size accepted for free-text elements.
pub const MAX_FONT_SIZE: f64 = 64.0;

// ── Fixed-role typography ───────────────────────────────────────

/// Font size of the coupon title element.
pub const TITLE_FONT_SIZE: f64 = 32.0;

/// Font size of the coupon code element.
pub const CODE_FONT_SIZE: f64 = 20.0;

/// Font size of the description element.
pub const DESCRIPTION_FONT_SIZE: f64 = 18.0;
