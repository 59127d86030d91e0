//! Design state and document: the shared style record, the element
//! collection, and the sparse-update types used for incremental edits.
//!
//! `DesignState` is a flat record of everything the designer sidebar
//! controls — live text, paper size, background fill, fonts, QR color, and
//! per-field visibility toggles. `DesignDocument` pairs it with the element
//! list and is the only owner of both during an editing session: elements
//! are addressed by id, never by shared reference, and every mutation goes
//! through an intention-revealing operation (`move_element`,
//! `resize_element`, `apply_patch`, ...). The whole document serializes as
//! the `{"state": ..., "elements": [...]}` blob persisted on the coupon row.

#[cfg(test)]
#[path = "design_test.rs"]
mod design_test;

use serde::{Deserialize, Serialize};

use crate::consts::{MAX_FONT_SIZE, MIN_FONT_SIZE};
use crate::element::{Bounds, CanvasElement, ElementKind, IconKind, ShapeKind};

/// Canvas paper size. Dimensions are fixed per size; the default matches a
/// square social-media coupon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PaperSize {
    #[default]
    #[serde(rename = "square")]
    Square,
    A4,
    A5,
}

impl PaperSize {
    /// Canvas `(width, height)` in pixels.
    #[must_use]
    pub fn dimensions(self) -> (f64, f64) {
        match self {
            Self::Square => (500.0, 500.0),
            Self::A4 => (600.0, 350.0),
            Self::A5 => (420.0, 297.0),
        }
    }
}

/// Two-color gradient specification for custom backgrounds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradientSpec {
    pub from: String,
    pub to: String,
    /// Gradient direction in degrees.
    pub angle: f64,
}

/// Background fill for the coupon canvas. Internally tagged on `bgType` to
/// match the persisted blob keys.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "bgType", rename_all = "kebab-case")]
pub enum Background {
    /// Solid fill.
    Color {
        #[serde(rename = "bgColor")]
        color: String,
    },
    /// One of the built-in gradients in [`GRADIENT_PRESETS`].
    GradientPreset {
        #[serde(rename = "bgGradientPreset")]
        preset: String,
    },
    /// Custom two-color gradient at a chosen angle.
    GradientCustom {
        #[serde(rename = "bgGradientCustom")]
        gradient: GradientSpec,
    },
}

/// A built-in background gradient.
pub struct GradientPreset {
    pub id: &'static str,
    pub css: &'static str,
}

/// Built-in background gradients offered by the designer.
pub const GRADIENT_PRESETS: &[GradientPreset] = &[
    GradientPreset { id: "spice-mint", css: "linear-gradient(90deg, #d7263d 0%, #2dcdb2 100%)" },
    GradientPreset { id: "blue-violet", css: "linear-gradient(90deg, #2d9cdb 0%, #8f5cff 100%)" },
    GradientPreset { id: "orange-yellow", css: "linear-gradient(90deg, #ff9800 0%, #ffff00 100%)" },
    GradientPreset { id: "mint-green", css: "linear-gradient(90deg, #2dcdb2 0%, #43ea7f 100%)" },
];

/// Shared style, text, and layout choices for one coupon design.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DesignState {
    /// Live title text rendered by the title element.
    pub title: String,
    /// Live coupon code rendered by the QR and code elements.
    pub code: String,
    /// Live description text.
    pub description: String,
    #[serde(default)]
    pub canvas_size: PaperSize,
    #[serde(flatten)]
    pub background: Background,
    pub font_family: String,
    /// Color shared by the QR code, title, and code text.
    pub qr_color: String,
    pub show_title: bool,
    #[serde(rename = "showQR")]
    pub show_qr: bool,
    pub show_code: bool,
    pub show_description: bool,
    pub show_discount: bool,
    pub show_expiry: bool,
    /// Preformatted discount display string, e.g. `20%` or `€5`.
    pub discount: String,
    /// Preformatted expiry display string.
    pub expiry: String,
}

impl Default for DesignState {
    fn default() -> Self {
        Self {
            title: "Coupon Title".to_owned(),
            code: "CODE123".to_owned(),
            description: "Coupon description".to_owned(),
            canvas_size: PaperSize::Square,
            background: Background::Color { color: "#ffffff".to_owned() },
            font_family: "Montserrat".to_owned(),
            qr_color: "#d7263d".to_owned(),
            show_title: true,
            show_qr: true,
            show_code: true,
            show_description: true,
            show_discount: true,
            show_expiry: true,
            discount: String::new(),
            expiry: String::new(),
        }
    }
}

/// Sparse update for a canvas element. Only present fields are applied, and
/// only where they make sense for the element's kind.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    /// New text content (free-text elements).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    /// New fill/text color (free-text, shape, and icon elements).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    /// New font size, clamped to the accepted range (free-text elements).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,
    /// New image data URI (image elements).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub src: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shape: Option<ShapeKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stroke_width: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<IconKind>,
}

/// Sparse update for the shared design state.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub canvas_size: Option<PaperSize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background: Option<Background>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub qr_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub show_title: Option<bool>,
    #[serde(rename = "showQR", skip_serializing_if = "Option::is_none")]
    pub show_qr: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub show_code: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub show_description: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub show_discount: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub show_expiry: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discount: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiry: Option<String>,
}

/// One coupon design: shared state plus the element list.
///
/// The document owns its elements exclusively. Element ids are unique for
/// the lifetime of the document; `add_element` enforces this.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DesignDocument {
    pub state: DesignState,
    pub elements: Vec<CanvasElement>,
}

impl DesignDocument {
    /// New document with the given state and the default element layout.
    #[must_use]
    pub fn new(state: DesignState) -> Self {
        Self { state, elements: Self::default_layout() }
    }

    /// The initial layout: title across the top, QR beneath it, code and
    /// description stacked below, all centered on a square canvas.
    #[must_use]
    pub fn default_layout() -> Vec<CanvasElement> {
        vec![
            CanvasElement { id: "title".into(), x: 100.0, y: 32.0, width: 300.0, height: 60.0, kind: ElementKind::Title },
            CanvasElement { id: "qr".into(), x: 190.0, y: 110.0, width: 120.0, height: 120.0, kind: ElementKind::Qr },
            CanvasElement { id: "code".into(), x: 140.0, y: 240.0, width: 220.0, height: 40.0, kind: ElementKind::Code },
            CanvasElement { id: "desc".into(), x: 60.0, y: 300.0, width: 380.0, height: 40.0, kind: ElementKind::Desc },
        ]
    }

    /// Canvas `(width, height)` for the current paper size.
    #[must_use]
    pub fn canvas_size(&self) -> (f64, f64) {
        self.state.canvas_size.dimensions()
    }

    /// Look up an element by id.
    #[must_use]
    pub fn element(&self, id: &str) -> Option<&CanvasElement> {
        self.elements.iter().find(|el| el.id == id)
    }

    fn element_mut(&mut self, id: &str) -> Option<&mut CanvasElement> {
        self.elements.iter_mut().find(|el| el.id == id)
    }

    /// Bounding boxes of every element except `id`, in document order. This
    /// is the "other elements" input to the snap engine and the alignment
    /// detector.
    #[must_use]
    pub fn other_bounds(&self, id: &str) -> Vec<Bounds> {
        self.elements
            .iter()
            .filter(|el| el.id != id)
            .map(CanvasElement::bounds)
            .collect()
    }

    /// Append an element. Returns false (and leaves the document unchanged)
    /// if another element already has the same id.
    pub fn add_element(&mut self, element: CanvasElement) -> bool {
        if self.element(&element.id).is_some() {
            return false;
        }
        self.elements.push(element);
        true
    }

    /// Remove an element by id, returning it if it was present.
    pub fn remove_element(&mut self, id: &str) -> Option<CanvasElement> {
        let index = self.elements.iter().position(|el| el.id == id)?;
        Some(self.elements.remove(index))
    }

    /// Commit a new top-left position. Returns false if the element doesn't
    /// exist.
    pub fn move_element(&mut self, id: &str, x: f64, y: f64) -> bool {
        let Some(el) = self.element_mut(id) else {
            return false;
        };
        el.x = x;
        el.y = y;
        true
    }

    /// Commit a new size. Returns false if the element doesn't exist.
    pub fn resize_element(&mut self, id: &str, width: f64, height: f64) -> bool {
        let Some(el) = self.element_mut(id) else {
            return false;
        };
        el.width = width;
        el.height = height;
        true
    }

    /// Apply a sparse element update. Geometry fields apply to any kind;
    /// style fields apply only where the kind carries them. Returns false if
    /// the element doesn't exist.
    pub fn apply_patch(&mut self, id: &str, patch: &ElementPatch) -> bool {
        let Some(el) = self.element_mut(id) else {
            return false;
        };
        if let Some(x) = patch.x {
            el.x = x;
        }
        if let Some(y) = patch.y {
            el.y = y;
        }
        if let Some(w) = patch.width {
            el.width = w;
        }
        if let Some(h) = patch.height {
            el.height = h;
        }
        match &mut el.kind {
            ElementKind::CustomText { content, color, font_size, font_family } => {
                if let Some(new) = &patch.content {
                    content.clone_from(new);
                }
                if let Some(new) = &patch.color {
                    color.clone_from(new);
                }
                if let Some(new) = patch.font_size {
                    *font_size = new.clamp(MIN_FONT_SIZE, MAX_FONT_SIZE);
                }
                if let Some(new) = &patch.font_family {
                    font_family.clone_from(new);
                }
            }
            ElementKind::CustomImage { src } => {
                if let Some(new) = &patch.src {
                    src.clone_from(new);
                }
            }
            ElementKind::Shape { shape, color, stroke_width } => {
                if let Some(new) = patch.shape {
                    *shape = new;
                }
                if let Some(new) = &patch.color {
                    color.clone_from(new);
                }
                if let Some(new) = patch.stroke_width {
                    *stroke_width = Some(new);
                }
            }
            ElementKind::Icon { icon, color } => {
                if let Some(new) = patch.icon {
                    *icon = new;
                }
                if let Some(new) = &patch.color {
                    color.clone_from(new);
                }
            }
            ElementKind::Title | ElementKind::Qr | ElementKind::Code | ElementKind::Desc => {}
        }
        true
    }

    /// Apply a sparse design-state update.
    pub fn apply_state_patch(&mut self, patch: &StatePatch) {
        let state = &mut self.state;
        if let Some(title) = &patch.title {
            state.title.clone_from(title);
        }
        if let Some(code) = &patch.code {
            state.code.clone_from(code);
        }
        if let Some(description) = &patch.description {
            state.description.clone_from(description);
        }
        if let Some(size) = patch.canvas_size {
            state.canvas_size = size;
        }
        if let Some(background) = &patch.background {
            state.background = background.clone();
        }
        if let Some(font_family) = &patch.font_family {
            state.font_family.clone_from(font_family);
        }
        if let Some(qr_color) = &patch.qr_color {
            state.qr_color.clone_from(qr_color);
        }
        if let Some(v) = patch.show_title {
            state.show_title = v;
        }
        if let Some(v) = patch.show_qr {
            state.show_qr = v;
        }
        if let Some(v) = patch.show_code {
            state.show_code = v;
        }
        if let Some(v) = patch.show_description {
            state.show_description = v;
        }
        if let Some(v) = patch.show_discount {
            state.show_discount = v;
        }
        if let Some(v) = patch.show_expiry {
            state.show_expiry = v;
        }
        if let Some(discount) = &patch.discount {
            state.discount.clone_from(discount);
        }
        if let Some(expiry) = &patch.expiry {
            state.expiry.clone_from(expiry);
        }
    }
}

impl Default for DesignDocument {
    fn default() -> Self {
        Self::new(DesignState::default())
    }
}
