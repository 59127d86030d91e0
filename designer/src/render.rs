//! Read-path renderer: maps a design document to absolutely positioned
//! visual nodes.
//!
//! This is a pure function of the document. The interactive editor and the
//! read-only preview/export views consume the same tree, so what the editor
//! shows is exactly what gets exported — the only difference is whether the
//! host attaches interaction handlers. Fixed-role elements pull their text
//! and colors from the shared design state; a hidden toggle suppresses the
//! node without touching the element's place in the layout.

#[cfg(test)]
#[path = "render_test.rs"]
mod render_test;

use serde::Serialize;

use crate::consts::{CODE_FONT_SIZE, DESCRIPTION_FONT_SIZE, TITLE_FONT_SIZE};
use crate::design::{Background, DesignDocument, DesignState, GRADIENT_PRESETS};
use crate::element::{ElementKind, IconKind, ShapeKind};

/// Footer band inset from the canvas edges.
const FOOTER_MARGIN: f64 = 32.0;

/// Height reserved for the footer discount/expiry line.
const FOOTER_HEIGHT: f64 = 20.0;

/// Distance from the canvas bottom to the footer band's bottom edge.
const FOOTER_BOTTOM: f64 = 24.0;

/// Visual payload of one rendered node.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum NodeContent {
    #[serde(rename_all = "camelCase")]
    Text {
        text: String,
        color: String,
        font_size: f64,
        font_family: String,
    },
    /// QR payload; pixel generation is the host's concern.
    Qr { data: String, color: String },
    Image { src: String },
    #[serde(rename_all = "camelCase")]
    Shape {
        shape: ShapeKind,
        color: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        stroke_width: Option<f64>,
    },
    Icon { icon: IconKind, size: f64, color: String },
}

/// One absolutely positioned visual node.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderNode {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    #[serde(flatten)]
    pub content: NodeContent,
}

/// The rendered canvas: dimensions, resolved background, and nodes in draw
/// order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderTree {
    pub width: f64,
    pub height: f64,
    /// CSS background value: a color or a `linear-gradient(...)`.
    pub background: String,
    pub nodes: Vec<RenderNode>,
}

/// Resolve the design's background to a CSS value. An unknown preset id
/// falls back to the first built-in gradient.
#[must_use]
pub fn resolve_background(state: &DesignState) -> String {
    match &state.background {
        Background::Color { color } => color.clone(),
        Background::GradientPreset { preset } => GRADIENT_PRESETS
            .iter()
            .find(|p| p.id == preset)
            .unwrap_or(&GRADIENT_PRESETS[0])
            .css
            .to_owned(),
        Background::GradientCustom { gradient } => {
            format!("linear-gradient({}deg, {} 0%, {} 100%)", gradient.angle, gradient.from, gradient.to)
        }
    }
}

/// Render a document to its visual tree.
#[must_use]
pub fn render(doc: &DesignDocument) -> RenderTree {
    let (width, height) = doc.canvas_size();
    let state = &doc.state;
    let mut nodes = Vec::with_capacity(doc.elements.len() + 2);

    for el in &doc.elements {
        let content = match &el.kind {
            ElementKind::Title => {
                if !state.show_title {
                    continue;
                }
                NodeContent::Text {
                    text: state.title.clone(),
                    color: state.qr_color.clone(),
                    font_size: TITLE_FONT_SIZE,
                    font_family: state.font_family.clone(),
                }
            }
            ElementKind::Qr => {
                if !state.show_qr {
                    continue;
                }
                NodeContent::Qr { data: state.code.clone(), color: state.qr_color.clone() }
            }
            ElementKind::Code => {
                if !state.show_code {
                    continue;
                }
                NodeContent::Text {
                    text: state.code.clone(),
                    color: state.qr_color.clone(),
                    font_size: CODE_FONT_SIZE,
                    font_family: "monospace".to_owned(),
                }
            }
            ElementKind::Desc => {
                if !state.show_description {
                    continue;
                }
                NodeContent::Text {
                    text: state.description.clone(),
                    color: "#222".to_owned(),
                    font_size: DESCRIPTION_FONT_SIZE,
                    font_family: state.font_family.clone(),
                }
            }
            ElementKind::CustomText { content, color, font_size, font_family } => NodeContent::Text {
                text: content.clone(),
                color: color.clone(),
                font_size: *font_size,
                font_family: font_family.clone(),
            },
            ElementKind::CustomImage { src } => NodeContent::Image { src: src.clone() },
            ElementKind::Shape { shape, color, stroke_width } => {
                NodeContent::Shape { shape: *shape, color: color.clone(), stroke_width: *stroke_width }
            }
            ElementKind::Icon { icon, color } => {
                NodeContent::Icon { icon: *icon, size: el.width.min(el.height), color: color.clone() }
            }
        };
        nodes.push(RenderNode { x: el.x, y: el.y, width: el.width, height: el.height, content });
    }

    // Footer band: discount pinned bottom-left, expiry bottom-right.
    let footer_y = height - FOOTER_BOTTOM - FOOTER_HEIGHT;
    let footer_width = (width - 2.0 * FOOTER_MARGIN) / 2.0;
    if state.show_discount {
        nodes.push(RenderNode {
            x: FOOTER_MARGIN,
            y: footer_y,
            width: footer_width,
            height: FOOTER_HEIGHT,
            content: NodeContent::Text {
                text: format!("Discount: {}", state.discount),
                color: "#222".to_owned(),
                font_size: 16.0,
                font_family: state.font_family.clone(),
            },
        });
    }
    if state.show_expiry {
        nodes.push(RenderNode {
            x: FOOTER_MARGIN + footer_width,
            y: footer_y,
            width: footer_width,
            height: FOOTER_HEIGHT,
            content: NodeContent::Text {
                text: format!("Expires: {}", state.expiry),
                color: "#222".to_owned(),
                font_size: 16.0,
                font_family: state.font_family.clone(),
            },
        });
    }

    RenderTree { width, height, background: resolve_background(state), nodes }
}
