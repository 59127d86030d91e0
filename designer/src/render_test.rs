#![allow(clippy::float_cmp)]

use super::*;
use crate::design::{DesignDocument, GradientSpec};
use crate::element::CanvasElement;

fn doc() -> DesignDocument {
    DesignDocument::default()
}

fn node_texts(tree: &RenderTree) -> Vec<&str> {
    tree.nodes
        .iter()
        .filter_map(|n| match &n.content {
            NodeContent::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
        .collect()
}

// =============================================================
// Background resolution
// =============================================================

#[test]
fn solid_color_background() {
    let state = DesignState::default();
    assert_eq!(resolve_background(&state), "#ffffff");
}

#[test]
fn preset_background_resolves_css() {
    let mut state = DesignState::default();
    state.background = Background::GradientPreset { preset: "blue-violet".into() };
    assert_eq!(resolve_background(&state), "linear-gradient(90deg, #2d9cdb 0%, #8f5cff 100%)");
}

#[test]
fn unknown_preset_falls_back_to_first() {
    let mut state = DesignState::default();
    state.background = Background::GradientPreset { preset: "no-such-preset".into() };
    assert_eq!(resolve_background(&state), GRADIENT_PRESETS[0].css);
}

#[test]
fn custom_gradient_formats_css() {
    let mut state = DesignState::default();
    state.background = Background::GradientCustom {
        gradient: GradientSpec { from: "#d7263d".into(), to: "#2d9cdb".into(), angle: 45.0 },
    };
    assert_eq!(resolve_background(&state), "linear-gradient(45deg, #d7263d 0%, #2d9cdb 100%)");
}

// =============================================================
// Fixed-role elements
// =============================================================

#[test]
fn default_document_renders_all_fixed_roles() {
    let tree = render(&doc());
    assert_eq!(tree.width, 500.0);
    assert_eq!(tree.height, 500.0);
    // 4 fixed elements + discount + expiry footer lines.
    assert_eq!(tree.nodes.len(), 6);
}

#[test]
fn title_inherits_shared_style() {
    let mut d = doc();
    d.state.title = "Welcome Deal".into();
    d.state.font_family = "Georgia".into();
    d.state.qr_color = "#112233".into();
    let tree = render(&d);
    let title = &tree.nodes[0];
    assert_eq!((title.x, title.y), (100.0, 32.0));
    match &title.content {
        NodeContent::Text { text, color, font_size, font_family } => {
            assert_eq!(text, "Welcome Deal");
            assert_eq!(color, "#112233");
            assert_eq!(*font_size, 32.0);
            assert_eq!(font_family, "Georgia");
        }
        other => panic!("wrong node: {other:?}"),
    }
}

#[test]
fn qr_node_carries_code_and_color() {
    let mut d = doc();
    d.state.code = "WELCOME20".into();
    let tree = render(&d);
    assert!(tree.nodes.iter().any(|n| matches!(
        &n.content,
        NodeContent::Qr { data, color } if data == "WELCOME20" && color == "#d7263d"
    )));
}

#[test]
fn code_renders_monospace() {
    let tree = render(&doc());
    assert!(tree.nodes.iter().any(|n| matches!(
        &n.content,
        NodeContent::Text { text, font_family, font_size, .. }
            if text == "CODE123" && font_family == "monospace" && *font_size == 20.0
    )));
}

#[test]
fn hidden_toggles_suppress_nodes() {
    let mut d = doc();
    d.state.show_qr = false;
    d.state.show_description = false;
    let tree = render(&d);
    assert!(!tree.nodes.iter().any(|n| matches!(n.content, NodeContent::Qr { .. })));
    // title + code + 2 footer lines remain.
    assert_eq!(tree.nodes.len(), 4);
}

#[test]
fn hidden_element_keeps_its_layout_slot() {
    let mut d = doc();
    d.state.show_title = false;
    let before = d.element("title").unwrap().clone();
    let tree = render(&d);
    assert_eq!(tree.nodes.len(), 5);
    assert_eq!(d.element("title").unwrap(), &before);
}

// =============================================================
// Free elements
// =============================================================

#[test]
fn custom_text_uses_own_typography() {
    let mut d = doc();
    d.add_element(CanvasElement {
        id: "text1".into(),
        x: 10.0,
        y: 20.0,
        width: 100.0,
        height: 30.0,
        kind: ElementKind::CustomText {
            content: "Happy hour".into(),
            color: "#00ff00".into(),
            font_size: 14.0,
            font_family: "Courier New".into(),
        },
    });
    let tree = render(&d);
    assert!(tree.nodes.iter().any(|n| matches!(
        &n.content,
        NodeContent::Text { text, color, font_size, font_family }
            if text == "Happy hour" && color == "#00ff00" && *font_size == 14.0 && font_family == "Courier New"
    )));
}

#[test]
fn icon_size_is_min_of_box() {
    let mut d = doc();
    d.add_element(CanvasElement {
        id: "star1".into(),
        x: 0.0,
        y: 0.0,
        width: 64.0,
        height: 48.0,
        kind: ElementKind::Icon { icon: IconKind::Star, color: "#d7263d".into() },
    });
    let tree = render(&d);
    assert!(tree.nodes.iter().any(|n| matches!(
        &n.content,
        NodeContent::Icon { icon: IconKind::Star, size, .. } if *size == 48.0
    )));
}

#[test]
fn empty_image_src_passes_through() {
    let mut d = doc();
    d.add_element(CanvasElement {
        id: "img1".into(),
        x: 80.0,
        y: 120.0,
        width: 100.0,
        height: 100.0,
        kind: ElementKind::CustomImage { src: String::new() },
    });
    let tree = render(&d);
    assert!(tree.nodes.iter().any(|n| matches!(
        &n.content,
        NodeContent::Image { src } if src.is_empty()
    )));
}

// =============================================================
// Footer band
// =============================================================

#[test]
fn footer_lines_follow_toggles() {
    let mut d = doc();
    d.state.discount = "20%".into();
    d.state.expiry = "31/12/2026".into();
    let tree = render(&d);
    let texts = node_texts(&tree);
    assert!(texts.contains(&"Discount: 20%"));
    assert!(texts.contains(&"Expires: 31/12/2026"));

    d.state.show_discount = false;
    d.state.show_expiry = false;
    let tree = render(&d);
    let texts = node_texts(&tree);
    assert!(!texts.iter().any(|t| t.starts_with("Discount:")));
    assert!(!texts.iter().any(|t| t.starts_with("Expires:")));
}

#[test]
fn footer_sits_in_bottom_band() {
    let tree = render(&doc());
    let footer: Vec<_> = tree
        .nodes
        .iter()
        .filter(|n| match &n.content {
            NodeContent::Text { text, .. } => text.starts_with("Discount:") || text.starts_with("Expires:"),
            _ => false,
        })
        .collect();
    assert_eq!(footer.len(), 2);
    assert!(footer.iter().all(|n| n.y > 400.0));
}

// =============================================================
// WYSIWYG: editor and preview share the tree
// =============================================================

#[test]
fn render_is_deterministic() {
    let mut d = doc();
    d.state.background = Background::GradientPreset { preset: "spice-mint".into() };
    d.add_element(CanvasElement {
        id: "rect1".into(),
        x: 120.0,
        y: 120.0,
        width: 120.0,
        height: 80.0,
        kind: ElementKind::Shape { shape: ShapeKind::Rect, color: "#2d9cdb".into(), stroke_width: None },
    });
    assert_eq!(render(&d), render(&d));
}

#[test]
fn paper_size_changes_tree_dimensions() {
    let mut d = doc();
    d.state.canvas_size = crate::design::PaperSize::A4;
    let tree = render(&d);
    assert_eq!((tree.width, tree.height), (600.0, 350.0));
}
