#![allow(clippy::float_cmp)]

use super::*;

fn boxes(xs: &[f64]) -> Vec<Bounds> {
    xs.iter().map(|&x| Bounds::new(x, 100.0, 40.0, 40.0)).collect()
}

// =============================================================
// X axis
// =============================================================

#[test]
fn equidistant_left_edges_emit_paired_segments() {
    // Moved element's left edge at 51; others at 1 and 101 — both 50 away.
    let moved = Bounds::new(51.0, 200.0, 40.0, 40.0);
    let others = boxes(&[1.0, 101.0]);
    let guides = alignment_guides(&moved, &others);

    assert!(guides.len() >= 2);
    assert!(guides.iter().any(|g| g.x1 == 1.0 && g.x2 == 51.0));
    assert!(guides.iter().any(|g| g.x1 == 101.0 && g.x2 == 51.0));
}

#[test]
fn within_tolerance_still_pairs() {
    // Distances 50 and 51.5 differ by 1.5 <= tolerance 2.
    let moved = Bounds::new(51.0, 200.0, 40.0, 40.0);
    let others = boxes(&[1.0, 102.5]);
    let guides = alignment_guides(&moved, &others);
    assert!(!guides.is_empty());
}

#[test]
fn outside_tolerance_is_empty() {
    // Horizontal distances 50 and 60 differ by 10; vertical spacings are
    // likewise unequal, so no side pairs at all.
    let moved = Bounds::new(51.0, 200.0, 40.0, 40.0);
    let others = vec![Bounds::new(1.0, 100.0, 40.0, 40.0), Bounds::new(111.0, 170.0, 40.0, 40.0)];
    let guides = alignment_guides(&moved, &others);
    assert!(guides.is_empty());
}

#[test]
fn zero_distance_pairs_are_suppressed() {
    // Both others coincide with the moved element: every side distance is
    // zero, which never counts as equal spacing.
    let moved = Bounds::new(51.0, 200.0, 40.0, 40.0);
    let others = vec![Bounds::new(51.0, 200.0, 40.0, 40.0), Bounds::new(51.0, 200.0, 40.0, 40.0)];
    assert!(alignment_guides(&moved, &others).is_empty());
}

#[test]
fn right_edges_pair_independently_of_left() {
    // Right edges: moved at 150; others at 100 and 200 — both 50 away.
    // Left edges: 110 vs 60/160, also 50 apart, so both sides contribute.
    let moved = Bounds::new(110.0, 200.0, 40.0, 40.0);
    let others = vec![Bounds::new(60.0, 100.0, 40.0, 40.0), Bounds::new(160.0, 100.0, 40.0, 40.0)];
    let guides = alignment_guides(&moved, &others);
    assert!(guides.iter().any(|g| g.x1 == 100.0 && g.x2 == 150.0));
    assert!(guides.iter().any(|g| g.x1 == 200.0 && g.x2 == 150.0));
}

// =============================================================
// Y axis
// =============================================================

#[test]
fn equidistant_top_edges_emit_paired_segments() {
    let moved = Bounds::new(200.0, 80.0, 40.0, 40.0);
    let others = vec![Bounds::new(10.0, 30.0, 40.0, 40.0), Bounds::new(300.0, 130.0, 40.0, 40.0)];
    let guides = alignment_guides(&moved, &others);
    assert!(guides.iter().any(|g| g.y1 == 30.0 && g.y2 == 80.0));
    assert!(guides.iter().any(|g| g.y1 == 130.0 && g.y2 == 80.0));
}

#[test]
fn vertical_spacing_outside_tolerance_is_empty() {
    let moved = Bounds::new(200.0, 80.0, 40.0, 40.0);
    let others = vec![Bounds::new(10.0, 30.0, 40.0, 40.0), Bounds::new(300.0, 170.0, 40.0, 40.0)];
    let y_guides: Vec<_> = alignment_guides(&moved, &others)
        .into_iter()
        .filter(|g| g.y2 == 80.0 || g.y2 == 120.0)
        .collect();
    assert!(y_guides.is_empty());
}

// =============================================================
// General shape
// =============================================================

#[test]
fn fewer_than_two_others_yields_nothing() {
    let moved = Bounds::new(51.0, 200.0, 40.0, 40.0);
    assert!(alignment_guides(&moved, &[]).is_empty());
    assert!(alignment_guides(&moved, &boxes(&[1.0])).is_empty());
}

#[test]
fn three_way_spacing_links_all_pairs() {
    // Moved left edge at 52: distances to others at 0, 2, 102 are 52, 50, 50.
    // All three pairs fall within tolerance; vertical spacings stay unequal
    // so only the X sides contribute.
    let moved = Bounds::new(52.0, 200.0, 40.0, 40.0);
    let others = vec![
        Bounds::new(0.0, 100.0, 40.0, 40.0),
        Bounds::new(2.0, 160.0, 40.0, 40.0),
        Bounds::new(102.0, 130.0, 40.0, 40.0),
    ];
    let guides = alignment_guides(&moved, &others);
    // Three pairs, two segments each, on the left side alone.
    let left_side: Vec<_> = guides.iter().filter(|g| g.x2 == 52.0).collect();
    assert_eq!(left_side.len(), 6);
}

#[test]
fn segments_reference_moved_top_left() {
    let moved = Bounds::new(51.0, 222.0, 40.0, 40.0);
    let others = boxes(&[1.0, 101.0]);
    let guides = alignment_guides(&moved, &others);
    assert!(guides.iter().all(|g| g.y2 == 222.0 || g.x2 == 51.0));
}
