//! Hygiene — scans the designer crate's production sources for patterns the
//! crate promises not to contain. The geometry layer is pure and infallible,
//! so every budget is zero.

use std::fs;
use std::path::Path;

/// `(pattern, description)` pairs that must not appear in `src/` outside of
/// `_test.rs` files.
const FORBIDDEN: &[(&str, &str)] = &[
    (".unwrap()", "panicking unwrap"),
    (".expect(", "panicking expect"),
    ("panic!(", "explicit panic"),
    ("unreachable!(", "unreachable assertion"),
    ("todo!(", "unimplemented stub"),
    ("unimplemented!(", "unimplemented stub"),
    ("let _ =", "silently discarded result"),
    (".ok()", "silently discarded error"),
    ("#[allow(dead_code)]", "suppressed dead code"),
];

fn production_sources(dir: &Path, out: &mut Vec<(String, String)>) {
    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            production_sources(&path, out);
            continue;
        }
        let name = path.to_string_lossy().to_string();
        if !name.ends_with(".rs") || name.ends_with("_test.rs") {
            continue;
        }
        if let Ok(content) = fs::read_to_string(&path) {
            out.push((name, content));
        }
    }
}

#[test]
fn production_sources_are_clean() {
    let mut files = Vec::new();
    production_sources(Path::new("src"), &mut files);
    assert!(!files.is_empty(), "no sources found — run from the crate root");

    let mut violations = Vec::new();
    for (path, content) in &files {
        for (pattern, description) in FORBIDDEN {
            for (line_no, line) in content.lines().enumerate() {
                if line.contains(pattern) {
                    violations.push(format!("{path}:{} — {description} ({pattern})", line_no + 1));
                }
            }
        }
    }

    assert!(violations.is_empty(), "hygiene violations:\n{}", violations.join("\n"));
}
