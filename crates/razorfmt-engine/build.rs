//! Turns every `src/fixtures/<name>.razor` + `<name>.formatted` pair into a
//! `#[test]` that embeds both files with `include_str!`.

use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

const FIXTURE_DIR: &str = "src/fixtures";

#[derive(Default)]
struct Pair {
    source: Option<PathBuf>,
    expected: Option<PathBuf>,
}

/// Fixture stems are free-form file names; test names must be identifiers.
fn test_name(stem: &str) -> String {
    let mut name: String = stem
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_lowercase() } else { '_' })
        .collect();
    if name.starts_with(|c: char| c.is_ascii_digit()) {
        name.insert(0, '_');
    }
    name
}

fn collect(dir: &Path) -> BTreeMap<String, Pair> {
    let mut pairs: BTreeMap<String, Pair> = BTreeMap::new();
    let entries = std::fs::read_dir(dir).unwrap_or_else(|e| panic!("{}: {e}", dir.display()));
    for entry in entries.flatten() {
        let path = std::fs::canonicalize(entry.path()).unwrap();
        let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };
        let pair = pairs.entry(stem.to_string()).or_default();
        match path.extension().and_then(|e| e.to_str()) {
            Some("razor") => pair.source = Some(path),
            Some("formatted") => pair.expected = Some(path),
            _ => {}
        }
    }
    pairs
}

fn main() {
    let out = PathBuf::from(std::env::var("OUT_DIR").unwrap()).join("fixture_tests.rs");
    println!("cargo::rerun-if-changed={FIXTURE_DIR}");

    let mut generated = String::from("mod fixtures {\n    use super::fixture_test;\n");
    for (stem, pair) in collect(Path::new(FIXTURE_DIR)) {
        let (source, expected) = match (pair.source, pair.expected) {
            (Some(source), Some(expected)) => (source, expected),
            (Some(_), None) => panic!("fixture {stem}.razor has no {stem}.formatted"),
            (None, Some(_)) => panic!("fixture {stem}.formatted has no {stem}.razor"),
            (None, None) => continue,
        };
        for path in [&source, &expected] {
            println!("cargo::rerun-if-changed={}", path.display());
        }
        writeln!(
            generated,
            "\n    #[test]\n    fn {}() {{\n        fixture_test(include_str!({:?}), include_str!({:?}));\n    }}",
            test_name(&stem),
            source.display().to_string(),
            expected.display().to_string(),
        )
        .unwrap();
    }
    generated.push_str("}\n");

    std::fs::write(&out, generated).unwrap();
}
