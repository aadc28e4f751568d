//! Stack detection from marker files.
//!
//! A directory maps to zero or more stacks depending on which marker files
//! it contains. Detection only reads the filesystem and is idempotent.

use std::path::Path;

use crate::domain::{Stack, StackSet};

/// Single-file markers, in detection order.
const MARKERS: &[(&str, &str)] = &[
    ("go.mod", Stack::GO),
    ("Cargo.toml", Stack::RUST),
    ("pyproject.toml", Stack::PYTHON),
    ("requirements.txt", Stack::PYTHON),
];

const NEXT_CONFIGS: &[&str] = &["next.config.js", "next.config.mjs", "next.config.ts"];

/// Detect the stacks implemented in `dir`.
///
/// Stacks are inserted in a fixed order (`go`, `rust`, `python`, `ts`/`js`,
/// `nextjs`), so the returned set iterates deterministically. A missing or
/// unrecognized directory yields an empty set.
pub fn detect_stacks(dir: &Path) -> StackSet {
    let mut stacks = StackSet::new();

    for (marker, stack) in MARKERS {
        if dir.join(marker).exists() {
            stacks.insert(*stack);
        }
    }

    if dir.join("package.json").exists() {
        if dir.join("tsconfig.json").exists() {
            stacks.insert(Stack::TS);
        } else {
            stacks.insert(Stack::JS);
        }

        if NEXT_CONFIGS.iter().any(|cfg| dir.join(cfg).exists()) {
            stacks.insert(Stack::NEXTJS);
        }
    }

    stacks
}
