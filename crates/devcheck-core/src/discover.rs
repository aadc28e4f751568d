//! Sub-application discovery.
//!
//! Walks the repository root, a fixed list of conventional subdirectory
//! names and the `apps/*` / `packages/*` globs, running stack detection at
//! each candidate. Emission order is root, conventional names, glob matches;
//! it becomes the processing order for scheduling and display.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::detect::detect_stacks;
use crate::domain::{DevcheckError, Result, SubApp};

/// Conventional sub-application directory names, in emission order.
pub const CONVENTIONAL_DIRS: &[&str] = &[
    "go-api", "api", "backend", "server", "nextapp", "web", "frontend", "app", "client",
];

/// Glob patterns whose matches are always distinct sub-applications.
pub const WORKSPACE_GLOBS: &[&str] = &["apps/*", "packages/*"];

/// Discover every sub-application under `repo_root`.
///
/// A conventional subdirectory is suppressed when the root already covers
/// all of its stacks. Glob matches are never suppressed. Unreadable
/// directories are skipped; a repository with no stacks yields an empty list.
pub fn discover_sub_apps(repo_root: &Path) -> Vec<SubApp> {
    let mut sub_apps = Vec::new();

    let root_stacks = detect_stacks(repo_root);
    if !root_stacks.is_empty() {
        debug!(stacks = %root_stacks.join(","), "detected root stacks");
        sub_apps.push(SubApp::root(root_stacks.clone()));
    }

    for name in CONVENTIONAL_DIRS {
        let dir = repo_root.join(name);
        if !dir.is_dir() {
            continue;
        }
        let stacks = detect_stacks(&dir);
        if stacks.is_empty() {
            continue;
        }
        if stacks.is_covered_by(&root_stacks) {
            debug!(subdir = %name, stacks = %stacks.join(","), "suppressed: covered by root");
            continue;
        }
        sub_apps.push(SubApp::new(*name, stacks));
    }

    for pattern in WORKSPACE_GLOBS {
        for (rel, dir) in glob_dirs(repo_root, pattern) {
            let stacks = detect_stacks(&dir);
            if stacks.is_empty() {
                continue;
            }
            sub_apps.push(SubApp::new(rel, stacks));
        }
    }

    sub_apps
}

/// Fail unless `repo_root` exists and is a directory.
pub fn validate_repo_root(repo_root: &Path) -> Result<()> {
    if !repo_root.exists() {
        return Err(DevcheckError::RepoNotFound(repo_root.to_path_buf()));
    }
    if !repo_root.is_dir() {
        return Err(DevcheckError::NotADirectory(repo_root.to_path_buf()));
    }
    Ok(())
}

/// Directories matching `pattern` under `root`, in glob order, paired with
/// their `/`-separated path relative to `root`.
///
/// The relative path is built from the pattern's parent plus the match's
/// file name, since the walker may rewrite a relative `root` (`.`, `./repo`).
fn glob_dirs(root: &Path, pattern: &str) -> Vec<(String, PathBuf)> {
    let Some(root_str) = root.to_str() else {
        debug!(root = %root.display(), "repository path is not UTF-8; skipping globs");
        return Vec::new();
    };
    let parent = pattern.rsplit_once('/').map_or("", |(parent, _)| parent);
    let full = format!("{}/{}", glob::Pattern::escape(root_str), pattern);

    let paths = match glob::glob(&full) {
        Ok(paths) => paths,
        Err(e) => {
            debug!(pattern = %full, error = %e, "invalid glob pattern");
            return Vec::new();
        }
    };

    paths
        .filter_map(|entry| match entry {
            Ok(path) => Some(path),
            Err(e) => {
                debug!(error = %e, "unreadable glob entry");
                None
            }
        })
        .filter(|path| path.is_dir())
        .filter_map(|path| {
            let name = path.file_name()?.to_str()?.to_string();
            let rel = if parent.is_empty() {
                name
            } else {
                format!("{parent}/{name}")
            };
            Some((rel, path))
        })
        .collect()
}
