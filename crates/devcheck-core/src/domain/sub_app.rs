//! Sub-application model.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::stack::StackSet;

/// One independently checkable unit within a repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubApp {
    /// Path relative to the repository root, `/`-separated. Empty for the root.
    pub path: String,

    /// Stacks detected in this directory.
    pub stacks: StackSet,
}

impl SubApp {
    pub fn new(path: impl Into<String>, stacks: StackSet) -> Self {
        Self {
            path: path.into(),
            stacks,
        }
    }

    pub fn root(stacks: StackSet) -> Self {
        Self::new("", stacks)
    }

    pub fn is_root(&self) -> bool {
        self.path.is_empty()
    }

    /// Name used in summaries: the relative path, or `root`.
    pub fn display_name(&self) -> &str {
        if self.is_root() {
            "root"
        } else {
            &self.path
        }
    }

    /// Absolute directory of this sub-application under `repo_root`.
    pub fn dir(&self, repo_root: &Path) -> PathBuf {
        if self.is_root() {
            repo_root.to_path_buf()
        } else {
            repo_root.join(&self.path)
        }
    }
}
