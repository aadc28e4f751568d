//! Tool prerequisite probing.
//!
//! Reports whether the binaries a stack needs are on `PATH`, and which
//! version is installed.

use std::path::{Path, PathBuf};
use std::process::Command;

use serde::Serialize;
use tracing::debug;

use crate::domain::StackSet;
use crate::registry::CommandRegistry;

const MAX_VERSION_LEN: usize = 30;

/// Availability of one required tool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToolStatus {
    pub name: String,
    pub found: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

/// Probe every tool required by `stacks`, deduplicated, in stack order.
pub fn probe_tools(registry: &CommandRegistry, stacks: &StackSet) -> Vec<ToolStatus> {
    let mut seen: Vec<&str> = Vec::new();
    let mut statuses = Vec::new();

    for stack in stacks {
        for tool in registry.required_tools(stack.as_str()) {
            if seen.contains(&tool.as_str()) {
                continue;
            }
            seen.push(tool);
            statuses.push(probe_tool(tool));
        }
    }

    statuses
}

/// Probe a single tool binary.
pub fn probe_tool(name: &str) -> ToolStatus {
    match find_on_path(name) {
        Some(path) => {
            let version = tool_version(&path);
            debug!(tool = %name, path = %path.display(), version = %version, "tool found");
            ToolStatus {
                name: name.to_string(),
                found: true,
                path: Some(path),
                version: Some(version),
            }
        }
        None => {
            debug!(tool = %name, "tool not found on PATH");
            ToolStatus {
                name: name.to_string(),
                found: false,
                path: None,
                version: None,
            }
        }
    }
}

/// Which-like lookup over `PATH`.
pub fn find_on_path(name: &str) -> Option<PathBuf> {
    let path_var = std::env::var_os("PATH")?;
    std::env::split_paths(&path_var)
        .map(|dir| dir.join(name))
        .find(|candidate| candidate.is_file())
}

/// First line of `<tool> --version`, shortened; `installed` when the tool
/// prints nothing useful.
fn tool_version(path: &Path) -> String {
    let output = match Command::new(path).arg("--version").output() {
        Ok(output) if output.status.success() => output,
        _ => return "installed".to_string(),
    };

    let stdout = String::from_utf8_lossy(&output.stdout);
    match stdout.trim().lines().next() {
        Some(first) if !first.trim().is_empty() => shorten_version(first.trim()),
        _ => "installed".to_string(),
    }
}

fn shorten_version(line: &str) -> String {
    if line.chars().count() > MAX_VERSION_LEN {
        let head: String = line.chars().take(MAX_VERSION_LEN).collect();
        format!("{head}...")
    } else {
        line.to_string()
    }
}
