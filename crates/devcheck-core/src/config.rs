//! Configuration file support.
//!
//! A repository may carry a `.devcheck.toml` at its root (or the CLI may be
//! pointed at another file) to tune timeouts and override commands:
//!
//! ```toml
//! timeout_secs = 900
//!
//! [commands.go]
//! lint = ["golangci-lint", "run", "--fast"]
//!
//! [tools]
//! go = ["go", "golangci-lint"]
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::{CheckKind, DevcheckError, Result};
use crate::registry::CommandRegistry;

/// Config file looked up at the repository root.
pub const CONFIG_FILE_NAME: &str = ".devcheck.toml";

/// Per-invocation timeout when nothing else is configured.
pub const DEFAULT_TIMEOUT_SECS: u64 = 600;

/// Parsed configuration file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DevcheckConfig {
    /// Per-invocation timeout in seconds; `0` disables the timeout.
    #[serde(default)]
    pub timeout_secs: Option<u64>,

    /// Stack → check name → argv overrides.
    #[serde(default)]
    pub commands: BTreeMap<String, BTreeMap<String, Vec<String>>>,

    /// Stack → required tool binaries overrides.
    #[serde(default)]
    pub tools: BTreeMap<String, Vec<String>>,
}

impl DevcheckConfig {
    /// Parse configuration from TOML text. `origin` is only used in errors.
    pub fn from_toml_str(content: &str, origin: &Path) -> Result<Self> {
        toml::from_str(content).map_err(|source| DevcheckError::ConfigParse {
            path: origin.to_path_buf(),
            source,
        })
    }

    /// Load configuration from an explicit file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| DevcheckError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content, path)
    }

    /// Load `<repo_root>/.devcheck.toml` if present, else the defaults.
    pub fn load_for_repo(repo_root: &Path) -> Result<Self> {
        let path = Self::repo_config_path(repo_root);
        if path.is_file() {
            debug!(path = %path.display(), "loading repository config");
            Self::load(&path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn repo_config_path(repo_root: &Path) -> PathBuf {
        repo_root.join(CONFIG_FILE_NAME)
    }

    /// Timeout to apply to each invocation, `None` when disabled.
    pub fn timeout(&self) -> Option<Duration> {
        timeout_from_secs(self.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS))
    }

    /// Builtin registry overlaid with this configuration.
    pub fn registry(&self) -> Result<CommandRegistry> {
        self.apply_to(CommandRegistry::builtin())
    }

    /// Overlay this configuration onto `registry`.
    pub fn apply_to(&self, mut registry: CommandRegistry) -> Result<CommandRegistry> {
        for (stack, table) in &self.commands {
            for (kind_name, argv) in table {
                let kind = CheckKind::from_str(kind_name).map_err(|_| {
                    DevcheckError::InvalidConfig(format!(
                        "commands.{stack}.{kind_name} is not a check (expected lint, typecheck, build or test)"
                    ))
                })?;
                registry = registry.with_command(stack.clone(), kind, argv.clone())?;
            }
        }
        for (stack, tools) in &self.tools {
            registry = registry.with_tools(stack.clone(), tools.clone());
        }
        Ok(registry)
    }
}

/// `0` means no timeout.
pub fn timeout_from_secs(secs: u64) -> Option<Duration> {
    (secs > 0).then(|| Duration::from_secs(secs))
}
