//! Domain-level error taxonomy for devcheck.
//!
//! Per-check outcomes (failed lint, missing binary, undeclared script) are
//! data carried in [`CheckResult`](super::CheckResult), never errors. The
//! variants here cover the few conditions that stop a command before any
//! check runs.

use std::path::PathBuf;

/// devcheck domain errors.
#[derive(Debug, thiserror::Error)]
pub enum DevcheckError {
    #[error("unknown check: {0} (expected one of lint, typecheck, build, test)")]
    UnknownCheck(String),

    #[error("repository path not found: {}", .0.display())]
    RepoNotFound(PathBuf),

    #[error("repository path is not a directory: {}", .0.display())]
    NotADirectory(PathBuf),

    #[error("failed to read config {}: {source}", path.display())]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {}: {source}", path.display())]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid config: {0}")]
    InvalidConfig(String),
}

/// Result type for devcheck domain operations.
pub type Result<T> = std::result::Result<T, DevcheckError>;
