//! Check kinds, phases and statuses.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::DevcheckError;

/// A quality check that can be run against a sub-application.
///
/// Variant order is the canonical evaluation order.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum CheckKind {
    Lint,
    Typecheck,
    Build,
    Test,
}

impl CheckKind {
    /// All kinds in canonical order.
    pub const ALL: [CheckKind; 4] = [
        CheckKind::Lint,
        CheckKind::Typecheck,
        CheckKind::Build,
        CheckKind::Test,
    ];

    /// Get the check name as a string.
    pub fn name(&self) -> &'static str {
        match self {
            CheckKind::Lint => "lint",
            CheckKind::Typecheck => "typecheck",
            CheckKind::Build => "build",
            CheckKind::Test => "test",
        }
    }

    /// Phase this kind is scheduled in.
    pub fn phase(&self) -> Phase {
        match self {
            CheckKind::Lint | CheckKind::Typecheck => Phase::Fast,
            CheckKind::Build | CheckKind::Test => Phase::Slow,
        }
    }

    /// Parse a comma-separated list such as `"lint, test"`.
    ///
    /// Empty segments are ignored; unknown names are an error.
    pub fn parse_list(s: &str) -> Result<Vec<CheckKind>, DevcheckError> {
        s.split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(CheckKind::from_str)
            .collect()
    }
}

impl fmt::Display for CheckKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CheckKind {
    type Err = DevcheckError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "lint" => Ok(CheckKind::Lint),
            "typecheck" => Ok(CheckKind::Typecheck),
            "build" => Ok(CheckKind::Build),
            "test" => Ok(CheckKind::Test),
            other => Err(DevcheckError::UnknownCheck(other.to_string())),
        }
    }
}

/// Scheduling phase of a check.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// lint, typecheck: independent, run concurrently.
    Fast,
    /// build, test: sequential, gated on the fast phase.
    Slow,
}

/// Outcome of a single check.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum CheckStatus {
    Pass,
    Fail,
    Skip,
}

impl CheckStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CheckStatus::Pass => "pass",
            CheckStatus::Fail => "fail",
            CheckStatus::Skip => "skip",
        }
    }
}

impl fmt::Display for CheckStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
