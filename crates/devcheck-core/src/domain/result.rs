//! Check results and run-level aggregation.

use std::fmt;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::check::{CheckKind, CheckStatus};
use super::stack::Stack;
use super::sub_app::SubApp;

/// Result of a single check for one sub-application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckResult {
    /// Which check this is.
    pub kind: CheckKind,

    /// Owning sub-application path (empty = root).
    pub sub_app: String,

    /// Stack whose command was used, if one was resolved.
    pub stack: Option<Stack>,

    /// Outcome.
    pub status: CheckStatus,

    /// Wall-clock duration in milliseconds (0 when nothing ran).
    pub duration_ms: u64,

    /// Combined output: stdout, then stderr, newline-joined and trimmed.
    /// For precondition skips this holds the diagnostic.
    #[serde(default)]
    pub output: String,

    /// Failure reason (spawn error, exit code, timeout).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl CheckResult {
    /// Phase-2 check blocked by a failed phase 1. Nothing else is populated.
    pub fn cascade_skip(kind: CheckKind, sub_app: impl Into<String>) -> Self {
        Self {
            kind,
            sub_app: sub_app.into(),
            stack: None,
            status: CheckStatus::Skip,
            duration_ms: 0,
            output: String::new(),
            error: None,
        }
    }

    /// Check skipped before running, with a diagnostic.
    pub fn skipped(
        kind: CheckKind,
        sub_app: impl Into<String>,
        stack: Option<Stack>,
        diagnostic: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            sub_app: sub_app.into(),
            stack,
            status: CheckStatus::Skip,
            duration_ms: 0,
            output: diagnostic.into(),
            error: None,
        }
    }

    pub fn is_pass(&self) -> bool {
        self.status == CheckStatus::Pass
    }

    pub fn is_fail(&self) -> bool {
        self.status == CheckStatus::Fail
    }

    pub fn is_skip(&self) -> bool {
        self.status == CheckStatus::Skip
    }
}

/// Single summary verdict for a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Verdict {
    Pass,
    Fail,
    Skip,
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Pass => f.write_str("PASS"),
            Verdict::Fail => f.write_str("FAIL"),
            Verdict::Skip => f.write_str("SKIP"),
        }
    }
}

/// Pass/fail/skip tallies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckCounts {
    pub passed: usize,
    pub failed: usize,
    pub skipped: usize,
}

/// Everything one orchestration run produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckRun {
    /// Correlation id for log lines of this run.
    pub run_id: Uuid,

    /// Repository root the run was pointed at.
    pub repo_path: PathBuf,

    /// When the run started.
    pub started_at: DateTime<Utc>,

    /// Discovered sub-applications, in processing order.
    pub sub_apps: Vec<SubApp>,

    /// Flat results, grouped by sub-application in processing order.
    pub checks: Vec<CheckResult>,

    /// Total duration in milliseconds.
    pub duration_ms: u64,
}

impl CheckRun {
    /// True iff no check failed. Vacuously true for zero checks.
    pub fn passed(&self) -> bool {
        !self.checks.iter().any(CheckResult::is_fail)
    }

    /// `FAIL` if anything failed, else `PASS` if anything passed, else `SKIP`.
    pub fn verdict(&self) -> Verdict {
        let counts = self.counts();
        if counts.failed > 0 {
            Verdict::Fail
        } else if counts.passed > 0 {
            Verdict::Pass
        } else {
            Verdict::Skip
        }
    }

    pub fn counts(&self) -> CheckCounts {
        self.checks
            .iter()
            .fold(CheckCounts::default(), |mut acc, check| {
                match check.status {
                    CheckStatus::Pass => acc.passed += 1,
                    CheckStatus::Fail => acc.failed += 1,
                    CheckStatus::Skip => acc.skipped += 1,
                }
                acc
            })
    }

    /// Human-readable stack summary.
    ///
    /// A lone root sub-app renders as `go` or `ts, nextjs`; anything else as
    /// `root:go | web:ts,nextjs`.
    pub fn stack_summary(&self) -> String {
        match self.sub_apps.as_slice() {
            [] => String::new(),
            [only] if only.is_root() => only.stacks.join(", "),
            apps => apps
                .iter()
                .map(|app| format!("{}:{}", app.display_name(), app.stacks.join(",")))
                .collect::<Vec<_>>()
                .join(" | "),
        }
    }

    /// Results belonging to the sub-application at `path`, in recorded order.
    pub fn checks_for<'a>(&'a self, path: &'a str) -> impl Iterator<Item = &'a CheckResult> + 'a {
        self.checks.iter().filter(move |c| c.sub_app == path)
    }
}
