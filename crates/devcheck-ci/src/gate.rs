//! Phase gate: decides whether the slow phase may run.

use devcheck_core::CheckResult;
use serde::{Deserialize, Serialize};

/// Gate evaluation verdict.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GateVerdict {
    /// Whether phase 2 may run.
    pub passed: bool,

    /// One entry per failed phase-1 check (empty if passed).
    pub violations: Vec<String>,

    /// Summary message.
    pub message: String,
}

/// Gate between the fast and slow phases.
pub struct PhaseGate;

impl PhaseGate {
    /// Evaluate phase-1 results.
    ///
    /// Gate rule: the gate passes iff no result is a fail. Passes and skips
    /// both count as non-failure, so an empty or all-skipped phase 1 lets
    /// phase 2 proceed.
    pub fn evaluate(phase_one: &[CheckResult]) -> GateVerdict {
        let violations: Vec<String> = phase_one
            .iter()
            .filter(|r| r.is_fail())
            .map(|r| match &r.error {
                Some(error) => format!("{} failed: {}", r.kind, error),
                None => format!("{} failed", r.kind),
            })
            .collect();

        let passed = violations.is_empty();
        let message = if passed {
            "Fast checks passed".to_string()
        } else {
            format!("Gate failed with {} violation(s)", violations.len())
        };

        GateVerdict {
            passed,
            violations,
            message,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use devcheck_core::{CheckKind, CheckStatus, Stack};

    fn result(kind: CheckKind, status: CheckStatus, error: Option<&str>) -> CheckResult {
        CheckResult {
            kind,
            sub_app: String::new(),
            stack: Some(Stack::new("go")),
            status,
            duration_ms: 10,
            output: String::new(),
            error: error.map(str::to_string),
        }
    }

    #[test]
    fn test_empty_phase_passes() {
        let verdict = PhaseGate::evaluate(&[]);
        assert!(verdict.passed);
        assert!(verdict.violations.is_empty());
    }

    #[test]
    fn test_all_skipped_passes() {
        let verdict = PhaseGate::evaluate(&[
            CheckResult::skipped(CheckKind::Lint, "", None, "script not defined in package.json"),
            CheckResult::skipped(CheckKind::Typecheck, "", None, "no command"),
        ]);
        assert!(verdict.passed);
    }

    #[test]
    fn test_single_failed_check() {
        let verdict = PhaseGate::evaluate(&[
            result(CheckKind::Lint, CheckStatus::Fail, Some("exited with code 1")),
            result(CheckKind::Typecheck, CheckStatus::Pass, None),
        ]);
        assert!(!verdict.passed);
        assert_eq!(verdict.violations, vec!["lint failed: exited with code 1"]);
        assert!(verdict.message.contains("1 violation"));
    }

    #[test]
    fn test_multiple_failures() {
        let verdict = PhaseGate::evaluate(&[
            result(CheckKind::Lint, CheckStatus::Fail, None),
            result(CheckKind::Typecheck, CheckStatus::Fail, Some("timed out after 5 seconds")),
        ]);
        assert!(!verdict.passed);
        assert_eq!(verdict.violations.len(), 2);
        assert!(verdict.violations[1].contains("timed out"));
    }
}
