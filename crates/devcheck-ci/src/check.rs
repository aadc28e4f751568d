//! Execution of a single check for one sub-application.

use std::path::Path;
use std::time::{Duration, Instant};

use devcheck_core::metrics::METRICS;
use devcheck_core::obs;
use devcheck_core::{
    resolve_invocation, script_exists, CheckKind, CheckResult, CheckStatus, CommandRegistry,
    Stack, SubApp,
};
use tracing::debug;

use crate::runner::{ProcessSpawner, SpawnOutcome};

/// Diagnostic recorded when a script-runner invocation names an undeclared
/// script.
pub const SCRIPT_MISSING: &str = "script not defined in package.json";

/// Runs individual checks: resolve, probe, apply fix mode, spawn, classify.
pub struct CheckExecutor<'a> {
    registry: &'a CommandRegistry,
    spawner: &'a dyn ProcessSpawner,
    timeout: Option<Duration>,
    fix: bool,
}

impl<'a> CheckExecutor<'a> {
    pub fn new(
        registry: &'a CommandRegistry,
        spawner: &'a dyn ProcessSpawner,
        timeout: Option<Duration>,
        fix: bool,
    ) -> Self {
        Self {
            registry,
            spawner,
            timeout,
            fix,
        }
    }

    /// Execute `kind` for `sub_app`, whose directory is `dir`.
    ///
    /// Never fails: a missing command or script is a skip, a spawn error,
    /// non-zero exit or timeout is a fail.
    pub async fn execute(&self, sub_app: &SubApp, dir: &Path, kind: CheckKind) -> CheckResult {
        let Some(invocation) = resolve_invocation(self.registry, &sub_app.stacks, kind) else {
            debug!(kind = %kind, sub_app = %sub_app.display_name(), "no command configured");
            return CheckResult::skipped(
                kind,
                sub_app.path.clone(),
                None,
                format!(
                    "no command configured for stacks {}",
                    sub_app.stacks.join(", ")
                ),
            );
        };

        if let Some(script) = invocation.script_name() {
            if !script_exists(dir, script) {
                debug!(kind = %kind, script = %script, "script not declared; skipping");
                return CheckResult::skipped(
                    kind,
                    sub_app.path.clone(),
                    Some(invocation.stack),
                    SCRIPT_MISSING,
                );
            }
        }

        let invocation = invocation.with_fix(self.fix);
        obs::emit_check_started(sub_app.display_name(), kind.name(), &invocation.command_line());

        let start = Instant::now();
        METRICS.inc_processes_spawned();
        let outcome = self
            .spawner
            .spawn(dir, &invocation.program, &invocation.args, self.timeout)
            .await;
        let duration_ms = start.elapsed().as_millis() as u64;

        classify(
            kind,
            &sub_app.path,
            invocation.stack,
            &outcome,
            duration_ms,
            self.timeout,
        )
    }
}

/// Turn a process outcome into a check result.
pub fn classify(
    kind: CheckKind,
    sub_app: &str,
    stack: Stack,
    outcome: &SpawnOutcome,
    duration_ms: u64,
    timeout: Option<Duration>,
) -> CheckResult {
    let (status, error) = if let Some(reason) = &outcome.spawn_error {
        (CheckStatus::Fail, Some(reason.clone()))
    } else if outcome.timed_out {
        (
            CheckStatus::Fail,
            Some(format!("timed out after {}", describe_timeout(timeout))),
        )
    } else if outcome.success() {
        (CheckStatus::Pass, None)
    } else {
        match outcome.exit_code {
            Some(code) => (CheckStatus::Fail, Some(format!("exited with code {code}"))),
            None => (CheckStatus::Fail, Some("terminated by signal".to_string())),
        }
    };

    let output = if outcome.spawn_error.is_some() {
        String::new()
    } else {
        outcome.combined_output()
    };

    CheckResult {
        kind,
        sub_app: sub_app.to_string(),
        stack: Some(stack),
        status,
        duration_ms,
        output,
        error,
    }
}

/// "1 second", "30 seconds", "0.2 seconds".
fn describe_timeout(timeout: Option<Duration>) -> String {
    let Some(timeout) = timeout else {
        return "0 seconds".to_string();
    };
    if timeout.subsec_nanos() != 0 {
        let secs = format!("{:.3}", timeout.as_secs_f64());
        let secs = secs.trim_end_matches('0').trim_end_matches('.');
        return format!("{secs} seconds");
    }
    match timeout.as_secs() {
        1 => "1 second".to_string(),
        secs => format!("{secs} seconds"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::SpawnOutcome;
    use async_trait::async_trait;
    use devcheck_core::StackSet;
    use std::sync::Mutex;

    /// Spawner that records command lines and answers with one outcome.
    struct RecordingSpawner {
        outcome: SpawnOutcome,
        calls: Mutex<Vec<String>>,
    }

    impl RecordingSpawner {
        fn new(outcome: SpawnOutcome) -> Self {
            Self {
                outcome,
                calls: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().expect("calls lock").clone()
        }
    }

    #[async_trait]
    impl ProcessSpawner for RecordingSpawner {
        async fn spawn(
            &self,
            _dir: &Path,
            program: &str,
            args: &[String],
            _timeout: Option<Duration>,
        ) -> SpawnOutcome {
            let mut line = vec![program.to_string()];
            line.extend(args.iter().cloned());
            self.calls.lock().expect("calls lock").push(line.join(" "));
            self.outcome.clone()
        }
    }

    fn app(path: &str, ids: &[&str]) -> SubApp {
        SubApp::new(path, ids.iter().copied().collect::<StackSet>())
    }

    #[test]
    fn test_classify_pass() {
        let result = classify(
            CheckKind::Test,
            "api",
            Stack::new("go"),
            &SpawnOutcome::exited(0, "ok", ""),
            42,
            None,
        );
        assert!(result.is_pass());
        assert_eq!(result.output, "ok");
        assert_eq!(result.duration_ms, 42);
        assert!(result.error.is_none());
    }

    #[test]
    fn test_classify_failures() {
        let exit = classify(
            CheckKind::Lint,
            "",
            Stack::new("go"),
            &SpawnOutcome::exited(1, "a.go:1: unused", "1 issue"),
            5,
            None,
        );
        assert!(exit.is_fail());
        assert_eq!(exit.output, "a.go:1: unused\n1 issue");
        assert_eq!(exit.error.as_deref(), Some("exited with code 1"));

        let spawn = classify(
            CheckKind::Lint,
            "",
            Stack::new("go"),
            &SpawnOutcome::spawn_failed("failed to spawn golangci-lint: not found"),
            0,
            None,
        );
        assert!(spawn.is_fail());
        assert!(spawn.output.is_empty());
        assert!(spawn.error.as_deref().unwrap_or_default().contains("golangci-lint"));

        let timeout = classify(
            CheckKind::Test,
            "",
            Stack::new("go"),
            &SpawnOutcome::timed_out(),
            1000,
            Some(Duration::from_secs(30)),
        );
        assert!(timeout.is_fail());
        assert_eq!(timeout.error.as_deref(), Some("timed out after 30 seconds"));

        let signal = classify(
            CheckKind::Test,
            "",
            Stack::new("go"),
            &SpawnOutcome::default(),
            0,
            None,
        );
        assert!(signal.is_fail());
    }

    #[test]
    fn test_classify_agrees_with_spawn_success() {
        let outcomes = [
            SpawnOutcome::exited(0, "", ""),
            SpawnOutcome::exited(2, "", ""),
            SpawnOutcome::spawn_failed("no such file"),
            SpawnOutcome::timed_out(),
            SpawnOutcome::default(),
            // Late exit status on a killed process must not read as a pass.
            SpawnOutcome {
                timed_out: true,
                ..SpawnOutcome::exited(0, "partial", "")
            },
            SpawnOutcome {
                spawn_error: Some("wait failed".to_string()),
                ..SpawnOutcome::exited(0, "", "")
            },
        ];
        for outcome in &outcomes {
            let result = classify(CheckKind::Build, "", Stack::new("rust"), outcome, 0, None);
            assert_eq!(result.is_pass(), outcome.success(), "{outcome:?}");
            assert_eq!(result.error.is_none(), outcome.success(), "{outcome:?}");
        }
    }

    #[test]
    fn test_timeout_message_wording() {
        let message = |timeout: Duration| {
            classify(
                CheckKind::Test,
                "",
                Stack::new("go"),
                &SpawnOutcome::timed_out(),
                0,
                Some(timeout),
            )
            .error
            .unwrap_or_default()
        };
        assert_eq!(message(Duration::from_secs(1)), "timed out after 1 second");
        assert_eq!(message(Duration::from_secs(30)), "timed out after 30 seconds");
        assert_eq!(message(Duration::from_millis(200)), "timed out after 0.2 seconds");
        assert_eq!(message(Duration::from_millis(1500)), "timed out after 1.5 seconds");
    }

    #[tokio::test]
    async fn test_missing_command_is_diagnosed_skip() {
        let registry = CommandRegistry::builtin();
        let spawner = RecordingSpawner::new(SpawnOutcome::exited(0, "", ""));
        let executor = CheckExecutor::new(&registry, &spawner, None, false);
        let dir = tempfile::tempdir().expect("tempdir");

        let result = executor
            .execute(&app("", &["go"]), dir.path(), CheckKind::Typecheck)
            .await;
        assert!(result.is_skip());
        assert!(result.stack.is_none());
        assert_eq!(result.output, "no command configured for stacks go");
        assert!(spawner.calls().is_empty());
    }

    #[tokio::test]
    async fn test_undeclared_script_skips_without_spawning() {
        let registry = CommandRegistry::builtin();
        let spawner = RecordingSpawner::new(SpawnOutcome::exited(0, "", ""));
        let executor = CheckExecutor::new(&registry, &spawner, None, false);
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(dir.path().join("package.json"), r#"{"scripts":{"test":"vitest"}}"#)
            .expect("write manifest");

        let result = executor
            .execute(&app("web", &["ts"]), dir.path(), CheckKind::Lint)
            .await;
        assert!(result.is_skip());
        assert_eq!(result.output, SCRIPT_MISSING);
        assert_eq!(result.stack.as_ref().map(Stack::as_str), Some("ts"));
        assert!(spawner.calls().is_empty());

        // Direct binaries never consult the manifest.
        let typecheck = executor
            .execute(&app("web", &["ts"]), dir.path(), CheckKind::Typecheck)
            .await;
        assert!(typecheck.is_pass());
        assert_eq!(spawner.calls(), vec!["npx tsc --noEmit".to_string()]);
    }

    #[tokio::test]
    async fn test_fix_mode_rewrites_lint() {
        let registry = CommandRegistry::builtin();
        let spawner = RecordingSpawner::new(SpawnOutcome::exited(0, "", ""));
        let executor = CheckExecutor::new(&registry, &spawner, None, true);
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(dir.path().join("package.json"), r#"{"scripts":{"lint":"eslint ."}}"#)
            .expect("write manifest");

        executor
            .execute(&app("", &["nextjs"]), dir.path(), CheckKind::Lint)
            .await;
        executor
            .execute(&app("", &["go"]), dir.path(), CheckKind::Lint)
            .await;
        executor
            .execute(&app("", &["go"]), dir.path(), CheckKind::Build)
            .await;

        assert_eq!(
            spawner.calls(),
            vec![
                "npm run lint -- --fix".to_string(),
                "golangci-lint run --fix".to_string(),
                "go build ./...".to_string(),
            ]
        );
    }
}
