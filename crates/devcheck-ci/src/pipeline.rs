//! Phased check scheduling and run orchestration.
//!
//! Per sub-application: phase 1 (lint, typecheck) runs concurrently behind
//! a join barrier, the [`PhaseGate`] inspects its results, then phase 2
//! (build, test) runs sequentially and stops at the first failure. A
//! failed phase 1 turns every phase-2 kind into a cascade skip.

use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::Utc;
use devcheck_core::metrics::METRICS;
use devcheck_core::obs;
use devcheck_core::{
    discover_sub_apps, resolve_kinds, split_phases, validate_repo_root, CheckKind, CheckResult,
    CheckRun, CommandRegistry, SubApp, DEFAULT_TIMEOUT_SECS,
};
use futures::future::join_all;
use tracing::{info, Instrument};
use uuid::Uuid;

use crate::check::CheckExecutor;
use crate::gate::PhaseGate;
use crate::runner::{ProcessSpawner, TokioSpawner};

/// Knobs for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOptions {
    /// Explicit kinds to run. Used verbatim (no availability filtering).
    pub only: Option<Vec<CheckKind>>,

    /// Rewrite lint invocations to auto-fix.
    pub fix: bool,

    /// Per-invocation timeout; `None` disables it.
    pub timeout: Option<Duration>,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            only: None,
            fix: false,
            timeout: Some(Duration::from_secs(DEFAULT_TIMEOUT_SECS)),
        }
    }
}

impl RunOptions {
    pub fn with_only(mut self, kinds: Vec<CheckKind>) -> Self {
        self.only = Some(kinds);
        self
    }

    pub fn with_fix(mut self, fix: bool) -> Self {
        self.fix = fix;
        self
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Check orchestrator over a command registry and a process spawner.
pub struct CheckPipeline {
    registry: CommandRegistry,
    spawner: Arc<dyn ProcessSpawner>,
}

impl CheckPipeline {
    pub fn new(registry: CommandRegistry, spawner: Arc<dyn ProcessSpawner>) -> Self {
        Self { registry, spawner }
    }

    /// Builtin registry, real processes.
    pub fn builtin() -> Self {
        Self::with_registry(CommandRegistry::builtin())
    }

    /// Custom registry, real processes.
    pub fn with_registry(registry: CommandRegistry) -> Self {
        Self::new(registry, Arc::new(TokioSpawner))
    }

    pub fn registry(&self) -> &CommandRegistry {
        &self.registry
    }

    /// Discover sub-applications under `repo_path` and check all of them.
    ///
    /// The only error is an invalid repository path; every per-check
    /// problem is recorded in the returned [`CheckRun`].
    pub async fn run(&self, repo_path: &Path, options: &RunOptions) -> anyhow::Result<CheckRun> {
        validate_repo_root(repo_path)?;

        let run_id = Uuid::new_v4();
        let run_id_str = run_id.to_string();
        let started_at = Utc::now();
        let start = Instant::now();

        let run = async {
            obs::emit_run_started(&run_id_str, &repo_path.display().to_string());

            let sub_apps = discover_sub_apps(repo_path);
            for sub_app in &sub_apps {
                obs::emit_sub_app_discovered(sub_app);
            }
            if sub_apps.is_empty() {
                info!(repo_path = %repo_path.display(), "no stacks detected; nothing to check");
            }

            let checks = self.run_checks(repo_path, &sub_apps, options).await;
            let run = CheckRun {
                run_id,
                repo_path: repo_path.to_path_buf(),
                started_at,
                sub_apps,
                checks,
                duration_ms: start.elapsed().as_millis() as u64,
            };

            obs::emit_run_finished(&run_id_str, run.duration_ms, run.checks.len(), run.passed());
            run
        }
        .instrument(obs::run_span(&run_id_str))
        .await;

        Ok(run)
    }

    /// Check each sub-application in order and concatenate the results.
    /// Sub-applications never influence each other.
    pub async fn run_checks(
        &self,
        repo_root: &Path,
        sub_apps: &[SubApp],
        options: &RunOptions,
    ) -> Vec<CheckResult> {
        let mut results = Vec::new();
        for sub_app in sub_apps {
            let checks = self
                .check_sub_app(repo_root, sub_app, options)
                .instrument(obs::sub_app_span(sub_app))
                .await;
            results.extend(checks);
        }
        results
    }

    /// Run both phases for one sub-application.
    pub async fn check_sub_app(
        &self,
        repo_root: &Path,
        sub_app: &SubApp,
        options: &RunOptions,
    ) -> Vec<CheckResult> {
        let executor = CheckExecutor::new(
            &self.registry,
            self.spawner.as_ref(),
            options.timeout,
            options.fix,
        );
        let dir = sub_app.dir(repo_root);
        let name = sub_app.display_name();

        let kinds = resolve_kinds(&self.registry, &sub_app.stacks, options.only.as_deref());
        let (mut fast, mut slow) = split_phases(&kinds);
        fast.sort();
        fast.dedup();
        slow.sort();
        slow.dedup();

        // Phase 1: fan out, join, then restore canonical order.
        let mut phase_one =
            join_all(fast.iter().map(|kind| executor.execute(sub_app, &dir, *kind))).await;
        phase_one.sort_by_key(|r| r.kind);

        let verdict = PhaseGate::evaluate(&phase_one);
        obs::emit_gate_evaluated(name, verdict.violations.len(), verdict.passed);

        let mut phase_two = Vec::with_capacity(slow.len());
        if verdict.passed {
            for kind in slow {
                let result = executor.execute(sub_app, &dir, kind).await;
                let failed = result.is_fail();
                phase_two.push(result);
                if failed {
                    info!(sub_app = %name, kind = %kind, "phase 2 stopped after failure");
                    break;
                }
            }
        } else if !slow.is_empty() {
            obs::emit_phase_cascade(name, slow.len());
            phase_two.extend(
                slow.into_iter()
                    .map(|kind| CheckResult::cascade_skip(kind, sub_app.path.clone())),
            );
        }

        let results: Vec<CheckResult> = phase_one.into_iter().chain(phase_two).collect();
        for result in &results {
            obs::emit_check_finished(result);
            METRICS.record_check(result.status);
        }
        results
    }
}

/// Run every applicable check under `repo_path` with the builtin registry
/// and real processes.
pub async fn run(repo_path: &Path, options: &RunOptions) -> anyhow::Result<CheckRun> {
    CheckPipeline::builtin().run(repo_path, options).await
}
