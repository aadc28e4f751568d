//! Structured lifecycle events for devcheck runs.
//!
//! Every event carries an `event` field so JSON log consumers can filter on
//! it. Events are emitted at `info!` except per-check noise, which is
//! `debug!`.

use tracing::{debug, info, warn};

use crate::domain::{CheckResult, SubApp};

/// Span that scopes every event of one run. Attach it to the run future
/// with `tracing::Instrument`.
pub fn run_span(run_id: &str) -> tracing::Span {
    tracing::info_span!("devcheck.run", run_id = %run_id)
}

/// Span for the checks of one sub-application.
pub fn sub_app_span(sub_app: &SubApp) -> tracing::Span {
    tracing::info_span!("devcheck.sub_app", sub_app = %sub_app.display_name())
}

pub fn emit_run_started(run_id: &str, repo_path: &str) {
    info!(event = "run.started", run_id = %run_id, repo_path = %repo_path);
}

pub fn emit_sub_app_discovered(sub_app: &SubApp) {
    info!(
        event = "sub_app.discovered",
        sub_app = %sub_app.display_name(),
        stacks = %sub_app.stacks.join(","),
    );
}

/// Emitted once per invocation just before it is spawned.
pub fn emit_check_started(sub_app: &str, kind: &str, command: &str) {
    debug!(event = "check.started", sub_app = %sub_app, kind = %kind, command = %command);
}

pub fn emit_check_finished(result: &CheckResult) {
    info!(
        event = "check.finished",
        sub_app = %result.sub_app,
        kind = %result.kind,
        status = %result.status,
        duration_ms = result.duration_ms,
    );
    if let Some(error) = &result.error {
        debug!(event = "check.error", kind = %result.kind, error = %error);
    }
}

/// Emitted after phase 1 with whether phase 2 may run.
pub fn emit_gate_evaluated(sub_app: &str, failed: usize, passed: bool) {
    info!(
        event = "gate.evaluated",
        sub_app = %sub_app,
        failed_checks = failed,
        passed = passed,
    );
}

pub fn emit_phase_cascade(sub_app: &str, skipped: usize) {
    warn!(event = "phase.cascade_skip", sub_app = %sub_app, skipped = skipped);
}

pub fn emit_run_finished(run_id: &str, duration_ms: u64, total_checks: usize, success: bool) {
    info!(
        event = "run.finished",
        run_id = %run_id,
        duration_ms = duration_ms,
        total_checks = total_checks,
        success = success,
    );
}
