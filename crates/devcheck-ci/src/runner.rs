//! External process execution.
//!
//! The scheduler only talks to [`ProcessSpawner`]; [`TokioSpawner`] is the
//! real implementation and tests substitute scripted fakes.

use std::path::Path;
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::warn;

/// What happened when a process was launched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpawnOutcome {
    /// Exit code, `None` when the process never exited normally (spawn
    /// failure, timeout, killed by signal).
    pub exit_code: Option<i32>,

    /// Captured stdout (lossy UTF-8).
    pub stdout: String,

    /// Captured stderr (lossy UTF-8).
    pub stderr: String,

    /// Reason the process could not be started.
    pub spawn_error: Option<String>,

    /// Whether the process was killed for exceeding its timeout.
    pub timed_out: bool,
}

impl SpawnOutcome {
    /// Normal exit with `code`.
    pub fn exited(code: i32, stdout: impl Into<String>, stderr: impl Into<String>) -> Self {
        Self {
            exit_code: Some(code),
            stdout: stdout.into(),
            stderr: stderr.into(),
            ..Self::default()
        }
    }

    pub fn spawn_failed(reason: impl Into<String>) -> Self {
        Self {
            spawn_error: Some(reason.into()),
            ..Self::default()
        }
    }

    pub fn timed_out() -> Self {
        Self {
            timed_out: true,
            ..Self::default()
        }
    }

    /// Whether the process ran and exited with code 0.
    pub fn success(&self) -> bool {
        self.spawn_error.is_none() && !self.timed_out && self.exit_code == Some(0)
    }

    /// stdout then stderr, newline-joined and trimmed.
    pub fn combined_output(&self) -> String {
        format!("{}\n{}", self.stdout, self.stderr).trim().to_string()
    }
}

/// Launches a program in a directory and waits for it.
///
/// Implementations never return errors: every failure mode is folded into
/// the [`SpawnOutcome`].
#[async_trait]
pub trait ProcessSpawner: Send + Sync {
    async fn spawn(
        &self,
        dir: &Path,
        program: &str,
        args: &[String],
        timeout: Option<Duration>,
    ) -> SpawnOutcome;
}

/// [`ProcessSpawner`] backed by `tokio::process`.
///
/// stdin is closed, stdout/stderr are captured. A child still running when
/// its timeout elapses is killed.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSpawner;

#[async_trait]
impl ProcessSpawner for TokioSpawner {
    async fn spawn(
        &self,
        dir: &Path,
        program: &str,
        args: &[String],
        timeout: Option<Duration>,
    ) -> SpawnOutcome {
        let child = Command::new(program)
            .args(args)
            .current_dir(dir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn();

        let child = match child {
            Ok(child) => child,
            Err(e) => {
                warn!(program = %program, dir = %dir.display(), error = %e, "failed to spawn");
                return SpawnOutcome::spawn_failed(format!("failed to spawn {program}: {e}"));
            }
        };

        // Dropping the wait future on timeout drops the child, which kills it.
        let output = match timeout {
            Some(limit) => match tokio::time::timeout(limit, child.wait_with_output()).await {
                Ok(output) => output,
                Err(_) => {
                    warn!(program = %program, timeout_secs = limit.as_secs(), "process timed out");
                    return SpawnOutcome::timed_out();
                }
            },
            None => child.wait_with_output().await,
        };

        match output {
            Ok(output) => SpawnOutcome {
                exit_code: output.status.code(),
                stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
                spawn_error: None,
                timed_out: false,
            },
            Err(e) => {
                warn!(program = %program, error = %e, "failed to collect process output");
                SpawnOutcome::spawn_failed(format!("failed to wait for {program}: {e}"))
            }
        }
    }
}
