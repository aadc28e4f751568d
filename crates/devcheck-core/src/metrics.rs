//! Global atomic counters for devcheck runs.
//!
//! Counters are incremented silently at the call site. Call
//! [`Metrics::flush`] to emit current values as a single
//! `tracing::info!` event at the end of a run.

use std::sync::atomic::{AtomicU64, Ordering};

use crate::domain::CheckStatus;

/// Global metrics singleton.
pub static METRICS: Metrics = Metrics::new();

/// Lightweight atomic counters.
pub struct Metrics {
    processes_spawned: AtomicU64,
    checks_passed: AtomicU64,
    checks_failed: AtomicU64,
    checks_skipped: AtomicU64,
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Metrics {
    pub const fn new() -> Self {
        Self {
            processes_spawned: AtomicU64::new(0),
            checks_passed: AtomicU64::new(0),
            checks_failed: AtomicU64::new(0),
            checks_skipped: AtomicU64::new(0),
        }
    }

    /// Count one external process launch.
    pub fn inc_processes_spawned(&self) {
        self.processes_spawned.fetch_add(1, Ordering::Relaxed);
        tracing::trace!(metric = "processes_spawned", "counter incremented");
    }

    /// Count one recorded check result by status.
    pub fn record_check(&self, status: CheckStatus) {
        let (counter, name) = match status {
            CheckStatus::Pass => (&self.checks_passed, "checks_passed"),
            CheckStatus::Fail => (&self.checks_failed, "checks_failed"),
            CheckStatus::Skip => (&self.checks_skipped, "checks_skipped"),
        };
        counter.fetch_add(1, Ordering::Relaxed);
        tracing::trace!(metric = name, "counter incremented");
    }

    /// Emit all current counter values as a single `info!` event.
    pub fn flush(&self) {
        tracing::info!(
            metric = "flush",
            processes_spawned = self.processes_spawned(),
            checks_passed = self.checks_passed(),
            checks_failed = self.checks_failed(),
            checks_skipped = self.checks_skipped(),
        );
    }

    pub fn processes_spawned(&self) -> u64 {
        self.processes_spawned.load(Ordering::Relaxed)
    }

    pub fn checks_passed(&self) -> u64 {
        self.checks_passed.load(Ordering::Relaxed)
    }

    pub fn checks_failed(&self) -> u64 {
        self.checks_failed.load(Ordering::Relaxed)
    }

    pub fn checks_skipped(&self) -> u64 {
        self.checks_skipped.load(Ordering::Relaxed)
    }

    /// Reset all counters to zero (useful in tests).
    pub fn reset(&self) {
        self.processes_spawned.store(0, Ordering::Relaxed);
        self.checks_passed.store(0, Ordering::Relaxed);
        self.checks_failed.store(0, Ordering::Relaxed);
        self.checks_skipped.store(0, Ordering::Relaxed);
    }
}
