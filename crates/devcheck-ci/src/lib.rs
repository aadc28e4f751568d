//! devcheck CI - phased quality-check execution.
//!
//! Provides the process runner, per-check execution, the phase gate and
//! the [`CheckPipeline`] scheduler that turns a repository path into a
//! [`CheckRun`](devcheck_core::CheckRun).

pub mod check;
pub mod gate;
pub mod pipeline;
pub mod runner;

// Re-export key types
pub use check::{classify, CheckExecutor, SCRIPT_MISSING};
pub use gate::{GateVerdict, PhaseGate};
pub use pipeline::{run, CheckPipeline, RunOptions};
pub use runner::{ProcessSpawner, SpawnOutcome, TokioSpawner};
