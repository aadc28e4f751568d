//! Domain models for devcheck.
//!
//! Canonical definitions for the core entities:
//! - `CheckKind` / `CheckStatus`: what runs and how it ended
//! - `Stack` / `StackSet`: detected toolchains for a directory
//! - `SubApp`: one independently checkable unit
//! - `CheckResult` / `CheckRun`: per-check outcomes and the run aggregate

pub mod check;
pub mod error;
pub mod result;
pub mod stack;
pub mod sub_app;

pub use check::{CheckKind, CheckStatus, Phase};
pub use error::{DevcheckError, Result};
pub use result::{CheckCounts, CheckResult, CheckRun, Verdict};
pub use stack::{Stack, StackSet};
pub use sub_app::SubApp;
