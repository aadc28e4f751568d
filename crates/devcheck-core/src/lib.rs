//! devcheck core library.
//!
//! Everything that does not spawn processes: the domain model, stack
//! detection, sub-application discovery, the command registry and
//! resolver, precondition and tool probing, configuration, and the
//! tracing and metrics plumbing shared by the binaries.

pub mod config;
pub mod detect;
pub mod discover;
pub mod domain;
pub mod metrics;
pub mod obs;
pub mod probe;
pub mod registry;
pub mod resolver;
pub mod telemetry;
pub mod tools;

pub use config::{DevcheckConfig, CONFIG_FILE_NAME, DEFAULT_TIMEOUT_SECS};
pub use detect::detect_stacks;
pub use discover::{discover_sub_apps, validate_repo_root};
pub use domain::{
    CheckCounts, CheckKind, CheckResult, CheckRun, CheckStatus, DevcheckError, Phase, Result,
    Stack, StackSet, SubApp, Verdict,
};
pub use metrics::METRICS;
pub use probe::script_exists;
pub use registry::CommandRegistry;
pub use resolver::{resolve_invocation, resolve_kinds, split_phases, CheckInvocation};
pub use telemetry::init_tracing;
pub use tools::{probe_tools, ToolStatus};

/// Crate version, reported by `devcheck --version` and in JSON reports.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
