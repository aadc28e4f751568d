//! Check resolution: which kinds apply to a sub-application, and which
//! concrete invocation runs each of them.

use serde::Serialize;

use crate::domain::{CheckKind, Phase, Stack, StackSet};
use crate::registry::{fix_args, CommandRegistry};

/// A resolved, ready-to-spawn check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckInvocation {
    pub kind: CheckKind,
    pub stack: Stack,
    pub program: String,
    pub args: Vec<String>,
}

impl CheckInvocation {
    /// Name of the manifest script this invocation runs, if it goes
    /// through a script runner (`npm run <script>`, `npm test`).
    pub fn script_name(&self) -> Option<&str> {
        if self.program != "npm" {
            return None;
        }
        match self.args.as_slice() {
            [first, ..] if first == "test" => Some("test"),
            [first, script, ..] if first == "run" => Some(script.as_str()),
            _ => None,
        }
    }

    /// Apply fix mode. Only `lint` invocations are rewritten.
    pub fn with_fix(mut self, fix: bool) -> Self {
        if fix && self.kind == CheckKind::Lint {
            self.args = fix_args(std::mem::take(&mut self.args), self.stack.as_str());
        }
        self
    }

    /// Full command line for display and logs.
    pub fn command_line(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Kinds to run for a sub-application with `stacks`.
///
/// An explicit `only` list is returned verbatim, without availability
/// filtering. Otherwise every kind with a registry entry for at least one
/// stack is returned, in canonical order.
pub fn resolve_kinds(
    registry: &CommandRegistry,
    stacks: &StackSet,
    only: Option<&[CheckKind]>,
) -> Vec<CheckKind> {
    if let Some(only) = only {
        return only.to_vec();
    }

    CheckKind::ALL
        .into_iter()
        .filter(|kind| stacks.iter().any(|s| registry.has_command(s.as_str(), *kind)))
        .collect()
}

/// Split kinds into (phase 1, phase 2), keeping their relative order.
pub fn split_phases(kinds: &[CheckKind]) -> (Vec<CheckKind>, Vec<CheckKind>) {
    kinds.iter().partition(|kind| kind.phase() == Phase::Fast)
}

/// Resolve the invocation for `kind`: the first stack in `stacks` order
/// with a registry entry wins.
pub fn resolve_invocation(
    registry: &CommandRegistry,
    stacks: &StackSet,
    kind: CheckKind,
) -> Option<CheckInvocation> {
    stacks.iter().find_map(|stack| {
        let argv = registry.command(stack.as_str(), kind)?;
        let (program, args) = argv.split_first()?;
        Some(CheckInvocation {
            kind,
            stack: stack.clone(),
            program: program.clone(),
            args: args.to_vec(),
        })
    })
}
