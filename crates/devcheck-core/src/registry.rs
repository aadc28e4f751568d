//! Command registry: which program runs each check for each stack.
//!
//! The registry is an immutable value. Build it once with
//! [`CommandRegistry::builtin`], optionally overlay entries from
//! configuration, then pass it by reference to the resolver and scheduler.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::domain::{CheckKind, DevcheckError, Result, Stack};

/// Stack → check kind → argv (program first).
type CommandTable = BTreeMap<String, BTreeMap<CheckKind, Vec<String>>>;

/// Mapping from (stack, check kind) to an invocation, plus the tool
/// binaries each stack needs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CommandRegistry {
    commands: CommandTable,
    tools: BTreeMap<String, Vec<String>>,
}

fn argv(parts: &[&str]) -> Vec<String> {
    parts.iter().map(|p| (*p).to_string()).collect()
}

impl CommandRegistry {
    /// Empty registry with no commands and no tools.
    pub fn empty() -> Self {
        Self::default()
    }

    /// The builtin table for go, rust, python, ts, js and nextjs.
    pub fn builtin() -> Self {
        use CheckKind::*;

        let mut commands = CommandTable::new();
        let mut add = |stack: &str, entries: &[(CheckKind, &[&str])]| {
            let table = commands.entry(stack.to_string()).or_default();
            for (kind, parts) in entries {
                table.insert(*kind, argv(parts));
            }
        };

        add(
            Stack::NEXTJS,
            &[
                (Lint, &["npm", "run", "lint"]),
                (Typecheck, &["npm", "run", "typecheck"]),
                (Build, &["npm", "run", "build"]),
                (Test, &["npm", "test", "--", "--passWithNoTests"]),
            ],
        );
        add(
            Stack::TS,
            &[
                (Lint, &["npm", "run", "lint"]),
                (Typecheck, &["npx", "tsc", "--noEmit"]),
                (Build, &["npm", "run", "build"]),
                (Test, &["npm", "test"]),
            ],
        );
        add(
            Stack::JS,
            &[
                (Lint, &["npm", "run", "lint"]),
                (Build, &["npm", "run", "build"]),
                (Test, &["npm", "test"]),
            ],
        );
        add(
            Stack::GO,
            &[
                (Lint, &["golangci-lint", "run"]),
                (Build, &["go", "build", "./..."]),
                (Test, &["go", "test", "./..."]),
            ],
        );
        add(
            Stack::PYTHON,
            &[
                (Lint, &["uv", "run", "ruff", "check", "."]),
                (Typecheck, &["uv", "run", "mypy", "."]),
                (Test, &["uv", "run", "pytest"]),
            ],
        );
        add(
            Stack::RUST,
            &[
                (Lint, &["cargo", "clippy"]),
                (Build, &["cargo", "build"]),
                (Test, &["cargo", "test"]),
            ],
        );

        let tools = [
            (Stack::GO, argv(&["go"])),
            (Stack::TS, argv(&["node", "npm"])),
            (Stack::JS, argv(&["node", "npm"])),
            (Stack::NEXTJS, argv(&["node", "npm"])),
            (Stack::PYTHON, argv(&["python3", "pip3"])),
            (Stack::RUST, argv(&["cargo"])),
        ]
        .into_iter()
        .map(|(stack, tools)| (stack.to_string(), tools))
        .collect();

        Self { commands, tools }
    }

    /// Replace or add the command for `(stack, kind)`.
    ///
    /// `argv` must contain at least the program.
    pub fn with_command(
        mut self,
        stack: impl Into<String>,
        kind: CheckKind,
        argv: Vec<String>,
    ) -> Result<Self> {
        let stack = stack.into();
        if argv.first().map_or(true, |p| p.trim().is_empty()) {
            return Err(DevcheckError::InvalidConfig(format!(
                "commands.{stack}.{kind} must name a program"
            )));
        }
        self.commands.entry(stack).or_default().insert(kind, argv);
        Ok(self)
    }

    /// Replace the required tool list for `stack`.
    pub fn with_tools(mut self, stack: impl Into<String>, tools: Vec<String>) -> Self {
        self.tools.insert(stack.into(), tools);
        self
    }

    /// Argv for `(stack, kind)`, if the stack defines that check.
    pub fn command(&self, stack: &str, kind: CheckKind) -> Option<&[String]> {
        self.commands
            .get(stack)
            .and_then(|table| table.get(&kind))
            .map(Vec::as_slice)
    }

    pub fn has_command(&self, stack: &str, kind: CheckKind) -> bool {
        self.command(stack, kind).is_some()
    }

    /// Tool binaries `stack` needs on `PATH`. Unknown stacks need none.
    pub fn required_tools(&self, stack: &str) -> &[String] {
        self.tools.get(stack).map(Vec::as_slice).unwrap_or(&[])
    }
}

/// Rewrite a lint invocation's arguments to request auto-fix.
///
/// JS-family stacks pass `--fix` through `npm run` (`-- --fix`); go, python
/// and rust linters take `--fix` directly. Other stacks are unchanged.
pub fn fix_args(mut args: Vec<String>, stack: &str) -> Vec<String> {
    match stack {
        Stack::TS | Stack::JS | Stack::NEXTJS => {
            args.push("--".to_string());
            args.push("--fix".to_string());
        }
        Stack::GO | Stack::PYTHON | Stack::RUST => args.push("--fix".to_string()),
        _ => {}
    }
    args
}
