//! Stack identifiers and ordered stack sets.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A detected technology/toolchain identifier such as `go` or `ts`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Stack(String);

impl Stack {
    pub const GO: &'static str = "go";
    pub const RUST: &'static str = "rust";
    pub const PYTHON: &'static str = "python";
    pub const TS: &'static str = "ts";
    pub const JS: &'static str = "js";
    pub const NEXTJS: &'static str = "nextjs";

    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Stack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Stack {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for Stack {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl AsRef<str> for Stack {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Insertion-ordered, duplicate-free set of stacks.
///
/// Iteration order is the order stacks were inserted, which the detector
/// keeps fixed. "First matching stack wins" lookups depend on it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StackSet(Vec<Stack>);

impl StackSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a stack; returns `false` if it was already present.
    pub fn insert(&mut self, stack: impl Into<Stack>) -> bool {
        let stack = stack.into();
        if self.0.contains(&stack) {
            return false;
        }
        self.0.push(stack);
        true
    }

    pub fn contains(&self, stack: &str) -> bool {
        self.0.iter().any(|s| s.as_str() == stack)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Stack> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// True when every stack in `self` is also in `other`.
    ///
    /// An empty set is never considered covered.
    pub fn is_covered_by(&self, other: &StackSet) -> bool {
        !self.is_empty() && self.0.iter().all(|s| other.contains(s.as_str()))
    }

    /// Join stack names with `sep`, preserving order.
    pub fn join(&self, sep: &str) -> String {
        self.0
            .iter()
            .map(Stack::as_str)
            .collect::<Vec<_>>()
            .join(sep)
    }
}

impl<S: Into<Stack>> FromIterator<S> for StackSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = StackSet::new();
        for stack in iter {
            set.insert(stack);
        }
        set
    }
}

impl<'a> IntoIterator for &'a StackSet {
    type Item = &'a Stack;
    type IntoIter = std::slice::Iter<'a, Stack>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
