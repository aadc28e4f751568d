//! Human-readable and JSON rendering of devcheck results.

use std::fmt;

use devcheck_core::{
    CheckCounts, CheckResult, CheckRun, CheckStatus, StackSet, SubApp, ToolStatus, Verdict,
};
use serde::Serialize;

/// Failed-check output is cut to this many lines.
pub const MAX_OUTPUT_LINES: usize = 10;

const HEADER_RULE: usize = 60;
const FOOTER_RULE: usize = 40;

fn rule(width: usize) -> String {
    "─".repeat(width)
}

fn status_label(status: CheckStatus) -> &'static str {
    match status {
        CheckStatus::Pass => "✓ PASS",
        CheckStatus::Fail => "✗ FAIL",
        CheckStatus::Skip => "- SKIP",
    }
}

fn format_duration(duration_ms: u64) -> String {
    format!("{:.1}s", duration_ms as f64 / 1000.0)
}

/// Output lines to show for a failed check, with a trailer when cut.
pub fn truncate_output(output: &str) -> Vec<String> {
    let lines: Vec<&str> = output.split('\n').collect();
    let mut shown: Vec<String> = lines
        .iter()
        .take(MAX_OUTPUT_LINES)
        .map(|l| (*l).to_string())
        .collect();
    if lines.len() > MAX_OUTPUT_LINES {
        shown.push(format!("... ({} more lines)", lines.len() - MAX_OUTPUT_LINES));
    }
    shown
}

/// Text report for `devcheck check`.
pub struct CheckRunReport<'a> {
    pub repo_name: &'a str,
    pub run: &'a CheckRun,
}

impl CheckRunReport<'_> {
    fn write_check(f: &mut fmt::Formatter<'_>, prefix: &str, check: &CheckResult) -> fmt::Result {
        let duration = if check.duration_ms > 0 {
            format_duration(check.duration_ms)
        } else {
            String::new()
        };
        let line = format!(
            "{prefix}{:<12} {:<8} {duration}",
            check.kind.name(),
            status_label(check.status)
        );
        writeln!(f, "{}", line.trim_end())?;

        if check.is_fail() {
            let detail = if check.output.is_empty() {
                check.error.as_deref().unwrap_or_default()
            } else {
                check.output.as_str()
            };
            if !detail.is_empty() {
                for line in truncate_output(detail) {
                    writeln!(f, "{prefix}  {line}")?;
                }
            }
        }
        Ok(())
    }
}

impl fmt::Display for CheckRunReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f)?;
        writeln!(f, "{}/ ({})", self.repo_name, self.run.stack_summary())?;
        writeln!(f, "{}", rule(HEADER_RULE))?;

        if self.run.checks.is_empty() {
            return writeln!(f, "  No checks available for this stack");
        }

        for sub_app in &self.run.sub_apps {
            let mut checks = self.run.checks_for(&sub_app.path).peekable();
            if checks.peek().is_none() {
                continue;
            }
            let prefix = if sub_app.is_root() {
                "  "
            } else {
                writeln!(f)?;
                writeln!(f, "  {}/", sub_app.path)?;
                "    "
            };
            for check in checks {
                Self::write_check(f, prefix, check)?;
            }
        }

        writeln!(f)?;
        writeln!(f, "  {}", rule(FOOTER_RULE))?;
        writeln!(
            f,
            "  Total: {} ({})",
            self.run.verdict(),
            format_duration(self.run.duration_ms)
        )
    }
}

/// JSON document for `devcheck check --format json`.
#[derive(Debug, Serialize)]
pub struct CheckRunJson<'a> {
    pub version: &'static str,
    pub passed: bool,
    pub verdict: Verdict,
    pub counts: CheckCounts,
    pub stack_summary: String,
    #[serde(flatten)]
    pub run: &'a CheckRun,
}

impl<'a> CheckRunJson<'a> {
    pub fn new(run: &'a CheckRun) -> Self {
        Self {
            version: devcheck_core::VERSION,
            passed: run.passed(),
            verdict: run.verdict(),
            counts: run.counts(),
            stack_summary: run.stack_summary(),
            run,
        }
    }
}

/// Text listing for `devcheck detect`.
pub struct SubAppListing<'a> {
    pub repo_name: &'a str,
    pub sub_apps: &'a [SubApp],
}

impl fmt::Display for SubAppListing<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.sub_apps.is_empty() {
            return writeln!(f, "No project stack detected");
        }
        writeln!(f, "{}/", self.repo_name)?;
        writeln!(f, "{}", rule(HEADER_RULE))?;
        for sub_app in self.sub_apps {
            let name = if sub_app.is_root() {
                "./".to_string()
            } else {
                format!("{}/", sub_app.path)
            };
            writeln!(f, "  {:<24} {}", name, sub_app.stacks.join(", "))?;
        }
        Ok(())
    }
}

/// Text listing for `devcheck tools`.
pub struct ToolListing<'a> {
    pub repo_name: &'a str,
    pub stacks: &'a StackSet,
    pub tools: &'a [ToolStatus],
}

impl fmt::Display for ToolListing<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}/ tools ({})", self.repo_name, self.stacks.join(", "))?;
        writeln!(f, "{}", rule(HEADER_RULE))?;
        if self.tools.is_empty() {
            return writeln!(f, "  No tools required for this stack");
        }
        for tool in self.tools {
            let (mark, detail) = match (tool.found, tool.version.as_deref()) {
                (true, Some(version)) => ("✓", version),
                (true, None) => ("✓", "installed"),
                (false, _) => ("✗", "not found"),
            };
            writeln!(f, "  {mark} {:<16} {detail}", tool.name)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use devcheck_core::{CheckKind, Stack};
    use std::path::PathBuf;
    use uuid::Uuid;

    fn stacks(ids: &[&str]) -> StackSet {
        ids.iter().copied().collect()
    }

    fn check(
        sub_app: &str,
        kind: CheckKind,
        status: CheckStatus,
        duration_ms: u64,
        output: &str,
    ) -> CheckResult {
        CheckResult {
            kind,
            sub_app: sub_app.to_string(),
            stack: Some(Stack::new("go")),
            status,
            duration_ms,
            output: output.to_string(),
            error: None,
        }
    }

    fn run(sub_apps: Vec<SubApp>, checks: Vec<CheckResult>, duration_ms: u64) -> CheckRun {
        CheckRun {
            run_id: Uuid::new_v4(),
            repo_path: PathBuf::from("/work/svc"),
            started_at: Utc::now(),
            sub_apps,
            checks,
            duration_ms,
        }
    }

    #[test]
    fn test_truncate_output() {
        assert_eq!(truncate_output("a\nb"), vec!["a", "b"]);

        let long: Vec<String> = (1..=13).map(|i| format!("line {i}")).collect();
        let shown = truncate_output(&long.join("\n"));
        assert_eq!(shown.len(), MAX_OUTPUT_LINES + 1);
        assert_eq!(shown[9], "line 10");
        assert_eq!(shown[10], "... (3 more lines)");
    }

    #[test]
    fn test_render_single_root() {
        let report = run(
            vec![SubApp::root(stacks(&["go"]))],
            vec![
                check("", CheckKind::Lint, CheckStatus::Fail, 1200, "main.go:3: unused"),
                CheckResult::cascade_skip(CheckKind::Build, ""),
                CheckResult::cascade_skip(CheckKind::Test, ""),
            ],
            1300,
        );
        let text = CheckRunReport {
            repo_name: "svc",
            run: &report,
        }
        .to_string();

        let expected = format!(
            "\nsvc/ (go)\n{}\n  lint         ✗ FAIL   1.2s\n    main.go:3: unused\n  build        - SKIP\n  test         - SKIP\n\n  {}\n  Total: FAIL (1.3s)\n",
            "─".repeat(60),
            "─".repeat(40)
        );
        assert_eq!(text, expected);
    }

    #[test]
    fn test_render_groups_sub_apps() {
        let report = run(
            vec![
                SubApp::root(stacks(&["go"])),
                SubApp::new("web", stacks(&["ts", "nextjs"])),
            ],
            vec![
                check("", CheckKind::Lint, CheckStatus::Pass, 300, "ok"),
                check("web", CheckKind::Lint, CheckStatus::Pass, 2000, ""),
            ],
            2300,
        );
        let text = CheckRunReport {
            repo_name: "mono",
            run: &report,
        }
        .to_string();

        assert!(text.contains("mono/ (root:go | web:ts,nextjs)"));
        assert!(text.contains("\n  lint         ✓ PASS   0.3s\n"));
        assert!(text.contains("\n  web/\n    lint         ✓ PASS   2.0s\n"));
        // Passing output is not shown.
        assert!(!text.contains("  ok\n"));
        assert!(text.ends_with("  Total: PASS (2.3s)\n"));
    }

    #[test]
    fn test_render_no_checks() {
        let report = run(vec![], vec![], 0);
        let text = CheckRunReport {
            repo_name: "empty",
            run: &report,
        }
        .to_string();
        assert!(text.contains("empty/ ()"));
        assert!(text.ends_with("  No checks available for this stack\n"));
        assert!(!text.contains("Total"));
    }

    #[test]
    fn test_render_spawn_failure_shows_error() {
        let mut failed = check("", CheckKind::Lint, CheckStatus::Fail, 0, "");
        failed.error = Some("failed to spawn golangci-lint: No such file".to_string());
        let report = run(vec![SubApp::root(stacks(&["go"]))], vec![failed], 5);
        let text = CheckRunReport {
            repo_name: "svc",
            run: &report,
        }
        .to_string();
        assert!(text.contains("  lint         ✗ FAIL\n    failed to spawn golangci-lint"));
    }

    #[test]
    fn test_json_document() {
        let report = run(
            vec![SubApp::root(stacks(&["go"]))],
            vec![check("", CheckKind::Test, CheckStatus::Pass, 10, "ok")],
            10,
        );
        let value = serde_json::to_value(CheckRunJson::new(&report)).expect("serialize");
        assert_eq!(value["passed"], true);
        assert_eq!(value["verdict"], "PASS");
        assert_eq!(value["counts"]["passed"], 1);
        assert_eq!(value["stack_summary"], "go");
        assert_eq!(value["checks"][0]["kind"], "test");
        assert_eq!(value["checks"][0]["status"], "pass");
        assert_eq!(value["sub_apps"][0]["stacks"][0], "go");
    }

    #[test]
    fn test_sub_app_listing() {
        let apps = vec![
            SubApp::root(stacks(&["go"])),
            SubApp::new("apps/web", stacks(&["ts", "nextjs"])),
        ];
        let text = SubAppListing {
            repo_name: "mono",
            sub_apps: &apps,
        }
        .to_string();
        assert!(text.contains(&format!("  {:<24} go\n", "./")));
        assert!(text.contains(&format!("  {:<24} ts, nextjs\n", "apps/web/")));

        let empty = SubAppListing {
            repo_name: "mono",
            sub_apps: &[],
        }
        .to_string();
        assert_eq!(empty, "No project stack detected\n");
    }

    #[test]
    fn test_tool_listing() {
        let tools = vec![
            ToolStatus {
                name: "go".to_string(),
                found: true,
                path: Some(PathBuf::from("/usr/bin/go")),
                version: Some("go version go1.22.1".to_string()),
            },
            ToolStatus {
                name: "golangci-lint".to_string(),
                found: false,
                path: None,
                version: None,
            },
        ];
        let text = ToolListing {
            repo_name: "svc",
            stacks: &stacks(&["go"]),
            tools: &tools,
        }
        .to_string();
        assert!(text.starts_with("svc/ tools (go)\n"));
        assert!(text.contains(&format!("  ✓ {:<16} go version go1.22.1\n", "go")));
        assert!(text.contains(&format!("  ✗ {:<16} not found\n", "golangci-lint")));
    }
}
