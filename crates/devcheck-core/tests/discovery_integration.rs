//! Integration tests for stack detection, discovery and resolution over
//! fixture repositories.

use std::fs;
use std::path::Path;

use devcheck_core::{
    detect_stacks, discover_sub_apps, resolve_invocation, resolve_kinds, CheckKind,
    CommandRegistry, DevcheckConfig, CONFIG_FILE_NAME,
};

fn touch(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create parent");
    }
    fs::write(path, content).expect("write fixture");
}

/// Test: go-only repo resolves to one root sub-app with lint/build/test
#[test]
fn test_go_only_repository() {
    let repo = tempfile::tempdir().expect("tempdir");
    touch(repo.path(), "go.mod", "module example.com/svc\n");

    let apps = discover_sub_apps(repo.path());
    assert_eq!(apps.len(), 1);
    assert!(apps[0].is_root());
    assert_eq!(apps[0].stacks.join(","), "go");

    let kinds = resolve_kinds(&CommandRegistry::builtin(), &apps[0].stacks, None);
    assert_eq!(kinds, vec![CheckKind::Lint, CheckKind::Build, CheckKind::Test]);
}

/// Test: full monorepo layout is discovered in canonical order
#[test]
fn test_monorepo_layout() {
    let repo = tempfile::tempdir().expect("tempdir");
    let root = repo.path();
    touch(root, "go.mod", "module example.com/mono\n");
    // Same stack as root: suppressed.
    touch(root, "api/go.mod", "module example.com/mono/api\n");
    touch(root, "web/package.json", r#"{"scripts":{"lint":"next lint"}}"#);
    touch(root, "web/tsconfig.json", "{}");
    touch(root, "web/next.config.mjs", "export default {}");
    touch(root, "apps/worker/pyproject.toml", "[project]\nname = \"worker\"\n");
    touch(root, "apps/admin/package.json", "{}");
    touch(root, "packages/ui/package.json", "{}");
    touch(root, "packages/ui/tsconfig.json", "{}");
    // No markers: not a sub-app.
    fs::create_dir_all(root.join("packages/empty")).expect("mkdir");

    let apps = discover_sub_apps(root);
    let summary: Vec<String> = apps
        .iter()
        .map(|a| format!("{}={}", a.display_name(), a.stacks.join(",")))
        .collect();
    assert_eq!(
        summary,
        vec![
            "root=go",
            "web=ts,nextjs",
            "apps/admin=js",
            "apps/worker=python",
            "packages/ui=ts",
        ]
    );
}

/// Test: nested package manifests resolve the right invocation per stack
#[test]
fn test_nextjs_resolution() {
    let repo = tempfile::tempdir().expect("tempdir");
    touch(repo.path(), "package.json", "{}");
    touch(repo.path(), "next.config.js", "module.exports = {}");

    let stacks = detect_stacks(repo.path());
    assert_eq!(stacks.join(","), "js,nextjs");

    let registry = CommandRegistry::builtin();
    let kinds = resolve_kinds(&registry, &stacks, None);
    assert_eq!(kinds, CheckKind::ALL.to_vec());

    // js has no typecheck; nextjs supplies it.
    let typecheck = resolve_invocation(&registry, &stacks, CheckKind::Typecheck)
        .expect("typecheck resolves");
    assert_eq!(typecheck.stack.as_str(), "nextjs");
    assert_eq!(typecheck.command_line(), "npm run typecheck");
}

/// Test: repository config overlays the builtin registry
#[test]
fn test_repository_config_overlay() {
    let repo = tempfile::tempdir().expect("tempdir");
    touch(repo.path(), "Cargo.toml", "[package]\nname = \"x\"\n");
    touch(
        repo.path(),
        CONFIG_FILE_NAME,
        "timeout_secs = 120\n\n[commands.rust]\nlint = [\"cargo\", \"clippy\", \"--all-targets\"]\n",
    );

    let config = DevcheckConfig::load_for_repo(repo.path()).expect("load config");
    let registry = config.registry().expect("overlay");
    let stacks = detect_stacks(repo.path());

    let lint = resolve_invocation(&registry, &stacks, CheckKind::Lint).expect("lint");
    assert_eq!(lint.command_line(), "cargo clippy --all-targets");
    assert_eq!(
        lint.with_fix(true).command_line(),
        "cargo clippy --all-targets --fix"
    );
    assert_eq!(config.timeout().map(|t| t.as_secs()), Some(120));
}

/// Test: empty repository has nothing to check
#[test]
fn test_empty_repository() {
    let repo = tempfile::tempdir().expect("tempdir");
    assert!(discover_sub_apps(repo.path()).is_empty());
}
