use std::fs;
use std::path::Path;

use tempfile::TempDir;

use super::*;

fn write(dir: &TempDir, rel: &str, content: &str) {
    let path = dir.path().join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

#[test]
fn defaults_ignore_dependency_stores() {
    let dir = TempDir::new().unwrap();
    let matcher = IgnoreMatcher::with_defaults(dir.path()).unwrap();

    assert!(matcher.ignored("node_modules", true));
    assert!(matcher.ignored("node_modules/react/index.js", false));
    assert!(matcher.ignored("target", true));
    assert!(matcher.ignored(".git", true));
}

#[test]
fn defaults_ignore_env_family_but_keep_example() {
    let dir = TempDir::new().unwrap();
    let matcher = IgnoreMatcher::with_defaults(dir.path()).unwrap();

    assert!(matcher.ignored(".env", false));
    assert!(matcher.ignored(".env.production", false));
    assert!(!matcher.ignored(".env.example", false));
}

#[test]
fn defaults_ignore_key_material() {
    let dir = TempDir::new().unwrap();
    let matcher = IgnoreMatcher::with_defaults(dir.path()).unwrap();

    assert!(matcher.ignored("certs/server.pem", false));
    assert!(matcher.ignored("id_rsa.key", false));
    assert!(matcher.ignored("bundle.p12", false));
    assert!(matcher.ignored("win.pfx", false));
}

#[test]
fn source_files_are_kept() {
    let dir = TempDir::new().unwrap();
    let matcher = IgnoreMatcher::with_defaults(dir.path()).unwrap();

    assert!(!matcher.ignored("src/main.rs", false));
    assert!(!matcher.ignored("README.md", false));
    assert!(!matcher.ignored("Cargo.toml", false));
}

#[test]
fn leading_dot_slash_and_backslashes_normalize() {
    let dir = TempDir::new().unwrap();
    let matcher = IgnoreMatcher::with_defaults(dir.path()).unwrap();

    assert!(matcher.ignored("./node_modules/x.js", false));
    assert!(matcher.ignored("node_modules\\x.js", false));
}

#[test]
fn nested_ignore_files_scope_to_their_directory() {
    let dir = TempDir::new().unwrap();
    write(&dir, ".harvxignore", "*.draft.md\n");
    write(&dir, "src/.harvxignore", "*.generated.ts\n");
    // Directories must exist for the scope pre-pass to find the files.
    let matcher = IgnoreMatcher::with_defaults(dir.path()).unwrap();

    // Root-scope rule applies at any depth.
    assert!(matcher.ignored("design.draft.md", false));
    assert!(matcher.ignored("docs/design.draft.md", false));

    // The src-scoped rule applies only under src/.
    assert!(matcher.ignored("src/types.generated.ts", false));
    assert!(!matcher.ignored("types.generated.ts", false));
}

#[test]
fn negation_overrides_earlier_match_in_same_scope() {
    let dir = TempDir::new().unwrap();
    write(&dir, ".harvxignore", "*.md\n!README.md\n");
    let matcher = IgnoreMatcher::with_defaults(dir.path()).unwrap();

    assert!(matcher.ignored("notes.md", false));
    assert!(!matcher.ignored("README.md", false));
}

#[test]
fn directory_only_pattern_requires_is_dir() {
    let dir = TempDir::new().unwrap();
    write(&dir, ".harvxignore", "build/\n");
    let matcher = IgnoreMatcher::with_defaults(dir.path()).unwrap();

    assert!(matcher.ignored("build", true));
    // A plain file named "build" is not a directory match.
    assert!(!matcher.ignored("docs/build.md", false));
}

#[test]
fn profile_ignores_apply_at_root() {
    let dir = TempDir::new().unwrap();
    let matcher = IgnoreMatcher::build(
        dir.path(),
        &["generated/**".to_string()],
        &[],
        &[],
    )
    .unwrap();

    assert!(matcher.ignored("generated/api.rs", false));
    assert!(!matcher.ignored("src/api.rs", false));
}

#[test]
fn cli_excludes_are_strongest() {
    let dir = TempDir::new().unwrap();
    write(&dir, ".harvxignore", "!special.log\n");
    let matcher = IgnoreMatcher::build(
        dir.path(),
        &[],
        &["*.log".to_string(), "special.log".to_string()],
        &[],
    )
    .unwrap();

    assert!(matcher.ignored("app.log", false));
    assert!(matcher.ignored("special.log", false));
}

#[test]
fn cli_include_rescues_default_ignored_file() {
    let dir = TempDir::new().unwrap();
    let matcher =
        IgnoreMatcher::build(dir.path(), &[], &[], &["*.pem".to_string()]).unwrap();

    assert!(!matcher.ignored("certs/server.pem", false));
}

#[test]
fn deeper_scope_overrides_shallower() {
    let dir = TempDir::new().unwrap();
    write(&dir, ".harvxignore", "*.snap\n");
    write(&dir, "tests/.harvxignore", "!golden.snap\n");
    let matcher = IgnoreMatcher::with_defaults(dir.path()).unwrap();

    assert!(matcher.ignored("src/out.snap", false));
    assert!(!matcher.ignored("tests/golden.snap", false));
}

#[test]
fn scope_pre_pass_skips_default_ignored_directories() {
    let dir = TempDir::new().unwrap();
    write(&dir, "node_modules/.harvxignore", "*.rs\n");
    let matcher = IgnoreMatcher::with_defaults(dir.path()).unwrap();

    // The rule inside node_modules is never collected.
    assert!(!matcher.ignored("src/lib.rs", false));
    let _ = Path::new("unused");
}
