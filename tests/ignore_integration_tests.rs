//! Integration tests for ignore semantics through full discovery.

mod common;

use common::TestFixture;
use predicates::prelude::*;

#[test]
fn nested_ignore_files_scope_to_their_subtree() {
    let fixture = TestFixture::new();
    fixture.create_file(".harvxignore", "*.draft.md\n");
    fixture.create_file("src/.harvxignore", "*.generated.ts\n");
    fixture.create_file("types.generated.ts", "export type A = number;\n");
    fixture.create_file("src/types.generated.ts", "export type B = number;\n");
    fixture.create_file("design.draft.md", "draft\n");
    fixture.create_file("docs/design.draft.md", "draft\n");
    fixture.create_file("keep.md", "kept\n");

    harvx!()
        .current_dir(fixture.path())
        .args(["generate", "--tokenizer", "none", "--stdout", "--quiet"])
        .assert()
        .success()
        .stdout(predicate::str::contains("### types.generated.ts"))
        .stdout(predicate::str::contains("### src/types.generated.ts").not())
        .stdout(predicate::str::contains("design.draft.md").not())
        .stdout(predicate::str::contains("### keep.md"));
}

#[test]
fn default_ignores_drop_dependency_stores() {
    let fixture = TestFixture::new();
    fixture.create_tiny_repo();
    fixture.create_file("node_modules/lib/index.js", "module.exports = 1;\n");
    fixture.create_file("coverage/lcov.info", "TN:\n");

    harvx!()
        .current_dir(fixture.path())
        .args(["generate", "--tokenizer", "none", "--stdout", "--quiet"])
        .assert()
        .success()
        .stdout(predicate::str::contains("node_modules").not())
        .stdout(predicate::str::contains("coverage").not());
}

#[test]
fn cli_exclude_overlays_the_profile() {
    let fixture = TestFixture::new();
    fixture.create_tiny_repo();

    harvx!()
        .current_dir(fixture.path())
        .args([
            "generate",
            "--tokenizer",
            "none",
            "--stdout",
            "--quiet",
            "-x",
            "*.md",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("### go.mod"))
        .stdout(predicate::str::contains("### README.md").not());
}

#[test]
fn binary_files_never_render() {
    let fixture = TestFixture::new();
    fixture.create_tiny_repo();
    std::fs::write(fixture.path().join("blob.dat"), b"ab\0cd").unwrap();

    harvx!()
        .current_dir(fixture.path())
        .args(["generate", "--tokenizer", "none", "--stdout", "--quiet"])
        .assert()
        .success()
        .stdout(predicate::str::contains("blob.dat").not());
}

#[test]
fn vcs_ignore_files_are_honored() {
    let fixture = TestFixture::new();
    fixture.create_tiny_repo();
    fixture.create_file(".gitignore", "generated/\n");
    fixture.create_file("generated/out.txt", "machine output\n");

    harvx!()
        .current_dir(fixture.path())
        .args(["generate", "--tokenizer", "none", "--stdout", "--quiet"])
        .assert()
        .success()
        .stdout(predicate::str::contains("machine output").not());
}
