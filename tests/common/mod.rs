#![allow(dead_code)]

use std::fs;
use std::path::Path;

use tempfile::TempDir;

/// Creates an `assert_cmd` Command for the harvx binary.
#[macro_export]
macro_rules! harvx {
    () => {{
        let mut cmd = assert_cmd::Command::new(assert_cmd::cargo::cargo_bin!("harvx"));
        // Keep ambient environment overrides out of test runs.
        cmd.env_remove("HARVX_PROFILE")
            .env_remove("HARVX_OUTPUT")
            .env_remove("HARVX_FORMAT")
            .env_remove("HARVX_TARGET")
            .env_remove("HARVX_MAX_TOKENS")
            .env_remove("HARVX_TOKENIZER")
            .env_remove("HARVX_COMPRESSION")
            .env_remove("HARVX_REDACTION")
            .env_remove("HARVX_LOG_JSON");
        cmd
    }};
}

/// Creates a temporary directory with test fixtures for integration tests.
pub struct TestFixture {
    pub dir: TempDir,
}

impl TestFixture {
    /// Creates a new test fixture with an empty temp directory.
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("Failed to create temp directory"),
        }
    }

    /// Creates a file with the given content in the temp directory.
    pub fn create_file(&self, relative_path: &str, content: &str) {
        let path = self.dir.path().join(relative_path);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent directories");
        }
        fs::write(&path, content).expect("Failed to write file");
    }

    /// Creates a directory in the temp directory.
    pub fn create_dir(&self, relative_path: &str) {
        let path = self.dir.path().join(relative_path);
        fs::create_dir_all(&path).expect("Failed to create directory");
    }

    /// Returns the path to the temp directory.
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Creates a repo profile file.
    pub fn create_profile(&self, content: &str) {
        self.create_file("harvx.toml", content);
    }

    /// Seeds the canonical tiny repo used across scenarios.
    pub fn create_tiny_repo(&self) {
        self.create_file("go.mod", "module example.com/app\n");
        self.create_file(
            "src/main.go",
            "package main\n\nfunc main() {\n\tprintln(\"hi\")\n}\n",
        );
        self.create_file("README.md", "# App\n");
    }

    /// Reads a file back from the fixture.
    pub fn read_file(&self, relative_path: &str) -> String {
        fs::read_to_string(self.dir.path().join(relative_path)).expect("Failed to read file")
    }

    /// Whether a path exists in the fixture.
    pub fn exists(&self, relative_path: &str) -> bool {
        self.dir.path().join(relative_path).exists()
    }
}
