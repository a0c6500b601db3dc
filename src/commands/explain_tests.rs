use clap::Parser;

use super::*;
use crate::cli::{Cli, ExplainArgs, ExplainFormat};

#[test]
fn explain_runs_against_a_plain_directory() {
    let dir = tempfile::TempDir::new().unwrap();
    let cli = Cli::try_parse_from(["harvx", "--quiet", "explain", "src/main.rs"]).unwrap();
    let args = ExplainArgs {
        path: "src/main.rs".to_string(),
        dir: Some(dir.path().to_path_buf()),
        profile: None,
        profile_file: None,
        format: ExplainFormat::Text,
    };
    assert_eq!(run_explain(&args, &cli), crate::EXIT_SUCCESS);
}

#[test]
fn explain_json_format_succeeds() {
    let dir = tempfile::TempDir::new().unwrap();
    let cli = Cli::try_parse_from(["harvx", "--quiet", "explain", "x"]).unwrap();
    let args = ExplainArgs {
        path: "node_modules/pkg/index.js".to_string(),
        dir: Some(dir.path().to_path_buf()),
        profile: None,
        profile_file: None,
        format: ExplainFormat::Json,
    };
    assert_eq!(run_explain(&args, &cli), crate::EXIT_SUCCESS);
}
