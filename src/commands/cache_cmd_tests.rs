use std::path::{Path, PathBuf};

use tempfile::TempDir;

use super::*;
use crate::snapshot::Snapshot;

#[test]
fn resolve_root_defaults_to_cwd() {
    assert_eq!(resolve_root(None), PathBuf::from("."));
    assert_eq!(
        resolve_root(Some(Path::new("/repo"))),
        PathBuf::from("/repo")
    );
}

#[test]
fn remove_if_present_tolerates_missing_files() {
    let dir = TempDir::new().unwrap();
    assert!(remove_if_present(&dir.path().join("nope.json")).is_ok());

    let existing = dir.path().join("real.json");
    std::fs::write(&existing, b"{}").unwrap();
    assert!(remove_if_present(&existing).is_ok());
    assert!(!existing.exists());
}

#[test]
fn clear_removes_every_profile_snapshot() {
    use clap::Parser;

    let dir = TempDir::new().unwrap();
    for name in ["default", "review"] {
        Snapshot::from_records(name, &[], None)
            .save(&crate::state::snapshot_path(dir.path(), name))
            .unwrap();
    }

    let cli = crate::cli::Cli::try_parse_from(["harvx", "cache", "clear"]).unwrap();
    let args = crate::cli::CacheArgs {
        action: crate::cli::CacheAction::Clear {
            dir: Some(dir.path().to_path_buf()),
            profile: None,
        },
    };
    assert_eq!(run_cache(&args, &cli), crate::EXIT_SUCCESS);
    assert!(
        !crate::state::snapshot_path(dir.path(), "default").exists()
    );
    assert!(!crate::state::snapshot_path(dir.path(), "review").exists());
}
