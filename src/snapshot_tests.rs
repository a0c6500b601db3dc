use std::path::PathBuf;

use tempfile::TempDir;

use super::*;
use crate::pipeline::FileRecord;
use crate::vcs::VcsContext;

fn record(path: &str, content: &str) -> FileRecord {
    FileRecord {
        path: path.to_string(),
        abs_path: PathBuf::from(format!("/nonexistent/{path}")),
        size: content.len() as u64,
        content: content.to_string(),
        content_hash: hash_content(content),
        ..FileRecord::default()
    }
}

#[test]
fn round_trip_yields_empty_diff() {
    let dir = TempDir::new().unwrap();
    let records = vec![record("a.rs", "fn a() {}"), record("b.rs", "fn b() {}")];
    let snapshot = Snapshot::from_records("default", &records, None);

    let path = dir.path().join("default.json");
    snapshot.save(&path).unwrap();
    let loaded = Snapshot::load(&path).unwrap();

    assert_eq!(loaded, snapshot);
    assert!(loaded.is_current_version());
    assert!(loaded.diff_records(&records).is_empty());
}

#[test]
fn diff_reports_added_modified_deleted() {
    let before = vec![
        record("keep.rs", "unchanged"),
        record("change.rs", "old content"),
        record("remove.rs", "going away"),
    ];
    let snapshot = Snapshot::from_records("default", &before, None);

    let after = vec![
        record("keep.rs", "unchanged"),
        record("change.rs", "new content"),
        record("new.rs", "brand new"),
    ];
    let diff = snapshot.diff_records(&after);

    assert_eq!(diff.added, vec!["new.rs".to_string()]);
    assert_eq!(diff.modified, vec!["change.rs".to_string()]);
    assert_eq!(diff.deleted, vec!["remove.rs".to_string()]);
    assert!(!diff.is_empty());
}

#[test]
fn changed_paths_collects_all_three_sets() {
    let diff = SnapshotDiff {
        added: vec!["b".to_string()],
        modified: vec!["a".to_string()],
        deleted: vec!["c".to_string()],
    };
    assert_eq!(
        diff.changed_paths(),
        vec!["a".to_string(), "b".to_string(), "c".to_string()]
    );
}

#[test]
fn load_if_present_tolerates_missing_file() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("nope.json");
    assert!(Snapshot::load_if_present(&missing).unwrap().is_none());
}

#[test]
fn branch_drift_refuses_comparison() {
    let records = vec![record("a.rs", "x")];
    let ctx = VcsContext {
        branch: Some("main".to_string()),
        head: "abc123".to_string(),
    };
    let snapshot = Snapshot::from_records("default", &records, Some(&ctx));

    let drifted = VcsContext {
        branch: Some("feature".to_string()),
        head: "def456".to_string(),
    };
    let err = snapshot.check_branch(Some(&drifted)).unwrap_err();
    assert_eq!(err.error_type(), "SnapshotDrift");

    // Same branch is fine; so is no VCS at all.
    assert!(snapshot.check_branch(Some(&ctx)).is_ok());
    assert!(snapshot.check_branch(None).is_ok());
}

#[test]
fn snapshot_records_vcs_context() {
    let ctx = VcsContext {
        branch: Some("main".to_string()),
        head: "abc123".to_string(),
    };
    let snapshot = Snapshot::from_records("review", &[], Some(&ctx));
    assert_eq!(snapshot.profile, "review");
    assert_eq!(snapshot.vcs_branch.as_deref(), Some("main"));
    assert_eq!(snapshot.vcs_head.as_deref(), Some("abc123"));
    assert!(snapshot.generated_at > 0);
}

#[test]
fn entry_hashes_are_zero_padded_hex() {
    let records = vec![record("a.rs", "content")];
    let snapshot = Snapshot::from_records("default", &records, None);
    let entry = snapshot.files.get("a.rs").unwrap();
    assert_eq!(entry.hash.len(), 16);
    assert!(entry.hash.chars().all(|c| c.is_ascii_hexdigit()));
}

#[test]
fn hash_content_is_stable_and_sensitive() {
    assert_eq!(hash_content("abc"), hash_content("abc"));
    assert_ne!(hash_content("abc"), hash_content("abd"));
}
