//! Content-hashed snapshots for differential runs.
//!
//! One snapshot per profile, persisted after every successful run. The
//! snapshot records branch and head so a diff against a drifted branch is
//! refused rather than silently comparing unrelated histories.

use std::collections::BTreeMap;
use std::fs;
use std::io::BufReader;
use std::path::Path;

use serde::{Deserialize, Serialize};
use xxhash_rust::xxh3::xxh3_64;

use crate::pipeline::FileRecord;
use crate::state::{FileLock, LOCK_WAIT, write_atomic};
use crate::vcs::VcsContext;
use crate::{HarvxError, Result};

const SNAPSHOT_VERSION: u32 = 2;

/// Per-file snapshot entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SnapshotEntry {
    pub size: u64,
    /// 64-bit content hash, zero-padded hex.
    pub hash: String,
    /// File modification time (seconds since epoch).
    #[serde(default)]
    pub mtime: u64,
}

/// A persisted run state: `{ version, profile, generated_at, vcs_branch,
/// vcs_head, files }`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Snapshot {
    version: u32,
    pub profile: String,
    pub generated_at: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vcs_branch: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vcs_head: Option<String>,
    pub files: BTreeMap<String, SnapshotEntry>,
}

/// Set-wise comparison of a snapshot against the current file set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SnapshotDiff {
    pub added: Vec<String>,
    pub modified: Vec<String>,
    pub deleted: Vec<String>,
}

impl SnapshotDiff {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.modified.is_empty() && self.deleted.is_empty()
    }

    /// Every changed path, for restricting discovery in diff mode.
    #[must_use]
    pub fn changed_paths(&self) -> Vec<String> {
        let mut paths: Vec<String> = self
            .added
            .iter()
            .chain(&self.modified)
            .chain(&self.deleted)
            .cloned()
            .collect();
        paths.sort();
        paths
    }
}

impl Snapshot {
    /// Builds a snapshot from the processed record set.
    #[must_use]
    pub fn from_records(
        profile: &str,
        records: &[FileRecord],
        vcs: Option<&VcsContext>,
    ) -> Self {
        let mut files = BTreeMap::new();
        for record in records {
            let mtime = fs::metadata(&record.abs_path)
                .and_then(|m| m.modified())
                .ok()
                .and_then(|t| t.duration_since(std::time::UNIX_EPOCH).ok())
                .map_or(0, |d| d.as_secs());
            files.insert(
                record.path.clone(),
                SnapshotEntry {
                    size: record.size,
                    hash: format!("{:016x}", record.content_hash),
                    mtime,
                },
            );
        }
        Self {
            version: SNAPSHOT_VERSION,
            profile: profile.to_string(),
            generated_at: crate::state::unix_now(),
            vcs_branch: vcs.and_then(|c| c.branch.clone()),
            vcs_head: vcs.map(|c| c.head.clone()),
            files,
        }
    }

    /// Loads a snapshot, holding a shared lock while parsing.
    pub fn load(path: &Path) -> Result<Self> {
        let file = fs::File::open(path).map_err(|e| HarvxError::FileAccess {
            path: path.to_path_buf(),
            source: e,
        })?;
        let lock = FileLock::shared(&file, LOCK_WAIT);
        if lock.is_none() {
            crate::output::print_warning_full(
                &format!("Snapshot {} is locked by another run", path.display()),
                None,
                Some("The loaded baseline may be mid-update"),
            );
        }
        let reader = BufReader::new(&file);
        let snapshot: Self = serde_json::from_reader(reader)?;
        drop(lock);
        Ok(snapshot)
    }

    /// Loads a snapshot if present; `None` on a first run.
    pub fn load_if_present(path: &Path) -> Result<Option<Self>> {
        if path.exists() {
            Ok(Some(Self::load(path)?))
        } else {
            Ok(None)
        }
    }

    /// Saves through the staged atomic write; an exhausted lock wait is
    /// fatal.
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        write_atomic(path, json.as_bytes())
    }

    /// Whether this snapshot's version is readable by this build.
    #[must_use]
    pub const fn is_current_version(&self) -> bool {
        self.version == SNAPSHOT_VERSION
    }

    /// Refuses comparison when the snapshot was taken on another branch.
    pub fn check_branch(&self, current: Option<&VcsContext>) -> Result<()> {
        let (Some(snapshot_branch), Some(current_branch)) = (
            self.vcs_branch.as_deref(),
            current.and_then(|c| c.branch.as_deref()),
        ) else {
            return Ok(());
        };
        if snapshot_branch == current_branch {
            Ok(())
        } else {
            Err(HarvxError::SnapshotDrift {
                snapshot_branch: snapshot_branch.to_string(),
                current_branch: current_branch.to_string(),
            })
        }
    }

    /// Compares this snapshot against the current record set.
    #[must_use]
    pub fn diff_records(&self, records: &[FileRecord]) -> SnapshotDiff {
        let mut diff = SnapshotDiff::default();
        let mut seen = std::collections::BTreeSet::new();
        for record in records {
            seen.insert(record.path.as_str());
            let hash = format!("{:016x}", record.content_hash);
            match self.files.get(&record.path) {
                None => diff.added.push(record.path.clone()),
                Some(entry) if entry.hash != hash => diff.modified.push(record.path.clone()),
                Some(_) => {}
            }
        }
        for path in self.files.keys() {
            if !seen.contains(path.as_str()) {
                diff.deleted.push(path.clone());
            }
        }
        diff.added.sort();
        diff.modified.sort();
        diff.deleted.sort();
        diff
    }
}

/// 64-bit content hash used for snapshot entries and record hashes.
#[must_use]
pub fn hash_content(content: &str) -> u64 {
    xxh3_64(content.as_bytes())
}

#[cfg(test)]
#[path = "snapshot_tests.rs"]
mod tests;
