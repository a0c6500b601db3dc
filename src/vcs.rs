//! VCS integration: branch/head capture, tracked-file sets, and changed-path
//! sets for differential runs.
//!
//! All paths returned here are repo-relative with forward slashes, matching
//! the `FileRecord` path convention.

use std::collections::HashSet;
use std::path::Path;

use crate::error::{HarvxError, Result};

/// Repository context captured into snapshots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VcsContext {
    /// Branch name (None for detached HEAD).
    pub branch: Option<String>,
    /// Full head commit id.
    pub head: String,
}

impl VcsContext {
    /// Current context for the repository containing `path`.
    ///
    /// Returns `None` outside a repository or before the first commit.
    #[must_use]
    pub fn from_path(path: &Path) -> Option<Self> {
        let repo = gix::discover(path).ok()?;
        let head_commit = repo.head_commit().ok()?;
        let head = head_commit.id().to_string();
        let branch = repo
            .head_name()
            .ok()
            .flatten()
            .map(|name| name.shorten().to_string());
        Some(Self { branch, head })
    }
}

/// Every path in the VCS index, for `--vcs-tracked-only` discovery.
pub fn tracked_paths(root: &Path) -> Result<HashSet<String>> {
    let repo = discover(root)?;
    let index = repo
        .index_or_empty()
        .map_err(|e| HarvxError::Vcs(format!("Failed to read index: {e}")))?;

    let mut paths = HashSet::new();
    for entry in index.entries() {
        let raw = entry.path(&index);
        paths.insert(String::from_utf8_lossy(raw).replace('\\', "/"));
    }
    Ok(paths)
}

/// Paths changed between `base_ref` and HEAD.
pub fn changed_since(root: &Path, base_ref: &str) -> Result<HashSet<String>> {
    changed_range(root, base_ref, "HEAD")
}

/// Paths changed between two refs: present in only one tree, or present in
/// both with different object ids.
pub fn changed_range(root: &Path, base_ref: &str, head_ref: &str) -> Result<HashSet<String>> {
    let repo = discover(root)?;

    let base_paths = tree_paths(&repo, base_ref)?;
    let head_paths = tree_paths(&repo, head_ref)?;

    let mut changed = HashSet::new();
    for (path, oid) in &head_paths {
        let unchanged = base_paths.get(path).is_some_and(|base_oid| base_oid == oid);
        if !unchanged {
            changed.insert(path.clone());
        }
    }
    for path in base_paths.keys() {
        if !head_paths.contains_key(path) {
            changed.insert(path.clone());
        }
    }
    Ok(changed)
}

/// Classifies the changed set between two refs into added, modified, and
/// deleted paths, for the rendered change section.
pub fn classify_changes(
    root: &Path,
    base_ref: &str,
    head_ref: &str,
) -> Result<crate::snapshot::SnapshotDiff> {
    let repo = discover(root)?;
    let base_paths = tree_paths(&repo, base_ref)?;
    let head_paths = tree_paths(&repo, head_ref)?;

    let mut diff = crate::snapshot::SnapshotDiff::default();
    for (path, oid) in &head_paths {
        match base_paths.get(path) {
            None => diff.added.push(path.clone()),
            Some(base_oid) if base_oid != oid => diff.modified.push(path.clone()),
            Some(_) => {}
        }
    }
    for path in base_paths.keys() {
        if !head_paths.contains_key(path) {
            diff.deleted.push(path.clone());
        }
    }
    diff.added.sort();
    diff.modified.sort();
    diff.deleted.sort();
    Ok(diff)
}

fn discover(root: &Path) -> Result<gix::Repository> {
    gix::discover(root).map_err(|e| HarvxError::Vcs(format!("Failed to discover repository: {e}")))
}

fn resolve_commit<'repo>(
    repo: &'repo gix::Repository,
    reference: &str,
) -> Result<gix::Commit<'repo>> {
    repo.rev_parse_single(reference)
        .map_err(|e| HarvxError::Vcs(format!("Failed to parse reference '{reference}': {e}")))?
        .object()
        .map_err(|e| HarvxError::Vcs(format!("Failed to get object for '{reference}': {e}")))?
        .peel_to_commit()
        .map_err(|e| HarvxError::Vcs(format!("Failed to peel to commit '{reference}': {e}")))
}

fn tree_paths(
    repo: &gix::Repository,
    reference: &str,
) -> Result<std::collections::HashMap<String, gix::ObjectId>> {
    let commit = resolve_commit(repo, reference)?;
    let tree = commit
        .tree()
        .map_err(|e| HarvxError::Vcs(format!("Failed to get tree for '{reference}': {e}")))?;

    let mut paths = std::collections::HashMap::new();
    collect_tree_paths(&tree, "", &mut paths)?;
    Ok(paths)
}

fn collect_tree_paths(
    tree: &gix::Tree<'_>,
    prefix: &str,
    paths: &mut std::collections::HashMap<String, gix::ObjectId>,
) -> Result<()> {
    for entry in tree.iter() {
        let entry =
            entry.map_err(|e| HarvxError::Vcs(format!("Failed to read tree entry: {e}")))?;
        let name = std::str::from_utf8(entry.filename())
            .map_err(|e| HarvxError::Vcs(format!("Invalid filename encoding: {e}")))?;
        let path = if prefix.is_empty() {
            name.to_string()
        } else {
            format!("{prefix}/{name}")
        };

        match entry.mode().kind() {
            gix::object::tree::EntryKind::Blob | gix::object::tree::EntryKind::BlobExecutable => {
                paths.insert(path, entry.oid().into());
            }
            gix::object::tree::EntryKind::Tree => {
                let subtree = entry
                    .object()
                    .map_err(|e| HarvxError::Vcs(format!("Failed to get subtree object: {e}")))?
                    .into_tree();
                collect_tree_paths(&subtree, &path, paths)?;
            }
            _ => {}
        }
    }
    Ok(())
}
