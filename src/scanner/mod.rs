mod binary;
mod ignore_rules;
mod walker;

pub use binary::is_binary_file;
pub use ignore_rules::{DEFAULT_IGNORES, IGNORE_FILE_NAME, IgnoreMatcher};
pub use walker::walk_tree;

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use globset::{Glob, GlobSet, GlobSetBuilder};

use crate::error::{HarvxError, Result};
use crate::pipeline::FileRecord;
use crate::vcs;

/// Options governing file discovery.
#[derive(Debug, Clone, Default)]
pub struct DiscoveryOptions {
    /// Extension whitelist; empty accepts every extension.
    pub extensions: Vec<String>,
    /// Include globs; empty accepts every path.
    pub include: Vec<String>,
    /// Files larger than this many bytes are skipped with a warning.
    pub skip_files_larger_than: Option<u64>,
    /// Restrict the candidate set to the VCS index.
    pub tracked_only: bool,
    /// Restrict the candidate set to these repo-relative paths (diff mode).
    pub restrict_to: Option<HashSet<String>>,
    /// Walker threads; 0 means the number of logical CPUs.
    pub threads: usize,
}

/// Result of a discovery pass: records carry only `path`/`abs_path`/`size`,
/// sorted lexicographically by repo-relative path.
#[derive(Debug, Default)]
pub struct DiscoveryOutcome {
    pub records: Vec<FileRecord>,
    pub warnings: Vec<String>,
}

/// Parallel, deterministic file discovery over a repository root.
pub struct Discovery {
    root: PathBuf,
    matcher: Arc<IgnoreMatcher>,
    include_set: GlobSet,
    opts: DiscoveryOptions,
}

impl Discovery {
    pub fn new(root: &Path, matcher: Arc<IgnoreMatcher>, opts: DiscoveryOptions) -> Result<Self> {
        let include_set = build_globset(&opts.include)?;
        Ok(Self {
            root: crate::path_utils::canonicalize_lossy(root),
            matcher,
            include_set,
            opts,
        })
    }

    /// Walks the tree and returns the filtered, sorted candidate set.
    ///
    /// Determinism is a correctness requirement: two runs over the same tree
    /// yield byte-identical ordering.
    pub fn run(&self) -> Result<DiscoveryOutcome> {
        let tracked = if self.opts.tracked_only {
            Some(vcs::tracked_paths(&self.root)?)
        } else {
            None
        };

        let raw = walk_tree(&self.root, &self.matcher, self.opts.threads);
        let mut warnings = raw.warnings;
        let mut records = Vec::new();

        for candidate in raw.files {
            if !self.accept(&candidate.rel_path, tracked.as_ref()) {
                continue;
            }
            if let Some(cap) = self.opts.skip_files_larger_than
                && candidate.size > cap
            {
                warnings.push(format!(
                    "Skipped large file {} ({} bytes > {cap})",
                    candidate.rel_path, candidate.size
                ));
                continue;
            }
            if is_binary_file(&candidate.abs_path) {
                // Expected case, not an error.
                continue;
            }
            records.push(FileRecord::discovered(
                candidate.rel_path,
                candidate.abs_path,
                candidate.size,
            ));
        }

        records.sort_by(|a, b| a.path.cmp(&b.path));
        Ok(DiscoveryOutcome { records, warnings })
    }

    fn accept(&self, rel_path: &str, tracked: Option<&HashSet<String>>) -> bool {
        if let Some(restrict) = &self.opts.restrict_to {
            // In restricted (diff) mode the include globs widen the set to
            // the configured neighborhood instead of narrowing it.
            let in_neighborhood =
                !self.include_set.is_empty() && self.include_set.is_match(rel_path);
            if !restrict.contains(rel_path) && !in_neighborhood {
                return false;
            }
        } else if !self.include_set.is_empty() && !self.include_set.is_match(rel_path) {
            return false;
        }
        if let Some(tracked) = tracked
            && !tracked.contains(rel_path)
        {
            return false;
        }
        if !self.opts.extensions.is_empty() {
            let matches = Path::new(rel_path)
                .extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| self.opts.extensions.iter().any(|e| e == ext));
            if !matches {
                return false;
            }
        }
        true
    }
}

/// Compiles a glob list into a `GlobSet`, surfacing the offending pattern.
pub fn build_globset(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = Glob::new(pattern).map_err(|e| HarvxError::InvalidPattern {
            pattern: pattern.clone(),
            source: e,
        })?;
        builder.add(glob);
    }
    builder.build().map_err(|e| HarvxError::InvalidPattern {
        pattern: "combined patterns".to_string(),
        source: e,
    })
}

#[cfg(test)]
#[path = "discovery_tests.rs"]
mod tests;
