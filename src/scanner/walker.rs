//! Parallel directory traversal.
//!
//! The walker fans out across threads (worker count = logical CPUs), prunes
//! ignored directories before descending, and honors VCS ignore files. Output
//! order is not deterministic here; discovery sorts the collected set.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use ignore::{WalkBuilder, WalkState};

use crate::path_utils;

use super::IgnoreMatcher;

/// A file candidate produced by the raw walk.
#[derive(Debug)]
pub struct Candidate {
    pub rel_path: String,
    pub abs_path: PathBuf,
    pub size: u64,
}

/// Unsorted walk output plus traversal warnings.
#[derive(Debug, Default)]
pub struct WalkOutcome {
    pub files: Vec<Candidate>,
    pub warnings: Vec<String>,
}

/// Walks `root` in parallel, returning every non-ignored file.
///
/// Symlinks are followed; filesystem loops are skipped silently. Unreadable
/// directories produce warnings and the walk continues.
#[must_use]
pub fn walk_tree(root: &Path, matcher: &Arc<IgnoreMatcher>, threads: usize) -> WalkOutcome {
    let threads = if threads == 0 {
        std::thread::available_parallelism().map_or(1, std::num::NonZero::get)
    } else {
        threads
    };

    let files = Mutex::new(Vec::new());
    let warnings = Mutex::new(Vec::new());

    let filter_root = root.to_path_buf();
    let filter_matcher = Arc::clone(matcher);

    let walker = WalkBuilder::new(root)
        .standard_filters(false)
        .hidden(false)
        .git_ignore(true)
        .git_global(true)
        .git_exclude(true)
        .require_git(false)
        .parents(false)
        .follow_links(true)
        .threads(threads)
        .filter_entry(move |entry| {
            if entry.depth() == 0 {
                return true;
            }
            let Some(rel) = path_utils::relative_to(&filter_root, entry.path()) else {
                return true;
            };
            let is_dir = entry.file_type().is_some_and(|ft| ft.is_dir());
            !filter_matcher.ignored(&rel, is_dir)
        })
        .build_parallel();

    walker.run(|| {
        Box::new(|result| {
            match result {
                Ok(entry) => {
                    if entry.file_type().is_some_and(|ft| ft.is_file())
                        && let Some(rel) = path_utils::relative_to(root, entry.path())
                    {
                        let size = entry.metadata().map_or(0, |m| m.len());
                        if let Ok(mut files) = files.lock() {
                            files.push(Candidate {
                                rel_path: rel,
                                abs_path: entry.into_path(),
                                size,
                            });
                        }
                    }
                }
                Err(e) => {
                    let message = e.to_string();
                    // Loops are an expected consequence of following links.
                    if !message.contains("loop") && let Ok(mut warnings) = warnings.lock() {
                        warnings.push(format!("Walk error: {message}"));
                    }
                }
            }
            WalkState::Continue
        })
    });

    WalkOutcome {
        files: files.into_inner().unwrap_or_default(),
        warnings: warnings.into_inner().unwrap_or_default(),
    }
}
