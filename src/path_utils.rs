//! Path normalization helpers.
//!
//! Every path that crosses a stage boundary is repo-relative with forward
//! slashes, so rendered documents and snapshots compare equal across
//! platforms.

use std::path::Path;

/// Normalize a path string for matching and rendering: strip a leading `./`
/// and replace backslashes with forward slashes.
#[must_use]
pub fn normalize(path: &str) -> String {
    let s = path.replace('\\', "/");
    s.strip_prefix("./").map_or(s.clone(), str::to_string)
}

/// Compute the repo-relative, forward-slash form of `abs` under `root`.
///
/// Returns `None` when `abs` is not under `root`.
#[must_use]
pub fn relative_to(root: &Path, abs: &Path) -> Option<String> {
    let rel = abs.strip_prefix(root).ok()?;
    let mut out = String::new();
    for component in rel.components() {
        if !out.is_empty() {
            out.push('/');
        }
        out.push_str(&component.as_os_str().to_string_lossy());
    }
    Some(out)
}

/// Canonicalize without the `\\?\` UNC prefix on Windows, falling back to the
/// input when the path does not resolve.
#[must_use]
pub fn canonicalize_lossy(path: &Path) -> std::path::PathBuf {
    dunce::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}

#[cfg(test)]
#[path = "path_utils_tests.rs"]
mod tests;
