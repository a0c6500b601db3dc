//! On-disk state: path layout, cooperative file locking, and crash-safe
//! snapshot writes.
//!
//! Snapshots live under `<repo>/.harvx/state/`. A writer stages the new
//! content in a sibling file, takes an exclusive lock on the target, and
//! renames over it; readers hold a shared lock while parsing. Lock waits are
//! bounded, and an exhausted wait on the write path is fatal.

use std::fs::{self, File, OpenOptions, TryLockError};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use crate::{HarvxError, Result};

const STATE_DIR_NAME: &str = ".harvx";
const STATE_SUBDIR: &str = "state";

/// How long a lock attempt may wait before giving up.
pub const LOCK_WAIT: Duration = Duration::from_secs(5);

/// Pause between lock attempts.
const LOCK_RETRY_PAUSE: Duration = Duration::from_millis(25);

/// Seconds since the Unix epoch; 0 if the clock reads before it.
#[must_use]
pub fn unix_now() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map_or(0, |d| d.as_secs())
}

/// The state directory for a repository root.
#[must_use]
pub fn state_dir(repo_root: &Path) -> PathBuf {
    repo_root.join(STATE_DIR_NAME).join(STATE_SUBDIR)
}

/// Path of the snapshot file for a profile. Profile names become file names,
/// so anything outside `[A-Za-z0-9_-]` is mapped to an underscore.
#[must_use]
pub fn snapshot_path(repo_root: &Path, profile: &str) -> PathBuf {
    let safe: String = profile
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    state_dir(repo_root).join(format!("{safe}.json"))
}

/// Creates the parent directory of `path` if it is missing.
pub fn ensure_parent_dir(path: &Path) -> io::Result<()> {
    match path.parent() {
        Some(parent) => fs::create_dir_all(parent),
        None => Ok(()),
    }
}

#[derive(Clone, Copy)]
enum LockMode {
    Shared,
    Exclusive,
}

/// A held advisory lock on an open file, released on drop.
///
/// Acquisition retries until [`LOCK_WAIT`] (or the caller's bound) runs out.
/// `None` means the lock was not taken; callers decide whether that is a
/// warning (readers) or fatal (writers).
pub struct FileLock<'a> {
    file: &'a File,
}

impl<'a> FileLock<'a> {
    /// Shared lock for readers; many readers may hold it at once.
    #[must_use]
    pub fn shared(file: &'a File, wait: Duration) -> Option<Self> {
        Self::acquire(file, LockMode::Shared, wait)
    }

    /// Exclusive lock for writers.
    #[must_use]
    pub fn exclusive(file: &'a File, wait: Duration) -> Option<Self> {
        Self::acquire(file, LockMode::Exclusive, wait)
    }

    fn acquire(file: &'a File, mode: LockMode, wait: Duration) -> Option<Self> {
        let give_up = Instant::now() + wait;
        loop {
            let attempt = match mode {
                LockMode::Shared => file.try_lock_shared(),
                LockMode::Exclusive => file.try_lock(),
            };
            match attempt {
                Ok(()) => return Some(Self { file }),
                Err(TryLockError::WouldBlock) if Instant::now() < give_up => {
                    std::thread::sleep(LOCK_RETRY_PAUSE);
                }
                Err(_) => return None,
            }
        }
    }
}

impl Drop for FileLock<'_> {
    fn drop(&mut self) {
        let _ = self.file.unlock();
    }
}

/// Replaces `path` with `bytes` without ever exposing a half-written file.
///
/// The new content is staged in a sibling file, synced, and renamed into
/// place while an exclusive lock is held on the target. A reader therefore
/// sees either the old state or the new one. An exhausted lock wait is fatal
/// and leaves both the target and the filesystem clean.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    write_atomic_bounded(path, bytes, LOCK_WAIT)
}

pub(crate) fn write_atomic_bounded(path: &Path, bytes: &[u8], wait: Duration) -> Result<()> {
    ensure_parent_dir(path)
        .map_err(|e| HarvxError::io_with_context(e, path.to_path_buf(), "create state directory"))?;

    let staging = staging_path(path);
    stage(&staging, bytes)?;
    let promoted = promote(&staging, path, wait);
    if promoted.is_err() {
        let _ = fs::remove_file(&staging);
    }
    promoted
}

/// Staging file next to the target. The pid keeps concurrent harvx processes
/// from clobbering each other's staging files; the rename stays on one
/// filesystem because both paths share a directory.
fn staging_path(target: &Path) -> PathBuf {
    let name = target.file_name().map_or_else(
        || "state".to_string(),
        |n| n.to_string_lossy().into_owned(),
    );
    target.with_file_name(format!(".{name}.{}.new", std::process::id()))
}

fn stage(staging: &Path, bytes: &[u8]) -> Result<()> {
    let mut file = File::create(staging)
        .map_err(|e| HarvxError::io_with_context(e, staging.to_path_buf(), "stage state file"))?;
    file.write_all(bytes)
        .map_err(|e| HarvxError::io_with_context(e, staging.to_path_buf(), "stage state file"))?;
    // Durable before the rename makes it visible.
    file.sync_all()
        .map_err(|e| HarvxError::io_with_context(e, staging.to_path_buf(), "sync state file"))?;
    Ok(())
}

fn promote(staging: &Path, target: &Path, wait: Duration) -> Result<()> {
    let handle = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(false)
        .open(target)
        .map_err(|e| HarvxError::io_with_context(e, target.to_path_buf(), "open state file"))?;

    let guard = FileLock::exclusive(&handle, wait).ok_or_else(|| HarvxError::StateLock {
        path: target.to_path_buf(),
    })?;

    #[cfg(windows)]
    {
        // Windows cannot rename over an open handle, so the lock and handle
        // go first. The brief unlocked window is acceptable for state the
        // next run rebuilds from scratch.
        drop(guard);
        drop(handle);
        let _ = fs::remove_file(target);
        return fs::rename(staging, target)
            .map_err(|e| HarvxError::io_with_context(e, target.to_path_buf(), "replace state file"));
    }

    #[cfg(not(windows))]
    {
        let renamed = fs::rename(staging, target)
            .map_err(|e| HarvxError::io_with_context(e, target.to_path_buf(), "replace state file"));
        drop(guard);
        drop(handle);
        renamed
    }
}

#[cfg(test)]
#[path = "state_tests.rs"]
mod tests;
