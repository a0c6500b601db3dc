//! Snapshot introspection and reset: `cache show` / `cache clear`.

use std::path::{Path, PathBuf};

use crate::cli::{CacheAction, CacheArgs, Cli};
use crate::config::DEFAULT_PROFILE;
use crate::snapshot::Snapshot;
use crate::{EXIT_SUCCESS, HarvxError};

use super::report_fatal;

#[must_use]
pub fn run_cache(args: &CacheArgs, _cli: &Cli) -> i32 {
    match run_impl(args) {
        Ok(code) => code,
        Err(e) => report_fatal(&e),
    }
}

fn run_impl(args: &CacheArgs) -> crate::Result<i32> {
    match &args.action {
        CacheAction::Show { dir, profile } => {
            let root = resolve_root(dir.as_deref());
            let name = profile.as_deref().unwrap_or(DEFAULT_PROFILE);
            let path = crate::state::snapshot_path(&root, name);
            match Snapshot::load_if_present(&path)? {
                Some(snapshot) => {
                    println!("{}", serde_json::to_string_pretty(&snapshot)?);
                }
                None => {
                    println!("No snapshot for profile '{name}'");
                }
            }
            Ok(EXIT_SUCCESS)
        }
        CacheAction::Clear { dir, profile } => {
            let root = resolve_root(dir.as_deref());
            match profile {
                Some(name) => {
                    let path = crate::state::snapshot_path(&root, name);
                    remove_if_present(&path)?;
                    println!("Cleared snapshot for profile '{name}'");
                }
                None => {
                    let dir = crate::state::state_dir(&root);
                    let mut removed = 0usize;
                    if dir.is_dir() {
                        for entry in std::fs::read_dir(&dir)
                            .map_err(|e| HarvxError::io_with_path(e, dir.clone()))?
                        {
                            let entry = entry.map_err(HarvxError::from)?;
                            let path = entry.path();
                            if path.extension().is_some_and(|e| e == "json") {
                                remove_if_present(&path)?;
                                removed += 1;
                            }
                        }
                    }
                    println!("Cleared {removed} snapshot(s)");
                }
            }
            Ok(EXIT_SUCCESS)
        }
    }
}

fn resolve_root(dir: Option<&Path>) -> PathBuf {
    dir.map_or_else(|| PathBuf::from("."), Path::to_path_buf)
}

fn remove_if_present(path: &Path) -> crate::Result<()> {
    match std::fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(HarvxError::io_with_path(e, path.to_path_buf())),
    }
}

#[cfg(test)]
#[path = "cache_cmd_tests.rs"]
mod tests;
