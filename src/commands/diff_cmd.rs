//! Differential verbs: `diff` (snapshot or VCS driven) and `review-slice`.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::cli::{Cli, DiffArgs};
use crate::error::HarvxError;
use crate::pipeline::RunMode;
use crate::snapshot::Snapshot;
use crate::vcs;

use super::generate::{execute, exit_code, resolve_profile, write_outputs};
use super::report_fatal;

#[must_use]
pub fn run_diff(args: &DiffArgs, cli: &Cli) -> i32 {
    match run_impl(args, cli) {
        Ok(code) => code,
        Err(e) => report_fatal(&e),
    }
}

fn run_impl(args: &DiffArgs, cli: &Cli) -> crate::Result<i32> {
    let root = args
        .dir
        .as_deref()
        .map_or_else(|| PathBuf::from("."), Path::to_path_buf);
    let profile = resolve_profile(&root, &args.common, cli.quiet)?;

    let mode = if args.since.is_some() || args.base.is_some() {
        vcs_mode(&root, args)?
    } else {
        snapshot_mode(&root, &profile.name)?
    };

    let outcome = execute(&root, profile.clone(), cli, mode)?;

    if let Some(diff) = &outcome.diff
        && diff.is_empty()
        && !cli.quiet
    {
        eprintln!("No changes detected.");
    }

    // Diff runs are read-only with respect to state: the stored snapshot
    // stays the baseline until the next generate.
    write_outputs(&root, &profile, &outcome, false, cli.quiet)?;
    Ok(exit_code(&outcome))
}

/// `--since <ref>` or `--base <ref> --head <ref>`: the changed set comes from
/// the VCS and discovery is restricted to it (plus the include neighborhood).
fn vcs_mode(root: &Path, args: &DiffArgs) -> crate::Result<RunMode> {
    let (base, head) = match (&args.since, &args.base, &args.head) {
        (Some(since), None, None) => (since.clone(), "HEAD".to_string()),
        (None, Some(base), Some(head)) => (base.clone(), head.clone()),
        _ => {
            return Err(HarvxError::Config(
                "Use either --since <ref>, or --base <ref> with --head <ref>".to_string(),
            ));
        }
    };

    let diff = vcs::classify_changes(root, &base, &head)?;
    let restrict: HashSet<String> = diff
        .added
        .iter()
        .chain(&diff.modified)
        .cloned()
        .collect();
    Ok(RunMode {
        restrict_to: Some(restrict),
        diff_snapshot: None,
        vcs_diff: Some(diff),
    })
}

/// No refs given: compare against the stored snapshot for this profile.
fn snapshot_mode(root: &Path, profile_name: &str) -> crate::Result<RunMode> {
    let path = crate::state::snapshot_path(root, profile_name);
    let snapshot = Snapshot::load_if_present(&path)?.ok_or_else(|| {
        HarvxError::Config(format!(
            "No snapshot for profile '{profile_name}'; run 'harvx generate' first"
        ))
    })?;
    if !snapshot.is_current_version() {
        return Err(HarvxError::Config(format!(
            "Snapshot at {} has an unsupported version; run 'harvx cache clear'",
            path.display()
        )));
    }
    Ok(RunMode {
        restrict_to: None,
        diff_snapshot: Some(snapshot),
        vcs_diff: None,
    })
}

#[cfg(test)]
#[path = "diff_cmd_tests.rs"]
mod tests;
