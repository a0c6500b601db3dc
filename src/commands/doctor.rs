//! The `doctor` diagnostic: environment and configuration checks.

use std::path::{Path, PathBuf};

use crate::cli::{Cli, CommonArgs, DoctorArgs};
use crate::compress::LANGUAGES;
use crate::vcs::VcsContext;
use crate::{EXIT_FATAL, EXIT_SUCCESS};

use super::generate::resolve_profile;

#[must_use]
pub fn run_doctor(args: &DoctorArgs, cli: &Cli) -> i32 {
    let root = args
        .dir
        .as_deref()
        .map_or_else(|| PathBuf::from("."), Path::to_path_buf);

    let mut failed = false;

    // Profile resolution, including the tier lint and redaction patterns
    let common = CommonArgs {
        profile: args.profile.clone(),
        profile_file: args.profile_file.clone(),
        ..CommonArgs::default()
    };
    let profile = match resolve_profile(&root, &common, cli.quiet) {
        Ok(profile) => {
            println!("ok profile: '{}' resolves cleanly", profile.name);
            Some(profile)
        }
        Err(e) => {
            println!("FAIL profile: {}", e.message());
            failed = true;
            None
        }
    };

    // State directory writability
    match probe_state_dir(&root) {
        Ok(dir) => println!("ok state dir: {} is writable", dir.display()),
        Err(e) => {
            println!("FAIL state dir: {e}");
            failed = true;
        }
    }

    // Tokenizer table loads
    if let Some(profile) = &profile {
        match profile.tokenizer.ensure_ready() {
            Ok(()) => println!("ok tokenizer: {} initialized", profile.tokenizer.name()),
            Err(e) => {
                println!("FAIL tokenizer: {}", e.message());
                failed = true;
            }
        }
    }

    // Grammar availability
    let mut grammars = Vec::new();
    for spec in LANGUAGES {
        let mut parser = tree_sitter::Parser::new();
        if parser.set_language(&(spec.language)()).is_ok() {
            grammars.push(spec.id);
        } else {
            println!("FAIL grammar: {} failed to load", spec.id);
            failed = true;
        }
    }
    println!("ok grammars: {}", grammars.join(", "));

    // VCS context (informational, never a failure)
    match VcsContext::from_path(&root) {
        Some(ctx) => println!(
            "ok vcs: branch {} at {}",
            ctx.branch.as_deref().unwrap_or("(detached)"),
            &ctx.head[..ctx.head.len().min(12)]
        ),
        None => println!("ok vcs: not a repository (snapshot diffs only)"),
    }

    if failed { EXIT_FATAL } else { EXIT_SUCCESS }
}

fn probe_state_dir(root: &Path) -> std::io::Result<PathBuf> {
    let dir = crate::state::state_dir(root);
    std::fs::create_dir_all(&dir)?;
    let probe = dir.join(".doctor-probe");
    std::fs::write(&probe, b"ok")?;
    std::fs::remove_file(&probe)?;
    Ok(dir)
}

#[cfg(test)]
#[path = "doctor_tests.rs"]
mod tests;
