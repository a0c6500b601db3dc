//! The document-producing verbs: `generate` (default), `preview`, `brief`,
//! and `slice`.

use std::fmt::Write as _;
use std::io::Write as _;
use std::path::{Path, PathBuf};

use crate::cli::{Cli, CommonArgs, GenerateArgs, SliceArgs};
use crate::config::{self, ResolvedProfile};
use crate::pipeline::{Pipeline, PipelineOutcome, RunMode};
use crate::render::build_sidecar;
use crate::{EXIT_PARTIAL, EXIT_SUCCESS};

use super::report_fatal;

/// Brief mode caps the budget at this many tokens unless a tighter budget is
/// already in effect.
const BRIEF_MAX_TOKENS: u32 = 25_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RunKind {
    Generate,
    Preview,
    Brief,
}

#[must_use]
pub fn run_generate(args: &GenerateArgs, cli: &Cli) -> i32 {
    run_wrapped(args.dir.as_deref(), &args.common, cli, RunKind::Generate)
}

#[must_use]
pub fn run_preview(args: &GenerateArgs, cli: &Cli) -> i32 {
    run_wrapped(args.dir.as_deref(), &args.common, cli, RunKind::Preview)
}

#[must_use]
pub fn run_brief(args: &GenerateArgs, cli: &Cli) -> i32 {
    run_wrapped(args.dir.as_deref(), &args.common, cli, RunKind::Brief)
}

#[must_use]
pub fn run_slice(args: &SliceArgs, cli: &Cli) -> i32 {
    // The slice globs become the include overlay; everything else is an
    // ordinary generate run.
    let mut common = args.common.clone();
    common.include.extend(args.patterns.iter().cloned());
    run_wrapped(args.dir.as_deref(), &common, cli, RunKind::Generate)
}

fn run_wrapped(dir: Option<&Path>, common: &CommonArgs, cli: &Cli, kind: RunKind) -> i32 {
    match run_impl(dir, common, cli, kind) {
        Ok(code) => code,
        Err(e) => report_fatal(&e),
    }
}

fn run_impl(
    dir: Option<&Path>,
    common: &CommonArgs,
    cli: &Cli,
    kind: RunKind,
) -> crate::Result<i32> {
    let root = dir.map_or_else(|| PathBuf::from("."), Path::to_path_buf);
    let mut profile = resolve_profile(&root, common, cli.quiet)?;

    if kind == RunKind::Brief {
        profile.compression = true;
        if profile.max_tokens == 0 || profile.max_tokens > BRIEF_MAX_TOKENS {
            profile.max_tokens = BRIEF_MAX_TOKENS;
        }
    }

    let outcome = execute(&root, profile.clone(), cli, RunMode::default())?;

    if kind == RunKind::Preview {
        print!("{}", summary(&outcome, &profile));
        return Ok(exit_code(&outcome));
    }

    write_outputs(&root, &profile, &outcome, !common.no_snapshot, cli.quiet)?;
    Ok(exit_code(&outcome))
}

/// Resolves the effective profile, printing resolution warnings to stderr.
pub(super) fn resolve_profile(
    root: &Path,
    common: &CommonArgs,
    quiet: bool,
) -> crate::Result<ResolvedProfile> {
    let overrides = common.to_overrides();
    let load = config::resolve(
        root,
        common.profile.as_deref(),
        common.profile_file.as_deref(),
        &overrides,
    )?;
    if !quiet {
        for warning in &load.warnings {
            crate::output::print_warning(warning);
        }
    }
    Ok(load.profile)
}

/// Runs the pipeline and prints its warnings to stderr.
pub(super) fn execute(
    root: &Path,
    profile: ResolvedProfile,
    cli: &Cli,
    mode: RunMode,
) -> crate::Result<PipelineOutcome> {
    let pipeline = Pipeline::new(profile, cli.quiet);
    let outcome = pipeline.run(root, mode)?;
    if !cli.quiet {
        for warning in &outcome.warnings {
            crate::output::print_warning(warning);
        }
    }
    Ok(outcome)
}

/// Writes the document (file parts or stdout), the optional sidecar, and the
/// updated snapshot.
pub(super) fn write_outputs(
    root: &Path,
    profile: &ResolvedProfile,
    outcome: &PipelineOutcome,
    update_snapshot: bool,
    quiet: bool,
) -> crate::Result<()> {
    if profile.stdout {
        let mut stdout = std::io::stdout().lock();
        for part in &outcome.document.parts {
            stdout
                .write_all(part.as_bytes())
                .map_err(crate::HarvxError::from)?;
        }
    } else {
        let paths = part_paths(&profile.output, outcome.document.parts.len());
        for (path, part) in paths.iter().zip(&outcome.document.parts) {
            crate::state::ensure_parent_dir(path).map_err(|e| {
                crate::HarvxError::io_with_context(e, path.clone(), "create output directory")
            })?;
            std::fs::write(path, part)
                .map_err(|e| crate::HarvxError::io_with_path(e, path.clone()))?;
            if !quiet {
                eprintln!("Wrote {}", path.display());
            }
        }
    }

    if profile.sidecar {
        let render_opts = crate::render::RenderOptions {
            format: profile.format,
            profile_name: profile.name.clone(),
            tokenizer_name: profile.tokenizer.name().to_string(),
            line_numbers: profile.line_numbers,
            tree_depth: None,
            split_bytes: profile.split_bytes,
        };
        let sidecar = build_sidecar(&outcome.budget, &render_opts, &outcome.document.hash_hex());
        let json = serde_json::to_string_pretty(&sidecar)?;
        let path = sidecar_path(&profile.output);
        std::fs::write(&path, json)
            .map_err(|e| crate::HarvxError::io_with_path(e, path.clone()))?;
        if !quiet {
            eprintln!("Wrote {}", path.display());
        }
    }

    if update_snapshot {
        let path = crate::state::snapshot_path(root, &profile.name);
        outcome.snapshot.save(&path)?;
    }
    Ok(())
}

/// Maps a run outcome to the process exit code.
pub(super) const fn exit_code(outcome: &PipelineOutcome) -> i32 {
    if outcome.partial {
        EXIT_PARTIAL
    } else {
        EXIT_SUCCESS
    }
}

/// Output paths for each part: a single part keeps the configured name,
/// multiple parts insert `part-NNN` before the extension.
fn part_paths(output: &Path, parts: usize) -> Vec<PathBuf> {
    if parts <= 1 {
        return vec![output.to_path_buf()];
    }
    let stem = output
        .file_stem()
        .map_or_else(|| "harvx-context".to_string(), |s| s.to_string_lossy().into_owned());
    let ext = output
        .extension()
        .map_or_else(String::new, |e| format!(".{}", e.to_string_lossy()));
    let parent = output.parent().unwrap_or_else(|| Path::new(""));
    (1..=parts)
        .map(|i| parent.join(format!("{stem}.part-{i:03}{ext}")))
        .collect()
}

fn sidecar_path(output: &Path) -> PathBuf {
    PathBuf::from(format!("{}.json", output.display()))
}

/// Human-readable inclusion summary, used by `preview`.
pub(super) fn summary(outcome: &PipelineOutcome, profile: &ResolvedProfile) -> String {
    let budget = &outcome.budget;
    let mut out = String::new();
    let _ = writeln!(out, "Profile: {}", profile.name);
    let _ = writeln!(out, "Tokenizer: {}", profile.tokenizer.name());
    let _ = writeln!(
        out,
        "Files: {} included, {} excluded ({} discovered)",
        budget.included.len(),
        budget.excluded.len(),
        outcome.stats.files_discovered
    );
    if budget.max_tokens > 0 {
        let _ = writeln!(
            out,
            "Tokens: {} of {} ({} overhead)",
            budget.total_tokens, budget.max_tokens, budget.overhead
        );
    } else {
        let _ = writeln!(out, "Tokens: {} (no budget)", budget.total_tokens);
    }
    let _ = writeln!(out, "Redaction findings: {}", outcome.findings.len());
    let _ = writeln!(out, "Compressed files: {}", outcome.stats.files_compressed);
    let _ = writeln!(out, "Content hash: {}", outcome.document.hash_hex());
    for (tier, stats) in &budget.tier_stats {
        let _ = writeln!(
            out,
            "  tier {tier}: {} included, {} excluded, {} tokens",
            stats.files_included, stats.files_excluded, stats.tokens_used
        );
    }
    if !budget.truncated.is_empty() {
        let _ = writeln!(out, "Truncated: {}", budget.truncated.join(", "));
    }
    out
}

#[cfg(test)]
#[path = "generate_tests.rs"]
mod tests;
