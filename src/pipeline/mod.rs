//! Pipeline orchestration.
//!
//! Stage graph: discover → classify → sort → compression prediction →
//! parallel per-file (load → redact → compress → count) → re-sort → budget →
//! render → snapshot. Each worker carries one record end-to-end so cache
//! locality holds and a single finding count is available at budget time.

pub mod record;
mod stats;

pub use record::FileRecord;
pub use stats::RunStats;

use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use rayon::prelude::*;

use crate::budget::{BudgetEnforcer, BudgetOutcome, OverheadModel};
use crate::compress::Compressor;
use crate::config::ResolvedProfile;
use crate::error::{HarvxError, Result};
use crate::output::PipelineProgress;
use crate::redact::{Finding, Redactor};
use crate::relevance::TierClassifier;
use crate::render::{RenderOptions, RenderedDocument, render};
use crate::scanner::{Discovery, DiscoveryOptions, IgnoreMatcher};
use crate::snapshot::{Snapshot, SnapshotDiff, hash_content};
use crate::vcs::VcsContext;

/// Share of extra files compressed past the predicted inclusion prefix, so a
/// prediction miss still finds compressed content ready.
const COMPRESSION_OVERSCAN_PERCENT: usize = 20;

/// Differential behavior for one run.
#[derive(Debug, Default)]
pub struct RunMode {
    /// Restrict discovery to these repo-relative paths.
    pub restrict_to: Option<HashSet<String>>,
    /// Compare against this snapshot and emit only changed files.
    pub diff_snapshot: Option<Snapshot>,
    /// Pre-computed change sets (VCS diff mode) for the change section.
    pub vcs_diff: Option<SnapshotDiff>,
}

/// Everything a command needs after a run.
#[derive(Debug)]
pub struct PipelineOutcome {
    pub budget: BudgetOutcome,
    pub stats: RunStats,
    pub findings: Vec<Finding>,
    pub document: RenderedDocument,
    pub diff: Option<SnapshotDiff>,
    pub snapshot: Snapshot,
    pub warnings: Vec<String>,
    pub partial: bool,
}

/// Owns the cancellation signal and the stage graph.
pub struct Pipeline {
    profile: ResolvedProfile,
    cancel: Arc<AtomicBool>,
    quiet: bool,
}

impl Pipeline {
    #[must_use]
    pub fn new(profile: ResolvedProfile, quiet: bool) -> Self {
        Self {
            profile,
            cancel: Arc::new(AtomicBool::new(false)),
            quiet,
        }
    }

    /// The shared cancellation signal; setting it stops every stage at its
    /// next poll point.
    #[must_use]
    pub fn cancel_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancel)
    }

    fn cancelled(&self) -> bool {
        self.cancel.load(Ordering::Relaxed)
    }

    /// Runs the full pipeline over `root`.
    pub fn run(&self, root: &Path, mode: RunMode) -> Result<PipelineOutcome> {
        let profile = &self.profile;
        let root = crate::path_utils::canonicalize_lossy(root);
        let vcs = VcsContext::from_path(&root);

        // Discovery; the tool's own artifacts never harvest themselves.
        let mut excludes = profile.excludes.clone();
        excludes.extend(own_artifact_patterns(&root, &profile.output));
        let matcher = Arc::new(IgnoreMatcher::build(
            &root,
            &profile.ignore,
            &excludes,
            &[],
        )?);
        let discovery = Discovery::new(
            &root,
            matcher,
            DiscoveryOptions {
                extensions: profile.extensions.clone(),
                include: profile.include.clone(),
                skip_files_larger_than: profile.skip_files_larger_than,
                tracked_only: profile.vcs_tracked_only,
                restrict_to: mode.restrict_to,
                threads: 0,
            },
        )?;
        let discovered = discovery.run()?;
        let mut warnings = discovered.warnings;
        let mut records = discovered.records;

        let mut stats = RunStats {
            files_discovered: records.len(),
            ..RunStats::default()
        };

        // Classification, then tier order for budget prediction
        let classifier = TierClassifier::new(&profile.tiers)?;
        for record in &mut records {
            record.tier = classifier.classify(&record.path);
        }
        TierClassifier::sort_by_relevance(&mut records);

        let compress_allowed = self.plan_compression(&records);

        // Parallel per-file processing
        let redactor = Redactor::from_policy(&profile.redaction)?;
        let progress = PipelineProgress::new(records.len() as u64, self.quiet || profile.stdout);
        let worker_results: Vec<WorkerResult> = records
            .into_par_iter()
            .map(|record| {
                if self.cancelled() {
                    return WorkerResult::cancelled();
                }
                let result = self.process_one(record, &redactor, &compress_allowed);
                progress.inc();
                result
            })
            .collect();
        progress.finish();

        // Merge per-worker tallies
        let mut findings = Vec::new();
        let mut records = Vec::new();
        let mut cancelled = false;
        for result in worker_results {
            stats.merge(&result.stats);
            findings.extend(result.findings);
            warnings.extend(result.warnings);
            cancelled |= result.cancelled;
            if let Some(record) = result.record {
                records.push(record);
            }
        }

        if profile.fail_on_redaction && !findings.is_empty() {
            return Err(HarvxError::RedactionFailure {
                count: findings.len(),
            });
        }

        // Parallel processing loses ordering; restore it before budgeting.
        TierClassifier::sort_by_relevance(&mut records);

        // Snapshot covers the full processed set, before budget exclusion.
        let snapshot = Snapshot::from_records(&profile.name, &records, vcs.as_ref());

        // Differential filtering
        let diff = if let Some(previous) = &mode.diff_snapshot {
            previous.check_branch(vcs.as_ref())?;
            let diff = previous.diff_records(&records);
            let changed: HashSet<&str> = diff
                .added
                .iter()
                .chain(&diff.modified)
                .map(String::as_str)
                .collect();
            records.retain(|r| changed.contains(r.path.as_str()));
            Some(diff)
        } else {
            mode.vcs_diff
        };

        // Budget enforcement
        let model = OverheadModel::for_format(profile.format);
        let estimated_included = estimate_included(&records, profile.max_tokens, model);
        let overhead = if profile.max_tokens == 0 {
            0
        } else {
            model.total(estimated_included)
        };
        let enforcer = BudgetEnforcer::new(
            &profile.tokenizer,
            profile.max_tokens,
            overhead,
            profile.truncation,
        );
        let had_input = !records.is_empty();
        let budget = enforcer.enforce(records);

        self.check_assertions(&budget)?;

        // Rendering
        let render_opts = RenderOptions {
            format: profile.format,
            profile_name: profile.name.clone(),
            tokenizer_name: profile.tokenizer.name().to_string(),
            line_numbers: profile.line_numbers,
            tree_depth: None,
            split_bytes: profile.split_bytes,
        };
        let document = render(&budget, diff.as_ref(), &render_opts);

        let budget_starved = had_input && budget.included.is_empty();
        let partial = cancelled || stats.files_failed > 0 || budget_starved;

        Ok(PipelineOutcome {
            budget,
            stats,
            findings,
            document,
            diff,
            snapshot,
            warnings,
            partial,
        })
    }

    /// Predicts the inclusion prefix under skip strategy using the byte/4
    /// estimate, then widens it by the over-scan margin. Only files in the
    /// returned set are parsed by the compressor.
    fn plan_compression(&self, records: &[FileRecord]) -> HashSet<String> {
        let profile = &self.profile;
        if !profile.compression {
            return HashSet::new();
        }
        if profile.max_tokens == 0 {
            return records.iter().map(|r| r.path.clone()).collect();
        }

        let model = OverheadModel::for_format(profile.format);
        let mut remaining = i64::from(profile.max_tokens.saturating_sub(model.base));
        let mut planned = Vec::new();
        let mut overflow = Vec::new();
        for record in records {
            let estimate = i64::try_from(record.size / 4).unwrap_or(i64::MAX);
            let cost = estimate + i64::from(model.per_file);
            if cost <= remaining {
                remaining -= cost;
                planned.push(record.path.clone());
            } else {
                overflow.push(record.path.clone());
            }
        }
        let overscan = (planned.len() * COMPRESSION_OVERSCAN_PERCENT).div_ceil(100).max(1);
        planned.extend(overflow.into_iter().take(overscan));
        planned.into_iter().collect()
    }

    /// Loads, redacts, optionally compresses, and counts one record.
    fn process_one(
        &self,
        mut record: FileRecord,
        redactor: &Redactor,
        compress_allowed: &HashSet<String>,
    ) -> WorkerResult {
        let profile = &self.profile;
        let mut result = WorkerResult::default();

        let bytes = match std::fs::read(&record.abs_path) {
            Ok(bytes) => bytes,
            Err(e) => {
                result.stats.files_failed = 1;
                result
                    .warnings
                    .push(format!("Skipped unreadable file {}: {e}", record.path));
                return result;
            }
        };
        let raw = String::from_utf8_lossy(&bytes).into_owned();

        // Redaction runs strictly before compression and counting, so no
        // later stage ever sees the secret.
        let redacted = redactor.scan(&record.path, &raw);
        result.stats.redaction_findings = redacted.findings.len();
        record.redactions = u32::try_from(redacted.findings.len()).unwrap_or(u32::MAX);
        record.redaction_categories = redacted.categories;
        result.findings = redacted.findings;

        let mut content = redacted.content;
        if profile.compression && compress_allowed.contains(&record.path) {
            let compressor =
                Compressor::new(Duration::from_secs(profile.compression_timeout_secs));
            let outcome = compressor.compress(&record.path, &content);
            if let Some(diagnostic) = outcome.diagnostic {
                result.warnings.push(diagnostic);
            }
            record.is_compressed = outcome.compressed;
            record.language = outcome.language;
            if outcome.compressed {
                result.stats.files_compressed = 1;
            }
            content = outcome.content;
        }

        record.token_count = profile.tokenizer.count(&content);
        record.content_hash = hash_content(&content);
        record.content = content;
        result.stats.files_processed = 1;
        result.record = Some(record);
        result
    }

    /// Asserted paths must survive budget enforcement.
    fn check_assertions(&self, budget: &BudgetOutcome) -> Result<()> {
        for pattern in &self.profile.assert_include {
            let matcher = globset::Glob::new(pattern)
                .map_err(|e| HarvxError::InvalidPattern {
                    pattern: pattern.clone(),
                    source: e,
                })?
                .compile_matcher();
            let satisfied = budget
                .included
                .iter()
                .any(|r| r.path == *pattern || matcher.is_match(&r.path));
            if !satisfied {
                return Err(HarvxError::AssertInclude {
                    path: pattern.clone(),
                });
            }
        }
        Ok(())
    }
}

/// One worker's contribution, merged after the parallel stage drains.
#[derive(Debug, Default)]
struct WorkerResult {
    record: Option<FileRecord>,
    findings: Vec<Finding>,
    warnings: Vec<String>,
    stats: RunStats,
    cancelled: bool,
}

impl WorkerResult {
    fn cancelled() -> Self {
        Self {
            cancelled: true,
            ..Self::default()
        }
    }
}

/// Ignore patterns covering the rendered document, its split parts, and the
/// sidecar, relative to the scanned root.
fn own_artifact_patterns(root: &Path, output: &std::path::Path) -> Vec<String> {
    let rel = if output.is_absolute() {
        match crate::path_utils::relative_to(root, output) {
            Some(rel) => rel,
            None => return Vec::new(),
        }
    } else {
        crate::path_utils::normalize(&output.to_string_lossy())
    };

    let mut patterns = vec![format!("/{rel}"), format!("/{rel}.json")];
    if let Some((stem, ext)) = rel.rsplit_once('.') {
        patterns.push(format!("/{stem}.part-*.{ext}"));
        patterns.push(format!("/{stem}.part-*.{ext}.json"));
    }
    patterns
}

/// Estimates how many files survive skip enforcement, charging each included
/// file its per-file header share as it lands. Keeps the overhead formula
/// self-consistent with the final inclusion count.
fn estimate_included(records: &[FileRecord], max_tokens: u32, model: OverheadModel) -> usize {
    if max_tokens == 0 {
        return records.len();
    }
    let mut remaining = i64::from(max_tokens.saturating_sub(model.base));
    let mut count = 0usize;
    for record in records {
        let cost = i64::from(record.token_count) + i64::from(model.per_file);
        if cost <= remaining {
            remaining -= cost;
            count += 1;
        }
    }
    count
}

#[cfg(test)]
#[path = "pipeline_tests.rs"]
mod tests;
