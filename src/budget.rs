//! Token budget enforcement.
//!
//! Files arrive in `(tier, path)` order; the enforcer walks them once and
//! either skips over-budget files (later smaller files may still fit) or
//! truncates the first over-budget file to fill the budget exactly. Original
//! records are never mutated; a truncated record is a distinct value.

use std::str::FromStr;

use indexmap::IndexMap;
use xxhash_rust::xxh3::xxh3_64;

use crate::pipeline::FileRecord;
use crate::render::OutputFormat;
use crate::tokenizer::Tokenizer;

/// Tokens reserved so the truncation marker always fits.
pub const TRUNCATION_RESERVE: u32 = 20;

/// What to do with the first file that no longer fits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TruncationStrategy {
    /// Exclude it and keep going; later smaller files may still fit.
    #[default]
    Skip,
    /// Emit a truncated copy filling the remaining budget, then stop.
    Truncate,
}

impl FromStr for TruncationStrategy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "skip" => Ok(Self::Skip),
            "truncate" => Ok(Self::Truncate),
            _ => Err(format!(
                "Unknown truncation strategy '{s}' (expected skip or truncate)"
            )),
        }
    }
}

/// Structural overhead model: budget share reserved for document structure
/// before any file content is admitted.
#[derive(Debug, Clone, Copy)]
pub struct OverheadModel {
    pub base: u32,
    pub per_file: u32,
}

impl OverheadModel {
    /// Calibrated constants per output format. XML wraps every section in
    /// open/close tags plus a document envelope, hence the larger shares.
    #[must_use]
    pub const fn for_format(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Markdown => Self {
                base: 200,
                per_file: 35,
            },
            OutputFormat::Xml => Self {
                base: 260,
                per_file: 45,
            },
        }
    }

    /// Total overhead for an estimated number of included files.
    #[must_use]
    pub fn total(&self, estimated_files: usize) -> u32 {
        let files = u32::try_from(estimated_files).unwrap_or(u32::MAX);
        self.base.saturating_add(files.saturating_mul(self.per_file))
    }
}

/// Per-tier inclusion statistics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TierStats {
    pub files_included: u32,
    pub files_excluded: u32,
    pub tokens_used: u64,
}

/// Result of budget enforcement. Invariants:
/// `|included| + |excluded| = |input|`, `truncated ⊆ included` (by path), and
/// `sum(included.token_count) = total_tokens`.
#[derive(Debug, Default)]
pub struct BudgetOutcome {
    pub included: Vec<FileRecord>,
    pub excluded: Vec<FileRecord>,
    /// Paths of truncated records; always a subset of `included`.
    pub truncated: Vec<String>,
    pub total_tokens: u64,
    pub overhead: u32,
    pub max_tokens: u32,
    pub tier_stats: IndexMap<u8, TierStats>,
}

/// Tier-ordered inclusion under a hard token budget.
pub struct BudgetEnforcer<'a> {
    tokenizer: &'a Tokenizer,
    max_tokens: u32,
    overhead: u32,
    strategy: TruncationStrategy,
}

impl<'a> BudgetEnforcer<'a> {
    /// `max_tokens == 0` disables the budget; every file is included.
    #[must_use]
    pub const fn new(
        tokenizer: &'a Tokenizer,
        max_tokens: u32,
        overhead: u32,
        strategy: TruncationStrategy,
    ) -> Self {
        Self {
            tokenizer,
            max_tokens,
            overhead,
            strategy,
        }
    }

    /// Walks `files` in order and partitions them against the budget.
    #[must_use]
    pub fn enforce(&self, files: Vec<FileRecord>) -> BudgetOutcome {
        let mut outcome = BudgetOutcome {
            overhead: self.overhead,
            max_tokens: self.max_tokens,
            ..BudgetOutcome::default()
        };

        if self.max_tokens == 0 {
            for record in files {
                Self::tally(&mut outcome, record, true);
            }
            return outcome;
        }

        let mut remaining = self.max_tokens.saturating_sub(self.overhead);
        let mut exhausted = false;

        for record in files {
            if exhausted {
                Self::tally(&mut outcome, record, false);
                continue;
            }
            if record.token_count <= remaining {
                remaining -= record.token_count;
                Self::tally(&mut outcome, record, true);
                continue;
            }
            match self.strategy {
                TruncationStrategy::Skip => {
                    Self::tally(&mut outcome, record, false);
                }
                TruncationStrategy::Truncate => {
                    if let Some(copy) = self.truncate_to_fit(&record, remaining) {
                        outcome.truncated.push(copy.path.clone());
                        remaining = remaining.saturating_sub(copy.token_count);
                        Self::tally(&mut outcome, copy, true);
                    } else {
                        Self::tally(&mut outcome, record, false);
                    }
                    exhausted = true;
                }
            }
        }

        outcome
    }

    /// Builds a truncated copy whose content is the longest line-boundary
    /// prefix fitting `remaining` minus the marker reservation.
    fn truncate_to_fit(&self, record: &FileRecord, remaining: u32) -> Option<FileRecord> {
        let content_budget = remaining.checked_sub(TRUNCATION_RESERVE)?;
        if content_budget == 0 {
            return None;
        }

        let lines: Vec<&str> = record.content.lines().collect();
        if lines.is_empty() {
            return None;
        }

        // Token count is monotone in the line count, so binary search the
        // largest prefix that fits.
        let cost = |k: usize| self.tokenizer.count(&lines[..k].join("\n"));
        let mut lo = 0usize;
        let mut hi = lines.len();
        while lo < hi {
            let mid = (lo + hi + 1) / 2;
            if cost(mid) <= content_budget {
                lo = mid;
            } else {
                hi = mid - 1;
            }
        }
        if lo == 0 {
            return None;
        }

        let prefix = lines[..lo].join("\n");
        let shown = self.tokenizer.count(&prefix);
        let marker = format!(
            "<!-- Content truncated: {shown} of {} tokens shown -->",
            record.token_count
        );
        let content = format!("{prefix}\n{marker}");
        let token_count = self.tokenizer.count(&content);
        let content_hash = xxh3_64(content.as_bytes());

        let mut copy = record.clone();
        copy.content = content;
        copy.token_count = token_count;
        copy.content_hash = content_hash;
        Some(copy)
    }

    fn tally(outcome: &mut BudgetOutcome, record: FileRecord, included: bool) {
        let stats = outcome.tier_stats.entry(record.tier).or_default();
        if included {
            stats.files_included += 1;
            stats.tokens_used += u64::from(record.token_count);
            outcome.total_tokens += u64::from(record.token_count);
            outcome.included.push(record);
        } else {
            stats.files_excluded += 1;
            outcome.excluded.push(record);
        }
    }
}

#[cfg(test)]
#[path = "budget_tests.rs"]
mod tests;
