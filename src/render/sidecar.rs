//! JSON metadata sidecar, mirroring the inclusion summary and per-file
//! statistics of the rendered document.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::budget::BudgetOutcome;

use super::RenderOptions;

#[derive(Debug, Serialize)]
pub struct SidecarTier {
    pub files_included: u32,
    pub files_excluded: u32,
    pub tokens_used: u64,
}

#[derive(Debug, Serialize)]
pub struct SidecarFile {
    pub path: String,
    pub tier: u8,
    pub tokens: u32,
    pub redactions: bool,
    pub compressed: bool,
}

/// The sidecar document written alongside the rendered output.
#[derive(Debug, Serialize)]
pub struct Sidecar {
    pub profile: String,
    pub tokenizer: String,
    pub content_hash: String,
    pub max_tokens: u32,
    pub overhead: u32,
    pub total_tokens: u64,
    pub tiers: BTreeMap<u8, SidecarTier>,
    pub files: Vec<SidecarFile>,
    pub excluded: Vec<String>,
    pub truncated: Vec<String>,
}

/// Builds the sidecar from a budget outcome.
#[must_use]
pub fn build_sidecar(outcome: &BudgetOutcome, opts: &RenderOptions, hash_hex: &str) -> Sidecar {
    let tiers = outcome
        .tier_stats
        .iter()
        .map(|(tier, stats)| {
            (
                *tier,
                SidecarTier {
                    files_included: stats.files_included,
                    files_excluded: stats.files_excluded,
                    tokens_used: stats.tokens_used,
                },
            )
        })
        .collect();

    let files = outcome
        .included
        .iter()
        .map(|record| SidecarFile {
            path: record.path.clone(),
            tier: record.tier,
            tokens: record.token_count,
            redactions: record.has_redactions(),
            compressed: record.is_compressed,
        })
        .collect();

    Sidecar {
        profile: opts.profile_name.clone(),
        tokenizer: opts.tokenizer_name.clone(),
        content_hash: hash_hex.to_string(),
        max_tokens: outcome.max_tokens,
        overhead: outcome.overhead,
        total_tokens: outcome.total_tokens,
        tiers,
        files,
        excluded: outcome.excluded.iter().map(|r| r.path.clone()).collect(),
        truncated: outcome.truncated.clone(),
    }
}

#[cfg(test)]
#[path = "sidecar_tests.rs"]
mod tests;
