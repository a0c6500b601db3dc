//! Profile merging.
//!
//! Layers merge field-wise: a field the child sets overrides the base;
//! arrays replace, never concatenate. Nested tables (`relevance`,
//! `redaction`) merge field-wise as well.

use super::model::{RawProfile, RawRedaction, RawRelevance};

/// Merges `child` over `base`, producing the effective profile.
#[must_use]
pub fn merge_profiles(base: &RawProfile, child: &RawProfile) -> RawProfile {
    RawProfile {
        // The merged profile keeps the child's extends link so chains resolve
        // one hop at a time.
        extends: child.extends.clone(),
        output: child.output.clone().or_else(|| base.output.clone()),
        format: child.format.clone().or_else(|| base.format.clone()),
        target: child.target.clone().or_else(|| base.target.clone()),
        max_tokens: child.max_tokens.or(base.max_tokens),
        tokenizer: child.tokenizer.clone().or_else(|| base.tokenizer.clone()),
        compression: child.compression.or(base.compression),
        compression_timeout_secs: child
            .compression_timeout_secs
            .or(base.compression_timeout_secs),
        priority_files: child
            .priority_files
            .clone()
            .or_else(|| base.priority_files.clone()),
        include: child.include.clone().or_else(|| base.include.clone()),
        ignore: child.ignore.clone().or_else(|| base.ignore.clone()),
        relevance: merge_relevance(base.relevance.as_ref(), child.relevance.as_ref()),
        redaction: merge_redaction(base.redaction.as_ref(), child.redaction.as_ref()),
        split_mb: child.split_mb.or(base.split_mb),
        line_numbers: child.line_numbers.or(base.line_numbers),
        skip_files_larger_kb: child.skip_files_larger_kb.or(base.skip_files_larger_kb),
        assert_include: child
            .assert_include
            .clone()
            .or_else(|| base.assert_include.clone()),
        truncation: child.truncation.clone().or_else(|| base.truncation.clone()),
    }
}

fn merge_relevance(
    base: Option<&RawRelevance>,
    child: Option<&RawRelevance>,
) -> Option<RawRelevance> {
    match (base, child) {
        (None, None) => None,
        (Some(b), None) => Some(b.clone()),
        (None, Some(c)) => Some(c.clone()),
        (Some(b), Some(c)) => Some(RawRelevance {
            tier_0: c.tier_0.clone().or_else(|| b.tier_0.clone()),
            tier_1: c.tier_1.clone().or_else(|| b.tier_1.clone()),
            tier_2: c.tier_2.clone().or_else(|| b.tier_2.clone()),
            tier_3: c.tier_3.clone().or_else(|| b.tier_3.clone()),
            tier_4: c.tier_4.clone().or_else(|| b.tier_4.clone()),
            tier_5: c.tier_5.clone().or_else(|| b.tier_5.clone()),
        }),
    }
}

fn merge_redaction(
    base: Option<&RawRedaction>,
    child: Option<&RawRedaction>,
) -> Option<RawRedaction> {
    match (base, child) {
        (None, None) => None,
        (Some(b), None) => Some(b.clone()),
        (None, Some(c)) => Some(c.clone()),
        (Some(b), Some(c)) => Some(RawRedaction {
            enabled: c.enabled.or(b.enabled),
            exclude_paths: c
                .exclude_paths
                .clone()
                .or_else(|| b.exclude_paths.clone()),
            confidence_threshold: c
                .confidence_threshold
                .clone()
                .or_else(|| b.confidence_threshold.clone()),
            extra_patterns: c
                .extra_patterns
                .clone()
                .or_else(|| b.extra_patterns.clone()),
        }),
    }
}

#[cfg(test)]
#[path = "merge_tests.rs"]
mod tests;
