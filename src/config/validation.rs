//! Resolved-profile validation and tier linting.
//!
//! Bad globs and miscompiled redaction patterns are fatal before any I/O.
//! The tier lint reports overlapping rules (the lower tier wins at runtime)
//! and unreachable tiers as warnings.

use std::collections::HashMap;

use globset::Glob;

use crate::error::{HarvxError, Result};
use crate::redact::Redactor;
use crate::relevance::{TIER_COUNT, TierDefinition};

use super::model::ResolvedProfile;

/// Validates a resolved profile. Returns lint warnings; errors are fatal.
pub fn validate(profile: &ResolvedProfile) -> Result<Vec<String>> {
    validate_globs(&profile.priority_files)?;
    validate_globs(&profile.include)?;
    validate_globs(&profile.excludes)?;
    validate_globs(&profile.assert_include)?;
    validate_globs(&profile.redaction.exclude_paths)?;
    for def in &profile.tiers {
        if def.tier >= TIER_COUNT {
            return Err(HarvxError::Config(format!(
                "Tier {} is out of range (0..{TIER_COUNT})",
                def.tier
            )));
        }
        validate_globs(&def.patterns)?;
    }

    // Compiling the redactor here surfaces a miscompiled custom pattern at
    // config-resolution time rather than mid-pipeline.
    let _ = Redactor::from_policy(&profile.redaction)?;

    if profile.max_tokens > 0 {
        let model = crate::budget::OverheadModel::for_format(profile.format);
        if profile.max_tokens <= model.base {
            return Err(HarvxError::Config(format!(
                "max_tokens ({}) does not exceed the structural overhead base ({}); nothing could be included",
                profile.max_tokens, model.base
            )));
        }
    }

    Ok(lint_tiers(&profile.tiers))
}

fn validate_globs(patterns: &[String]) -> Result<()> {
    for pattern in patterns {
        Glob::new(pattern).map_err(|e| HarvxError::InvalidPattern {
            pattern: pattern.clone(),
            source: e,
        })?;
    }
    Ok(())
}

/// Lints the tier set: duplicate patterns within a tier, patterns repeated
/// across tiers (only the lower tier can ever match), and tiers whose every
/// pattern is shadowed.
#[must_use]
pub fn lint_tiers(tiers: &[TierDefinition]) -> Vec<String> {
    let mut warnings = Vec::new();
    let mut first_owner: HashMap<&str, u8> = HashMap::new();

    let mut sorted: Vec<&TierDefinition> = tiers.iter().collect();
    sorted.sort_by_key(|d| d.tier);

    for def in &sorted {
        let mut seen_here: Vec<&str> = Vec::new();
        let mut shadowed = 0usize;
        for pattern in &def.patterns {
            if seen_here.contains(&pattern.as_str()) {
                warnings.push(format!(
                    "Tier {} lists pattern '{pattern}' more than once",
                    def.tier
                ));
                continue;
            }
            seen_here.push(pattern);
            match first_owner.get(pattern.as_str()) {
                Some(owner) => {
                    shadowed += 1;
                    warnings.push(format!(
                        "Pattern '{pattern}' in tier {} overlaps tier {owner}; tier {owner} wins",
                        def.tier
                    ));
                }
                None => {
                    first_owner.insert(pattern, def.tier);
                }
            }
        }
        if !def.patterns.is_empty() && shadowed == seen_here.len() {
            warnings.push(format!(
                "Tier {} is unreachable: every pattern is owned by a lower tier",
                def.tier
            ));
        }
    }
    warnings
}

#[cfg(test)]
#[path = "validation_tests.rs"]
mod tests;
