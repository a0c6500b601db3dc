//! Relevance tier classification.
//!
//! A classifier holds up to six tiers of ordered glob patterns. `classify`
//! evaluates tiers in ascending order and returns the first match; unmatched
//! paths fall through to the configured default tier so unexpected but
//! important files are never silently last. Profile-supplied tier sets replace
//! the defaults entirely.

use globset::{Glob, GlobMatcher};

use crate::error::{HarvxError, Result};
use crate::pipeline::FileRecord;

/// Number of relevance tiers.
pub const TIER_COUNT: u8 = 6;

/// Tier assigned when no pattern matches.
pub const DEFAULT_TIER: u8 = 2;

/// A tier and its ordered pattern list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TierDefinition {
    pub tier: u8,
    pub patterns: Vec<String>,
}

/// One tier/pattern overlap found by `explain`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TierMatch {
    pub tier: u8,
    pub pattern: String,
}

/// Full classification report for one path.
#[derive(Debug, Clone)]
pub struct TierExplanation {
    pub assigned_tier: u8,
    pub matched_pattern: Option<String>,
    pub all_matches: Vec<TierMatch>,
}

struct TierEntry {
    tier: u8,
    patterns: Vec<(String, GlobMatcher)>,
}

/// Glob-based first-match classifier into six priority tiers.
pub struct TierClassifier {
    entries: Vec<TierEntry>,
    default_tier: u8,
}

impl TierClassifier {
    /// Builds a classifier from tier definitions. Entries are evaluated in
    /// ascending tier order; pattern order within a tier is preserved.
    pub fn new(definitions: &[TierDefinition]) -> Result<Self> {
        let mut entries = Vec::with_capacity(definitions.len());
        let mut sorted: Vec<&TierDefinition> = definitions.iter().collect();
        sorted.sort_by_key(|d| d.tier);

        for def in sorted {
            if def.tier >= TIER_COUNT {
                return Err(HarvxError::Config(format!(
                    "Tier {} is out of range (0..{TIER_COUNT})",
                    def.tier
                )));
            }
            let mut patterns = Vec::with_capacity(def.patterns.len());
            for pattern in &def.patterns {
                let glob = Glob::new(pattern).map_err(|e| HarvxError::InvalidPattern {
                    pattern: pattern.clone(),
                    source: e,
                })?;
                patterns.push((pattern.clone(), glob.compile_matcher()));
            }
            entries.push(TierEntry {
                tier: def.tier,
                patterns,
            });
        }

        Ok(Self {
            entries,
            default_tier: DEFAULT_TIER,
        })
    }

    /// The built-in tier set: manifests first, primary source next, then
    /// config, tests, docs, and generated assets.
    #[must_use]
    pub fn default_tiers() -> Vec<TierDefinition> {
        let tier = |tier, patterns: &[&str]| TierDefinition {
            tier,
            patterns: patterns.iter().map(|p| (*p).to_string()).collect(),
        };
        vec![
            tier(
                0,
                &[
                    "Cargo.toml",
                    "go.mod",
                    "package.json",
                    "pyproject.toml",
                    "setup.py",
                    "build.gradle",
                    "pom.xml",
                    "Makefile",
                    "CMakeLists.txt",
                    "Dockerfile",
                    "docker-compose.yml",
                    ".github/workflows/**",
                ],
            ),
            tier(
                1,
                &[
                    "src/**",
                    "lib/**",
                    "cmd/**",
                    "app/**",
                    "internal/**",
                    "crates/**",
                    "pkg/**",
                ],
            ),
            tier(2, &["*.yml", "*.yaml", "*.json", "*.toml", "*.ini"]),
            tier(
                3,
                &[
                    "tests/**",
                    "test/**",
                    "spec/**",
                    "*_test.*",
                    "*.test.*",
                    "test_*",
                ],
            ),
            tier(
                4,
                &["*.md", "*.rst", "*.txt", "docs/**", "LICENSE*", "CHANGELOG*"],
            ),
            tier(
                5,
                &["*.min.js", "*.min.css", "*.svg", "assets/**", "static/**"],
            ),
        ]
    }

    /// Returns the first matching tier in ascending order, or the default.
    #[must_use]
    pub fn classify(&self, path: &str) -> u8 {
        self.classify_with_pattern(path)
            .map_or(self.default_tier, |(tier, _)| tier)
    }

    /// Like `classify`, but also reports which pattern matched.
    #[must_use]
    pub fn classify_with_pattern(&self, path: &str) -> Option<(u8, &str)> {
        let path = crate::path_utils::normalize(path);
        for entry in &self.entries {
            for (pattern, matcher) in &entry.patterns {
                if matcher.is_match(&path) {
                    return Some((entry.tier, pattern));
                }
            }
        }
        None
    }

    /// Collects every tier/pattern overlap for a path, stable-sorted by tier
    /// then pattern position. Used by the `explain` diagnostic.
    #[must_use]
    pub fn explain(&self, path: &str) -> TierExplanation {
        let normalized = crate::path_utils::normalize(path);
        let mut all_matches = Vec::new();
        for entry in &self.entries {
            for (pattern, matcher) in &entry.patterns {
                if matcher.is_match(&normalized) {
                    all_matches.push(TierMatch {
                        tier: entry.tier,
                        pattern: pattern.clone(),
                    });
                }
            }
        }
        let matched = all_matches.first().cloned();
        TierExplanation {
            assigned_tier: matched.as_ref().map_or(self.default_tier, |m| m.tier),
            matched_pattern: matched.map(|m| m.pattern),
            all_matches,
        }
    }

    /// Stable sort by `(tier, path)`; records with equal keys keep their
    /// relative order.
    pub fn sort_by_relevance(records: &mut [FileRecord]) {
        records.sort_by(|a, b| a.tier.cmp(&b.tier).then_with(|| a.path.cmp(&b.path)));
    }
}

#[cfg(test)]
#[path = "relevance_tests.rs"]
mod tests;
