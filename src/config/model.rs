//! Profile configuration model.
//!
//! `RawProfile` mirrors the TOML surface exactly; unknown keys fail parsing.
//! `ResolvedProfile` is the immutable result of layered resolution, with
//! every option concrete.

use std::collections::HashMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::budget::TruncationStrategy;
use crate::redact::RedactionPolicy;
use crate::relevance::TierDefinition;
use crate::render::{OutputFormat, TargetPreset};
use crate::tokenizer::Tokenizer;

/// Profile file discovered at the repository root.
pub const PROFILE_FILE_NAME: &str = "harvx.toml";

/// Namespace prefix for environment overrides.
pub const ENV_PREFIX: &str = "HARVX_";

/// Name of the profile used when none is selected.
pub const DEFAULT_PROFILE: &str = "default";

/// Warn when an `extends` chain grows deeper than this.
pub const MAX_EXTENDS_DEPTH: usize = 3;

/// Default compression deadline per file, in seconds.
pub const DEFAULT_COMPRESSION_TIMEOUT_SECS: u64 = 5;

const DEFAULT_MAX_TOKENS: u32 = 100_000;

/// Top of a profile file: a single `profile` table keyed by name.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct RawConfig {
    #[serde(default)]
    pub profile: HashMap<String, RawProfile>,
}

/// One `[profile.<name>]` table as written. Every field optional; resolution
/// fills the gaps from lower layers.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct RawProfile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extends: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<PathBuf>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tokenizer: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compression: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compression_timeout_secs: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority_files: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub include: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ignore: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relevance: Option<RawRelevance>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub redaction: Option<RawRedaction>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub split_mb: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_numbers: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skip_files_larger_kb: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assert_include: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub truncation: Option<String>,
}

/// `[profile.<name>.relevance]`: a present table replaces the default tier
/// set entirely, no merge.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct RawRelevance {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tier_0: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tier_1: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tier_2: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tier_3: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tier_4: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tier_5: Option<Vec<String>>,
}

impl RawRelevance {
    /// The tier definitions actually written, ascending.
    #[must_use]
    pub fn to_definitions(&self) -> Vec<TierDefinition> {
        let lists = [
            (0u8, &self.tier_0),
            (1, &self.tier_1),
            (2, &self.tier_2),
            (3, &self.tier_3),
            (4, &self.tier_4),
            (5, &self.tier_5),
        ];
        lists
            .into_iter()
            .filter_map(|(tier, patterns)| {
                patterns.as_ref().map(|patterns| TierDefinition {
                    tier,
                    patterns: patterns.clone(),
                })
            })
            .collect()
    }
}

/// `[profile.<name>.redaction]`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct RawRedaction {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exclude_paths: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence_threshold: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extra_patterns: Option<Vec<String>>,
}

/// The fully resolved options for one run. Immutable after resolution.
#[derive(Debug, Clone)]
pub struct ResolvedProfile {
    pub name: String,
    pub output: PathBuf,
    pub format: OutputFormat,
    pub target: TargetPreset,
    pub max_tokens: u32,
    pub tokenizer: Tokenizer,
    pub compression: bool,
    pub compression_timeout_secs: u64,
    /// Globs forced to the front of tier 0.
    pub priority_files: Vec<String>,
    pub include: Vec<String>,
    pub ignore: Vec<String>,
    /// The effective tier set (profile-supplied sets replace defaults).
    pub tiers: Vec<TierDefinition>,
    pub redaction: RedactionPolicy,
    pub fail_on_redaction: bool,
    pub vcs_tracked_only: bool,
    pub split_bytes: Option<u64>,
    pub line_numbers: bool,
    /// Byte cap beyond which files are skipped with a warning.
    pub skip_files_larger_than: Option<u64>,
    pub assert_include: Vec<String>,
    pub truncation: TruncationStrategy,
    /// CLI extension filter.
    pub extensions: Vec<String>,
    /// CLI exclude globs, layered over the profile ignores.
    pub excludes: Vec<String>,
    pub stdout: bool,
    pub sidecar: bool,
}

impl ResolvedProfile {
    /// Built-in defaults: the bottom resolution layer.
    #[must_use]
    pub fn defaults(name: &str) -> Self {
        Self {
            name: name.to_string(),
            output: PathBuf::from("harvx-context.md"),
            format: OutputFormat::Markdown,
            target: TargetPreset::Default,
            max_tokens: DEFAULT_MAX_TOKENS,
            tokenizer: Tokenizer::Cl100k,
            compression: false,
            compression_timeout_secs: DEFAULT_COMPRESSION_TIMEOUT_SECS,
            priority_files: Vec::new(),
            include: Vec::new(),
            ignore: Vec::new(),
            tiers: crate::relevance::TierClassifier::default_tiers(),
            redaction: RedactionPolicy::default(),
            fail_on_redaction: false,
            vcs_tracked_only: false,
            split_bytes: None,
            line_numbers: false,
            skip_files_larger_than: None,
            assert_include: Vec::new(),
            truncation: TruncationStrategy::Skip,
            extensions: Vec::new(),
            excludes: Vec::new(),
            stdout: false,
            sidecar: false,
        }
    }
}

/// CLI and environment overrides, the two strongest layers.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub output: Option<PathBuf>,
    pub format: Option<String>,
    pub target: Option<String>,
    pub max_tokens: Option<u32>,
    pub tokenizer: Option<String>,
    pub compression: Option<bool>,
    pub redaction: Option<bool>,
    pub fail_on_redaction: bool,
    pub vcs_tracked_only: bool,
    pub extensions: Vec<String>,
    pub include: Vec<String>,
    pub exclude: Vec<String>,
    pub split_mb: Option<u64>,
    pub skip_files_larger_kb: Option<u64>,
    pub assert_include: Vec<String>,
    pub line_numbers: bool,
    pub stdout: bool,
    pub sidecar: Option<bool>,
    pub truncation: Option<String>,
}

#[cfg(test)]
#[path = "model_tests.rs"]
mod tests;
