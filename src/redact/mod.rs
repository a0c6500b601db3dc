//! Streaming secret redaction.
//!
//! Runs strictly before token counting so every count reflects post-redaction
//! content. Findings carry category and location, never the secret value.

pub mod entropy;
mod rules;

pub use rules::{Confidence, EntropyUse, RedactionRule, builtin_rules, custom_rule};

use globset::GlobSet;
use indexmap::IndexMap;

use crate::error::Result;
use crate::scanner::build_globset;

/// Policy controls resolved from the profile and CLI.
#[derive(Debug, Clone)]
pub struct RedactionPolicy {
    pub enabled: bool,
    /// Files matching any of these globs bypass redaction entirely.
    pub exclude_paths: Vec<String>,
    /// Findings below this confidence are suppressed.
    pub confidence_threshold: Confidence,
    /// Additional profile-supplied patterns, appended after the built-ins.
    pub extra_patterns: Vec<String>,
}

impl Default for RedactionPolicy {
    fn default() -> Self {
        Self {
            enabled: true,
            exclude_paths: Vec::new(),
            confidence_threshold: Confidence::Medium,
            extra_patterns: Vec::new(),
        }
    }
}

/// A single detection event. Never includes the secret value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finding {
    pub file: String,
    pub line: u32,
    pub category: String,
    pub confidence: Confidence,
}

/// Result of redacting one file.
#[derive(Debug, Default)]
pub struct RedactionOutcome {
    pub content: String,
    pub findings: Vec<Finding>,
    /// Redaction count per category, in first-seen order.
    pub categories: IndexMap<String, u32>,
}

/// Streaming per-file secret filter with compiled rules.
pub struct Redactor {
    rules: Vec<RedactionRule>,
    exclude: GlobSet,
    threshold: Confidence,
    enabled: bool,
}

impl Redactor {
    /// Compiles the rule set once for the whole run. Custom patterns that do
    /// not compile are fatal here, before any file I/O.
    pub fn from_policy(policy: &RedactionPolicy) -> Result<Self> {
        let mut rules = builtin_rules()?;
        for pattern in &policy.extra_patterns {
            rules.push(custom_rule(pattern)?);
        }
        Ok(Self {
            rules,
            exclude: build_globset(&policy.exclude_paths)?,
            threshold: policy.confidence_threshold,
            enabled: policy.enabled,
        })
    }

    /// Redacts `content`, returning the processed text and findings.
    ///
    /// Disabled policies and excluded paths pass content through untouched.
    #[must_use]
    pub fn scan(&self, path: &str, content: &str) -> RedactionOutcome {
        if !self.enabled || self.exclude.is_match(path) {
            return RedactionOutcome {
                content: content.to_string(),
                ..RedactionOutcome::default()
            };
        }

        let mut current = content.to_string();
        let mut findings = Vec::new();
        let mut categories: IndexMap<String, u32> = IndexMap::new();

        // Rules run in order against the progressively-redacted text, so a
        // placeholder inserted by an earlier rule is never re-matched.
        for rule in &self.rules {
            let mut rewritten = String::new();
            let mut last = 0;
            for caps in rule.regex.captures_iter(&current) {
                let Some(m) = caps.get(rule.secret_group) else {
                    continue;
                };
                let secret = m.as_str();

                let confidence = match rule.entropy {
                    EntropyUse::Require => {
                        if !entropy::is_high_entropy(secret) {
                            continue;
                        }
                        rule.confidence
                    }
                    EntropyUse::Promote => {
                        if entropy::is_high_entropy(secret) {
                            rule.confidence.promoted()
                        } else {
                            rule.confidence
                        }
                    }
                    EntropyUse::Ignore => rule.confidence,
                };
                if confidence < self.threshold {
                    continue;
                }

                let line = line_of_offset(&current, m.start());
                findings.push(Finding {
                    file: path.to_string(),
                    line,
                    category: rule.category.clone(),
                    confidence,
                });
                *categories.entry(rule.category.clone()).or_insert(0) += 1;

                rewritten.push_str(&current[last..m.start()]);
                rewritten.push_str("[REDACTED:");
                rewritten.push_str(&rule.category);
                rewritten.push(']');
                last = m.end();
            }
            if last > 0 {
                rewritten.push_str(&current[last..]);
                current = rewritten;
            }
        }

        RedactionOutcome {
            content: current,
            findings,
            categories,
        }
    }
}

fn line_of_offset(content: &str, offset: usize) -> u32 {
    let newlines = content.as_bytes()[..offset]
        .iter()
        .filter(|&&b| b == b'\n')
        .count();
    u32::try_from(newlines + 1).unwrap_or(u32::MAX)
}

#[cfg(test)]
#[path = "redact_tests.rs"]
mod tests;
