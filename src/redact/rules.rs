//! Built-in secret detection rules.
//!
//! Rules are ordered: provider-specific shapes first, generic assignment and
//! entropy rules last, so a provider token is always attributed to its own
//! category before a generic rule can claim it.

use regex::Regex;

use crate::error::{HarvxError, Result};

/// Detection confidence, ordered weakest to strongest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum Confidence {
    Low,
    #[default]
    Medium,
    High,
}

impl Confidence {
    /// One level up; `High` saturates.
    #[must_use]
    pub const fn promoted(self) -> Self {
        match self {
            Self::Low => Self::Medium,
            Self::Medium | Self::High => Self::High,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl std::str::FromStr for Confidence {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            _ => Err(format!(
                "Unknown confidence '{s}' (expected low, medium, or high)"
            )),
        }
    }
}

/// How the entropy signal applies to a rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntropyUse {
    /// Entropy plays no role.
    Ignore,
    /// High entropy promotes the match one confidence level.
    Promote,
    /// The match is dropped unless the candidate is high-entropy.
    Require,
}

/// One compiled detection rule.
#[derive(Debug)]
pub struct RedactionRule {
    pub name: &'static str,
    pub category: String,
    pub regex: Regex,
    pub confidence: Confidence,
    pub entropy: EntropyUse,
    /// Capture group holding the secret value; 0 replaces the whole match.
    pub secret_group: usize,
}

struct RuleSpec {
    name: &'static str,
    category: &'static str,
    pattern: &'static str,
    confidence: Confidence,
    entropy: EntropyUse,
    secret_group: usize,
}

const BUILTIN_RULES: &[RuleSpec] = &[
    RuleSpec {
        name: "aws-access-key",
        category: "aws_access_key",
        pattern: r"\b(?:AKIA|ASIA|ABIA|ACCA)[0-9A-Z]{16}\b",
        confidence: Confidence::High,
        entropy: EntropyUse::Ignore,
        secret_group: 0,
    },
    RuleSpec {
        name: "github-token",
        category: "github_token",
        pattern: r"\bgh[pousr]_[A-Za-z0-9]{36,}\b",
        confidence: Confidence::High,
        entropy: EntropyUse::Ignore,
        secret_group: 0,
    },
    RuleSpec {
        name: "gitlab-token",
        category: "gitlab_token",
        pattern: r"\bglpat-[A-Za-z0-9_-]{20,}\b",
        confidence: Confidence::High,
        entropy: EntropyUse::Ignore,
        secret_group: 0,
    },
    RuleSpec {
        name: "slack-token",
        category: "slack_token",
        pattern: r"\bxox[baprs]-[A-Za-z0-9-]{10,}\b",
        confidence: Confidence::High,
        entropy: EntropyUse::Ignore,
        secret_group: 0,
    },
    RuleSpec {
        name: "stripe-key",
        category: "stripe_key",
        pattern: r"\b[sr]k_(?:live|test)_[A-Za-z0-9]{16,}\b",
        confidence: Confidence::High,
        entropy: EntropyUse::Ignore,
        secret_group: 0,
    },
    RuleSpec {
        name: "google-api-key",
        category: "google_api_key",
        pattern: r"\bAIza[0-9A-Za-z_-]{35}\b",
        confidence: Confidence::High,
        entropy: EntropyUse::Ignore,
        secret_group: 0,
    },
    RuleSpec {
        name: "openai-key",
        category: "openai_key",
        pattern: r"\bsk-[A-Za-z0-9_-]{40,}\b",
        confidence: Confidence::Medium,
        entropy: EntropyUse::Promote,
        secret_group: 0,
    },
    RuleSpec {
        name: "private-key-block",
        category: "private_key",
        pattern: r"-----BEGIN [A-Z ]*PRIVATE KEY-----(?s:.*?)-----END [A-Z ]*PRIVATE KEY-----",
        confidence: Confidence::High,
        entropy: EntropyUse::Ignore,
        secret_group: 0,
    },
    RuleSpec {
        name: "connection-uri",
        category: "connection_uri",
        pattern: r"\b[a-zA-Z][a-zA-Z0-9+.-]*://[^\s:@/]+:([^\s@/]+)@",
        confidence: Confidence::High,
        entropy: EntropyUse::Ignore,
        secret_group: 1,
    },
    RuleSpec {
        name: "jwt",
        category: "jwt",
        pattern: r"\beyJ[A-Za-z0-9_-]{10,}\.[A-Za-z0-9_-]{10,}\.[A-Za-z0-9_-]{5,}\b",
        confidence: Confidence::Medium,
        entropy: EntropyUse::Promote,
        secret_group: 0,
    },
    RuleSpec {
        name: "secret-assignment",
        category: "secret_assignment",
        pattern: r#"(?i)\b(?:api[_-]?key|secret|token|password|passwd|pwd|credential|auth)[a-z0-9_]*\s*[:=]\s*["']?([A-Za-z0-9+/_.=-]{8,})["']?"#,
        confidence: Confidence::Medium,
        entropy: EntropyUse::Promote,
        secret_group: 1,
    },
    RuleSpec {
        name: "high-entropy-assignment",
        category: "high_entropy",
        pattern: r#"(?i)\b[a-z_][a-z0-9_]{2,}\s*[:=]\s*["']([A-Za-z0-9+/=_-]{24,})["']"#,
        confidence: Confidence::Low,
        entropy: EntropyUse::Require,
        secret_group: 1,
    },
];

/// Compiles the built-in rule set. Compilation cannot fail for the embedded
/// patterns, but the error path is kept so custom rules share the same code.
pub fn builtin_rules() -> Result<Vec<RedactionRule>> {
    BUILTIN_RULES
        .iter()
        .map(|spec| {
            let regex = compile(spec.pattern)?;
            Ok(RedactionRule {
                name: spec.name,
                category: spec.category.to_string(),
                regex,
                confidence: spec.confidence,
                entropy: spec.entropy,
                secret_group: spec.secret_group,
            })
        })
        .collect()
}

/// Compiles a profile-supplied pattern into a custom rule. A miscompiled
/// pattern is fatal at config-resolution time.
pub fn custom_rule(pattern: &str) -> Result<RedactionRule> {
    let regex = compile(pattern)?;
    Ok(RedactionRule {
        name: "custom",
        category: "custom".to_string(),
        regex,
        confidence: Confidence::High,
        entropy: EntropyUse::Ignore,
        secret_group: 0,
    })
}

fn compile(pattern: &str) -> Result<Regex> {
    Regex::new(pattern).map_err(|e| HarvxError::InvalidRedactionPattern {
        pattern: pattern.to_string(),
        source: e,
    })
}

#[cfg(test)]
#[path = "rules_tests.rs"]
mod tests;
