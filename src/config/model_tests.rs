use super::*;

#[test]
fn minimal_profile_file_parses() {
    let raw: RawConfig = toml::from_str(
        r#"
[profile.default]
max_tokens = 50000
tokenizer = "cl100k"
"#,
    )
    .unwrap();
    let profile = raw.profile.get("default").unwrap();
    assert_eq!(profile.max_tokens, Some(50_000));
    assert_eq!(profile.tokenizer.as_deref(), Some("cl100k"));
}

#[test]
fn unknown_top_level_keys_fail() {
    let result: Result<RawConfig, _> = toml::from_str("[settings]\nfoo = 1\n");
    assert!(result.is_err());
}

#[test]
fn unknown_profile_keys_fail() {
    let result: Result<RawConfig, _> = toml::from_str(
        r#"
[profile.default]
max_tokns = 50000
"#,
    );
    assert!(result.is_err());
}

#[test]
fn unknown_redaction_keys_fail() {
    let result: Result<RawConfig, _> = toml::from_str(
        r#"
[profile.default.redaction]
enable = true
"#,
    );
    assert!(result.is_err());
}

#[test]
fn relevance_tiers_parse_in_order() {
    let raw: RawConfig = toml::from_str(
        r#"
[profile.app.relevance]
tier_0 = ["Cargo.toml"]
tier_3 = ["tests/**"]
"#,
    )
    .unwrap();
    let defs = raw
        .profile
        .get("app")
        .unwrap()
        .relevance
        .as_ref()
        .unwrap()
        .to_definitions();
    assert_eq!(defs.len(), 2);
    assert_eq!(defs[0].tier, 0);
    assert_eq!(defs[0].patterns, vec!["Cargo.toml".to_string()]);
    assert_eq!(defs[1].tier, 3);
}

#[test]
fn full_profile_surface_parses() {
    let raw: RawConfig = toml::from_str(
        r#"
[profile.review]
extends = "default"
output = "out/review.md"
format = "markdown"
target = "claude"
max_tokens = 80000
tokenizer = "o200k"
compression = true
compression_timeout_secs = 3
priority_files = ["ARCHITECTURE.md"]
include = ["src/**"]
ignore = ["fixtures/**"]
split_mb = 2
line_numbers = true
skip_files_larger_kb = 512
assert_include = ["src/main.rs"]
truncation = "truncate"

[profile.review.redaction]
enabled = true
exclude_paths = ["tests/fixtures/**"]
confidence_threshold = "high"
extra_patterns = ["INTERNAL-[0-9]{6}"]
"#,
    )
    .unwrap();
    let profile = raw.profile.get("review").unwrap();
    assert_eq!(profile.extends.as_deref(), Some("default"));
    assert_eq!(profile.compression, Some(true));
    assert_eq!(
        profile.redaction.as_ref().unwrap().confidence_threshold.as_deref(),
        Some("high")
    );
}

#[test]
fn defaults_are_complete_and_sane() {
    let profile = ResolvedProfile::defaults("default");
    assert_eq!(profile.name, "default");
    assert!(profile.max_tokens > 0);
    assert!(!profile.compression);
    assert!(profile.redaction.enabled);
    assert_eq!(profile.tiers.len(), 6);
    assert!(profile.split_bytes.is_none());
    assert!(!profile.stdout);
}
