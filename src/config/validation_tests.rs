use super::*;
use crate::config::model::ResolvedProfile;
use crate::relevance::TierDefinition;

fn tier(tier: u8, patterns: &[&str]) -> TierDefinition {
    TierDefinition {
        tier,
        patterns: patterns.iter().map(|p| (*p).to_string()).collect(),
    }
}

#[test]
fn clean_defaults_validate_without_warnings() {
    let profile = ResolvedProfile::defaults("default");
    let warnings = validate(&profile).unwrap();
    assert!(warnings.is_empty());
}

#[test]
fn bad_include_glob_is_fatal() {
    let mut profile = ResolvedProfile::defaults("default");
    profile.include = vec!["[oops".to_string()];
    let err = validate(&profile).unwrap_err();
    assert_eq!(err.error_type(), "InvalidPattern");
}

#[test]
fn bad_tier_glob_is_fatal() {
    let mut profile = ResolvedProfile::defaults("default");
    profile.tiers = vec![tier(0, &["[oops"])];
    assert!(validate(&profile).is_err());
}

#[test]
fn budget_below_overhead_base_is_fatal() {
    let mut profile = ResolvedProfile::defaults("default");
    profile.max_tokens = 100;
    let err = validate(&profile).unwrap_err();
    assert!(err.message().contains("overhead"));
}

#[test]
fn zero_budget_skips_the_overhead_check() {
    let mut profile = ResolvedProfile::defaults("default");
    profile.max_tokens = 0;
    assert!(validate(&profile).is_ok());
}

#[test]
fn lint_flags_cross_tier_overlap() {
    let warnings = lint_tiers(&[tier(0, &["src/**"]), tier(2, &["src/**"])]);
    assert_eq!(warnings.len(), 2);
    assert!(warnings[0].contains("overlaps tier 0"));
    assert!(warnings[1].contains("unreachable"));
}

#[test]
fn lint_flags_duplicates_within_a_tier() {
    let warnings = lint_tiers(&[tier(1, &["src/**", "src/**"])]);
    assert_eq!(warnings.len(), 1);
    assert!(warnings[0].contains("more than once"));
}

#[test]
fn partially_shadowed_tier_is_not_unreachable() {
    let warnings = lint_tiers(&[tier(0, &["src/**"]), tier(2, &["src/**", "docs/**"])]);
    assert_eq!(warnings.len(), 1);
    assert!(warnings[0].contains("overlaps"));
}

#[test]
fn disjoint_tiers_lint_clean() {
    let warnings = lint_tiers(&[tier(0, &["Cargo.toml"]), tier(1, &["src/**"])]);
    assert!(warnings.is_empty());
}
