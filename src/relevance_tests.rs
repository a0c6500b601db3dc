use super::*;
use crate::pipeline::FileRecord;

fn default_classifier() -> TierClassifier {
    TierClassifier::new(&TierClassifier::default_tiers()).unwrap()
}

#[test]
fn default_tiers_classify_a_tiny_repo() {
    let classifier = default_classifier();
    assert_eq!(classifier.classify("go.mod"), 0);
    assert_eq!(classifier.classify("src/main.go"), 1);
    assert_eq!(classifier.classify("README.md"), 4);
}

#[test]
fn lowest_matching_tier_wins() {
    let classifier = TierClassifier::new(&[
        TierDefinition {
            tier: 3,
            patterns: vec!["src/**".to_string()],
        },
        TierDefinition {
            tier: 1,
            patterns: vec!["src/**".to_string()],
        },
    ])
    .unwrap();
    assert_eq!(classifier.classify("src/lib.rs"), 1);
}

#[test]
fn unmatched_path_falls_through_to_default() {
    let classifier = TierClassifier::new(&[TierDefinition {
        tier: 0,
        patterns: vec!["Cargo.toml".to_string()],
    }])
    .unwrap();
    assert_eq!(classifier.classify("mystery.xyz"), DEFAULT_TIER);
}

#[test]
fn pattern_order_within_a_tier_is_preserved() {
    let classifier = TierClassifier::new(&[TierDefinition {
        tier: 0,
        patterns: vec!["a*".to_string(), "*.rs".to_string()],
    }])
    .unwrap();
    let (tier, pattern) = classifier.classify_with_pattern("abc.rs").unwrap();
    assert_eq!(tier, 0);
    assert_eq!(pattern, "a*");
}

#[test]
fn out_of_range_tier_is_rejected() {
    let result = TierClassifier::new(&[TierDefinition {
        tier: 6,
        patterns: vec!["*".to_string()],
    }]);
    assert!(result.is_err());
}

#[test]
fn invalid_pattern_is_rejected() {
    let result = TierClassifier::new(&[TierDefinition {
        tier: 0,
        patterns: vec!["[bad".to_string()],
    }]);
    assert!(result.is_err());
}

#[test]
fn explain_collects_every_overlap_in_tier_order() {
    let classifier = TierClassifier::new(&[
        TierDefinition {
            tier: 1,
            patterns: vec!["src/**".to_string()],
        },
        TierDefinition {
            tier: 3,
            patterns: vec!["*_test.*".to_string()],
        },
    ])
    .unwrap();

    let explanation = classifier.explain("src/parser_test.rs");
    assert_eq!(explanation.assigned_tier, 1);
    assert_eq!(explanation.matched_pattern.as_deref(), Some("src/**"));
    assert_eq!(explanation.all_matches.len(), 2);
    assert_eq!(explanation.all_matches[0].tier, 1);
    assert_eq!(explanation.all_matches[1].tier, 3);
}

#[test]
fn explain_unmatched_reports_default() {
    let classifier = default_classifier();
    let explanation = classifier.explain("mystery.xyz");
    assert_eq!(explanation.assigned_tier, DEFAULT_TIER);
    assert!(explanation.matched_pattern.is_none());
    assert!(explanation.all_matches.is_empty());
}

#[test]
fn sort_by_relevance_is_stable_on_ties() {
    let mut records = vec![
        record("b.rs", 1),
        record("a.rs", 1),
        record("z.rs", 0),
        record("a.rs", 1),
    ];
    TierClassifier::sort_by_relevance(&mut records);
    let order: Vec<(u8, &str)> = records.iter().map(|r| (r.tier, r.path.as_str())).collect();
    assert_eq!(
        order,
        vec![(0, "z.rs"), (1, "a.rs"), (1, "a.rs"), (1, "b.rs")]
    );
}

#[test]
fn classification_normalizes_separators() {
    let classifier = default_classifier();
    assert_eq!(classifier.classify("src\\main.go"), 1);
    assert_eq!(classifier.classify("./go.mod"), 0);
}

fn record(path: &str, tier: u8) -> FileRecord {
    FileRecord {
        path: path.to_string(),
        tier,
        ..FileRecord::default()
    }
}
