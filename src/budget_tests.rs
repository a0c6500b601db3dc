use super::*;
use crate::pipeline::FileRecord;
use crate::tokenizer::Tokenizer;

fn record(path: &str, tier: u8, tokens: u32) -> FileRecord {
    FileRecord {
        path: path.to_string(),
        tier,
        token_count: tokens,
        ..FileRecord::default()
    }
}

/// A record whose byte content matches its token count under the estimator.
fn sized_record(path: &str, tier: u8, lines: usize, tokenizer: &Tokenizer) -> FileRecord {
    let content = vec!["aaaaaaaaaa"; lines].join("\n");
    let token_count = tokenizer.count(&content);
    FileRecord {
        path: path.to_string(),
        tier,
        content,
        token_count,
        ..FileRecord::default()
    }
}

#[test]
fn skip_strategy_keeps_later_smaller_files() {
    let tokenizer = Tokenizer::Bytes;
    let files = vec![
        record("a", 0, 100),
        record("b", 0, 5),
        record("c", 1, 30),
        record("d", 1, 8),
    ];
    let enforcer = BudgetEnforcer::new(&tokenizer, 20, 0, TruncationStrategy::Skip);
    let outcome = enforcer.enforce(files);

    let included: Vec<&str> = outcome.included.iter().map(|r| r.path.as_str()).collect();
    let excluded: Vec<&str> = outcome.excluded.iter().map(|r| r.path.as_str()).collect();
    assert_eq!(included, vec!["b", "d"]);
    assert_eq!(excluded, vec!["a", "c"]);
    assert_eq!(outcome.total_tokens, 13);

    let tier0 = outcome.tier_stats.get(&0).unwrap();
    assert_eq!((tier0.files_included, tier0.files_excluded), (1, 1));
    let tier1 = outcome.tier_stats.get(&1).unwrap();
    assert_eq!((tier1.files_included, tier1.files_excluded), (1, 1));
}

#[test]
fn budget_arithmetic_invariants_hold() {
    let tokenizer = Tokenizer::Bytes;
    let files: Vec<FileRecord> = (0u32..20)
        .map(|i| record(&format!("f{i:02}"), u8::try_from(i % 6).unwrap(), 7 * (i + 1)))
        .collect();
    let input_len = files.len();
    let max_tokens = 300;
    let overhead = 40;
    let enforcer = BudgetEnforcer::new(&tokenizer, max_tokens, overhead, TruncationStrategy::Skip);
    let outcome = enforcer.enforce(files);

    assert_eq!(outcome.included.len() + outcome.excluded.len(), input_len);
    assert!(outcome.truncated.is_empty());
    let sum: u64 = outcome.included.iter().map(|r| u64::from(r.token_count)).sum();
    assert_eq!(sum, outcome.total_tokens);
    assert!(outcome.total_tokens + u64::from(overhead) <= u64::from(max_tokens));
}

#[test]
fn zero_budget_disables_enforcement() {
    let tokenizer = Tokenizer::Bytes;
    let files = vec![record("a", 0, 1_000_000), record("b", 1, 2_000_000)];
    let enforcer = BudgetEnforcer::new(&tokenizer, 0, 0, TruncationStrategy::Skip);
    let outcome = enforcer.enforce(files);
    assert_eq!(outcome.included.len(), 2);
    assert!(outcome.excluded.is_empty());
}

#[test]
fn truncate_strategy_fills_the_remaining_budget() {
    let tokenizer = Tokenizer::Bytes;
    // 40 lines of 10 bytes: 439 bytes, 109 tokens.
    let big = sized_record("big.txt", 0, 40, &tokenizer);
    let original_content = big.content.clone();
    let total = big.token_count;
    let after = record("after.txt", 1, 5);

    let enforcer = BudgetEnforcer::new(&tokenizer, 50, 0, TruncationStrategy::Truncate);
    let outcome = enforcer.enforce(vec![big, after]);

    assert_eq!(outcome.truncated, vec!["big.txt".to_string()]);
    assert_eq!(outcome.included.len(), 1);
    // Once the budget is exhausted, everything after is excluded.
    assert_eq!(outcome.excluded.len(), 1);
    assert_eq!(outcome.excluded[0].path, "after.txt");

    let copy = &outcome.included[0];
    assert!(copy.content.contains("tokens shown -->"));
    assert!(copy.content.contains(&format!("of {total} tokens shown")));

    // The kept content is a line-boundary prefix of the original.
    let marker_start = copy.content.rfind("\n<!-- ").unwrap();
    let prefix = &copy.content[..marker_start];
    assert!(original_content.starts_with(prefix));
    assert!(prefix.ends_with("aaaaaaaaaa"));

    // The total still honors the budget.
    assert!(outcome.total_tokens <= 50);
}

#[test]
fn truncated_copy_is_a_distinct_record() {
    let tokenizer = Tokenizer::Bytes;
    let big = sized_record("big.txt", 0, 40, &tokenizer);
    let original_tokens = big.token_count;
    let original_content = big.content.clone();

    let enforcer = BudgetEnforcer::new(&tokenizer, 50, 0, TruncationStrategy::Truncate);
    let outcome = enforcer.enforce(vec![big]);

    let copy = &outcome.included[0];
    assert_ne!(copy.content, original_content);
    assert!(copy.token_count < original_tokens);
}

#[test]
fn truncate_excludes_when_reserve_does_not_fit() {
    let tokenizer = Tokenizer::Bytes;
    let big = sized_record("big.txt", 0, 40, &tokenizer);
    // Budget below the marker reservation: nothing can be kept.
    let enforcer = BudgetEnforcer::new(&tokenizer, 15, 0, TruncationStrategy::Truncate);
    let outcome = enforcer.enforce(vec![big]);

    assert!(outcome.included.is_empty());
    assert_eq!(outcome.excluded.len(), 1);
    assert!(outcome.truncated.is_empty());
}

#[test]
fn overhead_is_subtracted_before_inclusion() {
    let tokenizer = Tokenizer::Bytes;
    let files = vec![record("a", 0, 50)];
    // 60 budget - 20 overhead leaves 40: the 50-token file cannot fit.
    let enforcer = BudgetEnforcer::new(&tokenizer, 60, 20, TruncationStrategy::Skip);
    let outcome = enforcer.enforce(files);
    assert!(outcome.included.is_empty());
    assert_eq!(outcome.excluded.len(), 1);
}

#[test]
fn overhead_model_constants_per_format() {
    use crate::render::OutputFormat;

    let md = OverheadModel::for_format(OutputFormat::Markdown);
    assert_eq!((md.base, md.per_file), (200, 35));
    assert_eq!(md.total(10), 550);

    let xml = OverheadModel::for_format(OutputFormat::Xml);
    assert!(xml.base >= md.base);
    assert!(xml.per_file >= md.per_file);
}

#[test]
fn truncation_strategy_parses() {
    assert_eq!(
        "skip".parse::<TruncationStrategy>().unwrap(),
        TruncationStrategy::Skip
    );
    assert_eq!(
        "truncate".parse::<TruncationStrategy>().unwrap(),
        TruncationStrategy::Truncate
    );
    assert!("chop".parse::<TruncationStrategy>().is_err());
}
