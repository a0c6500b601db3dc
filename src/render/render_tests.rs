use indexmap::IndexMap;

use super::*;
use crate::budget::{BudgetOutcome, TierStats};
use crate::pipeline::FileRecord;

fn record(path: &str, tier: u8, content: &str) -> FileRecord {
    FileRecord {
        path: path.to_string(),
        tier,
        size: content.len() as u64,
        content: content.to_string(),
        token_count: u32::try_from(content.len() / 4).unwrap(),
        ..FileRecord::default()
    }
}

fn outcome(included: Vec<FileRecord>) -> BudgetOutcome {
    let mut tier_stats: IndexMap<u8, TierStats> = IndexMap::new();
    for r in &included {
        let s = tier_stats.entry(r.tier).or_default();
        s.files_included += 1;
        s.tokens_used += u64::from(r.token_count);
    }
    let total_tokens = included.iter().map(|r| u64::from(r.token_count)).sum();
    BudgetOutcome {
        included,
        excluded: Vec::new(),
        truncated: Vec::new(),
        total_tokens,
        overhead: 200,
        max_tokens: 0,
        tier_stats,
    }
}

fn options() -> RenderOptions {
    RenderOptions {
        format: OutputFormat::Markdown,
        profile_name: "default".to_string(),
        tokenizer_name: "none".to_string(),
        line_numbers: false,
        tree_depth: None,
        split_bytes: None,
    }
}

#[test]
fn rendering_is_deterministic() {
    let build = || {
        render(
            &outcome(vec![
                record("go.mod", 0, "module app\n"),
                record("src/main.go", 1, "package main\n"),
            ]),
            None,
            &options(),
        )
    };
    let first = build();
    let second = build();
    assert_eq!(first.parts, second.parts);
    assert_eq!(first.content_hash, second.content_hash);
}

#[test]
fn content_hash_covers_paths_and_content() {
    let a = content_hash(&[record("a.rs", 0, "same")]);
    let renamed = content_hash(&[record("b.rs", 0, "same")]);
    let edited = content_hash(&[record("a.rs", 0, "diff")]);
    assert_ne!(a, renamed);
    assert_ne!(a, edited);

    // Tier changes do not affect the hash; only (path, content) pairs do.
    let retiered = content_hash(&[record("a.rs", 3, "same")]);
    assert_eq!(a, retiered);
}

#[test]
fn hash_hex_is_sixteen_chars() {
    let doc = render(&outcome(vec![record("a.rs", 0, "x\n")]), None, &options());
    assert_eq!(doc.hash_hex().len(), 16);
}

#[test]
fn split_bound_produces_parts_at_record_boundaries() {
    let mut opts = options();
    // Force one file section per part.
    opts.split_bytes = Some(1);
    let doc = render(
        &outcome(vec![
            record("a.rs", 0, "fn a() {}\n"),
            record("b.rs", 0, "fn b() {}\n"),
            record("c.rs", 0, "fn c() {}\n"),
        ]),
        None,
        &opts,
    );
    assert_eq!(doc.parts.len(), 3);
    for part in &doc.parts {
        // Every part repeats the metadata block.
        assert!(part.starts_with("# Repository Context\n"));
    }
    assert!(doc.parts[0].contains("### a.rs"));
    assert!(!doc.parts[0].contains("### b.rs"));
    assert!(doc.parts[1].contains("### b.rs"));
    assert!(doc.parts[2].contains("### c.rs"));
}

#[test]
fn no_split_bound_yields_a_single_part() {
    let doc = render(
        &outcome(vec![record("a.rs", 0, "fn a() {}\n"), record("b.rs", 0, "fn b() {}\n")]),
        None,
        &options(),
    );
    assert_eq!(doc.parts.len(), 1);
}

#[test]
fn target_presets_map_to_formats() {
    assert_eq!(TargetPreset::Default.format(), OutputFormat::Markdown);
    assert_eq!(TargetPreset::Claude.format(), OutputFormat::Xml);
    assert_eq!("claude".parse::<TargetPreset>().unwrap(), TargetPreset::Claude);
}

#[test]
fn output_format_parses_and_names_extensions() {
    assert_eq!("markdown".parse::<OutputFormat>().unwrap(), OutputFormat::Markdown);
    assert_eq!("md".parse::<OutputFormat>().unwrap(), OutputFormat::Markdown);
    assert_eq!("xml".parse::<OutputFormat>().unwrap(), OutputFormat::Xml);
    assert!("pdf".parse::<OutputFormat>().is_err());
    assert_eq!(OutputFormat::Markdown.extension(), "md");
    assert_eq!(OutputFormat::Xml.extension(), "xml");
}

#[test]
fn empty_outcome_still_renders_a_summary() {
    let doc = render(&outcome(vec![]), None, &options());
    assert_eq!(doc.parts.len(), 1);
    assert!(doc.parts[0].contains("# Repository Context"));
    assert!(doc.parts[0].contains("## Files"));
}
