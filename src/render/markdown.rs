//! Markdown document shape (the default format).

use std::fmt::Write;

use indexmap::IndexMap;

use crate::budget::BudgetOutcome;
use crate::pipeline::FileRecord;
use crate::snapshot::SnapshotDiff;

use super::{DocumentPieces, RenderOptions, number_lines, render_tree};

pub(super) fn assemble(
    outcome: &BudgetOutcome,
    diff: Option<&SnapshotDiff>,
    opts: &RenderOptions,
    hash_hex: &str,
) -> DocumentPieces {
    let mut prologue = String::new();
    write_metadata(&mut prologue, outcome, opts, hash_hex);
    write_summary(&mut prologue, outcome);
    write_tree(&mut prologue, outcome, opts);
    if let Some(diff) = diff {
        write_changes(&mut prologue, diff);
    }
    prologue.push_str("## Files\n");

    let sections = outcome
        .included
        .iter()
        .map(|record| file_section(record, opts))
        .collect();

    DocumentPieces {
        prologue,
        sections,
        epilogue: String::new(),
    }
}

fn write_metadata(out: &mut String, outcome: &BudgetOutcome, opts: &RenderOptions, hash: &str) {
    let total_files = outcome.included.len() + outcome.excluded.len();
    let _ = writeln!(out, "# Repository Context\n");
    let _ = writeln!(out, "- Profile: {}", opts.profile_name);
    let _ = writeln!(out, "- Tokenizer: {}", opts.tokenizer_name);
    let _ = writeln!(out, "- Content hash: {hash}");
    let _ = writeln!(
        out,
        "- Files: {} included of {total_files} discovered",
        outcome.included.len()
    );
    if outcome.max_tokens > 0 {
        let _ = writeln!(
            out,
            "- Tokens: {} used of {} budget ({} reserved for structure)",
            outcome.total_tokens, outcome.max_tokens, outcome.overhead
        );
    } else {
        let _ = writeln!(out, "- Tokens: {} (no budget)", outcome.total_tokens);
    }

    let categories = redaction_totals(&outcome.included);
    let total_redactions: u32 = categories.values().sum();
    let _ = writeln!(out, "- Redactions: {total_redactions}");
    for (category, count) in &categories {
        let _ = writeln!(out, "  - {category}: {count}");
    }
    out.push('\n');
}

fn write_summary(out: &mut String, outcome: &BudgetOutcome) {
    let _ = writeln!(out, "## Inclusion summary\n");
    let _ = writeln!(out, "| Tier | Included | Excluded | Tokens |");
    let _ = writeln!(out, "|-----:|---------:|---------:|-------:|");
    for (tier, stats) in &outcome.tier_stats {
        let _ = writeln!(
            out,
            "| {tier} | {} | {} | {} |",
            stats.files_included, stats.files_excluded, stats.tokens_used
        );
    }
    out.push('\n');

    if !outcome.excluded.is_empty() {
        let _ = writeln!(out, "Excluded files:\n");
        for record in &outcome.excluded {
            let _ = writeln!(
                out,
                "- {} (tier {}, {} tokens, over budget)",
                record.path, record.tier, record.token_count
            );
        }
        out.push('\n');
    }
}

fn write_tree(out: &mut String, outcome: &BudgetOutcome, opts: &RenderOptions) {
    let paths: Vec<String> = outcome.included.iter().map(|r| r.path.clone()).collect();
    let _ = writeln!(out, "## File tree\n");
    let _ = writeln!(out, "```");
    out.push_str(&render_tree(&paths, opts.tree_depth));
    let _ = writeln!(out, "```");
    out.push('\n');
}

fn write_changes(out: &mut String, diff: &SnapshotDiff) {
    let _ = writeln!(out, "## Changes\n");
    for path in &diff.added {
        let _ = writeln!(out, "- Added: {path}");
    }
    for path in &diff.modified {
        let _ = writeln!(out, "- Modified: {path}");
    }
    for path in &diff.deleted {
        let _ = writeln!(out, "- Deleted: {path}");
    }
    out.push('\n');
}

fn file_section(record: &FileRecord, opts: &RenderOptions) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "\n### {}\n", record.path);
    let _ = write!(
        out,
        "- Size: {} bytes | Tokens: {} | Tier: {}",
        record.size, record.token_count, record.tier
    );
    if record.is_compressed {
        let language = record.language.as_deref().unwrap_or("unknown");
        let _ = write!(out, " | View: signatures ({language})");
    }
    if record.redactions > 0 {
        let _ = write!(out, " | Redactions: {}", record.redactions);
    }
    out.push('\n');
    out.push('\n');

    let body = if opts.line_numbers {
        number_lines(&record.content)
    } else if record.content.ends_with('\n') || record.content.is_empty() {
        record.content.clone()
    } else {
        format!("{}\n", record.content)
    };

    let fence = fence_for(&record.content);
    let _ = writeln!(out, "{fence}");
    out.push_str(&body);
    let _ = writeln!(out, "{fence}");
    out
}

/// A backtick fence strictly longer than any backtick run in the content, so
/// embedded fences never terminate the block early.
fn fence_for(content: &str) -> String {
    let mut longest = 0usize;
    let mut run = 0usize;
    for c in content.chars() {
        if c == '`' {
            run += 1;
            longest = longest.max(run);
        } else {
            run = 0;
        }
    }
    "`".repeat((longest + 1).max(3))
}

fn redaction_totals(records: &[FileRecord]) -> IndexMap<String, u32> {
    let mut totals: IndexMap<String, u32> = IndexMap::new();
    for record in records {
        for (category, count) in &record.redaction_categories {
            *totals.entry(category.clone()).or_insert(0) += count;
        }
    }
    totals.sort_keys();
    totals
}

#[cfg(test)]
#[path = "markdown_tests.rs"]
mod tests;
