//! XML document shape, used by the `claude` target preset.

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
    let _ = writeln!(prologue, "<context>");
    write_metadata(&mut prologue, outcome, opts, hash_hex);
    write_summary(&mut prologue, outcome);
    write_tree(&mut prologue, outcome, opts);
    if let Some(diff) = diff {
        write_changes(&mut prologue, diff);
    }
    let _ = writeln!(prologue, "  <documents>");

    let sections = outcome
        .included
        .iter()
        .map(|record| file_section(record, opts))
        .collect();

    DocumentPieces {
        prologue,
        sections,
        epilogue: "  </documents>\n</context>\n".to_string(),
    }
}

fn write_metadata(out: &mut String, outcome: &BudgetOutcome, opts: &RenderOptions, hash: &str) {
    let _ = writeln!(out, "  <metadata>");
    let _ = writeln!(
        out,
        "    <profile>{}</profile>",
        escape(&opts.profile_name)
    );
    let _ = writeln!(
        out,
        "    <tokenizer>{}</tokenizer>",
        escape(&opts.tokenizer_name)
    );
    let _ = writeln!(out, "    <content_hash>{hash}</content_hash>");
    let _ = writeln!(
        out,
        "    <files included=\"{}\" excluded=\"{}\"/>",
        outcome.included.len(),
        outcome.excluded.len()
    );
    let _ = writeln!(
        out,
        "    <tokens used=\"{}\" budget=\"{}\" overhead=\"{}\"/>",
        outcome.total_tokens, outcome.max_tokens, outcome.overhead
    );

    let categories = redaction_totals(&outcome.included);
    let total_redactions: u32 = categories.values().sum();
    let _ = writeln!(out, "    <redactions total=\"{total_redactions}\">");
    for (category, count) in &categories {
        let _ = writeln!(
            out,
            "      <category name=\"{}\" count=\"{count}\"/>",
            escape(category)
        );
    }
    let _ = writeln!(out, "    </redactions>");
    let _ = writeln!(out, "  </metadata>");
}

fn write_summary(out: &mut String, outcome: &BudgetOutcome) {
    let _ = writeln!(out, "  <summary>");
    for (tier, stats) in &outcome.tier_stats {
        let _ = writeln!(
            out,
            "    <tier id=\"{tier}\" included=\"{}\" excluded=\"{}\" tokens=\"{}\"/>",
            stats.files_included, stats.files_excluded, stats.tokens_used
        );
    }
    for record in &outcome.excluded {
        let _ = writeln!(
            out,
            "    <excluded path=\"{}\" tier=\"{}\" tokens=\"{}\"/>",
            escape(&record.path),
            record.tier,
            record.token_count
        );
    }
    let _ = writeln!(out, "  </summary>");
}

fn write_tree(out: &mut String, outcome: &BudgetOutcome, opts: &RenderOptions) {
    let paths: Vec<String> = outcome.included.iter().map(|r| r.path.clone()).collect();
    let _ = writeln!(out, "  <tree>");
    out.push_str(&escape(&render_tree(&paths, opts.tree_depth)));
    let _ = writeln!(out, "  </tree>");
}

fn write_changes(out: &mut String, diff: &SnapshotDiff) {
    let _ = writeln!(out, "  <changes>");
    for path in &diff.added {
        let _ = writeln!(out, "    <added>{}</added>", escape(path));
    }
    for path in &diff.modified {
        let _ = writeln!(out, "    <modified>{}</modified>", escape(path));
    }
    for path in &diff.deleted {
        let _ = writeln!(out, "    <deleted>{}</deleted>", escape(path));
    }
    let _ = writeln!(out, "  </changes>");
}

fn file_section(record: &FileRecord, opts: &RenderOptions) -> String {
    let mut out = String::new();
    let _ = write!(
        out,
        "    <document path=\"{}\" size=\"{}\" tokens=\"{}\" tier=\"{}\" compressed=\"{}\"",
        escape(&record.path),
        record.size,
        record.token_count,
        record.tier,
        record.is_compressed
    );
    if let Some(language) = &record.language {
        let _ = write!(out, " language=\"{}\"", escape(language));
    }
    if record.redactions > 0 {
        let _ = write!(out, " redactions=\"{}\"", record.redactions);
    }
    let _ = writeln!(out, ">");

    let body = if opts.line_numbers {
        number_lines(&record.content)
    } else {
        record.content.clone()
    };
    out.push_str(&cdata(&body));
    if !out.ends_with('\n') {
        out.push('\n');
    }
    let _ = writeln!(out, "    </document>");
    out
}

/// Wraps content in CDATA, splitting any embedded `]]>` terminator.
fn cdata(content: &str) -> String {
    format!("<![CDATA[{}]]>", content.replace("]]>", "]]]]><![CDATA[>"))
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
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
#[path = "xml_tests.rs"]
mod tests;
