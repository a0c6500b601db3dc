//! Deterministic document assembly.
//!
//! The renderer iterates records in budget-inclusion order and embeds a
//! content hash in place of a wall-clock stamp, so identical inputs produce
//! byte-identical documents across runs and machines (and stay LLM
//! prompt-cacheable).

mod markdown;
mod sidecar;
mod tree;
mod xml;

pub use sidecar::{Sidecar, SidecarFile, build_sidecar};
pub use tree::render_tree;

use std::str::FromStr;

use xxhash_rust::xxh3::Xxh3;

use crate::budget::BudgetOutcome;
use crate::pipeline::FileRecord;
use crate::snapshot::SnapshotDiff;

/// Output document shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Markdown,
    Xml,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "markdown" | "md" => Ok(Self::Markdown),
            "xml" => Ok(Self::Xml),
            _ => Err(format!("Unknown output format: {s}")),
        }
    }
}

impl OutputFormat {
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Markdown => "md",
            Self::Xml => "xml",
        }
    }
}

/// Target presets select a format tuned for a model family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TargetPreset {
    #[default]
    Default,
    /// XML document shape.
    Claude,
}

impl FromStr for TargetPreset {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "default" => Ok(Self::Default),
            "claude" => Ok(Self::Claude),
            _ => Err(format!("Unknown target preset: {s}")),
        }
    }
}

impl TargetPreset {
    #[must_use]
    pub const fn format(self) -> OutputFormat {
        match self {
            Self::Default => OutputFormat::Markdown,
            Self::Claude => OutputFormat::Xml,
        }
    }
}

/// Options the renderer consumes.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    pub format: OutputFormat,
    pub profile_name: String,
    pub tokenizer_name: String,
    pub line_numbers: bool,
    /// Depth limit for the file tree visualization.
    pub tree_depth: Option<usize>,
    /// Split bound in bytes; parts break at record boundaries only.
    pub split_bytes: Option<u64>,
}

/// A rendered artifact: one or more parts plus the stream content hash.
#[derive(Debug)]
pub struct RenderedDocument {
    pub parts: Vec<String>,
    pub content_hash: u64,
}

impl RenderedDocument {
    /// Hash as it appears in document headers.
    #[must_use]
    pub fn hash_hex(&self) -> String {
        format!("{:016x}", self.content_hash)
    }
}

/// Document pieces before splitting: every part repeats the prologue and
/// epilogue; sections never straddle a part boundary.
struct DocumentPieces {
    prologue: String,
    sections: Vec<String>,
    epilogue: String,
}

/// Non-cryptographic 64-bit hash over `(path, content)` pairs in rendered
/// order.
#[must_use]
pub fn content_hash(records: &[FileRecord]) -> u64 {
    let mut hasher = Xxh3::new();
    for record in records {
        hasher.update(record.path.as_bytes());
        hasher.update(b"\0");
        hasher.update(record.content.as_bytes());
        hasher.update(b"\0");
    }
    hasher.digest()
}

/// Renders the budget outcome into a deterministic document.
#[must_use]
pub fn render(
    outcome: &BudgetOutcome,
    diff: Option<&SnapshotDiff>,
    opts: &RenderOptions,
) -> RenderedDocument {
    let hash = content_hash(&outcome.included);
    let hash_hex = format!("{hash:016x}");

    let pieces = match opts.format {
        OutputFormat::Markdown => markdown::assemble(outcome, diff, opts, &hash_hex),
        OutputFormat::Xml => xml::assemble(outcome, diff, opts, &hash_hex),
    };

    RenderedDocument {
        parts: split_parts(pieces, opts.split_bytes),
        content_hash: hash,
    }
}

/// Packs sections into parts under the split bound. A single section is never
/// split, even when it alone exceeds the bound.
fn split_parts(pieces: DocumentPieces, split_bytes: Option<u64>) -> Vec<String> {
    let DocumentPieces {
        prologue,
        sections,
        epilogue,
    } = pieces;

    let Some(limit) = split_bytes else {
        let mut doc = prologue;
        for section in &sections {
            doc.push_str(section);
        }
        doc.push_str(&epilogue);
        return vec![doc];
    };
    let limit = usize::try_from(limit).unwrap_or(usize::MAX);

    let envelope = prologue.len() + epilogue.len();
    let mut parts = Vec::new();
    let mut current: Vec<&String> = Vec::new();
    let mut current_len = envelope;

    for section in &sections {
        if !current.is_empty() && current_len + section.len() > limit {
            parts.push(flush_part(&prologue, &current, &epilogue));
            current.clear();
            current_len = envelope;
        }
        current.push(section);
        current_len += section.len();
    }
    if !current.is_empty() || parts.is_empty() {
        parts.push(flush_part(&prologue, &current, &epilogue));
    }
    parts
}

fn flush_part(prologue: &str, sections: &[&String], epilogue: &str) -> String {
    let mut part = String::from(prologue);
    for section in sections {
        part.push_str(section);
    }
    part.push_str(epilogue);
    part
}

/// Applies line-number rendering: `%4d | line`.
fn number_lines(content: &str) -> String {
    let mut out = String::with_capacity(content.len() + content.len() / 8);
    for (i, line) in content.lines().enumerate() {
        out.push_str(&format!("{:>4} | {line}\n", i + 1));
    }
    out
}

#[cfg(test)]
#[path = "render_tests.rs"]
mod tests;
