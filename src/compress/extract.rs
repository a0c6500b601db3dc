//! Verbatim signature extraction.
//!
//! Every emitted slice is a contiguous byte range of the original source,
//! taken at syntax-tree node boundaries. Nothing is paraphrased and no
//! characters are introduced inside a slice.

use std::ops::Range;
use std::time::Duration;

use tree_sitter::{Node, Parser};

use super::registry::LanguageSpec;

/// Parses `source` and extracts its declaration slices, joined by newlines.
///
/// Returns `None` when the grammar fails to load, the parse hits the
/// deadline, or no declarations are found; the caller falls back to the
/// original content.
#[must_use]
pub fn extract_signatures(
    source: &str,
    spec: &LanguageSpec,
    deadline: Duration,
) -> Option<String> {
    let mut parser = Parser::new();
    parser.set_language(&(spec.language)()).ok()?;
    #[allow(deprecated)]
    parser.set_timeout_micros(u64::try_from(deadline.as_micros()).unwrap_or(u64::MAX));

    let tree = parser.parse(source, None)?;

    let mut slices: Vec<Range<usize>> = Vec::new();
    collect(tree.root_node(), source, spec, &mut slices);
    if slices.is_empty() {
        return None;
    }

    let parts: Vec<&str> = slices
        .iter()
        .filter_map(|r| source.get(r.clone()))
        .map(str::trim_end)
        .filter(|s| !s.is_empty())
        .collect();
    if parts.is_empty() {
        return None;
    }
    Some(parts.join("\n"))
}

fn collect(node: Node<'_>, source: &str, spec: &LanguageSpec, out: &mut Vec<Range<usize>>) {
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        let kind = child.kind();

        // An export wrapping a declaration is transparent so the inner
        // signature is elided like any other; bare re-exports emit in full.
        if kind == "export_statement" && wraps_declaration(child, spec) {
            collect(child, source, spec, out);
            continue;
        }

        if spec.full_kinds.contains(&kind) {
            out.push(child.byte_range());
        } else if spec.signature_kinds.contains(&kind) {
            out.push(header_range(child));
        } else if spec.container_kinds.contains(&kind) {
            out.push(header_range(child));
            if let Some(body) = child.child_by_field_name("body") {
                collect(body, source, spec, out);
            }
        } else if spec.comment_kinds.contains(&kind) {
            if let Some(text) = source.get(child.byte_range())
                && spec.doc_prefixes.iter().any(|p| text.starts_with(p))
            {
                out.push(child.byte_range());
            }
        } else {
            collect(child, source, spec, out);
        }
    }
}

/// The header slice of a declaration: node start up to its `body` field, or
/// the whole node when it has no body (e.g. `mod name;`).
fn header_range(node: Node<'_>) -> Range<usize> {
    let range = node.byte_range();
    node.child_by_field_name("body")
        .map_or(range.clone(), |body| range.start..body.start_byte())
}

fn wraps_declaration(node: Node<'_>, spec: &LanguageSpec) -> bool {
    let mut cursor = node.walk();
    node.children(&mut cursor).any(|c| {
        spec.signature_kinds.contains(&c.kind()) || spec.container_kinds.contains(&c.kind())
    })
}

#[cfg(test)]
#[path = "extract_tests.rs"]
mod tests;
