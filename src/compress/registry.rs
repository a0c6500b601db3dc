//! Embedded grammar registry.
//!
//! An ordered list of language specs, discovered by file extension. Each spec
//! names the tree-sitter grammar and the node kinds the extractor emits.
//! Unknown languages fall through to unchanged content.

use std::path::Path;

use tree_sitter::Language;

/// Node-kind tables describing what a language's compressed view keeps.
pub struct LanguageSpec {
    /// Stable language identifier, recorded on the `FileRecord`.
    pub id: &'static str,
    pub extensions: &'static [&'static str],
    pub language: fn() -> Language,
    /// Declarations emitted as a header slice, cut at the `body` field;
    /// children are not visited (function bodies are elided).
    pub signature_kinds: &'static [&'static str],
    /// Container declarations emitted as a header slice whose bodies are
    /// still walked, so class and impl members surface as nested signatures.
    pub container_kinds: &'static [&'static str],
    /// Declarations emitted verbatim in full.
    pub full_kinds: &'static [&'static str],
    /// Comment node kinds considered for doc-comment emission.
    pub comment_kinds: &'static [&'static str],
    /// Comment prefixes that mark a doc comment.
    pub doc_prefixes: &'static [&'static str],
}

fn rust_language() -> Language {
    tree_sitter_rust::LANGUAGE.into()
}

fn go_language() -> Language {
    tree_sitter_go::LANGUAGE.into()
}

fn python_language() -> Language {
    tree_sitter_python::LANGUAGE.into()
}

fn javascript_language() -> Language {
    tree_sitter_javascript::LANGUAGE.into()
}

fn typescript_language() -> Language {
    tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into()
}

fn tsx_language() -> Language {
    tree_sitter_typescript::LANGUAGE_TSX.into()
}

/// The registry, in resolution order.
pub static LANGUAGES: &[LanguageSpec] = &[
    LanguageSpec {
        id: "rust",
        extensions: &["rs"],
        language: rust_language,
        signature_kinds: &["function_item", "function_signature_item"],
        container_kinds: &["impl_item", "trait_item", "mod_item"],
        full_kinds: &[
            "struct_item",
            "enum_item",
            "union_item",
            "type_item",
            "use_declaration",
            "const_item",
            "static_item",
            "macro_definition",
        ],
        comment_kinds: &["line_comment", "block_comment"],
        doc_prefixes: &["///", "//!", "/**"],
    },
    LanguageSpec {
        id: "go",
        extensions: &["go"],
        language: go_language,
        signature_kinds: &["function_declaration", "method_declaration"],
        container_kinds: &[],
        full_kinds: &[
            "type_declaration",
            "import_declaration",
            "const_declaration",
            "package_clause",
        ],
        comment_kinds: &["comment"],
        doc_prefixes: &["//"],
    },
    LanguageSpec {
        id: "python",
        extensions: &["py", "pyi"],
        language: python_language,
        signature_kinds: &["function_definition"],
        container_kinds: &["class_definition"],
        full_kinds: &["import_statement", "import_from_statement"],
        comment_kinds: &["comment"],
        doc_prefixes: &["#"],
    },
    LanguageSpec {
        id: "javascript",
        extensions: &["js", "jsx", "mjs", "cjs"],
        language: javascript_language,
        signature_kinds: &[
            "function_declaration",
            "generator_function_declaration",
            "method_definition",
        ],
        container_kinds: &["class_declaration"],
        full_kinds: &["import_statement", "export_statement"],
        comment_kinds: &["comment"],
        doc_prefixes: &["/**"],
    },
    LanguageSpec {
        id: "typescript",
        extensions: &["ts", "mts", "cts"],
        language: typescript_language,
        signature_kinds: &[
            "function_declaration",
            "generator_function_declaration",
            "method_definition",
        ],
        container_kinds: &["class_declaration"],
        full_kinds: &[
            "import_statement",
            "interface_declaration",
            "type_alias_declaration",
            "enum_declaration",
        ],
        comment_kinds: &["comment"],
        doc_prefixes: &["/**"],
    },
    LanguageSpec {
        id: "tsx",
        extensions: &["tsx"],
        language: tsx_language,
        signature_kinds: &[
            "function_declaration",
            "generator_function_declaration",
            "method_definition",
        ],
        container_kinds: &["class_declaration"],
        full_kinds: &[
            "import_statement",
            "interface_declaration",
            "type_alias_declaration",
            "enum_declaration",
        ],
        comment_kinds: &["comment"],
        doc_prefixes: &["/**"],
    },
];

/// Resolves the spec for a path by extension.
#[must_use]
pub fn spec_for_path(path: &str) -> Option<&'static LanguageSpec> {
    let ext = Path::new(path).extension()?.to_str()?;
    LANGUAGES
        .iter()
        .find(|spec| spec.extensions.iter().any(|e| e.eq_ignore_ascii_case(ext)))
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
