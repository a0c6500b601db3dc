use std::path::PathBuf;

use indexmap::IndexMap;

/// The sole inter-stage record. Each stage populates its own fields and never
/// mutates fields written upstream; truncation produces a new record.
#[derive(Debug, Clone, Default)]
pub struct FileRecord {
    /// Repo-relative path with forward slashes.
    pub path: String,
    /// Absolute path on disk.
    pub abs_path: PathBuf,
    /// Size in bytes at discovery time.
    pub size: u64,
    /// Relevance tier, 0 (highest) through 5.
    pub tier: u8,
    /// Processed text: loaded, redacted, optionally compressed.
    pub content: String,
    /// Whether `content` is a signatures-only view.
    pub is_compressed: bool,
    /// Language identifier when the compressor recognized the file.
    pub language: Option<String>,
    /// Total redactions applied to this file.
    pub redactions: u32,
    /// Redactions per category, in first-seen order.
    pub redaction_categories: IndexMap<String, u32>,
    /// Token count of the exact `content` that will be rendered.
    pub token_count: u32,
    /// 64-bit non-cryptographic hash of the final `content`.
    pub content_hash: u64,
}

impl FileRecord {
    /// A record as produced by discovery: location and size only.
    #[must_use]
    pub fn discovered(path: String, abs_path: PathBuf, size: u64) -> Self {
        Self {
            path,
            abs_path,
            size,
            ..Self::default()
        }
    }

    /// Whether any secret was redacted from this file.
    #[must_use]
    pub const fn has_redactions(&self) -> bool {
        self.redactions > 0
    }
}
