//! Signature-level compression.
//!
//! Compression is an optimization, never a correctness requirement: a missing
//! grammar, a parse failure, a deadline hit, or a panic inside the extraction
//! walk all fall back to the original content with a diagnostic.

mod extract;
mod registry;

pub use extract::extract_signatures;
pub use registry::{LANGUAGES, LanguageSpec, spec_for_path};

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::time::Duration;

/// First line of every compressed file, identifying signatures-only mode.
pub const COMPRESSION_MARKER: &str = "// [signatures] declaration view, bodies elided";

/// Default per-file extraction deadline.
pub const DEFAULT_TIMEOUT_SECS: u64 = 5;

/// Result of a compression attempt.
#[derive(Debug)]
pub struct CompressionOutcome {
    pub content: String,
    pub compressed: bool,
    pub language: Option<String>,
    /// Set when extraction was attempted but fell back.
    pub diagnostic: Option<String>,
}

impl CompressionOutcome {
    fn unchanged(content: &str, language: Option<String>, diagnostic: Option<String>) -> Self {
        Self {
            content: content.to_string(),
            compressed: false,
            language,
            diagnostic,
        }
    }
}

/// Per-worker compressor; grammar instances are single-threaded, so each
/// rayon worker constructs its own.
pub struct Compressor {
    timeout: Duration,
}

impl Compressor {
    #[must_use]
    pub const fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    #[must_use]
    pub const fn with_default_timeout() -> Self {
        Self::new(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    /// Compresses `content` to its signature view, or returns it unchanged.
    #[must_use]
    pub fn compress(&self, path: &str, content: &str) -> CompressionOutcome {
        let Some(spec) = spec_for_path(path) else {
            return CompressionOutcome::unchanged(content, None, None);
        };
        let language = Some(spec.id.to_string());

        let extraction = catch_unwind(AssertUnwindSafe(|| {
            extract_signatures(content, spec, self.timeout)
        }));

        match extraction {
            Ok(Some(signatures)) => CompressionOutcome {
                content: format!("{COMPRESSION_MARKER}\n\n{signatures}"),
                compressed: true,
                language,
                diagnostic: None,
            },
            Ok(None) => CompressionOutcome::unchanged(
                content,
                language,
                Some(format!(
                    "Compression fell back for {path}: parse failed or produced no declarations"
                )),
            ),
            Err(_) => CompressionOutcome::unchanged(
                content,
                language,
                Some(format!("Compression fell back for {path}: extractor panicked")),
            ),
        }
    }
}

impl Default for Compressor {
    fn default() -> Self {
        Self::with_default_timeout()
    }
}

#[cfg(test)]
#[path = "compress_tests.rs"]
mod tests;
