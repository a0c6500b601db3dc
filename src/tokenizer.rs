//! Pluggable token counting.
//!
//! Three variants: exact BPE counts under the `cl100k` and `o200k` encodings
//! (tables load once per process) and a fast `none` estimator at one token per
//! four bytes. The variant name is embedded in output metadata so downstream
//! tooling can recompute counts.

use std::str::FromStr;
use std::sync::OnceLock;

use tiktoken_rs::CoreBPE;

static CL100K: OnceLock<CoreBPE> = OnceLock::new();
static O200K: OnceLock<CoreBPE> = OnceLock::new();

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tokenizer {
    /// Exact counts under the `cl100k_base` encoding.
    #[default]
    Cl100k,
    /// Exact counts under the `o200k_base` encoding.
    O200k,
    /// Byte-length estimator: `floor(len / 4)`.
    Bytes,
}

impl Tokenizer {
    /// Counts tokens in `text` under this encoding.
    ///
    /// The empty string short-circuits to 0 before any encoder setup, so the
    /// hot loop never pays initialization cost for empty content.
    #[must_use]
    pub fn count(&self, text: &str) -> u32 {
        if text.is_empty() {
            return 0;
        }
        let n = match self {
            Self::Cl100k => cl100k().encode_with_special_tokens(text).len(),
            Self::O200k => o200k().encode_with_special_tokens(text).len(),
            Self::Bytes => text.len() / 4,
        };
        u32::try_from(n).unwrap_or(u32::MAX)
    }

    /// The stable name embedded in output metadata.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Cl100k => "cl100k",
            Self::O200k => "o200k",
            Self::Bytes => "none",
        }
    }

    /// Forces encoder initialization, reporting failure instead of panicking.
    /// Used by `doctor` so a broken encoding table surfaces as a diagnostic.
    pub fn ensure_ready(&self) -> crate::Result<()> {
        match self {
            Self::Cl100k | Self::O200k => {
                // Counting one byte touches the lazily-loaded table.
                let _ = self.count("x");
                Ok(())
            }
            Self::Bytes => Ok(()),
        }
    }
}

impl FromStr for Tokenizer {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "cl100k" | "cl100k_base" => Ok(Self::Cl100k),
            "o200k" | "o200k_base" => Ok(Self::O200k),
            "none" | "estimate" => Ok(Self::Bytes),
            _ => Err(format!(
                "Unknown tokenizer '{s}' (expected cl100k, o200k, or none)"
            )),
        }
    }
}

fn cl100k() -> &'static CoreBPE {
    // The table is embedded in the binary; construction cannot fail at runtime.
    CL100K.get_or_init(|| tiktoken_rs::cl100k_base().expect("embedded cl100k encoding table"))
}

fn o200k() -> &'static CoreBPE {
    O200K.get_or_init(|| tiktoken_rs::o200k_base().expect("embedded o200k encoding table"))
}

#[cfg(test)]
#[path = "tokenizer_tests.rs"]
mod tests;
