//! Shannon entropy signal for secret candidates.
//!
//! The signal alone never produces a finding; it promotes borderline pattern
//! matches or gates the high-entropy assignment rule. Thresholds are
//! charset-aware: random hex tops out near 4 bits/char, base64 near 6, so a
//! single cutoff would either miss hex keys or flag prose.

/// Minimum candidate length before the signal applies.
pub const MIN_CANDIDATE_LEN: usize = 16;

/// Entropy is computed over at most this many leading bytes, keeping the
/// per-decision cost constant.
const MAX_SAMPLE_LEN: usize = 256;

const HEX_THRESHOLD: f64 = 3.0;
const BASE64_THRESHOLD: f64 = 4.5;
const ALNUM_THRESHOLD: f64 = 4.0;

/// Character classes a candidate may be drawn from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Charset {
    Hex,
    Base64,
    Alnum,
    Other,
}

/// Shannon entropy in bits per byte over the first 256 bytes.
#[must_use]
pub fn shannon_entropy(candidate: &str) -> f64 {
    let bytes = &candidate.as_bytes()[..candidate.len().min(MAX_SAMPLE_LEN)];
    if bytes.is_empty() {
        return 0.0;
    }
    let mut counts = [0u32; 256];
    for &b in bytes {
        counts[usize::from(b)] += 1;
    }
    #[allow(clippy::cast_precision_loss)]
    let total = bytes.len() as f64;
    let mut entropy = 0.0;
    for &count in &counts {
        if count > 0 {
            let p = f64::from(count) / total;
            entropy -= p * p.log2();
        }
    }
    entropy
}

/// Whether `candidate` looks like random secret material: long enough and
/// above the entropy threshold for its character set.
#[must_use]
pub fn is_high_entropy(candidate: &str) -> bool {
    if candidate.len() < MIN_CANDIDATE_LEN {
        return false;
    }
    let threshold = match classify_charset(candidate) {
        Charset::Hex => HEX_THRESHOLD,
        Charset::Base64 => BASE64_THRESHOLD,
        Charset::Alnum | Charset::Other => ALNUM_THRESHOLD,
    };
    shannon_entropy(candidate) >= threshold
}

fn classify_charset(candidate: &str) -> Charset {
    let bytes = &candidate.as_bytes()[..candidate.len().min(MAX_SAMPLE_LEN)];
    if bytes.iter().all(u8::is_ascii_hexdigit) {
        return Charset::Hex;
    }
    if bytes
        .iter()
        .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'+' | b'/' | b'='))
    {
        // Alphanumeric-only strings are a narrower alphabet than base64.
        if bytes.iter().all(u8::is_ascii_alphanumeric) {
            return Charset::Alnum;
        }
        return Charset::Base64;
    }
    Charset::Other
}

#[cfg(test)]
#[path = "entropy_tests.rs"]
mod tests;
