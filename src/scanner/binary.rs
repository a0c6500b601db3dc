use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Bytes inspected when sniffing for binary content.
const SNIFF_LEN: usize = 8192;

/// Classifies a file as binary by inspecting its first 8 KiB for a NUL byte.
///
/// Read failures classify as non-binary; access errors surface later when the
/// loader opens the file for real.
#[must_use]
pub fn is_binary_file(path: &Path) -> bool {
    let Ok(mut file) = File::open(path) else {
        return false;
    };
    let mut buffer = [0u8; SNIFF_LEN];
    let Ok(bytes_read) = file.read(&mut buffer) else {
        return false;
    };
    buffer[..bytes_read].contains(&0)
}

/// Same sniff over an in-memory buffer, for callers that already hold bytes.
#[must_use]
pub fn is_binary_content(bytes: &[u8]) -> bool {
    bytes[..bytes.len().min(SNIFF_LEN)].contains(&0)
}

#[cfg(test)]
#[path = "binary_tests.rs"]
mod tests;
