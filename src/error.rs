use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum HarvxError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to access file: {path}")]
    FileAccess {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid glob pattern: {pattern}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: globset::Error,
    },

    #[error("Invalid redaction pattern: {pattern}")]
    InvalidRedactionPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("{}", format_io_error(source, path, operation))]
    Io {
        #[source]
        source: std::io::Error,
        path: Option<PathBuf>,
        operation: Option<&'static str>,
    },

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("JSON serialization error: {0}")]
    JsonSerialize(#[from] serde_json::Error),

    #[error("VCS error: {0}")]
    Vcs(String),

    #[error("Snapshot was taken on branch '{snapshot_branch}' but HEAD is on '{current_branch}'")]
    SnapshotDrift {
        snapshot_branch: String,
        current_branch: String,
    },

    #[error("Could not acquire exclusive lock on state file: {path}")]
    StateLock { path: PathBuf },

    #[error("{count} secret finding(s) detected and --fail-on-redaction is set")]
    RedactionFailure { count: usize },

    #[error("Asserted path '{path}' was not included in the output")]
    AssertInclude { path: String },
}

/// Formats IO error with optional context for display.
/// Uses references to Options as required by thiserror's `#[error(...)]` macro expansion.
#[allow(clippy::ref_option, clippy::ref_option_ref)]
fn format_io_error(
    source: &std::io::Error,
    path: &Option<PathBuf>,
    operation: &Option<&'static str>,
) -> String {
    match (path.as_ref(), *operation) {
        (Some(p), Some(op)) => format!("IO error ({op} '{}'): {source}", p.display()),
        (Some(p), None) => format!("IO error ('{}'): {source}", p.display()),
        (None, Some(op)) => format!("IO error ({op}): {source}"),
        (None, None) => format!("IO error: {source}"),
    }
}

impl From<std::io::Error> for HarvxError {
    fn from(e: std::io::Error) -> Self {
        Self::Io {
            source: e,
            path: None,
            operation: None,
        }
    }
}

impl HarvxError {
    /// Creates an IO error with path context.
    #[must_use]
    pub const fn io_with_path(source: std::io::Error, path: PathBuf) -> Self {
        Self::Io {
            source,
            path: Some(path),
            operation: None,
        }
    }

    /// Creates an IO error with path and operation context.
    #[must_use]
    pub const fn io_with_context(
        source: std::io::Error,
        path: PathBuf,
        operation: &'static str,
    ) -> Self {
        Self::Io {
            source,
            path: Some(path),
            operation: Some(operation),
        }
    }

    /// Returns the error type as a short string identifier.
    #[must_use]
    pub const fn error_type(&self) -> &'static str {
        match self {
            Self::Config(_) => "Config",
            Self::FileAccess { .. } => "FileAccess",
            Self::InvalidPattern { .. } => "InvalidPattern",
            Self::InvalidRedactionPattern { .. } => "RedactionPattern",
            Self::Io { .. } => "IO",
            Self::TomlParse(_) => "TOML",
            Self::JsonSerialize(_) => "JSON",
            Self::Vcs(_) => "VCS",
            Self::SnapshotDrift { .. } => "SnapshotDrift",
            Self::StateLock { .. } => "StateLock",
            Self::RedactionFailure { .. } => "Redaction",
            Self::AssertInclude { .. } => "AssertInclude",
        }
    }

    /// Returns the error message without the type prefix.
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Self::FileAccess { path, source } => {
                format!("{} ({})", path.display(), source.kind())
            }
            Self::InvalidPattern { pattern, source } => format!("{pattern}: {source}"),
            Self::InvalidRedactionPattern { pattern, source } => format!("{pattern}: {source}"),
            Self::Io {
                source,
                path,
                operation,
            } => match (path, operation) {
                (Some(p), Some(op)) => format!("{op} '{}': {source}", p.display()),
                (Some(p), None) => format!("'{}': {source}", p.display()),
                (None, Some(op)) => format!("{op}: {source}"),
                (None, None) => source.to_string(),
            },
            Self::TomlParse(e) => e.to_string(),
            Self::JsonSerialize(e) => e.to_string(),
            Self::Config(msg) | Self::Vcs(msg) => msg.clone(),
            Self::SnapshotDrift {
                snapshot_branch,
                current_branch,
            } => format!("snapshot branch '{snapshot_branch}' != current '{current_branch}'"),
            Self::StateLock { path } => path.display().to_string(),
            Self::RedactionFailure { count } => format!("{count} finding(s)"),
            Self::AssertInclude { path } => path.clone(),
        }
    }

    /// Returns optional detail information (source error details).
    #[must_use]
    pub fn detail(&self) -> Option<String> {
        match self {
            Self::FileAccess { source, .. } => Some(format!("{source} ({})", source.kind())),
            Self::InvalidPattern { source, .. } => Some(source.to_string()),
            Self::InvalidRedactionPattern { source, .. } => Some(source.to_string()),
            Self::Io {
                source,
                path,
                operation,
            } => {
                let kind = source.kind();
                match (path, operation) {
                    (Some(p), Some(op)) => {
                        Some(format!("{op} '{}': {source} ({kind})", p.display()))
                    }
                    (Some(p), None) => Some(format!("'{}': {source} ({kind})", p.display())),
                    (None, Some(op)) => Some(format!("{op}: {source} ({kind})")),
                    (None, None) => Some(format!("{source} ({kind})")),
                }
            }
            _ => None,
        }
    }

    /// Returns an actionable suggestion for resolving the error.
    #[must_use]
    pub fn suggestion(&self) -> Option<&'static str> {
        match self {
            Self::Config(_) => Some("Check the profile file format and value ranges in harvx.toml"),
            Self::FileAccess { source, .. } | Self::Io { source, .. } => {
                Self::io_suggestion(source.kind())
            }
            Self::InvalidPattern { .. } => Some(
                "Check glob pattern syntax: use '*' for wildcards, '**' for recursive matching",
            ),
            Self::InvalidRedactionPattern { .. } => {
                Some("Check the regex syntax of redaction.extra_patterns in the profile")
            }
            Self::TomlParse(_) => {
                Some("Check TOML syntax: ensure proper quoting and bracket matching")
            }
            Self::JsonSerialize(_) => {
                Some("Check for non-serializable data types or malformed structures")
            }
            Self::Vcs(_) => Some("Ensure the directory is a git repository and refs are valid"),
            Self::SnapshotDrift { .. } => {
                Some("Run 'harvx cache clear' to discard the stale snapshot, then re-generate")
            }
            Self::StateLock { .. } => {
                Some("Another harvx run may be writing state; retry once it finishes")
            }
            Self::RedactionFailure { .. } => {
                Some("Run 'harvx explain <path>' on flagged files, or drop --fail-on-redaction")
            }
            Self::AssertInclude { .. } => {
                Some("Raise --max-tokens or lower the tier of competing files")
            }
        }
    }

    /// Returns a suggestion based on IO error kind.
    const fn io_suggestion(kind: std::io::ErrorKind) -> Option<&'static str> {
        match kind {
            std::io::ErrorKind::NotFound => Some("Verify the file path exists"),
            std::io::ErrorKind::PermissionDenied => {
                Some("Check file permissions or run with appropriate access rights")
            }
            std::io::ErrorKind::InvalidData => {
                Some("The file may be corrupted or in an unexpected format")
            }
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, HarvxError>;

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
