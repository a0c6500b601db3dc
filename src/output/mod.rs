//! Diagnostic output.
//!
//! All diagnostics go to stderr; stdout is reserved for the rendered document
//! when `--stdout` is in effect. `HARVX_LOG_JSON=1` switches every diagnostic
//! line to a single JSON object for machine consumption.

mod diag;
mod progress;

pub use diag::{
    DiagnosticOutput, print_error, print_error_full, print_warning, print_warning_full,
};
pub use progress::PipelineProgress;

/// Environment variable selecting JSON-structured diagnostics.
pub const LOG_JSON_ENV: &str = "HARVX_LOG_JSON";

/// Color output control.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ColorMode {
    /// Auto-detect terminal capability
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

pub(crate) mod ansi {
    pub const RESET: &str = "\x1b[0m";
    pub const BOLD: &str = "\x1b[1m";
    pub const DIM: &str = "\x1b[2m";
    pub const RED: &str = "\x1b[31m";
    pub const YELLOW: &str = "\x1b[33m";
    pub const CYAN: &str = "\x1b[36m";
}
