//! Diagnostic rendering.
//!
//! Every diagnostic names what happened, why, and how to proceed:
//!
//! ```text
//! error (Config): max_tokens must be a number
//!   cause: found "plenty"
//!   hint: set HARVX_MAX_TOKENS to an unsigned integer
//! ```
//!
//! Text goes to stderr, colored when it is a terminal. Setting
//! `HARVX_LOG_JSON` swaps the whole thing for one JSON object per
//! diagnostic, for log collectors.

use std::io::{IsTerminal, Write};

use super::ColorMode;
use super::ansi;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Level {
    Warning,
    Error,
}

impl Level {
    const fn label(self) -> &'static str {
        match self {
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }

    const fn color(self) -> &'static str {
        match self {
            Self::Warning => ansi::YELLOW,
            Self::Error => ansi::RED,
        }
    }
}

/// Sink for warnings and errors. Color and JSON mode are decided once, at
/// construction.
pub struct DiagnosticOutput {
    color: bool,
    json: bool,
}

impl DiagnosticOutput {
    #[must_use]
    pub fn new(mode: ColorMode) -> Self {
        let color = match mode {
            ColorMode::Always => true,
            ColorMode::Never => false,
            ColorMode::Auto => auto_color(),
        };
        Self {
            color,
            json: json_requested(),
        }
    }

    /// A sink tuned for stderr: color if it is a terminal.
    #[must_use]
    pub fn stderr() -> Self {
        Self::new(ColorMode::Auto)
    }

    /// Emits an error. `kind` is the short error-type identifier, `detail`
    /// the concrete cause, `suggestion` a way forward.
    pub fn print_error(
        &self,
        kind: &str,
        message: &str,
        detail: Option<&str>,
        suggestion: Option<&str>,
    ) {
        self.report(Level::Error, Some(kind), message, detail, suggestion);
    }

    /// Emits a warning. Warnings carry no kind; the run continues.
    pub fn print_warning(&self, message: &str, detail: Option<&str>, suggestion: Option<&str>) {
        self.report(Level::Warning, None, message, detail, suggestion);
    }

    fn report(
        &self,
        level: Level,
        kind: Option<&str>,
        message: &str,
        detail: Option<&str>,
        suggestion: Option<&str>,
    ) {
        let mut stderr = std::io::stderr().lock();
        self.render(&mut stderr, level, kind, message, detail, suggestion);
    }

    fn render<W: Write>(
        &self,
        w: &mut W,
        level: Level,
        kind: Option<&str>,
        message: &str,
        detail: Option<&str>,
        suggestion: Option<&str>,
    ) {
        // A diagnostic that cannot reach its sink has nowhere else to go, so
        // write results are discarded throughout.
        if self.json {
            let line = serde_json::json!({
                "level": level.label(),
                "kind": kind,
                "message": message,
                "detail": detail,
                "suggestion": suggestion,
            });
            let _ = writeln!(w, "{line}");
            return;
        }

        let label = self.styled(level.color(), true, level.label());
        match kind {
            Some(kind) => {
                let _ = writeln!(w, "{label} ({kind}): {message}");
            }
            None => {
                let _ = writeln!(w, "{label}: {message}");
            }
        }
        if let Some(cause) = detail {
            let _ = writeln!(w, "  {}: {cause}", self.styled(ansi::DIM, false, "cause"));
        }
        if let Some(hint) = suggestion {
            let _ = writeln!(w, "  {}: {hint}", self.styled(ansi::CYAN, false, "hint"));
        }
    }

    fn styled(&self, code: &str, bold: bool, text: &str) -> String {
        if !self.color {
            return text.to_string();
        }
        let weight = if bold { ansi::BOLD } else { "" };
        format!("{weight}{code}{text}{}", ansi::RESET)
    }

    #[cfg(test)]
    const fn bare(color: bool) -> Self {
        Self { color, json: false }
    }

    #[cfg(test)]
    const fn json_only() -> Self {
        Self {
            color: false,
            json: true,
        }
    }
}

impl Default for DiagnosticOutput {
    fn default() -> Self {
        Self::stderr()
    }
}

fn auto_color() -> bool {
    // NO_COLOR (https://no-color.org/) wins over terminal detection.
    std::env::var_os("NO_COLOR").is_none() && std::io::stderr().is_terminal()
}

fn json_requested() -> bool {
    std::env::var(super::LOG_JSON_ENV).is_ok_and(|v| !v.is_empty() && v != "0")
}

/// Convenience function: prints an error using auto-detected color mode.
pub fn print_error(kind: &str, message: &str) {
    DiagnosticOutput::stderr().print_error(kind, message, None, None);
}

/// Convenience function: prints an error with cause and hint.
pub fn print_error_full(
    kind: &str,
    message: &str,
    detail: Option<&str>,
    suggestion: Option<&str>,
) {
    DiagnosticOutput::stderr().print_error(kind, message, detail, suggestion);
}

/// Convenience function: prints a warning using auto-detected color mode.
pub fn print_warning(message: &str) {
    DiagnosticOutput::stderr().print_warning(message, None, None);
}

/// Convenience function: prints a warning with cause and hint.
pub fn print_warning_full(message: &str, detail: Option<&str>, suggestion: Option<&str>) {
    DiagnosticOutput::stderr().print_warning(message, detail, suggestion);
}

#[cfg(test)]
#[path = "diag_tests.rs"]
mod tests;
