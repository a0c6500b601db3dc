mod cache_cmd;
mod diff_cmd;
mod doctor;
mod explain;
mod generate;

pub use cache_cmd::run_cache;
pub use diff_cmd::run_diff;
pub use doctor::run_doctor;
pub use explain::run_explain;
pub use generate::{run_brief, run_generate, run_preview, run_slice};

use crate::HarvxError;

/// Prints a fatal error in the standard what/why/how shape and maps it to the
/// fatal exit code.
pub(crate) fn report_fatal(e: &HarvxError) -> i32 {
    crate::output::print_error_full(
        e.error_type(),
        &e.message(),
        e.detail().as_deref(),
        e.suggestion(),
    );
    crate::EXIT_FATAL
}
