use std::io::IsTerminal;

use indicatif::{ProgressBar, ProgressStyle};

/// Progress over the parallel per-file stage.
///
/// Renders on stderr so it never interleaves with a `--stdout` document, and
/// collapses to a no-op bar in quiet mode or when stderr is not a terminal.
/// `ProgressBar` keeps its own atomic position, so workers call `inc`
/// concurrently without extra bookkeeping.
pub struct PipelineProgress {
    bar: ProgressBar,
}

impl PipelineProgress {
    /// A bar over `total` files.
    ///
    /// # Panics
    /// Panics if the style template is invalid, which cannot happen for the
    /// constant template below.
    #[must_use]
    pub fn new(total: u64, quiet: bool) -> Self {
        let bar = if quiet || !std::io::stderr().is_terminal() {
            ProgressBar::hidden()
        } else {
            let bar = ProgressBar::new(total);
            bar.set_style(
                ProgressStyle::with_template(
                    "{spinner:.green} packing {pos}/{len} {wide_bar:.cyan/blue} {percent}%",
                )
                .expect("constant progress template"),
            );
            bar
        };
        Self { bar }
    }

    /// Advances the bar by one file.
    pub fn inc(&self) {
        self.bar.inc(1);
    }

    /// Clears the bar from the terminal.
    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }
}
