use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::config::CliOverrides;
use crate::output::ColorMode;

/// Color output control
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum ColorChoice {
    /// Auto-detect terminal capability
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

impl From<ColorChoice> for ColorMode {
    fn from(choice: ColorChoice) -> Self {
        match choice {
            ColorChoice::Auto => Self::Auto,
            ColorChoice::Always => Self::Always,
            ColorChoice::Never => Self::Never,
        }
    }
}

/// Output format for explain command
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum ExplainFormat {
    /// Human-readable text output
    #[default]
    Text,
    /// JSON output
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "harvx")]
#[command(
    author,
    version,
    about = "Package a source tree into a single LLM-optimized context document",
    long_about = "Discover files, score their relevance into tiers, redact secrets, optionally \
    compress code to structural signatures, enforce a hard token budget, and render a \
    deterministic, content-addressed context document."
)]
pub struct Cli {
    /// Increase output verbosity (-v, -vv for more)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Control color output
    #[arg(long, value_enum, default_value = "auto", global = true)]
    pub color: ColorChoice,

    #[command(flatten)]
    pub generate: GenerateArgs,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate the context document (the default when no verb is given)
    Generate(GenerateArgs),

    /// Run the pipeline and print the inclusion summary without writing output
    Preview(GenerateArgs),

    /// Render only files changed since the last snapshot or between VCS refs
    Diff(DiffArgs),

    /// Generate a compressed, tight-budget brief of the repository
    Brief(GenerateArgs),

    /// Generate a document restricted to the given path globs
    Slice(SliceArgs),

    /// Render a review document for the changed set between VCS refs
    ReviewSlice(DiffArgs),

    /// Explain how a path is classified, ignored, and redacted
    Explain(ExplainArgs),

    /// Check the environment: state dir, tokenizer, grammars, profile lint
    Doctor(DoctorArgs),

    /// Inspect or reset per-profile snapshots
    Cache(CacheArgs),
}

/// Options shared by every document-producing verb.
#[derive(Parser, Debug, Default, Clone)]
#[allow(clippy::struct_excessive_bools)] // CLI flags are inherently boolean
pub struct CommonArgs {
    /// Output path for the rendered document
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Profile name to resolve
    #[arg(short, long)]
    pub profile: Option<String>,

    /// Explicit profile file, layered over the repo profile
    #[arg(long)]
    pub profile_file: Option<PathBuf>,

    /// File extensions to consider (comma-separated, e.g., rs,go,py)
    #[arg(long, value_delimiter = ',')]
    pub ext: Option<Vec<String>>,

    /// Include globs: only matching paths are considered
    #[arg(long, short = 'I')]
    pub include: Vec<String>,

    /// Exclude globs (can be specified multiple times)
    #[arg(long, short = 'x')]
    pub exclude: Vec<String>,

    /// Output format: markdown or xml
    #[arg(long)]
    pub format: Option<String>,

    /// Target preset: default or claude
    #[arg(long)]
    pub target: Option<String>,

    /// Hard token budget for the rendered document (0 disables)
    #[arg(long)]
    pub max_tokens: Option<u32>,

    /// Tokenizer: cl100k, o200k, or none
    #[arg(long)]
    pub tokenizer: Option<String>,

    /// Compress code files to signature views
    #[arg(long)]
    pub compress: bool,

    /// Disable compression even if the profile enables it
    #[arg(long, conflicts_with = "compress")]
    pub no_compress: bool,

    /// Disable secret redaction
    #[arg(long)]
    pub no_redact: bool,

    /// Exit fatally when any secret finding is detected
    #[arg(long)]
    pub fail_on_redaction: bool,

    /// Restrict discovery to VCS-tracked files
    #[arg(long)]
    pub vcs_tracked_only: bool,

    /// Split the document into parts of at most this many megabytes
    #[arg(long)]
    pub split_mb: Option<u64>,

    /// Skip files larger than this many kilobytes
    #[arg(long)]
    pub skip_files_larger_kb: Option<u64>,

    /// Fail unless these paths survive budget enforcement
    #[arg(long)]
    pub assert_include: Vec<String>,

    /// Render line numbers in file sections
    #[arg(long)]
    pub line_numbers: bool,

    /// Write the document to stdout; diagnostics stay on stderr
    #[arg(long)]
    pub stdout: bool,

    /// Write a JSON metadata sidecar next to the document
    #[arg(long)]
    pub sidecar: bool,

    /// Suppress the sidecar even if the profile enables it
    #[arg(long, conflicts_with = "sidecar")]
    pub no_sidecar: bool,

    /// Truncation strategy when the budget runs out: skip or truncate
    #[arg(long)]
    pub truncate: Option<String>,

    /// Do not update the profile snapshot after the run
    #[arg(long)]
    pub no_snapshot: bool,
}

impl CommonArgs {
    /// Flattens the flags into the config resolver's override layer.
    #[must_use]
    pub fn to_overrides(&self) -> CliOverrides {
        CliOverrides {
            output: self.output.clone(),
            format: self.format.clone(),
            target: self.target.clone(),
            max_tokens: self.max_tokens,
            tokenizer: self.tokenizer.clone(),
            compression: if self.compress {
                Some(true)
            } else if self.no_compress {
                Some(false)
            } else {
                None
            },
            redaction: if self.no_redact { Some(false) } else { None },
            fail_on_redaction: self.fail_on_redaction,
            vcs_tracked_only: self.vcs_tracked_only,
            extensions: self.ext.clone().unwrap_or_default(),
            include: self.include.clone(),
            exclude: self.exclude.clone(),
            split_mb: self.split_mb,
            skip_files_larger_kb: self.skip_files_larger_kb,
            assert_include: self.assert_include.clone(),
            line_numbers: self.line_numbers,
            stdout: self.stdout,
            sidecar: if self.sidecar {
                Some(true)
            } else if self.no_sidecar {
                Some(false)
            } else {
                None
            },
            truncation: self.truncate.clone(),
        }
    }
}

#[derive(Parser, Debug, Default)]
pub struct GenerateArgs {
    /// Directory to package; defaults to the current directory
    #[arg()]
    pub dir: Option<PathBuf>,

    #[command(flatten)]
    pub common: CommonArgs,
}

#[derive(Parser, Debug)]
pub struct DiffArgs {
    /// Directory to package; defaults to the current directory
    #[arg()]
    pub dir: Option<PathBuf>,

    /// Changed set from this ref to HEAD
    #[arg(long)]
    pub since: Option<String>,

    /// Base ref of an explicit range (requires --head)
    #[arg(long, requires = "head")]
    pub base: Option<String>,

    /// Head ref of an explicit range (requires --base)
    #[arg(long, requires = "base")]
    pub head: Option<String>,

    #[command(flatten)]
    pub common: CommonArgs,
}

#[derive(Parser, Debug)]
pub struct SliceArgs {
    /// Path globs selecting the slice
    #[arg(required = true)]
    pub patterns: Vec<String>,

    /// Directory to package; defaults to the current directory
    #[arg(long)]
    pub dir: Option<PathBuf>,

    #[command(flatten)]
    pub common: CommonArgs,
}

#[derive(Parser, Debug)]
pub struct ExplainArgs {
    /// Repo-relative path to explain
    #[arg()]
    pub path: String,

    /// Directory of the repository; defaults to the current directory
    #[arg(long)]
    pub dir: Option<PathBuf>,

    /// Profile name to resolve
    #[arg(short, long)]
    pub profile: Option<String>,

    /// Explicit profile file, layered over the repo profile
    #[arg(long)]
    pub profile_file: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value = "text")]
    pub format: ExplainFormat,
}

#[derive(Parser, Debug, Default)]
pub struct DoctorArgs {
    /// Directory of the repository; defaults to the current directory
    #[arg(long)]
    pub dir: Option<PathBuf>,

    /// Profile name to lint
    #[arg(short, long)]
    pub profile: Option<String>,

    /// Explicit profile file, layered over the repo profile
    #[arg(long)]
    pub profile_file: Option<PathBuf>,
}

#[derive(Parser, Debug)]
pub struct CacheArgs {
    #[command(subcommand)]
    pub action: CacheAction,
}

#[derive(Subcommand, Debug)]
pub enum CacheAction {
    /// Print the stored snapshot for a profile
    Show {
        /// Directory of the repository; defaults to the current directory
        #[arg(long)]
        dir: Option<PathBuf>,

        /// Profile name
        #[arg(short, long)]
        profile: Option<String>,
    },
    /// Remove stored snapshots (one profile, or all)
    Clear {
        /// Directory of the repository; defaults to the current directory
        #[arg(long)]
        dir: Option<PathBuf>,

        /// Profile name; omit to clear every profile
        #[arg(short, long)]
        profile: Option<String>,
    },
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
