//! Scoped ignore decisions.
//!
//! Rule sources, weakest to strongest: built-in defaults, profile-declared
//! ignores, `.harvxignore` files (deeper scopes override shallower ones), and
//! the CLI `--exclude`/`--include` overlay. Within one source, conventional
//! gitignore semantics apply: last matching rule wins, `!` whitelists a prior
//! match, a trailing `/` restricts the rule to directories.

use std::fs;
use std::path::{Path, PathBuf};

use ignore::Match;
use ignore::gitignore::{Gitignore, GitignoreBuilder};

use crate::error::{HarvxError, Result};
use crate::path_utils;

/// Name of the tool-specific ignore file, honored at any depth.
pub const IGNORE_FILE_NAME: &str = ".harvxignore";

/// Always-merged default ignore rules.
pub const DEFAULT_IGNORES: &[&str] = &[
    // VCS metadata
    ".git/",
    ".hg/",
    ".svn/",
    ".jj/",
    // Dependency and vendor stores
    "node_modules/",
    "bower_components/",
    "vendor/",
    ".yarn/",
    ".pnpm-store/",
    // Build outputs
    "target/",
    "build/",
    "dist/",
    "out/",
    ".next/",
    ".nuxt/",
    // Python environments and caches
    ".venv/",
    "venv/",
    "__pycache__/",
    ".pytest_cache/",
    ".mypy_cache/",
    ".ruff_cache/",
    // Coverage artifacts
    "coverage/",
    ".nyc_output/",
    "htmlcov/",
    // Lockfiles
    "package-lock.json",
    "yarn.lock",
    "pnpm-lock.yaml",
    "Cargo.lock",
    "poetry.lock",
    "Gemfile.lock",
    "composer.lock",
    // Secrets-adjacent files are never harvested
    ".env",
    ".env.*",
    "!.env.example",
    "*.pem",
    "*.key",
    "*.p12",
    "*.pfx",
    // Binary artifacts by extension
    "*.exe",
    "*.dll",
    "*.so",
    "*.dylib",
    "*.a",
    "*.o",
    "*.class",
    "*.jar",
    "*.pyc",
    "*.wasm",
    "*.png",
    "*.jpg",
    "*.jpeg",
    "*.gif",
    "*.ico",
    "*.pdf",
    "*.zip",
    "*.tar",
    "*.gz",
    "*.bz2",
    "*.7z",
    "*.woff",
    "*.woff2",
    "*.ttf",
    "*.eot",
    "*.mp3",
    "*.mp4",
    // Editor and OS noise
    ".DS_Store",
    "Thumbs.db",
    ".idea/",
    ".vscode/",
    // Our own state directory and ignore files
    ".harvx/",
    ".harvxignore",
];

/// One `.harvxignore` scope: rules apply only under `prefix`.
struct IgnoreScope {
    /// Repo-relative directory of the ignore file, `""` for the root.
    prefix: String,
    matcher: Gitignore,
}

/// Aggregated ignore decision over every rule source.
pub struct IgnoreMatcher {
    defaults: Gitignore,
    profile: Option<Gitignore>,
    scopes: Vec<IgnoreScope>,
    cli: Option<Gitignore>,
}

impl IgnoreMatcher {
    /// Builds the matcher for `root`, collecting every nested
    /// `.harvxignore` file in a cheap pre-pass that prunes default-ignored
    /// directories.
    pub fn build(
        root: &Path,
        profile_ignores: &[String],
        cli_excludes: &[String],
        cli_includes: &[String],
    ) -> Result<Self> {
        let defaults = compile_lines(root, DEFAULT_IGNORES.iter().copied())?;

        let profile = if profile_ignores.is_empty() {
            None
        } else {
            Some(compile_lines(
                root,
                profile_ignores.iter().map(String::as_str),
            )?)
        };

        let cli = if cli_excludes.is_empty() && cli_includes.is_empty() {
            None
        } else {
            let mut lines: Vec<String> = cli_excludes.to_vec();
            lines.extend(cli_includes.iter().map(|p| format!("!{p}")));
            Some(compile_lines(root, lines.iter().map(String::as_str))?)
        };

        let mut scopes = Vec::new();
        for file in collect_scope_files(root, &defaults) {
            let scope_dir = file.parent().unwrap_or(root);
            let prefix = path_utils::relative_to(root, scope_dir).unwrap_or_default();
            let mut builder = GitignoreBuilder::new(scope_dir);
            if let Some(e) = builder.add(&file) {
                return Err(HarvxError::Config(format!(
                    "Invalid rule in {}: {e}",
                    file.display()
                )));
            }
            let matcher = builder
                .build()
                .map_err(|e| HarvxError::Config(format!("{}: {e}", file.display())))?;
            scopes.push(IgnoreScope { prefix, matcher });
        }
        // Shallow scopes first so reverse iteration asks the deepest scope
        // before its ancestors.
        scopes.sort_by_key(|s| s.prefix.matches('/').count() + usize::from(!s.prefix.is_empty()));

        Ok(Self {
            defaults,
            profile,
            scopes,
            cli,
        })
    }

    /// Convenience constructor with only the built-in defaults.
    pub fn with_defaults(root: &Path) -> Result<Self> {
        Self::build(root, &[], &[], &[])
    }

    /// Decides whether the repo-relative `path` is ignored.
    ///
    /// Leading `./` and backslashes are normalized before matching.
    #[must_use]
    pub fn ignored(&self, path: &str, is_dir: bool) -> bool {
        let path = path_utils::normalize(path);
        if path.is_empty() {
            return false;
        }

        if let Some(cli) = &self.cli
            && let Some(decision) = decide(cli, &path, is_dir)
        {
            return decision;
        }

        for scope in self.scopes.iter().rev() {
            let Some(sub) = scoped_path(&scope.prefix, &path) else {
                continue;
            };
            if let Some(decision) = decide(&scope.matcher, sub, is_dir) {
                return decision;
            }
        }

        if let Some(profile) = &self.profile
            && let Some(decision) = decide(profile, &path, is_dir)
        {
            return decision;
        }

        decide(&self.defaults, &path, is_dir).unwrap_or(false)
    }
}

/// Strips `prefix` from `path`, returning the scope-relative remainder.
/// Returns `None` when the path is outside the scope.
fn scoped_path<'a>(prefix: &str, path: &'a str) -> Option<&'a str> {
    if prefix.is_empty() {
        return Some(path);
    }
    path.strip_prefix(prefix)?.strip_prefix('/')
}

fn decide(matcher: &Gitignore, path: &str, is_dir: bool) -> Option<bool> {
    match matcher.matched_path_or_any_parents(Path::new(path), is_dir) {
        Match::Ignore(_) => Some(true),
        Match::Whitelist(_) => Some(false),
        Match::None => None,
    }
}

fn compile_lines<'a, I: Iterator<Item = &'a str>>(root: &Path, lines: I) -> Result<Gitignore> {
    let mut builder = GitignoreBuilder::new(root);
    for line in lines {
        builder
            .add_line(None, line)
            .map_err(|e| HarvxError::Config(format!("Invalid ignore rule '{line}': {e}")))?;
    }
    builder
        .build()
        .map_err(|e| HarvxError::Config(format!("Failed to compile ignore rules: {e}")))
}

/// Finds every `.harvxignore` under `root`, pruning default-ignored
/// directories so the pre-pass never descends into `node_modules` and kin.
fn collect_scope_files(root: &Path, defaults: &Gitignore) -> Vec<PathBuf> {
    let mut found = Vec::new();
    let mut stack = vec![root.to_path_buf()];
    while let Some(dir) = stack.pop() {
        let Ok(entries) = fs::read_dir(&dir) else {
            continue;
        };
        for entry in entries.flatten() {
            let path = entry.path();
            let Ok(file_type) = entry.file_type() else {
                continue;
            };
            let Some(rel) = path_utils::relative_to(root, &path) else {
                continue;
            };
            if file_type.is_dir() {
                if !matches!(
                    defaults.matched_path_or_any_parents(Path::new(&rel), true),
                    Match::Ignore(_)
                ) {
                    stack.push(path);
                }
            } else if file_type.is_file() && entry.file_name() == IGNORE_FILE_NAME {
                found.push(path);
            }
        }
    }
    found.sort();
    found
}

#[cfg(test)]
#[path = "ignore_rules_tests.rs"]
mod tests;
