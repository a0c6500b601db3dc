//! Layered profile resolution.
//!
//! Merge order, weakest to strongest: built-in defaults → user-global config
//! → repo-root `harvx.toml` → `--profile-file` → CLI flags → `HARVX_*`
//! environment overrides. `extends` chains resolve before the flag layers,
//! with a warning past depth 3 and a hard error on cycles.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::budget::TruncationStrategy;
use crate::error::{HarvxError, Result};
use crate::redact::Confidence;
use crate::render::{OutputFormat, TargetPreset};
use crate::tokenizer::Tokenizer;

use super::merge::merge_profiles;
use super::model::{
    CliOverrides, DEFAULT_PROFILE, ENV_PREFIX, MAX_EXTENDS_DEPTH, PROFILE_FILE_NAME, RawConfig,
    RawProfile, ResolvedProfile,
};
use super::validation;

/// A resolved profile plus non-fatal resolution warnings.
#[derive(Debug)]
pub struct LoadOutcome {
    pub profile: ResolvedProfile,
    pub warnings: Vec<String>,
}

/// Resolves the effective profile for a run.
pub fn resolve(
    repo_root: &Path,
    profile_name: Option<&str>,
    profile_file: Option<&Path>,
    overrides: &CliOverrides,
) -> Result<LoadOutcome> {
    let env_profile = env_var("PROFILE");
    let name = profile_name
        .map(str::to_string)
        .or(env_profile)
        .unwrap_or_else(|| DEFAULT_PROFILE.to_string());

    let mut warnings = Vec::new();
    let merged = merge_layers(repo_root, profile_file)?;

    let raw = flatten_extends(&merged, &name, &mut warnings)?;

    let mut format_explicit: Option<OutputFormat> = None;
    let mut output_explicit = false;
    let mut profile = ResolvedProfile::defaults(&name);
    if let Some(raw) = raw {
        apply_raw(&mut profile, &raw, &mut format_explicit, &mut output_explicit)?;
    } else if name != DEFAULT_PROFILE {
        return Err(HarvxError::Config(format!(
            "Profile '{name}' is not defined in any configuration layer"
        )));
    }

    apply_cli(&mut profile, overrides, &mut format_explicit, &mut output_explicit)?;
    apply_env(&mut profile, &mut format_explicit, &mut output_explicit)?;

    // A target preset only picks the format when no layer named one outright.
    profile.format = format_explicit.unwrap_or_else(|| profile.target.format());
    if !output_explicit {
        profile.output = PathBuf::from(format!("harvx-context.{}", profile.format.extension()));
    }

    // Priority files go to the front of tier 0 so they are admitted first.
    if !profile.priority_files.is_empty() {
        let mut patterns = profile.priority_files.clone();
        if let Some(def) = profile.tiers.iter_mut().find(|d| d.tier == 0) {
            patterns.extend(def.patterns.iter().cloned());
            def.patterns = patterns;
        } else {
            profile.tiers.insert(
                0,
                crate::relevance::TierDefinition { tier: 0, patterns },
            );
        }
    }

    warnings.extend(validation::validate(&profile)?);

    Ok(LoadOutcome { profile, warnings })
}

/// Folds the raw config layers into one profile map, field-wise per name.
fn merge_layers(
    repo_root: &Path,
    profile_file: Option<&Path>,
) -> Result<HashMap<String, RawProfile>> {
    let mut merged: HashMap<String, RawProfile> = HashMap::new();

    let mut layers: Vec<RawConfig> = Vec::new();
    if let Some(path) = user_config_path()
        && path.is_file()
    {
        layers.push(parse_file(&path)?);
    }
    let repo_config = repo_root.join(PROFILE_FILE_NAME);
    if repo_config.is_file() {
        layers.push(parse_file(&repo_config)?);
    }
    if let Some(path) = profile_file {
        // An explicitly named file must exist.
        if !path.is_file() {
            return Err(HarvxError::Config(format!(
                "Profile file not found: {}",
                path.display()
            )));
        }
        layers.push(parse_file(path)?);
    }

    for layer in layers {
        for (name, raw) in layer.profile {
            match merged.remove(&name) {
                Some(base) => {
                    merged.insert(name, merge_profiles(&base, &raw));
                }
                None => {
                    merged.insert(name, raw);
                }
            }
        }
    }
    Ok(merged)
}

fn parse_file(path: &Path) -> Result<RawConfig> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| HarvxError::io_with_context(e, path.to_path_buf(), "read profile file"))?;
    let config: RawConfig = toml::from_str(&content)?;
    Ok(config)
}

fn user_config_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", "harvx")
        .map(|dirs| dirs.config_dir().join(PROFILE_FILE_NAME))
}

/// Resolves the `extends` chain for `name` and flattens it base-first.
/// Returns `None` when the profile is not defined anywhere.
fn flatten_extends(
    merged: &HashMap<String, RawProfile>,
    name: &str,
    warnings: &mut Vec<String>,
) -> Result<Option<RawProfile>> {
    if !merged.contains_key(name) {
        return Ok(None);
    }

    let mut chain: Vec<&RawProfile> = Vec::new();
    let mut visited: Vec<&str> = Vec::new();
    let mut current = name;

    loop {
        if visited.contains(&current) {
            return Err(HarvxError::Config(format!(
                "Profile inheritance cycle: {} -> {current}",
                visited.join(" -> ")
            )));
        }
        visited.push(current);
        let Some(raw) = merged.get(current) else {
            // extends names a profile that only exists as built-in defaults.
            break;
        };
        chain.push(raw);
        match raw.extends.as_deref() {
            Some(parent) => current = parent,
            None => break,
        }
    }

    if chain.len() > MAX_EXTENDS_DEPTH {
        warnings.push(format!(
            "Profile '{name}' has an inheritance chain {} levels deep; consider flattening it",
            chain.len()
        ));
    }

    let mut flat = RawProfile::default();
    for raw in chain.iter().rev() {
        flat = merge_profiles(&flat, raw);
    }
    Ok(Some(flat))
}

fn apply_raw(
    profile: &mut ResolvedProfile,
    raw: &RawProfile,
    format_explicit: &mut Option<OutputFormat>,
    output_explicit: &mut bool,
) -> Result<()> {
    if let Some(output) = &raw.output {
        profile.output.clone_from(output);
        *output_explicit = true;
    }
    if let Some(format) = &raw.format {
        *format_explicit = Some(parse::<OutputFormat>(format)?);
    }
    if let Some(target) = &raw.target {
        profile.target = parse::<TargetPreset>(target)?;
    }
    if let Some(max_tokens) = raw.max_tokens {
        profile.max_tokens = max_tokens;
    }
    if let Some(tokenizer) = &raw.tokenizer {
        profile.tokenizer = parse::<Tokenizer>(tokenizer)?;
    }
    if let Some(compression) = raw.compression {
        profile.compression = compression;
    }
    if let Some(timeout) = raw.compression_timeout_secs {
        profile.compression_timeout_secs = timeout;
    }
    if let Some(priority_files) = &raw.priority_files {
        profile.priority_files.clone_from(priority_files);
    }
    if let Some(include) = &raw.include {
        profile.include.clone_from(include);
    }
    if let Some(ignore) = &raw.ignore {
        profile.ignore.clone_from(ignore);
    }
    if let Some(relevance) = &raw.relevance {
        // Profile tier sets replace the defaults entirely.
        profile.tiers = relevance.to_definitions();
    }
    if let Some(redaction) = &raw.redaction {
        if let Some(enabled) = redaction.enabled {
            profile.redaction.enabled = enabled;
        }
        if let Some(exclude_paths) = &redaction.exclude_paths {
            profile.redaction.exclude_paths.clone_from(exclude_paths);
        }
        if let Some(threshold) = &redaction.confidence_threshold {
            profile.redaction.confidence_threshold = parse::<Confidence>(threshold)?;
        }
        if let Some(extra) = &redaction.extra_patterns {
            profile.redaction.extra_patterns.clone_from(extra);
        }
    }
    if let Some(split_mb) = raw.split_mb {
        profile.split_bytes = Some(split_mb.saturating_mul(1024 * 1024));
    }
    if let Some(line_numbers) = raw.line_numbers {
        profile.line_numbers = line_numbers;
    }
    if let Some(kb) = raw.skip_files_larger_kb {
        profile.skip_files_larger_than = Some(kb.saturating_mul(1024));
    }
    if let Some(assert_include) = &raw.assert_include {
        profile.assert_include.clone_from(assert_include);
    }
    if let Some(truncation) = &raw.truncation {
        profile.truncation = parse::<TruncationStrategy>(truncation)?;
    }
    Ok(())
}

fn apply_cli(
    profile: &mut ResolvedProfile,
    overrides: &CliOverrides,
    format_explicit: &mut Option<OutputFormat>,
    output_explicit: &mut bool,
) -> Result<()> {
    if let Some(output) = &overrides.output {
        profile.output.clone_from(output);
        *output_explicit = true;
    }
    if let Some(format) = &overrides.format {
        *format_explicit = Some(parse::<OutputFormat>(format)?);
    }
    if let Some(target) = &overrides.target {
        profile.target = parse::<TargetPreset>(target)?;
    }
    if let Some(max_tokens) = overrides.max_tokens {
        profile.max_tokens = max_tokens;
    }
    if let Some(tokenizer) = &overrides.tokenizer {
        profile.tokenizer = parse::<Tokenizer>(tokenizer)?;
    }
    if let Some(compression) = overrides.compression {
        profile.compression = compression;
    }
    if let Some(redaction) = overrides.redaction {
        profile.redaction.enabled = redaction;
    }
    if overrides.fail_on_redaction {
        profile.fail_on_redaction = true;
    }
    if overrides.vcs_tracked_only {
        profile.vcs_tracked_only = true;
    }
    if !overrides.extensions.is_empty() {
        profile.extensions.clone_from(&overrides.extensions);
    }
    if !overrides.include.is_empty() {
        profile.include.clone_from(&overrides.include);
    }
    if !overrides.exclude.is_empty() {
        profile.excludes.clone_from(&overrides.exclude);
    }
    if let Some(split_mb) = overrides.split_mb {
        profile.split_bytes = Some(split_mb.saturating_mul(1024 * 1024));
    }
    if let Some(kb) = overrides.skip_files_larger_kb {
        profile.skip_files_larger_than = Some(kb.saturating_mul(1024));
    }
    if !overrides.assert_include.is_empty() {
        profile.assert_include.clone_from(&overrides.assert_include);
    }
    if overrides.line_numbers {
        profile.line_numbers = true;
    }
    if overrides.stdout {
        profile.stdout = true;
    }
    if let Some(sidecar) = overrides.sidecar {
        profile.sidecar = sidecar;
    }
    if let Some(truncation) = &overrides.truncation {
        profile.truncation = parse::<TruncationStrategy>(truncation)?;
    }
    Ok(())
}

/// Environment overrides are the strongest layer. All share the `HARVX_`
/// prefix.
fn apply_env(
    profile: &mut ResolvedProfile,
    format_explicit: &mut Option<OutputFormat>,
    output_explicit: &mut bool,
) -> Result<()> {
    if let Some(output) = env_var("OUTPUT") {
        profile.output = PathBuf::from(output);
        *output_explicit = true;
    }
    if let Some(format) = env_var("FORMAT") {
        *format_explicit = Some(parse::<OutputFormat>(&format)?);
    }
    if let Some(target) = env_var("TARGET") {
        profile.target = parse::<TargetPreset>(&target)?;
    }
    if let Some(max_tokens) = env_var("MAX_TOKENS") {
        profile.max_tokens = max_tokens.parse().map_err(|_| {
            HarvxError::Config(format!(
                "{ENV_PREFIX}MAX_TOKENS must be an unsigned integer, got '{max_tokens}'"
            ))
        })?;
    }
    if let Some(tokenizer) = env_var("TOKENIZER") {
        profile.tokenizer = parse::<Tokenizer>(&tokenizer)?;
    }
    if let Some(compression) = env_var("COMPRESSION") {
        profile.compression = parse_bool("COMPRESSION", &compression)?;
    }
    if let Some(redaction) = env_var("REDACTION") {
        profile.redaction.enabled = parse_bool("REDACTION", &redaction)?;
    }
    Ok(())
}

fn env_var(suffix: &str) -> Option<String> {
    std::env::var(format!("{ENV_PREFIX}{suffix}"))
        .ok()
        .filter(|v| !v.is_empty())
}

fn parse_bool(name: &str, value: &str) -> Result<bool> {
    match value.to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(HarvxError::Config(format!(
            "{ENV_PREFIX}{name} must be a boolean, got '{value}'"
        ))),
    }
}

fn parse<T: std::str::FromStr<Err = String>>(value: &str) -> Result<T> {
    value.parse().map_err(HarvxError::Config)
}

#[cfg(test)]
#[path = "loader_tests.rs"]
mod tests;
