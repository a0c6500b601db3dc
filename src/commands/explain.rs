//! The `explain` diagnostic: how a path is classified, ignored, and redacted.

use std::path::{Path, PathBuf};

use crate::cli::{Cli, CommonArgs, ExplainArgs, ExplainFormat};
use crate::relevance::TierClassifier;
use crate::scanner::{IgnoreMatcher, build_globset};
use crate::{EXIT_SUCCESS, path_utils};

use super::generate::resolve_profile;
use super::report_fatal;

#[must_use]
pub fn run_explain(args: &ExplainArgs, cli: &Cli) -> i32 {
    match run_impl(args, cli) {
        Ok(code) => code,
        Err(e) => report_fatal(&e),
    }
}

fn run_impl(args: &ExplainArgs, cli: &Cli) -> crate::Result<i32> {
    let root = args
        .dir
        .as_deref()
        .map_or_else(|| PathBuf::from("."), Path::to_path_buf);

    let common = CommonArgs {
        profile: args.profile.clone(),
        profile_file: args.profile_file.clone(),
        ..CommonArgs::default()
    };
    let profile = resolve_profile(&root, &common, cli.quiet)?;

    let path = path_utils::normalize(&args.path);
    let classifier = TierClassifier::new(&profile.tiers)?;
    let explanation = classifier.explain(&path);

    let matcher = IgnoreMatcher::build(&root, &profile.ignore, &profile.excludes, &[])?;
    let ignored = matcher.ignored(&path, false);

    let redaction_excluded = !profile.redaction.enabled
        || build_globset(&profile.redaction.exclude_paths)?.is_match(&path);

    match args.format {
        ExplainFormat::Text => {
            println!("{path}");
            match &explanation.matched_pattern {
                Some(pattern) => println!(
                    "  tier: {} (matched '{pattern}')",
                    explanation.assigned_tier
                ),
                None => println!(
                    "  tier: {} (default, no pattern matched)",
                    explanation.assigned_tier
                ),
            }
            for m in &explanation.all_matches {
                println!("  candidate: tier {} '{}'", m.tier, m.pattern);
            }
            println!("  ignored: {}", if ignored { "yes" } else { "no" });
            println!(
                "  redaction: {}",
                if redaction_excluded {
                    "bypassed"
                } else {
                    "active"
                }
            );
            println!(
                "  redaction threshold: {}",
                profile.redaction.confidence_threshold.as_str()
            );
        }
        ExplainFormat::Json => {
            let object = serde_json::json!({
                "path": path,
                "assigned_tier": explanation.assigned_tier,
                "matched_pattern": explanation.matched_pattern,
                "all_matches": explanation
                    .all_matches
                    .iter()
                    .map(|m| serde_json::json!({ "tier": m.tier, "pattern": m.pattern }))
                    .collect::<Vec<_>>(),
                "ignored": ignored,
                "redaction_active": !redaction_excluded,
                "redaction_threshold": profile.redaction.confidence_threshold.as_str(),
            });
            println!("{}", serde_json::to_string_pretty(&object)?);
        }
    }
    Ok(EXIT_SUCCESS)
}

#[cfg(test)]
#[path = "explain_tests.rs"]
mod tests;
