//! Directory traversal and per-run orchestration
//!
//! Walks the tree with walkdir, consults the ignore rules, and hands each
//! surviving candidate to the tagger, folding outcomes into the summary.

use anyhow::{bail, Result};
use colored::Colorize;
use walkdir::WalkDir;

use crate::core::model::{RunConfig, Summary, TagOutcome};
use crate::core::paths::{has_extension, make_relative, normalize_path};
use crate::filter::IgnoreRules;
use crate::tagger;

/// Run a full scan-and-tag pass, returning the summary.
///
/// The start path must exist and be a directory; everything after that is
/// per-file and never aborts the traversal.
pub fn run(config: &RunConfig) -> Result<Summary> {
    if !config.root.is_dir() {
        bail!(
            "start path '{}' does not exist or is not a directory",
            config.root.display()
        );
    }

    let rules = if config.no_ignore {
        IgnoreRules::none()
    } else {
        IgnoreRules::build(&config.root, config.ignore_file.as_deref())
    };

    let mut summary = Summary::default();

    for entry in WalkDir::new(&config.root)
        .into_iter()
        .filter_map(|entry| entry.ok())
    {
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        if !has_extension(path, &config.extensions) {
            continue;
        }
        let Some(relative) = make_relative(path, &config.root) else {
            continue;
        };

        if rules.is_ignored(&relative) {
            summary.record_ignored();
            if config.verbose {
                eprintln!("{} {}", "ignored".dimmed(), relative);
            }
            continue;
        }

        let display_path = if config.absolute {
            normalize_path(path)
        } else {
            relative.clone()
        };

        let outcome = tagger::tag_file(path, &display_path, config);
        if config.verbose {
            log_outcome(&relative, outcome);
        }
        summary.record(outcome);
    }

    Ok(summary)
}

fn log_outcome(relative: &str, outcome: TagOutcome) {
    match outcome {
        TagOutcome::Tagged | TagOutcome::Replaced => {
            eprintln!("{} {}", outcome.label().green(), relative)
        }
        TagOutcome::AlreadyTagged => eprintln!("{} {}", outcome.label().dimmed(), relative),
        TagOutcome::DryRunWouldTag => eprintln!("{} {}", outcome.label().yellow(), relative),
        TagOutcome::Skipped(reason) => {
            eprintln!("{} {} ({})", outcome.label().red(), relative, reason)
        }
    }
}
