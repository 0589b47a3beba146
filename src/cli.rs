//! CLI module - Command-line interface definition and entry point

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use std::path::PathBuf;

use crate::core::model::{RunConfig, Summary};
use crate::walker;

/// crumb - insert a path comment into source files so they remember where
/// they came from.
#[derive(Parser, Debug)]
#[command(name = "crumb")]
#[command(
    author,
    version,
    about,
    long_about = r#"crumb recursively scans a directory tree and inserts a traceability
comment near the top of each matching source file:

    # crumb: <relative/path/to/file>

The tag survives later moves into flat or reorganized directory layouts,
so a file always carries a record of its original location.

The insertion point respects interpreter directives (#!), encoding
declarations, leading comments and module docstrings. Files whose leading
structure cannot be resolved safely are skipped and reported, never
guessed at.

Examples:
    crumb src --dry-run -v
    crumb --backup .bak
    crumb --ext js --ext ts web/
    crumb --replace --no-ignore .
"#
)]
pub struct Cli {
    /// Starting directory to scan (defaults to the current directory).
    #[arg(value_name = "PATH", default_value = ".")]
    pub path: PathBuf,

    /// Report what would be done without modifying any files.
    #[arg(long)]
    pub dry_run: bool,

    /// Log each file's outcome as it is processed.
    #[arg(short, long)]
    pub verbose: bool,

    /// Back up each file to <name><EXT> before modifying it.
    #[arg(
        long,
        value_name = "EXT",
        value_parser = parse_backup_ext,
        long_help = "Back up each file to <name><EXT> before modifying it (e.g. '.bak'\n\
or '.orig'). The extension must be non-empty. A failed backup skips that\n\
file and leaves it untouched."
    )]
    pub backup: Option<String>,

    /// Additional ignore-pattern file, combined with .gitignore.
    #[arg(long, value_name = "FILE", conflicts_with = "no_ignore")]
    pub ignore: Option<PathBuf>,

    /// Ignore .gitignore (and any other ignore file) completely.
    #[arg(long)]
    pub no_ignore: bool,

    /// File extension to process (repeatable; a leading dot is accepted).
    #[arg(long = "ext", value_name = "EXT", default_values_t = [String::from("py")])]
    pub extensions: Vec<String>,

    /// Record the absolute path in the tag instead of the relative one.
    #[arg(long)]
    pub absolute: bool,

    /// Refresh an existing tag in place instead of leaving the file alone.
    #[arg(long)]
    pub replace: bool,

    /// Emit the run summary as JSON on stdout.
    #[arg(long)]
    pub json: bool,

    /// Disable colored output.
    #[arg(long)]
    pub no_color: bool,
}

fn parse_backup_ext(value: &str) -> Result<String, String> {
    if value.is_empty() {
        Err("backup extension must be non-empty".to_string())
    } else {
        Ok(value.to_string())
    }
}

/// Run the CLI with parsed arguments
pub fn run(cli: Cli) -> Result<()> {
    if cli.no_color {
        colored::control::set_override(false);
    }

    // Startup errors are the only fatal ones; everything later is per-file.
    let root = cli.path.canonicalize().with_context(|| {
        format!("start path '{}' does not exist", cli.path.display())
    })?;

    let config = RunConfig {
        root,
        extensions: cli
            .extensions
            .iter()
            .map(|ext| ext.trim_start_matches('.').to_string())
            .collect(),
        dry_run: cli.dry_run,
        verbose: cli.verbose,
        backup_ext: cli.backup,
        absolute: cli.absolute,
        replace: cli.replace,
        ignore_file: cli.ignore,
        no_ignore: cli.no_ignore,
    };

    let summary = walker::run(&config)?;
    print_summary(&summary, cli.json, cli.dry_run)?;

    Ok(())
}

fn print_summary(summary: &Summary, json: bool, dry_run: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(summary)?);
        return Ok(());
    }

    println!();
    println!("{}", "=== Summary ===".bold());
    println!("Files considered: {}", summary.considered);
    println!("Tagged: {}", summary.tagged);
    if summary.replaced > 0 {
        println!("Replaced: {}", summary.replaced);
    }
    println!("Already tagged: {}", summary.already_tagged);
    if dry_run {
        println!("Would tag: {}", summary.would_tag);
    }
    println!("Ignored: {}", summary.ignored);
    println!("Skipped: {}", summary.skipped());
    if summary.skipped_encoding > 0 {
        println!("  not UTF-8: {}", summary.skipped_encoding);
    }
    if summary.skipped_no_insertion_point > 0 {
        println!("  no insertion point: {}", summary.skipped_no_insertion_point);
    }
    if summary.skipped_backup_failed > 0 {
        println!("  backup failed: {}", summary.skipped_backup_failed);
    }
    if summary.skipped_write_failed > 0 {
        println!("  write failed: {}", summary.skipped_write_failed);
    }
    if dry_run {
        println!("Dry run mode was ON (no files were modified).");
    }

    Ok(())
}
