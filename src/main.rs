//! crumb - tag source files with their original location
//!
//! crumb provides:
//! - Recursive scanning for source files by extension
//! - Safe insertion of a '# crumb: <path>' comment (shebang, encoding
//!   declaration and docstring aware)
//! - Ignore filtering with .gitignore semantics
//! - Dry-run, backup and tag-refresh modes

use anyhow::Result;
use clap::Parser;

mod cli;
mod core;
mod filter;
mod finder;
mod tagger;
mod walker;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    cli::run(cli)
}
