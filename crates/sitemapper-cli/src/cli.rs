//! Command-line argument definitions.

use clap::Parser;
use std::path::PathBuf;

/// Generate static sitemap XML files and robots.txt from a config file.
#[derive(Debug, Clone, Parser)]
#[command(name = "sitemapper", version, about)]
pub struct Cli {
    /// Path to the TOML config file
    #[arg(short, long, default_value = "sitemapper.toml")]
    pub config: PathBuf,

    /// Override the configured output directory
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Regenerate even when the staleness gate would skip
    #[arg(short, long)]
    pub force: bool,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,
}
