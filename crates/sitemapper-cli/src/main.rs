//! sitemapper CLI - static sitemap and robots.txt generation.
//!
//! Reads a declarative `sitemapper.toml`, resolves every configured URL
//! source, and writes the sitemap files, index, and robots.txt into the
//! output directory.

use anyhow::Result;
use clap::Parser;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

mod cli;
mod config;

use cli::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    initialize_logging(&cli)?;

    let file = config::load(&cli.config)?;
    let mut engine_config = config::compile(file);

    if let Some(output) = cli.output {
        engine_config.output_dir = output;
    }
    if cli.force {
        engine_config.stale_time = None;
    }

    let result = sitemapper_core::ensure_sitemaps(engine_config).await?;

    if result.skipped {
        println!("sitemaps are fresh, nothing to do");
        return Ok(());
    }

    for sitemap in &result.sitemaps {
        println!("  {} ({} URLs)", sitemap.path, sitemap.url_count);
    }
    if let Some(index) = &result.sitemap_index_path {
        println!("  {index}");
    }
    if let Some(robots) = &result.robots_path {
        println!("  {robots}");
    }
    println!("wrote {} sitemap file(s)", result.sitemaps.len());

    Ok(())
}

fn initialize_logging(cli: &Cli) -> Result<()> {
    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_thread_names(false)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}
