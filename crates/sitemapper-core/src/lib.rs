//! # sitemapper-core
//!
//! Static sitemap XML and robots.txt generation from pluggable URL sources.
//!
//! The engine resolves a set of named URL groups (fixed lists, local JSON
//! files, GraphQL queries (single-shot or paginated), custom async
//! producers, or composites of any of those), chunks each group into
//! protocol-sized files, and writes the files, a sitemap index, and a
//! robots.txt into an output directory. A staleness gate skips the whole
//! run while the index file is fresh enough.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use sitemapper_core::{EnsureSitemapsConfig, SitemapGroupDefinition, SitemapSource};
//!
//! # async fn run() -> sitemapper_core::Result<()> {
//! let mut config = EnsureSitemapsConfig::new("https://example.com", "dist");
//! config.groups = vec![SitemapGroupDefinition::new(
//!     "pages",
//!     SitemapSource::static_urls(["https://example.com/", "https://example.com/about"]),
//! )];
//!
//! let result = sitemapper_core::ensure_sitemaps(config).await?;
//! println!("wrote {} sitemap file(s)", result.sitemaps.len());
//! # Ok(())
//! # }
//! ```
//!
//! ## Failure model
//!
//! Generation is best-effort: recoverable source problems (missing file,
//! unreachable endpoint, absent fetcher) resolve to empty lists, and a
//! group whose source genuinely fails is recorded in a synthetic
//! `__errors.xml` sitemap while its siblings still generate. See
//! [`generator`] for the details.

/// High-level `ensure_sitemaps` entry point and its config types
pub mod ensure;
/// Error types and result aliases
pub mod error;
/// GraphQL and JSON HTTP fetchers with a `None`-on-failure contract
pub mod fetcher;
/// Generation orchestrator: staleness gate, chunking, file layout
pub mod generator;
/// URL joining and slug helpers
pub mod helpers;
/// The `UrlProvider` trait and common provider implementations
pub mod provider;
/// robots.txt rendering
pub mod robots;
/// Declarative URL sources and their resolver
pub mod source;
/// Core data types and structures
pub mod types;
/// XML codec for urlset and sitemapindex documents
pub mod xml;

// Re-export commonly used types
pub use ensure::{EnsureSitemapsConfig, SitemapGroupDefinition, ensure_sitemaps};
pub use error::{Error, Result};
pub use fetcher::{GraphQlFetcher, GraphQlFetcherConfig, JsonFetcher, JsonFetcherConfig};
pub use generator::{ERROR_SITEMAP_NAME, GeneratorConfig, SitemapGroup, generate_sitemaps};
pub use helpers::{combine_urls, slugify};
pub use provider::{FnProvider, PaginatedProvider, StaticProvider, UrlProvider};
pub use robots::build_robots_txt;
pub use source::{SitemapSource, resolve_source};
pub use types::*;
pub use xml::{build_sitemap_index_xml, build_url_set_xml};
