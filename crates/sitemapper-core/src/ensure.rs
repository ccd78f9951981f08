//! High-level entry point: declarative config in, generated files out.
//!
//! `ensure_sitemaps` builds the shared GraphQL fetcher (when an endpoint is
//! configured), wraps each group's [`SitemapSource`] into a provider, and
//! hands the result to the generator. This is the API an embedding build
//! process calls once per deploy.

use crate::Result;
use crate::fetcher::{GraphQlFetcher, GraphQlFetcherConfig};
use crate::generator::{GeneratorConfig, SitemapGroup, generate_sitemaps};
use crate::provider::UrlProvider;
use crate::source::{SitemapSource, resolve_source};
use crate::types::{RobotsSetting, SitemapEntry, SitemapGeneratorResult};
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// A named group backed by a declarative source.
pub struct SitemapGroupDefinition {
    /// Output file stem; must be filesystem-safe.
    pub name: String,
    /// Where the group's URLs come from.
    pub source: SitemapSource,
    /// Per-group page size override.
    pub page_size: Option<usize>,
}

impl SitemapGroupDefinition {
    /// Creates a group definition using the config's default page size.
    pub fn new(name: impl Into<String>, source: SitemapSource) -> Self {
        Self {
            name: name.into(),
            source,
            page_size: None,
        }
    }

    /// Overrides the page size for this group.
    #[must_use]
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = Some(page_size);
        self
    }
}

/// Configuration for [`ensure_sitemaps`].
pub struct EnsureSitemapsConfig {
    /// Absolute site base URL; trailing slashes are tolerated.
    pub base_url: String,
    /// Directory the files are written into.
    pub output_dir: PathBuf,
    /// GraphQL endpoint shared by every GraphQL source; when `None` those
    /// sources resolve to empty lists.
    pub graphql_url: Option<String>,
    /// Headers sent with every GraphQL request.
    pub graphql_headers: HashMap<String, String>,
    /// Groups, processed in declaration order.
    pub groups: Vec<SitemapGroupDefinition>,
    /// Skip regeneration while the index file is younger than this.
    pub stale_time: Option<Duration>,
    /// Subdirectory for the per-group files. Default `"seo"`.
    pub sitemap_subdir: String,
    /// Index document path relative to `output_dir`. Default `"sitemap.xml"`.
    pub sitemap_index_path: String,
    /// Page size for groups without an override. Default 40 000.
    pub default_page_size: usize,
    /// robots.txt emission policy. Default enabled.
    pub robots: RobotsSetting,
}

impl EnsureSitemapsConfig {
    /// Creates a config with the default layout and no groups.
    pub fn new(base_url: impl Into<String>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_url: base_url.into(),
            output_dir: output_dir.into(),
            graphql_url: None,
            graphql_headers: HashMap::new(),
            groups: Vec::new(),
            stale_time: None,
            sitemap_subdir: "seo".to_string(),
            sitemap_index_path: "sitemap.xml".to_string(),
            default_page_size: 40_000,
            robots: RobotsSetting::Enabled,
        }
    }
}

/// Provider adapter over a declarative source plus the shared fetcher.
struct SourceProvider {
    source: SitemapSource,
    fetcher: Option<Arc<GraphQlFetcher>>,
}

#[async_trait]
impl UrlProvider for SourceProvider {
    async fn provide(&self) -> Result<Vec<SitemapEntry>> {
        resolve_source(&self.source, self.fetcher.as_deref()).await
    }
}

/// Resolves every group's source and writes the sitemap artifacts.
///
/// Group-level failures are contained (see [`generate_sitemaps`]); an `Err`
/// here means the fetcher could not be constructed or the output directory
/// could not be written.
pub async fn ensure_sitemaps(config: EnsureSitemapsConfig) -> Result<SitemapGeneratorResult> {
    let fetcher = match &config.graphql_url {
        Some(url) => Some(Arc::new(GraphQlFetcher::new(GraphQlFetcherConfig {
            url: url.clone(),
            headers: config.graphql_headers.clone(),
        })?)),
        None => None,
    };

    let groups = config
        .groups
        .into_iter()
        .map(|group| SitemapGroup {
            name: group.name,
            page_size: group.page_size,
            provider: Box::new(SourceProvider {
                source: group.source,
                fetcher: fetcher.clone(),
            }),
        })
        .collect();

    let generator_config = GeneratorConfig {
        base_url: config.base_url,
        output_dir: config.output_dir,
        groups,
        robots: config.robots,
        default_page_size: config.default_page_size,
        sitemap_index_path: config.sitemap_index_path,
        sitemap_subdir: config.sitemap_subdir,
        stale_time: config.stale_time,
    };
    generate_sitemaps(&generator_config).await
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_static_groups_end_to_end() {
        let dir = TempDir::new().unwrap();
        let mut config = EnsureSitemapsConfig::new("https://example.com", dir.path());
        config.groups = vec![SitemapGroupDefinition::new(
            "pages",
            SitemapSource::static_urls(["https://example.com/a", "https://example.com/b"]),
        )];

        let result = ensure_sitemaps(config).await.unwrap();

        assert!(!result.skipped);
        assert_eq!(result.sitemaps.len(), 1);
        assert_eq!(result.sitemaps[0].url_count, 2);
        assert!(dir.path().join("seo/pages.xml").exists());
        assert!(dir.path().join("sitemap.xml").exists());
        assert!(dir.path().join("robots.txt").exists());
    }

    #[tokio::test]
    async fn test_graphql_group_without_endpoint_is_empty() {
        let dir = TempDir::new().unwrap();
        let mut config = EnsureSitemapsConfig::new("https://example.com", dir.path());
        config.groups = vec![SitemapGroupDefinition::new(
            "posts",
            SitemapSource::graphql("{ posts { path } }", None, |_| Ok(Vec::new())),
        )];

        let result = ensure_sitemaps(config).await.unwrap();

        // No fetcher configured: the group resolves empty and is skipped.
        assert!(result.sitemaps.is_empty());
    }

    #[tokio::test]
    async fn test_source_failure_is_contained() {
        let dir = TempDir::new().unwrap();
        let broken = dir.path().join("broken.json");
        std::fs::write(&broken, "{not json").unwrap();

        let mut config = EnsureSitemapsConfig::new("https://example.com", dir.path());
        config.groups = vec![
            SitemapGroupDefinition::new(
                "broken",
                SitemapSource::json_file(&broken, |_| Ok(Vec::new())),
            ),
            SitemapGroupDefinition::new(
                "pages",
                SitemapSource::static_urls(["https://example.com/a"]),
            ),
        ];

        let result = ensure_sitemaps(config).await.unwrap();

        let names: Vec<&str> = result.sitemaps.iter().map(|s| s.name.as_str()).collect();
        assert!(names.contains(&"pages.xml"));
        assert!(names.contains(&"__errors.xml"));
    }
}
