//! The sitemap generator: turns resolved URL groups into paginated XML
//! files, an index document, and robots.txt.
//!
//! The run is best-effort by design: a failing group is recorded and made
//! visible through a synthetic `__errors.xml` sitemap while its siblings
//! still generate. Only output-directory I/O failures surface as `Err`.
//!
//! Concurrent runs against the same output directory are not safe; callers
//! must serialize invocations (a single build process does).

use crate::provider::UrlProvider;
use crate::robots::build_robots_txt;
use crate::types::{
    GeneratedSitemap, RobotsConfig, RobotsSetting, SitemapEntry, SitemapGeneratorResult,
};
use crate::xml::{build_sitemap_index_xml, build_url_set_xml};
use crate::{Error, Result};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, error, info};

/// File name of the synthetic sitemap that surfaces group failures.
pub const ERROR_SITEMAP_NAME: &str = "__errors.xml";

/// URL path segment under which encoded group failures are exposed.
const ERROR_URL_SEGMENT: &str = "__sitemap_error";

/// One named unit of sitemap output, backed by a provider.
pub struct SitemapGroup {
    /// Output file stem; must be filesystem-safe.
    pub name: String,
    /// Produces the group's URL list.
    pub provider: Box<dyn UrlProvider>,
    /// Per-group page size override.
    pub page_size: Option<usize>,
}

impl SitemapGroup {
    /// Creates a group using the generator's default page size.
    pub fn new(name: impl Into<String>, provider: impl UrlProvider + 'static) -> Self {
        Self {
            name: name.into(),
            provider: Box::new(provider),
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

/// Configuration for one generation run.
pub struct GeneratorConfig {
    /// Absolute site base URL; trailing slashes are tolerated.
    pub base_url: String,
    /// Directory the files are written into.
    pub output_dir: PathBuf,
    /// Groups, processed in declaration order.
    pub groups: Vec<SitemapGroup>,
    /// robots.txt emission policy.
    pub robots: RobotsSetting,
    /// Page size for groups without an override.
    pub default_page_size: usize,
    /// Index document path relative to `output_dir`.
    pub sitemap_index_path: String,
    /// Subdirectory (relative to `output_dir`) for the per-group files.
    pub sitemap_subdir: String,
    /// Skip regeneration while the index file is younger than this.
    pub stale_time: Option<Duration>,
}

impl GeneratorConfig {
    /// Creates a config with the default layout (`seo/` subdir,
    /// `sitemap.xml` index, 40 000 URLs per file, robots enabled) and no
    /// staleness gate.
    pub fn new(base_url: impl Into<String>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_url: base_url.into(),
            output_dir: output_dir.into(),
            groups: Vec::new(),
            robots: RobotsSetting::Enabled,
            default_page_size: 40_000,
            sitemap_index_path: "sitemap.xml".to_string(),
            sitemap_subdir: "seo".to_string(),
            stale_time: None,
        }
    }
}

fn is_stale(path: &Path, stale_time: Duration) -> bool {
    let age = std::fs::metadata(path)
        .and_then(|meta| meta.modified())
        .and_then(|mtime| mtime.elapsed().map_err(std::io::Error::other));
    match age {
        Ok(age) => age > stale_time,
        // Missing file or unreadable mtime counts as stale.
        Err(_) => true,
    }
}

fn write_file(path: &Path, contents: &str) -> Result<()> {
    std::fs::write(path, contents)
        .map_err(|e| Error::Storage(format!("Failed to write {}: {e}", path.display())))
}

fn ensure_dir(path: &Path) -> Result<()> {
    std::fs::create_dir_all(path)
        .map_err(|e| Error::Storage(format!("Failed to create {}: {e}", path.display())))
}

/// Runs one generation pass over the configured groups.
///
/// Returns the manifest of written files. Provider failures are contained
/// per group (see module docs); only output I/O failures return `Err`.
pub async fn generate_sitemaps(config: &GeneratorConfig) -> Result<SitemapGeneratorResult> {
    let index_full_path = config.output_dir.join(&config.sitemap_index_path);

    if let Some(stale_time) = config.stale_time
        && !is_stale(&index_full_path, stale_time)
    {
        debug!(
            "Sitemap index {} is fresh, skipping generation",
            index_full_path.display()
        );
        let robots_exists = config.output_dir.join("robots.txt").exists();
        return Ok(SitemapGeneratorResult {
            sitemaps: Vec::new(),
            sitemap_index_path: Some(config.sitemap_index_path.clone()),
            robots_path: robots_exists.then(|| "robots.txt".to_string()),
            skipped: true,
        });
    }

    let base_url = config.base_url.trim_end_matches('/');
    let seo_dir = config.output_dir.join(&config.sitemap_subdir);
    ensure_dir(&config.output_dir)?;
    ensure_dir(&seo_dir)?;

    let mut generated: Vec<GeneratedSitemap> = Vec::new();
    let mut index_urls: Vec<String> = Vec::new();
    let mut group_errors: Vec<(String, String)> = Vec::new();

    let mut write_chunks = |name: &str, page_size: usize, urls: &[SitemapEntry]| -> Result<()> {
        let chunks: Vec<&[SitemapEntry]> = urls.chunks(page_size).collect();
        for (idx, chunk) in chunks.iter().enumerate() {
            let file_name = if chunks.len() == 1 {
                format!("{name}.xml")
            } else {
                format!("{name}-{}.xml", idx + 1)
            };
            let relative_path = format!("{}/{file_name}", config.sitemap_subdir);

            write_file(&seo_dir.join(&file_name), &build_url_set_xml(chunk))?;

            index_urls.push(format!("{base_url}/{relative_path}"));
            generated.push(GeneratedSitemap {
                name: file_name,
                path: relative_path,
                url_count: chunk.len(),
            });
        }
        Ok(())
    };

    for group in &config.groups {
        match group.provider.provide().await {
            Ok(urls) if urls.is_empty() => {
                debug!("Group '{}' produced no URLs, skipping", group.name);
            },
            Ok(urls) => {
                info!("Group '{}' resolved {} URLs", group.name, urls.len());
                // A page size of zero would never terminate the chunking.
                let page_size = group
                    .page_size
                    .unwrap_or(config.default_page_size)
                    .max(1);
                write_chunks(&group.name, page_size, &urls)?;
            },
            Err(e) => {
                group_errors.push((group.name.clone(), e.to_string()));
            },
        }
    }

    if !group_errors.is_empty() {
        let summary: Vec<String> = group_errors
            .iter()
            .map(|(name, message)| format!("{name}: {message}"))
            .collect();
        error!(
            "{} sitemap group(s) failed: {}",
            group_errors.len(),
            summary.join("; ")
        );

        let mut entries: Vec<SitemapEntry> = vec![base_url.into()];
        entries.extend(group_errors.iter().map(|(name, message)| {
            let encoded = urlencoding::encode(&format!("{name}:{message}")).into_owned();
            SitemapEntry::from(format!("{base_url}/{ERROR_URL_SEGMENT}/{encoded}"))
        }));

        let relative_path = format!("{}/{ERROR_SITEMAP_NAME}", config.sitemap_subdir);
        write_file(
            &seo_dir.join(ERROR_SITEMAP_NAME),
            &build_url_set_xml(&entries),
        )?;
        index_urls.push(format!("{base_url}/{relative_path}"));
        generated.push(GeneratedSitemap {
            name: ERROR_SITEMAP_NAME.to_string(),
            path: relative_path,
            url_count: entries.len(),
        });
    }

    if index_urls.is_empty() {
        // Degenerate all-empty run: the index path must still exist and be
        // valid XML, so write a single-URL urlset instead of an index.
        write_file(
            &index_full_path,
            &build_url_set_xml(&[SitemapEntry::from(base_url)]),
        )?;
    } else {
        write_file(&index_full_path, &build_sitemap_index_xml(&index_urls))?;
    }

    let index_url = (!index_urls.is_empty())
        .then(|| format!("{base_url}/{}", config.sitemap_index_path));

    let robots_path = match &config.robots {
        RobotsSetting::Disabled => None,
        RobotsSetting::Enabled => {
            let robots_config = RobotsConfig {
                sitemap_url: index_url,
                ..RobotsConfig::default()
            };
            write_file(
                &config.output_dir.join("robots.txt"),
                &build_robots_txt(&robots_config),
            )?;
            Some("robots.txt".to_string())
        },
        RobotsSetting::Custom(custom) => {
            let mut robots_config = custom.clone();
            if robots_config.sitemap_url.is_none() {
                robots_config.sitemap_url = index_url;
            }
            write_file(
                &config.output_dir.join("robots.txt"),
                &build_robots_txt(&robots_config),
            )?;
            Some("robots.txt".to_string())
        },
    };

    info!(
        "Wrote {} sitemap file(s) under {}",
        generated.len(),
        config.output_dir.display()
    );

    Ok(SitemapGeneratorResult {
        sitemaps: generated,
        sitemap_index_path: Some(config.sitemap_index_path.clone()),
        robots_path,
        skipped: false,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::provider::{FnProvider, StaticProvider};
    use crate::types::RobotsRule;
    use tempfile::TempDir;

    fn static_group(name: &str, urls: &[&str]) -> SitemapGroup {
        SitemapGroup::new(name, StaticProvider::new(urls.to_vec()))
    }

    fn failing_group(name: &str, message: &str) -> SitemapGroup {
        let message = message.to_string();
        SitemapGroup::new(
            name,
            FnProvider::new(move || {
                let message = message.clone();
                async move { Err(Error::Parse(message)) }
            }),
        )
    }

    fn read(dir: &TempDir, rel: &str) -> String {
        std::fs::read_to_string(dir.path().join(rel)).unwrap()
    }

    #[tokio::test]
    async fn test_single_chunk_uses_plain_file_name() {
        let dir = TempDir::new().unwrap();
        let mut config = GeneratorConfig::new("https://example.com", dir.path());
        config.groups = vec![static_group("pages", &["https://example.com/a"])];

        let result = generate_sitemaps(&config).await.unwrap();

        assert_eq!(result.sitemaps.len(), 1);
        assert_eq!(result.sitemaps[0].name, "pages.xml");
        assert_eq!(result.sitemaps[0].path, "seo/pages.xml");
        assert_eq!(result.sitemaps[0].url_count, 1);
        assert!(read(&dir, "seo/pages.xml").contains("https://example.com/a"));
    }

    #[tokio::test]
    async fn test_chunking_five_urls_page_size_two() {
        let dir = TempDir::new().unwrap();
        let urls = [
            "https://example.com/1",
            "https://example.com/2",
            "https://example.com/3",
            "https://example.com/4",
            "https://example.com/5",
        ];
        let mut config = GeneratorConfig::new("https://example.com", dir.path());
        config.groups = vec![static_group("pages", &urls).with_page_size(2)];

        let result = generate_sitemaps(&config).await.unwrap();

        let names: Vec<&str> = result.sitemaps.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["pages-1.xml", "pages-2.xml", "pages-3.xml"]);
        let counts: Vec<usize> = result.sitemaps.iter().map(|s| s.url_count).collect();
        assert_eq!(counts, vec![2, 2, 1]);

        // Concatenating file contents in index order reproduces the input order.
        let concatenated = names
            .iter()
            .map(|n| read(&dir, &format!("seo/{n}")))
            .collect::<String>();
        let mut last = 0;
        for url in urls {
            let pos = concatenated.find(url).unwrap();
            assert!(pos >= last, "{url} out of order");
            last = pos;
        }

        let index = read(&dir, "sitemap.xml");
        assert!(index.contains("<sitemapindex"));
        for n in names {
            assert!(index.contains(&format!("https://example.com/seo/{n}")));
        }
    }

    #[tokio::test]
    async fn test_empty_group_is_skipped_silently() {
        let dir = TempDir::new().unwrap();
        let mut config = GeneratorConfig::new("https://example.com", dir.path());
        config.groups = vec![static_group("empty", &[])];

        let result = generate_sitemaps(&config).await.unwrap();

        assert!(result.sitemaps.is_empty());
        assert!(!dir.path().join("seo/empty.xml").exists());
    }

    #[tokio::test]
    async fn test_failing_group_does_not_block_siblings() {
        let dir = TempDir::new().unwrap();
        let mut config = GeneratorConfig::new("https://example.com", dir.path());
        config.groups = vec![
            failing_group("broken", "boom & bust"),
            static_group("pages", &["https://example.com/a"]),
        ];

        let result = generate_sitemaps(&config).await.unwrap();

        assert!(dir.path().join("seo/pages.xml").exists());
        let names: Vec<&str> = result.sitemaps.iter().map(|s| s.name.as_str()).collect();
        assert!(names.contains(&"pages.xml"));
        assert!(names.contains(&ERROR_SITEMAP_NAME));

        let errors_xml = read(&dir, "seo/__errors.xml");
        // Bare base URL first, then one encoded entry per failure.
        assert!(errors_xml.contains("<loc>https://example.com</loc>"));
        assert!(errors_xml.contains("__sitemap_error"));
        let encoded = urlencoding::encode("broken:Parse error: boom & bust").into_owned();
        assert!(errors_xml.contains(&crate::xml::escape_xml(&encoded)));

        // The index references the error sitemap too.
        assert!(read(&dir, "sitemap.xml").contains("__errors.xml"));
    }

    #[tokio::test]
    async fn test_fallback_urlset_when_nothing_generated() {
        let dir = TempDir::new().unwrap();
        let config = GeneratorConfig::new("https://example.com/", dir.path());

        let result = generate_sitemaps(&config).await.unwrap();

        assert_eq!(result.sitemap_index_path.as_deref(), Some("sitemap.xml"));
        let index = read(&dir, "sitemap.xml");
        assert!(index.contains("<urlset"));
        assert!(index.contains("<loc>https://example.com</loc>"));
        assert!(!index.contains("<sitemapindex"));
    }

    #[tokio::test]
    async fn test_robots_enabled_points_at_index() {
        let dir = TempDir::new().unwrap();
        let mut config = GeneratorConfig::new("https://example.com", dir.path());
        config.groups = vec![static_group("pages", &["https://example.com/a"])];

        let result = generate_sitemaps(&config).await.unwrap();

        assert_eq!(result.robots_path.as_deref(), Some("robots.txt"));
        let robots = read(&dir, "robots.txt");
        assert!(robots.contains("User-agent: *\nAllow: /"));
        assert!(robots.contains("Sitemap: https://example.com/sitemap.xml"));
    }

    #[tokio::test]
    async fn test_robots_disabled_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let mut config = GeneratorConfig::new("https://example.com", dir.path());
        config.robots = RobotsSetting::Disabled;

        let result = generate_sitemaps(&config).await.unwrap();

        assert_eq!(result.robots_path, None);
        assert!(!dir.path().join("robots.txt").exists());
    }

    #[tokio::test]
    async fn test_robots_custom_without_index_url_has_no_sitemap_line() {
        let dir = TempDir::new().unwrap();
        let mut config = GeneratorConfig::new("https://example.com", dir.path());
        config.robots = RobotsSetting::Custom(RobotsConfig {
            rules: vec![RobotsRule {
                user_agent: "*".to_string(),
                allow: vec!["/".to_string()],
                disallow: vec![],
            }],
            ..RobotsConfig::default()
        });

        generate_sitemaps(&config).await.unwrap();

        // No groups produced output, so no index URL to reference.
        assert!(!read(&dir, "robots.txt").contains("Sitemap:"));
    }

    #[tokio::test]
    async fn test_robots_custom_sitemap_url_is_preserved() {
        let dir = TempDir::new().unwrap();
        let mut config = GeneratorConfig::new("https://example.com", dir.path());
        config.groups = vec![static_group("pages", &["https://example.com/a"])];
        config.robots = RobotsSetting::Custom(RobotsConfig {
            sitemap_url: Some("https://custom.example.com/sitemap.xml".to_string()),
            ..RobotsConfig::default()
        });

        generate_sitemaps(&config).await.unwrap();

        let robots = read(&dir, "robots.txt");
        assert!(robots.contains("Sitemap: https://custom.example.com/sitemap.xml"));
        assert!(!robots.contains("Sitemap: https://example.com/sitemap.xml"));
    }

    #[tokio::test]
    async fn test_staleness_gate_skips_second_run() {
        let dir = TempDir::new().unwrap();
        let mut config = GeneratorConfig::new("https://example.com", dir.path());
        config.groups = vec![static_group("pages", &["https://example.com/a"])];
        config.stale_time = Some(Duration::from_secs(3600));

        let first = generate_sitemaps(&config).await.unwrap();
        assert!(!first.skipped);

        let mut config = GeneratorConfig::new("https://example.com", dir.path());
        config.groups = vec![static_group("pages", &["https://example.com/a"])];
        config.stale_time = Some(Duration::from_secs(3600));

        let second = generate_sitemaps(&config).await.unwrap();
        assert!(second.skipped);
        assert!(second.sitemaps.is_empty());
        assert_eq!(second.sitemap_index_path.as_deref(), Some("sitemap.xml"));
        // robots.txt exists from the first run
        assert_eq!(second.robots_path.as_deref(), Some("robots.txt"));
    }

    #[tokio::test]
    async fn test_stale_index_regenerates() {
        let dir = TempDir::new().unwrap();
        let mut config = GeneratorConfig::new("https://example.com", dir.path());
        config.groups = vec![static_group("pages", &["https://example.com/a"])];
        config.stale_time = Some(Duration::ZERO);

        generate_sitemaps(&config).await.unwrap();
        // Any nonzero age exceeds a zero stale time.
        std::thread::sleep(Duration::from_millis(20));

        let mut config = GeneratorConfig::new("https://example.com", dir.path());
        config.groups = vec![static_group("pages", &["https://example.com/a"])];
        config.stale_time = Some(Duration::ZERO);

        let result = generate_sitemaps(&config).await.unwrap();
        assert!(!result.skipped);
    }

    #[tokio::test]
    async fn test_base_url_trailing_slashes_trimmed() {
        let dir = TempDir::new().unwrap();
        let mut config = GeneratorConfig::new("https://example.com///", dir.path());
        config.groups = vec![static_group("pages", &["https://example.com/a"])];

        generate_sitemaps(&config).await.unwrap();

        let index = read(&dir, "sitemap.xml");
        assert!(index.contains("https://example.com/seo/pages.xml"));
        assert!(!index.contains("example.com///"));
    }

    #[tokio::test]
    async fn test_custom_subdir_and_index_path() {
        let dir = TempDir::new().unwrap();
        let mut config = GeneratorConfig::new("https://example.com", dir.path());
        config.groups = vec![static_group("pages", &["https://example.com/a"])];
        config.sitemap_subdir = "maps".to_string();
        config.sitemap_index_path = "custom-index.xml".to_string();

        let result = generate_sitemaps(&config).await.unwrap();

        assert_eq!(
            result.sitemap_index_path.as_deref(),
            Some("custom-index.xml")
        );
        assert!(dir.path().join("maps/pages.xml").exists());
        assert!(read(&dir, "custom-index.xml").contains("https://example.com/maps/pages.xml"));
    }
}
