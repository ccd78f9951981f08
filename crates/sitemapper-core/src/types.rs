//! Core data types for the sitemap generation engine.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Change frequency hint for a sitemap URL, per the sitemap 0.9 protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeFreq {
    /// Document changes on every access.
    Always,
    /// Roughly hourly changes.
    Hourly,
    /// Roughly daily changes.
    Daily,
    /// Roughly weekly changes.
    Weekly,
    /// Roughly monthly changes.
    Monthly,
    /// Roughly yearly changes.
    Yearly,
    /// Archived document that never changes.
    Never,
}

impl ChangeFreq {
    /// The protocol string for this frequency (`"daily"`, `"never"`, ...).
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Always => "always",
            Self::Hourly => "hourly",
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
            Self::Yearly => "yearly",
            Self::Never => "never",
        }
    }
}

/// A single sitemap URL with its optional protocol metadata.
///
/// `loc` is assumed to already be absolute; callers are responsible for
/// URL-joining (see [`crate::helpers::combine_urls`]).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SitemapUrl {
    /// Absolute URL of the document.
    pub loc: String,
    /// Last-modification date, ISO-8601 (`2024-05-01` or full timestamp).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lastmod: Option<String>,
    /// Expected change frequency.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub changefreq: Option<ChangeFreq>,
    /// Crawl priority in `[0.0, 1.0]`; rendered with one decimal digit.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<f32>,
}

impl SitemapUrl {
    /// Creates a URL entry with only `loc` set.
    pub fn new(loc: impl Into<String>) -> Self {
        Self {
            loc: loc.into(),
            lastmod: None,
            changefreq: None,
            priority: None,
        }
    }

    /// Sets `lastmod` from a timestamp, formatted as a `YYYY-MM-DD` date.
    #[must_use]
    pub fn with_lastmod(mut self, ts: DateTime<Utc>) -> Self {
        self.lastmod = Some(ts.format("%Y-%m-%d").to_string());
        self
    }

    /// Sets the change frequency hint.
    #[must_use]
    pub const fn with_changefreq(mut self, freq: ChangeFreq) -> Self {
        self.changefreq = Some(freq);
        self
    }

    /// Sets the crawl priority.
    #[must_use]
    pub const fn with_priority(mut self, priority: f32) -> Self {
        self.priority = Some(priority);
        self
    }
}

/// A sitemap entry: either a bare URL string or a full [`SitemapUrl`].
///
/// Bare strings are shorthand for `SitemapUrl { loc, .. }` and are
/// normalized before rendering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SitemapEntry {
    /// Shorthand: just the location.
    Loc(String),
    /// Full entry with metadata.
    Url(SitemapUrl),
}

impl SitemapEntry {
    /// The location string, regardless of form.
    #[must_use]
    pub fn loc(&self) -> &str {
        match self {
            Self::Loc(loc) => loc,
            Self::Url(url) => &url.loc,
        }
    }

    /// Normalizes into a full [`SitemapUrl`].
    #[must_use]
    pub fn into_url(self) -> SitemapUrl {
        match self {
            Self::Loc(loc) => SitemapUrl::new(loc),
            Self::Url(url) => url,
        }
    }
}

impl From<String> for SitemapEntry {
    fn from(loc: String) -> Self {
        Self::Loc(loc)
    }
}

impl From<&str> for SitemapEntry {
    fn from(loc: &str) -> Self {
        Self::Loc(loc.to_string())
    }
}

impl From<SitemapUrl> for SitemapEntry {
    fn from(url: SitemapUrl) -> Self {
        Self::Url(url)
    }
}

/// One `User-agent` block in robots.txt.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RobotsRule {
    /// The user agent the block applies to (`*` for all).
    pub user_agent: String,
    /// `Allow:` paths, emitted before the disallow lines.
    #[serde(default)]
    pub allow: Vec<String>,
    /// `Disallow:` paths.
    #[serde(default)]
    pub disallow: Vec<String>,
}

/// Configuration for the robots.txt builder.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RobotsConfig {
    /// Rule blocks; when empty a permissive `User-agent: *` block is used.
    #[serde(default)]
    pub rules: Vec<RobotsRule>,
    /// Primary `Sitemap:` reference.
    #[serde(default)]
    pub sitemap_url: Option<String>,
    /// Further `Sitemap:` references, one line each.
    #[serde(default)]
    pub additional_sitemaps: Vec<String>,
    /// Verbatim trailer text appended as its own block.
    #[serde(default)]
    pub custom: Option<String>,
}

/// Whether and how to emit robots.txt during generation.
#[derive(Debug, Clone, Default)]
pub enum RobotsSetting {
    /// Emit a minimal robots.txt pointing at the generated index.
    #[default]
    Enabled,
    /// Do not write robots.txt.
    Disabled,
    /// Use this config, defaulting `sitemap_url` to the generated index URL
    /// when unset.
    Custom(RobotsConfig),
}

impl From<bool> for RobotsSetting {
    fn from(enabled: bool) -> Self {
        if enabled { Self::Enabled } else { Self::Disabled }
    }
}

impl From<RobotsConfig> for RobotsSetting {
    fn from(config: RobotsConfig) -> Self {
        Self::Custom(config)
    }
}

/// One page of a paginated URL source.
#[derive(Debug, Clone, Default)]
pub struct SitemapPage {
    /// URLs contributed by this page.
    pub urls: Vec<SitemapEntry>,
    /// Whether another page should be fetched.
    pub has_more: bool,
}

/// Record of one written sitemap file. Produced only for non-empty groups.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedSitemap {
    /// File name, e.g. `pages-2.xml`.
    pub name: String,
    /// Path relative to the output directory, e.g. `seo/pages-2.xml`.
    pub path: String,
    /// Number of URLs the file contains.
    pub url_count: usize,
}

/// Outcome of one generation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SitemapGeneratorResult {
    /// Every sitemap file written this run, in output order.
    pub sitemaps: Vec<GeneratedSitemap>,
    /// Path of the index document relative to the output directory.
    ///
    /// Always set after a non-skipped run; the generator writes either an
    /// index or a fallback urlset to this path.
    pub sitemap_index_path: Option<String>,
    /// `robots.txt` if that file exists after the run, `None` otherwise.
    pub robots_path: Option<String>,
    /// True when the staleness gate short-circuited the run.
    pub skipped: bool,
}
