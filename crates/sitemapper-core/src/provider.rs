//! The provider seam between the generator and its URL sources.
//!
//! A group's provider is anything that can asynchronously produce a list of
//! sitemap entries. [`crate::ensure::ensure_sitemaps`] wraps declarative
//! [`crate::source::SitemapSource`]s into providers; the helpers here cover
//! the common hand-rolled cases (fixed lists, one-off async closures,
//! caller-driven pagination).

use crate::Result;
use crate::types::{SitemapEntry, SitemapPage};
use async_trait::async_trait;
use std::future::Future;

/// Asynchronous producer of sitemap entries for one group.
///
/// Implementations must not panic on expected failure modes; return an
/// `Err` instead, and the generator will contain it at the group boundary.
#[async_trait]
pub trait UrlProvider: Send + Sync {
    /// Produces the full URL list for the group.
    async fn provide(&self) -> Result<Vec<SitemapEntry>>;
}

/// Provider backed by a fixed list of entries.
#[derive(Debug, Clone, Default)]
pub struct StaticProvider {
    urls: Vec<SitemapEntry>,
}

impl StaticProvider {
    /// Creates a provider that always yields `urls`.
    pub fn new<I, E>(urls: I) -> Self
    where
        I: IntoIterator<Item = E>,
        E: Into<SitemapEntry>,
    {
        Self {
            urls: urls.into_iter().map(Into::into).collect(),
        }
    }
}

#[async_trait]
impl UrlProvider for StaticProvider {
    async fn provide(&self) -> Result<Vec<SitemapEntry>> {
        Ok(self.urls.clone())
    }
}

/// Provider backed by an async closure.
pub struct FnProvider<F> {
    fetcher: F,
}

impl<F, Fut> FnProvider<F>
where
    F: Fn() -> Fut + Send + Sync,
    Fut: Future<Output = Result<Vec<SitemapEntry>>> + Send,
{
    /// Wraps `fetcher` as a provider; it is invoked once per generation run.
    pub const fn new(fetcher: F) -> Self {
        Self { fetcher }
    }
}

#[async_trait]
impl<F, Fut> UrlProvider for FnProvider<F>
where
    F: Fn() -> Fut + Send + Sync,
    Fut: Future<Output = Result<Vec<SitemapEntry>>> + Send,
{
    async fn provide(&self) -> Result<Vec<SitemapEntry>> {
        (self.fetcher)().await
    }
}

/// Provider that accumulates pages from a caller-supplied page fetcher.
///
/// Pages are requested starting at `start_page` (default 1) until the
/// fetcher reports `has_more == false`. Termination is entirely the
/// fetcher's responsibility: one that always reports more pages loops
/// forever.
pub struct PaginatedProvider<F> {
    fetch_page: F,
    start_page: u32,
}

impl<F, Fut> PaginatedProvider<F>
where
    F: Fn(u32) -> Fut + Send + Sync,
    Fut: Future<Output = Result<SitemapPage>> + Send,
{
    /// Creates a provider paginating from page 1.
    pub const fn new(fetch_page: F) -> Self {
        Self {
            fetch_page,
            start_page: 1,
        }
    }

    /// Overrides the first page number passed to the fetcher.
    #[must_use]
    pub const fn with_start_page(mut self, start_page: u32) -> Self {
        self.start_page = start_page;
        self
    }
}

#[async_trait]
impl<F, Fut> UrlProvider for PaginatedProvider<F>
where
    F: Fn(u32) -> Fut + Send + Sync,
    Fut: Future<Output = Result<SitemapPage>> + Send,
{
    async fn provide(&self) -> Result<Vec<SitemapEntry>> {
        let mut all_urls = Vec::new();
        let mut page = self.start_page;

        loop {
            let result = (self.fetch_page)(page).await?;
            all_urls.extend(result.urls);
            if !result.has_more {
                break;
            }
            page += 1;
        }

        Ok(all_urls)
    }
}
