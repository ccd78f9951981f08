//! Declarative URL sources and their resolver.
//!
//! A [`SitemapSource`] is a tagged strategy for producing a flat list of
//! sitemap entries. The resolver never fails for the recoverable cases:
//! a missing file, an absent fetcher, or a `None` network response all
//! degrade to an empty or truncated list. Malformed JSON and mapper
//! failures do return `Err`, to be contained at the group boundary by the
//! generator.

use crate::fetcher::GraphQlFetcher;
use crate::provider::UrlProvider;
use crate::types::{SitemapEntry, SitemapPage};
use crate::{Error, Result};
use futures::FutureExt;
use futures::future::{BoxFuture, join_all};
use serde_json::Value;
use std::fs;
use std::path::PathBuf;
use tracing::{debug, warn};

/// Maps a JSON document into sitemap entries.
pub type MapToUrls = Box<dyn Fn(&Value) -> Result<Vec<SitemapEntry>> + Send + Sync>;

/// Builds GraphQL variables for a `(page, page_size)` request.
pub type BuildVariables = Box<dyn Fn(u32, usize) -> Value + Send + Sync>;

/// Maps one GraphQL response into a page of entries plus a continuation flag.
pub type MapPage = Box<dyn Fn(&Value) -> Result<SitemapPage> + Send + Sync>;

/// Merges per-source result lists (in source order) into one list.
pub type CombineResults = Box<dyn Fn(Vec<Vec<SitemapEntry>>) -> Vec<SitemapEntry> + Send + Sync>;

/// A strategy for obtaining the URL list of one sitemap group.
pub enum SitemapSource {
    /// Fixed list, no I/O.
    Static {
        /// The entries, returned as-is.
        urls: Vec<SitemapEntry>,
    },
    /// Read and parse a local JSON file. Resolves to an empty list when the
    /// file does not exist; a parse failure is an error.
    JsonFile {
        /// Path of the JSON document.
        path: PathBuf,
        /// Extracts entries from the parsed document.
        map_to_urls: MapToUrls,
    },
    /// One GraphQL query. Resolves to an empty list when no fetcher is
    /// configured or the query fails.
    Graphql {
        /// The query document.
        query: String,
        /// Optional query variables.
        variables: Option<Value>,
        /// Extracts entries from the response's `data`.
        map_to_urls: MapToUrls,
    },
    /// Repeated GraphQL queries, page 1 upward, until `map_page` reports no
    /// more pages or a request fails (yielding a truncated result).
    ///
    /// Termination is the caller's responsibility unless `max_pages` is
    /// set: a `map_page` that always reports more pages loops forever.
    GraphqlPaginated {
        /// The query document, shared across pages.
        query: String,
        /// Page size passed to `build_variables`.
        page_size: usize,
        /// Builds the variables for each `(page, page_size)` request.
        build_variables: BuildVariables,
        /// Extracts the page's entries and continuation flag.
        map_page: MapPage,
        /// Defensive page ceiling; `None` leaves termination to `map_page`.
        max_pages: Option<u32>,
    },
    /// Arbitrary caller-supplied asynchronous producer.
    AsyncFetcher {
        /// The producer; its errors propagate to the group boundary.
        fetcher: Box<dyn UrlProvider>,
    },
    /// Recursively resolves nested sources (concurrently) and merges the
    /// per-source results via `combine`.
    Composite {
        /// Nested sources of any variant, including further composites.
        sources: Vec<SitemapSource>,
        /// Merges the results, which arrive in source-declaration order.
        combine: CombineResults,
    },
}

impl SitemapSource {
    /// A fixed list of URLs.
    pub fn static_urls<I, E>(urls: I) -> Self
    where
        I: IntoIterator<Item = E>,
        E: Into<SitemapEntry>,
    {
        Self::Static {
            urls: urls.into_iter().map(Into::into).collect(),
        }
    }

    /// A local JSON file mapped through `map_to_urls`.
    pub fn json_file<F>(path: impl Into<PathBuf>, map_to_urls: F) -> Self
    where
        F: Fn(&Value) -> Result<Vec<SitemapEntry>> + Send + Sync + 'static,
    {
        Self::JsonFile {
            path: path.into(),
            map_to_urls: Box::new(map_to_urls),
        }
    }

    /// A single-shot GraphQL query mapped through `map_to_urls`.
    pub fn graphql<F>(query: impl Into<String>, variables: Option<Value>, map_to_urls: F) -> Self
    where
        F: Fn(&Value) -> Result<Vec<SitemapEntry>> + Send + Sync + 'static,
    {
        Self::Graphql {
            query: query.into(),
            variables,
            map_to_urls: Box::new(map_to_urls),
        }
    }

    /// A paginated GraphQL query without a page ceiling.
    pub fn graphql_paginated<B, M>(
        query: impl Into<String>,
        page_size: usize,
        build_variables: B,
        map_page: M,
    ) -> Self
    where
        B: Fn(u32, usize) -> Value + Send + Sync + 'static,
        M: Fn(&Value) -> Result<SitemapPage> + Send + Sync + 'static,
    {
        Self::GraphqlPaginated {
            query: query.into(),
            page_size,
            build_variables: Box::new(build_variables),
            map_page: Box::new(map_page),
            max_pages: None,
        }
    }

    /// A caller-supplied async producer.
    #[must_use]
    pub fn async_fetcher(fetcher: impl UrlProvider + 'static) -> Self {
        Self::AsyncFetcher {
            fetcher: Box::new(fetcher),
        }
    }

    /// Nested sources merged through `combine`.
    pub fn composite<F>(sources: Vec<Self>, combine: F) -> Self
    where
        F: Fn(Vec<Vec<SitemapEntry>>) -> Vec<SitemapEntry> + Send + Sync + 'static,
    {
        Self::Composite {
            sources,
            combine: Box::new(combine),
        }
    }

    /// Sets the defensive page ceiling on a paginated source.
    ///
    /// Other variants are returned unchanged.
    #[must_use]
    pub fn with_max_pages(mut self, ceiling: u32) -> Self {
        if let Self::GraphqlPaginated { max_pages, .. } = &mut self {
            *max_pages = Some(ceiling);
        }
        self
    }
}

/// Resolves a source into a flat entry list.
///
/// `fetcher` is shared by every GraphQL source in the tree; when it is
/// `None`, GraphQL sources resolve to empty lists.
pub fn resolve_source<'a>(
    source: &'a SitemapSource,
    fetcher: Option<&'a GraphQlFetcher>,
) -> BoxFuture<'a, Result<Vec<SitemapEntry>>> {
    async move {
        match source {
            SitemapSource::Static { urls } => Ok(urls.clone()),

            SitemapSource::JsonFile { path, map_to_urls } => {
                if !path.exists() {
                    debug!("JSON source {} does not exist, skipping", path.display());
                    return Ok(Vec::new());
                }
                let raw = fs::read_to_string(path)?;
                let data: Value = serde_json::from_str(&raw).map_err(|e| {
                    Error::Parse(format!("Invalid JSON in {}: {e}", path.display()))
                })?;
                map_to_urls(&data)
            },

            SitemapSource::Graphql {
                query,
                variables,
                map_to_urls,
            } => {
                let Some(fetcher) = fetcher else {
                    debug!("No GraphQL fetcher configured, skipping graphql source");
                    return Ok(Vec::new());
                };
                match fetcher.query(query, variables.as_ref()).await {
                    Some(data) => map_to_urls(&data),
                    None => Ok(Vec::new()),
                }
            },

            SitemapSource::GraphqlPaginated {
                query,
                page_size,
                build_variables,
                map_page,
                max_pages,
            } => {
                let Some(fetcher) = fetcher else {
                    debug!("No GraphQL fetcher configured, skipping paginated source");
                    return Ok(Vec::new());
                };

                let mut all_urls = Vec::new();
                let mut page: u32 = 1;
                loop {
                    if let Some(ceiling) = max_pages
                        && page > *ceiling
                    {
                        warn!("Paginated source hit page ceiling ({ceiling}), truncating");
                        break;
                    }

                    let variables = build_variables(page, *page_size);
                    let Some(data) = fetcher.query(query, Some(&variables)).await else {
                        // Failed page: keep what was accumulated so far.
                        debug!("Paginated source got no data for page {page}, stopping");
                        break;
                    };
                    let result = map_page(&data)?;
                    all_urls.extend(result.urls);
                    if !result.has_more {
                        break;
                    }
                    page += 1;
                }
                Ok(all_urls)
            },

            SitemapSource::AsyncFetcher { fetcher: provider } => provider.provide().await,

            SitemapSource::Composite { sources, combine } => {
                let results =
                    join_all(sources.iter().map(|s| resolve_source(s, fetcher))).await;
                let mut collected = Vec::with_capacity(results.len());
                for result in results {
                    collected.push(result?);
                }
                Ok(combine(collected))
            },
        }
    }
    .boxed()
}
