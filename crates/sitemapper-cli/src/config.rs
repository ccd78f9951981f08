//! TOML config file parsing and compilation into the core engine's config.
//!
//! The file form is fully declarative: URL extraction from JSON and GraphQL
//! responses is expressed as JSON pointers rather than code. Relative URLs
//! (leading `/`) in any source are joined onto the configured base URL.

use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::{Value, json};
use sitemapper_core::{
    EnsureSitemapsConfig, Error, RobotsConfig, RobotsSetting, SitemapEntry,
    SitemapGroupDefinition, SitemapPage, SitemapSource, combine_urls,
};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Top-level `sitemapper.toml` layout.
#[derive(Debug, Clone, Deserialize)]
pub struct FileConfig {
    /// Absolute site base URL.
    pub base_url: String,
    /// Output directory, relative to the working directory.
    pub output_dir: PathBuf,
    /// GraphQL endpoint for `graphql` / `graphql_paginated` sources.
    #[serde(default)]
    pub graphql_url: Option<String>,
    /// Headers sent with every GraphQL request.
    #[serde(default)]
    pub graphql_headers: HashMap<String, String>,
    /// Skip regeneration while the index is younger than this many seconds.
    #[serde(default)]
    pub stale_time_secs: Option<u64>,
    /// Subdirectory for per-group sitemap files.
    #[serde(default)]
    pub sitemap_subdir: Option<String>,
    /// Index document path relative to the output directory.
    #[serde(default)]
    pub sitemap_index_path: Option<String>,
    /// Page size for groups without an override.
    #[serde(default)]
    pub default_page_size: Option<usize>,
    /// robots.txt policy: `true`, `false`, or a full config table.
    #[serde(default)]
    pub robots: Option<RobotsSpec>,
    /// The sitemap groups, in output order.
    #[serde(default)]
    pub groups: Vec<GroupSpec>,
}

/// robots.txt policy in file form.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RobotsSpec {
    /// `robots = true` / `robots = false`.
    Flag(bool),
    /// A full `[robots]` table.
    Config(RobotsConfig),
}

/// One `[[groups]]` entry.
#[derive(Debug, Clone, Deserialize)]
pub struct GroupSpec {
    /// Output file stem.
    pub name: String,
    /// Per-group page size override.
    #[serde(default)]
    pub page_size: Option<usize>,
    /// The group's source.
    pub source: SourceSpec,
}

/// Declarative source forms, tagged by `type`.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SourceSpec {
    /// Fixed URL list; entries may be site-relative paths.
    Static {
        /// The URLs or paths.
        urls: Vec<String>,
    },
    /// Local JSON file; `pointer` addresses an array of URL strings.
    JsonFile {
        /// Path of the JSON document.
        path: PathBuf,
        /// JSON pointer to the URL array, e.g. `/data/urls`.
        pointer: String,
    },
    /// Single GraphQL query; `pointer` addresses an array of URL strings
    /// inside the response's `data`.
    Graphql {
        /// The query document.
        query: String,
        /// Optional query variables.
        #[serde(default)]
        variables: Option<Value>,
        /// JSON pointer to the URL array within `data`.
        pointer: String,
    },
    /// Paginated GraphQL query; variables are `{page, pageSize}`.
    GraphqlPaginated {
        /// The query document.
        query: String,
        /// Page size passed as the `pageSize` variable.
        page_size: usize,
        /// JSON pointer to the page's URL array within `data`.
        urls_pointer: String,
        /// JSON pointer to the continuation flag within `data`.
        has_more_pointer: String,
        /// Defensive page ceiling.
        #[serde(default)]
        max_pages: Option<u32>,
    },
    /// Nested sources concatenated in declaration order.
    Composite {
        /// The nested sources.
        sources: Vec<SourceSpec>,
    },
}

fn entries_at_pointer(
    base_url: &str,
    data: &Value,
    pointer: &str,
) -> sitemapper_core::Result<Vec<SitemapEntry>> {
    let items = data
        .pointer(pointer)
        .and_then(Value::as_array)
        .ok_or_else(|| Error::Parse(format!("no URL array at pointer '{pointer}'")))?;
    let urls: Vec<&str> = items.iter().filter_map(Value::as_str).collect();
    Ok(absolutize(base_url, urls.into_iter().map(str::to_string)))
}

fn absolutize(base_url: &str, urls: impl Iterator<Item = String>) -> Vec<SitemapEntry> {
    urls.map(|url| {
        if url.starts_with('/') {
            combine_urls(base_url, &[url.as_str()]).remove(0).into()
        } else {
            url.into()
        }
    })
    .collect()
}

fn compile_source(base_url: &str, spec: SourceSpec) -> SitemapSource {
    let base = base_url.to_string();
    match spec {
        SourceSpec::Static { urls } => {
            SitemapSource::static_urls(absolutize(&base, urls.into_iter()))
        },
        SourceSpec::JsonFile { path, pointer } => SitemapSource::json_file(path, move |data| {
            entries_at_pointer(&base, data, &pointer)
        }),
        SourceSpec::Graphql {
            query,
            variables,
            pointer,
        } => SitemapSource::graphql(query, variables, move |data| {
            entries_at_pointer(&base, data, &pointer)
        }),
        SourceSpec::GraphqlPaginated {
            query,
            page_size,
            urls_pointer,
            has_more_pointer,
            max_pages,
        } => {
            let source = SitemapSource::graphql_paginated(
                query,
                page_size,
                |page, page_size| json!({ "page": page, "pageSize": page_size }),
                move |data| {
                    Ok(SitemapPage {
                        urls: entries_at_pointer(&base, data, &urls_pointer)?,
                        has_more: data
                            .pointer(&has_more_pointer)
                            .and_then(Value::as_bool)
                            .unwrap_or(false),
                    })
                },
            );
            match max_pages {
                Some(ceiling) => source.with_max_pages(ceiling),
                None => source,
            }
        },
        SourceSpec::Composite { sources } => {
            let compiled = sources
                .into_iter()
                .map(|s| compile_source(&base, s))
                .collect();
            SitemapSource::composite(compiled, |results| {
                results.into_iter().flatten().collect()
            })
        },
    }
}

/// Reads and parses the config file.
pub fn load(path: &Path) -> Result<FileConfig> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("cannot read config file {}", path.display()))?;
    toml::from_str(&raw).with_context(|| format!("invalid config file {}", path.display()))
}

/// Compiles the file config into the core engine's config.
#[must_use]
pub fn compile(file: FileConfig) -> EnsureSitemapsConfig {
    let mut config = EnsureSitemapsConfig::new(file.base_url.clone(), file.output_dir);
    config.graphql_url = file.graphql_url;
    config.graphql_headers = file.graphql_headers;
    config.stale_time = file.stale_time_secs.map(Duration::from_secs);
    if let Some(subdir) = file.sitemap_subdir {
        config.sitemap_subdir = subdir;
    }
    if let Some(index_path) = file.sitemap_index_path {
        config.sitemap_index_path = index_path;
    }
    if let Some(page_size) = file.default_page_size {
        config.default_page_size = page_size;
    }
    config.robots = match file.robots {
        None => RobotsSetting::Enabled,
        Some(RobotsSpec::Flag(flag)) => flag.into(),
        Some(RobotsSpec::Config(robots)) => robots.into(),
    };
    config.groups = file
        .groups
        .into_iter()
        .map(|group| {
            let mut definition = SitemapGroupDefinition::new(
                group.name,
                compile_source(&file.base_url, group.source),
            );
            if let Some(page_size) = group.page_size {
                definition = definition.with_page_size(page_size);
            }
            definition
        })
        .collect();
    config
}
