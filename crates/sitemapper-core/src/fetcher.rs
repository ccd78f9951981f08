//! HTTP helpers for remote URL sources.
//!
//! Both fetchers share the same failure contract: any transport error,
//! non-success status, body that fails to parse, or (for GraphQL) a
//! non-empty `errors` array collapses to `None`. The source resolver treats
//! `None` identically to "no data", so a flaky endpoint degrades a sitemap
//! instead of failing the build. Request timeouts (30s by default) fall
//! under the same contract.

use crate::{Error, Result};
use reqwest::Client;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use serde_json::{Value, json};
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, warn};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

fn build_header_map(headers: &HashMap<String, String>) -> Result<HeaderMap> {
    let mut map = HeaderMap::new();
    map.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    for (name, value) in headers {
        let name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|e| Error::Config(format!("Invalid header name '{name}': {e}")))?;
        let value = HeaderValue::from_str(value)
            .map_err(|e| Error::Config(format!("Invalid header value for '{name:?}': {e}")))?;
        map.insert(name, value);
    }
    Ok(map)
}

fn build_client(timeout: Duration) -> Result<Client> {
    Client::builder()
        .timeout(timeout)
        .user_agent(concat!("sitemapper/", env!("CARGO_PKG_VERSION")))
        .gzip(true)
        .build()
        .map_err(Error::Network)
}

/// Configuration for a [`GraphQlFetcher`].
#[derive(Debug, Clone, Default)]
pub struct GraphQlFetcherConfig {
    /// GraphQL endpoint URL.
    pub url: String,
    /// Extra request headers merged over the default `Content-Type`.
    pub headers: HashMap<String, String>,
}

/// Executor for GraphQL queries against a fixed endpoint.
pub struct GraphQlFetcher {
    client: Client,
    url: String,
    headers: HeaderMap,
}

impl GraphQlFetcher {
    /// Creates a fetcher with the default request timeout.
    pub fn new(config: GraphQlFetcherConfig) -> Result<Self> {
        Self::with_timeout(config, DEFAULT_TIMEOUT)
    }

    /// Creates a fetcher with a custom request timeout (primarily for tests).
    pub fn with_timeout(config: GraphQlFetcherConfig, timeout: Duration) -> Result<Self> {
        Ok(Self {
            client: build_client(timeout)?,
            url: config.url,
            headers: build_header_map(&config.headers)?,
        })
    }

    /// Issues one query and returns the response's `data` field.
    ///
    /// Returns `None` on transport failure, non-success status, unparseable
    /// body, or an application-level `errors` array.
    pub async fn query(&self, query: &str, variables: Option<&Value>) -> Option<Value> {
        let mut body = json!({ "query": query });
        if let (Some(vars), Some(map)) = (variables, body.as_object_mut()) {
            map.insert("variables".to_string(), vars.clone());
        }

        let response = match self
            .client
            .post(&self.url)
            .headers(self.headers.clone())
            .json(&body)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                warn!("GraphQL request to {} failed: {e}", self.url);
                return None;
            },
        };

        let status = response.status();
        let payload: Value = match response.json().await {
            Ok(payload) => payload,
            Err(e) => {
                warn!("GraphQL response from {} unparseable: {e}", self.url);
                return None;
            },
        };

        if !status.is_success() {
            warn!("GraphQL endpoint {} returned status {status}", self.url);
            return None;
        }

        if let Some(errors) = payload.get("errors").and_then(Value::as_array)
            && !errors.is_empty()
        {
            warn!(
                "GraphQL endpoint {} returned {} error(s)",
                self.url,
                errors.len()
            );
            return None;
        }

        debug!("GraphQL query against {} succeeded", self.url);
        payload.get("data").cloned()
    }
}

/// Configuration for a [`JsonFetcher`].
#[derive(Debug, Clone, Default)]
pub struct JsonFetcherConfig {
    /// Extra request headers merged over the default `Content-Type`.
    pub headers: HashMap<String, String>,
}

/// Generic JSON GET helper with the same `None`-on-failure contract as
/// [`GraphQlFetcher`].
pub struct JsonFetcher {
    client: Client,
    headers: HeaderMap,
}

impl JsonFetcher {
    /// Creates a fetcher with the default request timeout.
    pub fn new(config: JsonFetcherConfig) -> Result<Self> {
        Self::with_timeout(config, DEFAULT_TIMEOUT)
    }

    /// Creates a fetcher with a custom request timeout (primarily for tests).
    pub fn with_timeout(config: JsonFetcherConfig, timeout: Duration) -> Result<Self> {
        Ok(Self {
            client: build_client(timeout)?,
            headers: build_header_map(&config.headers)?,
        })
    }

    /// GETs a URL and parses the body as JSON.
    pub async fn get(&self, url: &str) -> Option<Value> {
        let response = match self
            .client
            .get(url)
            .headers(self.headers.clone())
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                warn!("GET {url} failed: {e}");
                return None;
            },
        };

        if !response.status().is_success() {
            warn!("GET {url} returned status {}", response.status());
            return None;
        }

        match response.json().await {
            Ok(payload) => Some(payload),
            Err(e) => {
                warn!("Response from {url} unparseable: {e}");
                None
            },
        }
    }
}
