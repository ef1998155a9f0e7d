//! Fetcher module for the catalog search pipeline.
//!
//! Retrieves raw catalog pages from the external source, optionally
//! through a file cache, and converts entries into validated products.

mod cache;
pub mod messages;

pub use cache::FetchCache;

use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, info, instrument, warn};

use crate::errors::PipelineError;
use catalog_search_shared::CatalogProduct;
use messages::{RawProduct, RawProductPage};

/// Configuration for the catalog fetcher.
#[derive(Debug, Clone)]
pub struct FetcherConfig {
    /// Base URL of the product listing endpoint.
    pub base_url: String,
    /// Page size used while paginating.
    pub page_limit: usize,
    /// HTTP request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            base_url: "https://dummyjson.com/products".to_string(),
            page_limit: 30,
            timeout_secs: 30,
        }
    }
}

/// Abstract interface for the external catalog source.
///
/// The orchestrator consumes the source through this trait so tests can
/// substitute a fixed record set.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Fetch every available record, paginating until the reported
    /// total is reached or the source is exhausted.
    async fn fetch_all(&self) -> Result<Vec<CatalogProduct>, PipelineError>;

    /// Fetch a single page of records.
    async fn fetch_page(&self, limit: usize, skip: usize)
        -> Result<Vec<CatalogProduct>, PipelineError>;
}

/// HTTP implementation of [`CatalogSource`] with an optional read-through
/// file cache.
pub struct HttpCatalogSource {
    http: reqwest::Client,
    config: FetcherConfig,
    cache: Option<FetchCache>,
}

impl HttpCatalogSource {
    /// Create a source without caching.
    pub fn new(config: FetcherConfig) -> Result<Self, PipelineError> {
        Self::build(config, None)
    }

    /// Create a source that reads and writes a file cache before
    /// touching the network.
    pub fn with_cache(config: FetcherConfig, cache: FetchCache) -> Result<Self, PipelineError> {
        Self::build(config, Some(cache))
    }

    fn build(config: FetcherConfig, cache: Option<FetchCache>) -> Result<Self, PipelineError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| PipelineError::fetch(e.to_string()))?;

        info!(base_url = %config.base_url, cached = cache.is_some(), "Catalog source ready");

        Ok(Self {
            http,
            config,
            cache,
        })
    }

    fn page_url(&self, limit: usize, skip: usize) -> String {
        format!("{}?limit={}&skip={}", self.config.base_url, limit, skip)
    }

    async fn fetch_live(&self, url: &str) -> Result<String, PipelineError> {
        self.http
            .get(url)
            .send()
            .await
            .map_err(|e| PipelineError::fetch(e.to_string()))?
            .error_for_status()
            .map_err(|e| PipelineError::fetch(e.to_string()))?
            .text()
            .await
            .map_err(|e| PipelineError::fetch(e.to_string()))
    }

    /// Fetch one raw page, consulting the cache first. A corrupt cache
    /// entry is logged and replaced by a live fetch; it never fails the
    /// call.
    async fn fetch_raw_page(&self, limit: usize, skip: usize)
        -> Result<RawProductPage, PipelineError> {
        let url = self.page_url(limit, skip);

        if let Some(cache) = &self.cache {
            if let Some(body) = cache.load(&url) {
                match serde_json::from_str(&body) {
                    Ok(page) => {
                        debug!(url = %url, "Serving catalog page from cache");
                        return Ok(page);
                    }
                    Err(e) => {
                        warn!(url = %url, error = %e, "Cached page unreadable, refetching");
                    }
                }
            }
        }

        let body = self.fetch_live(&url).await?;
        if let Some(cache) = &self.cache {
            cache.store(&url, &body);
        }

        serde_json::from_str(&body).map_err(|e| PipelineError::parse(e.to_string()))
    }

    /// Convert raw entries, skipping (and logging) any that fail
    /// validation. A single bad entry never aborts the fetch.
    fn convert(raw: Vec<RawProduct>) -> Vec<CatalogProduct> {
        raw.into_iter()
            .filter_map(|entry| match CatalogProduct::try_from(entry) {
                Ok(product) => Some(product),
                Err(reason) => {
                    warn!(reason = %reason, "Skipping catalog entry");
                    None
                }
            })
            .collect()
    }
}

#[async_trait]
impl CatalogSource for HttpCatalogSource {
    #[instrument(skip(self))]
    async fn fetch_all(&self) -> Result<Vec<CatalogProduct>, PipelineError> {
        let page_limit = self.config.page_limit;

        // Probe for the reported total before paginating.
        let first = self.fetch_raw_page(page_limit, 0).await?;
        let total = first.total as usize;
        if total == 0 || first.products.is_empty() {
            info!("Catalog source reported no products");
            return Ok(Vec::new());
        }

        let mut raw = first.products;
        let mut skip = raw.len();
        while skip < total {
            let page = self.fetch_raw_page(page_limit, skip).await?;
            if page.products.is_empty() {
                break;
            }
            let got = page.products.len();
            raw.extend(page.products);
            skip += got;
            debug!(fetched = skip, total = total, "Fetched catalog page");
            // A short page means the source is exhausted regardless of
            // the total it reported.
            if got < page_limit {
                break;
            }
        }

        let products = Self::convert(raw);
        info!(valid = products.len(), total = total, "Catalog fetch complete");
        Ok(products)
    }

    async fn fetch_page(&self, limit: usize, skip: usize)
        -> Result<Vec<CatalogProduct>, PipelineError> {
        let page = self.fetch_raw_page(limit, skip).await?;
        Ok(Self::convert(page.products))
    }
}
