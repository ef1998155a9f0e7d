//! In-memory fakes shared by the pipeline test modules.

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;

use catalog_search_repository::{
    BulkSummary, Pagination, ProductFilter, ProductPage, ProductStore, SaveOutcome, SaveSummary,
    SearchEngineClient, SearchError, StoreError,
};
use catalog_search_shared::{
    CatalogProduct, ProductDocument, ProductRecord, SearchQuery, SearchResponse,
};

use crate::errors::PipelineError;
use crate::fetcher::CatalogSource;

/// Build a minimal valid catalog product for tests.
pub fn product(id: i64, sku: &str, title: &str, category: &str) -> CatalogProduct {
    CatalogProduct {
        id,
        sku: sku.to_string(),
        title: title.to_string(),
        description: format!("{title} description"),
        category: category.to_string(),
        brand: Some("Acme".to_string()),
        price: 9.99,
        discount_percentage: 0.0,
        rating: 4.0,
        stock: 5,
        weight: 1,
        warranty_information: String::new(),
        shipping_information: String::new(),
        availability_status: "In Stock".to_string(),
        return_policy: String::new(),
        minimum_order_quantity: 1,
        thumbnail: None,
        tags: vec![category.to_string()],
        images: Vec::new(),
        dimensions: None,
        reviews: Vec::new(),
        meta: None,
    }
}

/// In-memory product store with SKU dedup and injectable per-record
/// failures.
pub struct MemoryProductStore {
    records: Mutex<Vec<ProductRecord>>,
    fail_skus: HashSet<String>,
    get_by_ids_calls: AtomicUsize,
}

impl MemoryProductStore {
    pub fn new() -> Self {
        Self {
            records: Mutex::new(Vec::new()),
            fail_skus: HashSet::new(),
            get_by_ids_calls: AtomicUsize::new(0),
        }
    }

    /// A store where saving any of the given SKUs rolls back.
    pub fn failing_on(skus: &[&str]) -> Self {
        Self {
            records: Mutex::new(Vec::new()),
            fail_skus: skus.iter().map(|s| s.to_string()).collect(),
            get_by_ids_calls: AtomicUsize::new(0),
        }
    }

    pub async fn count(&self) -> usize {
        self.records.lock().await.len()
    }

    pub fn hydration_calls(&self) -> usize {
        self.get_by_ids_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ProductStore for MemoryProductStore {
    async fn save_products(&self, products: &[CatalogProduct]) -> Result<SaveSummary, StoreError> {
        let mut records = self.records.lock().await;
        let mut summary = SaveSummary::default();

        for product in products {
            if self.fail_skus.contains(&product.sku) {
                summary.absorb(SaveOutcome::Failed("injected failure".to_string()));
                continue;
            }
            if records.iter().any(|r| r.sku == product.sku) {
                summary.absorb(SaveOutcome::Duplicate);
                continue;
            }
            let now = Utc::now();
            let record = ProductRecord::from_catalog(product, now, now);
            records.push(record.clone());
            summary.absorb(SaveOutcome::Saved(record));
        }

        Ok(summary)
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<ProductRecord>, StoreError> {
        let records = self.records.lock().await;
        Ok(records.iter().find(|r| r.id == id).cloned())
    }

    async fn get_by_ids(&self, ids: &[i64]) -> Result<Vec<ProductRecord>, StoreError> {
        self.get_by_ids_calls.fetch_add(1, Ordering::SeqCst);
        let records = self.records.lock().await;
        Ok(records
            .iter()
            .filter(|r| ids.contains(&r.id))
            .cloned()
            .collect())
    }

    async fn list(
        &self,
        filter: &ProductFilter,
        page: &Pagination,
    ) -> Result<ProductPage, StoreError> {
        let records = self.records.lock().await;
        let mut matching: Vec<ProductRecord> = records
            .iter()
            .filter(|r| match &filter.category {
                Some(category) => &r.category == category,
                None => true,
            })
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        let total = matching.len() as i64;
        let records = matching
            .into_iter()
            .skip(page.offset as usize)
            .take(page.limit as usize)
            .collect();

        Ok(ProductPage { records, total })
    }

    async fn list_categories(&self) -> Result<Vec<String>, StoreError> {
        let records = self.records.lock().await;
        let mut categories: Vec<String> = records.iter().map(|r| r.category.clone()).collect();
        categories.sort();
        categories.dedup();
        Ok(categories)
    }

    async fn fetch_all(&self) -> Result<Vec<ProductRecord>, StoreError> {
        Ok(self.records.lock().await.clone())
    }
}

/// Mock search engine recording indexed documents, with injectable
/// per-document rejections, a canned search response, and an
/// unreachable mode.
pub struct MockSearchEngine {
    indexed: Mutex<Vec<ProductDocument>>,
    bulk_calls: AtomicUsize,
    reject_ids: HashSet<i64>,
    response: Mutex<SearchResponse>,
    unreachable: bool,
}

impl MockSearchEngine {
    pub fn new() -> Self {
        Self {
            indexed: Mutex::new(Vec::new()),
            bulk_calls: AtomicUsize::new(0),
            reject_ids: HashSet::new(),
            response: Mutex::new(SearchResponse::empty()),
            unreachable: false,
        }
    }

    /// An engine whose every call fails with a connection error.
    pub fn offline() -> Self {
        Self {
            unreachable: true,
            ..Self::new()
        }
    }

    /// An engine that rejects the given document ids during bulk
    /// indexing.
    pub fn rejecting(ids: &[i64]) -> Self {
        Self {
            reject_ids: ids.iter().copied().collect(),
            ..Self::new()
        }
    }

    pub async fn set_response(&self, response: SearchResponse) {
        *self.response.lock().await = response;
    }

    pub async fn indexed_ids(&self) -> Vec<i64> {
        self.indexed.lock().await.iter().map(|d| d.id).collect()
    }

    pub async fn indexed_count(&self) -> usize {
        self.indexed.lock().await.len()
    }

    pub fn bulk_calls(&self) -> usize {
        self.bulk_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SearchEngineClient for MockSearchEngine {
    async fn search(&self, _query: &SearchQuery) -> Result<SearchResponse, SearchError> {
        if self.unreachable {
            return Err(SearchError::connection("search engine offline"));
        }
        Ok(self.response.lock().await.clone())
    }

    async fn index_document(&self, document: &ProductDocument) -> Result<(), SearchError> {
        if self.unreachable {
            return Err(SearchError::connection("search engine offline"));
        }
        self.indexed.lock().await.push(document.clone());
        Ok(())
    }

    async fn bulk_index(&self, documents: &[ProductDocument]) -> Result<BulkSummary, SearchError> {
        if self.unreachable {
            return Err(SearchError::connection("search engine offline"));
        }
        self.bulk_calls.fetch_add(1, Ordering::SeqCst);

        let mut summary = BulkSummary {
            total: documents.len(),
            succeeded: 0,
            failed: 0,
        };
        let mut indexed = self.indexed.lock().await;
        for document in documents {
            if self.reject_ids.contains(&document.id) {
                summary.failed += 1;
            } else {
                indexed.push(document.clone());
                summary.succeeded += 1;
            }
        }
        Ok(summary)
    }

    async fn delete_document(&self, id: i64) -> Result<bool, SearchError> {
        if self.unreachable {
            return Err(SearchError::connection("search engine offline"));
        }
        let mut indexed = self.indexed.lock().await;
        let before = indexed.len();
        indexed.retain(|d| d.id != id);
        Ok(indexed.len() < before)
    }

    async fn ensure_index_exists(&self) -> Result<(), SearchError> {
        if self.unreachable {
            return Err(SearchError::connection("search engine offline"));
        }
        Ok(())
    }

    async fn health_check(&self) -> Result<bool, SearchError> {
        Ok(!self.unreachable)
    }
}

/// Catalog source serving a fixed record set.
pub struct StaticCatalogSource {
    products: Vec<CatalogProduct>,
}

impl StaticCatalogSource {
    pub fn new(products: Vec<CatalogProduct>) -> Self {
        Self { products }
    }
}

#[async_trait]
impl CatalogSource for StaticCatalogSource {
    async fn fetch_all(&self) -> Result<Vec<CatalogProduct>, PipelineError> {
        Ok(self.products.clone())
    }

    async fn fetch_page(
        &self,
        limit: usize,
        skip: usize,
    ) -> Result<Vec<CatalogProduct>, PipelineError> {
        Ok(self
            .products
            .iter()
            .skip(skip)
            .take(limit)
            .cloned()
            .collect())
    }
}

/// Catalog source that always fails, for run-level error tests.
pub struct OfflineCatalogSource;

#[async_trait]
impl CatalogSource for OfflineCatalogSource {
    async fn fetch_all(&self) -> Result<Vec<CatalogProduct>, PipelineError> {
        Err(PipelineError::fetch("connection refused"))
    }

    async fn fetch_page(
        &self,
        _limit: usize,
        _skip: usize,
    ) -> Result<Vec<CatalogProduct>, PipelineError> {
        Err(PipelineError::fetch("connection refused"))
    }
}
