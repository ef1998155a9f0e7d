//! Index publisher for the catalog search pipeline.
//!
//! Projects products into index documents and writes them to the search
//! engine in bounded chunks, absorbing per-chunk and per-document
//! failures into a success count.

use std::sync::Arc;

use tracing::{error, info, instrument, warn};

use crate::errors::PipelineError;
use catalog_search_repository::{ProductStore, SearchEngineClient};
use catalog_search_shared::{CatalogProduct, ProductDocument, ProductRecord};

/// Configuration for the index publisher.
#[derive(Debug, Clone)]
pub struct PublisherConfig {
    /// Number of documents submitted per bulk call.
    pub chunk_size: usize,
}

impl Default for PublisherConfig {
    fn default() -> Self {
        Self { chunk_size: 100 }
    }
}

/// Publisher that writes product documents into the search engine.
///
/// The publisher is responsible for:
/// - Projecting records into flat index documents
/// - Chunked bulk submission with partial-failure accounting
/// - The full-reindex path that rebuilds the index from the store
pub struct IndexPublisher {
    client: Arc<dyn SearchEngineClient>,
    store: Arc<dyn ProductStore>,
    config: PublisherConfig,
}

impl IndexPublisher {
    /// Create a publisher with the default chunk size.
    pub fn new(client: Arc<dyn SearchEngineClient>, store: Arc<dyn ProductStore>) -> Self {
        Self {
            client,
            store,
            config: PublisherConfig::default(),
        }
    }

    /// Create a publisher with custom configuration.
    pub fn with_config(
        client: Arc<dyn SearchEngineClient>,
        store: Arc<dyn ProductStore>,
        config: PublisherConfig,
    ) -> Self {
        Self {
            client,
            store,
            config,
        }
    }

    /// Bulk-index persisted records. Returns the number of documents
    /// the engine accepted.
    #[instrument(skip(self, records), fields(count = records.len()))]
    pub async fn bulk_index(&self, records: &[ProductRecord]) -> Result<usize, PipelineError> {
        let documents: Vec<ProductDocument> =
            records.iter().map(ProductDocument::from_record).collect();
        Ok(self.submit(documents).await)
    }

    /// Bulk-index validated products straight from the source, without
    /// a store roundtrip. Document ids are the source ids, which match
    /// the store's primary keys.
    #[instrument(skip(self, products), fields(count = products.len()))]
    pub async fn bulk_index_raw(&self, products: &[CatalogProduct]) -> Result<usize, PipelineError> {
        let documents: Vec<ProductDocument> =
            products.iter().map(ProductDocument::from_catalog).collect();
        Ok(self.submit(documents).await)
    }

    /// Delete a product's document from the index. Idempotent; returns
    /// whether the document existed.
    pub async fn delete(&self, id: i64) -> Result<bool, PipelineError> {
        let existed = self.client.delete_document(id).await?;
        Ok(existed)
    }

    /// Rebuild the entire index from the system of record.
    ///
    /// This is the disaster-recovery path: the index can be discarded
    /// and reconstructed from the store at any time.
    #[instrument(skip(self))]
    pub async fn reindex_all(&self) -> Result<usize, PipelineError> {
        let records = self.store.fetch_all().await?;
        if records.is_empty() {
            info!("Store is empty, nothing to reindex");
            return Ok(0);
        }

        info!(count = records.len(), "Reindexing all products");
        self.bulk_index(&records).await
    }

    /// Ensure the search index exists.
    pub async fn ensure_index(&self) -> Result<(), PipelineError> {
        self.client.ensure_index_exists().await?;
        Ok(())
    }

    /// Submit documents in chunks. A chunk rejected wholesale or a
    /// document rejected within a chunk is counted as unsuccessful and
    /// the remaining chunks still run.
    async fn submit(&self, documents: Vec<ProductDocument>) -> usize {
        if documents.is_empty() {
            return 0;
        }

        let total = documents.len();
        let mut succeeded = 0;
        for chunk in documents.chunks(self.config.chunk_size) {
            match self.client.bulk_index(chunk).await {
                Ok(summary) => {
                    succeeded += summary.succeeded;
                    if summary.failed > 0 {
                        warn!(
                            failed = summary.failed,
                            chunk = chunk.len(),
                            "Some documents were rejected by the index"
                        );
                    }
                }
                Err(e) => {
                    error!(
                        error = %e,
                        chunk = chunk.len(),
                        "Bulk chunk failed, continuing with remaining chunks"
                    );
                }
            }
        }

        info!(succeeded = succeeded, total = total, "Bulk indexing complete");
        succeeded
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{product, MemoryProductStore, MockSearchEngine};

    fn products(count: usize) -> Vec<catalog_search_shared::CatalogProduct> {
        (0..count)
            .map(|i| product(i as i64 + 1, &format!("SKU-{i}"), &format!("Product {i}"), "misc"))
            .collect()
    }

    #[tokio::test]
    async fn test_bulk_index_raw_counts_documents() {
        let client = Arc::new(MockSearchEngine::new());
        let store = Arc::new(MemoryProductStore::new());
        let publisher = IndexPublisher::new(client.clone(), store);

        let indexed = publisher.bulk_index_raw(&products(3)).await.unwrap();

        assert_eq!(indexed, 3);
        assert_eq!(client.indexed_count().await, 3);
    }

    #[tokio::test]
    async fn test_submission_is_chunked() {
        let client = Arc::new(MockSearchEngine::new());
        let store = Arc::new(MemoryProductStore::new());
        let publisher = IndexPublisher::with_config(
            client.clone(),
            store,
            PublisherConfig { chunk_size: 100 },
        );

        let indexed = publisher.bulk_index_raw(&products(250)).await.unwrap();

        assert_eq!(indexed, 250);
        assert_eq!(client.bulk_calls(), 3);
    }

    #[tokio::test]
    async fn test_rejected_documents_do_not_stop_the_batch() {
        let client = Arc::new(MockSearchEngine::rejecting(&[2, 150]));
        let store = Arc::new(MemoryProductStore::new());
        let publisher = IndexPublisher::with_config(
            client.clone(),
            store,
            PublisherConfig { chunk_size: 100 },
        );

        let indexed = publisher.bulk_index_raw(&products(200)).await.unwrap();

        assert_eq!(indexed, 198);
        assert_eq!(client.bulk_calls(), 2);
        assert!(!client.indexed_ids().await.contains(&2));
        assert!(!client.indexed_ids().await.contains(&150));
    }

    #[tokio::test]
    async fn test_reindex_all_reads_the_store() {
        let client = Arc::new(MockSearchEngine::new());
        let store = Arc::new(MemoryProductStore::new());
        store.save_products(&products(4)).await.unwrap();
        let publisher = IndexPublisher::new(client.clone(), store);

        let indexed = publisher.reindex_all().await.unwrap();

        assert_eq!(indexed, 4);
        assert_eq!(client.indexed_count().await, 4);
    }

    #[tokio::test]
    async fn test_reindex_all_on_empty_store_returns_zero() {
        let client = Arc::new(MockSearchEngine::new());
        let store = Arc::new(MemoryProductStore::new());
        let publisher = IndexPublisher::new(client.clone(), store);

        let indexed = publisher.reindex_all().await.unwrap();

        assert_eq!(indexed, 0);
        assert_eq!(client.indexed_count().await, 0);
        assert_eq!(client.bulk_calls(), 0);
    }

    #[tokio::test]
    async fn test_reindex_matches_incremental_indexing() {
        let store = Arc::new(MemoryProductStore::new());
        let summary = store.save_products(&products(5)).await.unwrap();

        // Index incrementally from the save results.
        let incremental = Arc::new(MockSearchEngine::new());
        let publisher = IndexPublisher::new(incremental.clone(), store.clone());
        publisher.bulk_index(&summary.saved).await.unwrap();

        // Rebuild a fresh index from the store.
        let rebuilt = Arc::new(MockSearchEngine::new());
        let publisher = IndexPublisher::new(rebuilt.clone(), store);
        publisher.reindex_all().await.unwrap();

        let mut incremental_ids = incremental.indexed_ids().await;
        let mut rebuilt_ids = rebuilt.indexed_ids().await;
        incremental_ids.sort_unstable();
        rebuilt_ids.sort_unstable();
        assert_eq!(incremental_ids, rebuilt_ids);
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let client = Arc::new(MockSearchEngine::new());
        let store = Arc::new(MemoryProductStore::new());
        let publisher = IndexPublisher::new(client.clone(), store);

        publisher.bulk_index_raw(&products(1)).await.unwrap();

        assert!(publisher.delete(1).await.unwrap());
        assert!(!publisher.delete(1).await.unwrap());
        assert!(!publisher.delete(999).await.unwrap());
    }
}
