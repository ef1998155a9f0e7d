//! Search engine client trait definition.
//!
//! This module defines the abstract interface for search engine
//! operations, allowing for different backend implementations
//! (OpenSearch, Elasticsearch, mocks).

use async_trait::async_trait;

use crate::errors::SearchError;
use catalog_search_shared::{ProductDocument, SearchQuery, SearchResponse};

/// Aggregate result of a bulk indexing call.
///
/// A bulk submission can partially succeed: individual documents may be
/// rejected while the rest of the batch is accepted. Callers use the
/// summary to account for both without treating the call as failed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BulkSummary {
    /// Number of documents submitted.
    pub total: usize,
    /// Number of documents the engine accepted.
    pub succeeded: usize,
    /// Number of documents the engine rejected.
    pub failed: usize,
}

impl BulkSummary {
    /// A summary where every submitted document was accepted.
    pub fn all_succeeded(total: usize) -> Self {
        Self {
            total,
            succeeded: total,
            failed: 0,
        }
    }

    /// Accumulate another summary into this one.
    pub fn merge(&mut self, other: BulkSummary) {
        self.total += other.total;
        self.succeeded += other.succeeded;
        self.failed += other.failed;
    }
}

/// Abstract interface for search engine operations.
///
/// The engine is a derived view: it answers queries with document
/// identifiers and scores, and the caller hydrates full records from
/// the system of record.
///
/// # Thread Safety
///
/// All implementations must be `Send + Sync` to allow use across async
/// tasks.
#[async_trait]
pub trait SearchEngineClient: Send + Sync {
    /// Execute a search query against the index.
    ///
    /// Returns hits ordered by relevance. Only identifiers and scores
    /// are extracted from the engine's response.
    async fn search(&self, query: &SearchQuery) -> Result<SearchResponse, SearchError>;

    /// Index a single document. An existing document with the same id
    /// is overwritten.
    async fn index_document(&self, document: &ProductDocument) -> Result<(), SearchError>;

    /// Index multiple documents in a single bulk operation.
    ///
    /// Individual document rejections are reported through the summary
    /// and do not fail the call; the error return is reserved for the
    /// submission itself failing (engine unreachable, malformed
    /// request).
    async fn bulk_index(&self, documents: &[ProductDocument]) -> Result<BulkSummary, SearchError>;

    /// Delete a document from the index.
    ///
    /// Idempotent: deleting a document that does not exist is not an
    /// error and returns `false`.
    async fn delete_document(&self, id: i64) -> Result<bool, SearchError>;

    /// Ensure the search index exists with proper mappings.
    ///
    /// This should be called during application startup.
    async fn ensure_index_exists(&self) -> Result<(), SearchError>;

    /// Check if the search engine is healthy and reachable.
    async fn health_check(&self) -> Result<bool, SearchError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bulk_summary_merge() {
        let mut summary = BulkSummary::all_succeeded(100);
        summary.merge(BulkSummary {
            total: 50,
            succeeded: 47,
            failed: 3,
        });

        assert_eq!(summary.total, 150);
        assert_eq!(summary.succeeded, 147);
        assert_eq!(summary.failed, 3);
    }
}
