//! Product store trait definition.
//!
//! This module defines the abstract interface for the relational system
//! of record, allowing different backend implementations (Postgres,
//! in-memory fakes for tests).

use async_trait::async_trait;

use crate::errors::StoreError;
use catalog_search_shared::{CatalogProduct, ProductRecord};

/// The outcome of persisting a single validated product.
///
/// Duplicates and per-record failures are explicit outcomes rather than
/// errors so callers can branch without catching anything.
#[derive(Debug)]
pub enum SaveOutcome {
    /// The product was inserted with all its sub-entities.
    Saved(ProductRecord),
    /// A product with the same dedup key already exists; nothing was
    /// written.
    Duplicate,
    /// The record's transaction failed and was rolled back. The batch
    /// continues.
    Failed(String),
}

/// Aggregate result of a `save_products` call.
#[derive(Debug, Default)]
pub struct SaveSummary {
    /// Records persisted by this call, in input order.
    pub saved: Vec<ProductRecord>,
    /// Records skipped because their dedup key was already persisted.
    pub duplicates: usize,
    /// Records whose transaction rolled back.
    pub failed: usize,
}

impl SaveSummary {
    /// Fold a single outcome into the summary.
    pub fn absorb(&mut self, outcome: SaveOutcome) {
        match outcome {
            SaveOutcome::Saved(record) => self.saved.push(record),
            SaveOutcome::Duplicate => self.duplicates += 1,
            SaveOutcome::Failed(_) => self.failed += 1,
        }
    }

    /// Total number of records this summary accounts for.
    pub fn total(&self) -> usize {
        self.saved.len() + self.duplicates + self.failed
    }
}

/// Filter for product listings.
#[derive(Debug, Clone, Default)]
pub struct ProductFilter {
    /// Restrict to products whose category label equals this value.
    pub category: Option<String>,
}

/// Offset/limit pagination for product listings.
#[derive(Debug, Clone, Copy)]
pub struct Pagination {
    pub offset: i64,
    pub limit: i64,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            offset: 0,
            limit: 10,
        }
    }
}

/// One page of products plus the unpaginated total for the filter.
#[derive(Debug)]
pub struct ProductPage {
    pub records: Vec<ProductRecord>,
    pub total: i64,
}

/// Abstract interface for the relational system of record.
///
/// All read paths return fully hydrated records: tags, dimensions,
/// images, and reviews are loaded eagerly so downstream indexing and
/// serialization never trip over missing sub-entities.
///
/// # Thread Safety
///
/// All implementations must be `Send + Sync` to allow use across async
/// tasks.
#[async_trait]
pub trait ProductStore: Send + Sync {
    /// Persist a batch of validated products, one atomic transaction
    /// per record.
    ///
    /// Per-record outcomes (duplicate skip, transaction rollback) are
    /// absorbed into the summary; the error return is reserved for the
    /// store itself becoming unreachable mid-batch.
    async fn save_products(&self, products: &[CatalogProduct]) -> Result<SaveSummary, StoreError>;

    /// Fetch one product by its primary id.
    async fn get_by_id(&self, id: i64) -> Result<Option<ProductRecord>, StoreError>;

    /// Fetch many products in a single batched read.
    ///
    /// Missing ids are simply absent from the result; the order of the
    /// returned records is not significant.
    async fn get_by_ids(&self, ids: &[i64]) -> Result<Vec<ProductRecord>, StoreError>;

    /// List products, newest first, optionally filtered by category.
    async fn list(
        &self,
        filter: &ProductFilter,
        page: &Pagination,
    ) -> Result<ProductPage, StoreError>;

    /// Distinct category labels currently referenced by persisted
    /// products.
    async fn list_categories(&self) -> Result<Vec<String>, StoreError>;

    /// Every persisted product with eager sub-entities. This is the
    /// full-reindex read path.
    async fn fetch_all(&self) -> Result<Vec<ProductRecord>, StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_absorbs_outcomes() {
        let mut summary = SaveSummary::default();
        summary.absorb(SaveOutcome::Duplicate);
        summary.absorb(SaveOutcome::Failed("boom".to_string()));
        summary.absorb(SaveOutcome::Duplicate);

        assert_eq!(summary.duplicates, 2);
        assert_eq!(summary.failed, 1);
        assert!(summary.saved.is_empty());
        assert_eq!(summary.total(), 3);
    }

    #[test]
    fn test_pagination_default() {
        let page = Pagination::default();
        assert_eq!(page.offset, 0);
        assert_eq!(page.limit, 10);
    }
}
