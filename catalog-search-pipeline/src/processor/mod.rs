//! Product processor implementation.
//!
//! Records coming out of the fetcher already passed field-level
//! validation; this stage applies the cross-field business rules that
//! decide whether a record may enter the store at all.

use tracing::{debug, instrument};

use catalog_search_shared::CatalogProduct;

/// Processor that filters validated products on business rules.
pub struct ProductProcessor;

impl ProductProcessor {
    /// Create a new product processor.
    pub fn new() -> Self {
        Self
    }

    /// Filter a batch, dropping records that fail a business rule.
    #[instrument(skip(self, products), fields(count = products.len()))]
    pub fn validate_batch(&self, products: Vec<CatalogProduct>) -> Vec<CatalogProduct> {
        let validated: Vec<CatalogProduct> = products
            .into_iter()
            .filter(|product| self.accept(product))
            .collect();

        debug!(validated = validated.len(), "Validated product batch");
        validated
    }

    /// A product needs a category to be persisted and indexed.
    fn accept(&self, product: &CatalogProduct) -> bool {
        if product.category.trim().is_empty() {
            debug!(sku = %product.sku, "Skipping product without category");
            return false;
        }
        true
    }
}

impl Default for ProductProcessor {
    fn default() -> Self {
        Self::new()
    }
}
