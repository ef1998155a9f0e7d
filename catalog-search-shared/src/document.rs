//! Search index document.
//!
//! A `ProductDocument` is the denormalized, flattened projection of a
//! product that gets written to the search index. The index is a
//! derived, rebuildable view: the only field the read path trusts is
//! `id`, which always equals the persisted product's primary identity
//! and is used to hydrate full records from the store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::product::{CatalogProduct, ProductRecord};

/// Flattened product projection submitted to the search index.
///
/// Timestamps serialize as ISO-8601 strings and all numerics as plain
/// floats/integers so any search backend can accept them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductDocument {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub category: String,
    pub brand: Option<String>,
    pub price: f64,
    pub discount_percentage: f64,
    pub rating: f64,
    pub stock: i32,
    pub availability_status: String,
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl ProductDocument {
    /// Project a persisted record into its index document.
    pub fn from_record(record: &ProductRecord) -> Self {
        Self {
            id: record.id,
            title: record.title.clone(),
            description: record.description.clone(),
            category: record.category.clone(),
            brand: record.brand.clone(),
            price: record.price,
            discount_percentage: record.discount_percentage,
            rating: record.rating,
            stock: record.stock,
            availability_status: record.availability_status.clone(),
            tags: record.tags.clone(),
            created_at: record.created_at,
        }
    }

    /// Project a validated product straight from the source, bypassing
    /// the store roundtrip (index-from-source mode). The document id is
    /// the source id, which is also the store's primary key, so
    /// hydration stays consistent. `created_at` is stamped at indexing
    /// time since no store timestamp exists yet.
    pub fn from_catalog(product: &CatalogProduct) -> Self {
        Self {
            id: product.id,
            title: product.title.clone(),
            description: product.description.clone(),
            category: product.category.clone(),
            brand: product.brand.clone(),
            price: product.price,
            discount_percentage: product.discount_percentage,
            rating: product.rating,
            stock: product.stock,
            availability_status: product.availability_status.clone(),
            tags: product.tags.clone(),
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::product::{Dimensions, ProductMeta};

    fn sample_record() -> ProductRecord {
        let product = CatalogProduct {
            id: 42,
            sku: "SKU-42".to_string(),
            title: "Desk Lamp".to_string(),
            description: "A warm light".to_string(),
            category: "lighting".to_string(),
            brand: Some("Lumen".to_string()),
            price: 24.99,
            discount_percentage: 0.0,
            rating: 4.1,
            stock: 80,
            weight: 1,
            warranty_information: "6 months".to_string(),
            shipping_information: "Ships overnight".to_string(),
            availability_status: "In Stock".to_string(),
            return_policy: "No returns".to_string(),
            minimum_order_quantity: 1,
            thumbnail: None,
            tags: vec!["lighting".to_string(), "desk".to_string()],
            images: vec![],
            dimensions: Some(Dimensions {
                width: 10.0,
                height: 40.0,
                depth: 10.0,
            }),
            reviews: vec![],
            meta: Some(ProductMeta::default()),
        };
        ProductRecord::from_catalog(&product, Utc::now(), Utc::now())
    }

    #[test]
    fn test_from_record_identity_and_fields() {
        let record = sample_record();
        let doc = ProductDocument::from_record(&record);

        assert_eq!(doc.id, record.id);
        assert_eq!(doc.title, "Desk Lamp");
        assert_eq!(doc.category, "lighting");
        assert_eq!(doc.brand, Some("Lumen".to_string()));
        assert_eq!(doc.created_at, record.created_at);
    }

    #[test]
    fn test_document_serializes_timestamp_as_iso8601() {
        let record = sample_record();
        let doc = ProductDocument::from_record(&record);

        let value = serde_json::to_value(&doc).unwrap();
        let created_at = value["created_at"].as_str().unwrap();
        assert!(created_at.contains('T'), "expected ISO-8601, got {created_at}");
        assert_eq!(value["id"].as_i64(), Some(record.id));
        assert_eq!(value["price"].as_f64(), Some(24.99));
    }
}
