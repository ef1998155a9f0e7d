//! Product types shared across the pipeline.
//!
//! `CatalogProduct` is the typed output of the fetch boundary: a record
//! that passed parsing and range validation but has not been persisted.
//! `ProductRecord` is the persisted form, carrying store identity,
//! timestamps, and eagerly loaded sub-entities.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Physical dimensions of a product (one-to-one with the product row).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: f64,
    pub height: f64,
    pub depth: f64,
}

/// A customer review attached to a product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewEntry {
    pub rating: i32,
    pub comment: String,
    pub reviewer_name: String,
    pub reviewer_email: String,
    pub reviewed_at: DateTime<Utc>,
}

/// Barcode / QR metadata reported by the catalog source.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductMeta {
    pub barcode: Option<String>,
    pub qr_code: Option<String>,
}

/// A stored product image. The source's thumbnail is persisted as an
/// image row with `is_thumbnail` set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageRecord {
    pub url: String,
    pub is_thumbnail: bool,
}

/// A validated catalog record, produced by the fetch boundary and
/// consumed by the persistence store and the index publisher.
///
/// Invariants enforced at the parse boundary:
/// - `id` is the source's numeric identifier (becomes the store id)
/// - `sku` is the non-empty dedup key
/// - `title` is non-empty
/// - `price`, `stock`, `weight` are non-negative
/// - `rating` is within `[0, 5]`, `discount_percentage` within `[0, 100]`
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogProduct {
    pub id: i64,
    pub sku: String,
    pub title: String,
    pub description: String,
    pub category: String,
    pub brand: Option<String>,
    pub price: f64,
    pub discount_percentage: f64,
    pub rating: f64,
    pub stock: i32,
    pub weight: i32,
    pub warranty_information: String,
    pub shipping_information: String,
    pub availability_status: String,
    pub return_policy: String,
    pub minimum_order_quantity: i32,
    pub thumbnail: Option<String>,
    pub tags: Vec<String>,
    pub images: Vec<String>,
    pub dimensions: Option<Dimensions>,
    pub reviews: Vec<ReviewEntry>,
    pub meta: Option<ProductMeta>,
}

/// A persisted product with store identity, timestamps, and eagerly
/// loaded sub-entities. This is the hydrated shape returned by every
/// read path, including search results.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductRecord {
    pub id: i64,
    pub sku: String,
    pub title: String,
    pub description: String,
    pub category: String,
    pub brand: Option<String>,
    pub price: f64,
    pub discount_percentage: f64,
    pub rating: f64,
    pub stock: i32,
    pub weight: i32,
    pub warranty_information: String,
    pub shipping_information: String,
    pub availability_status: String,
    pub return_policy: String,
    pub minimum_order_quantity: i32,
    pub thumbnail: Option<String>,
    pub barcode: Option<String>,
    pub qr_code: Option<String>,
    pub tags: Vec<String>,
    pub dimensions: Option<Dimensions>,
    pub images: Vec<ImageRecord>,
    pub reviews: Vec<ReviewEntry>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ProductRecord {
    /// Build the persisted view of a validated product.
    ///
    /// Applies the same normalization the store applies on write: tag
    /// names are trimmed and lowercased (empty ones dropped, duplicates
    /// collapsed), and the thumbnail becomes a flagged image row.
    pub fn from_catalog(
        product: &CatalogProduct,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        let mut tags: Vec<String> = Vec::with_capacity(product.tags.len());
        for raw in &product.tags {
            let tag = raw.trim().to_lowercase();
            if !tag.is_empty() && !tags.contains(&tag) {
                tags.push(tag);
            }
        }

        let mut images: Vec<ImageRecord> = product
            .images
            .iter()
            .map(|url| ImageRecord {
                url: url.clone(),
                is_thumbnail: false,
            })
            .collect();
        if let Some(thumbnail) = &product.thumbnail {
            images.push(ImageRecord {
                url: thumbnail.clone(),
                is_thumbnail: true,
            });
        }

        let meta = product.meta.clone().unwrap_or_default();

        Self {
            id: product.id,
            sku: product.sku.clone(),
            title: product.title.clone(),
            description: product.description.clone(),
            category: product.category.clone(),
            brand: product.brand.clone(),
            price: product.price,
            discount_percentage: product.discount_percentage,
            rating: product.rating,
            stock: product.stock,
            weight: product.weight,
            warranty_information: product.warranty_information.clone(),
            shipping_information: product.shipping_information.clone(),
            availability_status: product.availability_status.clone(),
            return_policy: product.return_policy.clone(),
            minimum_order_quantity: product.minimum_order_quantity,
            thumbnail: product.thumbnail.clone(),
            barcode: meta.barcode,
            qr_code: meta.qr_code,
            tags,
            dimensions: product.dimensions,
            images,
            reviews: product.reviews.clone(),
            created_at,
            updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_product() -> CatalogProduct {
        CatalogProduct {
            id: 7,
            sku: "SKU-7".to_string(),
            title: "Gaming Laptop Pro".to_string(),
            description: "A fast laptop".to_string(),
            category: "laptops".to_string(),
            brand: Some("Acme".to_string()),
            price: 1299.99,
            discount_percentage: 10.0,
            rating: 4.5,
            stock: 12,
            weight: 3,
            warranty_information: "1 year".to_string(),
            shipping_information: "Ships in 3 days".to_string(),
            availability_status: "In Stock".to_string(),
            return_policy: "30 days".to_string(),
            minimum_order_quantity: 1,
            thumbnail: Some("https://cdn.example/thumb.png".to_string()),
            tags: vec![" Laptops ".to_string(), "laptops".to_string(), "gaming".to_string()],
            images: vec!["https://cdn.example/1.png".to_string()],
            dimensions: Some(Dimensions {
                width: 35.0,
                height: 2.5,
                depth: 25.0,
            }),
            reviews: vec![],
            meta: Some(ProductMeta {
                barcode: Some("0123456789".to_string()),
                qr_code: None,
            }),
        }
    }

    #[test]
    fn test_from_catalog_normalizes_tags() {
        let now = Utc::now();
        let record = ProductRecord::from_catalog(&sample_product(), now, now);

        assert_eq!(record.tags, vec!["laptops".to_string(), "gaming".to_string()]);
    }

    #[test]
    fn test_from_catalog_flags_thumbnail_image() {
        let now = Utc::now();
        let record = ProductRecord::from_catalog(&sample_product(), now, now);

        assert_eq!(record.images.len(), 2);
        assert!(!record.images[0].is_thumbnail);
        assert!(record.images[1].is_thumbnail);
        assert_eq!(record.images[1].url, "https://cdn.example/thumb.png");
    }

    #[test]
    fn test_from_catalog_keeps_identity_and_meta() {
        let now = Utc::now();
        let record = ProductRecord::from_catalog(&sample_product(), now, now);

        assert_eq!(record.id, 7);
        assert_eq!(record.sku, "SKU-7");
        assert_eq!(record.barcode, Some("0123456789".to_string()));
        assert!(record.qr_code.is_none());
        assert_eq!(record.created_at, now);
    }
}
