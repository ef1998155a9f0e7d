//! Raw catalog payload shapes and the parse-and-validate boundary.
//!
//! The external source speaks camelCase JSON with no guarantees beyond
//! a numeric id per entry. Everything downstream of this module works
//! with [`CatalogProduct`]; untyped payloads never cross the fetch
//! boundary.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use thiserror::Error;
use tracing::warn;

use catalog_search_shared::{CatalogProduct, Dimensions, ProductMeta, ReviewEntry};

/// Why a raw catalog entry was rejected during conversion.
///
/// A rejection skips that entry only; it never aborts the fetch.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RecordRejection {
    /// A required field is missing or empty.
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    /// A numeric field is outside its allowed range.
    #[error("field {field} out of range: {value}")]
    OutOfRange { field: &'static str, value: f64 },
}

/// One page of the paginated catalog response.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RawProductPage {
    pub total: u64,
    pub skip: u64,
    pub limit: u64,
    pub products: Vec<RawProduct>,
}

/// A raw catalog entry as reported by the source.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawProduct {
    pub id: Option<i64>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub price: Option<f64>,
    pub discount_percentage: Option<f64>,
    pub rating: Option<f64>,
    pub stock: Option<i64>,
    pub tags: Option<Vec<String>>,
    pub brand: Option<String>,
    pub sku: Option<String>,
    pub weight: Option<f64>,
    pub dimensions: Option<RawDimensions>,
    pub warranty_information: Option<String>,
    pub shipping_information: Option<String>,
    pub availability_status: Option<String>,
    pub reviews: Option<Vec<RawReview>>,
    pub return_policy: Option<String>,
    pub minimum_order_quantity: Option<i64>,
    pub images: Option<Vec<String>>,
    pub thumbnail: Option<String>,
    pub meta: Option<RawMeta>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RawDimensions {
    pub width: f64,
    pub height: f64,
    pub depth: f64,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawReview {
    pub rating: Option<i64>,
    pub comment: Option<String>,
    pub date: Option<String>,
    pub reviewer_name: Option<String>,
    pub reviewer_email: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawMeta {
    pub barcode: Option<String>,
    pub qr_code: Option<String>,
}

/// Require a non-empty string field.
fn required(value: Option<String>, field: &'static str) -> Result<String, RecordRejection> {
    match value {
        Some(s) if !s.trim().is_empty() => Ok(s),
        _ => Err(RecordRejection::MissingField(field)),
    }
}

/// Require a value within an inclusive range.
fn in_range(
    value: f64,
    field: &'static str,
    min: f64,
    max: f64,
) -> Result<f64, RecordRejection> {
    if (min..=max).contains(&value) {
        Ok(value)
    } else {
        Err(RecordRejection::OutOfRange { field, value })
    }
}

impl TryFrom<RawProduct> for CatalogProduct {
    type Error = RecordRejection;

    fn try_from(raw: RawProduct) -> Result<Self, Self::Error> {
        let id = raw.id.ok_or(RecordRejection::MissingField("id"))?;
        let sku = required(raw.sku, "sku")?;
        let title = required(raw.title, "title")?;

        let price = raw.price.ok_or(RecordRejection::MissingField("price"))?;
        let price = in_range(price, "price", 0.0, f64::MAX)?;
        let discount_percentage = in_range(
            raw.discount_percentage.unwrap_or(0.0),
            "discountPercentage",
            0.0,
            100.0,
        )?;
        let rating = in_range(raw.rating.unwrap_or(0.0), "rating", 0.0, 5.0)?;
        let stock = raw.stock.unwrap_or(0);
        if stock < 0 {
            return Err(RecordRejection::OutOfRange {
                field: "stock",
                value: stock as f64,
            });
        }
        let weight = raw.weight.unwrap_or(0.0);
        if weight < 0.0 {
            return Err(RecordRejection::OutOfRange {
                field: "weight",
                value: weight,
            });
        }

        let reviews = raw
            .reviews
            .unwrap_or_default()
            .into_iter()
            .filter_map(|review| convert_review(id, review))
            .collect();

        Ok(CatalogProduct {
            id,
            sku,
            title,
            description: raw.description.unwrap_or_default(),
            category: raw.category.unwrap_or_default(),
            brand: raw.brand.filter(|b| !b.trim().is_empty()),
            price,
            discount_percentage,
            rating,
            stock: stock as i32,
            weight: weight.round() as i32,
            warranty_information: raw.warranty_information.unwrap_or_default(),
            shipping_information: raw.shipping_information.unwrap_or_default(),
            availability_status: raw.availability_status.unwrap_or_default(),
            return_policy: raw.return_policy.unwrap_or_default(),
            minimum_order_quantity: raw.minimum_order_quantity.unwrap_or(1).max(1) as i32,
            thumbnail: raw.thumbnail.filter(|t| !t.trim().is_empty()),
            tags: raw.tags.unwrap_or_default(),
            images: raw.images.unwrap_or_default(),
            dimensions: raw.dimensions.map(|d| Dimensions {
                width: d.width,
                height: d.height,
                depth: d.depth,
            }),
            reviews,
            meta: raw.meta.map(|m| ProductMeta {
                barcode: m.barcode,
                qr_code: m.qr_code,
            }),
        })
    }
}

/// Convert one review, dropping it (with a warning) when its date is
/// missing or unparseable. A bad review never rejects its product.
fn convert_review(product_id: i64, review: RawReview) -> Option<ReviewEntry> {
    let date = review.date?;
    let reviewed_at = match DateTime::parse_from_rfc3339(&date) {
        Ok(dt) => dt.with_timezone(&Utc),
        Err(e) => {
            warn!(
                product_id = product_id,
                date = %date,
                error = %e,
                "Dropping review with malformed date"
            );
            return None;
        }
    };

    Some(ReviewEntry {
        rating: review.rating.unwrap_or(0) as i32,
        comment: review.comment.unwrap_or_default(),
        reviewer_name: review.reviewer_name.unwrap_or_default(),
        reviewer_email: review.reviewer_email.unwrap_or_default(),
        reviewed_at,
    })
}
