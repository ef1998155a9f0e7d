//! OpenSearch index configuration and mappings.
//!
//! This module defines the index settings and mappings for the product
//! search index.

use serde_json::{json, Value};

/// The name of the search index.
pub const INDEX_NAME: &str = "products";

/// Get the index settings and mappings for the product search index.
///
/// The configuration includes:
/// - **Text fields** with `keyword` subfields (`raw`) for the primary
///   searchable fields, so relevance matching and exact/substring
///   matching can coexist
/// - **Keyword fields** for filter-style fields (availability, tags)
/// - **Numeric/date fields** for price, rating, stock, and created_at
pub fn get_index_settings() -> Value {
    json!({
        "settings": {
            "number_of_shards": 1,
            "number_of_replicas": 1
        },
        "mappings": {
            "properties": {
                "id": {
                    "type": "long"
                },
                "title": {
                    "type": "text",
                    "fields": {
                        "raw": {
                            "type": "keyword"
                        }
                    }
                },
                "description": {
                    "type": "text"
                },
                "category": {
                    "type": "text",
                    "fields": {
                        "raw": {
                            "type": "keyword"
                        }
                    }
                },
                "brand": {
                    "type": "text",
                    "fields": {
                        "raw": {
                            "type": "keyword"
                        }
                    }
                },
                "price": {
                    "type": "double"
                },
                "discount_percentage": {
                    "type": "double"
                },
                "rating": {
                    "type": "double"
                },
                "stock": {
                    "type": "integer"
                },
                "availability_status": {
                    "type": "keyword"
                },
                "tags": {
                    "type": "keyword"
                },
                "created_at": {
                    "type": "date"
                }
            }
        }
    })
}
