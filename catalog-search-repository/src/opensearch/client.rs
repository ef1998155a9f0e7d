//! OpenSearch client implementation.
//!
//! This module provides the concrete implementation of
//! [`SearchEngineClient`] using the OpenSearch Rust client.

use async_trait::async_trait;
use opensearch::cluster::ClusterHealthParts;
use opensearch::http::request::JsonBody;
use opensearch::http::transport::{SingleNodeConnectionPool, TransportBuilder};
use opensearch::indices::{IndicesCreateParts, IndicesExistsParts};
use opensearch::{BulkParts, DeleteParts, IndexParts, OpenSearch, SearchParts};
use serde_json::{json, Value};
use tracing::{debug, error, info, warn};
use url::Url;

use crate::config::SearchConfig;
use crate::errors::SearchError;
use crate::interfaces::{BulkSummary, SearchEngineClient};
use crate::opensearch::index_config::{get_index_settings, INDEX_NAME};
use crate::opensearch::queries::build_search_body;
use catalog_search_shared::{ProductDocument, SearchHit, SearchQuery, SearchResponse};

/// OpenSearch-backed implementation of [`SearchEngineClient`].
///
/// The document id in the index is the product's store id, so search
/// hits can always be hydrated back against the system of record.
pub struct OpenSearchEngine {
    client: OpenSearch,
}

impl OpenSearchEngine {
    /// Create a new client connected to the configured URL.
    pub fn new(config: &SearchConfig) -> Result<Self, SearchError> {
        let parsed_url =
            Url::parse(&config.url).map_err(|e| SearchError::connection(e.to_string()))?;

        let conn_pool = SingleNodeConnectionPool::new(parsed_url);
        let transport = TransportBuilder::new(conn_pool)
            .disable_proxy()
            .build()
            .map_err(|e| SearchError::connection(e.to_string()))?;

        let client = OpenSearch::new(transport);

        info!(url = %config.url, index = %INDEX_NAME, "Created search engine client");

        Ok(Self { client })
    }

    /// Extract the product id and score from a single search hit.
    ///
    /// Only `_source.id` and `_score` are read; the index is never
    /// treated as authoritative for field values. Hits without a
    /// numeric id are dropped.
    fn parse_hit(hit: &Value) -> Option<SearchHit> {
        let id = hit["_source"]["id"].as_i64()?;
        let score = hit["_score"].as_f64().unwrap_or(0.0);
        Some(SearchHit { id, score })
    }

    /// Count accepted and rejected documents from a bulk response body.
    fn parse_bulk_items(body: &Value, submitted: usize) -> BulkSummary {
        let Some(items) = body["items"].as_array() else {
            // No per-item breakdown; treat the whole submission by the
            // top-level errors flag.
            return if body["errors"].as_bool().unwrap_or(false) {
                BulkSummary {
                    total: submitted,
                    succeeded: 0,
                    failed: submitted,
                }
            } else {
                BulkSummary::all_succeeded(submitted)
            };
        };

        let mut summary = BulkSummary {
            total: items.len(),
            succeeded: 0,
            failed: 0,
        };
        for item in items {
            let entry = &item["index"];
            if entry["error"].is_null() {
                summary.succeeded += 1;
            } else {
                warn!(
                    doc_id = %entry["_id"],
                    error = %entry["error"],
                    "Document rejected by bulk index"
                );
                summary.failed += 1;
            }
        }
        summary
    }
}

#[async_trait]
impl SearchEngineClient for OpenSearchEngine {
    async fn search(&self, query: &SearchQuery) -> Result<SearchResponse, SearchError> {
        if query.is_blank() {
            return Err(SearchError::InvalidQuery(
                "query text must not be blank".to_string(),
            ));
        }

        let response = self
            .client
            .search(SearchParts::Index(&[INDEX_NAME]))
            .body(build_search_body(query))
            .send()
            .await
            .map_err(|e| SearchError::connection(e.to_string()))?;

        let status = response.status_code();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            error!(status = %status, body = %error_body, "Search request failed");
            return Err(SearchError::query(format!(
                "Search failed with status {}: {}",
                status, error_body
            )));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| SearchError::parse(e.to_string()))?;

        let total = body["hits"]["total"]["value"].as_u64().unwrap_or(0);
        let hits = body["hits"]["hits"]
            .as_array()
            .map(|hits| hits.iter().filter_map(Self::parse_hit).collect())
            .unwrap_or_default();

        Ok(SearchResponse { total, hits })
    }

    async fn index_document(&self, document: &ProductDocument) -> Result<(), SearchError> {
        let doc_id = document.id.to_string();

        let response = self
            .client
            .index(IndexParts::IndexId(INDEX_NAME, &doc_id))
            .body(document)
            .send()
            .await
            .map_err(|e| SearchError::index(e.to_string()))?;

        let status = response.status_code();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            error!(status = %status, body = %error_body, "Index request failed");
            return Err(SearchError::index(format!(
                "Index failed with status {}: {}",
                status, error_body
            )));
        }

        debug!(doc_id = %doc_id, "Document indexed");
        Ok(())
    }

    async fn bulk_index(&self, documents: &[ProductDocument]) -> Result<BulkSummary, SearchError> {
        if documents.is_empty() {
            return Ok(BulkSummary::default());
        }

        let mut body: Vec<JsonBody<Value>> = Vec::with_capacity(documents.len() * 2);
        for document in documents {
            body.push(json!({ "index": { "_id": document.id.to_string() } }).into());
            let doc = serde_json::to_value(document)
                .map_err(|e| SearchError::serialization(e.to_string()))?;
            body.push(doc.into());
        }

        let response = self
            .client
            .bulk(BulkParts::Index(INDEX_NAME))
            .body(body)
            .send()
            .await
            .map_err(|e| SearchError::connection(e.to_string()))?;

        let status = response.status_code();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            error!(status = %status, body = %error_body, "Bulk request failed");
            return Err(SearchError::bulk_index(format!(
                "Bulk index failed with status {}: {}",
                status, error_body
            )));
        }

        let response_body: Value = response
            .json()
            .await
            .map_err(|e| SearchError::parse(e.to_string()))?;

        let summary = Self::parse_bulk_items(&response_body, documents.len());
        debug!(
            total = summary.total,
            succeeded = summary.succeeded,
            failed = summary.failed,
            "Bulk index batch accepted"
        );
        Ok(summary)
    }

    async fn delete_document(&self, id: i64) -> Result<bool, SearchError> {
        let doc_id = id.to_string();

        let response = self
            .client
            .delete(DeleteParts::IndexId(INDEX_NAME, &doc_id))
            .send()
            .await
            .map_err(|e| SearchError::delete(e.to_string()))?;

        let status = response.status_code();

        // 404 is acceptable - the document may not exist
        if status.as_u16() == 404 {
            debug!(doc_id = %doc_id, "Document already absent from index");
            return Ok(false);
        }
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            error!(status = %status, body = %error_body, "Delete request failed");
            return Err(SearchError::delete(format!(
                "Delete failed with status {}: {}",
                status, error_body
            )));
        }

        debug!(doc_id = %doc_id, "Document deleted");
        Ok(true)
    }

    async fn ensure_index_exists(&self) -> Result<(), SearchError> {
        let exists = self
            .client
            .indices()
            .exists(IndicesExistsParts::Index(&[INDEX_NAME]))
            .send()
            .await
            .map_err(|e| SearchError::connection(e.to_string()))?;

        if exists.status_code().is_success() {
            return Ok(());
        }

        let response = self
            .client
            .indices()
            .create(IndicesCreateParts::Index(INDEX_NAME))
            .body(get_index_settings())
            .send()
            .await
            .map_err(|e| SearchError::index_creation(e.to_string()))?;

        let status = response.status_code();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            return Err(SearchError::index_creation(format!(
                "Index creation failed with status {}: {}",
                status, error_body
            )));
        }

        info!(index = %INDEX_NAME, "Created search index");
        Ok(())
    }

    async fn health_check(&self) -> Result<bool, SearchError> {
        let response = self
            .client
            .cluster()
            .health(ClusterHealthParts::None)
            .send()
            .await
            .map_err(|e| SearchError::connection(e.to_string()))?;

        if !response.status_code().is_success() {
            return Ok(false);
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| SearchError::parse(e.to_string()))?;

        Ok(body["status"].as_str() != Some("red"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hit() {
        let hit = json!({
            "_source": {
                "id": 42,
                "title": "Gaming Laptop Pro"
            },
            "_score": 1.5
        });

        let result = OpenSearchEngine::parse_hit(&hit).unwrap();

        assert_eq!(result.id, 42);
        assert_eq!(result.score, 1.5);
    }

    #[test]
    fn test_parse_hit_missing_score_defaults_to_zero() {
        let hit = json!({
            "_source": { "id": 7 }
        });

        let result = OpenSearchEngine::parse_hit(&hit).unwrap();
        assert_eq!(result.score, 0.0);
    }

    #[test]
    fn test_parse_hit_without_id_is_dropped() {
        let hit = json!({
            "_source": { "title": "No identity" },
            "_score": 1.0
        });

        assert!(OpenSearchEngine::parse_hit(&hit).is_none());
    }

    #[test]
    fn test_parse_bulk_items_counts_failures() {
        let body = json!({
            "errors": true,
            "items": [
                { "index": { "_id": "1", "status": 201 } },
                { "index": { "_id": "2", "status": 400, "error": { "type": "mapper_parsing_exception" } } },
                { "index": { "_id": "3", "status": 201 } }
            ]
        });

        let summary = OpenSearchEngine::parse_bulk_items(&body, 3);

        assert_eq!(summary.total, 3);
        assert_eq!(summary.succeeded, 2);
        assert_eq!(summary.failed, 1);
    }

    #[test]
    fn test_parse_bulk_items_without_breakdown() {
        let clean = json!({ "errors": false });
        assert_eq!(
            OpenSearchEngine::parse_bulk_items(&clean, 5),
            BulkSummary::all_succeeded(5)
        );

        let broken = json!({ "errors": true });
        let summary = OpenSearchEngine::parse_bulk_items(&broken, 5);
        assert_eq!(summary.failed, 5);
        assert_eq!(summary.succeeded, 0);
    }
}
