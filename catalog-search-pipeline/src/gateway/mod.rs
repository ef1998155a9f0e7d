//! Search gateway for the catalog search pipeline.
//!
//! Executes a query against the search index, extracts the matched
//! identifiers, and hydrates full records from the system of record in
//! one batched read. The index response is never treated as
//! authoritative for field values.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, error, info, instrument};

use crate::errors::PipelineError;
use catalog_search_repository::{ProductStore, SearchEngineClient};
use catalog_search_shared::{ProductRecord, SearchMode, SearchQuery};

/// Gateway combining index lookups with store hydration.
pub struct SearchGateway {
    client: Arc<dyn SearchEngineClient>,
    store: Arc<dyn ProductStore>,
}

impl SearchGateway {
    /// Create a new search gateway.
    pub fn new(client: Arc<dyn SearchEngineClient>, store: Arc<dyn ProductStore>) -> Self {
        Self { client, store }
    }

    /// Search the catalog.
    ///
    /// Blank queries are rejected before the index is contacted. An
    /// unreachable index degrades to an empty result rather than an
    /// error; search must never take down the request path. Records
    /// come back in the index's relevance order, with stale hits (ids
    /// with no store row) silently excluded.
    #[instrument(skip(self))]
    pub async fn search(
        &self,
        query: &str,
        size: usize,
        mode: SearchMode,
    ) -> Result<Vec<ProductRecord>, PipelineError> {
        let trimmed = query.trim();
        if trimmed.is_empty() {
            return Err(PipelineError::invalid_query("query text must not be empty"));
        }

        let search_query = SearchQuery {
            query: trimmed.to_string(),
            size,
            mode,
        };

        let response = match self.client.search(&search_query).await {
            Ok(response) => response,
            Err(e) => {
                error!(error = %e, "Search index unavailable, returning empty result");
                return Ok(Vec::new());
            }
        };

        let ids = response.hit_ids();
        if ids.is_empty() {
            debug!(query = %trimmed, "No index hits");
            return Ok(Vec::new());
        }

        let records = self.store.get_by_ids(&ids).await?;
        let mut by_id: HashMap<i64, ProductRecord> =
            records.into_iter().map(|r| (r.id, r)).collect();

        // Re-assemble in index relevance order; hydration misses are
        // index staleness and drop out here.
        let hydrated: Vec<ProductRecord> =
            ids.iter().filter_map(|id| by_id.remove(id)).collect();

        info!(
            query = %trimmed,
            hits = ids.len(),
            hydrated = hydrated.len(),
            "Search complete"
        );
        Ok(hydrated)
    }
}
