//! Ingestion orchestrator for the catalog search pipeline.
//!
//! Coordinates one linear ingestion run: fetch, validate, persist,
//! index. Any stage yielding zero records short-circuits the run with a
//! log line, not an error. A separate entry point rebuilds the index
//! from the store without fetching.

use std::sync::Arc;

use tracing::{info, instrument, warn};

use crate::errors::PipelineError;
use crate::fetcher::CatalogSource;
use crate::loader::IndexPublisher;
use crate::processor::ProductProcessor;
use catalog_search_repository::ProductStore;

/// Which records the INDEX stage publishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IndexingMode {
    /// Index the records the store accepted this run. Dedup-skipped and
    /// failed records never reach the index.
    #[default]
    FromStore,
    /// Index the fetched records directly, decoupling indexing latency
    /// from the relational write path.
    FromSource,
}

/// Counters describing one ingestion run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestReport {
    /// Records returned by the catalog source.
    pub fetched: usize,
    /// Records that passed cross-field validation.
    pub validated: usize,
    /// Records newly persisted this run.
    pub saved: usize,
    /// Records skipped because their SKU was already persisted.
    pub duplicates: usize,
    /// Records whose persistence transaction rolled back.
    pub failed: usize,
    /// Documents accepted by the search index.
    pub indexed: usize,
}

/// Orchestrator composing the fetcher, processor, store, and publisher
/// into one pipeline.
pub struct IngestOrchestrator {
    source: Arc<dyn CatalogSource>,
    processor: ProductProcessor,
    store: Arc<dyn ProductStore>,
    publisher: IndexPublisher,
    mode: IndexingMode,
}

impl IngestOrchestrator {
    /// Create an orchestrator indexing from the store (the default).
    pub fn new(
        source: Arc<dyn CatalogSource>,
        store: Arc<dyn ProductStore>,
        publisher: IndexPublisher,
    ) -> Self {
        Self {
            source,
            processor: ProductProcessor::new(),
            store,
            publisher,
            mode: IndexingMode::default(),
        }
    }

    /// Create an orchestrator with an explicit indexing mode.
    pub fn with_mode(
        source: Arc<dyn CatalogSource>,
        store: Arc<dyn ProductStore>,
        publisher: IndexPublisher,
        mode: IndexingMode,
    ) -> Self {
        Self {
            source,
            processor: ProductProcessor::new(),
            store,
            publisher,
            mode,
        }
    }

    /// Run one full ingestion pass.
    ///
    /// Idempotent with respect to already-persisted SKUs: re-running
    /// against the same source persists nothing new. Only a fetch
    /// failure or the store becoming unreachable fails the run;
    /// record-level problems are absorbed into the report.
    #[instrument(skip(self))]
    pub async fn ingest(&self) -> Result<IngestReport, PipelineError> {
        info!("Starting catalog ingestion run");
        let mut report = IngestReport::default();

        let fetched = self.source.fetch_all().await?;
        report.fetched = fetched.len();
        if fetched.is_empty() {
            info!("Catalog source returned no records, nothing to ingest");
            return Ok(report);
        }

        let validated = self.processor.validate_batch(fetched);
        report.validated = validated.len();
        if validated.is_empty() {
            warn!("No records survived validation, aborting run");
            return Ok(report);
        }

        let summary = self.store.save_products(&validated).await?;
        report.saved = summary.saved.len();
        report.duplicates = summary.duplicates;
        report.failed = summary.failed;

        report.indexed = match self.mode {
            IndexingMode::FromStore => {
                if summary.saved.is_empty() {
                    info!("Nothing newly persisted, skipping index stage");
                    0
                } else {
                    self.publisher.bulk_index(&summary.saved).await?
                }
            }
            IndexingMode::FromSource => self.publisher.bulk_index_raw(&validated).await?,
        };

        info!(
            fetched = report.fetched,
            validated = report.validated,
            saved = report.saved,
            duplicates = report.duplicates,
            failed = report.failed,
            indexed = report.indexed,
            "Ingestion run complete"
        );
        Ok(report)
    }

    /// Rebuild the search index from the store, bypassing fetch and
    /// persist entirely.
    #[instrument(skip(self))]
    pub async fn reindex(&self) -> Result<usize, PipelineError> {
        info!("Starting full reindex");
        let indexed = self.publisher.reindex_all().await?;
        info!(indexed = indexed, "Reindex complete");
        Ok(indexed)
    }
}
