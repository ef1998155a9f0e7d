//! # Catalog Search Pipeline
//!
//! This crate provides the moving parts of the catalog search system:
//! fetching product records from the external catalog, validating them,
//! persisting them, publishing them to the search index, and serving
//! search queries hydrated from the store.
//!
//! ## Architecture
//!
//! The ingestion path follows a Fetcher-Processor-Store-Publisher
//! pipeline:
//!
//! 1. **Fetcher**: retrieves paginated catalog pages over HTTP, with an
//!    optional file cache, and converts raw entries into validated
//!    products
//! 2. **Processor**: applies cross-field business rules
//! 3. **Publisher**: bulk-indexes documents into the search engine
//! 4. **Orchestrator**: coordinates one ingestion run end to end
//!
//! Independently, the **Gateway** serves queries: index lookup, then a
//! batched hydration read against the store.

pub mod errors;
pub mod fetcher;
pub mod gateway;
pub mod loader;
pub mod orchestrator;
pub mod processor;

#[cfg(test)]
pub(crate) mod testing;

pub use errors::PipelineError;
pub use fetcher::{CatalogSource, FetchCache, FetcherConfig, HttpCatalogSource};
pub use gateway::SearchGateway;
pub use loader::{IndexPublisher, PublisherConfig};
pub use orchestrator::{IngestOrchestrator, IngestReport, IndexingMode};
pub use processor::ProductProcessor;
