//! Abstract interfaces for the storage layer.
//!
//! The product store and the search engine are consumed through these
//! traits so callers can be wired with fakes in tests and backends can
//! be swapped without touching the pipeline.

mod product_store;
mod search_engine_client;

pub use product_store::{
    Pagination, ProductFilter, ProductPage, ProductStore, SaveOutcome, SaveSummary,
};
pub use search_engine_client::{BulkSummary, SearchEngineClient};
