//! # Catalog Search Repository
//!
//! This crate provides the storage boundary of the catalog search
//! system: trait definitions for the relational product store and the
//! search engine, a Postgres implementation of the former, and an
//! OpenSearch implementation of the latter.

pub mod config;
pub mod errors;
pub mod interfaces;
pub mod opensearch;
pub mod postgres;

pub use config::{SearchConfig, StoreConfig};
pub use errors::{SearchError, StoreError};
pub use interfaces::{
    BulkSummary, Pagination, ProductFilter, ProductPage, ProductStore, SaveOutcome, SaveSummary,
    SearchEngineClient,
};
pub use self::opensearch::OpenSearchEngine;
pub use self::postgres::PgProductStore;
