//! # Catalog Search Shared
//!
//! Shared data structures for the catalog search system: validated
//! catalog products, persisted product records, search index documents,
//! and search query/response types.
//!
//! This crate deliberately contains no I/O. Every layer (fetcher,
//! persistence store, index publisher, search gateway) exchanges these
//! types across its boundaries.

pub mod document;
pub mod product;
pub mod query;

pub use document::ProductDocument;
pub use product::{CatalogProduct, Dimensions, ImageRecord, ProductMeta, ProductRecord, ReviewEntry};
pub use query::{SearchHit, SearchMode, SearchQuery, SearchResponse, DEFAULT_SEARCH_SIZE};
