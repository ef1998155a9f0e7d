//! Error types for the catalog search pipeline.

use catalog_search_repository::{SearchError, StoreError};
use thiserror::Error;

/// Errors that can occur in the catalog search pipeline.
///
/// Only run-level failures surface through this type: the catalog
/// source being unreachable, the store being unreachable, or an invalid
/// search request. Record-level and document-level failures are
/// absorbed and logged inside their stage.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// The catalog source could not be fetched.
    #[error("Fetch error: {0}")]
    FetchError(String),

    /// A catalog payload could not be parsed at all.
    #[error("Parse error: {0}")]
    ParseError(String),

    /// A search request was rejected before reaching the index.
    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    /// Error from the product store.
    #[error("Store error: {0}")]
    StoreError(#[from] StoreError),

    /// Error from the search engine.
    #[error("Search error: {0}")]
    SearchError(#[from] SearchError),
}

impl PipelineError {
    /// Create a fetch error.
    pub fn fetch(msg: impl Into<String>) -> Self {
        Self::FetchError(msg.into())
    }

    /// Create a parse error.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::ParseError(msg.into())
    }

    /// Create an invalid query error.
    pub fn invalid_query(msg: impl Into<String>) -> Self {
        Self::InvalidQuery(msg.into())
    }
}
