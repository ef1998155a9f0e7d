//! # Catalog Search
//!
//! Main library for the catalog search system.
//!
//! This crate provides the entry point and dependency wiring for
//! running catalog ingestion and serving search.

pub mod config;

pub use config::Dependencies;

use thiserror::Error;

/// Errors that can occur during initialization or a pipeline run.
#[derive(Error, Debug)]
pub enum CatalogError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Pipeline error.
    #[error("Pipeline error: {0}")]
    PipelineError(#[from] catalog_search_pipeline::PipelineError),

    /// Store error.
    #[error("Store error: {0}")]
    StoreError(#[from] catalog_search_repository::StoreError),

    /// Search error.
    #[error("Search error: {0}")]
    SearchError(#[from] catalog_search_repository::SearchError),

    /// IO error.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl CatalogError {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }
}
