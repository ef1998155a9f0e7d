//! Catalog search binary.
//!
//! `catalog-search ingest` runs one full ingestion pass;
//! `catalog-search reindex` rebuilds the search index from the store.

use std::env;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use catalog_search::{CatalogError, Dependencies};

async fn run() -> Result<(), CatalogError> {
    let command = env::args().nth(1).unwrap_or_else(|| "ingest".to_string());

    let deps = Dependencies::new().await?;

    match command.as_str() {
        "ingest" => {
            let report = deps.orchestrator.ingest().await?;
            info!(
                fetched = report.fetched,
                saved = report.saved,
                duplicates = report.duplicates,
                failed = report.failed,
                indexed = report.indexed,
                "Ingestion finished"
            );
        }
        "reindex" => {
            let indexed = deps.orchestrator.reindex().await?;
            info!(indexed = indexed, "Reindex finished");
        }
        other => {
            return Err(CatalogError::config(format!(
                "Unknown command '{other}'. Available: ingest, reindex"
            )));
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    if let Err(e) = run().await {
        error!(error = %e, "Run failed");
        std::process::exit(1);
    }
}
