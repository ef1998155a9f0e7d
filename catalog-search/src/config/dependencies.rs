//! Dependency initialization and wiring for the catalog search system.
//!
//! Every component is constructed once here and passed explicitly;
//! there are no module-level singletons. Tests wire the same components
//! with in-memory fakes.

use std::env;
use std::str::FromStr;
use std::sync::Arc;

use tracing::info;

use crate::CatalogError;
use catalog_search_pipeline::{
    FetchCache, FetcherConfig, HttpCatalogSource, IndexPublisher, IndexingMode, IngestOrchestrator,
    SearchGateway,
};
use catalog_search_repository::{
    OpenSearchEngine, PgProductStore, ProductStore, SearchConfig, SearchEngineClient, StoreConfig,
};

/// Default external catalog endpoint.
const DEFAULT_SOURCE_URL: &str = "https://dummyjson.com/products";

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_parse<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or(default)
}

/// Container for all initialized components.
pub struct Dependencies {
    /// The ingestion pipeline, ready to run.
    pub orchestrator: IngestOrchestrator,
    /// The search entry point.
    pub gateway: SearchGateway,
    /// Direct read access to the system of record.
    pub store: Arc<dyn ProductStore>,
}

impl Dependencies {
    /// Initialize all dependencies from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `PRODUCT_SOURCE_URL`: catalog endpoint (default: dummyjson products)
    /// - `FETCH_PAGE_LIMIT`: page size while paginating (default: 30)
    /// - `FETCH_CACHE_DIR`: enable the file cache rooted here (default: off)
    /// - `DATABASE_HOST` / `DATABASE_PORT` / `DATABASE_USER` /
    ///   `DATABASE_PASSWORD` / `DATABASE_NAME`: Postgres connection
    /// - `DATABASE_MAX_CONNECTIONS` / `DATABASE_CONNECT_TIMEOUT_SECS`: pool knobs
    /// - `OPENSEARCH_URL`: search engine URL (default: http://localhost:9200)
    /// - `INDEX_FROM_SOURCE`: set to "true" to index fetched records
    ///   directly instead of the persisted ones
    pub async fn new() -> Result<Self, CatalogError> {
        let defaults = StoreConfig::default();
        let store_config = StoreConfig {
            host: env_or("DATABASE_HOST", &defaults.host),
            port: env_parse("DATABASE_PORT", defaults.port),
            username: env_or("DATABASE_USER", &defaults.username),
            password: env_or("DATABASE_PASSWORD", &defaults.password),
            database: env_or("DATABASE_NAME", &defaults.database),
            max_connections: env_parse("DATABASE_MAX_CONNECTIONS", defaults.max_connections),
            min_connections: defaults.min_connections,
            connect_timeout_secs: env_parse(
                "DATABASE_CONNECT_TIMEOUT_SECS",
                defaults.connect_timeout_secs,
            ),
        };
        let search_config = SearchConfig {
            url: env_or("OPENSEARCH_URL", &SearchConfig::default().url),
        };

        info!(
            database = %store_config.database,
            opensearch_url = %search_config.url,
            "Initializing dependencies"
        );

        // Product store: connect and bootstrap the schema.
        let store = PgProductStore::connect(&store_config)
            .await
            .map_err(|e| CatalogError::config(format!("Failed to connect to product store: {e}")))?;
        store
            .ensure_schema()
            .await
            .map_err(|e| CatalogError::config(format!("Schema bootstrap failed: {e}")))?;
        let store: Arc<dyn ProductStore> = Arc::new(store);

        // Search engine: verify reachability before wiring anything.
        let engine = OpenSearchEngine::new(&search_config)
            .map_err(|e| CatalogError::config(format!("Failed to create search client: {e}")))?;
        let healthy = engine
            .health_check()
            .await
            .map_err(|e| CatalogError::config(format!("Search engine health check failed: {e}")))?;
        if !healthy {
            return Err(CatalogError::config("Search engine cluster is unhealthy"));
        }
        let engine: Arc<dyn SearchEngineClient> = Arc::new(engine);

        info!("Search engine connection verified");

        // Publisher, with index bootstrap.
        let publisher = IndexPublisher::new(engine.clone(), store.clone());
        publisher
            .ensure_index()
            .await
            .map_err(|e| CatalogError::config(format!("Index bootstrap failed: {e}")))?;

        // Catalog source, optionally cached.
        let fetcher_defaults = FetcherConfig::default();
        let fetcher_config = FetcherConfig {
            base_url: env_or("PRODUCT_SOURCE_URL", DEFAULT_SOURCE_URL),
            page_limit: env_parse("FETCH_PAGE_LIMIT", fetcher_defaults.page_limit),
            timeout_secs: fetcher_defaults.timeout_secs,
        };
        let source = match env::var("FETCH_CACHE_DIR") {
            Ok(dir) => HttpCatalogSource::with_cache(fetcher_config, FetchCache::new(dir))?,
            Err(_) => HttpCatalogSource::new(fetcher_config)?,
        };

        let mode = match env_or("INDEX_FROM_SOURCE", "false").as_str() {
            "true" | "1" => IndexingMode::FromSource,
            _ => IndexingMode::FromStore,
        };

        let orchestrator = IngestOrchestrator::with_mode(
            Arc::new(source),
            store.clone(),
            publisher,
            mode,
        );
        let gateway = SearchGateway::new(engine, store.clone());

        Ok(Self {
            orchestrator,
            gateway,
            store,
        })
    }
}
