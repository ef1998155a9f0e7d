//! Configuration types for the repository backends.

/// Connection parameters for the Postgres product store.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub database: String,
    /// Upper bound on pooled connections.
    pub max_connections: u32,
    /// Connections the pool keeps warm.
    pub min_connections: u32,
    /// How long to wait for a connection before giving up, in seconds.
    pub connect_timeout_secs: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 5432,
            username: "catalog".to_string(),
            password: "catalog".to_string(),
            database: "catalog".to_string(),
            max_connections: 10,
            min_connections: 1,
            connect_timeout_secs: 10,
        }
    }
}

/// Connection parameters for the search engine.
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// Base URL of the search engine (e.g. "http://localhost:9200").
    pub url: String,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:9200".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_config_defaults() {
        let config = StoreConfig::default();
        assert_eq!(config.port, 5432);
        assert!(config.max_connections >= config.min_connections);
    }
}
