//! Advisory file cache for raw catalog responses.
//!
//! Entries are keyed by the SHA-256 of the full request URL, one file
//! per key. The cache is best-effort on both sides: a missing or
//! unreadable entry forces a live refetch, and a failed write is logged
//! and ignored. It never blocks ingestion.

use std::fs;
use std::path::PathBuf;

use sha2::{Digest, Sha256};
use tracing::{debug, warn};

/// Filesystem cache of raw catalog page bodies.
pub struct FetchCache {
    dir: PathBuf,
}

impl FetchCache {
    /// Create a cache rooted at the given directory. The directory is
    /// created lazily on the first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Stable cache key for a request URL.
    fn key(url: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(url.as_bytes());
        format!("{:x}", hasher.finalize())
    }

    fn path_for(&self, url: &str) -> PathBuf {
        self.dir.join(format!("{}.json", Self::key(url)))
    }

    /// Read the cached body for a URL, if any.
    pub fn load(&self, url: &str) -> Option<String> {
        let path = self.path_for(url);
        match fs::read_to_string(&path) {
            Ok(body) => {
                debug!(url = %url, path = %path.display(), "Cache hit");
                Some(body)
            }
            Err(_) => None,
        }
    }

    /// Persist a fetched body under the URL's key. Failures are logged
    /// and swallowed.
    pub fn store(&self, url: &str, body: &str) {
        if let Err(e) = self.try_store(url, body) {
            warn!(url = %url, error = %e, "Failed to write cache entry");
        }
    }

    fn try_store(&self, url: &str, body: &str) -> std::io::Result<()> {
        fs::create_dir_all(&self.dir)?;
        fs::write(self.path_for(url), body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_store_then_load() {
        let dir = tempdir().unwrap();
        let cache = FetchCache::new(dir.path());

        let url = "https://dummyjson.com/products?limit=30&skip=0";
        cache.store(url, r#"{"total": 3}"#);

        assert_eq!(cache.load(url), Some(r#"{"total": 3}"#.to_string()));
    }

    #[test]
    fn test_miss_returns_none() {
        let dir = tempdir().unwrap();
        let cache = FetchCache::new(dir.path());

        assert!(cache.load("https://dummyjson.com/products?limit=30&skip=0").is_none());
    }

    #[test]
    fn test_distinct_urls_get_distinct_entries() {
        let dir = tempdir().unwrap();
        let cache = FetchCache::new(dir.path());

        cache.store("https://example.com/a", "a-body");
        cache.store("https://example.com/b", "b-body");

        assert_eq!(cache.load("https://example.com/a"), Some("a-body".to_string()));
        assert_eq!(cache.load("https://example.com/b"), Some("b-body".to_string()));
    }

    #[test]
    fn test_store_overwrites() {
        let dir = tempdir().unwrap();
        let cache = FetchCache::new(dir.path());

        cache.store("https://example.com/a", "old");
        cache.store("https://example.com/a", "new");

        assert_eq!(cache.load("https://example.com/a"), Some("new".to_string()));
    }

    #[test]
    fn test_key_is_stable() {
        assert_eq!(
            FetchCache::key("https://example.com/a"),
            FetchCache::key("https://example.com/a")
        );
        assert_ne!(
            FetchCache::key("https://example.com/a"),
            FetchCache::key("https://example.com/b")
        );
    }
}
