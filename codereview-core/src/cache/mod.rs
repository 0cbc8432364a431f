//! Memoization layer
//!
//! A [`CacheStore`] holds opaque text values with per-entry expiry. [`Cache`] is the
//! cloneable handle components receive: it JSON-encodes structured values on the way
//! in and decodes them on the way out.

mod key;
mod redis_store;
mod store;

pub use key::{
    build_key, ANALYSIS_NAMESPACE, NAMESPACE_DELIMITER, PART_DELIMITER, REPOSITORY_NAMESPACE,
};
pub use redis_store::RedisStore;
pub use store::{CacheStore, MemoryStore};

use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::warn;

use crate::{CacheConfig, Result};

/// Shared handle to a cache store
#[derive(Clone)]
pub struct Cache {
    store: Arc<dyn CacheStore>,
}

impl Cache {
    /// Wrap an existing store
    pub fn new(store: Arc<dyn CacheStore>) -> Self {
        Self { store }
    }

    /// Create a cache backed by a fresh in-process store
    pub fn in_memory(max_entries: u64) -> Self {
        Self::new(Arc::new(MemoryStore::new(max_entries)))
    }

    /// Create the cache described by `config`
    ///
    /// Connects to Redis when `url` is set; otherwise falls back to an in-process
    /// store bounded by `max_entries`.
    pub async fn from_config(config: &CacheConfig) -> Result<Self> {
        match config.url.as_deref() {
            Some(url) => Ok(Self::new(Arc::new(RedisStore::connect(url).await?))),
            None => Ok(Self::in_memory(config.max_entries)),
        }
    }

    /// Get the underlying store
    pub fn store(&self) -> &dyn CacheStore {
        self.store.as_ref()
    }

    /// Fetch and decode the value under `key`
    ///
    /// A value that no longer decodes as `T` is treated as a miss.
    pub async fn get_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        let Some(raw) = self.store.get(key).await? else {
            return Ok(None);
        };

        match serde_json::from_str(&raw) {
            Ok(value) => Ok(Some(value)),
            Err(e) => {
                warn!(key, error = %e, "Discarding unreadable cache entry");
                Ok(None)
            }
        }
    }

    /// Encode `value` and store it under `key` for `ttl`
    pub async fn set_json<T: Serialize + ?Sized>(
        &self,
        key: &str,
        value: &T,
        ttl: Duration,
    ) -> Result<()> {
        let raw = serde_json::to_string(value)?;
        self.store.set(key, raw, ttl).await
    }
}

impl std::fmt::Debug for Cache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cache")
            .field("store", &self.store.name())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Pair {
        left: String,
        right: String,
    }

    #[tokio::test]
    async fn test_json_round_trip_of_structured_value() {
        let cache = Cache::in_memory(16);
        let pair = Pair {
            left: "content with ||| and \n newlines".to_string(),
            right: "• main.py".to_string(),
        };

        cache
            .set_json("pair", &pair, Duration::from_secs(60))
            .await
            .unwrap();
        let loaded: Option<Pair> = cache.get_json("pair").await.unwrap();
        assert_eq!(loaded, Some(pair));
    }

    #[tokio::test]
    async fn test_json_value_expires() {
        let cache = Cache::in_memory(16);
        cache
            .set_json("text", "Rating: 3", Duration::from_millis(100))
            .await
            .unwrap();
        let hit: Option<String> = cache.get_json("text").await.unwrap();
        assert_eq!(hit.as_deref(), Some("Rating: 3"));

        tokio::time::sleep(Duration::from_millis(300)).await;
        let miss: Option<String> = cache.get_json("text").await.unwrap();
        assert!(miss.is_none());
    }

    #[tokio::test]
    async fn test_undecodable_value_is_a_miss() {
        let cache = Cache::in_memory(16);
        cache
            .store()
            .set("pair", "not json".to_string(), Duration::from_secs(60))
            .await
            .unwrap();

        let loaded: Option<Pair> = cache.get_json("pair").await.unwrap();
        assert!(loaded.is_none());
    }

    #[tokio::test]
    async fn test_config_without_url_uses_memory_store() {
        let cache = Cache::from_config(&CacheConfig::default()).await.unwrap();
        assert_eq!(cache.store().name(), "memory");
    }

    #[tokio::test]
    async fn test_config_with_bad_url_fails() {
        let config = CacheConfig {
            url: Some("not a redis url".to_string()),
            ..CacheConfig::default()
        };
        let err = Cache::from_config(&config).await.unwrap_err();
        assert!(matches!(err, crate::Error::Cache(_)));
    }

    #[test]
    fn test_debug_names_store() {
        let cache = Cache::in_memory(1);
        assert!(format!("{:?}", cache).contains("memory"));
    }
}
