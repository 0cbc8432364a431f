//! Redis-backed cache store

use std::time::Duration;

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use tracing::{debug, info};

use super::CacheStore;
use crate::{Error, Result};

/// Cache store shared across processes through a Redis server
///
/// Values are written with `SET key value PX ttl`, so expiry is enforced by the
/// server. The connection manager reconnects on its own after a dropped link.
#[derive(Clone)]
pub struct RedisStore {
    conn: ConnectionManager,
}

impl RedisStore {
    /// Connect to the server at `url` (e.g. `redis://localhost:6379/0`)
    pub async fn connect(url: &str) -> Result<Self> {
        let client = redis::Client::open(url)
            .map_err(|e| Error::Cache(format!("Invalid cache URL: {}", e)))?;
        let conn = client
            .get_connection_manager()
            .await
            .map_err(|e| Error::Cache(format!("Failed to connect to cache: {}", e)))?;

        info!(
            host = %client.get_connection_info().addr,
            "Connected to Redis cache"
        );
        Ok(Self { conn })
    }
}

impl std::fmt::Debug for RedisStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisStore").finish_non_exhaustive()
    }
}

/// Redis rejects a zero expiry
fn expiry_millis(ttl: Duration) -> u64 {
    u64::try_from(ttl.as_millis()).unwrap_or(u64::MAX).max(1)
}

#[async_trait]
impl CacheStore for RedisStore {
    fn name(&self) -> &'static str {
        "redis"
    }

    async fn get(&self, key: &str) -> Result<Option<String>> {
        let mut conn = self.conn.clone();
        let value: Option<String> = redis::cmd("GET")
            .arg(key)
            .query_async(&mut conn)
            .await
            .map_err(|e| Error::Cache(format!("GET {} failed: {}", key, e)))?;
        Ok(value)
    }

    async fn set(&self, key: &str, value: String, ttl: Duration) -> Result<()> {
        debug!(key, ttl_secs = ttl.as_secs(), "Storing cache entry");
        let mut conn = self.conn.clone();
        let _: () = redis::cmd("SET")
            .arg(key)
            .arg(value)
            .arg("PX")
            .arg(expiry_millis(ttl))
            .query_async(&mut conn)
            .await
            .map_err(|e| Error::Cache(format!("SET {} failed: {}", key, e)))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Server used by the live tests; they are skipped when unset
    fn live_url() -> Option<String> {
        std::env::var("CODEREVIEW_TEST_REDIS_URL").ok()
    }

    #[test]
    fn test_expiry_is_at_least_one_millisecond() {
        assert_eq!(expiry_millis(Duration::ZERO), 1);
        assert_eq!(expiry_millis(Duration::from_secs(600)), 600_000);
    }

    #[tokio::test]
    async fn test_invalid_url_is_cache_error() {
        let err = RedisStore::connect("not a redis url").await.unwrap_err();
        assert!(matches!(err, Error::Cache(_)));
    }

    #[tokio::test]
    async fn test_live_round_trip_and_expiry() {
        let Some(url) = live_url() else {
            return;
        };
        let store = RedisStore::connect(&url).await.unwrap();

        store
            .set("codereview:test:k", "value".to_string(), Duration::from_millis(200))
            .await
            .unwrap();
        assert_eq!(
            store.get("codereview:test:k").await.unwrap(),
            Some("value".to_string())
        );

        tokio::time::sleep(Duration::from_millis(500)).await;
        assert_eq!(store.get("codereview:test:k").await.unwrap(), None);
    }
}
