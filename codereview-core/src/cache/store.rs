//! Key-value stores with per-entry expiry

use std::time::{Duration, Instant};

use async_trait::async_trait;
use moka::Expiry;
use tracing::debug;

use crate::Result;

/// Shared key-value store whose entries expire after their own TTL
///
/// A missing key is a normal outcome. Concurrent writers to the same key race and
/// the last write wins.
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Get the name of this store
    fn name(&self) -> &'static str;

    /// Fetch the value stored under `key`, if present and not yet expired
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous value, for `ttl`
    async fn set(&self, key: &str, value: String, ttl: Duration) -> Result<()>;
}

#[derive(Debug, Clone)]
struct StoredValue {
    payload: String,
    ttl: Duration,
}

/// Expiry policy reading the TTL recorded with each value
struct PerEntryTtl;

impl Expiry<String, StoredValue> for PerEntryTtl {
    fn expire_after_create(
        &self,
        _key: &String,
        value: &StoredValue,
        _created_at: Instant,
    ) -> Option<Duration> {
        Some(value.ttl)
    }

    fn expire_after_update(
        &self,
        _key: &String,
        value: &StoredValue,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        Some(value.ttl)
    }
}

/// In-process cache store backed by moka
pub struct MemoryStore {
    entries: moka::future::Cache<String, StoredValue>,
}

impl MemoryStore {
    /// Create a store holding at most `max_entries` values
    pub fn new(max_entries: u64) -> Self {
        let entries = moka::future::Cache::builder()
            .max_capacity(max_entries)
            .expire_after(PerEntryTtl)
            .build();
        Self { entries }
    }

    /// Number of live entries (approximate until pending maintenance runs)
    pub fn entry_count(&self) -> u64 {
        self.entries.entry_count()
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new(10_000)
    }
}

impl std::fmt::Debug for MemoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryStore")
            .field("entries", &self.entries.entry_count())
            .finish()
    }
}

#[async_trait]
impl CacheStore for MemoryStore {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).await.map(|v| v.payload))
    }

    async fn set(&self, key: &str, value: String, ttl: Duration) -> Result<()> {
        debug!(key, ttl_secs = ttl.as_secs(), "Storing cache entry");
        self.entries
            .insert(
                key.to_string(),
                StoredValue {
                    payload: value,
                    ttl,
                },
            )
            .await;
        Ok(())
    }
}
