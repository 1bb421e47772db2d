//! In-memory cache provider built on moka.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use moka::Expiry;
use moka::future::Cache;
use tracing::debug;

use notifeed_core::FeedResult;
use notifeed_core::config::cache::MemoryCacheConfig;
use notifeed_core::traits::cache::FeedCache;

/// Stored value together with the lifetime it was written with.
#[derive(Debug, Clone)]
struct Entry {
    value: String,
    ttl: Duration,
}

/// Expiry policy reading the TTL recorded on each [`Entry`].
struct PerEntryTtl;

impl Expiry<String, Entry> for PerEntryTtl {
    fn expire_after_create(
        &self,
        _key: &String,
        entry: &Entry,
        _created_at: Instant,
    ) -> Option<Duration> {
        Some(entry.ttl)
    }
}

/// In-process cache provider backed by [moka](https://crates.io/crates/moka).
///
/// Suitable for single-process deployments and tests. Entries expire
/// individually according to the TTL passed to `set`.
#[derive(Debug, Clone)]
pub struct MemoryFeedCache {
    /// The underlying moka cache.
    entries: Cache<String, Entry>,
}

impl MemoryFeedCache {
    /// Create a new in-memory cache provider.
    pub fn new(config: &MemoryCacheConfig) -> Self {
        let entries = Cache::builder()
            .max_capacity(config.max_capacity)
            .expire_after(PerEntryTtl)
            .build();

        Self { entries }
    }
}

#[async_trait]
impl FeedCache for MemoryFeedCache {
    async fn get(&self, key: &str) -> FeedResult<Option<String>> {
        Ok(self.entries.get(key).await.map(|entry| entry.value))
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> FeedResult<()> {
        let entry = Entry {
            value: value.to_string(),
            ttl,
        };
        self.entries.insert(key.to_string(), entry).await;
        Ok(())
    }

    async fn delete(&self, key: &str) -> FeedResult<bool> {
        Ok(self.entries.remove(key).await.is_some())
    }

    async fn delete_prefix(&self, prefix: &str) -> FeedResult<u64> {
        // moka buffers writes; flush them so entries inserted just before
        // an invalidation are visible to iteration.
        self.entries.run_pending_tasks().await;

        let keys: Vec<String> = self
            .entries
            .iter()
            .filter(|(key, _)| key.starts_with(prefix))
            .map(|(key, _)| key.as_ref().clone())
            .collect();

        let count = keys.len() as u64;
        for key in &keys {
            self.entries.remove(key).await;
        }

        if count > 0 {
            debug!(prefix, count, "Dropped cached entries by prefix");
        }
        Ok(count)
    }
}
