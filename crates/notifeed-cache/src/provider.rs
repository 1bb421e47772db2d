//! Cache manager that dispatches to the configured provider.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::info;

use notifeed_core::config::cache::CacheConfig;
use notifeed_core::error::FeedError;
use notifeed_core::result::FeedResult;
use notifeed_core::traits::cache::FeedCache;

/// Cache manager that wraps the configured cache provider.
///
/// The provider is selected at construction time based on configuration.
#[derive(Debug, Clone)]
pub struct CacheManager {
    /// The inner cache provider.
    inner: Arc<dyn FeedCache>,
}

impl CacheManager {
    /// Create a new cache manager from configuration.
    pub async fn new(config: &CacheConfig) -> FeedResult<Self> {
        let inner: Arc<dyn FeedCache> = match config.provider.as_str() {
            #[cfg(feature = "redis-backend")]
            "redis" => {
                info!("Initializing Redis cache provider");
                let client = crate::redis::RedisClient::connect(&config.redis).await?;
                Arc::new(crate::redis::RedisFeedCache::new(client))
            }
            #[cfg(feature = "memory")]
            "memory" => {
                info!("Initializing in-memory cache provider");
                Arc::new(crate::memory::MemoryFeedCache::new(&config.memory))
            }
            other => {
                return Err(FeedError::configuration(format!(
                    "Unknown cache provider: '{other}'. Supported: memory, redis"
                )));
            }
        };

        Ok(Self { inner })
    }

    /// Create a cache manager from an existing provider (for testing).
    pub fn from_cache(cache: Arc<dyn FeedCache>) -> Self {
        Self { inner: cache }
    }

    /// Get a reference to the inner provider.
    pub fn cache(&self) -> &dyn FeedCache {
        self.inner.as_ref()
    }
}

#[async_trait]
impl FeedCache for CacheManager {
    async fn get(&self, key: &str) -> FeedResult<Option<String>> {
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> FeedResult<()> {
        self.inner.set(key, value, ttl).await
    }

    async fn delete(&self, key: &str) -> FeedResult<bool> {
        self.inner.delete(key).await
    }

    async fn delete_prefix(&self, prefix: &str) -> FeedResult<u64> {
        self.inner.delete_prefix(prefix).await
    }
}
