//! Read-through cache contract.

use std::time::Duration;

use async_trait::async_trait;

use crate::result::FeedResult;

/// TTL key/value cache for derived feed projections.
///
/// Values are JSON strings. Entries are disposable: implementations may
/// evict at any time without coordination, and the engine treats every
/// failure here as a degradation rather than a request failure.
#[async_trait]
pub trait FeedCache: Send + Sync + std::fmt::Debug + 'static {
    /// Fetch a value. `None` on miss or expiry.
    async fn get(&self, key: &str) -> FeedResult<Option<String>>;

    /// Store a value with a per-entry time-to-live.
    async fn set(&self, key: &str, value: &str, ttl: Duration) -> FeedResult<()>;

    /// Remove one key, reporting whether it existed.
    async fn delete(&self, key: &str) -> FeedResult<bool>;

    /// Remove every key starting with `prefix`, returning how many were
    /// dropped.
    ///
    /// This is the bulk-invalidation primitive: one user's whole cached
    /// page set shares a prefix and is wiped in a single call.
    async fn delete_prefix(&self, prefix: &str) -> FeedResult<u64>;
}
