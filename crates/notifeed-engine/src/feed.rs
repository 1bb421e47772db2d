//! Feed orchestration over the store, cache, and push bus.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};
use uuid::Uuid;

use notifeed_bus::topic;
use notifeed_cache::keys;
use notifeed_core::config::feed::FeedTuning;
use notifeed_core::traits::bus::{FeedBus, PushStream};
use notifeed_core::traits::cache::FeedCache;
use notifeed_core::traits::store::NotificationStore;
use notifeed_core::types::{FeedConnection, Notification, NotificationState, cursor};
use notifeed_core::{FeedError, FeedResult};

/// Orchestrates notification reads, writes, and live push.
///
/// The engine is stateless: all shared mutable state lives behind the
/// collaborator traits, so any number of engine instances may run against
/// the same store/cache/bus. No operation spans a transaction across
/// collaborators; the write path accepts bounded staleness (capped by the
/// page TTL) when invalidation fails.
#[derive(Debug, Clone)]
pub struct FeedEngine {
    /// Durable notification records. The sole source of truth.
    store: Arc<dyn NotificationStore>,
    /// Disposable page projections with TTL.
    cache: Arc<dyn FeedCache>,
    /// Live fan-out to connected subscribers.
    bus: Arc<dyn FeedBus>,
    /// Page sizing and TTL knobs.
    tuning: FeedTuning,
}

impl FeedEngine {
    /// Create a new feed engine over the given collaborators.
    pub fn new(
        store: Arc<dyn NotificationStore>,
        cache: Arc<dyn FeedCache>,
        bus: Arc<dyn FeedBus>,
        tuning: FeedTuning,
    ) -> Self {
        Self {
            store,
            cache,
            bus,
            tuning,
        }
    }

    /// Create a notification for `user_id` and push it to live subscribers.
    ///
    /// Side effects run in a fixed order: store write, cache invalidation,
    /// bus publish. A subscriber that re-fetches the feed on receiving the
    /// push therefore always sees the new row. Invalidation and publish
    /// failures are logged and swallowed; the write already succeeded.
    pub async fn create(&self, user_id: Uuid, message: &str) -> FeedResult<Notification> {
        if user_id.is_nil() {
            return Err(FeedError::validation("User id must not be nil"));
        }
        if message.trim().is_empty() {
            return Err(FeedError::validation("Notification message must not be empty"));
        }

        // Step 1: Persist.
        let notification = self
            .store
            .insert(user_id, message, NotificationState::Unread)
            .await?;

        // Step 2: Drop every cached page for the user. Any page may carry a
        // stale head or hasNextPage once a new row exists.
        self.invalidate_user(user_id).await;

        // Step 3: Push to subscribers connected right now.
        let user_topic = topic::user_topic(&user_id);
        if let Err(e) = self.bus.publish(&user_topic, &notification).await {
            warn!(
                user_id = %user_id,
                notification_id = %notification.id,
                error = %e,
                "Failed to publish created notification"
            );
        }

        info!(
            notification_id = %notification.id,
            user_id = %user_id,
            "Created notification"
        );
        Ok(notification)
    }

    /// Move a notification to the state named by `state_token`.
    ///
    /// The token is validated against the closed state enum before the
    /// store is touched; unknown tokens fail with `InvalidState` and
    /// mutate nothing. Transitions out of a terminal state fail with
    /// `Conflict`. The owner whose cache is invalidated comes from the
    /// stored record, never from the caller.
    ///
    /// State changes are deliberately not pushed on the bus; only
    /// creations fan out. Clients refresh the feed after acting on a
    /// notification.
    pub async fn update_state(&self, id: Uuid, state_token: &str) -> FeedResult<Notification> {
        let new_state: NotificationState = state_token.parse()?;
        let allowed_from = NotificationState::allowed_sources(new_state);

        if let Some(updated) = self.store.update_state(id, new_state, &allowed_from).await? {
            self.invalidate_user(updated.user_id).await;
            debug!(
                notification_id = %id,
                state = %updated.state,
                "Updated notification state"
            );
            return Ok(updated);
        }

        // Nothing matched: either the id is unknown or the current state
        // does not permit this transition.
        match self.store.find_by_id(id).await? {
            None => Err(FeedError::not_found(format!("Notification {id} not found"))),
            Some(current) => Err(FeedError::conflict(format!(
                "Notification {id} cannot transition from {} to {}",
                current.state, new_state
            ))),
        }
    }

    /// Move every unread notification of `user_id` to `VIEWED`, returning
    /// how many rows changed.
    pub async fn mark_all_viewed(&self, user_id: Uuid) -> FeedResult<u64> {
        let changed = self
            .store
            .update_state_many(user_id, NotificationState::Unread, NotificationState::Viewed)
            .await?;

        if changed > 0 {
            self.invalidate_user(user_id).await;
        }

        debug!(user_id = %user_id, changed, "Marked all notifications viewed");
        Ok(changed)
    }

    /// One page of the user's feed, newest first.
    ///
    /// `cursor` must be a token previously returned as `endCursor`; the
    /// page contains only rows strictly older than it. Dismissed and
    /// auto-dismissed rows never appear. Pages are cached whole under a
    /// key derived from `(user_id, cursor)`; cache failures fall back to
    /// the store.
    pub async fn get_feed(
        &self,
        user_id: Uuid,
        cursor: Option<&str>,
        limit: Option<u32>,
    ) -> FeedResult<FeedConnection> {
        let before = cursor.map(cursor::decode).transpose()?;
        let limit = limit
            .unwrap_or(self.tuning.default_page_size)
            .clamp(1, self.tuning.max_page_size);

        let key = keys::feed_page(&user_id, cursor.unwrap_or(keys::FIRST_PAGE));
        match self.cache.get(&key).await {
            Ok(Some(json)) => match serde_json::from_str::<FeedConnection>(&json) {
                Ok(connection) => {
                    debug!(user_id = %user_id, key, "Feed page served from cache");
                    return Ok(connection);
                }
                Err(e) => {
                    warn!(key, error = %e, "Discarding unreadable cached feed page");
                }
            },
            Ok(None) => {}
            Err(e) => {
                warn!(
                    user_id = %user_id,
                    error = %e,
                    "Cache read failed; querying the store directly"
                );
            }
        }

        // Over-fetch one row to learn hasNextPage without a count query.
        let rows = self
            .store
            .query_page(user_id, &NotificationState::HIDDEN, before, limit + 1)
            .await?;
        let connection = FeedConnection::from_rows(rows, limit as usize);

        match serde_json::to_string(&connection) {
            Ok(json) => {
                if let Err(e) = self.cache.set(&key, &json, self.page_ttl()).await {
                    warn!(user_id = %user_id, error = %e, "Failed to cache feed page");
                }
            }
            Err(e) => {
                warn!(user_id = %user_id, error = %e, "Failed to serialize feed page for caching");
            }
        }

        Ok(connection)
    }

    /// Number of unread notifications for `user_id`, cached alongside the
    /// feed pages so the same invalidation covers it.
    pub async fn unread_count(&self, user_id: Uuid) -> FeedResult<u64> {
        let key = keys::unread_count(&user_id);
        match self.cache.get(&key).await {
            Ok(Some(text)) => {
                if let Ok(count) = text.parse::<u64>() {
                    return Ok(count);
                }
                warn!(key, "Discarding unparsable cached unread count");
            }
            Ok(None) => {}
            Err(e) => {
                warn!(user_id = %user_id, error = %e, "Cache read failed; counting in the store");
            }
        }

        let count = self
            .store
            .count_by_state(user_id, NotificationState::Unread)
            .await?;

        if let Err(e) = self.cache.set(&key, &count.to_string(), self.page_ttl()).await {
            warn!(user_id = %user_id, error = %e, "Failed to cache unread count");
        }

        Ok(count)
    }

    /// Subscribe to live pushes for `user_id`.
    ///
    /// The stream yields notifications created while subscribed; nothing
    /// is replayed. A reconnecting client recovers missed state with
    /// [`Self::get_feed`].
    pub async fn subscribe_to_user(&self, user_id: Uuid) -> FeedResult<PushStream> {
        debug!(user_id = %user_id, "Subscribing to user notifications");
        self.bus.subscribe(&topic::user_topic(&user_id)).await
    }

    /// Delete at most `max_rows` notifications older than `older_than`.
    ///
    /// This is the sweeper's primitive. It touches neither cache nor bus:
    /// rows old enough to expire are already outside every cached page
    /// still inside its TTL.
    pub async fn delete_expired_batch(
        &self,
        older_than: DateTime<Utc>,
        max_rows: u32,
    ) -> FeedResult<u64> {
        self.store.delete_batch(older_than, max_rows).await
    }

    /// Drop every cache entry belonging to `user_id`, logging instead of
    /// failing: stale pages expire with their TTL anyway.
    async fn invalidate_user(&self, user_id: Uuid) {
        if let Err(e) = self.cache.delete_prefix(&keys::user_prefix(&user_id)).await {
            warn!(
                user_id = %user_id,
                error = %e,
                "Failed to invalidate cached pages; stale reads possible until TTL expiry"
            );
        }
    }

    fn page_ttl(&self) -> Duration {
        Duration::from_secs(self.tuning.page_ttl_seconds)
    }
}
