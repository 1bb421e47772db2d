//! Durable notification storage contract.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::result::FeedResult;
use crate::types::notification::Notification;
use crate::types::state::NotificationState;

/// Durable, queryable storage for notification records.
///
/// The store is the sole source of truth; cache entries are disposable
/// projections of its rows. The engine never wraps calls in a transaction,
/// so every method must be atomic on its own (single-statement semantics).
#[async_trait]
pub trait NotificationStore: Send + Sync + std::fmt::Debug + 'static {
    /// Insert a new record, generating `id` and `created_at`.
    ///
    /// `created_at` is truncated to microseconds and strictly greater than
    /// any value previously assigned by this process, so cursor bounds never
    /// collide within one instance.
    async fn insert(
        &self,
        user_id: Uuid,
        message: &str,
        state: NotificationState,
    ) -> FeedResult<Notification>;

    /// Fetch one record by id.
    async fn find_by_id(&self, id: Uuid) -> FeedResult<Option<Notification>>;

    /// Compare-and-set state update.
    ///
    /// Applies `new_state` only when the current state is one of
    /// `allowed_from`, returning the updated row. `None` means no row
    /// matched: either the id is unknown or its current state is outside
    /// `allowed_from`; callers disambiguate with [`Self::find_by_id`].
    async fn update_state(
        &self,
        id: Uuid,
        new_state: NotificationState,
        allowed_from: &[NotificationState],
    ) -> FeedResult<Option<Notification>>;

    /// Bulk-move every record of `user_id` currently in `from` to `to`,
    /// returning the number of rows changed.
    async fn update_state_many(
        &self,
        user_id: Uuid,
        from: NotificationState,
        to: NotificationState,
    ) -> FeedResult<u64>;

    /// One page of records for `user_id`, newest first.
    ///
    /// Skips rows whose state is in `exclude_states` and, when `before` is
    /// given, rows not strictly older than it.
    async fn query_page(
        &self,
        user_id: Uuid,
        exclude_states: &[NotificationState],
        before: Option<DateTime<Utc>>,
        limit: u32,
    ) -> FeedResult<Vec<Notification>>;

    /// Count records owned by `user_id` currently in `state`.
    async fn count_by_state(&self, user_id: Uuid, state: NotificationState) -> FeedResult<u64>;

    /// Delete at most `max_rows` records with `created_at` older than
    /// `older_than`, oldest first, returning how many were removed.
    async fn delete_batch(&self, older_than: DateTime<Utc>, max_rows: u32) -> FeedResult<u64>;
}
