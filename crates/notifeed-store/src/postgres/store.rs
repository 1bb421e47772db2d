//! PostgreSQL-backed notification store.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use notifeed_core::error::{ErrorKind, FeedError};
use notifeed_core::result::FeedResult;
use notifeed_core::traits::NotificationStore;
use notifeed_core::types::{Notification, NotificationState};

use crate::clock::MonotonicClock;

/// Notification store over a PostgreSQL pool.
///
/// Ids are UUIDv7 and `created_at` comes from a process-local monotonic
/// clock, both generated app-side so the insert is a single statement.
#[derive(Debug)]
pub struct PostgresNotificationStore {
    pool: PgPool,
    clock: MonotonicClock,
}

impl PostgresNotificationStore {
    /// Create a new store over an existing pool.
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            clock: MonotonicClock::new(),
        }
    }
}

fn as_tokens(states: &[NotificationState]) -> Vec<String> {
    states.iter().map(|s| s.as_str().to_string()).collect()
}

#[async_trait]
impl NotificationStore for PostgresNotificationStore {
    async fn insert(
        &self,
        user_id: Uuid,
        message: &str,
        state: NotificationState,
    ) -> FeedResult<Notification> {
        let id = Uuid::now_v7();
        let created_at = self.clock.next().await;

        sqlx::query_as::<_, Notification>(
            "INSERT INTO notifications (id, user_id, message, state, created_at) \
             VALUES ($1, $2, $3, $4, $5) RETURNING *",
        )
        .bind(id)
        .bind(user_id)
        .bind(message)
        .bind(state)
        .bind(created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            FeedError::with_source(
                ErrorKind::StoreUnavailable,
                "Failed to insert notification",
                e,
            )
        })
    }

    async fn find_by_id(&self, id: Uuid) -> FeedResult<Option<Notification>> {
        sqlx::query_as::<_, Notification>("SELECT * FROM notifications WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                FeedError::with_source(
                    ErrorKind::StoreUnavailable,
                    "Failed to fetch notification",
                    e,
                )
            })
    }

    async fn update_state(
        &self,
        id: Uuid,
        new_state: NotificationState,
        allowed_from: &[NotificationState],
    ) -> FeedResult<Option<Notification>> {
        sqlx::query_as::<_, Notification>(
            "UPDATE notifications SET state = $2 \
             WHERE id = $1 AND state = ANY($3) RETURNING *",
        )
        .bind(id)
        .bind(new_state)
        .bind(as_tokens(allowed_from))
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            FeedError::with_source(
                ErrorKind::StoreUnavailable,
                "Failed to update notification state",
                e,
            )
        })
    }

    async fn update_state_many(
        &self,
        user_id: Uuid,
        from: NotificationState,
        to: NotificationState,
    ) -> FeedResult<u64> {
        let result = sqlx::query(
            "UPDATE notifications SET state = $3 WHERE user_id = $1 AND state = $2",
        )
        .bind(user_id)
        .bind(from)
        .bind(to)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            FeedError::with_source(
                ErrorKind::StoreUnavailable,
                "Failed to bulk-update notification states",
                e,
            )
        })?;
        Ok(result.rows_affected())
    }

    async fn query_page(
        &self,
        user_id: Uuid,
        exclude_states: &[NotificationState],
        before: Option<DateTime<Utc>>,
        limit: u32,
    ) -> FeedResult<Vec<Notification>> {
        sqlx::query_as::<_, Notification>(
            "SELECT * FROM notifications \
             WHERE user_id = $1 AND state <> ALL($2) \
             AND ($3::timestamptz IS NULL OR created_at < $3) \
             ORDER BY created_at DESC, id DESC LIMIT $4",
        )
        .bind(user_id)
        .bind(as_tokens(exclude_states))
        .bind(before)
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            FeedError::with_source(ErrorKind::StoreUnavailable, "Failed to query feed page", e)
        })
    }

    async fn count_by_state(&self, user_id: Uuid, state: NotificationState) -> FeedResult<u64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM notifications WHERE user_id = $1 AND state = $2",
        )
        .bind(user_id)
        .bind(state)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            FeedError::with_source(
                ErrorKind::StoreUnavailable,
                "Failed to count notifications",
                e,
            )
        })?;
        Ok(count as u64)
    }

    async fn delete_batch(&self, older_than: DateTime<Utc>, max_rows: u32) -> FeedResult<u64> {
        let result = sqlx::query(
            "DELETE FROM notifications WHERE id IN (\
             SELECT id FROM notifications WHERE created_at < $1 \
             ORDER BY created_at ASC LIMIT $2)",
        )
        .bind(older_than)
        .bind(i64::from(max_rows))
        .execute(&self.pool)
        .await
        .map_err(|e| {
            FeedError::with_source(
                ErrorKind::StoreUnavailable,
                "Failed to delete notification batch",
                e,
            )
        })?;
        Ok(result.rows_affected())
    }
}
