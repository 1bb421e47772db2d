//! Store manager that dispatches to the configured backend.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::info;
use uuid::Uuid;

use notifeed_core::config::store::StoreConfig;
use notifeed_core::error::FeedError;
use notifeed_core::result::FeedResult;
use notifeed_core::traits::NotificationStore;
use notifeed_core::types::{Notification, NotificationState};

/// Store manager that wraps the configured notification store.
///
/// The backend is selected at construction time based on configuration.
#[derive(Debug, Clone)]
pub struct StoreManager {
    /// The inner store backend.
    inner: Arc<dyn NotificationStore>,
}

impl StoreManager {
    /// Create a new store manager from configuration.
    pub async fn new(config: &StoreConfig) -> FeedResult<Self> {
        let inner: Arc<dyn NotificationStore> = match config.provider.as_str() {
            #[cfg(feature = "postgres")]
            "postgres" => {
                info!("Initializing PostgreSQL notification store");
                let pool = crate::postgres::DatabasePool::connect(&config.postgres).await?;
                if config.postgres.run_migrations {
                    crate::postgres::migration::run_migrations(pool.pool()).await?;
                }
                Arc::new(crate::postgres::PostgresNotificationStore::new(
                    pool.into_pool(),
                ))
            }
            #[cfg(feature = "memory")]
            "memory" => {
                info!("Initializing in-memory notification store");
                Arc::new(crate::memory::MemoryNotificationStore::new())
            }
            other => {
                return Err(FeedError::configuration(format!(
                    "Unknown store provider: '{other}'. Supported: memory, postgres"
                )));
            }
        };

        Ok(Self { inner })
    }

    /// Create a store manager from an existing backend (for testing).
    pub fn from_store(store: Arc<dyn NotificationStore>) -> Self {
        Self { inner: store }
    }

    /// Get a reference to the inner backend.
    pub fn store(&self) -> &dyn NotificationStore {
        self.inner.as_ref()
    }
}

#[async_trait]
impl NotificationStore for StoreManager {
    async fn insert(
        &self,
        user_id: Uuid,
        message: &str,
        state: NotificationState,
    ) -> FeedResult<Notification> {
        self.inner.insert(user_id, message, state).await
    }

    async fn find_by_id(&self, id: Uuid) -> FeedResult<Option<Notification>> {
        self.inner.find_by_id(id).await
    }

    async fn update_state(
        &self,
        id: Uuid,
        new_state: NotificationState,
        allowed_from: &[NotificationState],
    ) -> FeedResult<Option<Notification>> {
        self.inner.update_state(id, new_state, allowed_from).await
    }

    async fn update_state_many(
        &self,
        user_id: Uuid,
        from: NotificationState,
        to: NotificationState,
    ) -> FeedResult<u64> {
        self.inner.update_state_many(user_id, from, to).await
    }

    async fn query_page(
        &self,
        user_id: Uuid,
        exclude_states: &[NotificationState],
        before: Option<DateTime<Utc>>,
        limit: u32,
    ) -> FeedResult<Vec<Notification>> {
        self.inner
            .query_page(user_id, exclude_states, before, limit)
            .await
    }

    async fn count_by_state(&self, user_id: Uuid, state: NotificationState) -> FeedResult<u64> {
        self.inner.count_by_state(user_id, state).await
    }

    async fn delete_batch(&self, older_than: DateTime<Utc>, max_rows: u32) -> FeedResult<u64> {
        self.inner.delete_batch(older_than, max_rows).await
    }
}
