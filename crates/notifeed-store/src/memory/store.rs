//! In-memory notification store.
//!
//! Backs tests and single-process runs. Rows live in one `RwLock`'d map;
//! the single write section is what gives compare-and-set updates the
//! atomicity the contract requires.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use notifeed_core::result::FeedResult;
use notifeed_core::traits::NotificationStore;
use notifeed_core::types::{Notification, NotificationState};

use crate::clock::MonotonicClock;

/// Map-backed notification store.
#[derive(Debug)]
pub struct MemoryNotificationStore {
    rows: RwLock<HashMap<Uuid, Notification>>,
    clock: MonotonicClock,
}

impl MemoryNotificationStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            rows: RwLock::new(HashMap::new()),
            clock: MonotonicClock::new(),
        }
    }

    /// Number of rows currently held.
    pub async fn len(&self) -> usize {
        self.rows.read().await.len()
    }

    /// Whether the store holds no rows.
    pub async fn is_empty(&self) -> bool {
        self.rows.read().await.is_empty()
    }
}

impl Default for MemoryNotificationStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl NotificationStore for MemoryNotificationStore {
    async fn insert(
        &self,
        user_id: Uuid,
        message: &str,
        state: NotificationState,
    ) -> FeedResult<Notification> {
        let notification = Notification {
            id: Uuid::now_v7(),
            user_id,
            message: message.to_string(),
            state,
            created_at: self.clock.next().await,
        };
        self.rows
            .write()
            .await
            .insert(notification.id, notification.clone());
        Ok(notification)
    }

    async fn find_by_id(&self, id: Uuid) -> FeedResult<Option<Notification>> {
        Ok(self.rows.read().await.get(&id).cloned())
    }

    async fn update_state(
        &self,
        id: Uuid,
        new_state: NotificationState,
        allowed_from: &[NotificationState],
    ) -> FeedResult<Option<Notification>> {
        let mut rows = self.rows.write().await;
        match rows.get_mut(&id) {
            Some(row) if allowed_from.contains(&row.state) => {
                row.state = new_state;
                Ok(Some(row.clone()))
            }
            _ => Ok(None),
        }
    }

    async fn update_state_many(
        &self,
        user_id: Uuid,
        from: NotificationState,
        to: NotificationState,
    ) -> FeedResult<u64> {
        let mut rows = self.rows.write().await;
        let mut changed = 0;
        for row in rows.values_mut() {
            if row.user_id == user_id && row.state == from {
                row.state = to;
                changed += 1;
            }
        }
        Ok(changed)
    }

    async fn query_page(
        &self,
        user_id: Uuid,
        exclude_states: &[NotificationState],
        before: Option<DateTime<Utc>>,
        limit: u32,
    ) -> FeedResult<Vec<Notification>> {
        let rows = self.rows.read().await;
        let mut page: Vec<Notification> = rows
            .values()
            .filter(|n| n.user_id == user_id)
            .filter(|n| !exclude_states.contains(&n.state))
            .filter(|n| before.is_none_or(|bound| n.created_at < bound))
            .cloned()
            .collect();
        page.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });
        page.truncate(limit as usize);
        Ok(page)
    }

    async fn count_by_state(&self, user_id: Uuid, state: NotificationState) -> FeedResult<u64> {
        let rows = self.rows.read().await;
        Ok(rows
            .values()
            .filter(|n| n.user_id == user_id && n.state == state)
            .count() as u64)
    }

    async fn delete_batch(&self, older_than: DateTime<Utc>, max_rows: u32) -> FeedResult<u64> {
        let mut rows = self.rows.write().await;
        let mut victims: Vec<(DateTime<Utc>, Uuid)> = rows
            .values()
            .filter(|n| n.created_at < older_than)
            .map(|n| (n.created_at, n.id))
            .collect();
        victims.sort();
        victims.truncate(max_rows as usize);
        for (_, id) in &victims {
            rows.remove(id);
        }
        Ok(victims.len() as u64)
    }
}
