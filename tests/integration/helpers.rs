//! Shared test helpers for integration tests.

use std::sync::Arc;

use uuid::Uuid;

use notifeed::{FeedEngine, Notifeed, NotifeedConfig};

/// Start the full assembly on the default all-in-memory configuration,
/// with the background sweeper disabled so tests control timing.
pub async fn start_app() -> Notifeed {
    let mut config = NotifeedConfig::default();
    config.sweeper.enabled = false;
    Notifeed::start(config).await.expect("Failed to start app")
}

/// Create `count` notifications for `user_id` and return their ids in
/// creation order (oldest first).
pub async fn create_many(engine: &Arc<FeedEngine>, user_id: Uuid, count: usize) -> Vec<Uuid> {
    let mut ids = Vec::with_capacity(count);
    for i in 0..count {
        let n = engine
            .create(user_id, &format!("notification {i}"))
            .await
            .expect("Failed to create notification");
        ids.push(n.id);
    }
    ids
}

/// Ids of the notifications on a feed page, newest first.
pub fn page_ids(page: &notifeed::FeedConnection) -> Vec<Uuid> {
    page.edges.iter().map(|edge| edge.node.id).collect()
}
