//! In-memory push bus for single-node deployments.

use std::collections::HashMap;

use async_trait::async_trait;
use futures::StreamExt;
use tokio::sync::RwLock;
use tokio::sync::broadcast;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::wrappers::errors::BroadcastStreamRecvError;
use tracing::warn;

use notifeed_core::FeedResult;
use notifeed_core::config::bus::MemoryBusConfig;
use notifeed_core::traits::bus::{FeedBus, PushStream};
use notifeed_core::types::Notification;

/// In-memory push bus over tokio broadcast channels.
///
/// A channel is created lazily on first subscription, so publishing to a
/// topic nobody listens on is a no-op.
#[derive(Debug)]
pub struct MemoryFeedBus {
    /// Topic name → broadcast sender
    channels: RwLock<HashMap<String, broadcast::Sender<Notification>>>,
    /// Buffer size for topic channels
    buffer_size: usize,
}

impl MemoryFeedBus {
    /// Create a new in-memory push bus.
    pub fn new(config: &MemoryBusConfig) -> Self {
        Self {
            channels: RwLock::new(HashMap::new()),
            buffer_size: config.buffer_size.max(1),
        }
    }
}

#[async_trait]
impl FeedBus for MemoryFeedBus {
    async fn publish(&self, topic: &str, notification: &Notification) -> FeedResult<()> {
        let channels = self.channels.read().await;
        if let Some(tx) = channels.get(topic) {
            // A send error just means every subscriber already hung up.
            let _ = tx.send(notification.clone());
        }
        Ok(())
    }

    async fn subscribe(&self, topic: &str) -> FeedResult<PushStream> {
        let mut channels = self.channels.write().await;
        let tx = channels
            .entry(topic.to_string())
            .or_insert_with(|| broadcast::channel(self.buffer_size).0);
        let rx = tx.subscribe();

        let stream = BroadcastStream::new(rx).filter_map(|result| async move {
            match result {
                Ok(notification) => Some(notification),
                Err(BroadcastStreamRecvError::Lagged(skipped)) => {
                    warn!(skipped, "Push subscriber lagged; missed notifications");
                    None
                }
            }
        });

        Ok(Box::pin(stream))
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use chrono::Utc;
    use tokio::time::timeout;
    use uuid::Uuid;

    use notifeed_core::types::NotificationState;

    use super::*;

    const RECV_WAIT: Duration = Duration::from_millis(200);

    fn make_bus() -> MemoryFeedBus {
        MemoryFeedBus::new(&MemoryBusConfig::default())
    }

    fn make_notification(user_id: Uuid, message: &str) -> Notification {
        Notification {
            id: Uuid::now_v7(),
            user_id,
            message: message.to_string(),
            state: NotificationState::Unread,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn connected_subscriber_receives_publication() {
        let bus = make_bus();
        let user_id = Uuid::new_v4();
        let topic = crate::topic::user_topic(&user_id);

        let mut stream = bus.subscribe(&topic).await.unwrap();
        let sent = make_notification(user_id, "hello");
        bus.publish(&topic, &sent).await.unwrap();

        let received = timeout(RECV_WAIT, stream.next()).await.unwrap().unwrap();
        assert_eq!(received, sent);
    }

    #[tokio::test]
    async fn late_subscriber_sees_nothing_from_before() {
        let bus = make_bus();
        let user_id = Uuid::new_v4();
        let topic = crate::topic::user_topic(&user_id);

        let early = make_notification(user_id, "before subscribe");
        bus.publish(&topic, &early).await.unwrap();

        let mut stream = bus.subscribe(&topic).await.unwrap();
        let late = make_notification(user_id, "after subscribe");
        bus.publish(&topic, &late).await.unwrap();

        let received = timeout(RECV_WAIT, stream.next()).await.unwrap().unwrap();
        assert_eq!(received, late);
    }

    #[tokio::test]
    async fn every_subscriber_gets_its_own_copy() {
        let bus = make_bus();
        let user_id = Uuid::new_v4();
        let topic = crate::topic::user_topic(&user_id);

        let mut first = bus.subscribe(&topic).await.unwrap();
        let mut second = bus.subscribe(&topic).await.unwrap();

        let sent = make_notification(user_id, "fan out");
        bus.publish(&topic, &sent).await.unwrap();

        let a = timeout(RECV_WAIT, first.next()).await.unwrap().unwrap();
        let b = timeout(RECV_WAIT, second.next()).await.unwrap().unwrap();
        assert_eq!(a, sent);
        assert_eq!(b, sent);
    }

    #[tokio::test]
    async fn topics_are_isolated_per_user() {
        let bus = make_bus();
        let subscriber_user = Uuid::new_v4();
        let other_user = Uuid::new_v4();

        let mut stream = bus
            .subscribe(&crate::topic::user_topic(&subscriber_user))
            .await
            .unwrap();

        let foreign = make_notification(other_user, "not yours");
        bus.publish(&crate::topic::user_topic(&other_user), &foreign)
            .await
            .unwrap();

        assert!(timeout(Duration::from_millis(100), stream.next())
            .await
            .is_err());
    }

    #[tokio::test]
    async fn publish_without_subscribers_is_ok() {
        let bus = make_bus();
        let user_id = Uuid::new_v4();

        let n = make_notification(user_id, "into the void");
        bus.publish(&crate::topic::user_topic(&user_id), &n)
            .await
            .unwrap();
    }
}
