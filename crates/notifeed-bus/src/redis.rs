//! Redis pub/sub bus for multi-node deployments.

use async_trait::async_trait;
use futures::StreamExt;
use redis::Client;
use redis::aio::ConnectionManager;
use tracing::{info, warn};

use notifeed_core::config::bus::RedisBusConfig;
use notifeed_core::error::{ErrorKind, FeedError};
use notifeed_core::result::FeedResult;
use notifeed_core::traits::bus::{FeedBus, PushStream};
use notifeed_core::types::Notification;

/// Redis-backed push bus.
///
/// Publications go out over a shared multiplexed connection; every
/// subscription opens its own pub/sub connection, which is what Redis
/// requires for SUBSCRIBE.
#[derive(Debug, Clone)]
pub struct RedisFeedBus {
    /// Client handle used to open per-subscription pub/sub connections.
    client: Client,
    /// Shared connection for PUBLISH commands.
    conn: ConnectionManager,
}

impl RedisFeedBus {
    /// Connect a new Redis push bus.
    pub async fn connect(config: &RedisBusConfig) -> FeedResult<Self> {
        let client = Client::open(config.url.as_str()).map_err(|e| {
            FeedError::with_source(ErrorKind::BusUnavailable, "Failed to create Redis client", e)
        })?;

        let conn = ConnectionManager::new(client.clone()).await.map_err(|e| {
            FeedError::with_source(ErrorKind::BusUnavailable, "Failed to connect to Redis", e)
        })?;

        info!("Connected Redis push bus");
        Ok(Self { client, conn })
    }

    /// Map a Redis error to a FeedError.
    fn map_err(e: redis::RedisError) -> FeedError {
        FeedError::with_source(ErrorKind::BusUnavailable, format!("Redis error: {e}"), e)
    }
}

#[async_trait]
impl FeedBus for RedisFeedBus {
    async fn publish(&self, topic: &str, notification: &Notification) -> FeedResult<()> {
        let payload = serde_json::to_string(notification)?;
        let mut conn = self.conn.clone();

        redis::cmd("PUBLISH")
            .arg(topic)
            .arg(&payload)
            .query_async::<i64>(&mut conn)
            .await
            .map_err(Self::map_err)?;

        Ok(())
    }

    async fn subscribe(&self, topic: &str) -> FeedResult<PushStream> {
        let mut pubsub = self
            .client
            .get_async_pubsub()
            .await
            .map_err(Self::map_err)?;
        pubsub.subscribe(topic).await.map_err(Self::map_err)?;

        let stream = pubsub.into_on_message().filter_map(|msg| async move {
            let payload: String = match msg.get_payload() {
                Ok(payload) => payload,
                Err(e) => {
                    warn!(error = %e, "Dropping non-text pub/sub payload");
                    return None;
                }
            };
            match serde_json::from_str::<Notification>(&payload) {
                Ok(notification) => Some(notification),
                Err(e) => {
                    warn!(error = %e, "Dropping undecodable pub/sub payload");
                    None
                }
            }
        });

        Ok(Box::pin(stream))
    }
}
