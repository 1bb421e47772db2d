//! Bus manager that dispatches to the configured provider.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use notifeed_core::config::bus::BusConfig;
use notifeed_core::error::FeedError;
use notifeed_core::result::FeedResult;
use notifeed_core::traits::bus::{FeedBus, PushStream};
use notifeed_core::types::Notification;

/// Bus manager that wraps the configured push bus provider.
///
/// The provider is selected at construction time based on configuration.
#[derive(Debug, Clone)]
pub struct BusManager {
    /// The inner bus provider.
    inner: Arc<dyn FeedBus>,
}

impl BusManager {
    /// Create a new bus manager from configuration.
    pub async fn new(config: &BusConfig) -> FeedResult<Self> {
        let inner: Arc<dyn FeedBus> = match config.provider.as_str() {
            #[cfg(feature = "redis-backend")]
            "redis" => {
                info!("Initializing Redis push bus");
                Arc::new(crate::redis::RedisFeedBus::connect(&config.redis).await?)
            }
            #[cfg(feature = "memory")]
            "memory" => {
                info!("Initializing in-memory push bus");
                Arc::new(crate::memory::MemoryFeedBus::new(&config.memory))
            }
            other => {
                return Err(FeedError::configuration(format!(
                    "Unknown bus provider: '{other}'. Supported: memory, redis"
                )));
            }
        };

        Ok(Self { inner })
    }

    /// Create a bus manager from an existing provider (for testing).
    pub fn from_bus(bus: Arc<dyn FeedBus>) -> Self {
        Self { inner: bus }
    }

    /// Get a reference to the inner provider.
    pub fn bus(&self) -> &dyn FeedBus {
        self.inner.as_ref()
    }
}

#[async_trait]
impl FeedBus for BusManager {
    async fn publish(&self, topic: &str, notification: &Notification) -> FeedResult<()> {
        self.inner.publish(topic, notification).await
    }

    async fn subscribe(&self, topic: &str) -> FeedResult<PushStream> {
        self.inner.subscribe(topic).await
    }
}
