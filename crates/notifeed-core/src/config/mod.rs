//! Application configuration schemas.
//!
//! All configuration structs are deserialized from TOML files via the
//! `config` crate. Each sub-module represents a logical configuration
//! section. Every field has a serde default, so an empty environment yields
//! a fully in-memory engine.

pub mod bus;
pub mod cache;
pub mod feed;
pub mod logging;
pub mod store;
pub mod sweeper;

use serde::{Deserialize, Serialize};

use self::bus::BusConfig;
use self::cache::CacheConfig;
use self::feed::FeedTuning;
use self::logging::LoggingConfig;
use self::store::StoreConfig;
use self::sweeper::SweeperConfig;

use crate::error::FeedError;

/// Root application configuration.
///
/// This struct is the top-level deserialization target for the merged TOML
/// configuration files (default.toml + environment overlay).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NotifeedConfig {
    /// Notification store settings.
    #[serde(default)]
    pub store: StoreConfig,
    /// Cache provider settings.
    #[serde(default)]
    pub cache: CacheConfig,
    /// Fan-out bus settings.
    #[serde(default)]
    pub bus: BusConfig,
    /// Feed pagination and caching settings.
    #[serde(default)]
    pub feed: FeedTuning,
    /// Retention sweeper settings.
    #[serde(default)]
    pub sweeper: SweeperConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl NotifeedConfig {
    /// Load configuration from TOML files.
    ///
    /// Merges the default configuration with an environment-specific overlay
    /// and environment variables prefixed with `NOTIFEED__`.
    pub fn load(env: &str) -> Result<Self, FeedError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix("NOTIFEED")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| FeedError::configuration(format!("Failed to build config: {e}")))?;

        config
            .try_deserialize()
            .map_err(|e| FeedError::configuration(format!("Failed to deserialize config: {e}")))
    }
}
