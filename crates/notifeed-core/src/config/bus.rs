//! Fan-out bus configuration.

use serde::{Deserialize, Serialize};

/// Top-level bus configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BusConfig {
    /// Bus provider type: `"memory"` or `"redis"`.
    #[serde(default = "default_provider")]
    pub provider: String,
    /// In-process bus configuration.
    #[serde(default)]
    pub memory: MemoryBusConfig,
    /// Redis pub/sub configuration.
    #[serde(default)]
    pub redis: RedisBusConfig,
}

impl Default for BusConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            memory: MemoryBusConfig::default(),
            redis: RedisBusConfig::default(),
        }
    }
}

/// In-process broadcast bus configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryBusConfig {
    /// Per-topic broadcast buffer size; slow subscribers lagging past this
    /// many pending events skip ahead and miss the overwritten ones.
    #[serde(default = "default_buffer_size")]
    pub buffer_size: usize,
}

impl Default for MemoryBusConfig {
    fn default() -> Self {
        Self {
            buffer_size: default_buffer_size(),
        }
    }
}

/// Redis pub/sub bus configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedisBusConfig {
    /// Redis connection URL.
    #[serde(default = "default_redis_url")]
    pub url: String,
}

impl Default for RedisBusConfig {
    fn default() -> Self {
        Self {
            url: default_redis_url(),
        }
    }
}

fn default_provider() -> String {
    "memory".to_string()
}

fn default_buffer_size() -> usize {
    256
}

fn default_redis_url() -> String {
    "redis://localhost:6379".to_string()
}
