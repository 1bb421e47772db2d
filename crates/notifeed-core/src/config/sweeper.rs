//! Retention sweeper configuration.

use serde::{Deserialize, Serialize};

/// Retention sweeper settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SweeperConfig {
    /// Whether the sweeper task is spawned at all.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Hours between sweep runs.
    #[serde(default = "default_interval_hours")]
    pub interval_hours: u64,
    /// Age in days beyond which notifications are deleted.
    #[serde(default = "default_retention_days")]
    pub retention_days: u32,
    /// Maximum rows deleted per batch.
    #[serde(default = "default_batch_size")]
    pub batch_size: u32,
    /// Pause in milliseconds between batches within one run.
    #[serde(default = "default_batch_delay")]
    pub batch_delay_ms: u64,
}

impl Default for SweeperConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            interval_hours: default_interval_hours(),
            retention_days: default_retention_days(),
            batch_size: default_batch_size(),
            batch_delay_ms: default_batch_delay(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_interval_hours() -> u64 {
    24
}

fn default_retention_days() -> u32 {
    7
}

fn default_batch_size() -> u32 {
    1000
}

fn default_batch_delay() -> u64 {
    100
}
