//! # notifeed
//!
//! Embeddable notification feed engine: per-user feeds with cached
//! cursor pagination, live push fan-out, and batched retention cleanup.
//!
//! This crate assembles the workspace. Configuration picks the store,
//! cache, and bus backends, and [`Notifeed::start`] wires them into a
//! [`FeedEngine`] plus the background retention sweeper. An API layer
//! (GraphQL, HTTP, WebSocket) is expected to sit on top of the engine's
//! operations; none ships here.
//!
//! ```no_run
//! use notifeed::{Notifeed, NotifeedConfig};
//!
//! # async fn demo() -> notifeed::FeedResult<()> {
//! let config = NotifeedConfig::load("development")?;
//! let app = Notifeed::start(config).await?;
//!
//! let engine = app.engine();
//! let user_id = uuid::Uuid::new_v4();
//! engine.create(user_id, "Welcome aboard").await?;
//! let page = engine.get_feed(user_id, None, None).await?;
//! assert_eq!(page.len(), 1);
//!
//! app.shutdown().await;
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt};

use notifeed_bus::BusManager;
use notifeed_cache::CacheManager;
use notifeed_store::StoreManager;

pub use notifeed_core::config::NotifeedConfig;
pub use notifeed_core::config::feed::FeedTuning;
pub use notifeed_core::config::logging::LoggingConfig;
pub use notifeed_core::traits::{FeedBus, FeedCache, NotificationStore, PushStream};
pub use notifeed_core::types::{
    FeedConnection, FeedEdge, Notification, NotificationState, PageInfo,
};
pub use notifeed_core::{ErrorKind, FeedError, FeedResult};
pub use notifeed_engine::{FeedEngine, RetentionSweeper, SweepOutcome, SweepPolicy};

/// Initialize tracing/logging from configuration.
///
/// `RUST_LOG` overrides the configured level when set. Call once at
/// process start; embedding applications that install their own
/// subscriber should skip this.
pub fn init_logging(config: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    match config.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt().pretty().with_env_filter(filter).with_target(true).init();
        }
    }
}

/// A running engine assembly and its background tasks.
#[derive(Debug)]
pub struct Notifeed {
    /// The wired feed engine.
    engine: Arc<FeedEngine>,
    /// Sweeper task, when enabled.
    sweeper: Option<SweeperHandle>,
}

impl Notifeed {
    /// Connect the configured backends and start background tasks.
    pub async fn start(config: NotifeedConfig) -> FeedResult<Self> {
        info!("Starting Notifeed v{}", env!("CARGO_PKG_VERSION"));

        // ── Step 1: Collaborators ────────────────────────────────────
        let store = Arc::new(StoreManager::new(&config.store).await?);
        let cache = Arc::new(CacheManager::new(&config.cache).await?);
        let bus = Arc::new(BusManager::new(&config.bus).await?);

        // ── Step 2: Engine ───────────────────────────────────────────
        let engine = Arc::new(FeedEngine::new(store, cache, bus, config.feed.clone()));

        // ── Step 3: Retention sweeper ────────────────────────────────
        let sweeper = if config.sweeper.enabled {
            let sweeper = RetentionSweeper::new(
                Arc::clone(&engine),
                SweepPolicy::from(&config.sweeper),
            );
            Some(SweeperHandle::spawn(sweeper))
        } else {
            info!("Retention sweeper disabled");
            None
        };

        info!("Notifeed started");
        Ok(Self { engine, sweeper })
    }

    /// Assemble an engine over caller-supplied backends.
    ///
    /// No background tasks are spawned; drive a [`RetentionSweeper`]
    /// yourself if you need one. Intended for embedding and tests.
    pub fn with_backends(
        store: Arc<dyn NotificationStore>,
        cache: Arc<dyn FeedCache>,
        bus: Arc<dyn FeedBus>,
        tuning: FeedTuning,
    ) -> Self {
        Self {
            engine: Arc::new(FeedEngine::new(store, cache, bus, tuning)),
            sweeper: None,
        }
    }

    /// Handle to the feed engine.
    pub fn engine(&self) -> Arc<FeedEngine> {
        Arc::clone(&self.engine)
    }

    /// Stop background tasks and wait for them to drain.
    pub async fn shutdown(self) {
        if let Some(sweeper) = self.sweeper {
            sweeper.stop().await;
        }
        info!("Notifeed shut down");
    }
}

/// Owns the spawned sweeper task and its stop signal.
#[derive(Debug)]
pub struct SweeperHandle {
    stop: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl SweeperHandle {
    /// Spawn the sweeper loop on the current runtime.
    pub fn spawn(sweeper: RetentionSweeper) -> Self {
        let (stop, shutdown) = watch::channel(false);
        let task = tokio::spawn(async move { sweeper.run(shutdown).await });
        Self { stop, task }
    }

    /// Signal the sweeper to stop and wait for it, bounded.
    ///
    /// The bound covers one in-flight delete batch; the sweeper checks
    /// the signal between batches.
    pub async fn stop(self) {
        let _ = self.stop.send(true);
        let _ = tokio::time::timeout(Duration::from_secs(30), self.task).await;
    }
}
