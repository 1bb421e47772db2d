//! Integration tests for the background retention sweeper.

use std::sync::Arc;
use std::time::Duration;

use futures::StreamExt;
use tokio::sync::watch;
use tokio::time::timeout;
use uuid::Uuid;

use notifeed::{FeedTuning, Notifeed, RetentionSweeper, SweepPolicy};
use notifeed_bus::memory::MemoryFeedBus;
use notifeed_cache::memory::MemoryFeedCache;
use notifeed_core::config::bus::MemoryBusConfig;
use notifeed_core::config::cache::MemoryCacheConfig;
use notifeed_store::memory::MemoryNotificationStore;

use crate::helpers;

/// Assemble the facade over an externally held store so tests can
/// observe deletions directly.
fn app_with_visible_store() -> (Notifeed, Arc<MemoryNotificationStore>) {
    let store = Arc::new(MemoryNotificationStore::new());
    let app = Notifeed::with_backends(
        Arc::clone(&store) as Arc<dyn notifeed::NotificationStore>,
        Arc::new(MemoryFeedCache::new(&MemoryCacheConfig::default())),
        Arc::new(MemoryFeedBus::new(&MemoryBusConfig::default())),
        FeedTuning::default(),
    );
    (app, store)
}

/// A policy aggressive enough to observe within a test run.
fn fast_policy() -> SweepPolicy {
    SweepPolicy {
        interval: Duration::from_millis(50),
        retention: Duration::ZERO,
        batch_size: 5,
        batch_delay: Duration::from_millis(1),
    }
}

#[tokio::test]
async fn test_spawned_sweeper_reclaims_expired_rows() {
    let (app, store) = app_with_visible_store();
    let engine = app.engine();
    let user_id = Uuid::new_v4();

    // 12 rows forces multiple delete batches at batch_size 5.
    helpers::create_many(&engine, user_id, 12).await;
    assert_eq!(store.len().await, 12);

    let handle = notifeed::SweeperHandle::spawn(RetentionSweeper::new(engine, fast_policy()));
    tokio::time::sleep(Duration::from_millis(300)).await;
    handle.stop().await;

    assert_eq!(store.len().await, 0);

    // A row created after stop() sticks around: the task is gone.
    let engine = app.engine();
    engine.create(user_id, "survivor").await.unwrap();
    tokio::time::sleep(Duration::from_millis(150)).await;
    assert_eq!(store.len().await, 1);
    app.shutdown().await;
}

#[tokio::test]
async fn test_sweep_leaves_cache_and_bus_untouched() {
    let (app, store) = app_with_visible_store();
    let engine = app.engine();
    let user_id = Uuid::new_v4();

    helpers::create_many(&engine, user_id, 3).await;
    let cached = engine.get_feed(user_id, None, None).await.unwrap();
    assert_eq!(cached.len(), 3);
    let mut stream = engine.subscribe_to_user(user_id).await.unwrap();

    // Let the wall clock move past the last monotonic insert stamp, so a
    // zero-retention cutoff taken now covers every row.
    tokio::time::sleep(Duration::from_millis(5)).await;

    let sweeper = RetentionSweeper::new(Arc::clone(&engine), fast_policy());
    let (_stop, shutdown) = watch::channel(false);
    let outcome = sweeper.sweep(&shutdown).await.unwrap();
    assert_eq!(outcome.rows_deleted, 3);
    assert_eq!(store.len().await, 0);

    // No pushes for deletions.
    assert!(
        timeout(Duration::from_millis(100), stream.next())
            .await
            .is_err(),
        "Sweeps must not publish"
    );

    // The cached page is served as-is until its TTL lapses.
    let page = engine.get_feed(user_id, None, None).await.unwrap();
    assert_eq!(
        serde_json::to_string(&page).unwrap(),
        serde_json::to_string(&cached).unwrap()
    );
    app.shutdown().await;
}

#[tokio::test]
async fn test_facade_shutdown_stops_the_configured_sweeper() {
    // Default config enables the sweeper on its 24h interval; shutdown
    // must interrupt the pending tick rather than wait it out.
    let app = Notifeed::start(notifeed::NotifeedConfig::default())
        .await
        .unwrap();
    timeout(Duration::from_secs(5), app.shutdown())
        .await
        .expect("Shutdown did not stop the sweeper");
}
