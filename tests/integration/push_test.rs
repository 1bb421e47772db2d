//! Integration tests for live push fan-out.

use std::time::Duration;

use futures::StreamExt;
use tokio::time::timeout;
use uuid::Uuid;

use crate::helpers;

/// Generous bound for receiving a message that should arrive.
const RECV_WAIT: Duration = Duration::from_millis(200);

/// Window in which a message that should NOT arrive would have.
const SILENCE: Duration = Duration::from_millis(100);

#[tokio::test]
async fn test_connected_subscriber_receives_created_notification() {
    let app = helpers::start_app().await;
    let engine = app.engine();
    let user_id = Uuid::new_v4();

    let mut stream = engine.subscribe_to_user(user_id).await.unwrap();
    let created = engine.create(user_id, "ping").await.unwrap();

    let pushed = timeout(RECV_WAIT, stream.next())
        .await
        .expect("Timed out waiting for push")
        .expect("Stream closed");
    assert_eq!(pushed, created);
    app.shutdown().await;
}

#[tokio::test]
async fn test_notifications_created_before_subscribing_are_not_replayed() {
    let app = helpers::start_app().await;
    let engine = app.engine();
    let user_id = Uuid::new_v4();

    engine.create(user_id, "already gone").await.unwrap();

    let mut stream = engine.subscribe_to_user(user_id).await.unwrap();
    assert!(
        timeout(SILENCE, stream.next()).await.is_err(),
        "Expected no replay of earlier notifications"
    );

    // The missed notification is still on the durable feed.
    assert_eq!(engine.get_feed(user_id, None, None).await.unwrap().len(), 1);
    app.shutdown().await;
}

#[tokio::test]
async fn test_state_changes_do_not_fan_out() {
    let app = helpers::start_app().await;
    let engine = app.engine();
    let user_id = Uuid::new_v4();

    let mut stream = engine.subscribe_to_user(user_id).await.unwrap();
    let created = engine.create(user_id, "read me").await.unwrap();

    // Drain the create push, then mutate state.
    timeout(RECV_WAIT, stream.next())
        .await
        .expect("Timed out waiting for push")
        .expect("Stream closed");
    engine.update_state(created.id, "VIEWED").await.unwrap();

    assert!(
        timeout(SILENCE, stream.next()).await.is_err(),
        "State updates must not publish"
    );
    app.shutdown().await;
}

#[tokio::test]
async fn test_fanout_reaches_only_the_owners_subscribers() {
    let app = helpers::start_app().await;
    let engine = app.engine();
    let alice = Uuid::new_v4();
    let bob = Uuid::new_v4();

    let mut alice_stream = engine.subscribe_to_user(alice).await.unwrap();
    let mut bob_stream = engine.subscribe_to_user(bob).await.unwrap();

    let created = engine.create(alice, "for alice only").await.unwrap();

    let pushed = timeout(RECV_WAIT, alice_stream.next())
        .await
        .expect("Timed out waiting for push")
        .expect("Stream closed");
    assert_eq!(pushed.id, created.id);

    assert!(
        timeout(SILENCE, bob_stream.next()).await.is_err(),
        "Fan-out leaked across user topics"
    );
    app.shutdown().await;
}

#[tokio::test]
async fn test_every_connected_subscriber_gets_a_copy() {
    let app = helpers::start_app().await;
    let engine = app.engine();
    let user_id = Uuid::new_v4();

    let mut first = engine.subscribe_to_user(user_id).await.unwrap();
    let mut second = engine.subscribe_to_user(user_id).await.unwrap();

    let created = engine.create(user_id, "broadcast").await.unwrap();

    for stream in [&mut first, &mut second] {
        let pushed = timeout(RECV_WAIT, stream.next())
            .await
            .expect("Timed out waiting for push")
            .expect("Stream closed");
        assert_eq!(pushed.id, created.id);
    }
    app.shutdown().await;
}
