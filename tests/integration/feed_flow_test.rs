//! Integration tests for the feed lifecycle: create, read, paginate,
//! and change state through the assembled engine.

use notifeed::{ErrorKind, NotificationState};
use uuid::Uuid;

use crate::helpers;

#[tokio::test]
async fn test_created_notifications_appear_newest_first() {
    let app = helpers::start_app().await;
    let engine = app.engine();
    let user_id = Uuid::new_v4();

    let ids = helpers::create_many(&engine, user_id, 3).await;

    let page = engine.get_feed(user_id, None, None).await.unwrap();
    assert_eq!(page.len(), 3);
    assert!(!page.page_info.has_next_page);

    let mut expected = ids.clone();
    expected.reverse();
    assert_eq!(helpers::page_ids(&page), expected);
    assert!(
        page.edges
            .iter()
            .all(|e| e.node.state == NotificationState::Unread)
    );

    assert_eq!(engine.unread_count(user_id).await.unwrap(), 3);
    app.shutdown().await;
}

#[tokio::test]
async fn test_create_invalidates_the_cached_first_page() {
    let app = helpers::start_app().await;
    let engine = app.engine();
    let user_id = Uuid::new_v4();

    helpers::create_many(&engine, user_id, 1).await;
    // Prime the first-page cache entry.
    assert_eq!(engine.get_feed(user_id, None, None).await.unwrap().len(), 1);

    let newest = engine.create(user_id, "breaking news").await.unwrap();

    let page = engine.get_feed(user_id, None, None).await.unwrap();
    assert_eq!(page.len(), 2);
    assert_eq!(page.edges[0].node.id, newest.id);
    app.shutdown().await;
}

#[tokio::test]
async fn test_dismissed_notifications_disappear_from_the_feed() {
    let app = helpers::start_app().await;
    let engine = app.engine();
    let user_id = Uuid::new_v4();

    let ids = helpers::create_many(&engine, user_id, 3).await;
    engine.get_feed(user_id, None, None).await.unwrap();

    let updated = engine.update_state(ids[1], "DISMISSED").await.unwrap();
    assert_eq!(updated.state, NotificationState::Dismissed);

    let page = engine.get_feed(user_id, None, None).await.unwrap();
    assert_eq!(page.len(), 2);
    assert!(!helpers::page_ids(&page).contains(&ids[1]));
    assert_eq!(engine.unread_count(user_id).await.unwrap(), 2);
    app.shutdown().await;
}

#[tokio::test]
async fn test_unknown_state_token_changes_nothing() {
    let app = helpers::start_app().await;
    let engine = app.engine();
    let user_id = Uuid::new_v4();

    let ids = helpers::create_many(&engine, user_id, 1).await;

    let err = engine.update_state(ids[0], "SNOOZED").await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidState);

    let page = engine.get_feed(user_id, None, None).await.unwrap();
    assert_eq!(page.edges[0].node.state, NotificationState::Unread);
    app.shutdown().await;
}

#[tokio::test]
async fn test_updating_a_missing_notification_is_not_found() {
    let app = helpers::start_app().await;
    let engine = app.engine();

    let err = engine
        .update_state(Uuid::new_v4(), "VIEWED")
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
    app.shutdown().await;
}

#[tokio::test]
async fn test_terminal_states_cannot_be_left() {
    let app = helpers::start_app().await;
    let engine = app.engine();
    let user_id = Uuid::new_v4();

    let ids = helpers::create_many(&engine, user_id, 1).await;
    engine.update_state(ids[0], "DISMISSED").await.unwrap();

    let err = engine.update_state(ids[0], "VIEWED").await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Conflict);
    app.shutdown().await;
}

#[tokio::test]
async fn test_pagination_walks_the_whole_feed() {
    let app = helpers::start_app().await;
    let engine = app.engine();
    let user_id = Uuid::new_v4();

    let ids = helpers::create_many(&engine, user_id, 25).await;

    let first = engine.get_feed(user_id, None, Some(20)).await.unwrap();
    assert_eq!(first.len(), 20);
    assert!(first.page_info.has_next_page);

    let cursor = first.page_info.end_cursor.clone().unwrap();
    let second = engine
        .get_feed(user_id, Some(&cursor), Some(20))
        .await
        .unwrap();
    assert_eq!(second.len(), 5);
    assert!(!second.page_info.has_next_page);

    let mut seen = helpers::page_ids(&first);
    seen.extend(helpers::page_ids(&second));
    let mut expected = ids.clone();
    expected.reverse();
    assert_eq!(seen, expected);
    app.shutdown().await;
}

#[tokio::test]
async fn test_repeated_reads_of_a_page_are_byte_identical() {
    let app = helpers::start_app().await;
    let engine = app.engine();
    let user_id = Uuid::new_v4();

    helpers::create_many(&engine, user_id, 5).await;

    let first = engine.get_feed(user_id, None, None).await.unwrap();
    let second = engine.get_feed(user_id, None, None).await.unwrap();
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
    app.shutdown().await;
}

#[tokio::test]
async fn test_malformed_cursor_and_blank_message_are_rejected() {
    let app = helpers::start_app().await;
    let engine = app.engine();
    let user_id = Uuid::new_v4();

    let err = engine
        .get_feed(user_id, Some("not-a-timestamp"), None)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);

    let err = engine.create(user_id, "   ").await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);

    let err = engine.create(Uuid::nil(), "hello").await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);
    app.shutdown().await;
}

#[tokio::test]
async fn test_mark_all_viewed_clears_the_unread_count() {
    let app = helpers::start_app().await;
    let engine = app.engine();
    let user_id = Uuid::new_v4();

    let ids = helpers::create_many(&engine, user_id, 4).await;
    engine.update_state(ids[0], "DISMISSED").await.unwrap();

    let changed = engine.mark_all_viewed(user_id).await.unwrap();
    assert_eq!(changed, 3);
    assert_eq!(engine.unread_count(user_id).await.unwrap(), 0);

    // Viewed rows stay on the feed; the dismissed one stays gone.
    let page = engine.get_feed(user_id, None, None).await.unwrap();
    assert_eq!(page.len(), 3);
    assert!(
        page.edges
            .iter()
            .all(|e| e.node.state == NotificationState::Viewed)
    );
    app.shutdown().await;
}

#[tokio::test]
async fn test_feeds_are_isolated_per_user() {
    let app = helpers::start_app().await;
    let engine = app.engine();
    let alice = Uuid::new_v4();
    let bob = Uuid::new_v4();

    helpers::create_many(&engine, alice, 2).await;
    helpers::create_many(&engine, bob, 1).await;

    assert_eq!(engine.get_feed(alice, None, None).await.unwrap().len(), 2);
    assert_eq!(engine.get_feed(bob, None, None).await.unwrap().len(), 1);
    app.shutdown().await;
}
