//! Fan-out publish/subscribe contract.

use std::pin::Pin;

use async_trait::async_trait;
use futures::Stream;

use crate::result::FeedResult;
use crate::types::notification::Notification;

/// A live, unbounded sequence of pushed notifications.
///
/// The stream yields events published while the subscription is active and
/// ends when the subscriber is dropped or the transport disconnects. There
/// is no replay: events published before the subscription began are never
/// delivered, and a reconnecting client recovers missed state through the
/// read path instead.
pub type PushStream = Pin<Box<dyn Stream<Item = Notification> + Send>>;

/// Topic-keyed fan-out to currently-connected subscribers.
#[async_trait]
pub trait FeedBus: Send + Sync + std::fmt::Debug + 'static {
    /// Deliver `notification` to every active subscriber of `topic`.
    ///
    /// Publishing to a topic nobody listens on is not an error.
    async fn publish(&self, topic: &str, notification: &Notification) -> FeedResult<()>;

    /// Open a new subscription on `topic`.
    ///
    /// Each call returns an independent stream positioned at "now".
    async fn subscribe(&self, topic: &str) -> FeedResult<PushStream>;
}
