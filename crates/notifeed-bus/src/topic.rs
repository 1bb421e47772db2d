//! Topic naming.
//!
//! Topics are per-user: a subscriber to `user_topic(id)` receives every
//! notification created for that user while subscribed.

use uuid::Uuid;

/// Topic carrying one user's live notifications.
pub fn user_topic(user_id: &Uuid) -> String {
    format!("user:{user_id}")
}
