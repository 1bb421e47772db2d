//! Cache key construction.
//!
//! All helpers here so that key layout stays in one place. Every key
//! belonging to one user starts with [`user_prefix`], which is what makes
//! whole-user invalidation a single `delete_prefix` call.

use uuid::Uuid;

/// Prefix shared by every notification-feed cache key.
const PREFIX: &str = "notif";

/// Cursor token used for the first (most recent) feed page.
pub const FIRST_PAGE: &str = "latest";

// ── Feed pages ─────────────────────────────────────────────────────────────

/// Key for one cached feed page of a user.
///
/// `cursor_token` is either [`FIRST_PAGE`] or the opaque cursor the page
/// was requested with.
pub fn feed_page(user_id: &Uuid, cursor_token: &str) -> String {
    format!("{PREFIX}:{user_id}:feed:{cursor_token}")
}

/// Key for a user's cached unread count.
pub fn unread_count(user_id: &Uuid) -> String {
    format!("{PREFIX}:{user_id}:unread")
}

// ── Invalidation ───────────────────────────────────────────────────────────

/// Prefix covering every cache entry owned by one user.
pub fn user_prefix(user_id: &Uuid) -> String {
    format!("{PREFIX}:{user_id}:")
}
