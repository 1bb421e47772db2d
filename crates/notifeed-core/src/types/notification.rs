//! The notification record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::state::NotificationState;

/// A single notification owned by one user.
///
/// Everything except `state` is immutable once created. `created_at` doubles
/// as the pagination sort key and cursor value; stores truncate it to
/// microsecond precision at creation so cursor tokens round-trip exactly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    /// Store-generated identifier, unique across all notifications ever.
    pub id: Uuid,
    /// Owning user.
    pub user_id: Uuid,
    /// Opaque text payload.
    pub message: String,
    /// Lifecycle state.
    pub state: NotificationState,
    /// Creation timestamp, microsecond precision.
    pub created_at: DateTime<Utc>,
}

impl Notification {
    /// Whether this notification appears in feed queries.
    pub fn is_visible(&self) -> bool {
        self.state.is_visible()
    }
}
