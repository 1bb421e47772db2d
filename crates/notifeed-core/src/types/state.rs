//! Notification lifecycle states and the transitions allowed between them.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::FeedError;

/// Lifecycle state of a notification.
///
/// The set is closed: any other token is rejected before it reaches the
/// store. `Dismissed` and `Autodismissed` are terminal and hide the
/// notification from the feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "UPPERCASE"))]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NotificationState {
    /// Freshly created, not yet seen by the user.
    Unread,
    /// Seen by the user, still in the feed.
    Viewed,
    /// Dismissed by the user.
    Dismissed,
    /// Dismissed by the system (expiry policy).
    Autodismissed,
}

impl NotificationState {
    /// Every member of the closed enum.
    pub const ALL: [NotificationState; 4] = [
        Self::Unread,
        Self::Viewed,
        Self::Dismissed,
        Self::Autodismissed,
    ];

    /// States excluded from feed queries.
    pub const HIDDEN: [NotificationState; 2] = [Self::Dismissed, Self::Autodismissed];

    /// Return the state as its uppercase wire token.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unread => "UNREAD",
            Self::Viewed => "VIEWED",
            Self::Dismissed => "DISMISSED",
            Self::Autodismissed => "AUTODISMISSED",
        }
    }

    /// Whether a notification may move from `self` to `next`.
    ///
    /// Terminal states have no outbound transitions and nothing transitions
    /// back into `Unread`; auto-dismissal is reachable from every live state.
    pub fn can_transition_to(&self, next: NotificationState) -> bool {
        matches!(
            (self, next),
            (Self::Unread, Self::Viewed)
                | (Self::Unread, Self::Dismissed)
                | (Self::Viewed, Self::Dismissed)
                | (Self::Unread, Self::Autodismissed)
                | (Self::Viewed, Self::Autodismissed)
        )
    }

    /// The states from which `target` is reachable.
    ///
    /// Used as the guard set for compare-and-set state updates.
    pub fn allowed_sources(target: NotificationState) -> Vec<NotificationState> {
        Self::ALL
            .iter()
            .copied()
            .filter(|s| s.can_transition_to(target))
            .collect()
    }

    /// Whether this state has no outbound transitions.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Dismissed | Self::Autodismissed)
    }

    /// Whether a notification in this state appears in the feed.
    pub fn is_visible(&self) -> bool {
        !self.is_terminal()
    }
}

impl fmt::Display for NotificationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for NotificationState {
    type Err = FeedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "UNREAD" => Ok(Self::Unread),
            "VIEWED" => Ok(Self::Viewed),
            "DISMISSED" => Ok(Self::Dismissed),
            "AUTODISMISSED" => Ok(Self::Autodismissed),
            _ => Err(FeedError::invalid_state(format!(
                "Invalid notification state: '{s}'. Expected one of: UNREAD, VIEWED, DISMISSED, AUTODISMISSED"
            ))),
        }
    }
}
