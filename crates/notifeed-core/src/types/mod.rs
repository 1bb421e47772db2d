//! Core type definitions used across the Notifeed workspace.

pub mod connection;
pub mod cursor;
pub mod notification;
pub mod state;

pub use connection::{FeedConnection, FeedEdge, PageInfo};
pub use notification::Notification;
pub use state::NotificationState;
