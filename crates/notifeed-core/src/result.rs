//! Convenience result type alias for Notifeed.

use crate::error::FeedError;

/// A specialized `Result` type for Notifeed operations.
///
/// This is defined as a convenience so that every crate does not need to
/// write `Result<T, FeedError>` explicitly.
pub type FeedResult<T> = Result<T, FeedError>;
