//! Monotonic creation timestamps.

use chrono::{DateTime, Duration, Utc};
use tokio::sync::Mutex;

use notifeed_core::types::cursor;

/// Hands out strictly increasing microsecond-precision timestamps.
///
/// Cursor bounds are exclusive, so two rows sharing a `created_at` could
/// hide one another at a page boundary. On a wall-clock tie the last value
/// is advanced by one microsecond, keeping every cursor unambiguous within
/// this process.
#[derive(Debug)]
pub(crate) struct MonotonicClock {
    last: Mutex<DateTime<Utc>>,
}

impl MonotonicClock {
    pub(crate) fn new() -> Self {
        Self {
            last: Mutex::new(DateTime::<Utc>::MIN_UTC),
        }
    }

    /// The current time, truncated to micros, never repeating or going
    /// backwards.
    pub(crate) async fn next(&self) -> DateTime<Utc> {
        let now = cursor::truncate_to_micros(Utc::now());
        let mut last = self.last.lock().await;
        let next = if now > *last {
            now
        } else {
            *last + Duration::microseconds(1)
        };
        *last = next;
        next
    }
}
