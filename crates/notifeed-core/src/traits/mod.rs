//! Collaborator contracts defined in `notifeed-core` and implemented by the
//! store, cache, and bus crates.

pub mod bus;
pub mod cache;
pub mod store;

pub use bus::{FeedBus, PushStream};
pub use cache::FeedCache;
pub use store::NotificationStore;
