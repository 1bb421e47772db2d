//! # notifeed-store
//!
//! [`NotificationStore`](notifeed_core::traits::NotificationStore)
//! implementations: PostgreSQL for production and an in-memory map for tests
//! and single-process runs, selected through [`StoreManager`].

#[cfg(any(feature = "memory", feature = "postgres"))]
mod clock;
#[cfg(feature = "memory")]
pub mod memory;
#[cfg(feature = "postgres")]
pub mod postgres;
pub mod provider;

pub use provider::StoreManager;
