//! # notifeed-bus
//!
//! Push bus implementations for Notifeed. Supports two modes:
//!
//! - **memory**: In-process fan-out over tokio broadcast channels
//! - **redis**: Redis pub/sub for multi-node deployments
//!
//! Delivery is at-most-once and starts at subscription time: a subscriber
//! only sees notifications published while it is connected. Nothing is
//! replayed, so the bus never substitutes for the store.

pub mod topic;

#[cfg(feature = "memory")]
pub mod memory;
pub mod provider;
#[cfg(feature = "redis-backend")]
pub mod redis;

pub use provider::BusManager;
