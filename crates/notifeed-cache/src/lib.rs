//! # notifeed-cache
//!
//! Cache provider implementations for Notifeed. Supports two modes:
//!
//! - **memory**: In-process cache using [moka](https://crates.io/crates/moka)
//! - **redis**: Redis-backed cache using the [redis](https://crates.io/crates/redis) crate
//!
//! The provider is selected at runtime based on configuration. Cached
//! values are opaque JSON strings; key layout lives in [`keys`] so the
//! engine and both providers agree on the per-user prefix scheme.

pub mod keys;
#[cfg(feature = "memory")]
pub mod memory;
pub mod provider;
#[cfg(feature = "redis-backend")]
pub mod redis;

pub use provider::CacheManager;
