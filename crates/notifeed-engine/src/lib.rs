//! # notifeed-engine
//!
//! The notification feed engine: stateless orchestration of the store,
//! cache, and push bus collaborators, plus the retention sweeper that
//! expires old records in bounded batches.
//!
//! The engine owns the consistency contract between the collaborators.
//! Writes go store first, then cache invalidation, then push. Reads go
//! cache first and degrade to the store when the cache is unhealthy.

pub mod feed;
pub mod sweeper;

pub use feed::FeedEngine;
pub use sweeper::{RetentionSweeper, SweepOutcome, SweepPolicy};
