//! # notifeed-core
//!
//! Core crate for Notifeed. Contains the collaborator traits implemented by
//! the store/cache/bus crates, configuration schemas, domain types, and the
//! unified error system.
//!
//! This crate has **no** internal dependencies on other Notifeed crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;
pub mod types;

pub use error::{ErrorKind, FeedError};
pub use result::FeedResult;
