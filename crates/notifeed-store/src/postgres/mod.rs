//! PostgreSQL store backend.

pub mod connection;
pub mod migration;
pub mod store;

pub use connection::DatabasePool;
pub use store::PostgresNotificationStore;
