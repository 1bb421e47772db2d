//! Database migration runner.

use sqlx::PgPool;
use tracing::info;

use notifeed_core::error::{ErrorKind, FeedError};

/// Run all pending database migrations.
pub async fn run_migrations(pool: &PgPool) -> Result<(), FeedError> {
    info!("Running database migrations...");

    sqlx::migrate!("../../migrations")
        .run(pool)
        .await
        .map_err(|e| {
            FeedError::with_source(
                ErrorKind::StoreUnavailable,
                format!("Failed to run migrations: {e}"),
                e,
            )
        })?;

    info!("Database migrations completed successfully");
    Ok(())
}
