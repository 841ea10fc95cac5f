//! Persistence layer for pawtrail: connection pool helpers, entity models,
//! and repositories (including the reward settlement workflow).

pub mod models;
pub mod repositories;

use pawtrail_core::error::CoreError;
use sqlx::postgres::PgPoolOptions;

pub type DbPool = sqlx::PgPool;

/// Error type for repository operations that carry domain semantics on top
/// of plain database access (balance guards, status preconditions, the
/// settlement workflow).
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

/// Create a connection pool from a database URL.
pub async fn create_pool(database_url: &str) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(20)
        .connect(database_url)
        .await
}

/// Cheap connectivity probe used by startup and the health endpoint.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Apply all pending migrations from the workspace `migrations/` directory.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("../../migrations").run(pool).await
}
