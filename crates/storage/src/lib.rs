//! Storage layer for the CogScheduler backend.

use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

pub mod config_override_repository;
pub mod engine_weights_repository;
pub mod error;
pub mod profile_repository;
pub mod schedule_repository;
pub mod tlx_repository;
pub mod user_repository;

pub use config_override_repository::ConfigOverrideRepository;
pub use engine_weights_repository::EngineWeightsRepository;
pub use error::StorageError;
pub use profile_repository::ProfileRepository;
pub use schedule_repository::{ScheduleRepository, ScheduleRow};
pub use tlx_repository::TlxRepository;
pub use user_repository::{UserRepository, UserRow};

/// Create a PostgreSQL connection pool.
pub async fn create_pool(database_url: &str) -> Result<PgPool, StorageError> {
    PgPoolOptions::new()
        .max_connections(10)
        .connect(database_url)
        .await
        .map_err(StorageError::Connection)
}

/// Run database migrations.
pub async fn run_migrations(pool: &PgPool) -> Result<(), StorageError> {
    sqlx::migrate!("../../migrations")
        .run(pool)
        .await
        .map_err(StorageError::Migration)
}

/// Check database connectivity.
pub async fn check_connection(pool: &PgPool) -> Result<(), StorageError> {
    sqlx::query("SELECT 1")
        .execute(pool)
        .await
        .map_err(StorageError::Query)?;
    Ok(())
}
