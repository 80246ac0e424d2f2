//! PostgreSQL storage for dashboards and folders.
//!
//! Provides [`PgDashboardStore`] and [`PgAlertSync`], the database-backed
//! collaborators of the save pipeline, plus pool setup and embedded
//! migrations.

mod alert_sync;
pub mod config;
pub mod models;
pub mod repositories;
mod store;

use sqlx::postgres::PgPoolOptions;

pub use alert_sync::PgAlertSync;
pub use config::{ConfigError, DbConfig};
pub use store::PgDashboardStore;

pub type DbPool = sqlx::PgPool;

/// Create a connection pool from configuration.
pub async fn create_pool(config: &DbConfig) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .connect(&config.database_url)
        .await
}

/// Round-trip a trivial query to verify the pool can reach the database.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Apply the embedded migrations from `crates/db/migrations`.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await?;
    tracing::info!("Database migrations applied");
    Ok(())
}
