pub mod category;
pub mod product;
pub mod promo;
pub mod review;

use bazaar_core::{AppError, Config};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::time::Duration;

/// Connect to Postgres using the process configuration.
pub async fn connect(config: &Config) -> Result<PgPool, AppError> {
    let pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections())
        .acquire_timeout(Duration::from_secs(config.db_timeout_seconds()))
        .connect(config.database_url())
        .await?;
    Ok(pool)
}

/// Apply pending migrations from the crate's `migrations/` directory.
pub async fn run_migrations(pool: &PgPool) -> Result<(), AppError> {
    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .map_err(|e| AppError::Internal(format!("Migration failed: {}", e)))?;
    Ok(())
}

/// Map unique-index violations to a Conflict so races on the uniqueness
/// pre-check still surface as the documented 400, not a 500.
pub(crate) fn map_unique_violation(err: sqlx::Error, message: &str) -> AppError {
    if let sqlx::Error::Database(ref db_err) = err {
        if db_err.code().as_deref() == Some("23505") {
            return AppError::Conflict(message.to_string());
        }
    }
    AppError::Database(err)
}
