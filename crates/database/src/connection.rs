use crate::error::StoreError;
use dotenvy::dotenv;
use sqlx::{PgPool, postgres::PgPoolOptions};
use std::env;
use std::time::Duration;

/// Establishes a connection pool to the PostgreSQL database.
///
/// Reads the `DATABASE_URL` from the environment (loading `.env` first if
/// present), creates a connection pool with robust settings, and returns it.
/// The pool is shared across every manager and engine in the application.
pub async fn connect() -> Result<PgPool, StoreError> {
    // A missing .env file is fine in deployments that set the variable directly.
    let _ = dotenv();

    let database_url = env::var("DATABASE_URL")
        .map_err(|_e| StoreError::ConnectionConfigError("DATABASE_URL must be set.".to_string()))?;

    connect_with(&database_url).await
}

/// Establishes a connection pool to the given database URL.
///
/// Split out from [`connect`] so tests can point at a scratch database
/// without going through the environment.
pub async fn connect_with(database_url: &str) -> Result<PgPool, StoreError> {
    let pool = PgPoolOptions::new()
        .max_connections(10)
        .acquire_timeout(Duration::from_secs(5))
        .connect(database_url)
        .await?;

    Ok(pool)
}

/// A utility function to run database migrations automatically.
///
/// Schema provisioning is not part of the engine proper; this exists so the
/// integration tests and local deployments can bring a scratch database up
/// to date before exercising the managers.
pub async fn run_migrations(pool: &PgPool) -> Result<(), StoreError> {
    // Use a relative path from the crate root.
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}
