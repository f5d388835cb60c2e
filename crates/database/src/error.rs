use core_types::EngineError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Failed to load environment variables for database connection: {0}")]
    ConnectionConfigError(String),

    #[error("Database query failed: {0}")]
    Query(#[from] sqlx::Error),

    #[error("Database migration failed: {0}")]
    MigrationError(#[from] sqlx::migrate::MigrateError),
}

/// Translates Store failures into the engine-wide taxonomy.
///
/// Constraint violations reported by PostgreSQL are folded into the same
/// vocabulary the managers use for their own checks, so callers never see
/// SQLSTATE codes:
///
/// - `23505` (unique violation) -> `Conflict`
/// - `23503` (foreign key violation) -> `NotFound`
/// - `23502` / `23514` (not-null / check violation) -> `InvalidArgument`
/// - `40001` / `40P01` (serialization failure / deadlock) -> `Conflict`,
///   racing transactions re-observe the conflict on retry
impl From<StoreError> for EngineError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Query(sqlx::Error::Database(db)) => match db.code().as_deref() {
                Some("23505") => EngineError::Conflict("row already exists".to_string()),
                Some("23503") => EngineError::NotFound,
                Some("23502") | Some("23514") => {
                    EngineError::InvalidArgument(db.message().to_string())
                }
                Some("40001") | Some("40P01") => {
                    EngineError::Conflict("transaction aborted by concurrent update".to_string())
                }
                _ => EngineError::Internal(db.to_string()),
            },
            StoreError::Query(sqlx::Error::RowNotFound) => EngineError::NotFound,
            other => EngineError::Internal(other.to_string()),
        }
    }
}
