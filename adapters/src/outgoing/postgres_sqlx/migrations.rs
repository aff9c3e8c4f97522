use sqlx::PgPool;

use profile_moderation_application::error::{AppError, AppResult};

/// Applies the embedded schema migrations. sqlx serializes concurrent runs
/// with an advisory lock.
#[tracing::instrument(skip(pool), err)]
pub async fn run_migrations(pool: &PgPool) -> AppResult<()> {
    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .map_err(|e| AppError::DatabaseError {
            message: format!("Failed to run migrations: {e}"),
        })?;

    tracing::info!("Database migrations applied");
    Ok(())
}
