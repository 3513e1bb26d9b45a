use sqlx::migrate::{MigrateError, Migrator};

use crate::DbPool;

pub static MIGRATOR: Migrator = sqlx::migrate!("../../migrations");

/// Applies pending migrations and reports the schema version the
/// database ends up on.
pub async fn run_pending(pool: &DbPool) -> Result<i64, MigrateError> {
    MIGRATOR.run(pool).await?;
    let version: i64 =
        sqlx::query_scalar("SELECT COALESCE(MAX(version), 0) FROM _sqlx_migrations")
            .fetch_one(pool)
            .await?;
    Ok(version)
}
