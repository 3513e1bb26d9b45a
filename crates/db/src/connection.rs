use std::time::Duration;

use sqlx::sqlite::SqlitePoolOptions;
use sqlx::Executor;
use tidybook_core::config::DatabaseConfig;

pub type DbPool = sqlx::SqlitePool;

/// Session pragmas applied to every pooled connection. Foreign keys
/// keep the order/add-on cascade intact; WAL and the busy timeout let
/// the CLI coexist with a concurrent reader on the same file.
const SESSION_PRAGMAS: &str = "\
    PRAGMA foreign_keys = ON;\
    PRAGMA journal_mode = WAL;\
    PRAGMA busy_timeout = 5000;";

/// Opens a pool sized and timed per the validated database section of
/// [`tidybook_core::config::AppConfig`].
pub async fn connect(database: &DatabaseConfig) -> Result<DbPool, sqlx::Error> {
    SqlitePoolOptions::new()
        .max_connections(database.max_connections.max(1))
        .acquire_timeout(Duration::from_secs(database.timeout_secs.max(1)))
        .after_connect(|conn, _meta| {
            Box::pin(async move {
                (&mut *conn).execute(SESSION_PRAGMAS).await?;
                Ok(())
            })
        })
        .connect(&database.url)
        .await
}
