use sqlx::Executor;

use crate::connection::DbPool;
use crate::repositories::RepositoryError;

const SEED_SERVICE_COUNT: i64 = 14;
const SEED_ADDON_COUNT: i64 = 6;
const SEED_INACTIVE_SERVICE_IDS: &[i64] = &[501];

/// Deterministic catalog fixture for local runs and E2E tests.
pub struct SeedCatalog;

#[derive(Debug)]
pub struct SeedResult {
    pub services_seeded: i64,
    pub addons_seeded: i64,
}

#[derive(Debug)]
pub struct VerificationResult {
    pub checks: Vec<(&'static str, bool)>,
}

impl VerificationResult {
    pub fn passed(&self) -> bool {
        self.checks.iter().all(|(_, ok)| *ok)
    }
}

impl SeedCatalog {
    pub const SQL: &str = include_str!("../../../config/fixtures/catalog_seed.sql");

    /// Loads the seed catalog in one transaction. Re-seeding a database
    /// that already holds the fixture rows fails on the primary keys.
    pub async fn load(pool: &DbPool) -> Result<SeedResult, RepositoryError> {
        let mut tx = pool.begin().await?;
        // Raw execute runs every statement in the fixture file.
        (&mut *tx).execute(Self::SQL).await?;
        tx.commit().await?;

        Ok(SeedResult { services_seeded: SEED_SERVICE_COUNT, addons_seeded: SEED_ADDON_COUNT })
    }

    /// Verifies the seed rows exist and the designated full-package
    /// window service is present with its per-unit mode intact.
    pub async fn verify(pool: &DbPool) -> Result<VerificationResult, RepositoryError> {
        let mut checks = Vec::new();

        let service_count: i64 =
            sqlx::query_scalar("SELECT COUNT(1) FROM service").fetch_one(pool).await?;
        checks.push(("service-count", service_count == SEED_SERVICE_COUNT));

        let addon_count: i64 =
            sqlx::query_scalar("SELECT COUNT(1) FROM addon").fetch_one(pool).await?;
        checks.push(("addon-count", addon_count == SEED_ADDON_COUNT));

        let full_package: i64 = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM service WHERE id = 402 AND pricing_mode = 'per_unit')",
        )
        .fetch_one(pool)
        .await?;
        checks.push(("window-full-package", full_package == 1));

        let inactive_count: i64 =
            sqlx::query_scalar("SELECT COUNT(1) FROM service WHERE active = 0")
                .fetch_one(pool)
                .await?;
        checks.push(("inactive-services", inactive_count == SEED_INACTIVE_SERVICE_IDS.len() as i64));

        let default_variants: i64 = sqlx::query_scalar(
            "SELECT COUNT(1) FROM service
             WHERE category IN ('regular', 'deep') AND includes_materials = 0 AND active = 1",
        )
        .fetch_one(pool)
        .await?;
        checks.push(("default-service-variants", default_variants == 2));

        Ok(VerificationResult { checks })
    }
}

#[cfg(test)]
mod tests {
    use tidybook_core::config::DatabaseConfig;

    use super::SeedCatalog;
    use crate::{connect, migrations};

    fn memory_database() -> DatabaseConfig {
        DatabaseConfig {
            url: "sqlite::memory:".to_string(),
            max_connections: 1,
            timeout_secs: 30,
        }
    }

    #[tokio::test]
    async fn seed_loads_and_verifies_on_a_fresh_database() {
        let pool = connect(&memory_database()).await.expect("connect");
        migrations::run_pending(&pool).await.expect("migrations");

        let result = SeedCatalog::load(&pool).await.expect("seed");
        assert_eq!(result.services_seeded, 14);
        assert_eq!(result.addons_seeded, 6);

        let verification = SeedCatalog::verify(&pool).await.expect("verify");
        assert!(verification.passed(), "failed checks: {:?}", verification.checks);
    }

    #[tokio::test]
    async fn verify_fails_on_an_empty_database() {
        let pool = connect(&memory_database()).await.expect("connect");
        migrations::run_pending(&pool).await.expect("migrations");

        let verification = SeedCatalog::verify(&pool).await.expect("verify");
        assert!(!verification.passed());
    }
}
