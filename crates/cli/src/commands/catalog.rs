use crate::commands::CommandResult;
use tidybook_core::catalog::CatalogCache;
use tidybook_core::config::{AppConfig, LoadOptions};
use tidybook_db::{connect, migrations, SqlCatalogRepository};

pub fn run() -> CommandResult {
    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => {
            return CommandResult::failure(
                "catalog",
                "config_validation",
                format!("configuration issue: {error}"),
                2,
            );
        }
    };

    let runtime = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(error) => {
            return CommandResult::failure(
                "catalog",
                "runtime_init",
                format!("failed to initialize async runtime: {error}"),
                3,
            );
        }
    };

    let result = runtime.block_on(async {
        let pool = connect(&config.database)
            .await
            .map_err(|error| ("db_connectivity", error.to_string(), 4u8))?;

        migrations::run_pending(&pool)
            .await
            .map_err(|error| ("migration", error.to_string(), 5u8))?;

        let cache = CatalogCache::new(SqlCatalogRepository::new(pool.clone()));
        let services = cache
            .load_services()
            .await
            .map_err(|error| ("catalog_load", error.to_string(), 4u8))?;
        let addons = cache
            .load_addons()
            .await
            .map_err(|error| ("catalog_load", error.to_string(), 4u8))?;

        let mut lines = vec![format!("{} active services:", services.len())];
        for service in services.iter() {
            lines.push(format!(
                "  - [{}] {} ({}, {})",
                service.id.0,
                service.name,
                service.category.as_tag(),
                service.pricing_mode.as_tag()
            ));
        }
        lines.push(format!("{} add-ons:", addons.len()));
        for addon in addons.iter() {
            lines.push(format!(
                "  - [{}] {} ({} {}, {})",
                addon.id.0,
                addon.name,
                addon.price,
                config.booking.currency,
                addon.unit
            ));
        }

        pool.close().await;
        Ok::<String, (&'static str, String, u8)>(lines.join("\n"))
    });

    match result {
        Ok(listing) => CommandResult::success("catalog", listing),
        Err((error_class, message, exit_code)) => {
            CommandResult::failure("catalog", error_class, message, exit_code)
        }
    }
}
