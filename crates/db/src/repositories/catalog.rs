use std::str::FromStr;

use rust_decimal::Decimal;
use sqlx::Row;

use tidybook_core::catalog::{CatalogSource, CatalogSourceError};
use tidybook_core::domain::addon::{AddonCatalogEntry, AddonId};
use tidybook_core::domain::service::{ServiceCatalogEntry, ServiceId};

use super::RepositoryError;
use crate::DbPool;

/// Reads the service and add-on catalogs. Inactive services are returned
/// as stored; the in-memory catalog cache filters them out.
pub struct SqlCatalogRepository {
    pool: DbPool,
}

impl SqlCatalogRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    async fn fetch_services(&self) -> Result<Vec<ServiceCatalogEntry>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT id, name, category, service_type, pricing_mode, base_price,
                    unit_price, includes_materials, active
             FROM service ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(row_to_service).collect()
    }

    async fn fetch_addons(&self) -> Result<Vec<AddonCatalogEntry>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT id, name, price, category, subcategory, unit FROM addon ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(row_to_addon).collect()
    }
}

#[async_trait::async_trait]
impl CatalogSource for SqlCatalogRepository {
    async fn list_services(&self) -> Result<Vec<ServiceCatalogEntry>, CatalogSourceError> {
        self.fetch_services().await.map_err(|error| CatalogSourceError(error.to_string()))
    }

    async fn list_addons(&self) -> Result<Vec<AddonCatalogEntry>, CatalogSourceError> {
        self.fetch_addons().await.map_err(|error| CatalogSourceError(error.to_string()))
    }
}

pub(crate) fn decode_decimal(column: &str, raw: &str) -> Result<Decimal, RepositoryError> {
    Decimal::from_str(raw)
        .map_err(|_| RepositoryError::Decode(format!("invalid decimal in `{column}`: `{raw}`")))
}

fn row_to_service(row: &sqlx::sqlite::SqliteRow) -> Result<ServiceCatalogEntry, RepositoryError> {
    let id: i64 = row.try_get("id").map_err(|e| RepositoryError::Decode(e.to_string()))?;
    let name: String = row.try_get("name").map_err(|e| RepositoryError::Decode(e.to_string()))?;
    let category: String =
        row.try_get("category").map_err(|e| RepositoryError::Decode(e.to_string()))?;
    let service_type: String =
        row.try_get("service_type").map_err(|e| RepositoryError::Decode(e.to_string()))?;
    let pricing_mode: String =
        row.try_get("pricing_mode").map_err(|e| RepositoryError::Decode(e.to_string()))?;
    let base_price: String =
        row.try_get("base_price").map_err(|e| RepositoryError::Decode(e.to_string()))?;
    let unit_price: Option<String> =
        row.try_get("unit_price").map_err(|e| RepositoryError::Decode(e.to_string()))?;
    let includes_materials: bool =
        row.try_get("includes_materials").map_err(|e| RepositoryError::Decode(e.to_string()))?;
    let active: bool =
        row.try_get("active").map_err(|e| RepositoryError::Decode(e.to_string()))?;

    Ok(ServiceCatalogEntry {
        id: ServiceId(id),
        name,
        category: category.parse().map_err(|e: tidybook_core::domain::service::ParseTagError| {
            RepositoryError::Decode(e.to_string())
        })?,
        service_type,
        pricing_mode: pricing_mode.parse().map_err(
            |e: tidybook_core::domain::service::ParseTagError| {
                RepositoryError::Decode(e.to_string())
            },
        )?,
        base_price: decode_decimal("base_price", &base_price)?,
        unit_price: unit_price.map(|raw| decode_decimal("unit_price", &raw)).transpose()?,
        includes_materials,
        active,
    })
}

fn row_to_addon(row: &sqlx::sqlite::SqliteRow) -> Result<AddonCatalogEntry, RepositoryError> {
    let id: i64 = row.try_get("id").map_err(|e| RepositoryError::Decode(e.to_string()))?;
    let name: String = row.try_get("name").map_err(|e| RepositoryError::Decode(e.to_string()))?;
    let price: String = row.try_get("price").map_err(|e| RepositoryError::Decode(e.to_string()))?;
    let category: String =
        row.try_get("category").map_err(|e| RepositoryError::Decode(e.to_string()))?;
    let subcategory: Option<String> =
        row.try_get("subcategory").map_err(|e| RepositoryError::Decode(e.to_string()))?;
    let unit: String = row.try_get("unit").map_err(|e| RepositoryError::Decode(e.to_string()))?;

    Ok(AddonCatalogEntry {
        id: AddonId(id),
        name,
        price: decode_decimal("price", &price)?,
        category,
        subcategory,
        unit,
    })
}
