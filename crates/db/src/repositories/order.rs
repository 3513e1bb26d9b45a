use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use rust_decimal::Decimal;
use sqlx::Row;
use uuid::Uuid;

use tidybook_core::domain::addon::{AddonCatalogEntry, AddonId};
use tidybook_core::domain::contact::{AddressCandidate, ContactDetails};
use tidybook_core::domain::draft::PaymentMethod;
use tidybook_core::domain::order::{OrderId, OrderRecord};
use tidybook_core::pricing::PriceBreakdown;
use tidybook_core::wizard::{OrderSink, OrderSinkError};

use super::catalog::decode_decimal;
use super::RepositoryError;
use crate::DbPool;

/// Persists submitted bookings. The order row and its add-on rows are
/// written in one transaction so a half-written order can never be read
/// back.
pub struct SqlOrderSink {
    pool: DbPool,
}

impl SqlOrderSink {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    async fn insert(&self, order: &OrderRecord) -> Result<(), RepositoryError> {
        let service_snapshot = serde_json::to_string(&order.service)
            .map_err(|e| RepositoryError::Decode(e.to_string()))?;
        let address = order
            .contact
            .address
            .as_ref()
            .ok_or_else(|| RepositoryError::Decode("order contact has no address".to_string()))?;

        let mut tx = self.pool.begin().await?;

        sqlx::query(
            "INSERT INTO booking_order (id, category, service_id, service_snapshot,
                                        property_size, crew_size, duration_hours,
                                        uses_own_materials, window_panel_count,
                                        scheduled_date, scheduled_time,
                                        contact_name, contact_phone, address_id, address_label,
                                        contact_notes, payment_method,
                                        base_price, addons_total, vat, cash_fee, total,
                                        created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(order.id.0.to_string())
        .bind(order.category.as_tag())
        .bind(order.service.id.0)
        .bind(&service_snapshot)
        .bind(order.property_size.map(|size| size.as_tag()))
        .bind(order.crew_size.map(i64::from))
        .bind(order.duration_hours.map(|hours| hours.to_string()))
        .bind(order.uses_own_materials)
        .bind(order.window_panel_count.map(i64::from))
        .bind(order.scheduled_date.to_string())
        .bind(order.scheduled_time.to_string())
        .bind(&order.contact.name)
        .bind(&order.contact.phone)
        .bind(&address.id)
        .bind(&address.label)
        .bind(&order.contact.notes)
        .bind(payment_method_as_str(order.payment_method))
        .bind(order.pricing.base.to_string())
        .bind(order.pricing.addons.to_string())
        .bind(order.pricing.vat.to_string())
        .bind(order.pricing.cash_fee.to_string())
        .bind(order.pricing.total.to_string())
        .bind(order.created_at.to_rfc3339())
        .execute(&mut *tx)
        .await?;

        for addon in &order.addons {
            sqlx::query(
                "INSERT INTO booking_order_addon (order_id, addon_id, name, price,
                                                  category, subcategory, unit)
                 VALUES (?, ?, ?, ?, ?, ?, ?)",
            )
            .bind(order.id.0.to_string())
            .bind(addon.id.0)
            .bind(&addon.name)
            .bind(addon.price.to_string())
            .bind(&addon.category)
            .bind(&addon.subcategory)
            .bind(&addon.unit)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        tracing::debug!(order_id = %order.id, "booking order stored");
        Ok(())
    }
}

#[async_trait::async_trait]
impl OrderSink for SqlOrderSink {
    async fn create(&self, order: &OrderRecord) -> Result<OrderId, OrderSinkError> {
        self.insert(order).await.map_err(|error| OrderSinkError(error.to_string()))?;
        Ok(order.id)
    }
}

/// Read side for submitted bookings; used by the CLI and by tests.
pub struct SqlOrderRepository {
    pool: DbPool,
}

impl SqlOrderRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: &OrderId) -> Result<Option<OrderRecord>, RepositoryError> {
        let row = sqlx::query(
            "SELECT id, category, service_snapshot, property_size, crew_size, duration_hours,
                    uses_own_materials, window_panel_count, scheduled_date, scheduled_time,
                    contact_name, contact_phone, address_id, address_label, contact_notes,
                    payment_method, base_price, addons_total, vat, cash_fee, total, created_at
             FROM booking_order WHERE id = ?",
        )
        .bind(id.0.to_string())
        .fetch_optional(&self.pool)
        .await?;

        let row = match row {
            Some(row) => row,
            None => return Ok(None),
        };

        let addon_rows = sqlx::query(
            "SELECT addon_id, name, price, category, subcategory, unit
             FROM booking_order_addon WHERE order_id = ? ORDER BY addon_id",
        )
        .bind(id.0.to_string())
        .fetch_all(&self.pool)
        .await?;

        let addons = addon_rows
            .iter()
            .map(row_to_order_addon)
            .collect::<Result<Vec<_>, RepositoryError>>()?;

        Ok(Some(row_to_order(&row, addons)?))
    }

    pub async fn count(&self) -> Result<i64, RepositoryError> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(1) FROM booking_order").fetch_one(&self.pool).await?;
        Ok(count)
    }
}

pub fn payment_method_as_str(method: PaymentMethod) -> &'static str {
    match method {
        PaymentMethod::Cash => "cash",
        PaymentMethod::Card => "card",
    }
}

fn parse_payment_method(raw: &str) -> Result<PaymentMethod, RepositoryError> {
    match raw {
        "cash" => Ok(PaymentMethod::Cash),
        "card" => Ok(PaymentMethod::Card),
        other => Err(RepositoryError::Decode(format!("unknown payment method `{other}`"))),
    }
}

fn get_text(row: &sqlx::sqlite::SqliteRow, column: &str) -> Result<String, RepositoryError> {
    row.try_get(column).map_err(|e| RepositoryError::Decode(e.to_string()))
}

fn row_to_order(
    row: &sqlx::sqlite::SqliteRow,
    addons: Vec<AddonCatalogEntry>,
) -> Result<OrderRecord, RepositoryError> {
    let id = Uuid::from_str(&get_text(row, "id")?)
        .map_err(|e| RepositoryError::Decode(e.to_string()))?;
    let category = get_text(row, "category")?
        .parse()
        .map_err(|e: tidybook_core::domain::service::ParseTagError| {
            RepositoryError::Decode(e.to_string())
        })?;
    let service = serde_json::from_str(&get_text(row, "service_snapshot")?)
        .map_err(|e| RepositoryError::Decode(e.to_string()))?;
    let property_size: Option<String> =
        row.try_get("property_size").map_err(|e| RepositoryError::Decode(e.to_string()))?;
    let property_size = property_size
        .map(|raw| raw.parse())
        .transpose()
        .map_err(|e: tidybook_core::domain::service::ParseTagError| {
            RepositoryError::Decode(e.to_string())
        })?;
    let crew_size: Option<i64> =
        row.try_get("crew_size").map_err(|e| RepositoryError::Decode(e.to_string()))?;
    let duration_hours: Option<String> =
        row.try_get("duration_hours").map_err(|e| RepositoryError::Decode(e.to_string()))?;
    let duration_hours =
        duration_hours.map(|raw| decode_decimal("duration_hours", &raw)).transpose()?;
    let uses_own_materials: bool =
        row.try_get("uses_own_materials").map_err(|e| RepositoryError::Decode(e.to_string()))?;
    let window_panel_count: Option<i64> =
        row.try_get("window_panel_count").map_err(|e| RepositoryError::Decode(e.to_string()))?;
    let scheduled_date = NaiveDate::from_str(&get_text(row, "scheduled_date")?)
        .map_err(|e| RepositoryError::Decode(e.to_string()))?;
    let scheduled_time = NaiveTime::from_str(&get_text(row, "scheduled_time")?)
        .map_err(|e| RepositoryError::Decode(e.to_string()))?;
    let contact_notes: Option<String> =
        row.try_get("contact_notes").map_err(|e| RepositoryError::Decode(e.to_string()))?;
    let created_at = DateTime::parse_from_rfc3339(&get_text(row, "created_at")?)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| RepositoryError::Decode(e.to_string()))?;

    Ok(OrderRecord {
        id: OrderId(id),
        category,
        service,
        property_size,
        crew_size: crew_size.map(|crew| crew as u8),
        duration_hours,
        uses_own_materials,
        window_panel_count: window_panel_count.map(|panels| panels as u32),
        addons,
        scheduled_date,
        scheduled_time,
        contact: ContactDetails {
            name: get_text(row, "contact_name")?,
            phone: get_text(row, "contact_phone")?,
            address: Some(AddressCandidate {
                id: get_text(row, "address_id")?,
                label: get_text(row, "address_label")?,
            }),
            notes: contact_notes,
        },
        payment_method: parse_payment_method(&get_text(row, "payment_method")?)?,
        pricing: PriceBreakdown {
            base: decode_decimal("base_price", &get_text(row, "base_price")?)?,
            addons: decode_decimal("addons_total", &get_text(row, "addons_total")?)?,
            vat: decode_decimal("vat", &get_text(row, "vat")?)?,
            cash_fee: decode_decimal("cash_fee", &get_text(row, "cash_fee")?)?,
            total: decode_decimal("total", &get_text(row, "total")?)?,
        },
        created_at,
    })
}

fn row_to_order_addon(
    row: &sqlx::sqlite::SqliteRow,
) -> Result<AddonCatalogEntry, RepositoryError> {
    let id: i64 = row.try_get("addon_id").map_err(|e| RepositoryError::Decode(e.to_string()))?;
    let subcategory: Option<String> =
        row.try_get("subcategory").map_err(|e| RepositoryError::Decode(e.to_string()))?;

    Ok(AddonCatalogEntry {
        id: AddonId(id),
        name: get_text(row, "name")?,
        price: decode_decimal("price", &get_text(row, "price")?)?,
        category: get_text(row, "category")?,
        subcategory,
        unit: get_text(row, "unit")?,
    })
}
