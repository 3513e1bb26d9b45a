use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AddonId(pub i64);

/// A bookable extra (ironing, fridge interior, balcony, ...). Immutable
/// after fetch.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddonCatalogEntry {
    pub id: AddonId,
    pub name: String,
    pub price: Decimal,
    pub category: String,
    pub subcategory: Option<String>,
    /// Human-readable unit, e.g. "per item" or "per room".
    pub unit: String,
}
