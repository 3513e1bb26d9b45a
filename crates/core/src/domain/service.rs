use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Stable catalog identifier assigned by the backing store.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ServiceId(pub i64);

/// The one per-unit window service that is billed as a flat package
/// rather than per panel.
pub const WINDOW_FULL_PACKAGE_SERVICE: ServiceId = ServiceId(402);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PricingMode {
    Flat,
    Hourly,
    PerUnit,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceCategory {
    Regular,
    Deep,
    Packages,
    Specialized,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertySize {
    Small,
    Medium,
    Large,
    Villa,
}

/// Staffing-relevant classification of a service. Catalog entries carry a
/// free-form tag; unknown tags resolve to `Regular` so a new catalog row
/// never breaks the recommendation path.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceType {
    Regular,
    Deep,
    Move,
    Office,
    PostConstruction,
    Kitchen,
    Bathroom,
}

impl ServiceType {
    pub fn from_tag(tag: &str) -> Self {
        match tag.trim().to_ascii_lowercase().as_str() {
            "deep" => Self::Deep,
            "move" | "move_in_out" => Self::Move,
            "office" => Self::Office,
            "post_construction" => Self::PostConstruction,
            "kitchen" => Self::Kitchen,
            "bathroom" => Self::Bathroom,
            _ => Self::Regular,
        }
    }

    pub fn as_tag(self) -> &'static str {
        match self {
            Self::Regular => "regular",
            Self::Deep => "deep",
            Self::Move => "move",
            Self::Office => "office",
            Self::PostConstruction => "post_construction",
            Self::Kitchen => "kitchen",
            Self::Bathroom => "bathroom",
        }
    }
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("unrecognized {kind} value `{value}`")]
pub struct ParseTagError {
    pub kind: &'static str,
    pub value: String,
}

impl std::str::FromStr for ServiceCategory {
    type Err = ParseTagError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "regular" => Ok(Self::Regular),
            "deep" => Ok(Self::Deep),
            "packages" => Ok(Self::Packages),
            "specialized" => Ok(Self::Specialized),
            other => Err(ParseTagError { kind: "service category", value: other.to_string() }),
        }
    }
}

impl std::str::FromStr for PropertySize {
    type Err = ParseTagError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "small" => Ok(Self::Small),
            "medium" => Ok(Self::Medium),
            "large" => Ok(Self::Large),
            "villa" => Ok(Self::Villa),
            other => Err(ParseTagError { kind: "property size", value: other.to_string() }),
        }
    }
}

impl std::str::FromStr for PricingMode {
    type Err = ParseTagError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "flat" => Ok(Self::Flat),
            "hourly" => Ok(Self::Hourly),
            "per_unit" => Ok(Self::PerUnit),
            other => Err(ParseTagError { kind: "pricing mode", value: other.to_string() }),
        }
    }
}

impl ServiceCategory {
    pub fn as_tag(self) -> &'static str {
        match self {
            Self::Regular => "regular",
            Self::Deep => "deep",
            Self::Packages => "packages",
            Self::Specialized => "specialized",
        }
    }
}

impl PropertySize {
    pub fn as_tag(self) -> &'static str {
        match self {
            Self::Small => "small",
            Self::Medium => "medium",
            Self::Large => "large",
            Self::Villa => "villa",
        }
    }
}

impl PricingMode {
    pub fn as_tag(self) -> &'static str {
        match self {
            Self::Flat => "flat",
            Self::Hourly => "hourly",
            Self::PerUnit => "per_unit",
        }
    }
}

/// A row of the service catalog. Immutable after fetch.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceCatalogEntry {
    pub id: ServiceId,
    pub name: String,
    pub category: ServiceCategory,
    /// Staffing tag resolved through [`ServiceType::from_tag`].
    pub service_type: String,
    pub pricing_mode: PricingMode,
    pub base_price: Decimal,
    /// Per-panel price for per-unit window services.
    pub unit_price: Option<Decimal>,
    /// Whether cleaning materials are included in the listed price. The
    /// "without materials" variant is the default selection for the
    /// regular and deep categories.
    pub includes_materials: bool,
    pub active: bool,
}

impl ServiceCatalogEntry {
    pub fn service_type(&self) -> ServiceType {
        ServiceType::from_tag(&self.service_type)
    }

    /// Per-unit window services bill per panel, except the designated
    /// full-package entry which stays flat.
    pub fn billed_per_panel(&self) -> bool {
        self.pricing_mode == PricingMode::PerUnit && self.id != WINDOW_FULL_PACKAGE_SERVICE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_service_type_tag_falls_back_to_regular() {
        assert_eq!(ServiceType::from_tag("sofa_shampoo"), ServiceType::Regular);
        assert_eq!(ServiceType::from_tag(""), ServiceType::Regular);
        assert_eq!(ServiceType::from_tag(" Post_Construction "), ServiceType::PostConstruction);
    }

    #[test]
    fn full_package_window_service_is_not_billed_per_panel() {
        let entry = ServiceCatalogEntry {
            id: WINDOW_FULL_PACKAGE_SERVICE,
            name: "Window cleaning - full package".to_string(),
            category: ServiceCategory::Specialized,
            service_type: "window".to_string(),
            pricing_mode: PricingMode::PerUnit,
            base_price: Decimal::from(350),
            unit_price: Some(Decimal::from(20)),
            includes_materials: true,
            active: true,
        };
        assert!(!entry.billed_per_panel());

        let per_panel = ServiceCatalogEntry { id: ServiceId(401), ..entry };
        assert!(per_panel.billed_per_panel());
    }

    #[test]
    fn category_tags_round_trip() {
        for category in [
            ServiceCategory::Regular,
            ServiceCategory::Deep,
            ServiceCategory::Packages,
            ServiceCategory::Specialized,
        ] {
            assert_eq!(category.as_tag().parse::<ServiceCategory>(), Ok(category));
        }
        assert!("weekly".parse::<ServiceCategory>().is_err());
    }
}
