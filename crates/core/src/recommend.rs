//! Staffing and duration recommendation. Pure functions over fixed
//! tables; deterministic given inputs, no side effects.
//!
//! The efficiency curve improves strictly with crew size but with a
//! diminishing per-cleaner contribution. That shape is a commercial
//! contract with the pricing tables, not a physical model, and must not
//! be "corrected".

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::service::{PropertySize, ServiceType};

/// Duration bounds in hours, inclusive.
pub const MIN_DURATION_HOURS: (i64, u32) = (25, 1);
pub const MAX_DURATION_HOURS: (i64, u32) = (70, 1);

/// Suggested staffing for the current selection. Non-binding: the
/// customer may override crew and hours, and the estimate is not
/// authoritative until they do or accept it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecommendationResult {
    pub recommended_crew_size: u8,
    pub recommended_duration_hours: Decimal,
    pub estimated_cost: Decimal,
}

pub fn service_coefficient(service_type: ServiceType) -> Decimal {
    match service_type {
        ServiceType::Regular | ServiceType::Office => Decimal::new(10, 1),
        ServiceType::Bathroom => Decimal::new(11, 1),
        ServiceType::Kitchen => Decimal::new(12, 1),
        ServiceType::Deep => Decimal::new(13, 1),
        ServiceType::Move => Decimal::new(15, 1),
        ServiceType::PostConstruction => Decimal::new(17, 1),
    }
}

pub fn size_multiplier(size: PropertySize) -> Decimal {
    match size {
        PropertySize::Small => Decimal::new(12, 1),
        PropertySize::Medium => Decimal::new(16, 1),
        PropertySize::Large => Decimal::new(24, 1),
        PropertySize::Villa => Decimal::new(32, 1),
    }
}

/// Relative output per cleaner as the crew grows. Crew sizes above 4 are
/// not selectable and take the 4-cleaner value.
pub fn team_efficiency(crew_size: u8) -> Decimal {
    match crew_size {
        0 | 1 => Decimal::ONE,
        2 => Decimal::new(75, 2),
        3 => Decimal::new(55, 2),
        _ => Decimal::new(45, 2),
    }
}

/// Single-cleaner baseline hours per service type and property size.
pub fn base_hours(service_type: ServiceType, size: PropertySize) -> Decimal {
    use PropertySize::{Large, Medium, Small, Villa};
    let hours: i64 = match (service_type, size) {
        (ServiceType::Regular | ServiceType::Office, Small) => 4,
        (ServiceType::Regular | ServiceType::Office, Medium) => 6,
        (ServiceType::Regular | ServiceType::Office, Large) => 8,
        (ServiceType::Regular | ServiceType::Office, Villa) => 10,
        (ServiceType::Deep, Small) => 5,
        (ServiceType::Deep, Medium) => 8,
        (ServiceType::Deep, Large) => 11,
        (ServiceType::Deep, Villa) => 14,
        (ServiceType::Move, Small) => 6,
        (ServiceType::Move, Medium) => 9,
        (ServiceType::Move, Large) => 12,
        (ServiceType::Move, Villa) => 15,
        (ServiceType::PostConstruction, Small) => 7,
        (ServiceType::PostConstruction, Medium) => 10,
        (ServiceType::PostConstruction, Large) => 14,
        (ServiceType::PostConstruction, Villa) => 20,
        (ServiceType::Kitchen, Small) => 3,
        (ServiceType::Kitchen, Medium) => 4,
        (ServiceType::Kitchen, Large) => 6,
        (ServiceType::Kitchen, Villa) => 7,
        (ServiceType::Bathroom, Small) => 3,
        (ServiceType::Bathroom, Medium) => 4,
        (ServiceType::Bathroom, Large) => 5,
        (ServiceType::Bathroom, Villa) => 6,
    };
    Decimal::from(hours)
}

/// Hourly rate per cleaner. The materials-included rate is strictly
/// higher than the customer-supplies rate for every service type.
pub fn hourly_rate(service_type: ServiceType, uses_own_materials: bool) -> Decimal {
    let (included, own) = match service_type {
        ServiceType::Regular | ServiceType::Office => (45, 35),
        ServiceType::Deep => (55, 45),
        ServiceType::Move => (60, 50),
        ServiceType::PostConstruction => (70, 60),
        ServiceType::Kitchen | ServiceType::Bathroom => (50, 40),
    };
    Decimal::from(if uses_own_materials { own } else { included })
}

/// Suggested crew size in {2, 3, 4}. A single cleaner is selectable but
/// never recommended.
pub fn recommend_crew_size(service_type: ServiceType, size: PropertySize) -> u8 {
    let complexity = service_coefficient(service_type) * size_multiplier(size);
    if complexity <= Decimal::new(18, 1) {
        2
    } else if complexity <= Decimal::new(28, 1) {
        3
    } else {
        4
    }
}

/// Suggested duration: baseline hours scaled by team efficiency, plus a
/// fixed half-hour setup buffer, rounded up to the next half hour and
/// clamped to the bookable range.
pub fn recommend_duration(service_type: ServiceType, size: PropertySize, crew_size: u8) -> Decimal {
    let two = Decimal::from(2);
    let raw = base_hours(service_type, size) * team_efficiency(crew_size) + Decimal::new(5, 1);
    let stepped = (raw * two).ceil() / two;
    stepped.clamp(min_duration(), max_duration())
}

pub fn calculate_hourly_cost(
    service_type: ServiceType,
    crew_size: u8,
    hours: Decimal,
    uses_own_materials: bool,
) -> Decimal {
    Decimal::from(crew_size) * hours * hourly_rate(service_type, uses_own_materials)
}

/// Full recommendation for the current selection. `crew_override` keeps
/// a customer-chosen crew while still recomputing duration and cost.
pub fn recommend(
    service_type: ServiceType,
    size: PropertySize,
    crew_override: Option<u8>,
    uses_own_materials: bool,
) -> RecommendationResult {
    let crew = crew_override.unwrap_or_else(|| recommend_crew_size(service_type, size));
    let duration = recommend_duration(service_type, size, crew);
    let cost = calculate_hourly_cost(service_type, crew, duration, uses_own_materials);
    RecommendationResult {
        recommended_crew_size: crew,
        recommended_duration_hours: duration,
        estimated_cost: cost,
    }
}

pub fn min_duration() -> Decimal {
    Decimal::new(MIN_DURATION_HOURS.0, MIN_DURATION_HOURS.1)
}

pub fn max_duration() -> Decimal {
    Decimal::new(MAX_DURATION_HOURS.0, MAX_DURATION_HOURS.1)
}

/// True when `hours` is a positive whole number of half-hour steps.
pub fn is_half_hour_step(hours: Decimal) -> bool {
    let doubled = hours * Decimal::from(2);
    hours > Decimal::ZERO && doubled == doubled.trunc()
}
