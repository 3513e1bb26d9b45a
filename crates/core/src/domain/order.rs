use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::addon::AddonCatalogEntry;
use crate::domain::contact::ContactDetails;
use crate::domain::draft::{BookingDraft, PaymentMethod};
use crate::domain::service::{PropertySize, ServiceCatalogEntry, ServiceCategory};
use crate::errors::ValidationError;
use crate::pricing::PriceBreakdown;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OrderId(pub Uuid);

impl OrderId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for OrderId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for OrderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// The immutable result of a successful submission, handed to the order
/// sink. The draft it came from is discarded afterwards.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OrderRecord {
    pub id: OrderId,
    pub category: ServiceCategory,
    pub service: ServiceCatalogEntry,
    pub property_size: Option<PropertySize>,
    pub crew_size: Option<u8>,
    pub duration_hours: Option<Decimal>,
    pub uses_own_materials: bool,
    pub window_panel_count: Option<u32>,
    pub addons: Vec<AddonCatalogEntry>,
    pub scheduled_date: NaiveDate,
    pub scheduled_time: NaiveTime,
    pub contact: ContactDetails,
    pub payment_method: PaymentMethod,
    pub pricing: PriceBreakdown,
    pub created_at: DateTime<Utc>,
}

impl OrderRecord {
    /// Freezes a fully-validated draft. Callers are expected to have run
    /// the step guards first; missing fields still map to validation
    /// errors rather than panics.
    pub fn from_draft(
        draft: &BookingDraft,
        pricing: PriceBreakdown,
    ) -> Result<Self, ValidationError> {
        let category = draft.category.ok_or(ValidationError::MissingCategory)?;
        let service = draft.service.clone().ok_or(ValidationError::MissingService)?;
        let scheduled_date = draft.scheduled_date.ok_or(ValidationError::MissingSchedule)?;
        let scheduled_time = draft.scheduled_time.ok_or(ValidationError::MissingSchedule)?;
        let contact = draft.contact.clone().ok_or(ValidationError::MissingContact)?;
        contact.validate()?;

        Ok(Self {
            id: OrderId::new(),
            category,
            service,
            property_size: draft.property_size,
            crew_size: draft.crew_size,
            duration_hours: draft.duration_hours,
            uses_own_materials: draft.uses_own_materials,
            window_panel_count: draft.window_panel_count,
            addons: draft.selected_addons.clone(),
            scheduled_date,
            scheduled_time,
            contact,
            payment_method: draft.payment_method,
            pricing,
            created_at: Utc::now(),
        })
    }
}
