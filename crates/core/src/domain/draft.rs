use chrono::{NaiveDate, NaiveTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::addon::{AddonCatalogEntry, AddonId};
use crate::domain::contact::ContactDetails;
use crate::domain::service::{
    PricingMode, PropertySize, ServiceCatalogEntry, ServiceCategory, ServiceType,
};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// The only operable method today; carries a fixed surcharge.
    #[default]
    Cash,
    Card,
}

/// The mutable in-progress booking. Owned exclusively by the wizard
/// state machine; every setter enforces the cascade-clear rules so a
/// later selection is never computed against a stale earlier one.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BookingDraft {
    pub category: Option<ServiceCategory>,
    pub service: Option<ServiceCatalogEntry>,
    pub property_size: Option<PropertySize>,
    pub crew_size: Option<u8>,
    pub duration_hours: Option<Decimal>,
    pub uses_own_materials: bool,
    pub window_panel_count: Option<u32>,
    pub selected_addons: Vec<AddonCatalogEntry>,
    pub scheduled_date: Option<NaiveDate>,
    pub scheduled_time: Option<NaiveTime>,
    pub contact: Option<ContactDetails>,
    pub payment_method: PaymentMethod,
}

impl BookingDraft {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_category(&mut self, category: ServiceCategory) {
        self.category = Some(category);
        self.service = None;
        self.clear_configuration();
    }

    pub fn set_service(&mut self, service: ServiceCatalogEntry) {
        self.service = Some(service);
        self.clear_configuration();
    }

    pub fn set_property_size(&mut self, size: PropertySize) {
        self.property_size = Some(size);
        self.crew_size = None;
        self.duration_hours = None;
    }

    pub fn set_crew_size(&mut self, crew: u8) {
        self.crew_size = Some(crew);
        // The duration recommendation depends on crew size.
        self.duration_hours = None;
    }

    pub fn set_duration_hours(&mut self, hours: Decimal) {
        self.duration_hours = Some(hours);
    }

    pub fn set_uses_own_materials(&mut self, uses_own: bool) {
        self.uses_own_materials = uses_own;
    }

    pub fn set_panel_count(&mut self, panels: u32) {
        self.window_panel_count = Some(panels);
    }

    pub fn set_schedule(&mut self, date: NaiveDate, time: NaiveTime) {
        self.scheduled_date = Some(date);
        self.scheduled_time = Some(time);
    }

    pub fn set_contact(&mut self, contact: ContactDetails) {
        self.contact = Some(contact);
    }

    pub fn set_payment_method(&mut self, method: PaymentMethod) {
        self.payment_method = method;
    }

    /// Adds the add-on, or removes it when already selected. Uniqueness
    /// is by id.
    pub fn toggle_addon(&mut self, addon: AddonCatalogEntry) {
        if let Some(position) = self.selected_addons.iter().position(|a| a.id == addon.id) {
            self.selected_addons.remove(position);
        } else {
            self.selected_addons.push(addon);
        }
    }

    pub fn has_addon(&self, id: AddonId) -> bool {
        self.selected_addons.iter().any(|a| a.id == id)
    }

    /// Sum of current member prices; computed fresh on every call, never
    /// cached staler than the member set.
    pub fn addons_total(&self) -> Decimal {
        self.selected_addons.iter().map(|a| a.price).sum()
    }

    pub fn service_type(&self) -> Option<ServiceType> {
        self.service.as_ref().map(ServiceCatalogEntry::service_type)
    }

    /// Hourly-priced services need size, crew and duration.
    pub fn requires_hourly_config(&self) -> bool {
        matches!(&self.service, Some(s) if s.pricing_mode == PricingMode::Hourly)
    }

    pub fn requires_panel_count(&self) -> bool {
        matches!(&self.service, Some(s) if s.billed_per_panel())
    }

    fn clear_configuration(&mut self) {
        self.property_size = None;
        self.crew_size = None;
        self.duration_hours = None;
        self.window_panel_count = None;
    }
}
