//! Composes the payable amount for a draft: base price by pricing mode,
//! add-on total, VAT and the cash surcharge.
//!
//! Rounding order is load-bearing: base and add-on totals round to whole
//! monetary units, VAT keeps two decimal places, and only the final sum
//! is rounded to two decimals. Regression tests pin the published
//! scenarios so cent-level drift cannot creep in.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::domain::draft::{BookingDraft, PaymentMethod};
use crate::domain::service::PricingMode;
use crate::errors::ValidationError;
use crate::recommend;

/// VAT rate and payment surcharges. Defaults match the live tariff;
/// configurable so a tariff change is a config edit, not a code edit.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentTerms {
    pub vat_rate: Decimal,
    pub cash_fee: Decimal,
}

impl Default for PaymentTerms {
    fn default() -> Self {
        Self { vat_rate: Decimal::new(5, 2), cash_fee: Decimal::from(5) }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceBreakdown {
    pub base: Decimal,
    pub addons: Decimal,
    pub vat: Decimal,
    pub cash_fee: Decimal,
    pub total: Decimal,
}

/// Base price of the selected service, branching on its pricing mode.
pub fn compute_base_price(draft: &BookingDraft) -> Result<Decimal, ValidationError> {
    let service = draft.service.as_ref().ok_or(ValidationError::MissingService)?;

    let base = match service.pricing_mode {
        PricingMode::Flat => service.base_price,
        PricingMode::PerUnit => {
            if service.billed_per_panel() {
                let panels = draft.window_panel_count.ok_or(ValidationError::MissingPanelCount)?;
                let unit_price = service.unit_price.unwrap_or(service.base_price);
                Decimal::from(panels) * unit_price
            } else {
                // The designated full-package window service is flat.
                service.base_price
            }
        }
        PricingMode::Hourly => {
            let crew = draft.crew_size.ok_or(ValidationError::MissingCrewSize)?;
            let hours = draft.duration_hours.ok_or(ValidationError::MissingDuration)?;
            recommend::calculate_hourly_cost(
                service.service_type(),
                crew,
                hours,
                draft.uses_own_materials,
            )
        }
    };

    Ok(base)
}

pub fn compute_addons_total(draft: &BookingDraft) -> Decimal {
    draft.addons_total()
}

/// Final payable amount for a configured draft.
pub fn compute_final_price(
    draft: &BookingDraft,
    terms: &PaymentTerms,
) -> Result<PriceBreakdown, ValidationError> {
    let base = compute_base_price(draft)?;
    let addons = compute_addons_total(draft);
    Ok(compose(base, addons, draft.payment_method, terms))
}

/// Shared composition used by the wizard and by one-off estimates.
pub fn compose(
    base: Decimal,
    addons: Decimal,
    payment_method: PaymentMethod,
    terms: &PaymentTerms,
) -> PriceBreakdown {
    let base = round_whole(base);
    let addons = round_whole(addons);
    let vat = round2(terms.vat_rate * (base + addons));
    let cash_fee =
        if payment_method == PaymentMethod::Cash { terms.cash_fee } else { Decimal::ZERO };
    let total = round2(base + addons + vat + cash_fee);

    PriceBreakdown { base, addons, vat, cash_fee, total }
}

fn round_whole(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

fn round2(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}
