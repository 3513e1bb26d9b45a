use clap::Args;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::commands::CommandResult;
use tidybook_core::domain::draft::PaymentMethod;
use tidybook_core::domain::service::{PropertySize, ServiceType};
use tidybook_core::pricing::{self, PaymentTerms};
use tidybook_core::recommend;

#[derive(Debug, Args)]
pub struct EstimateArgs {
    #[arg(long, help = "Service type tag, e.g. regular|deep|move|office|post_construction")]
    pub service_type: String,
    #[arg(long, help = "Property size: small|medium|large|villa")]
    pub property_size: String,
    #[arg(long, help = "Crew size override in 1..=4; omit to use the recommendation")]
    pub crew: Option<u8>,
    #[arg(long, help = "Duration override in hours, half-hour steps; omit to use the recommendation")]
    pub hours: Option<Decimal>,
    #[arg(long, help = "Customer supplies their own cleaning materials")]
    pub own_materials: bool,
    #[arg(long, default_value = "0", help = "Selected add-on total")]
    pub addons_total: Decimal,
    #[arg(long, help = "Price for card payment instead of cash")]
    pub card: bool,
}

#[derive(Debug, Serialize)]
struct EstimateOutput {
    service_type: &'static str,
    property_size: &'static str,
    recommended_crew_size: u8,
    duration_hours: Decimal,
    base: Decimal,
    addons: Decimal,
    vat: Decimal,
    cash_fee: Decimal,
    total: Decimal,
}

pub fn run(args: &EstimateArgs) -> CommandResult {
    // Unknown service tags deliberately fall back to the regular tables,
    // matching how catalog entries are interpreted.
    let service_type = ServiceType::from_tag(&args.service_type);
    let property_size: PropertySize = match args.property_size.parse() {
        Ok(size) => size,
        Err(error) => {
            return CommandResult::failure("estimate", "invalid_argument", error.to_string(), 2);
        }
    };

    if let Some(crew) = args.crew {
        if !(1..=4).contains(&crew) {
            return CommandResult::failure(
                "estimate",
                "invalid_argument",
                format!("crew size {crew} is out of range 1..=4"),
                2,
            );
        }
    }

    let recommendation =
        recommend::recommend(service_type, property_size, args.crew, args.own_materials);
    let hours = match args.hours {
        Some(hours) if !recommend::is_half_hour_step(hours) => {
            return CommandResult::failure(
                "estimate",
                "invalid_argument",
                format!("duration `{hours}` must be a positive multiple of half an hour"),
                2,
            );
        }
        Some(hours) => hours,
        None => recommendation.recommended_duration_hours,
    };

    let crew = args.crew.unwrap_or(recommendation.recommended_crew_size);
    let base = recommend::calculate_hourly_cost(service_type, crew, hours, args.own_materials);
    let method = if args.card { PaymentMethod::Card } else { PaymentMethod::Cash };
    let breakdown = pricing::compose(base, args.addons_total, method, &PaymentTerms::default());

    let output = EstimateOutput {
        service_type: service_type.as_tag(),
        property_size: property_size.as_tag(),
        recommended_crew_size: recommendation.recommended_crew_size,
        duration_hours: hours,
        base: breakdown.base,
        addons: breakdown.addons,
        vat: breakdown.vat,
        cash_fee: breakdown.cash_fee,
        total: breakdown.total,
    };

    match serde_json::to_string_pretty(&output) {
        Ok(json) => CommandResult { exit_code: 0, output: json },
        Err(error) => CommandResult::failure("estimate", "serialization", error.to_string(), 3),
    }
}
