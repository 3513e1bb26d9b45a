pub mod bridge;
pub mod catalog;
pub mod config;
pub mod domain;
pub mod errors;
pub mod pricing;
pub mod recommend;
pub mod wizard;

pub use bridge::{DraftSnapshot, DraftStoreError, LocalDraftStore, DRAFT_SNAPSHOT_KEY};
pub use catalog::{CatalogCache, CatalogSource, CatalogSourceError};
pub use config::{AppConfig, ConfigError, ConfigOverrides, LoadOptions, LogFormat};
pub use domain::addon::{AddonCatalogEntry, AddonId};
pub use domain::contact::{AddressCandidate, ContactDetails};
pub use domain::draft::{BookingDraft, PaymentMethod};
pub use domain::order::{OrderId, OrderRecord};
pub use domain::service::{
    PricingMode, PropertySize, ServiceCatalogEntry, ServiceCategory, ServiceId, ServiceType,
};
pub use errors::{BookingError, ValidationError};
pub use pricing::{PaymentTerms, PriceBreakdown};
pub use recommend::RecommendationResult;
pub use wizard::{
    AddressSource, AdvanceOutcome, IdentitySource, NotificationDispatch, OrderSink, OrderSinkError,
    Session, Step, WizardAction, WizardMachine,
};
