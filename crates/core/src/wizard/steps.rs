use chrono::{NaiveDate, NaiveTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::addon::AddonId;
use crate::domain::contact::ContactDetails;
use crate::domain::draft::PaymentMethod;
use crate::domain::service::{PropertySize, ServiceCategory, ServiceId};

/// Wizard steps in strict forward order. Forward transitions are
/// guarded; backward transitions never re-validate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Step {
    CategorySelection,
    ServiceConfiguration,
    Scheduling,
    ContactAndPayment,
    Confirmation,
}

impl Step {
    pub fn number(self) -> u8 {
        match self {
            Self::CategorySelection => 1,
            Self::ServiceConfiguration => 2,
            Self::Scheduling => 3,
            Self::ContactAndPayment => 4,
            Self::Confirmation => 5,
        }
    }

    pub fn from_number(number: u8) -> Option<Self> {
        match number {
            1 => Some(Self::CategorySelection),
            2 => Some(Self::ServiceConfiguration),
            3 => Some(Self::Scheduling),
            4 => Some(Self::ContactAndPayment),
            5 => Some(Self::Confirmation),
            _ => None,
        }
    }

    pub fn next(self) -> Option<Self> {
        Self::from_number(self.number() + 1)
    }

    pub fn previous(self) -> Option<Self> {
        match self {
            Self::CategorySelection => None,
            step => Self::from_number(step.number() - 1),
        }
    }
}

/// One user action, one mutation entry point. Every cascade-clear rule
/// lives in the reducer for these actions, not scattered across
/// handlers.
#[derive(Clone, Debug, PartialEq)]
pub enum WizardAction {
    SelectCategory(ServiceCategory),
    SelectService(ServiceId),
    SelectPropertySize(PropertySize),
    SelectCrewSize(u8),
    SelectDuration(Decimal),
    SetOwnMaterials(bool),
    SetPanelCount(u32),
    ToggleAddon(AddonId),
    SetSchedule { date: NaiveDate, time: NaiveTime },
    SetContact(ContactDetails),
    SelectPaymentMethod(PaymentMethod),
}

/// Result of a guarded forward transition.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AdvanceOutcome {
    Advanced(Step),
    /// A guest reached the end of scheduling; the draft was persisted
    /// and the wizard stays on the scheduling step until a session
    /// exists.
    SignupRequired,
}
