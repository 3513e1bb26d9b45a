use chrono::NaiveDate;
use thiserror::Error;

use crate::domain::addon::AddonId;
use crate::domain::service::ServiceId;

/// A refused field edit or step-forward transition. Always recovered
/// locally: the wizard shows [`ValidationError::user_message`] and stays
/// where it is.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("no category selected")]
    MissingCategory,
    #[error("no service selected")]
    MissingService,
    #[error("unknown or inactive service {0:?}")]
    UnknownService(ServiceId),
    #[error("unknown add-on {0:?}")]
    UnknownAddon(AddonId),
    #[error("property size is required for this service")]
    MissingPropertySize,
    #[error("crew size is required for this service")]
    MissingCrewSize,
    #[error("crew size {0} is out of range")]
    InvalidCrewSize(u8),
    #[error("duration is required for this service")]
    MissingDuration,
    #[error("duration `{0}` must be a positive multiple of half an hour")]
    InvalidDuration(String),
    #[error("window panel count is required for this service")]
    MissingPanelCount,
    #[error("window panel count must be at least 1")]
    InvalidPanelCount,
    #[error("date and time are not scheduled yet")]
    MissingSchedule,
    #[error("scheduled date {0} must be later than today")]
    ScheduleNotInFuture(NaiveDate),
    #[error("contact details are incomplete")]
    MissingContact,
    #[error("contact name must be at least 2 characters")]
    NameTooShort,
    #[error("invalid phone number: {0}")]
    InvalidPhone(String),
    #[error("no address selected")]
    MissingAddress,
    #[error("forward navigation from this step requires submission")]
    SubmissionRequired,
    #[error("submission is only available from the contact step")]
    SubmissionUnavailable,
    #[error("the booking is already confirmed")]
    WizardComplete,
}

impl ValidationError {
    /// Message safe to render to the customer, without internal ids.
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::MissingCategory => "Choose a service category to continue.",
            Self::MissingService | Self::UnknownService(_) => "Choose a service to continue.",
            Self::UnknownAddon(_) => "That extra is no longer available.",
            Self::MissingPropertySize => "Select your property size to continue.",
            Self::MissingCrewSize | Self::InvalidCrewSize(_) => "Select how many cleaners you need.",
            Self::MissingDuration | Self::InvalidDuration(_) => {
                "Select a duration in half-hour steps."
            }
            Self::MissingPanelCount | Self::InvalidPanelCount => {
                "Tell us how many window panels to clean."
            }
            Self::MissingSchedule => "Pick a date and time to continue.",
            Self::ScheduleNotInFuture(_) => "Bookings must be scheduled from tomorrow onwards.",
            Self::MissingContact | Self::NameTooShort => "Enter your full name.",
            Self::InvalidPhone(_) => "Enter a valid phone number with country code.",
            Self::MissingAddress => "Select your address to continue.",
            Self::SubmissionRequired | Self::SubmissionUnavailable => {
                "Confirm your booking to continue."
            }
            Self::WizardComplete => "This booking is already confirmed.",
        }
    }
}

/// Failures that end the current attempt. None of them resets the draft
/// or the step position.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum BookingError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// The catalog collaborator failed; retryable, the wizard cannot
    /// proceed past category selection until a retry succeeds.
    #[error("catalog unavailable: {0}")]
    CatalogUnavailable(String),
    /// The order sink rejected the write; the draft stays intact so the
    /// customer can resubmit without re-entering anything.
    #[error("order submission failed: {0}")]
    SubmissionFailed(String),
    #[error("local draft store failure: {0}")]
    DraftStore(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_errors_have_user_safe_messages() {
        let error = ValidationError::UnknownService(ServiceId(999));
        assert_eq!(error.user_message(), "Choose a service to continue.");
        assert!(error.to_string().contains("999"));
    }

    #[test]
    fn validation_error_wraps_into_booking_error() {
        let error = BookingError::from(ValidationError::MissingCategory);
        assert!(matches!(error, BookingError::Validation(ValidationError::MissingCategory)));
    }
}
