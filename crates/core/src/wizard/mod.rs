//! The booking wizard: step state machine, reducer-style actions and the
//! collaborator ports it drives.

pub mod machine;
pub mod steps;

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::contact::AddressCandidate;
use crate::domain::order::{OrderId, OrderRecord};

pub use machine::WizardMachine;
pub use steps::{AdvanceOutcome, Step, WizardAction};

/// Session as reported by the identity collaborator.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Session {
    Authenticated { user_id: String },
    /// Browsing and configuring allowed; scheduling and submission are
    /// not.
    Guest,
    SignedOut,
}

impl Session {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated { .. })
    }
}

#[async_trait]
pub trait IdentitySource: Send + Sync {
    async fn current_session(&self) -> Session;
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("order sink rejected the write: {0}")]
pub struct OrderSinkError(pub String);

/// The one write the core performs. Called exactly once per successful
/// submission.
#[async_trait]
pub trait OrderSink: Send + Sync {
    async fn create(&self, order: &OrderRecord) -> Result<OrderId, OrderSinkError>;
}

/// Fire-and-forget; implementations swallow their own failures.
#[async_trait]
pub trait NotificationDispatch: Send + Sync {
    async fn order_created(&self, order: &OrderRecord);
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("address lookup failed: {0}")]
pub struct AddressSourceError(pub String);

/// Consumed at the contact step only; a selected candidate becomes an
/// opaque reference on the draft.
#[async_trait]
pub trait AddressSource: Send + Sync {
    async fn resolve(&self, query: &str) -> Result<Vec<AddressCandidate>, AddressSourceError>;
}
