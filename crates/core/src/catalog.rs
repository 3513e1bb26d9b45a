//! Read-only, session-cached view of the service and add-on catalogs.
//!
//! Loads are idempotent and de-duplicated: the async mutex is held
//! across the fetch, so concurrent triggers collapse to one in-flight
//! request and late callers wake to the cached result. A failed fetch
//! caches nothing, which keeps the retry affordance cheap. Dropping a
//! load future cancels the in-flight fetch without touching cache state.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::Mutex;

use crate::domain::addon::AddonCatalogEntry;
use crate::domain::service::ServiceCatalogEntry;
use crate::errors::BookingError;

/// Retryable failure of the catalog collaborator.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("catalog source unavailable: {0}")]
pub struct CatalogSourceError(pub String);

#[async_trait]
pub trait CatalogSource: Send + Sync {
    async fn list_services(&self) -> Result<Vec<ServiceCatalogEntry>, CatalogSourceError>;
    async fn list_addons(&self) -> Result<Vec<AddonCatalogEntry>, CatalogSourceError>;
}

pub struct CatalogCache<S> {
    source: S,
    services: Mutex<Option<Arc<Vec<ServiceCatalogEntry>>>>,
    addons: Mutex<Option<Arc<Vec<AddonCatalogEntry>>>>,
}

impl<S> CatalogCache<S>
where
    S: CatalogSource,
{
    pub fn new(source: S) -> Self {
        Self { source, services: Mutex::new(None), addons: Mutex::new(None) }
    }

    /// Fetches once per wizard session; inactive services are filtered
    /// out before caching.
    pub async fn load_services(&self) -> Result<Arc<Vec<ServiceCatalogEntry>>, BookingError> {
        let mut slot = self.services.lock().await;
        if let Some(cached) = slot.as_ref() {
            tracing::debug!(count = cached.len(), "service catalog cache hit");
            return Ok(Arc::clone(cached));
        }

        let fetched = self
            .source
            .list_services()
            .await
            .map_err(|error| BookingError::CatalogUnavailable(error.to_string()))?;
        let entries: Arc<Vec<_>> =
            Arc::new(fetched.into_iter().filter(|service| service.active).collect());
        tracing::info!(count = entries.len(), "service catalog loaded");
        *slot = Some(Arc::clone(&entries));
        Ok(entries)
    }

    pub async fn load_addons(&self) -> Result<Arc<Vec<AddonCatalogEntry>>, BookingError> {
        let mut slot = self.addons.lock().await;
        if let Some(cached) = slot.as_ref() {
            tracing::debug!(count = cached.len(), "add-on catalog cache hit");
            return Ok(Arc::clone(cached));
        }

        let fetched = self
            .source
            .list_addons()
            .await
            .map_err(|error| BookingError::CatalogUnavailable(error.to_string()))?;
        let entries = Arc::new(fetched);
        tracing::info!(count = entries.len(), "add-on catalog loaded");
        *slot = Some(Arc::clone(&entries));
        Ok(entries)
    }
}
