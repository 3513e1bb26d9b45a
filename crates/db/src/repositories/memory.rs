use tokio::sync::RwLock;

use tidybook_core::catalog::{CatalogSource, CatalogSourceError};
use tidybook_core::domain::addon::AddonCatalogEntry;
use tidybook_core::domain::order::{OrderId, OrderRecord};
use tidybook_core::domain::service::ServiceCatalogEntry;
use tidybook_core::wizard::{OrderSink, OrderSinkError};

/// Fixed catalog served from memory; the offline counterpart of
/// [`super::SqlCatalogRepository`].
#[derive(Default)]
pub struct StaticCatalogSource {
    services: Vec<ServiceCatalogEntry>,
    addons: Vec<AddonCatalogEntry>,
}

impl StaticCatalogSource {
    pub fn new(services: Vec<ServiceCatalogEntry>, addons: Vec<AddonCatalogEntry>) -> Self {
        Self { services, addons }
    }
}

#[async_trait::async_trait]
impl CatalogSource for StaticCatalogSource {
    async fn list_services(&self) -> Result<Vec<ServiceCatalogEntry>, CatalogSourceError> {
        Ok(self.services.clone())
    }

    async fn list_addons(&self) -> Result<Vec<AddonCatalogEntry>, CatalogSourceError> {
        Ok(self.addons.clone())
    }
}

#[derive(Default)]
pub struct InMemoryOrderSink {
    orders: RwLock<Vec<OrderRecord>>,
}

impl InMemoryOrderSink {
    pub async fn orders(&self) -> Vec<OrderRecord> {
        self.orders.read().await.clone()
    }
}

#[async_trait::async_trait]
impl OrderSink for InMemoryOrderSink {
    async fn create(&self, order: &OrderRecord) -> Result<OrderId, OrderSinkError> {
        let mut orders = self.orders.write().await;
        orders.push(order.clone());
        Ok(order.id)
    }
}
