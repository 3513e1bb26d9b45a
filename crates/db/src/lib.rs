pub mod connection;
pub mod draft_store;
pub mod fixtures;
pub mod migrations;
pub mod repositories;

pub use connection::{connect, DbPool};
pub use draft_store::{FileDraftStore, InMemoryDraftStore};
pub use fixtures::{SeedCatalog, SeedResult, VerificationResult};
pub use repositories::{
    InMemoryOrderSink, RepositoryError, SqlCatalogRepository, SqlOrderRepository, SqlOrderSink,
    StaticCatalogSource,
};
