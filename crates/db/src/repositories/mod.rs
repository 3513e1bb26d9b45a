use thiserror::Error;

pub mod catalog;
pub mod memory;
pub mod order;

pub use catalog::SqlCatalogRepository;
pub use memory::{InMemoryOrderSink, StaticCatalogSource};
pub use order::{SqlOrderRepository, SqlOrderSink};

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("decode error: {0}")]
    Decode(String),
}
