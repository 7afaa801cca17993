//! Inventory service adapters.
//!
//! The Inventory service is an external collaborator: this side only consumes its
//! create/update/delete/get contract. Records are owned and persisted over there.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use stocksync_core::DomainError;
use stocksync_inventory::{InventoryPatch, InventoryRecord};

pub mod in_memory;

pub use in_memory::InMemoryInventoryService;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InventoryServiceError {
    #[error("inventory record not found: {0}")]
    NotFound(String),

    #[error("inventory conflict: {0}")]
    Conflict(String),

    #[error("invalid inventory request: {0}")]
    Validation(String),

    /// Transport or backend failure (timeouts, connection errors, 5xx).
    #[error("inventory service unavailable: {0}")]
    Unavailable(String),
}

impl From<DomainError> for InventoryServiceError {
    fn from(value: DomainError) -> Self {
        match value {
            DomainError::Validation(msg) | DomainError::InvalidId(msg) => Self::Validation(msg),
            DomainError::NotFound(msg) => Self::NotFound(msg),
            DomainError::Conflict(msg) => Self::Conflict(msg),
        }
    }
}

/// Inventory collaborator contract.
///
/// Calls may be slow (network) and may fail; callers decide how failures are handled.
#[async_trait]
pub trait InventoryService: Send + Sync {
    async fn create(&self, record: InventoryRecord) -> Result<InventoryRecord, InventoryServiceError>;

    async fn update(&self, article_num: &str, patch: InventoryPatch) -> Result<InventoryRecord, InventoryServiceError>;

    /// Returns whether a record existed.
    async fn delete(&self, article_num: &str) -> Result<bool, InventoryServiceError>;

    async fn get(&self, article_num: &str) -> Result<Option<InventoryRecord>, InventoryServiceError>;
}

#[async_trait]
impl<S> InventoryService for Arc<S>
where
    S: InventoryService + ?Sized,
{
    async fn create(&self, record: InventoryRecord) -> Result<InventoryRecord, InventoryServiceError> {
        (**self).create(record).await
    }

    async fn update(&self, article_num: &str, patch: InventoryPatch) -> Result<InventoryRecord, InventoryServiceError> {
        (**self).update(article_num, patch).await
    }

    async fn delete(&self, article_num: &str) -> Result<bool, InventoryServiceError> {
        (**self).delete(article_num).await
    }

    async fn get(&self, article_num: &str) -> Result<Option<InventoryRecord>, InventoryServiceError> {
        (**self).get(article_num).await
    }
}
