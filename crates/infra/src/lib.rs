//! Infrastructure layer: inventory collaborator, product service, and the
//! product → inventory synchronization subscriber.

pub mod config;
pub mod inventory;
pub mod product_service;
pub mod sync;


#[cfg(test)]
mod test_support;

pub use config::SyncConfig;
pub use inventory::{InMemoryInventoryService, InventoryService, InventoryServiceError};
pub use product_service::ProductService;
pub use sync::{SyncError, SyncHandler, SyncState, SyncStats};
