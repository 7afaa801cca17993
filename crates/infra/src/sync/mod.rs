//! Product → inventory synchronization.

pub mod handler;
pub mod policy;

pub use handler::{SyncError, SyncHandler, SyncState, SyncStats};
pub use policy::{SkipReason, SyncAction};
