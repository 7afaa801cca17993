//! Inventory domain module.
//!
//! Inventory records as exchanged with the Inventory service, implemented purely
//! as deterministic domain logic (no IO, no HTTP, no storage).

pub mod record;

pub use record::{InventoryPatch, InventoryRecord};
