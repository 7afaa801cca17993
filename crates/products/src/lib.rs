//! Products domain module.
//!
//! Product model and the lifecycle events the Products side publishes
//! (pure domain logic: no IO, no HTTP, no storage).

pub mod events;
pub mod product;

pub use events::{ProductCreated, ProductDeleted, ProductEvent, ProductEventKind, ProductUpdated};
pub use product::{NewProduct, Product, ProductChanges, ProductId};
