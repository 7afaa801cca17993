//! `stocksync-events`: typed in-process event dispatch.
//!
//! - [`Event`]: closed, kind-tagged domain events
//! - [`EventBus`]: publish/subscribe contract with token-based removal
//! - [`InMemoryEventBus`]: the synchronous, snapshot-dispatching implementation

pub mod bus;
pub mod event;
pub mod in_memory_bus;

pub use bus::{EventBus, Handler, HandlerResult, SubscriptionToken};
pub use event::Event;
pub use in_memory_bus::InMemoryEventBus;
