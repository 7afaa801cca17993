use chrono::{DateTime, Utc};

/// A domain event routed through the bus.
///
/// Events are:
/// - **immutable** (treat them as facts)
/// - **closed sum types**: one variant per kind, each carrying only the fields valid for it
/// - **transient** here: constructed by the publisher, consumed by `publish`, then dropped
pub trait Event: Clone + core::fmt::Debug + Send + Sync + 'static {
    /// Routing key. Subscriptions are registered per kind.
    type Kind: Copy + Eq + core::hash::Hash + core::fmt::Debug + Send + Sync + 'static;

    /// The kind this event is dispatched under.
    fn kind(&self) -> Self::Kind;

    /// Stable event name/type identifier (e.g. "products.product.created").
    fn event_type(&self) -> &'static str;

    /// Identifier of the entity the event describes, stable across its lifecycle.
    fn entity_id(&self) -> &str;

    /// When the event was emitted (generated by the publisher before `publish`).
    fn occurred_at(&self) -> DateTime<Utc>;
}
