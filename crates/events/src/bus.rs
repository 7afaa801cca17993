//! Event publishing/subscription abstraction (mechanics only).
//!
//! This module provides the **event bus pattern**: a typed, in-process pub/sub registry
//! that lets one domain announce changes without calling the services that react to them.
//!
//! ## Design Philosophy
//!
//! The event bus is intentionally **lightweight** and makes minimal assumptions:
//!
//! - **Synchronous dispatch**: `publish` invokes every handler for the event's kind on the
//!   caller's thread, in subscription order, before it returns
//! - **Fire-and-forget**: handlers that start asynchronous work (e.g. a network call) are not
//!   awaited; `publish` returns once every handler has been *started*
//! - **Best-effort**: no persistence, no retries, no ordering between the completions of
//!   asynchronous work started by different events
//! - **Failure isolation**: a failing handler never stops dispatch to the others and never
//!   reaches the publisher
//!
//! ## Consistency
//!
//! An operation on the publishing side succeeds or fails on its own; consumer divergence is
//! only observable out of band (logs). Two events for the same entity published back to back
//! may have their consumer side effects land in either order.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::Event;

/// Result returned by handler bodies.
///
/// An `Err` is logged by the bus and otherwise ignored.
pub type HandlerResult = anyhow::Result<()>;

/// A subscribed callback.
///
/// Handlers receive the event by reference. Handlers that need to do asynchronous work
/// should clone what they need and spawn it; the bus does not await anything.
pub type Handler<E> = Arc<dyn Fn(&E) -> HandlerResult + Send + Sync>;

static NEXT_TOKEN: AtomicU64 = AtomicU64::new(1);

/// Opaque identity of a single subscription.
///
/// Tokens are unique for the lifetime of the process, so a token issued by one bus can never
/// remove a subscription held by another. Removal is always by token, never by comparing
/// handler closures.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionToken(u64);

impl SubscriptionToken {
    pub(crate) fn next() -> Self {
        Self(NEXT_TOKEN.fetch_add(1, Ordering::Relaxed))
    }
}

impl core::fmt::Display for SubscriptionToken {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "sub-{}", self.0)
    }
}

/// Domain-agnostic event bus (pub/sub abstraction).
///
/// ## Architecture Role
///
/// ```text
/// Publisher (e.g. ProductService) → EventBus::publish → handlers for event.kind()
///                                                        ├─ SyncHandler (inventory)
///                                                        └─ ...
/// ```
///
/// One bus exists per process (or per test scope). It is shared by reference (`Arc`) between
/// every publisher and subscriber; there is no global instance.
///
/// ## Contract
///
/// - `subscribe` registers a handler for one kind and returns a token for exact removal.
///   Dispatch order for a kind equals subscription order.
/// - `publish` invokes the handlers registered for the event's kind *at the moment of the
///   call* (a snapshot): handlers may subscribe or unsubscribe during dispatch without
///   affecting the in-flight publish. Returns the number of handlers invoked; zero is not an
///   error.
/// - Neither `publish` nor `subscribe` ever fails on behalf of a handler.
///
/// ## Thread Safety
///
/// The trait requires `Send + Sync`; implementations must protect their registry.
pub trait EventBus<E: Event>: Send + Sync {
    /// Register `handler` for events of `kind`.
    fn subscribe(&self, kind: E::Kind, handler: Handler<E>) -> SubscriptionToken;

    /// Dispatch `event` to every handler currently subscribed to its kind.
    fn publish(&self, event: E) -> usize;

    /// Remove exactly the subscription identified by `token`.
    ///
    /// Returns `false` (no-op) if it was already removed.
    fn unsubscribe(&self, token: SubscriptionToken) -> bool;

    /// Remove every subscription for `kind`, or every subscription of any kind for `None`.
    ///
    /// Returns how many subscriptions were removed.
    fn unsubscribe_all(&self, kind: Option<E::Kind>) -> usize;

    /// Number of active subscriptions for `kind` (or in total for `None`).
    fn subscriber_count(&self, kind: Option<E::Kind>) -> usize;

    /// Convenience wrapper around [`EventBus::subscribe`] for plain closures.
    fn subscribe_fn<F>(&self, kind: E::Kind, handler: F) -> SubscriptionToken
    where
        Self: Sized,
        F: Fn(&E) -> HandlerResult + Send + Sync + 'static,
    {
        self.subscribe(kind, Arc::new(handler))
    }
}

impl<E, B> EventBus<E> for Arc<B>
where
    E: Event,
    B: EventBus<E> + ?Sized,
{
    fn subscribe(&self, kind: E::Kind, handler: Handler<E>) -> SubscriptionToken {
        (**self).subscribe(kind, handler)
    }

    fn publish(&self, event: E) -> usize {
        (**self).publish(event)
    }

    fn unsubscribe(&self, token: SubscriptionToken) -> bool {
        (**self).unsubscribe(token)
    }

    fn unsubscribe_all(&self, kind: Option<E::Kind>) -> usize {
        (**self).unsubscribe_all(kind)
    }

    fn subscriber_count(&self, kind: Option<E::Kind>) -> usize {
        (**self).subscriber_count(kind)
    }
}
