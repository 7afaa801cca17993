//! In-memory event bus.

use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{debug, error, trace, warn};

use crate::Event;
use crate::bus::{EventBus, Handler, SubscriptionToken};

struct Subscriber<E: Event> {
    token: SubscriptionToken,
    kind: E::Kind,
    handler: Handler<E>,
}

/// In-memory pub/sub bus.
///
/// - No IO / no async
/// - Synchronous fan-out in subscription order over a snapshot of the registry
/// - Handler errors and panics are logged and contained
pub struct InMemoryEventBus<E: Event> {
    subscribers: Mutex<Vec<Subscriber<E>>>,
}

impl<E: Event> InMemoryEventBus<E> {
    pub fn new() -> Self {
        Self::default()
    }

    // The registry is only mutated by single `Vec` operations, so a poisoned lock still
    // guards a consistent list.
    fn registry(&self) -> MutexGuard<'_, Vec<Subscriber<E>>> {
        self.subscribers.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<E: Event> Default for InMemoryEventBus<E> {
    fn default() -> Self {
        Self {
            subscribers: Mutex::new(Vec::new()),
        }
    }
}

impl<E: Event> core::fmt::Debug for InMemoryEventBus<E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("InMemoryEventBus")
            .field("subscribers", &self.registry().len())
            .finish()
    }
}

impl<E: Event> EventBus<E> for InMemoryEventBus<E> {
    fn subscribe(&self, kind: E::Kind, handler: Handler<E>) -> SubscriptionToken {
        let token = SubscriptionToken::next();
        self.registry().push(Subscriber { token, kind, handler });
        debug!(%token, ?kind, "subscribed");
        token
    }

    fn publish(&self, event: E) -> usize {
        let kind = event.kind();

        // Snapshot, then release the lock before running any handler so handlers can
        // (un)subscribe without deadlocking or disturbing this dispatch.
        let snapshot: Vec<(SubscriptionToken, Handler<E>)> = self
            .registry()
            .iter()
            .filter(|s| s.kind == kind)
            .map(|s| (s.token, Arc::clone(&s.handler)))
            .collect();

        for (token, handler) in &snapshot {
            match panic::catch_unwind(AssertUnwindSafe(|| handler(&event))) {
                Ok(Ok(())) => {}
                Ok(Err(err)) => warn!(
                    %token,
                    event_type = event.event_type(),
                    entity_id = event.entity_id(),
                    error = %err,
                    "event handler failed"
                ),
                Err(payload) => error!(
                    %token,
                    event_type = event.event_type(),
                    entity_id = event.entity_id(),
                    panic = panic_message(payload.as_ref()),
                    "event handler panicked"
                ),
            }
        }

        trace!(
            event_type = event.event_type(),
            entity_id = event.entity_id(),
            handlers = snapshot.len(),
            "published"
        );
        snapshot.len()
    }

    fn unsubscribe(&self, token: SubscriptionToken) -> bool {
        let mut subs = self.registry();
        match subs.iter().position(|s| s.token == token) {
            Some(idx) => {
                subs.remove(idx);
                debug!(%token, "unsubscribed");
                true
            }
            None => false,
        }
    }

    fn unsubscribe_all(&self, kind: Option<E::Kind>) -> usize {
        let mut subs = self.registry();
        let before = subs.len();
        match kind {
            Some(kind) => subs.retain(|s| s.kind != kind),
            None => subs.clear(),
        }
        let removed = before - subs.len();
        if removed > 0 {
            debug!(?kind, removed, "unsubscribed all");
        }
        removed
    }

    fn subscriber_count(&self, kind: Option<E::Kind>) -> usize {
        let subs = self.registry();
        match kind {
            Some(kind) => subs.iter().filter(|s| s.kind == kind).count(),
            None => subs.len(),
        }
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&'static str>() {
        s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.as_str()
    } else {
        "non-string panic payload"
    }
}
