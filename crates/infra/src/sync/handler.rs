//! Inventory synchronization subscriber.
//!
//! `SyncHandler` listens for product lifecycle events on the bus and mirrors them into the
//! Inventory service:
//!
//! ```text
//! ProductEvent::Created → inventory.create(record with quantity 0)
//! ProductEvent::Updated → inventory.update(article, {name?, supplier?})   (only if non-empty)
//! ProductEvent::Deleted → inventory.delete(article)
//! ```
//!
//! ## Fault isolation
//!
//! Each bus callback only plans the inventory call and spawns it on the tokio runtime; it
//! returns before the call starts. Collaborator errors and panics are logged with the product
//! id and swallowed inside the spawned task. Nothing is retried and nothing reaches the publisher,
//! so a product-side operation is never blocked, delayed or rolled back by inventory.
//!
//! ## Ordering
//!
//! Two events for the same product published back to back spawn two independent tasks whose
//! completions may land in either order. Inventory is eventually consistent with products,
//! not linearizable.
//!
//! ## Idempotent (re)attachment
//!
//! Attaching first revokes *every* subscription for the Created/Updated/Deleted kinds on the
//! bus, then subscribes fresh callbacks. Rebuilding the handler any number of times leaves
//! exactly one active subscription per kind.

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use futures::FutureExt;
use serde::Serialize;
use thiserror::Error;
use tokio::runtime::{Handle, TryCurrentError};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use stocksync_events::{EventBus, SubscriptionToken};
use stocksync_products::{ProductEvent, ProductEventKind};

use super::policy::{self, SyncAction};
use crate::config::SyncConfig;
use crate::inventory::InventoryService;

#[derive(Debug, Error)]
pub enum SyncError {
    #[error("sync handler must be attached from within a tokio runtime: {0}")]
    NoRuntime(#[from] TryCurrentError),
}

/// Lifecycle of a handler instance.
///
/// Construction subscribes before returning, so callers only ever observe `Attached`
/// or `Detached`. `Detached` is terminal: attach a new instance to resume.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncState {
    Attached,
    Detached,
}

/// Counters since attachment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SyncStats {
    /// Inventory calls started.
    pub dispatched: u64,
    pub succeeded: u64,
    pub failed: u64,
    /// Events that needed no call (malformed, or no mirrored field changed).
    pub skipped: u64,
}

#[derive(Debug, Default)]
struct Counters {
    dispatched: AtomicU64,
    succeeded: AtomicU64,
    failed: AtomicU64,
    skipped: AtomicU64,
}

impl Counters {
    fn snapshot(&self) -> SyncStats {
        SyncStats {
            dispatched: self.dispatched.load(Ordering::Relaxed),
            succeeded: self.succeeded.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
            skipped: self.skipped.load(Ordering::Relaxed),
        }
    }
}

/// State shared between the handler and its bus callbacks.
struct SyncWorker<S> {
    inventory: S,
    config: SyncConfig,
    runtime: Handle,
    in_flight: Mutex<Vec<JoinHandle<()>>>,
    counters: Counters,
}

impl<S> SyncWorker<S>
where
    S: InventoryService + 'static,
{
    fn on_event(self: &Arc<Self>, event: &ProductEvent) {
        let product_id = event.product_id().as_str();
        let action = match policy::plan(event, &self.config) {
            Ok(action) => action,
            Err(reason) => {
                self.counters.skipped.fetch_add(1, Ordering::Relaxed);
                if reason.is_malformed() {
                    warn!(product_id, %reason, "skipping malformed product event");
                } else {
                    debug!(product_id, %reason, "product event needs no inventory change");
                }
                return;
            }
        };

        self.counters.dispatched.fetch_add(1, Ordering::Relaxed);
        let worker = Arc::clone(self);
        let task = self.runtime.spawn(async move { worker.execute(action).await });

        let mut in_flight = self.in_flight.lock().unwrap_or_else(PoisonError::into_inner);
        in_flight.retain(|t| !t.is_finished());
        in_flight.push(task);
    }

    async fn execute(&self, action: SyncAction) {
        let operation = action.operation();
        let product_id = action.article_num().to_string();

        let call = async move {
            match action {
                SyncAction::Create(record) => self.inventory.create(record).await.map(|_| ()),
                SyncAction::Update { article_num, patch } => {
                    self.inventory.update(&article_num, patch).await.map(|_| ())
                }
                SyncAction::Delete { article_num } => self.inventory.delete(&article_num).await.map(|existed| {
                    if !existed {
                        debug!(product_id = %article_num, "no inventory record to delete");
                    }
                }),
            }
        };

        // A panicking collaborator counts as a failed call.
        let result = match AssertUnwindSafe(call).catch_unwind().await {
            Ok(result) => result.map_err(|err| err.to_string()),
            Err(payload) => Err(format!("collaborator panicked: {}", panic_message(payload.as_ref()))),
        };

        match result {
            Ok(()) => {
                self.counters.succeeded.fetch_add(1, Ordering::Relaxed);
                debug!(product_id = %product_id, operation, "inventory synchronized");
            }
            Err(err) => {
                self.counters.failed.fetch_add(1, Ordering::Relaxed);
                error!(
                    product_id = %product_id,
                    operation,
                    error = %err,
                    "inventory sync failed; product change not propagated"
                );
            }
        }
    }

    async fn settle(&self) {
        loop {
            let pending = std::mem::take(&mut *self.in_flight.lock().unwrap_or_else(PoisonError::into_inner));
            if pending.is_empty() {
                return;
            }
            for task in pending {
                if let Err(err) = task.await {
                    if err.is_panic() {
                        self.counters.failed.fetch_add(1, Ordering::Relaxed);
                        error!(error = %err, "inventory sync task panicked");
                    }
                }
            }
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&'static str>() {
        s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.as_str()
    } else {
        "non-string panic payload"
    }
}

/// Subscriber that mirrors product lifecycle events into the Inventory service.
///
/// Dropping the handler detaches it. In-flight inventory calls keep running.
#[must_use = "dropping a SyncHandler detaches it from the bus"]
pub struct SyncHandler<B, S>
where
    B: EventBus<ProductEvent>,
    S: InventoryService + 'static,
{
    bus: B,
    worker: Arc<SyncWorker<S>>,
    subscriptions: Vec<SubscriptionToken>,
    state: SyncState,
}

impl<B, S> SyncHandler<B, S>
where
    B: EventBus<ProductEvent>,
    S: InventoryService + 'static,
{
    /// Attach to `bus`, spawning inventory calls on the current tokio runtime.
    ///
    /// Subscriptions are in place before this returns, so an unattached handler is never
    /// observable: the result is either `Attached` or an error.
    pub fn attach(bus: B, inventory: S, config: SyncConfig) -> Result<Self, SyncError> {
        let runtime = Handle::try_current()?;
        Ok(Self::attach_with_runtime(bus, inventory, config, runtime))
    }

    /// Attach to `bus`, spawning inventory calls on `runtime`. Infallible; returns `Attached`.
    pub fn attach_with_runtime(bus: B, inventory: S, config: SyncConfig, runtime: Handle) -> Self {
        let worker = Arc::new(SyncWorker {
            inventory,
            config,
            runtime,
            in_flight: Mutex::new(Vec::new()),
            counters: Counters::default(),
        });

        for kind in ProductEventKind::ALL {
            let removed = bus.unsubscribe_all(Some(kind));
            if removed > 0 {
                debug!(?kind, removed, "revoked existing product event subscriptions");
            }
        }

        let subscriptions: Vec<SubscriptionToken> = ProductEventKind::ALL
            .into_iter()
            .map(|kind| {
                let worker = Arc::clone(&worker);
                bus.subscribe_fn(kind, move |event: &ProductEvent| {
                    worker.on_event(event);
                    Ok(())
                })
            })
            .collect();

        info!(subscriptions = subscriptions.len(), "inventory sync attached");

        Self {
            bus,
            worker,
            subscriptions,
            state: SyncState::Attached,
        }
    }

    /// Revoke exactly the subscriptions this handler owns. Safe to call repeatedly.
    pub fn detach(&mut self) {
        if self.state == SyncState::Detached {
            return;
        }
        for token in self.subscriptions.drain(..) {
            self.bus.unsubscribe(token);
        }
        self.state = SyncState::Detached;
        info!("inventory sync detached");
    }

    /// Wait for every inventory call started so far to finish.
    ///
    /// Publishing stays fire-and-forget; this is for graceful shutdown and tests.
    pub async fn settle(&self) {
        self.worker.settle().await;
    }

    pub fn state(&self) -> SyncState {
        self.state
    }

    pub fn stats(&self) -> SyncStats {
        self.worker.counters.snapshot()
    }

    pub fn config(&self) -> &SyncConfig {
        &self.worker.config
    }

    /// Tokens currently held (empty once detached).
    pub fn subscriptions(&self) -> &[SubscriptionToken] {
        &self.subscriptions
    }
}

impl<B, S> Drop for SyncHandler<B, S>
where
    B: EventBus<ProductEvent>,
    S: InventoryService + 'static,
{
    fn drop(&mut self) {
        self.detach();
    }
}

impl<B, S> core::fmt::Debug for SyncHandler<B, S>
where
    B: EventBus<ProductEvent>,
    S: InventoryService + 'static,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SyncHandler")
            .field("state", &self.state)
            .field("subscriptions", &self.subscriptions)
            .field("stats", &self.stats())
            .finish()
    }
}
