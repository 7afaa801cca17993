//! Product → inventory translation policy (pure, no IO).
//!
//! Decides which inventory operation, if any, a product event maps to. The handler
//! executes the resulting [`SyncAction`]; a [`SkipReason`] means no collaborator call.

use stocksync_inventory::{InventoryPatch, InventoryRecord};
use stocksync_products::{ProductChanges, ProductCreated, ProductDeleted, ProductEvent, ProductUpdated};

use crate::config::SyncConfig;

/// Inventory operation derived from a product event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncAction {
    Create(InventoryRecord),
    Update { article_num: String, patch: InventoryPatch },
    Delete { article_num: String },
}

impl SyncAction {
    pub fn article_num(&self) -> &str {
        match self {
            SyncAction::Create(record) => &record.article_num,
            SyncAction::Update { article_num, .. } | SyncAction::Delete { article_num } => article_num,
        }
    }

    pub fn operation(&self) -> &'static str {
        match self {
            SyncAction::Create(_) => "create",
            SyncAction::Update { .. } => "update",
            SyncAction::Delete { .. } => "delete",
        }
    }
}

/// Why an event produced no inventory call.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// Malformed event: empty product id.
    MissingProductId,
    /// Malformed event: `Created` without a name.
    MissingName,
    /// `Updated` touched none of the mirrored fields (name, supplier).
    NoSyncedFields,
}

impl SkipReason {
    /// Malformed events are logged louder than ordinary no-ops.
    pub fn is_malformed(self) -> bool {
        !matches!(self, SkipReason::NoSyncedFields)
    }
}

impl core::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(match self {
            SkipReason::MissingProductId => "missing product id",
            SkipReason::MissingName => "missing product name",
            SkipReason::NoSyncedFields => "no synchronized fields changed",
        })
    }
}

/// Map a product event to the inventory call it requires, if any.
pub fn plan(event: &ProductEvent, config: &SyncConfig) -> Result<SyncAction, SkipReason> {
    match event {
        ProductEvent::Created(e) => plan_created(e, config),
        ProductEvent::Updated(e) => plan_updated(e),
        ProductEvent::Deleted(e) => plan_deleted(e),
    }
}

/// New products start with zero stock at the configured location.
fn plan_created(event: &ProductCreated, config: &SyncConfig) -> Result<SyncAction, SkipReason> {
    if event.product_id.is_blank() {
        return Err(SkipReason::MissingProductId);
    }
    if event.fields.name.trim().is_empty() {
        return Err(SkipReason::MissingName);
    }

    let supplier = event
        .fields
        .supplier
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(config.default_supplier.as_str());

    Ok(SyncAction::Create(InventoryRecord {
        article_num: event.product_id.to_string(),
        name: event.fields.name.clone(),
        quantity: 0,
        location: config.default_location.clone(),
        supplier: supplier.to_string(),
    }))
}

fn plan_updated(event: &ProductUpdated) -> Result<SyncAction, SkipReason> {
    if event.product_id.is_blank() {
        return Err(SkipReason::MissingProductId);
    }
    if !event.changes.touches_inventory() {
        return Err(SkipReason::NoSyncedFields);
    }
    Ok(SyncAction::Update {
        article_num: event.product_id.to_string(),
        patch: inventory_patch(&event.changes),
    })
}

fn plan_deleted(event: &ProductDeleted) -> Result<SyncAction, SkipReason> {
    if event.product_id.is_blank() {
        return Err(SkipReason::MissingProductId);
    }
    Ok(SyncAction::Delete {
        article_num: event.product_id.to_string(),
    })
}

/// Keep only the fields inventory mirrors. Price and description never propagate.
pub fn inventory_patch(changes: &ProductChanges) -> InventoryPatch {
    InventoryPatch {
        name: changes.name.clone(),
        supplier: changes.supplier.clone(),
    }
}
