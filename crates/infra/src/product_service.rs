//! Products-side service: owns the catalog and announces every change on the bus.
//!
//! Mutations commit locally first, then publish. The result returned to the caller depends
//! only on the catalog; whatever subscribers do with the event (inventory sync included)
//! never changes it.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::Utc;
use tracing::{debug, info};

use stocksync_core::{DomainError, DomainResult};
use stocksync_events::{Event, EventBus};
use stocksync_products::{NewProduct, Product, ProductChanges, ProductEvent, ProductId};

/// In-memory product catalog that publishes `ProductEvent`s.
#[derive(Debug)]
pub struct ProductService<B>
where
    B: EventBus<ProductEvent>,
{
    bus: B,
    products: RwLock<HashMap<ProductId, Product>>,
}

impl<B> ProductService<B>
where
    B: EventBus<ProductEvent>,
{
    pub fn new(bus: B) -> Self {
        Self {
            bus,
            products: RwLock::new(HashMap::new()),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<ProductId, Product>> {
        self.products.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<ProductId, Product>> {
        self.products.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Create a product under a freshly generated id.
    pub fn create(&self, fields: NewProduct) -> DomainResult<Product> {
        self.create_with_id(ProductId::generate(), fields)
    }

    /// Create a product under a caller-chosen id.
    pub fn create_with_id(&self, id: ProductId, fields: NewProduct) -> DomainResult<Product> {
        let now = Utc::now();
        let product = Product::create(id.clone(), fields.clone(), now)?;
        let event = ProductEvent::created(id.clone(), fields, now)?;

        {
            let mut products = self.write();
            if products.contains_key(&id) {
                return Err(DomainError::conflict(format!("product {id} already exists")));
            }
            products.insert(id.clone(), product.clone());
        }

        info!(product_id = %id, "product created");
        self.announce(event);
        Ok(product)
    }

    /// Apply a partial update. The published event carries exactly `changes`.
    pub fn update(&self, id: &ProductId, changes: ProductChanges) -> DomainResult<Product> {
        changes.validate()?;

        let (product, event) = {
            let mut products = self.write();
            let product = products
                .get_mut(id)
                .ok_or_else(|| DomainError::not_found(format!("product {id}")))?;
            // Per-product timestamps never run backwards, even if the wall clock does.
            let now = Utc::now().max(product.updated_at);
            product.apply_changes(&changes, now)?;
            (product.clone(), ProductEvent::updated(id.clone(), changes, now)?)
        };

        info!(product_id = %id, "product updated");
        self.announce(event);
        Ok(product)
    }

    /// Remove a product. Returns `false` (and publishes nothing) if it did not exist.
    pub fn delete(&self, id: &ProductId) -> DomainResult<bool> {
        let removed = self.write().remove(id);
        let Some(product) = removed else {
            debug!(product_id = %id, "delete of unknown product");
            return Ok(false);
        };

        let now = Utc::now().max(product.updated_at);
        info!(product_id = %id, "product deleted");
        self.announce(ProductEvent::deleted(id.clone(), now)?);
        Ok(true)
    }

    pub fn get(&self, id: &ProductId) -> Option<Product> {
        self.read().get(id).cloned()
    }

    /// All products, ordered by id.
    pub fn list(&self) -> Vec<Product> {
        let mut out: Vec<_> = self.read().values().cloned().collect();
        out.sort_by(|a, b| a.id.cmp(&b.id));
        out
    }

    fn announce(&self, event: ProductEvent) {
        let event_type = event.event_type();
        let handlers = self.bus.publish(event);
        debug!(event_type, handlers, "product event published");
    }
}
