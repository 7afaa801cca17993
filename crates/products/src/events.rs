//! Product lifecycle events published on the bus.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stocksync_core::{DomainError, DomainResult};
use stocksync_events::Event;

use crate::product::{NewProduct, ProductChanges, ProductId};

/// Routing key for product events.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProductEventKind {
    Created,
    Updated,
    Deleted,
}

impl ProductEventKind {
    pub const ALL: [ProductEventKind; 3] = [Self::Created, Self::Updated, Self::Deleted];
}

/// Event: ProductCreated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductCreated {
    pub product_id: ProductId,
    pub fields: NewProduct,
    pub occurred_at: DateTime<Utc>,
}

/// Event: ProductUpdated. Carries only the fields that changed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductUpdated {
    pub product_id: ProductId,
    pub changes: ProductChanges,
    pub occurred_at: DateTime<Utc>,
}

/// Event: ProductDeleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductDeleted {
    pub product_id: ProductId,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ProductEvent {
    Created(ProductCreated),
    Updated(ProductUpdated),
    Deleted(ProductDeleted),
}

impl ProductEvent {
    /// Build a `Created` event, rejecting an empty id or name.
    pub fn created(product_id: ProductId, fields: NewProduct, occurred_at: DateTime<Utc>) -> DomainResult<Self> {
        ensure_id(&product_id)?;
        if fields.name.trim().is_empty() {
            return Err(DomainError::validation("created event requires a name"));
        }
        Ok(Self::Created(ProductCreated {
            product_id,
            fields,
            occurred_at,
        }))
    }

    /// Build an `Updated` event carrying exactly `changes`.
    pub fn updated(product_id: ProductId, changes: ProductChanges, occurred_at: DateTime<Utc>) -> DomainResult<Self> {
        ensure_id(&product_id)?;
        Ok(Self::Updated(ProductUpdated {
            product_id,
            changes,
            occurred_at,
        }))
    }

    pub fn deleted(product_id: ProductId, occurred_at: DateTime<Utc>) -> DomainResult<Self> {
        ensure_id(&product_id)?;
        Ok(Self::Deleted(ProductDeleted {
            product_id,
            occurred_at,
        }))
    }

    pub fn product_id(&self) -> &ProductId {
        match self {
            ProductEvent::Created(e) => &e.product_id,
            ProductEvent::Updated(e) => &e.product_id,
            ProductEvent::Deleted(e) => &e.product_id,
        }
    }
}

fn ensure_id(product_id: &ProductId) -> DomainResult<()> {
    if product_id.is_blank() {
        return Err(DomainError::invalid_id("ProductId: empty"));
    }
    Ok(())
}

impl Event for ProductEvent {
    type Kind = ProductEventKind;

    fn kind(&self) -> ProductEventKind {
        match self {
            ProductEvent::Created(_) => ProductEventKind::Created,
            ProductEvent::Updated(_) => ProductEventKind::Updated,
            ProductEvent::Deleted(_) => ProductEventKind::Deleted,
        }
    }

    fn event_type(&self) -> &'static str {
        match self {
            ProductEvent::Created(_) => "products.product.created",
            ProductEvent::Updated(_) => "products.product.updated",
            ProductEvent::Deleted(_) => "products.product.deleted",
        }
    }

    fn entity_id(&self) -> &str {
        self.product_id().as_str()
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            ProductEvent::Created(e) => e.occurred_at,
            ProductEvent::Updated(e) => e.occurred_at,
            ProductEvent::Deleted(e) => e.occurred_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_time() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2024-05-01T12:00:00Z").unwrap().with_timezone(&Utc)
    }

    #[test]
    fn created_requires_name() {
        let err = ProductEvent::created(ProductId::new("P1"), NewProduct::named(""), test_time()).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn constructors_require_id() {
        assert!(ProductEvent::created(ProductId::new(" "), NewProduct::named("Widget"), test_time()).is_err());
        assert!(ProductEvent::updated(ProductId::new(""), ProductChanges::default(), test_time()).is_err());
        assert!(ProductEvent::deleted(ProductId::new(""), test_time()).is_err());
    }

    #[test]
    fn kind_and_metadata_follow_variant() {
        let ev = ProductEvent::updated(ProductId::new("P1"), ProductChanges::default().price(199.99), test_time())
            .unwrap();
        assert_eq!(ev.kind(), ProductEventKind::Updated);
        assert_eq!(ev.event_type(), "products.product.updated");
        assert_eq!(ev.entity_id(), "P1");
        assert_eq!(ev.occurred_at(), test_time());
    }

    #[test]
    fn serializes_with_kind_tag() {
        let ev = ProductEvent::deleted(ProductId::new("P9"), test_time()).unwrap();
        let json = serde_json::to_value(&ev).unwrap();
        assert_eq!(json["kind"], "deleted");
        assert_eq!(json["product_id"], "P9");

        let back: ProductEvent = serde_json::from_value(json).unwrap();
        assert_eq!(back, ev);
    }
}
