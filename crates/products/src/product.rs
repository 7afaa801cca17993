use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stocksync_core::{DomainError, DomainResult};

stocksync_core::string_id!(
    /// Product identifier. Doubles as the inventory article number.
    pub struct ProductId, "ProductId"
);

/// Fields supplied when a product is created.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewProduct {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supplier: Option<String>,
}

impl NewProduct {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_price(mut self, price: f64) -> Self {
        self.price = Some(price);
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_supplier(mut self, supplier: impl Into<String>) -> Self {
        self.supplier = Some(supplier.into());
        self
    }

    pub fn validate(&self) -> DomainResult<()> {
        if self.name.trim().is_empty() {
            return Err(DomainError::validation("name cannot be empty"));
        }
        validate_price(self.price)
    }
}

/// The subset of product fields that changed in an update. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductChanges {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supplier: Option<String>,
}

impl ProductChanges {
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn price(mut self, price: f64) -> Self {
        self.price = Some(price);
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn supplier(mut self, supplier: impl Into<String>) -> Self {
        self.supplier = Some(supplier.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.price.is_none() && self.description.is_none() && self.supplier.is_none()
    }

    /// True when a field mirrored by inventory records (name, supplier) changed.
    pub fn touches_inventory(&self) -> bool {
        self.name.is_some() || self.supplier.is_some()
    }

    pub fn validate(&self) -> DomainResult<()> {
        if self.is_empty() {
            return Err(DomainError::validation("update contains no changes"));
        }
        if let Some(name) = &self.name {
            if name.trim().is_empty() {
                return Err(DomainError::validation("name cannot be empty"));
            }
        }
        validate_price(self.price)
    }
}

fn validate_price(price: Option<f64>) -> DomainResult<()> {
    match price {
        Some(p) if !p.is_finite() || p < 0.0 => {
            Err(DomainError::validation("price must be a non-negative number"))
        }
        _ => Ok(()),
    }
}

/// Product catalog entry, as held by the Products side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub price: Option<f64>,
    pub description: Option<String>,
    pub supplier: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Build a product from validated creation fields.
    pub fn create(id: ProductId, fields: NewProduct, now: DateTime<Utc>) -> DomainResult<Self> {
        if id.is_blank() {
            return Err(DomainError::invalid_id("ProductId: empty"));
        }
        fields.validate()?;
        Ok(Self {
            id,
            name: fields.name,
            price: fields.price,
            description: fields.description,
            supplier: fields.supplier,
            created_at: now,
            updated_at: now,
        })
    }

    /// Apply a validated partial update. Absent fields are left untouched.
    pub fn apply_changes(&mut self, changes: &ProductChanges, now: DateTime<Utc>) -> DomainResult<()> {
        changes.validate()?;
        if let Some(name) = &changes.name {
            self.name = name.clone();
        }
        if let Some(price) = changes.price {
            self.price = Some(price);
        }
        if let Some(description) = &changes.description {
            self.description = Some(description.clone());
        }
        if let Some(supplier) = &changes.supplier {
            self.supplier = Some(supplier.clone());
        }
        self.updated_at = now;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_time() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2024-05-01T12:00:00Z").unwrap().with_timezone(&Utc)
    }

    #[test]
    fn create_rejects_blank_name() {
        let err = Product::create(ProductId::new("P1"), NewProduct::named("   "), test_time()).unwrap_err();
        assert_eq!(err, DomainError::validation("name cannot be empty"));
    }

    #[test]
    fn create_rejects_blank_id() {
        let err = Product::create(ProductId::new(""), NewProduct::named("Widget"), test_time()).unwrap_err();
        assert!(matches!(err, DomainError::InvalidId(_)));
    }

    #[test]
    fn create_rejects_negative_price() {
        let fields = NewProduct::named("Widget").with_price(-1.0);
        assert!(Product::create(ProductId::new("P1"), fields, test_time()).is_err());
    }

    #[test]
    fn apply_changes_only_touches_present_fields() {
        let fields = NewProduct::named("Widget").with_price(10.0).with_supplier("Acme");
        let mut product = Product::create(ProductId::new("P1"), fields, test_time()).unwrap();
        let later = test_time() + chrono::Duration::minutes(5);

        product.apply_changes(&ProductChanges::default().price(199.99), later).unwrap();

        assert_eq!(product.name, "Widget");
        assert_eq!(product.price, Some(199.99));
        assert_eq!(product.supplier.as_deref(), Some("Acme"));
        assert_eq!(product.updated_at, later);
        assert_eq!(product.created_at, test_time());
    }

    #[test]
    fn empty_changes_are_rejected() {
        let mut product = Product::create(ProductId::new("P1"), NewProduct::named("Widget"), test_time()).unwrap();
        assert!(product.apply_changes(&ProductChanges::default(), test_time()).is_err());
    }

    #[test]
    fn touches_inventory_only_for_name_or_supplier() {
        assert!(!ProductChanges::default().price(1.0).touches_inventory());
        assert!(!ProductChanges::default().description("d").touches_inventory());
        assert!(ProductChanges::default().name("n").touches_inventory());
        assert!(ProductChanges::default().supplier("s").touches_inventory());
    }

    #[test]
    fn changes_omit_absent_fields_when_serialized() {
        let json = serde_json::to_value(ProductChanges::default().supplier("NewCo")).unwrap();
        assert_eq!(json, serde_json::json!({ "supplier": "NewCo" }));
    }
}
