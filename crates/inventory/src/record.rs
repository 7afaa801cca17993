use serde::{Deserialize, Serialize};

use stocksync_core::{DomainError, DomainResult};

/// Inventory record, owned and persisted by the Inventory service.
///
/// `article_num` equals the id of the product the record mirrors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryRecord {
    pub article_num: String,
    pub name: String,
    pub quantity: i64,
    pub location: String,
    pub supplier: String,
}

impl InventoryRecord {
    pub fn validate(&self) -> DomainResult<()> {
        if self.article_num.trim().is_empty() {
            return Err(DomainError::invalid_id("article number cannot be empty"));
        }
        if self.name.trim().is_empty() {
            return Err(DomainError::validation("name cannot be empty"));
        }
        if self.quantity < 0 {
            return Err(DomainError::validation("quantity cannot be negative"));
        }
        Ok(())
    }
}

/// Partial update for an inventory record.
///
/// Only the fields inventory mirrors from the product catalog can be patched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supplier: Option<String>,
}

impl InventoryPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.supplier.is_none()
    }

    /// Overwrite the patched fields on `record`.
    pub fn apply_to(&self, record: &mut InventoryRecord) -> DomainResult<()> {
        if let Some(name) = &self.name {
            if name.trim().is_empty() {
                return Err(DomainError::validation("name cannot be empty"));
            }
            record.name = name.clone();
        }
        if let Some(supplier) = &self.supplier {
            record.supplier = supplier.clone();
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn widget() -> InventoryRecord {
        InventoryRecord {
            article_num: "P1".to_string(),
            name: "Widget".to_string(),
            quantity: 0,
            location: "Main Warehouse".to_string(),
            supplier: "Acme".to_string(),
        }
    }

    #[test]
    fn validate_accepts_fresh_record() {
        assert!(widget().validate().is_ok());
    }

    #[test]
    fn validate_rejects_missing_article_and_negative_quantity() {
        let mut r = widget();
        r.article_num = String::new();
        assert!(matches!(r.validate(), Err(DomainError::InvalidId(_))));

        let mut r = widget();
        r.quantity = -1;
        assert!(matches!(r.validate(), Err(DomainError::Validation(_))));
    }

    #[test]
    fn patch_leaves_unset_fields_alone() {
        let mut r = widget();
        let patch = InventoryPatch {
            supplier: Some("NewCo".to_string()),
            ..InventoryPatch::default()
        };
        patch.apply_to(&mut r).unwrap();
        assert_eq!(r.supplier, "NewCo");
        assert_eq!(r.name, "Widget");
        assert_eq!(r.quantity, 0);
        assert_eq!(r.location, "Main Warehouse");
    }

    #[test]
    fn patch_rejects_blank_name() {
        let mut r = widget();
        let patch = InventoryPatch {
            name: Some(" ".to_string()),
            supplier: None,
        };
        assert!(patch.apply_to(&mut r).is_err());
        assert_eq!(r.name, "Widget");
    }

    #[test]
    fn empty_patch_serializes_to_empty_object() {
        assert!(InventoryPatch::default().is_empty());
        assert_eq!(serde_json::to_string(&InventoryPatch::default()).unwrap(), "{}");
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// Property: applying a patch never changes quantity, location or article number.
            #[test]
            fn patch_preserves_stock_fields(
                name in proptest::option::of("[A-Za-z][A-Za-z0-9 ]{0,30}"),
                supplier in proptest::option::of("[A-Za-z0-9 ]{0,30}"),
                quantity in 0i64..10_000,
            ) {
                let mut r = widget();
                r.quantity = quantity;
                let patch = InventoryPatch { name: name.clone(), supplier: supplier.clone() };

                patch.apply_to(&mut r).unwrap();

                prop_assert_eq!(r.quantity, quantity);
                prop_assert_eq!(r.location.as_str(), "Main Warehouse");
                prop_assert_eq!(r.article_num.as_str(), "P1");
                prop_assert_eq!(r.name, name.unwrap_or_else(|| "Widget".to_string()));
                prop_assert_eq!(r.supplier, supplier.unwrap_or_else(|| "Acme".to_string()));
            }
        }
    }
}
