//! Configuration loading and representation.

use serde::{Deserialize, Serialize};

/// Location assigned to inventory records created from new products.
pub const DEFAULT_LOCATION: &str = "Main Warehouse";

/// Supplier assigned when a created product names none.
pub const DEFAULT_SUPPLIER: &str = "Default Supplier";

pub const ENV_DEFAULT_LOCATION: &str = "STOCKSYNC_DEFAULT_LOCATION";
pub const ENV_DEFAULT_SUPPLIER: &str = "STOCKSYNC_DEFAULT_SUPPLIER";

/// Product → inventory synchronization settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncConfig {
    pub default_location: String,
    pub default_supplier: String,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            default_location: DEFAULT_LOCATION.to_string(),
            default_supplier: DEFAULT_SUPPLIER.to_string(),
        }
    }
}

impl SyncConfig {
    /// Read overrides from the environment, falling back to the defaults.
    ///
    /// Blank values are treated as unset.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let read = |key: &str, fallback: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| fallback.to_string())
        };

        Self {
            default_location: read(ENV_DEFAULT_LOCATION, DEFAULT_LOCATION),
            default_supplier: read(ENV_DEFAULT_SUPPLIER, DEFAULT_SUPPLIER),
        }
    }

    pub fn with_default_location(mut self, location: impl Into<String>) -> Self {
        self.default_location = location.into();
        self
    }

    pub fn with_default_supplier(mut self, supplier: impl Into<String>) -> Self {
        self.default_supplier = supplier.into();
        self
    }
}
