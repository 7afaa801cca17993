use std::collections::HashMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;

use stocksync_inventory::{InventoryPatch, InventoryRecord};

use super::{InventoryService, InventoryServiceError};

/// In-memory Inventory service for tests/dev.
#[derive(Debug, Default)]
pub struct InMemoryInventoryService {
    records: RwLock<HashMap<String, InventoryRecord>>,
}

impl InMemoryInventoryService {
    pub fn new() -> Self {
        Self::default()
    }

    // Every mutation is a single map operation, so a poisoned lock still guards a
    // consistent store.
    fn read(&self) -> RwLockReadGuard<'_, HashMap<String, InventoryRecord>> {
        self.records.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, InventoryRecord>> {
        self.records.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// All records, ordered by article number.
    pub fn list(&self) -> Vec<InventoryRecord> {
        let mut out: Vec<_> = self.read().values().cloned().collect();
        out.sort_by(|a, b| a.article_num.cmp(&b.article_num));
        out
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl InventoryService for InMemoryInventoryService {
    async fn create(&self, record: InventoryRecord) -> Result<InventoryRecord, InventoryServiceError> {
        record.validate()?;
        let mut map = self.write();
        if map.contains_key(&record.article_num) {
            return Err(InventoryServiceError::Conflict(format!(
                "article {} already exists",
                record.article_num
            )));
        }
        map.insert(record.article_num.clone(), record.clone());
        Ok(record)
    }

    async fn update(&self, article_num: &str, patch: InventoryPatch) -> Result<InventoryRecord, InventoryServiceError> {
        let mut map = self.write();
        let record = map
            .get_mut(article_num)
            .ok_or_else(|| InventoryServiceError::NotFound(article_num.to_string()))?;
        let mut updated = record.clone();
        patch.apply_to(&mut updated)?;
        *record = updated.clone();
        Ok(updated)
    }

    async fn delete(&self, article_num: &str) -> Result<bool, InventoryServiceError> {
        let mut map = self.write();
        Ok(map.remove(article_num).is_some())
    }

    async fn get(&self, article_num: &str) -> Result<Option<InventoryRecord>, InventoryServiceError> {
        let map = self.read();
        Ok(map.get(article_num).cloned())
    }
}
