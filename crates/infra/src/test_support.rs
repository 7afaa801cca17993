//! Shared test doubles: a recording inventory collaborator and a log capture.

use std::io;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tracing_subscriber::fmt::MakeWriter;

use stocksync_inventory::{InventoryPatch, InventoryRecord};

use crate::inventory::{InventoryService, InventoryServiceError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum InventoryCall {
    Create(InventoryRecord),
    Update(String, InventoryPatch),
    Delete(String),
}

/// Inventory double that records every call and can be told to fail.
#[derive(Debug, Default)]
pub(crate) struct RecordingInventory {
    calls: Mutex<Vec<InventoryCall>>,
    fail_with: Mutex<Option<InventoryServiceError>>,
}

impl RecordingInventory {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub(crate) fn failing(err: InventoryServiceError) -> Arc<Self> {
        let inv = Self::default();
        *inv.fail_with.lock().unwrap() = Some(err);
        Arc::new(inv)
    }

    pub(crate) fn calls(&self) -> Vec<InventoryCall> {
        self.calls.lock().unwrap().clone()
    }

    pub(crate) fn creates(&self) -> Vec<InventoryRecord> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                InventoryCall::Create(r) => Some(r),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: InventoryCall) -> Result<(), InventoryServiceError> {
        self.calls.lock().unwrap().push(call);
        match self.fail_with.lock().unwrap().clone() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl InventoryService for RecordingInventory {
    async fn create(&self, record: InventoryRecord) -> Result<InventoryRecord, InventoryServiceError> {
        self.record(InventoryCall::Create(record.clone()))?;
        Ok(record)
    }

    async fn update(&self, article_num: &str, patch: InventoryPatch) -> Result<InventoryRecord, InventoryServiceError> {
        self.record(InventoryCall::Update(article_num.to_string(), patch.clone()))?;
        Ok(InventoryRecord {
            article_num: article_num.to_string(),
            name: patch.name.unwrap_or_default(),
            quantity: 0,
            location: String::new(),
            supplier: patch.supplier.unwrap_or_default(),
        })
    }

    async fn delete(&self, article_num: &str) -> Result<bool, InventoryServiceError> {
        self.record(InventoryCall::Delete(article_num.to_string()))?;
        Ok(true)
    }

    async fn get(&self, _article_num: &str) -> Result<Option<InventoryRecord>, InventoryServiceError> {
        Ok(None)
    }
}

/// Inventory double whose every call panics, like a buggy client driver.
#[derive(Debug)]
pub(crate) struct PanickingInventory(pub(crate) &'static str);

#[async_trait]
impl InventoryService for PanickingInventory {
    async fn create(&self, _record: InventoryRecord) -> Result<InventoryRecord, InventoryServiceError> {
        panic!("{}", self.0)
    }

    async fn update(&self, _article_num: &str, _patch: InventoryPatch) -> Result<InventoryRecord, InventoryServiceError> {
        panic!("{}", self.0)
    }

    async fn delete(&self, _article_num: &str) -> Result<bool, InventoryServiceError> {
        panic!("{}", self.0)
    }

    async fn get(&self, _article_num: &str) -> Result<Option<InventoryRecord>, InventoryServiceError> {
        panic!("{}", self.0)
    }
}

/// Captures formatted log output for the current thread.
#[derive(Debug, Clone, Default)]
pub(crate) struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl CapturedLogs {
    /// Install as the thread-local default subscriber until the guard drops.
    ///
    /// Pair with a current-thread runtime so spawned tasks log into the same capture.
    pub(crate) fn install(&self) -> tracing::subscriber::DefaultGuard {
        let subscriber = tracing_subscriber::fmt()
            .with_writer(self.clone())
            .with_ansi(false)
            .with_max_level(tracing::Level::TRACE)
            .finish();
        tracing::subscriber::set_default(subscriber)
    }

    pub(crate) fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

pub(crate) struct CapturedWriter(Arc<Mutex<Vec<u8>>>);

impl io::Write for CapturedWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for CapturedLogs {
    type Writer = CapturedWriter;

    fn make_writer(&'a self) -> Self::Writer {
        CapturedWriter(Arc::clone(&self.0))
    }
}
