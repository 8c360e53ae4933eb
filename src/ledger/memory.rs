// In-memory workflow ledger
// Author: kelexine (https://github.com/kelexine)

use super::{Ledger, WorkflowRecord};
use crate::error::SubsystemError;
use async_trait::async_trait;
use parking_lot::RwLock;

/// Keeps records in process memory. Lost on restart.
#[derive(Default)]
pub struct InMemoryLedger {
    records: RwLock<Vec<WorkflowRecord>>,
}

impl InMemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every record appended so far, oldest first.
    pub fn records(&self) -> Vec<WorkflowRecord> {
        self.records.read().clone()
    }

    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }
}

#[async_trait]
impl Ledger for InMemoryLedger {
    async fn append(&self, record: &WorkflowRecord) -> Result<(), SubsystemError> {
        self.records.write().push(record.clone());
        Ok(())
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}
