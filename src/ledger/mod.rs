//! Append-only record of fresh computations.
//!
//! One [`WorkflowRecord`] is appended per model invocation that produced a
//! response. Cache hits never reach the ledger. Writes are best-effort: a
//! failure surfaces as [`SubsystemError::LedgerUnavailable`] and the request
//! still succeeds.
//!
//! Author: kelexine (<https://github.com/kelexine>)

mod jsonl;
mod memory;

pub use jsonl::JsonlLedger;
pub use memory::InMemoryLedger;

use crate::error::SubsystemError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One completed computation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowRecord {
    pub id: Uuid,
    pub prompt: String,
    pub result: String,
    pub model_name: String,
    pub cache_key: String,
    pub created_at: DateTime<Utc>,
}

impl WorkflowRecord {
    pub fn new(
        prompt: impl Into<String>,
        result: impl Into<String>,
        model_name: impl Into<String>,
        cache_key: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            prompt: prompt.into(),
            result: result.into(),
            model_name: model_name.into(),
            cache_key: cache_key.into(),
            created_at: Utc::now(),
        }
    }
}

/// Durable append-only log of workflow records.
#[async_trait]
pub trait Ledger: Send + Sync {
    async fn append(&self, record: &WorkflowRecord) -> Result<(), SubsystemError>;

    /// Short backend name for health output.
    fn backend(&self) -> &'static str;
}
