// JSON-lines file ledger
// Author: kelexine (https://github.com/kelexine)

use super::{Ledger, WorkflowRecord};
use crate::error::SubsystemError;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tracing::debug;

/// Appends one JSON object per line to a file.
///
/// Appends are serialized through a mutex so concurrent writers never
/// interleave partial lines.
pub struct JsonlLedger {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonlLedger {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read every record back, skipping lines that fail to parse.
    pub async fn read_all(&self) -> Result<Vec<WorkflowRecord>, SubsystemError> {
        let contents = match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(unavailable(&self.path, e)),
        };

        Ok(contents
            .lines()
            .filter(|line| !line.trim().is_empty())
            .filter_map(|line| serde_json::from_str(line).ok())
            .collect())
    }
}

fn unavailable(path: &Path, err: impl std::fmt::Display) -> SubsystemError {
    SubsystemError::LedgerUnavailable(format!("{}: {}", path.display(), err))
}

#[async_trait]
impl Ledger for JsonlLedger {
    async fn append(&self, record: &WorkflowRecord) -> Result<(), SubsystemError> {
        let mut line = serde_json::to_string(record).map_err(|e| unavailable(&self.path, e))?;
        line.push('\n');

        let _guard = self.write_lock.lock().await;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| unavailable(&self.path, e))?;
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await
            .map_err(|e| unavailable(&self.path, e))?;

        file.write_all(line.as_bytes())
            .await
            .map_err(|e| unavailable(&self.path, e))?;
        file.flush().await.map_err(|e| unavailable(&self.path, e))?;

        debug!("Appended workflow record {} to {}", record.id, self.path.display());
        Ok(())
    }

    fn backend(&self) -> &'static str {
        "jsonl"
    }
}
