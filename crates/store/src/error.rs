//! Store error model and bulk result bookkeeping.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use slabtrack_core::RecordId;
use slabtrack_workflow::WorkflowError;

use crate::storage::StorageError;

/// Result type for every public store operation. The error side carries a
/// human-readable message; no panic crosses the store boundary.
pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("record {0} not found")]
    NotFound(RecordId),

    /// Validation errors block the write. Warnings never surface here.
    #[error("validation failed: {0}")]
    Validation(String),

    #[error(transparent)]
    Workflow(#[from] WorkflowError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("snapshot rejected: {0}")]
    Snapshot(String),
}

/// Outcome of a bulk operation. Items are processed independently and
/// sequentially; one failure never aborts the rest, and nothing is rolled
/// back.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkResult {
    pub processed_count: usize,
    pub failed_count: usize,
    pub errors: Vec<String>,
}

impl BulkResult {
    pub fn succeeded(&mut self) {
        self.processed_count += 1;
    }

    pub fn failed(&mut self, message: impl Into<String>) {
        self.failed_count += 1;
        self.errors.push(message.into());
    }
}
