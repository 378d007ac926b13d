//! Audit entry types. Immutable once created.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use slabtrack_core::{AuditEntryId, BatchId, RecordId};
use slabtrack_domain::RecordField;

/// What kind of mutation an entry describes.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuditAction {
    Create,
    Update,
    StatusChange,
    Delete,
    BulkUpdate,
    Note,
}

impl AuditAction {
    pub fn as_str(self) -> &'static str {
        match self {
            AuditAction::Create => "CREATE",
            AuditAction::Update => "UPDATE",
            AuditAction::StatusChange => "STATUS_CHANGE",
            AuditAction::Delete => "DELETE",
            AuditAction::BulkUpdate => "BULK_UPDATE",
            AuditAction::Note => "NOTE",
        }
    }
}

impl core::fmt::Display for AuditAction {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One field's before/after pair, already rendered for display.
///
/// Values are stored as strings (dates ISO, absent values as an em-dash) so
/// the log is self-contained and readable without the live record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldChange {
    pub field: RecordField,
    pub old_value: String,
    pub new_value: String,
}

impl FieldChange {
    pub fn new(field: RecordField, old_value: impl Into<String>, new_value: impl Into<String>) -> Self {
        Self {
            field,
            old_value: old_value.into(),
            new_value: new_value.into(),
        }
    }

    pub fn display_name(&self) -> &'static str {
        self.field.display_name()
    }
}

/// One immutable log line describing a single accepted mutation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditEntry {
    pub id: AuditEntryId,
    pub record_id: RecordId,
    pub action: AuditAction,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actor: Option<String>,
    pub changes: Vec<FieldChange>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    /// Shared across every entry produced by one bulk operation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub batch_id: Option<BatchId>,
}
