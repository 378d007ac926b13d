//! Audit log querying.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use slabtrack_core::RecordId;
use slabtrack_domain::RecordField;

use crate::entry::{AuditAction, AuditEntry};

/// Optional filters, all intersected.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditQuery {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub record_id: Option<RecordId>,
    /// Match any of these action kinds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actions: Option<Vec<AuditAction>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<DateTime<Utc>>,
    /// Case-insensitive substring match on the actor.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actor: Option<String>,
    /// Only entries touching this field.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<RecordField>,
}

impl AuditQuery {
    pub fn matches(&self, entry: &AuditEntry) -> bool {
        if let Some(record_id) = self.record_id {
            if entry.record_id != record_id {
                return false;
            }
        }
        if let Some(actions) = &self.actions {
            if !actions.contains(&entry.action) {
                return false;
            }
        }
        if let Some(from) = self.from {
            if entry.timestamp < from {
                return false;
            }
        }
        if let Some(to) = self.to {
            if entry.timestamp > to {
                return false;
            }
        }
        if let Some(actor) = &self.actor {
            let matched = entry
                .actor
                .as_deref()
                .is_some_and(|a| a.to_lowercase().contains(&actor.to_lowercase()));
            if !matched {
                return false;
            }
        }
        if let Some(field) = self.field {
            if !entry.changes.iter().any(|c| c.field == field) {
                return false;
            }
        }
        true
    }
}

/// One page of query results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditPage {
    pub entries: Vec<AuditEntry>,
    /// Total matches across all pages.
    pub total: usize,
    /// One-based page number.
    pub page: usize,
    pub page_size: usize,
}
