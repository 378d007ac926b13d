//! Record search filters.

use serde::{Deserialize, Serialize};

use slabtrack_domain::{InventoryRecord, SlabKind, SlabStatus};

/// Array-valued filter dimensions, all intersected. An empty/absent
/// dimension matches everything.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordFilter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub statuses: Option<Vec<SlabStatus>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kinds: Option<Vec<SlabKind>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub materials: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suppliers: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locations: Option<Vec<String>>,
}

impl RecordFilter {
    pub fn matches(&self, record: &InventoryRecord) -> bool {
        if let Some(statuses) = &self.statuses {
            if !statuses.is_empty() && !statuses.contains(&record.status) {
                return false;
            }
        }
        if let Some(kinds) = &self.kinds {
            if !kinds.is_empty() && !kinds.contains(&record.kind) {
                return false;
            }
        }
        if !matches_text_set(&self.materials, Some(&record.material)) {
            return false;
        }
        if !matches_text_set(&self.suppliers, Some(&record.supplier)) {
            return false;
        }
        if !matches_text_set(&self.locations, record.location.as_deref()) {
            return false;
        }
        true
    }
}

fn matches_text_set(wanted: &Option<Vec<String>>, actual: Option<&str>) -> bool {
    let Some(wanted) = wanted else { return true };
    if wanted.is_empty() {
        return true;
    }
    let Some(actual) = actual else { return false };
    wanted.iter().any(|w| w.eq_ignore_ascii_case(actual))
}
