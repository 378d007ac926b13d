//! The inventory record: one tracked stone slab.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use slabtrack_core::RecordId;

use crate::status::SlabStatus;

/// Whether a record is a full slab or a kept-back offcut.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SlabKind {
    FullSlab,
    Remnant,
}

impl SlabKind {
    /// Stable machine name, matching the serialized form.
    pub fn as_str(self) -> &'static str {
        match self {
            SlabKind::FullSlab => "FULL_SLAB",
            SlabKind::Remnant => "REMNANT",
        }
    }
}

/// One inventory unit.
///
/// Serialized in camelCase because the persisted schema envelope and every
/// export surface use camelCase keys.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryRecord {
    pub id: RecordId,
    /// Human-facing serial; unique among non-deleted records when the rule
    /// set requires one.
    pub serial_number: String,
    pub material: String,
    pub color: String,
    /// Millimetres.
    pub thickness: f64,
    /// Millimetres.
    pub length: f64,
    /// Millimetres.
    pub width: f64,
    pub supplier: String,
    pub status: SlabStatus,
    pub kind: SlabKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_reference: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub received_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub consumed_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl InventoryRecord {
    /// Case-insensitive substring match across the free-text columns.
    pub fn matches_term(&self, term: &str) -> bool {
        let needle = term.to_lowercase();
        if needle.is_empty() {
            return true;
        }
        let mut haystacks: Vec<&str> = vec![
            &self.serial_number,
            &self.material,
            &self.color,
            &self.supplier,
        ];
        if let Some(location) = &self.location {
            haystacks.push(location);
        }
        if let Some(notes) = &self.notes {
            haystacks.push(notes);
        }
        haystacks
            .iter()
            .any(|h| h.to_lowercase().contains(&needle))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn sample() -> InventoryRecord {
        InventoryRecord {
            id: RecordId::new(),
            serial_number: "SLB-001".to_string(),
            material: "Carrara Marble".to_string(),
            color: "White".to_string(),
            thickness: 20.0,
            length: 3000.0,
            width: 1400.0,
            supplier: "Tuscan Stone Co".to_string(),
            status: SlabStatus::Stock,
            kind: SlabKind::FullSlab,
            job_reference: None,
            received_date: None,
            consumed_date: None,
            cost: Some(1200.0),
            notes: Some("hairline vein near edge".to_string()),
            location: Some("Rack A3".to_string()),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn matches_term_is_case_insensitive_across_fields() {
        let record = sample();
        assert!(record.matches_term("carrara"));
        assert!(record.matches_term("RACK a3"));
        assert!(record.matches_term("hairline"));
        assert!(!record.matches_term("granite"));
    }

    #[test]
    fn empty_term_matches_everything() {
        assert!(sample().matches_term(""));
    }

    #[test]
    fn record_serializes_with_camel_case_keys() {
        let json = serde_json::to_value(sample()).unwrap();
        assert!(json.get("serialNumber").is_some());
        assert!(json.get("createdAt").is_some());
        assert_eq!(json["status"], "STOCK");
        assert_eq!(json["kind"], "FULL_SLAB");
    }
}
