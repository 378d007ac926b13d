//! The record field catalogue.
//!
//! Validation scopes issues to a field and the audit trail labels field
//! changes; both name fields through this enum so the machine name and the
//! display name stay in one place.

use serde::{Deserialize, Serialize};

/// One field of [`crate::InventoryRecord`], minus the identifier and the
/// bookkeeping timestamps (those never appear in validation or diffs).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RecordField {
    SerialNumber,
    Material,
    Color,
    Thickness,
    Length,
    Width,
    Supplier,
    Status,
    Kind,
    JobReference,
    ReceivedDate,
    ConsumedDate,
    Cost,
    Notes,
    Location,
}

impl RecordField {
    /// Every diffable/validatable field, in record declaration order.
    pub const ALL: [RecordField; 15] = [
        RecordField::SerialNumber,
        RecordField::Material,
        RecordField::Color,
        RecordField::Thickness,
        RecordField::Length,
        RecordField::Width,
        RecordField::Supplier,
        RecordField::Status,
        RecordField::Kind,
        RecordField::JobReference,
        RecordField::ReceivedDate,
        RecordField::ConsumedDate,
        RecordField::Cost,
        RecordField::Notes,
        RecordField::Location,
    ];

    /// Machine name, matching the record's serialized key.
    pub fn name(self) -> &'static str {
        match self {
            RecordField::SerialNumber => "serialNumber",
            RecordField::Material => "material",
            RecordField::Color => "color",
            RecordField::Thickness => "thickness",
            RecordField::Length => "length",
            RecordField::Width => "width",
            RecordField::Supplier => "supplier",
            RecordField::Status => "status",
            RecordField::Kind => "kind",
            RecordField::JobReference => "jobReference",
            RecordField::ReceivedDate => "receivedDate",
            RecordField::ConsumedDate => "consumedDate",
            RecordField::Cost => "cost",
            RecordField::Notes => "notes",
            RecordField::Location => "location",
        }
    }

    /// Human-facing label used on audit entries and exports.
    pub fn display_name(self) -> &'static str {
        match self {
            RecordField::SerialNumber => "Serial Number",
            RecordField::Material => "Material",
            RecordField::Color => "Color",
            RecordField::Thickness => "Thickness (mm)",
            RecordField::Length => "Length (mm)",
            RecordField::Width => "Width (mm)",
            RecordField::Supplier => "Supplier",
            RecordField::Status => "Status",
            RecordField::Kind => "Type",
            RecordField::JobReference => "Job Reference",
            RecordField::ReceivedDate => "Received Date",
            RecordField::ConsumedDate => "Consumed Date",
            RecordField::Cost => "Cost",
            RecordField::Notes => "Notes",
            RecordField::Location => "Location",
        }
    }
}

impl core::fmt::Display for RecordField {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}
