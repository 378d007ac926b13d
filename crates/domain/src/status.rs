//! The closed lifecycle status enumeration.
//!
//! One canonical vocabulary: the seven-stage slab lifecycle. The transition
//! graph and per-status display metadata live in `slabtrack-workflow`; this
//! crate only defines the set itself so records can carry a status without
//! depending on workflow rules.

use serde::{Deserialize, Serialize};

/// Lifecycle stage of an inventory record.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SlabStatus {
    /// Identified as needed, not yet ordered.
    Wanted,
    /// Ordered from the supplier, awaiting delivery.
    Ordered,
    /// Delivered and checked in (carries a received date).
    Received,
    /// In stock and available.
    Stock,
    /// Reserved against a job.
    Allocated,
    /// Used up. Terminal.
    Consumed,
    /// A leftover piece large enough to keep.
    Remnant,
}

impl SlabStatus {
    /// Every status, in lifecycle order (Remnant last, off the main line).
    pub const ALL: [SlabStatus; 7] = [
        SlabStatus::Wanted,
        SlabStatus::Ordered,
        SlabStatus::Received,
        SlabStatus::Stock,
        SlabStatus::Allocated,
        SlabStatus::Consumed,
        SlabStatus::Remnant,
    ];

    /// Whether a record in this status counts toward on-hand stock.
    pub fn is_in_stock(self) -> bool {
        matches!(
            self,
            SlabStatus::Received | SlabStatus::Stock | SlabStatus::Remnant
        )
    }

    /// Stable machine name, matching the serialized form.
    pub fn as_str(self) -> &'static str {
        match self {
            SlabStatus::Wanted => "WANTED",
            SlabStatus::Ordered => "ORDERED",
            SlabStatus::Received => "RECEIVED",
            SlabStatus::Stock => "STOCK",
            SlabStatus::Allocated => "ALLOCATED",
            SlabStatus::Consumed => "CONSUMED",
            SlabStatus::Remnant => "REMNANT",
        }
    }
}

impl core::fmt::Display for SlabStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}
