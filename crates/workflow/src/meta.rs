//! Per-status display metadata.

use serde::{Deserialize, Serialize};

use slabtrack_domain::SlabStatus;

/// Display and safety metadata for one status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusMeta {
    pub label: &'static str,
    pub description: &'static str,
    /// Theme color token, not a literal color value.
    pub color: &'static str,
    /// Transitioning into this status should prompt the user first.
    pub requires_confirmation: bool,
    /// Transitioning into this status is irreversible.
    pub is_destructive: bool,
}

/// Metadata for `status`.
pub fn status_meta(status: SlabStatus) -> StatusMeta {
    match status {
        SlabStatus::Wanted => StatusMeta {
            label: "Wanted",
            description: "Identified as needed, not yet ordered",
            color: "slate",
            requires_confirmation: false,
            is_destructive: false,
        },
        SlabStatus::Ordered => StatusMeta {
            label: "Ordered",
            description: "On order with the supplier",
            color: "blue",
            requires_confirmation: false,
            is_destructive: false,
        },
        SlabStatus::Received => StatusMeta {
            label: "Received",
            description: "Delivered and checked in",
            color: "teal",
            requires_confirmation: false,
            is_destructive: false,
        },
        SlabStatus::Stock => StatusMeta {
            label: "In Stock",
            description: "Available in the yard",
            color: "green",
            requires_confirmation: false,
            is_destructive: false,
        },
        SlabStatus::Allocated => StatusMeta {
            label: "Allocated",
            description: "Reserved against a job",
            color: "amber",
            requires_confirmation: true,
            is_destructive: false,
        },
        SlabStatus::Consumed => StatusMeta {
            label: "Consumed",
            description: "Used up; end of lifecycle",
            color: "red",
            requires_confirmation: true,
            is_destructive: true,
        },
        SlabStatus::Remnant => StatusMeta {
            label: "Remnant",
            description: "Leftover piece kept in stock",
            color: "purple",
            requires_confirmation: false,
            is_destructive: false,
        },
    }
}
