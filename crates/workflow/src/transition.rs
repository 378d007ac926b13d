//! The transition graph and its guard.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use slabtrack_domain::{InventoryRecord, SlabStatus};

/// A transition was rejected. No state is changed on rejection.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum WorkflowError {
    #[error("cannot move from {from} to {to}")]
    IllegalTransition { from: SlabStatus, to: SlabStatus },

    #[error("moving to {status} requires a received date")]
    MissingReceivedDate { status: SlabStatus },

    #[error("moving to {status} requires a consumed date")]
    MissingConsumedDate { status: SlabStatus },
}

/// Extra data accompanying a transition request. Some target statuses
/// require a date that may not yet be on the record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransitionData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub received_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub consumed_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_reference: Option<String>,
}

/// Statuses reachable in one move from `current`. Empty means terminal.
pub fn valid_next_statuses(current: SlabStatus) -> &'static [SlabStatus] {
    match current {
        SlabStatus::Wanted => &[SlabStatus::Ordered],
        SlabStatus::Ordered => &[SlabStatus::Received, SlabStatus::Wanted],
        SlabStatus::Received => &[SlabStatus::Stock, SlabStatus::Allocated],
        SlabStatus::Stock => &[
            SlabStatus::Allocated,
            SlabStatus::Consumed,
            SlabStatus::Remnant,
        ],
        SlabStatus::Allocated => &[SlabStatus::Consumed, SlabStatus::Stock],
        SlabStatus::Remnant => &[SlabStatus::Allocated, SlabStatus::Consumed],
        // Terminal.
        SlabStatus::Consumed => &[],
    }
}

/// Check that `target` is reachable from the record's current status and
/// that any data the target requires is present, either already on the
/// record or in `data`. Never mutates the record.
pub fn validate_transition(
    record: &InventoryRecord,
    target: SlabStatus,
    data: &TransitionData,
) -> Result<(), WorkflowError> {
    if !valid_next_statuses(record.status).contains(&target) {
        return Err(WorkflowError::IllegalTransition {
            from: record.status,
            to: target,
        });
    }

    match target {
        SlabStatus::Received => {
            if record.received_date.is_none() && data.received_date.is_none() {
                return Err(WorkflowError::MissingReceivedDate { status: target });
            }
        }
        SlabStatus::Consumed => {
            if record.consumed_date.is_none() && data.consumed_date.is_none() {
                return Err(WorkflowError::MissingConsumedDate { status: target });
            }
        }
        _ => {}
    }

    Ok(())
}

/// The forward statuses, in display order. Remnant sits off this line.
pub fn workflow_steps() -> &'static [SlabStatus] {
    &[
        SlabStatus::Wanted,
        SlabStatus::Ordered,
        SlabStatus::Received,
        SlabStatus::Stock,
        SlabStatus::Allocated,
        SlabStatus::Consumed,
    ]
}

/// Zero-based position of `status` on the progress line, if it is on it.
pub fn step_index(status: SlabStatus) -> Option<usize> {
    workflow_steps().iter().position(|s| *s == status)
}

/// Fraction of the progress line completed, in `0.0..=1.0`.
///
/// Off-line statuses (Remnant) report the same progress as Stock, which is
/// where a remnant effectively lives.
pub fn progress(status: SlabStatus) -> f64 {
    let steps = workflow_steps();
    let index = step_index(status)
        .or_else(|| step_index(SlabStatus::Stock))
        .unwrap_or(0);
    index as f64 / (steps.len() - 1) as f64
}
