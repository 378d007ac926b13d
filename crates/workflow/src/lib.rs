//! `slabtrack-workflow` — the lifecycle state machine.
//!
//! Two deliberately separate views of the same status set:
//!
//! - the **transition graph** (`valid_next_statuses`, `validate_transition`)
//!   decides whether a move is legal and whether it needs accompanying data;
//! - the **progress line** (`workflow_steps`, `step_index`, `progress`) is a
//!   linear ordering used only to render a progress indicator.
//!
//! The progress line must never be consulted for legality.

pub mod meta;
pub mod transition;

pub use meta::{status_meta, StatusMeta};
pub use transition::{
    progress, step_index, valid_next_statuses, validate_transition, workflow_steps,
    TransitionData, WorkflowError,
};
