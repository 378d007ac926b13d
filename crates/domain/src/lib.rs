//! `slabtrack-domain` — the inventory record model.
//!
//! Pure data: the record struct, its closed status/kind enumerations, the
//! field catalogue, and the externally-configured business rule set. No
//! behavior beyond small accessors; validation and workflow live in their
//! own crates.

pub mod field;
pub mod record;
pub mod rules;
pub mod status;

pub use field::RecordField;
pub use record::{InventoryRecord, SlabKind};
pub use rules::BusinessRuleSet;
pub use status::SlabStatus;
