//! `slabtrack-core` — domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns):
//! strongly-typed identifiers, the domain error model, and the injected
//! time/identifier ports the rest of the workspace builds on.

pub mod error;
pub mod id;
pub mod ports;

pub use error::DomainError;
pub use id::{AuditEntryId, BatchId, RecordId};
pub use ports::{Clock, FixedClock, IdSource, SequenceSource, SystemClock, UuidSource};
