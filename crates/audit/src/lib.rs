//! `slabtrack-audit` — the append-only audit trail.
//!
//! Every accepted mutation in the record store produces one immutable
//! [`AuditEntry`] holding rendered before/after values, so the log stays
//! readable without re-joining to live records. Entries are keyed by record
//! id and capped per record; eviction drops only that record's oldest
//! entries.
//!
//! Audit writes are auxiliary: a failed write is logged and swallowed, never
//! propagated into the mutation that triggered it.

pub mod diff;
pub mod entry;
pub mod query;
pub mod trail;

pub use diff::diff_records;
pub use entry::{AuditAction, AuditEntry, FieldChange};
pub use query::{AuditPage, AuditQuery};
pub use trail::{AuditSummary, AuditTrail, DEFAULT_RETENTION_CAP};
