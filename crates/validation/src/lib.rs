//! `slabtrack-validation` — the business-rule validation engine.
//!
//! Checks a single field or a whole record against a [`BusinessRuleSet`]
//! and reports coded errors (which block persistence) and warnings (which
//! do not). The engine never mutates anything.
//!
//! [`BusinessRuleSet`]: slabtrack_domain::BusinessRuleSet

pub mod engine;
pub mod report;

pub use engine::ValidationEngine;
pub use report::{ValidationCode, ValidationIssue, ValidationReport};
