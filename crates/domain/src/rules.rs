//! Externally-configured business rules.
//!
//! Supplied by the configuration collaborator and consulted, never mutated,
//! by the validation engine and the record store.

use serde::{Deserialize, Serialize};

use crate::status::SlabStatus;

/// Numeric bounds and policy flags validation is checked against.
///
/// Thickness bounds are hard constraints (errors); length/width bounds are
/// business guidance (warnings). All dimensions in millimetres.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BusinessRuleSet {
    pub min_thickness: f64,
    pub max_thickness: f64,
    pub min_length: f64,
    pub max_length: f64,
    pub min_width: f64,
    pub max_width: f64,
    pub require_serial_number: bool,
    pub allow_negative_cost: bool,
    pub auto_generate_serial_number: bool,
    pub default_status: SlabStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_location: Option<String>,
}

impl Default for BusinessRuleSet {
    fn default() -> Self {
        Self {
            min_thickness: 10.0,
            max_thickness: 100.0,
            min_length: 500.0,
            max_length: 4000.0,
            min_width: 300.0,
            max_width: 2200.0,
            require_serial_number: true,
            allow_negative_cost: false,
            auto_generate_serial_number: true,
            default_status: SlabStatus::Stock,
            default_location: None,
        }
    }
}
