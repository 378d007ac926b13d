//! The validation engine proper.

use std::sync::Arc;

use slabtrack_core::{Clock, RecordId};
use slabtrack_domain::{BusinessRuleSet, InventoryRecord, RecordField, SlabStatus};

use crate::report::{ValidationCode, ValidationReport};

/// Warn when a slab costs more than this.
const HIGH_COST_THRESHOLD: f64 = 50_000.0;

const SERIAL_MIN_LEN: usize = 3;
const SERIAL_MAX_LEN: usize = 20;

/// Validates records against a [`BusinessRuleSet`].
///
/// Holds only a clock (for future-date checks); the rule set is passed per
/// call so re-validation after a configuration change needs no new engine.
pub struct ValidationEngine {
    clock: Arc<dyn Clock>,
}

impl ValidationEngine {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self { clock }
    }

    /// Validate a single field, using the rest of `record` for cross-field
    /// checks (consumed date vs received date).
    pub fn validate_field(
        &self,
        field: RecordField,
        record: &InventoryRecord,
        rules: &BusinessRuleSet,
    ) -> ValidationReport {
        let mut report = ValidationReport::new();
        match field {
            RecordField::SerialNumber => self.check_serial(record, rules, &mut report),
            RecordField::Material => {
                if record.material.trim().is_empty() {
                    report.error(
                        RecordField::Material,
                        ValidationCode::RequiredField,
                        "material is required",
                    );
                }
            }
            RecordField::Supplier => {
                if record.supplier.trim().is_empty() {
                    report.error(
                        RecordField::Supplier,
                        ValidationCode::RequiredField,
                        "supplier is required",
                    );
                }
            }
            RecordField::Thickness => self.check_dimension(
                RecordField::Thickness,
                record.thickness,
                rules.min_thickness,
                rules.max_thickness,
                Hardness::Error,
                &mut report,
            ),
            RecordField::Length => self.check_dimension(
                RecordField::Length,
                record.length,
                rules.min_length,
                rules.max_length,
                Hardness::Warning,
                &mut report,
            ),
            RecordField::Width => self.check_dimension(
                RecordField::Width,
                record.width,
                rules.min_width,
                rules.max_width,
                Hardness::Warning,
                &mut report,
            ),
            RecordField::Cost => self.check_cost(record, rules, &mut report),
            RecordField::ReceivedDate => self.check_received_date(record, &mut report),
            RecordField::ConsumedDate => self.check_consumed_date(record, &mut report),
            // No per-field rules for the remaining fields.
            _ => {}
        }
        report
    }

    /// Full-record validation: every per-field check plus the record-level
    /// status-implies-data checks.
    pub fn validate_record(
        &self,
        record: &InventoryRecord,
        rules: &BusinessRuleSet,
    ) -> ValidationReport {
        let mut report = ValidationReport::new();
        for field in RecordField::ALL {
            report.merge(self.validate_field(field, record, rules));
        }

        match record.status {
            SlabStatus::Consumed if record.consumed_date.is_none() => {
                report.warning(
                    RecordField::ConsumedDate,
                    ValidationCode::MissingData,
                    "record is consumed but has no consumed date",
                );
            }
            SlabStatus::Allocated
                if record
                    .job_reference
                    .as_deref()
                    .is_none_or(|j| j.trim().is_empty()) =>
            {
                report.warning(
                    RecordField::JobReference,
                    ValidationCode::MissingData,
                    "record is allocated but has no job reference",
                );
            }
            SlabStatus::Received if record.received_date.is_none() => {
                report.warning(
                    RecordField::ReceivedDate,
                    ValidationCode::MissingData,
                    "record is received but has no received date",
                );
            }
            _ => {}
        }

        report
    }

    /// Flag `serial` as a duplicate unless it belongs to `exclude_id`.
    ///
    /// `records` is the live (non-deleted) record set; the store supplies it.
    pub fn validate_unique_serial_number(
        &self,
        serial: &str,
        exclude_id: Option<RecordId>,
        records: &[InventoryRecord],
    ) -> ValidationReport {
        let mut report = ValidationReport::new();
        let serial = serial.trim();
        if serial.is_empty() {
            return report;
        }

        let duplicate = records.iter().any(|r| {
            Some(r.id) != exclude_id && r.serial_number.eq_ignore_ascii_case(serial)
        });
        if duplicate {
            report.error(
                RecordField::SerialNumber,
                ValidationCode::DuplicateValue,
                format!("serial number '{serial}' is already in use"),
            );
        }
        report
    }

    /// The numeric-bounds subset only. Used to re-check existing records
    /// after the rule set changes.
    pub fn validate_business_rule_compliance(
        &self,
        record: &InventoryRecord,
        rules: &BusinessRuleSet,
    ) -> ValidationReport {
        let mut report = ValidationReport::new();
        for field in [RecordField::Thickness, RecordField::Length, RecordField::Width] {
            report.merge(self.validate_field(field, record, rules));
        }
        if let Some(cost) = record.cost {
            if cost < 0.0 && !rules.allow_negative_cost {
                report.error(
                    RecordField::Cost,
                    ValidationCode::NegativeValue,
                    "negative cost is not permitted by the current rules",
                );
            }
        }
        report
    }

    fn check_serial(
        &self,
        record: &InventoryRecord,
        rules: &BusinessRuleSet,
        report: &mut ValidationReport,
    ) {
        let serial = record.serial_number.trim();
        if serial.is_empty() {
            if rules.require_serial_number {
                report.error(
                    RecordField::SerialNumber,
                    ValidationCode::RequiredField,
                    "serial number is required",
                );
            }
            return;
        }

        let well_formed = serial.len() >= SERIAL_MIN_LEN
            && serial.len() <= SERIAL_MAX_LEN
            && serial.chars().all(|c| c.is_ascii_alphanumeric() || c == '-');
        if !well_formed {
            report.error(
                RecordField::SerialNumber,
                ValidationCode::InvalidFormat,
                format!(
                    "serial number must be {SERIAL_MIN_LEN}-{SERIAL_MAX_LEN} letters, digits or hyphens"
                ),
            );
        }
    }

    fn check_dimension(
        &self,
        field: RecordField,
        value: f64,
        min: f64,
        max: f64,
        hardness: Hardness,
        report: &mut ValidationReport,
    ) {
        // Non-numeric or non-positive dimensions are always errors,
        // regardless of how the bounds themselves are enforced.
        if !value.is_finite() || value <= 0.0 {
            report.error(
                field,
                ValidationCode::MinValue,
                format!("{} must be a positive number", field.display_name()),
            );
            return;
        }

        if value < min {
            let message = format!(
                "{} {value} is below the minimum of {min}",
                field.display_name()
            );
            match hardness {
                Hardness::Error => report.error(field, ValidationCode::MinValue, message),
                Hardness::Warning => report.warning(field, ValidationCode::MinValue, message),
            }
        } else if value > max {
            let message = format!(
                "{} {value} is above the maximum of {max}",
                field.display_name()
            );
            match hardness {
                Hardness::Error => report.error(field, ValidationCode::MaxValue, message),
                Hardness::Warning => report.warning(field, ValidationCode::MaxValue, message),
            }
        }
    }

    fn check_cost(
        &self,
        record: &InventoryRecord,
        rules: &BusinessRuleSet,
        report: &mut ValidationReport,
    ) {
        let Some(cost) = record.cost else { return };
        if !cost.is_finite() {
            report.error(
                RecordField::Cost,
                ValidationCode::InvalidFormat,
                "cost must be a number",
            );
            return;
        }
        if cost < 0.0 {
            if !rules.allow_negative_cost {
                report.error(
                    RecordField::Cost,
                    ValidationCode::NegativeValue,
                    "negative cost is not permitted by the current rules",
                );
            }
            return;
        }
        if cost == 0.0 {
            report.warning(
                RecordField::Cost,
                ValidationCode::ZeroValue,
                "cost is zero",
            );
        } else if cost > HIGH_COST_THRESHOLD {
            report.warning(
                RecordField::Cost,
                ValidationCode::HighValue,
                format!("cost {cost} is unusually high (over {HIGH_COST_THRESHOLD})"),
            );
        }
    }

    fn check_received_date(&self, record: &InventoryRecord, report: &mut ValidationReport) {
        let Some(received) = record.received_date else {
            return;
        };
        let today = self.clock.now().date_naive();
        if received > today {
            report.error(
                RecordField::ReceivedDate,
                ValidationCode::FutureDate,
                "received date cannot be in the future",
            );
        }
    }

    fn check_consumed_date(&self, record: &InventoryRecord, report: &mut ValidationReport) {
        if let (Some(consumed), Some(received)) = (record.consumed_date, record.received_date) {
            if consumed < received {
                report.error(
                    RecordField::ConsumedDate,
                    ValidationCode::InvalidDateOrder,
                    "consumed date cannot be earlier than received date",
                );
            }
        }
    }
}

#[derive(Copy, Clone)]
enum Hardness {
    Error,
    Warning,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use proptest::prelude::*;
    use slabtrack_core::FixedClock;
    use slabtrack_domain::SlabKind;

    fn engine() -> ValidationEngine {
        ValidationEngine::new(Arc::new(FixedClock::at_epoch()))
    }

    fn record() -> InventoryRecord {
        let now = FixedClock::at_epoch().now();
        InventoryRecord {
            id: RecordId::new(),
            serial_number: "SLB-100".to_string(),
            material: "Granite".to_string(),
            color: "Black".to_string(),
            thickness: 30.0,
            length: 2800.0,
            width: 1600.0,
            supplier: "Northern Quarries".to_string(),
            status: SlabStatus::Stock,
            kind: SlabKind::FullSlab,
            job_reference: None,
            received_date: None,
            consumed_date: None,
            cost: Some(950.0),
            notes: None,
            location: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn thickness_below_minimum_is_an_error_with_min_value_code() {
        let rules = BusinessRuleSet {
            min_thickness: 10.0,
            ..BusinessRuleSet::default()
        };
        let mut r = record();
        r.thickness = 5.0;

        let report = engine().validate_record(&r, &rules);
        assert!(!report.is_valid());
        assert_eq!(report.errors.len(), 1);
        assert_eq!(report.errors[0].field, RecordField::Thickness);
        assert_eq!(report.errors[0].code, ValidationCode::MinValue);
    }

    #[test]
    fn length_outside_bounds_is_only_a_warning() {
        let rules = BusinessRuleSet::default();
        let mut r = record();
        r.length = rules.max_length + 500.0;

        let report = engine().validate_record(&r, &rules);
        assert!(report.is_valid());
        assert!(report
            .warnings
            .iter()
            .any(|w| w.field == RecordField::Length && w.code == ValidationCode::MaxValue));
    }

    #[test]
    fn non_positive_dimension_is_always_an_error() {
        let mut r = record();
        r.width = 0.0;
        let report = engine().validate_record(&r, &BusinessRuleSet::default());
        assert!(report
            .errors
            .iter()
            .any(|e| e.field == RecordField::Width && e.code == ValidationCode::MinValue));
    }

    #[test]
    fn consumed_before_received_is_invalid_date_order() {
        let mut r = record();
        r.received_date = NaiveDate::from_ymd_opt(2023, 6, 10);
        r.consumed_date = NaiveDate::from_ymd_opt(2023, 6, 1);

        let report = engine().validate_record(&r, &BusinessRuleSet::default());
        assert!(report
            .errors
            .iter()
            .any(|e| e.code == ValidationCode::InvalidDateOrder
                && e.field == RecordField::ConsumedDate));
    }

    #[test]
    fn future_received_date_is_an_error() {
        let mut r = record();
        // Engine clock is pinned to 2024-01-01.
        r.received_date = NaiveDate::from_ymd_opt(2024, 6, 1);

        let report = engine().validate_record(&r, &BusinessRuleSet::default());
        assert!(report
            .errors
            .iter()
            .any(|e| e.code == ValidationCode::FutureDate));
    }

    #[test]
    fn missing_serial_is_error_only_when_required() {
        let mut r = record();
        r.serial_number = String::new();

        let strict = BusinessRuleSet::default();
        assert!(!engine().validate_record(&r, &strict).is_valid());

        let lax = BusinessRuleSet {
            require_serial_number: false,
            ..BusinessRuleSet::default()
        };
        assert!(engine().validate_record(&r, &lax).is_valid());
    }

    #[test]
    fn serial_with_illegal_characters_is_rejected() {
        let mut r = record();
        r.serial_number = "SLB 100!".to_string();
        let report = engine().validate_record(&r, &BusinessRuleSet::default());
        assert!(report
            .errors
            .iter()
            .any(|e| e.code == ValidationCode::InvalidFormat));
    }

    #[test]
    fn negative_cost_follows_the_rule_flag() {
        let mut r = record();
        r.cost = Some(-10.0);

        let strict = BusinessRuleSet::default();
        let report = engine().validate_record(&r, &strict);
        assert!(report
            .errors
            .iter()
            .any(|e| e.code == ValidationCode::NegativeValue));

        let lax = BusinessRuleSet {
            allow_negative_cost: true,
            ..BusinessRuleSet::default()
        };
        assert!(engine().validate_record(&r, &lax).is_valid());
    }

    #[test]
    fn zero_and_high_cost_are_warnings_never_errors() {
        let mut r = record();

        r.cost = Some(0.0);
        let report = engine().validate_record(&r, &BusinessRuleSet::default());
        assert!(report.is_valid());
        assert!(report.warnings.iter().any(|w| w.code == ValidationCode::ZeroValue));

        r.cost = Some(99_999.0);
        let report = engine().validate_record(&r, &BusinessRuleSet::default());
        assert!(report.is_valid());
        assert!(report.warnings.iter().any(|w| w.code == ValidationCode::HighValue));
    }

    #[test]
    fn consumed_status_without_date_warns() {
        let mut r = record();
        r.status = SlabStatus::Consumed;
        let report = engine().validate_record(&r, &BusinessRuleSet::default());
        assert!(report
            .warnings
            .iter()
            .any(|w| w.field == RecordField::ConsumedDate && w.code == ValidationCode::MissingData));
    }

    #[test]
    fn allocated_status_without_job_reference_warns() {
        let mut r = record();
        r.status = SlabStatus::Allocated;
        let report = engine().validate_record(&r, &BusinessRuleSet::default());
        assert!(report
            .warnings
            .iter()
            .any(|w| w.field == RecordField::JobReference));
    }

    #[test]
    fn duplicate_serial_is_flagged_unless_it_is_the_record_itself() {
        let existing = record();
        let records = vec![existing.clone()];

        let report =
            engine().validate_unique_serial_number("slb-100", None, &records);
        assert!(!report.is_valid());
        assert_eq!(report.errors[0].code, ValidationCode::DuplicateValue);

        let report =
            engine().validate_unique_serial_number("SLB-100", Some(existing.id), &records);
        assert!(report.is_valid());
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        /// Property: any thickness inside the configured hard bounds never
        /// produces a thickness error.
        #[test]
        fn in_bounds_thickness_never_errors(thickness in 10.0f64..=100.0f64) {
            let mut r = record();
            r.thickness = thickness;
            let report = engine().validate_record(&r, &BusinessRuleSet::default());
            prop_assert!(report.errors.iter().all(|e| e.field != RecordField::Thickness));
        }
    }
}
