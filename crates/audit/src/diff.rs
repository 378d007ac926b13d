//! Field-level diffing with explicit per-type comparators.
//!
//! Each field is compared by its own type (dates by value, numbers by
//! value, options by presence-then-value) rather than by serializing both
//! records, so incidental formatting differences never produce phantom
//! changes.

use chrono::NaiveDate;

use slabtrack_domain::{InventoryRecord, RecordField, SlabKind, SlabStatus};

use crate::entry::FieldChange;

/// Placeholder for an absent value in rendered output.
pub const ABSENT: &str = "\u{2014}";

/// Compare two record snapshots field by field. Equal fields emit nothing;
/// a record diffed against itself yields an empty vector.
pub fn diff_records(old: &InventoryRecord, new: &InventoryRecord) -> Vec<FieldChange> {
    let mut changes = Vec::new();

    diff_str(RecordField::SerialNumber, &old.serial_number, &new.serial_number, &mut changes);
    diff_str(RecordField::Material, &old.material, &new.material, &mut changes);
    diff_str(RecordField::Color, &old.color, &new.color, &mut changes);
    diff_num(RecordField::Thickness, old.thickness, new.thickness, &mut changes);
    diff_num(RecordField::Length, old.length, new.length, &mut changes);
    diff_num(RecordField::Width, old.width, new.width, &mut changes);
    diff_str(RecordField::Supplier, &old.supplier, &new.supplier, &mut changes);
    diff_status(old.status, new.status, &mut changes);
    diff_kind(old.kind, new.kind, &mut changes);
    diff_opt_str(RecordField::JobReference, &old.job_reference, &new.job_reference, &mut changes);
    diff_date(RecordField::ReceivedDate, old.received_date, new.received_date, &mut changes);
    diff_date(RecordField::ConsumedDate, old.consumed_date, new.consumed_date, &mut changes);
    diff_opt_num(RecordField::Cost, old.cost, new.cost, &mut changes);
    diff_opt_str(RecordField::Notes, &old.notes, &new.notes, &mut changes);
    diff_opt_str(RecordField::Location, &old.location, &new.location, &mut changes);

    changes
}

pub fn render_date(date: Option<NaiveDate>) -> String {
    date.map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| ABSENT.to_string())
}

pub fn render_number(value: f64) -> String {
    if value.fract() == 0.0 && value.is_finite() {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}

pub fn render_opt_number(value: Option<f64>) -> String {
    value.map(render_number).unwrap_or_else(|| ABSENT.to_string())
}

pub fn render_opt_str(value: &Option<String>) -> String {
    match value {
        Some(v) if !v.is_empty() => v.clone(),
        _ => ABSENT.to_string(),
    }
}

pub fn render_kind(kind: SlabKind) -> &'static str {
    match kind {
        SlabKind::FullSlab => "Full Slab",
        SlabKind::Remnant => "Remnant",
    }
}

fn diff_str(field: RecordField, old: &str, new: &str, out: &mut Vec<FieldChange>) {
    if old != new {
        out.push(FieldChange::new(field, old, new));
    }
}

fn diff_opt_str(
    field: RecordField,
    old: &Option<String>,
    new: &Option<String>,
    out: &mut Vec<FieldChange>,
) {
    if old != new {
        out.push(FieldChange::new(field, render_opt_str(old), render_opt_str(new)));
    }
}

fn diff_num(field: RecordField, old: f64, new: f64, out: &mut Vec<FieldChange>) {
    if old != new {
        out.push(FieldChange::new(field, render_number(old), render_number(new)));
    }
}

fn diff_opt_num(field: RecordField, old: Option<f64>, new: Option<f64>, out: &mut Vec<FieldChange>) {
    if old != new {
        out.push(FieldChange::new(
            field,
            render_opt_number(old),
            render_opt_number(new),
        ));
    }
}

fn diff_date(
    field: RecordField,
    old: Option<NaiveDate>,
    new: Option<NaiveDate>,
    out: &mut Vec<FieldChange>,
) {
    if old != new {
        out.push(FieldChange::new(field, render_date(old), render_date(new)));
    }
}

fn diff_status(old: SlabStatus, new: SlabStatus, out: &mut Vec<FieldChange>) {
    if old != new {
        out.push(FieldChange::new(RecordField::Status, old.as_str(), new.as_str()));
    }
}

fn diff_kind(old: SlabKind, new: SlabKind, out: &mut Vec<FieldChange>) {
    if old != new {
        out.push(FieldChange::new(RecordField::Kind, render_kind(old), render_kind(new)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use slabtrack_core::RecordId;

    fn sample() -> InventoryRecord {
        let now = Utc::now();
        InventoryRecord {
            id: RecordId::new(),
            serial_number: "SLB-300".to_string(),
            material: "Soapstone".to_string(),
            color: "Green".to_string(),
            thickness: 30.0,
            length: 2500.0,
            width: 1500.0,
            supplier: "Vermont Stone".to_string(),
            status: SlabStatus::Stock,
            kind: SlabKind::FullSlab,
            job_reference: None,
            received_date: NaiveDate::from_ymd_opt(2024, 1, 5),
            consumed_date: None,
            cost: Some(800.0),
            notes: None,
            location: Some("Bay 2".to_string()),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn identical_records_produce_no_changes() {
        let record = sample();
        assert!(diff_records(&record, &record).is_empty());
    }

    #[test]
    fn a_single_field_edit_produces_exactly_one_change() {
        let old = sample();
        let mut new = old.clone();
        new.color = "Dark Green".to_string();

        let changes = diff_records(&old, &new);
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].field, RecordField::Color);
        assert_eq!(changes[0].old_value, "Green");
        assert_eq!(changes[0].new_value, "Dark Green");
    }

    #[test]
    fn dates_render_iso_and_absent_values_render_em_dash() {
        let old = sample();
        let mut new = old.clone();
        new.consumed_date = NaiveDate::from_ymd_opt(2024, 3, 15);
        new.location = None;

        let changes = diff_records(&old, &new);
        let consumed = changes.iter().find(|c| c.field == RecordField::ConsumedDate).unwrap();
        assert_eq!(consumed.old_value, ABSENT);
        assert_eq!(consumed.new_value, "2024-03-15");

        let location = changes.iter().find(|c| c.field == RecordField::Location).unwrap();
        assert_eq!(location.old_value, "Bay 2");
        assert_eq!(location.new_value, ABSENT);
    }

    #[test]
    fn numbers_render_without_trailing_zeros() {
        let old = sample();
        let mut new = old.clone();
        new.thickness = 20.5;

        let changes = diff_records(&old, &new);
        assert_eq!(changes[0].old_value, "30");
        assert_eq!(changes[0].new_value, "20.5");
    }

    #[test]
    fn bookkeeping_timestamps_are_not_diffed() {
        let old = sample();
        let mut new = old.clone();
        new.updated_at = new.updated_at + chrono::Duration::hours(1);
        assert!(diff_records(&old, &new).is_empty());
    }
}
