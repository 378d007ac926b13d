//! The append-only trail itself.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, RwLock};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use slabtrack_core::{AuditEntryId, BatchId, Clock, IdSource, RecordId};
use slabtrack_domain::{InventoryRecord, RecordField, SlabStatus};

use crate::diff::diff_records;
use crate::entry::{AuditAction, AuditEntry, FieldChange};
use crate::query::{AuditPage, AuditQuery};

/// Default per-record entry cap.
pub const DEFAULT_RETENTION_CAP: usize = 100;

/// Aggregate figures for one record's history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditSummary {
    pub entry_count: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_entry_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_entry_at: Option<DateTime<Utc>>,
    pub status_change_count: usize,
    pub update_count: usize,
}

/// Append-only audit log, keyed by record id.
///
/// Entries are never modified after insertion; the only removals are the
/// per-record retention cap (oldest first) and explicit `clear`.
pub struct AuditTrail {
    entries: RwLock<HashMap<RecordId, VecDeque<AuditEntry>>>,
    retention_cap: usize,
    clock: Arc<dyn Clock>,
    ids: Arc<dyn IdSource>,
}

impl AuditTrail {
    pub fn new(clock: Arc<dyn Clock>, ids: Arc<dyn IdSource>) -> Self {
        Self::with_retention_cap(DEFAULT_RETENTION_CAP, clock, ids)
    }

    pub fn with_retention_cap(
        retention_cap: usize,
        clock: Arc<dyn Clock>,
        ids: Arc<dyn IdSource>,
    ) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            retention_cap,
            clock,
            ids,
        }
    }

    pub fn record_create(&self, record: &InventoryRecord, actor: Option<&str>) {
        self.append(
            record.id,
            AuditAction::Create,
            vec![FieldChange::new(
                RecordField::SerialNumber,
                crate::diff::ABSENT,
                record.serial_number.clone(),
            )],
            None,
            actor,
            None,
        );
    }

    /// Diff two snapshots and log the differences. A no-change update logs
    /// nothing at all.
    pub fn record_update(
        &self,
        old: &InventoryRecord,
        new: &InventoryRecord,
        reason: Option<&str>,
        actor: Option<&str>,
    ) {
        let changes = diff_records(old, new);
        if changes.is_empty() {
            return;
        }
        self.append(new.id, AuditAction::Update, changes, reason, actor, None);
    }

    pub fn record_status_change(
        &self,
        record: &InventoryRecord,
        old_status: SlabStatus,
        new_status: SlabStatus,
        reason: Option<&str>,
        actor: Option<&str>,
    ) {
        if old_status == new_status {
            return;
        }
        self.append(
            record.id,
            AuditAction::StatusChange,
            vec![FieldChange::new(
                RecordField::Status,
                old_status.as_str(),
                new_status.as_str(),
            )],
            reason,
            actor,
            None,
        );
    }

    pub fn record_delete(
        &self,
        record: &InventoryRecord,
        reason: Option<&str>,
        actor: Option<&str>,
    ) {
        self.append(
            record.id,
            AuditAction::Delete,
            vec![FieldChange::new(
                RecordField::SerialNumber,
                record.serial_number.clone(),
                crate::diff::ABSENT,
            )],
            reason,
            actor,
            None,
        );
    }

    /// Free-standing note against a record's history: no field changes,
    /// only the reason text.
    pub fn record_annotation(&self, record_id: RecordId, reason: &str, actor: Option<&str>) {
        self.append(record_id, AuditAction::Note, Vec::new(), Some(reason), actor, None);
    }

    /// Log one entry per affected record, all sharing a fresh batch id.
    /// Returns the batch id for the caller's own correlation.
    pub fn record_bulk_update(
        &self,
        updates: &[(RecordId, Vec<FieldChange>)],
        reason: Option<&str>,
        actor: Option<&str>,
    ) -> BatchId {
        let batch_id = BatchId::from_uuid(self.ids.next_id());
        for (record_id, changes) in updates {
            self.append(
                *record_id,
                AuditAction::BulkUpdate,
                changes.clone(),
                reason,
                actor,
                Some(batch_id),
            );
        }
        batch_id
    }

    /// Bulk counterpart of [`Self::record_delete`]: DELETE entries sharing
    /// one batch id.
    pub fn record_bulk_delete(
        &self,
        records: &[InventoryRecord],
        reason: Option<&str>,
        actor: Option<&str>,
    ) -> BatchId {
        let batch_id = BatchId::from_uuid(self.ids.next_id());
        for record in records {
            self.append(
                record.id,
                AuditAction::Delete,
                vec![FieldChange::new(
                    RecordField::SerialNumber,
                    record.serial_number.clone(),
                    crate::diff::ABSENT,
                )],
                reason,
                actor,
                Some(batch_id),
            );
        }
        batch_id
    }

    /// Entries for one record, most recent first.
    pub fn get_history(&self, record_id: RecordId, limit: Option<usize>) -> Vec<AuditEntry> {
        let Ok(entries) = self.entries.read() else {
            warn!(%record_id, "audit trail lock poisoned; returning empty history");
            return Vec::new();
        };
        let history = entries
            .get(&record_id)
            .map(|log| log.iter().rev().cloned())
            .into_iter()
            .flatten();
        match limit {
            Some(limit) => history.take(limit).collect(),
            None => history.collect(),
        }
    }

    /// Filtered, paginated view across all records. `page` is one-based.
    pub fn query(&self, filter: &AuditQuery, page: usize, page_size: usize) -> AuditPage {
        let page = page.max(1);
        let Ok(entries) = self.entries.read() else {
            warn!("audit trail lock poisoned; returning empty page");
            return AuditPage {
                entries: Vec::new(),
                total: 0,
                page,
                page_size,
            };
        };

        let mut matched: Vec<AuditEntry> = entries
            .values()
            .flatten()
            .filter(|e| filter.matches(e))
            .cloned()
            .collect();
        // Most recent first, ties broken by entry id for a stable order.
        matched.sort_by(|a, b| b.timestamp.cmp(&a.timestamp).then(b.id.cmp(&a.id)));

        let total = matched.len();
        let start = (page - 1).saturating_mul(page_size).min(total);
        let end = start.saturating_add(page_size).min(total);
        AuditPage {
            entries: matched[start..end].to_vec(),
            total,
            page,
            page_size,
        }
    }

    pub fn get_summary(&self, record_id: RecordId) -> AuditSummary {
        let Ok(entries) = self.entries.read() else {
            warn!(%record_id, "audit trail lock poisoned; returning empty summary");
            return AuditSummary {
                entry_count: 0,
                first_entry_at: None,
                last_entry_at: None,
                status_change_count: 0,
                update_count: 0,
            };
        };
        let log = entries.get(&record_id);
        AuditSummary {
            entry_count: log.map_or(0, |l| l.len()),
            first_entry_at: log.and_then(|l| l.front()).map(|e| e.timestamp),
            last_entry_at: log.and_then(|l| l.back()).map(|e| e.timestamp),
            status_change_count: log.map_or(0, |l| {
                l.iter()
                    .filter(|e| e.action == AuditAction::StatusChange)
                    .count()
            }),
            update_count: log.map_or(0, |l| {
                l.iter().filter(|e| e.action == AuditAction::Update).count()
            }),
        }
    }

    /// Flat CSV serialization of one record's history: one row per field
    /// change, or one reason-only row for entries without changes.
    pub fn export_history(&self, record_id: RecordId) -> String {
        let mut out = String::from("Timestamp,Action,Actor,Field,OldValue,NewValue,Reason\n");
        // Oldest first reads naturally in an export.
        let mut history = self.get_history(record_id, None);
        history.reverse();
        for entry in history {
            let timestamp = entry.timestamp.to_rfc3339();
            let actor = entry.actor.as_deref().unwrap_or("");
            let reason = entry.reason.as_deref().unwrap_or("");
            if entry.changes.is_empty() {
                out.push_str(&csv_row(&[
                    &timestamp,
                    entry.action.as_str(),
                    actor,
                    "",
                    "",
                    "",
                    reason,
                ]));
            } else {
                for change in &entry.changes {
                    out.push_str(&csv_row(&[
                        &timestamp,
                        entry.action.as_str(),
                        actor,
                        change.display_name(),
                        &change.old_value,
                        &change.new_value,
                        reason,
                    ]));
                }
            }
        }
        out
    }

    /// Purge one record's entries, or everything.
    pub fn clear(&self, record_id: Option<RecordId>) {
        let Ok(mut entries) = self.entries.write() else {
            warn!("audit trail lock poisoned; clear skipped");
            return;
        };
        match record_id {
            Some(id) => {
                entries.remove(&id);
            }
            None => entries.clear(),
        }
    }

    fn append(
        &self,
        record_id: RecordId,
        action: AuditAction,
        changes: Vec<FieldChange>,
        reason: Option<&str>,
        actor: Option<&str>,
        batch_id: Option<BatchId>,
    ) {
        let entry = AuditEntry {
            id: AuditEntryId::from_uuid(self.ids.next_id()),
            record_id,
            action,
            timestamp: self.clock.now(),
            actor: actor.map(str::to_string),
            changes,
            reason: reason.map(str::to_string),
            batch_id,
        };

        let Ok(mut entries) = self.entries.write() else {
            // History is auxiliary: losing an entry must never block the
            // mutation it describes.
            warn!(%record_id, action = %action, "audit trail lock poisoned; entry dropped");
            return;
        };
        let log = entries.entry(record_id).or_default();
        log.push_back(entry);
        while log.len() > self.retention_cap {
            log.pop_front();
        }
    }
}

fn csv_row(cells: &[&str]) -> String {
    let mut row = String::new();
    for (i, cell) in cells.iter().enumerate() {
        if i > 0 {
            row.push(',');
        }
        row.push_str(&csv_escape(cell));
    }
    row.push('\n');
    row
}

fn csv_escape(cell: &str) -> String {
    if cell.contains([',', '"', '\n']) {
        format!("\"{}\"", cell.replace('"', "\"\""))
    } else {
        cell.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use slabtrack_core::{FixedClock, SequenceSource};
    use slabtrack_domain::SlabKind;

    fn trail_with_cap(cap: usize) -> (AuditTrail, Arc<FixedClock>) {
        let clock = Arc::new(FixedClock::at_epoch());
        let trail = AuditTrail::with_retention_cap(
            cap,
            clock.clone(),
            Arc::new(SequenceSource::new()),
        );
        (trail, clock)
    }

    fn record(serial: &str) -> InventoryRecord {
        let now = FixedClock::at_epoch().now();
        InventoryRecord {
            id: RecordId::new(),
            serial_number: serial.to_string(),
            material: "Basalt".to_string(),
            color: "Black".to_string(),
            thickness: 20.0,
            length: 3000.0,
            width: 1800.0,
            supplier: "Ridge Quarry".to_string(),
            status: SlabStatus::Stock,
            kind: SlabKind::FullSlab,
            job_reference: None,
            received_date: None,
            consumed_date: None,
            cost: None,
            notes: None,
            location: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn update_with_one_changed_field_logs_one_entry_with_one_change() {
        let (trail, _) = trail_with_cap(100);
        let old = record("SLB-A");
        let mut new = old.clone();
        new.color = "Charcoal".to_string();

        trail.record_update(&old, &new, None, Some("jo"));

        let history = trail.get_history(old.id, None);
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].action, AuditAction::Update);
        assert_eq!(history[0].changes.len(), 1);
        assert_eq!(history[0].changes[0].field, RecordField::Color);
        assert_eq!(history[0].actor.as_deref(), Some("jo"));
    }

    #[test]
    fn no_op_update_logs_nothing() {
        let (trail, _) = trail_with_cap(100);
        let r = record("SLB-B");
        trail.record_update(&r, &r, None, None);
        assert!(trail.get_history(r.id, None).is_empty());
    }

    #[test]
    fn retention_cap_evicts_only_the_oldest_entries_of_that_record() {
        let (trail, clock) = trail_with_cap(100);
        let busy = record("SLB-C");
        let quiet = record("SLB-D");

        trail.record_create(&quiet, None);

        let mut prev = busy.clone();
        for i in 0..101 {
            clock.advance(chrono::Duration::seconds(1));
            let mut next = prev.clone();
            next.notes = Some(format!("edit {i}"));
            trail.record_update(&prev, &next, None, None);
            prev = next;
        }

        let history = trail.get_history(busy.id, None);
        assert_eq!(history.len(), 100);
        // The first edit ("edit 0") was evicted.
        let oldest = history.last().unwrap();
        assert_eq!(oldest.changes[0].new_value, "edit 1");
        assert_eq!(trail.get_history(quiet.id, None).len(), 1);
    }

    #[test]
    fn bulk_update_shares_one_batch_id_across_entries() {
        let (trail, _) = trail_with_cap(100);
        let a = record("SLB-E");
        let b = record("SLB-F");
        let updates = vec![
            (a.id, vec![FieldChange::new(RecordField::Status, "STOCK", "CONSUMED")]),
            (b.id, vec![FieldChange::new(RecordField::Status, "ALLOCATED", "CONSUMED")]),
        ];

        let batch_id = trail.record_bulk_update(&updates, Some("month-end"), None);

        for r in [&a, &b] {
            let history = trail.get_history(r.id, None);
            assert_eq!(history.len(), 1);
            assert_eq!(history[0].action, AuditAction::BulkUpdate);
            assert_eq!(history[0].batch_id, Some(batch_id));
        }
    }

    #[test]
    fn history_is_most_recent_first_and_respects_limit() {
        let (trail, clock) = trail_with_cap(100);
        let r = record("SLB-G");
        let mut prev = r.clone();
        for color in ["one", "two", "three"] {
            clock.advance(chrono::Duration::minutes(1));
            let mut next = prev.clone();
            next.color = color.to_string();
            trail.record_update(&prev, &next, None, None);
            prev = next;
        }

        let history = trail.get_history(r.id, Some(2));
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].changes[0].new_value, "three");
        assert_eq!(history[1].changes[0].new_value, "two");
    }

    #[test]
    fn query_filters_by_action_and_paginates() {
        let (trail, clock) = trail_with_cap(100);
        let r = record("SLB-H");
        trail.record_create(&r, Some("amy"));
        for i in 0..5 {
            clock.advance(chrono::Duration::seconds(1));
            let mut next = r.clone();
            next.notes = Some(format!("n{i}"));
            trail.record_update(&r, &next, None, Some("amy"));
        }

        let filter = AuditQuery {
            actions: Some(vec![AuditAction::Update]),
            ..AuditQuery::default()
        };
        let page1 = trail.query(&filter, 1, 2);
        assert_eq!(page1.total, 5);
        assert_eq!(page1.entries.len(), 2);
        let page3 = trail.query(&filter, 3, 2);
        assert_eq!(page3.entries.len(), 1);
    }

    #[test]
    fn query_filters_by_actor_and_field() {
        let (trail, _) = trail_with_cap(100);
        let r = record("SLB-I");
        let mut next = r.clone();
        next.location = Some("Bay 9".to_string());
        trail.record_update(&r, &next, None, Some("Marta K"));

        let by_actor = AuditQuery {
            actor: Some("marta".to_string()),
            ..AuditQuery::default()
        };
        assert_eq!(trail.query(&by_actor, 1, 10).total, 1);

        let by_field = AuditQuery {
            field: Some(RecordField::Location),
            ..AuditQuery::default()
        };
        assert_eq!(trail.query(&by_field, 1, 10).total, 1);

        let miss = AuditQuery {
            field: Some(RecordField::Cost),
            ..AuditQuery::default()
        };
        assert_eq!(trail.query(&miss, 1, 10).total, 0);
    }

    #[test]
    fn export_emits_one_row_per_field_change() {
        let (trail, _) = trail_with_cap(100);
        let r = record("SLB-J");
        let mut next = r.clone();
        next.color = "Grey".to_string();
        next.cost = Some(150.0);
        trail.record_update(&r, &next, Some("recount"), Some("amy"));

        let csv = trail.export_history(r.id);
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "Timestamp,Action,Actor,Field,OldValue,NewValue,Reason");
        // Two changed fields -> two rows.
        assert_eq!(lines.len(), 3);
        assert!(lines[1].contains("UPDATE"));
        assert!(lines.iter().any(|l| l.contains("Color")));
        assert!(lines.iter().any(|l| l.contains("Cost")));
    }

    #[test]
    fn annotation_exports_as_a_single_reason_only_row() {
        let (trail, clock) = trail_with_cap(100);
        let r = record("SLB-N");
        trail.record_create(&r, None);
        clock.advance(chrono::Duration::minutes(1));
        trail.record_annotation(r.id, "re-measured after edge chip", Some("amy"));

        let history = trail.get_history(r.id, None);
        assert_eq!(history[0].action, AuditAction::Note);
        assert!(history[0].changes.is_empty());

        let csv = trail.export_history(r.id);
        let lines: Vec<&str> = csv.lines().collect();
        // Header, CREATE row, one row for the note.
        assert_eq!(lines.len(), 3);
        assert!(lines[2].ends_with(",NOTE,amy,,,,re-measured after edge chip"));
    }

    #[test]
    fn summary_counts_entries_by_kind() {
        let (trail, clock) = trail_with_cap(100);
        let r = record("SLB-M");
        let first_at = clock.now();
        trail.record_create(&r, None);

        clock.advance(chrono::Duration::minutes(5));
        let mut next = r.clone();
        next.cost = Some(50.0);
        trail.record_update(&r, &next, None, None);

        clock.advance(chrono::Duration::minutes(5));
        trail.record_status_change(&next, SlabStatus::Stock, SlabStatus::Allocated, None, None);

        let summary = trail.get_summary(r.id);
        assert_eq!(summary.entry_count, 3);
        assert_eq!(summary.update_count, 1);
        assert_eq!(summary.status_change_count, 1);
        assert_eq!(summary.first_entry_at, Some(first_at));
        assert_eq!(
            summary.last_entry_at,
            Some(first_at + chrono::Duration::minutes(10))
        );
    }

    #[test]
    fn clear_scopes_to_one_record_when_given_an_id() {
        let (trail, _) = trail_with_cap(100);
        let a = record("SLB-K");
        let b = record("SLB-L");
        trail.record_create(&a, None);
        trail.record_create(&b, None);

        trail.clear(Some(a.id));
        assert!(trail.get_history(a.id, None).is_empty());
        assert_eq!(trail.get_history(b.id, None).len(), 1);

        trail.clear(None);
        assert!(trail.get_history(b.id, None).is_empty());
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 64,
            ..ProptestConfig::default()
        })]

        /// Property: after any number of inserts, a record's history never
        /// exceeds the retention cap, and shrinks only from the oldest end.
        #[test]
        fn history_never_exceeds_cap(inserts in 1usize..300, cap in 1usize..50) {
            let (trail, clock) = trail_with_cap(cap);
            let r = record("SLB-P");
            let mut prev = r.clone();
            for i in 0..inserts {
                clock.advance(chrono::Duration::seconds(1));
                let mut next = prev.clone();
                next.notes = Some(format!("edit {i}"));
                trail.record_update(&prev, &next, None, None);
                prev = next;
            }

            let history = trail.get_history(r.id, None);
            prop_assert_eq!(history.len(), inserts.min(cap));
            // Newest entry always survives.
            prop_assert_eq!(
                history[0].changes[0].new_value.clone(),
                format!("edit {}", inserts - 1)
            );
        }
    }
}
