//! The record store facade.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLockReadGuard, RwLockWriteGuard, RwLock};

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use slabtrack_audit::{diff_records, AuditTrail, FieldChange};
use slabtrack_core::{Clock, IdSource, RecordId};
use slabtrack_domain::{BusinessRuleSet, InventoryRecord, SlabKind, SlabStatus};
use slabtrack_validation::ValidationEngine;
use slabtrack_workflow::{validate_transition, TransitionData};

use crate::buffer::WriteBuffer;
use crate::error::{BulkResult, StoreError, StoreResult};
use crate::filter::RecordFilter;
use crate::schema::StoredSchema;
use crate::storage::{StorageError, StoragePort};
use crate::summary::InventorySummary;

/// Key the record set lives under in the storage port.
const STORAGE_KEY: &str = "slabtrack.records";

/// Input for creating a record through the store, before defaults are
/// applied. Everything the rule set can default is absent here.
#[derive(Debug, Clone)]
pub struct RecordDraft {
    pub material: String,
    pub color: String,
    pub thickness: f64,
    pub length: f64,
    pub width: f64,
    pub supplier: String,
    pub kind: SlabKind,
    pub serial_number: Option<String>,
    pub cost: Option<f64>,
    pub notes: Option<String>,
}

/// The top-level facade over records, validation, workflow, and audit.
///
/// Owns the authoritative in-memory record set; durable writes go through
/// the write buffer to the injected storage port. One instance per process,
/// constructed at startup and passed to collaborators.
pub struct RecordStore {
    records: RwLock<HashMap<RecordId, InventoryRecord>>,
    storage: Arc<dyn StoragePort>,
    rules: BusinessRuleSet,
    validation: ValidationEngine,
    audit: AuditTrail,
    clock: Arc<dyn Clock>,
    ids: Arc<dyn IdSource>,
    buffer: Mutex<WriteBuffer>,
    /// When the persisted schema was first created; survives flushes.
    created_at: Mutex<DateTime<Utc>>,
}

impl RecordStore {
    /// Open the store, materializing any record set already persisted under
    /// the storage port.
    pub fn open(
        storage: Arc<dyn StoragePort>,
        rules: BusinessRuleSet,
        clock: Arc<dyn Clock>,
        ids: Arc<dyn IdSource>,
    ) -> StoreResult<Self> {
        let mut records = HashMap::new();
        let mut created_at = clock.now();

        if let Some(raw) = storage.get(STORAGE_KEY)? {
            let schema: StoredSchema = serde_json::from_str(&raw)
                .map_err(|e| StoreError::Snapshot(format!("corrupt persisted schema: {e}")))?;
            if !schema.is_compatible() {
                return Err(StoreError::Snapshot(format!(
                    "unsupported schema version '{}'",
                    schema.version
                )));
            }
            created_at = schema.metadata.created_at;
            for record in schema.data.records {
                records.insert(record.id, record);
            }
        }

        Ok(Self {
            records: RwLock::new(records),
            storage,
            rules,
            validation: ValidationEngine::new(clock.clone()),
            audit: AuditTrail::new(clock.clone(), ids.clone()),
            clock,
            ids,
            buffer: Mutex::new(WriteBuffer::new()),
            created_at: Mutex::new(created_at),
        })
    }

    pub fn audit(&self) -> &AuditTrail {
        &self.audit
    }

    pub fn rules(&self) -> &BusinessRuleSet {
        &self.rules
    }

    /// Every record, oldest first.
    pub fn get_all(&self) -> StoreResult<Vec<InventoryRecord>> {
        let records = self.read_records()?;
        let mut all: Vec<InventoryRecord> = records.values().cloned().collect();
        all.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(all)
    }

    pub fn get_by_id(&self, id: RecordId) -> StoreResult<InventoryRecord> {
        let records = self.read_records()?;
        records.get(&id).cloned().ok_or(StoreError::NotFound(id))
    }

    /// Lookup by serial. Absence is not an error; this is the uniqueness
    /// probe, and "no such serial" is its happy path.
    pub fn get_by_serial_number(&self, serial: &str) -> StoreResult<Option<InventoryRecord>> {
        let records = self.read_records()?;
        Ok(records
            .values()
            .find(|r| r.serial_number.eq_ignore_ascii_case(serial.trim()))
            .cloned())
    }

    /// Build a record from a draft, applying the rule set's defaults, and
    /// save it.
    pub fn create_record(&self, draft: RecordDraft) -> StoreResult<InventoryRecord> {
        let now = self.clock.now();
        let serial_number = match draft.serial_number {
            Some(serial) => serial,
            None if self.rules.auto_generate_serial_number => self.generate_serial(),
            None => String::new(),
        };
        let record = InventoryRecord {
            id: RecordId::from_uuid(self.ids.next_id()),
            serial_number,
            material: draft.material,
            color: draft.color,
            thickness: draft.thickness,
            length: draft.length,
            width: draft.width,
            supplier: draft.supplier,
            status: self.rules.default_status,
            kind: draft.kind,
            job_reference: None,
            received_date: None,
            consumed_date: None,
            cost: draft.cost,
            notes: draft.notes,
            location: self.rules.default_location.clone(),
            created_at: now,
            updated_at: now,
        };
        self.save(record)
    }

    /// Upsert by identifier: insert if unseen, replace if present.
    pub fn save(&self, record: InventoryRecord) -> StoreResult<InventoryRecord> {
        self.save_with(record, None, None)
    }

    /// [`Self::save`] with an audit reason and actor.
    pub fn save_with(
        &self,
        record: InventoryRecord,
        reason: Option<&str>,
        actor: Option<&str>,
    ) -> StoreResult<InventoryRecord> {
        let report = self.validation.validate_record(&record, &self.rules);
        for warning in &report.warnings {
            debug!(
                record_id = %record.id,
                field = warning.field.name(),
                code = warning.code.as_str(),
                "validation warning: {}",
                warning.message
            );
        }
        if !report.is_valid() {
            return Err(StoreError::Validation(report.error_summary()));
        }

        let all = self.get_all()?;
        let unique = self.validation.validate_unique_serial_number(
            &record.serial_number,
            Some(record.id),
            &all,
        );
        if !unique.is_valid() {
            return Err(StoreError::Validation(unique.error_summary()));
        }

        let existing = {
            let records = self.read_records()?;
            records.get(&record.id).cloned()
        };

        if let Some(old) = &existing {
            if old.status != record.status {
                let data = TransitionData {
                    received_date: record.received_date,
                    consumed_date: record.consumed_date,
                    job_reference: record.job_reference.clone(),
                };
                validate_transition(old, record.status, &data)?;
            }
        }

        let now = self.clock.now();
        let mut saved = record;
        saved.updated_at = now;
        if existing.is_none() {
            saved.created_at = now;
        }

        {
            let mut records = self.write_records()?;
            records.insert(saved.id, saved.clone());
        }

        match &existing {
            None => self.audit.record_create(&saved, actor),
            Some(old) => {
                if old.status != saved.status {
                    self.audit
                        .record_status_change(&saved, old.status, saved.status, reason, actor);
                }
                // Log the non-status edits separately so a combined
                // edit+transition produces one entry of each kind.
                let mut old_rest = old.clone();
                old_rest.status = saved.status;
                self.audit.record_update(&old_rest, &saved, reason, actor);
            }
        }

        self.mark_dirty(now);
        Ok(saved)
    }

    /// Move one record to `target`, carrying any data the target requires.
    pub fn transition_status(
        &self,
        id: RecordId,
        target: SlabStatus,
        data: &TransitionData,
        reason: Option<&str>,
        actor: Option<&str>,
    ) -> StoreResult<InventoryRecord> {
        let old = self.get_by_id(id)?;
        validate_transition(&old, target, data)?;

        let now = self.clock.now();
        let mut updated = old.clone();
        updated.status = target;
        if let Some(received) = data.received_date {
            updated.received_date = Some(received);
        }
        if let Some(consumed) = data.consumed_date {
            updated.consumed_date = Some(consumed);
        }
        if let Some(job) = &data.job_reference {
            updated.job_reference = Some(job.clone());
        }
        updated.updated_at = now;

        // The carried data can contradict what the record already holds
        // (e.g. a consumed date earlier than the received date), so the
        // updated snapshot goes through record validation like any save.
        let report = self.validation.validate_record(&updated, &self.rules);
        for warning in &report.warnings {
            debug!(
                record_id = %updated.id,
                field = warning.field.name(),
                code = warning.code.as_str(),
                "validation warning: {}",
                warning.message
            );
        }
        if !report.is_valid() {
            return Err(StoreError::Validation(report.error_summary()));
        }

        {
            let mut records = self.write_records()?;
            records.insert(id, updated.clone());
        }

        self.audit
            .record_status_change(&updated, old.status, target, reason, actor);
        let mut old_rest = old;
        old_rest.status = target;
        self.audit.record_update(&old_rest, &updated, reason, actor);

        self.mark_dirty(now);
        Ok(updated)
    }

    /// Attach a free-text note to a record's history without touching the
    /// record itself.
    pub fn annotate(&self, id: RecordId, reason: &str, actor: Option<&str>) -> StoreResult<()> {
        // Notes only accrue against live records.
        let _ = self.get_by_id(id)?;
        self.audit.record_annotation(id, reason, actor);
        Ok(())
    }

    pub fn delete(&self, id: RecordId) -> StoreResult<()> {
        self.delete_with(id, None, None)
    }

    pub fn delete_with(
        &self,
        id: RecordId,
        reason: Option<&str>,
        actor: Option<&str>,
    ) -> StoreResult<()> {
        let removed = {
            let mut records = self.write_records()?;
            records.remove(&id)
        };
        let Some(record) = removed else {
            return Err(StoreError::NotFound(id));
        };

        self.audit.record_delete(&record, reason, actor);
        self.mark_dirty(self.clock.now());
        Ok(())
    }

    /// Apply one status to each id independently. Per-id failures are
    /// collected; committed items stay committed.
    pub fn bulk_update_status(&self, ids: &[RecordId], status: SlabStatus) -> BulkResult {
        self.bulk_update_status_with(ids, status, None, None)
    }

    pub fn bulk_update_status_with(
        &self,
        ids: &[RecordId],
        status: SlabStatus,
        reason: Option<&str>,
        actor: Option<&str>,
    ) -> BulkResult {
        let mut result = BulkResult::default();
        let mut updates: Vec<(RecordId, Vec<FieldChange>)> = Vec::new();
        let now = self.clock.now();

        let Ok(mut records) = self.records.write() else {
            result.failed("record set lock poisoned; nothing processed");
            return result;
        };

        for id in ids {
            let Some(old) = records.get(id).cloned() else {
                result.failed(format!("record {id} not found"));
                continue;
            };

            let mut updated = old.clone();
            updated.status = status;
            // Moving into a completed status implies consumption happened;
            // stamp the date if the record never got one.
            if status == SlabStatus::Consumed && updated.consumed_date.is_none() {
                updated.consumed_date = Some(now.date_naive());
            }

            if old.status != status {
                let data = TransitionData {
                    received_date: updated.received_date,
                    consumed_date: updated.consumed_date,
                    job_reference: None,
                };
                if let Err(e) = validate_transition(&old, status, &data) {
                    result.failed(format!("record {id}: {e}"));
                    continue;
                }
            }

            updated.updated_at = now;
            let changes = diff_records(&old, &updated);
            records.insert(*id, updated);
            if !changes.is_empty() {
                updates.push((*id, changes));
            }
            result.succeeded();
        }
        drop(records);

        if !updates.is_empty() {
            self.audit.record_bulk_update(&updates, reason, actor);
        }
        if result.processed_count > 0 {
            self.mark_dirty(now);
        }
        result
    }

    /// Delete each id independently; same partial-failure semantics as
    /// [`Self::bulk_update_status`].
    pub fn bulk_delete(&self, ids: &[RecordId]) -> BulkResult {
        self.bulk_delete_with(ids, None, None)
    }

    pub fn bulk_delete_with(
        &self,
        ids: &[RecordId],
        reason: Option<&str>,
        actor: Option<&str>,
    ) -> BulkResult {
        let mut result = BulkResult::default();
        let mut deleted = Vec::new();

        let Ok(mut records) = self.records.write() else {
            result.failed("record set lock poisoned; nothing processed");
            return result;
        };
        for id in ids {
            match records.remove(id) {
                Some(record) => {
                    deleted.push(record);
                    result.succeeded();
                }
                None => result.failed(format!("record {id} not found")),
            }
        }
        drop(records);

        if !deleted.is_empty() {
            self.audit.record_bulk_delete(&deleted, reason, actor);
            self.mark_dirty(self.clock.now());
        }
        result
    }

    /// Records matching every supplied filter dimension, intersected with a
    /// case-insensitive term across the free-text columns.
    pub fn search(&self, filter: &RecordFilter, term: &str) -> StoreResult<Vec<InventoryRecord>> {
        let mut matched: Vec<InventoryRecord> = self
            .read_records()?
            .values()
            .filter(|r| filter.matches(r) && r.matches_term(term))
            .cloned()
            .collect();
        matched.sort_by(|a, b| a.serial_number.cmp(&b.serial_number));
        Ok(matched)
    }

    pub fn summarize(&self) -> StoreResult<InventorySummary> {
        Ok(InventorySummary::compute(&self.get_all()?))
    }

    /// Serialize the entire record set into the versioned envelope.
    pub fn export_snapshot(&self) -> StoreResult<StoredSchema> {
        let records = self.get_all()?;
        Ok(StoredSchema::new(
            records,
            self.schema_created_at(),
            self.clock.now(),
        ))
    }

    /// Replace the record set from an envelope. Returns the record count.
    pub fn import_snapshot(&self, schema: StoredSchema) -> StoreResult<usize> {
        if !schema.is_compatible() {
            return Err(StoreError::Snapshot(format!(
                "unsupported schema version '{}'",
                schema.version
            )));
        }

        let count = schema.data.records.len();
        {
            let mut records = self.write_records()?;
            records.clear();
            for record in schema.data.records {
                records.insert(record.id, record);
            }
        }
        if let Ok(mut created_at) = self.created_at.lock() {
            *created_at = schema.metadata.created_at;
        }
        self.mark_dirty(self.clock.now());
        Ok(count)
    }

    /// Force the durable write now, regardless of the buffer deadline.
    pub fn flush(&self) -> StoreResult<()> {
        let schema = self.export_snapshot()?;
        let raw = serde_json::to_string(&schema)
            .map_err(|e| StoreError::Snapshot(format!("serialize failed: {e}")))?;
        self.storage.set(STORAGE_KEY, &raw)?;

        if let Ok(mut buffer) = self.buffer.lock() {
            buffer.settle();
        }
        debug!(records = schema.metadata.record_count, "record set flushed");
        Ok(())
    }

    /// Flush if the buffered-write deadline has passed. The caller drives
    /// this on its own cadence; there is no timer thread. Returns whether a
    /// flush happened.
    pub fn poll_flush(&self) -> StoreResult<bool> {
        let due = self
            .buffer
            .lock()
            .map(|b| b.is_due(self.clock.now()))
            .unwrap_or(false);
        if due {
            self.flush()?;
        }
        Ok(due)
    }

    fn generate_serial(&self) -> String {
        let uuid = self.ids.next_id().simple().to_string();
        // Tail of the uuid: the varying end for both v7 and sequential ids.
        format!("SLB-{}", uuid[24..].to_uppercase())
    }

    fn schema_created_at(&self) -> DateTime<Utc> {
        self.created_at
            .lock()
            .map(|t| *t)
            .unwrap_or_else(|_| self.clock.now())
    }

    fn mark_dirty(&self, now: DateTime<Utc>) {
        match self.buffer.lock() {
            Ok(mut buffer) => buffer.mark_dirty(now),
            Err(_) => warn!("write buffer lock poisoned; deferred flush not scheduled"),
        }
    }

    fn read_records(
        &self,
    ) -> StoreResult<RwLockReadGuard<'_, HashMap<RecordId, InventoryRecord>>> {
        self.records
            .read()
            .map_err(|_| StorageError::Unavailable("record set lock poisoned".to_string()).into())
    }

    fn write_records(
        &self,
    ) -> StoreResult<RwLockWriteGuard<'_, HashMap<RecordId, InventoryRecord>>> {
        self.records
            .write()
            .map_err(|_| StorageError::Unavailable("record set lock poisoned".to_string()).into())
    }
}

impl Drop for RecordStore {
    /// Guaranteed flush on shutdown: whatever sits inside the debounce
    /// window goes to storage before the store is released.
    fn drop(&mut self) {
        let dirty = self.buffer.lock().map(|b| b.is_dirty()).unwrap_or(false);
        if dirty {
            if let Err(e) = self.flush() {
                warn!("flush on shutdown failed: {e}");
            }
        }
    }
}
