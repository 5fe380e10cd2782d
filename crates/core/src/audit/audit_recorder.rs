//! Builds audit entries and appends them to the current unit of work.

use chrono::Utc;
use log::debug;
use uuid::Uuid;

use super::audit_diff::{snapshot_as_created, snapshot_as_deleted};
use super::audit_model::{AuditAction, AuditLogEntry, FieldChanges, FieldMap};
use super::audit_traits::AuditSink;
use crate::transactions::LedgerError;
use crate::Result;

fn append<S: AuditSink + ?Sized>(
    sink: &mut S,
    entity_id: &str,
    actor_id: &str,
    action: AuditAction,
    table: &str,
    record_id: &str,
    changes: FieldChanges,
) -> Result<AuditLogEntry> {
    if actor_id.trim().is_empty() {
        return Err(LedgerError::Unauthorized.into());
    }
    let entry = AuditLogEntry {
        id: Uuid::now_v7().to_string(),
        entity_id: entity_id.to_string(),
        actor_id: actor_id.to_string(),
        action,
        table_name: table.to_string(),
        record_id: record_id.to_string(),
        changes,
        created_at: Utc::now(),
    };
    sink.append_audit_entry(&entry)?;
    debug!(
        "Audit {} {}/{} by {}",
        action.as_str(),
        table,
        record_id,
        actor_id
    );
    Ok(entry)
}

/// Records the creation of `record_id` with its full snapshot.
pub fn log_create<S: AuditSink + ?Sized>(
    sink: &mut S,
    entity_id: &str,
    actor_id: &str,
    table: &str,
    record_id: &str,
    snapshot: FieldMap,
) -> Result<AuditLogEntry> {
    append(
        sink,
        entity_id,
        actor_id,
        AuditAction::Create,
        table,
        record_id,
        snapshot_as_created(snapshot),
    )
}

/// Records the deletion of `record_id`. The entry keeps the entire prior record.
pub fn log_delete<S: AuditSink + ?Sized>(
    sink: &mut S,
    entity_id: &str,
    actor_id: &str,
    table: &str,
    record_id: &str,
    snapshot: FieldMap,
) -> Result<AuditLogEntry> {
    append(
        sink,
        entity_id,
        actor_id,
        AuditAction::Delete,
        table,
        record_id,
        snapshot_as_deleted(snapshot),
    )
}

/// Records a field delta. Nothing is written when `changes` is empty.
pub fn log_record_changes<S: AuditSink + ?Sized>(
    sink: &mut S,
    entity_id: &str,
    actor_id: &str,
    action: AuditAction,
    table: &str,
    record_id: &str,
    changes: FieldChanges,
) -> Result<Option<AuditLogEntry>> {
    if changes.is_empty() {
        return Ok(None);
    }
    append(sink, entity_id, actor_id, action, table, record_id, changes).map(Some)
}
