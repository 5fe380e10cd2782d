//! Audit module - append-only change log for every register mutation.

mod audit_csv;
mod audit_diff;
mod audit_model;
mod audit_recorder;
mod audit_service;
mod audit_traits;


pub use audit_csv::{AuditCsvWriter, AUDIT_CSV_HEADERS};
pub use audit_diff::{changed_fields, snapshot_as_created, snapshot_as_deleted};
pub use audit_model::{
    AuditAction, AuditCursor, AuditLogEntry, AuditLogFilter, AuditLogPage, AuditSnapshot,
    FieldChange, FieldChanges, FieldMap, Pagination,
};
pub use audit_recorder::{log_create, log_delete, log_record_changes};
pub use audit_service::AuditService;
pub use audit_traits::{AuditRepositoryTrait, AuditServiceTrait, AuditSink};
