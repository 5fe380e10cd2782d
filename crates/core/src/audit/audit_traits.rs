use std::io::Write;

use super::audit_model::{AuditCursor, AuditLogEntry, AuditLogFilter, AuditLogPage, Pagination};
use crate::Result;

/// Append-only destination for audit entries.
///
/// Implemented by the unit of work so entries commit or roll back together
/// with the mutation they describe.
pub trait AuditSink {
    fn append_audit_entry(&mut self, entry: &AuditLogEntry) -> Result<()>;
}

/// Trait defining the contract for audit log reads.
///
/// Results are ordered newest first (`created_at`, then `id`, descending).
pub trait AuditRepositoryTrait: Send + Sync {
    fn query(
        &self,
        entity_id: &str,
        filter: &AuditLogFilter,
        pagination: Pagination,
    ) -> Result<Vec<AuditLogEntry>>;
    fn count(&self, entity_id: &str, filter: &AuditLogFilter) -> Result<i64>;

    /// Up to `limit` entries that sort after `after`, or from the newest
    /// entry when `after` is `None`.
    fn query_after(
        &self,
        entity_id: &str,
        filter: &AuditLogFilter,
        after: Option<&AuditCursor>,
        limit: i64,
    ) -> Result<Vec<AuditLogEntry>>;
}

/// Trait defining the contract for audit log queries and export.
pub trait AuditServiceTrait: Send + Sync {
    fn query_audit_log(
        &self,
        entity_id: &str,
        filter: &AuditLogFilter,
        pagination: Pagination,
    ) -> Result<AuditLogPage>;

    /// Writes the whole filtered set as CSV, one entry per line, and returns
    /// the number of rows written. Pagination does not apply.
    fn export_audit_log_csv(
        &self,
        entity_id: &str,
        filter: &AuditLogFilter,
        out: &mut dyn Write,
    ) -> Result<usize>;
}
