use log::debug;
use std::io::Write;
use std::sync::Arc;

use super::audit_csv::AuditCsvWriter;
use super::audit_model::{AuditCursor, AuditLogFilter, AuditLogPage, Pagination};
use super::audit_traits::{AuditRepositoryTrait, AuditServiceTrait};
use crate::constants::MAX_AUDIT_PAGE_SIZE;
use crate::Result;

/// Read side of the audit log: filtered queries and CSV export.
pub struct AuditService {
    repository: Arc<dyn AuditRepositoryTrait>,
}

impl AuditService {
    pub fn new(repository: Arc<dyn AuditRepositoryTrait>) -> Self {
        Self { repository }
    }
}

impl AuditServiceTrait for AuditService {
    fn query_audit_log(
        &self,
        entity_id: &str,
        filter: &AuditLogFilter,
        pagination: Pagination,
    ) -> Result<AuditLogPage> {
        let pagination = pagination.clamped();
        let entries = self.repository.query(entity_id, filter, pagination)?;
        let total = self.repository.count(entity_id, filter)?;
        Ok(AuditLogPage {
            entries,
            total,
            limit: pagination.limit,
            offset: pagination.offset,
        })
    }

    fn export_audit_log_csv(
        &self,
        entity_id: &str,
        filter: &AuditLogFilter,
        out: &mut dyn Write,
    ) -> Result<usize> {
        let mut writer = AuditCsvWriter::new(out)?;
        let mut cursor: Option<AuditCursor> = None;
        loop {
            let page = self.repository.query_after(
                entity_id,
                filter,
                cursor.as_ref(),
                MAX_AUDIT_PAGE_SIZE,
            )?;
            for entry in &page {
                writer.write_entry(entry)?;
            }
            match page.last() {
                Some(last) if (page.len() as i64) == MAX_AUDIT_PAGE_SIZE => {
                    cursor = Some(AuditCursor::after(last));
                }
                _ => break,
            }
        }
        let rows = writer.finish()?;
        debug!("Exported {} audit rows for entity {}", rows, entity_id);
        Ok(rows)
    }
}
