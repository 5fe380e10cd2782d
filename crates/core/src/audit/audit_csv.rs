//! CSV rendering of audit entries.

use std::io::Write;

use super::audit_model::AuditLogEntry;
use crate::Result;

pub const AUDIT_CSV_HEADERS: [&str; 8] = [
    "id",
    "entity_id",
    "actor_id",
    "action",
    "table_name",
    "record_id",
    "created_at",
    "changes",
];

/// Writes audit entries as CSV rows, one entry per line.
pub struct AuditCsvWriter<W: Write> {
    inner: csv::Writer<W>,
    rows: usize,
}

impl<W: Write> AuditCsvWriter<W> {
    /// Creates the writer and emits the header row.
    pub fn new(out: W) -> Result<Self> {
        let mut inner = csv::WriterBuilder::new()
            .terminator(csv::Terminator::Any(b'\n'))
            .from_writer(out);
        inner.write_record(AUDIT_CSV_HEADERS)?;
        Ok(Self { inner, rows: 0 })
    }

    pub fn write_entry(&mut self, entry: &AuditLogEntry) -> Result<()> {
        // Compact JSON never contains a raw newline, so each entry stays on one line.
        let changes = serde_json::to_string(&entry.changes)?;
        let created_at = entry.created_at.to_rfc3339();
        self.inner.write_record([
            entry.id.as_str(),
            entry.entity_id.as_str(),
            entry.actor_id.as_str(),
            entry.action.as_str(),
            entry.table_name.as_str(),
            entry.record_id.as_str(),
            created_at.as_str(),
            changes.as_str(),
        ])?;
        self.rows += 1;
        Ok(())
    }

    /// Flushes buffered rows and returns how many entries were written.
    pub fn finish(mut self) -> Result<usize> {
        self.inner.flush()?;
        Ok(self.rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::{AuditAction, FieldChange, FieldChanges};
    use chrono::{TimeZone, Utc};
    use serde_json::json;

    fn entry(id: &str, reference: &str) -> AuditLogEntry {
        let mut changes = FieldChanges::new();
        changes.insert(
            "reference".to_string(),
            FieldChange {
                old: json!(null),
                new: json!(reference),
            },
        );
        AuditLogEntry {
            id: id.to_string(),
            entity_id: "E1".to_string(),
            actor_id: "user-1".to_string(),
            action: AuditAction::Create,
            table_name: "transactions".to_string(),
            record_id: "T1".to_string(),
            changes,
            created_at: Utc.with_ymd_and_hms(2024, 7, 1, 9, 30, 0).unwrap(),
        }
    }

    #[test]
    fn test_one_line_per_entry() {
        let mut buf = Vec::new();
        let mut writer = AuditCsvWriter::new(&mut buf).unwrap();
        writer.write_entry(&entry("A1", "line one\nline two")).unwrap();
        writer.write_entry(&entry("A2", "plain, with comma")).unwrap();
        assert_eq!(writer.finish().unwrap(), 2);

        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(
            lines[0],
            "id,entity_id,actor_id,action,table_name,record_id,created_at,changes"
        );
        assert!(lines[1].starts_with("A1,E1,user-1,CREATE,transactions,T1,2024-07-01T09:30:00+00:00,"));
        assert!(lines[1].contains("line one\\nline two"));
    }
}
