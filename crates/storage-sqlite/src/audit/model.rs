//! Database model for the append-only audit log.

use diesel::prelude::*;
use sharebook_core::audit::AuditLogEntry;
use sharebook_core::{Error, Result};

use crate::errors::StorageError;
use crate::utils::{format_timestamp, parse_enum, parse_timestamp};

/// `changes` holds the field delta as compact JSON.
#[derive(Queryable, Selectable, Insertable, Debug, Clone)]
#[diesel(table_name = crate::schema::audit_log)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct AuditLogDB {
    pub id: String,
    pub entity_id: String,
    pub actor_id: String,
    pub action: String,
    pub table_name: String,
    pub record_id: String,
    pub changes: String,
    pub created_at: String,
}

impl TryFrom<&AuditLogEntry> for AuditLogDB {
    type Error = Error;

    fn try_from(entry: &AuditLogEntry) -> Result<Self> {
        Ok(Self {
            id: entry.id.clone(),
            entity_id: entry.entity_id.clone(),
            actor_id: entry.actor_id.clone(),
            action: entry.action.as_str().to_string(),
            table_name: entry.table_name.clone(),
            record_id: entry.record_id.clone(),
            changes: serde_json::to_string(&entry.changes)?,
            created_at: format_timestamp(&entry.created_at),
        })
    }
}

impl TryFrom<AuditLogDB> for AuditLogEntry {
    type Error = Error;

    fn try_from(db: AuditLogDB) -> Result<Self> {
        let changes = serde_json::from_str(&db.changes).map_err(|e| {
            Error::from(StorageError::Corrupt(format!(
                "audit_log.changes on {}: {}",
                db.id, e
            )))
        })?;
        Ok(Self {
            action: parse_enum(&db.action)?,
            created_at: parse_timestamp(&db.created_at, "audit_log.created_at")?,
            changes,
            id: db.id,
            entity_id: db.entity_id,
            actor_id: db.actor_id,
            table_name: db.table_name,
            record_id: db.record_id,
        })
    }
}
