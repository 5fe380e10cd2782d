//! Audit domain models.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::str::FromStr;

use crate::constants::{DEFAULT_AUDIT_PAGE_SIZE, MAX_AUDIT_PAGE_SIZE};
use crate::utils::serde_formats::timestamp_format;

/// Kind of mutation an audit entry describes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuditAction {
    Create,
    Update,
    Delete,
}

impl AuditAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditAction::Create => "CREATE",
            AuditAction::Update => "UPDATE",
            AuditAction::Delete => "DELETE",
        }
    }
}

impl FromStr for AuditAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "CREATE" => Ok(AuditAction::Create),
            "UPDATE" => Ok(AuditAction::Update),
            "DELETE" => Ok(AuditAction::Delete),
            other => Err(format!("Unknown audit action: {}", other)),
        }
    }
}

/// Field name to JSON value, the schema-free view of a record
pub type FieldMap = BTreeMap<String, Value>;

/// Before/after values of one field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldChange {
    pub old: Value,
    pub new: Value,
}

/// Changed fields keyed by field name
pub type FieldChanges = BTreeMap<String, FieldChange>;

/// Records that can be captured in the audit log.
pub trait AuditSnapshot {
    /// Every audited field of the record, with decimals normalised for comparison.
    fn audit_fields(&self) -> FieldMap;
}

/// An immutable audit log entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditLogEntry {
    pub id: String,
    pub entity_id: String,
    pub actor_id: String,
    pub action: AuditAction,
    pub table_name: String,
    pub record_id: String,
    pub changes: FieldChanges,
    #[serde(with = "timestamp_format")]
    pub created_at: DateTime<Utc>,
}

/// Filters for audit log queries. Dates are inclusive whole days (UTC).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditLogFilter {
    pub from_date: Option<NaiveDate>,
    pub to_date: Option<NaiveDate>,
    pub actor_id: Option<String>,
    pub table_name: Option<String>,
    pub record_id: Option<String>,
    pub action: Option<AuditAction>,
}

impl AuditLogFilter {
    /// Returns true when `entry` passes every filter.
    pub fn matches(&self, entry: &AuditLogEntry) -> bool {
        let day = entry.created_at.date_naive();
        self.from_date.map_or(true, |from| day >= from)
            && self.to_date.map_or(true, |to| day <= to)
            && self.actor_id.as_deref().map_or(true, |a| entry.actor_id == a)
            && self.table_name.as_deref().map_or(true, |t| entry.table_name == t)
            && self.record_id.as_deref().map_or(true, |r| entry.record_id == r)
            && self.action.map_or(true, |a| entry.action == a)
    }
}

/// Limit/offset pagination
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub limit: i64,
    pub offset: i64,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            limit: DEFAULT_AUDIT_PAGE_SIZE,
            offset: 0,
        }
    }
}

impl Pagination {
    pub fn new(limit: Option<i64>, offset: Option<i64>) -> Self {
        Self {
            limit: limit.unwrap_or(DEFAULT_AUDIT_PAGE_SIZE),
            offset: offset.unwrap_or(0),
        }
        .clamped()
    }

    /// Clamps limit to `1..=MAX_AUDIT_PAGE_SIZE` and offset to non-negative.
    pub fn clamped(self) -> Self {
        Self {
            limit: self.limit.clamp(1, MAX_AUDIT_PAGE_SIZE),
            offset: self.offset.max(0),
        }
    }
}

/// Position after an entry in newest-first order.
///
/// Keyset paging from a cursor is stable while new entries are appended:
/// they sort ahead of every cursor taken before them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditCursor {
    pub created_at: DateTime<Utc>,
    pub id: String,
}

impl AuditCursor {
    pub fn after(entry: &AuditLogEntry) -> Self {
        Self {
            created_at: entry.created_at,
            id: entry.id.clone(),
        }
    }

    /// True when `entry` sorts strictly after this cursor (older, or same
    /// instant with a smaller id).
    pub fn precedes(&self, entry: &AuditLogEntry) -> bool {
        (entry.created_at, entry.id.as_str()) < (self.created_at, self.id.as_str())
    }
}

/// One page of audit entries plus the size of the filtered set
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditLogPage {
    pub entries: Vec<AuditLogEntry>,
    pub total: i64,
    pub limit: i64,
    pub offset: i64,
}
