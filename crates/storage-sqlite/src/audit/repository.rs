use chrono::{Days, NaiveDate};
use diesel::prelude::*;
use diesel::sqlite::Sqlite;
use std::sync::Arc;

use sharebook_core::audit::{
    AuditCursor, AuditLogEntry, AuditLogFilter, AuditRepositoryTrait, Pagination,
};
use sharebook_core::Result;

use super::model::AuditLogDB;
use crate::db::{get_connection, DbPool};
use crate::errors::IntoCore;
use crate::schema::audit_log;
use crate::utils::format_timestamp;

type BoxedAuditQuery<'a> = audit_log::BoxedQuery<'a, Sqlite>;

pub struct AuditRepository {
    pool: Arc<DbPool>,
}

impl AuditRepository {
    pub fn new(pool: Arc<DbPool>) -> Self {
        Self { pool }
    }
}

/// Midnight UTC of `day`, in the stored timestamp format.
fn day_start(day: NaiveDate) -> String {
    format_timestamp(&day.and_time(chrono::NaiveTime::MIN).and_utc())
}

fn filtered<'a>(entity_id: &'a str, filter: &'a AuditLogFilter) -> BoxedAuditQuery<'a> {
    let mut query = audit_log::table
        .filter(audit_log::entity_id.eq(entity_id))
        .into_boxed();

    if let Some(from) = filter.from_date {
        query = query.filter(audit_log::created_at.ge(day_start(from)));
    }
    if let Some(to) = filter.to_date {
        // Whole-day upper bound: everything before the next midnight.
        if let Some(next) = to.checked_add_days(Days::new(1)) {
            query = query.filter(audit_log::created_at.lt(day_start(next)));
        }
    }
    if let Some(actor) = filter.actor_id.as_deref() {
        query = query.filter(audit_log::actor_id.eq(actor));
    }
    if let Some(table) = filter.table_name.as_deref() {
        query = query.filter(audit_log::table_name.eq(table));
    }
    if let Some(record) = filter.record_id.as_deref() {
        query = query.filter(audit_log::record_id.eq(record));
    }
    if let Some(action) = filter.action {
        query = query.filter(audit_log::action.eq(action.as_str()));
    }
    query
}

impl AuditRepositoryTrait for AuditRepository {
    fn query(
        &self,
        entity_id: &str,
        filter: &AuditLogFilter,
        pagination: Pagination,
    ) -> Result<Vec<AuditLogEntry>> {
        let mut conn = get_connection(&self.pool)?;
        filtered(entity_id, filter)
            .order((audit_log::created_at.desc(), audit_log::id.desc()))
            .limit(pagination.limit)
            .offset(pagination.offset)
            .select(AuditLogDB::as_select())
            .load(&mut conn)
            .into_core()?
            .into_iter()
            .map(AuditLogEntry::try_from)
            .collect()
    }

    fn count(&self, entity_id: &str, filter: &AuditLogFilter) -> Result<i64> {
        let mut conn = get_connection(&self.pool)?;
        filtered(entity_id, filter)
            .count()
            .get_result(&mut conn)
            .into_core()
    }

    fn query_after(
        &self,
        entity_id: &str,
        filter: &AuditLogFilter,
        after: Option<&AuditCursor>,
        limit: i64,
    ) -> Result<Vec<AuditLogEntry>> {
        let mut conn = get_connection(&self.pool)?;
        let mut query = filtered(entity_id, filter);
        if let Some(cursor) = after {
            // Fixed-width timestamps compare correctly as text.
            let created_at = format_timestamp(&cursor.created_at);
            query = query.filter(
                audit_log::created_at.lt(created_at.clone()).or(audit_log::created_at
                    .eq(created_at)
                    .and(audit_log::id.lt(cursor.id.clone()))),
            );
        }
        query
            .order((audit_log::created_at.desc(), audit_log::id.desc()))
            .limit(limit)
            .select(AuditLogDB::as_select())
            .load(&mut conn)
            .into_core()?
            .into_iter()
            .map(AuditLogEntry::try_from)
            .collect()
    }
}
