//! In-memory register used by the core tests.
//!
//! Each job runs against the live state; the state is snapshotted first and
//! restored when the job fails, which gives the same all-or-nothing outcome
//! as a database transaction.

use async_trait::async_trait;
use std::collections::{BTreeMap, HashSet};
use std::sync::Mutex;

use super::{LedgerUnitOfWork, UnitOfWorkExecutor, UnitOfWorkJob, UnitOfWorkOutput};
use crate::audit::{
    AuditCursor, AuditLogEntry, AuditLogFilter, AuditRepositoryTrait, AuditSink, Pagination,
};
use crate::entities::{Entity, EntityRepositoryTrait};
use crate::errors::{DatabaseError, Error, Result};
use crate::members::{Member, MemberRepositoryTrait};
use crate::securities::{SecurityClass, SecurityClassRepositoryTrait};
use crate::transactions::{Transaction, TransactionRepositoryTrait};

#[derive(Debug, Clone, Default)]
pub struct LedgerState {
    pub entities: BTreeMap<String, Entity>,
    pub classes: BTreeMap<String, SecurityClass>,
    pub members: BTreeMap<String, Member>,
    pub transactions: BTreeMap<String, Transaction>,
    pub audit: Vec<AuditLogEntry>,
    /// Fail the n-th transaction insert (1-based) of the next jobs.
    pub fail_transaction_insert_at: Option<usize>,
    pub fail_audit_writes: bool,
    inserts_seen: usize,
}

impl AuditSink for LedgerState {
    fn append_audit_entry(&mut self, entry: &AuditLogEntry) -> Result<()> {
        if self.fail_audit_writes {
            return Err(DatabaseError::QueryFailed("audit_log is read-only".to_string()).into());
        }
        self.audit.push(entry.clone());
        Ok(())
    }
}

impl LedgerUnitOfWork for LedgerState {
    fn find_entity(&mut self, entity_id: &str) -> Result<Option<Entity>> {
        Ok(self.entities.get(entity_id).cloned())
    }

    fn insert_entity(&mut self, entity: &Entity) -> Result<()> {
        self.entities.insert(entity.id.clone(), entity.clone());
        Ok(())
    }

    fn lock_security_class(&mut self, security_class_id: &str) -> Result<Option<SecurityClass>> {
        Ok(self.classes.get(security_class_id).cloned())
    }

    fn find_security_class_by_name(
        &mut self,
        entity_id: &str,
        name: &str,
    ) -> Result<Option<SecurityClass>> {
        Ok(self
            .classes
            .values()
            .find(|c| c.entity_id == entity_id && c.name == name)
            .cloned())
    }

    fn insert_security_class(&mut self, class: &SecurityClass) -> Result<()> {
        self.classes.insert(class.id.clone(), class.clone());
        Ok(())
    }

    fn update_security_class(&mut self, class: &SecurityClass) -> Result<()> {
        self.classes.insert(class.id.clone(), class.clone());
        Ok(())
    }

    fn find_member(&mut self, member_id: &str) -> Result<Option<Member>> {
        Ok(self.members.get(member_id).cloned())
    }

    fn find_member_by_number(
        &mut self,
        entity_id: &str,
        member_number: &str,
    ) -> Result<Option<Member>> {
        Ok(self
            .members
            .values()
            .find(|m| m.entity_id == entity_id && m.member_number.as_deref() == Some(member_number))
            .cloned())
    }

    fn find_existing_member_ids(
        &mut self,
        entity_id: &str,
        member_ids: &[String],
    ) -> Result<HashSet<String>> {
        Ok(member_ids
            .iter()
            .filter(|id| {
                self.members
                    .get(*id)
                    .is_some_and(|m| m.entity_id == entity_id)
            })
            .cloned()
            .collect())
    }

    fn count_member_references(&mut self, member_id: &str) -> Result<i64> {
        Ok(self
            .transactions
            .values()
            .filter(|t| {
                t.from_member_id.as_deref() == Some(member_id)
                    || t.to_member_id.as_deref() == Some(member_id)
            })
            .count() as i64)
    }

    fn insert_member(&mut self, member: &Member) -> Result<()> {
        self.members.insert(member.id.clone(), member.clone());
        Ok(())
    }

    fn delete_member(&mut self, member_id: &str) -> Result<()> {
        self.members.remove(member_id);
        Ok(())
    }

    fn find_transaction(&mut self, transaction_id: &str) -> Result<Option<Transaction>> {
        Ok(self.transactions.get(transaction_id).cloned())
    }

    fn find_transaction_by_idempotency_key(
        &mut self,
        entity_id: &str,
        idempotency_key: &str,
    ) -> Result<Option<Transaction>> {
        Ok(self
            .transactions
            .values()
            .find(|t| {
                t.entity_id == entity_id && t.idempotency_key.as_deref() == Some(idempotency_key)
            })
            .cloned())
    }

    fn insert_transaction(&mut self, transaction: &Transaction) -> Result<()> {
        self.inserts_seen += 1;
        if self.fail_transaction_insert_at == Some(self.inserts_seen) {
            return Err(DatabaseError::QueryFailed("disk I/O error".to_string()).into());
        }
        self.transactions
            .insert(transaction.id.clone(), transaction.clone());
        Ok(())
    }

    fn update_transaction(&mut self, transaction: &Transaction) -> Result<()> {
        self.transactions
            .insert(transaction.id.clone(), transaction.clone());
        Ok(())
    }

    fn delete_transaction(&mut self, transaction_id: &str) -> Result<()> {
        self.transactions.remove(transaction_id);
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemoryLedger {
    state: Mutex<LedgerState>,
}

impl InMemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Direct access for seeding and assertions.
    pub fn with_state<R>(&self, f: impl FnOnce(&mut LedgerState) -> R) -> R {
        let mut state = self.state.lock().unwrap();
        f(&mut state)
    }

    pub fn audit_entries(&self) -> Vec<AuditLogEntry> {
        self.with_state(|s| s.audit.clone())
    }

    pub fn transaction_count(&self) -> usize {
        self.with_state(|s| s.transactions.len())
    }

    fn run(&self, job: UnitOfWorkJob) -> Result<UnitOfWorkOutput> {
        let mut state = self
            .state
            .lock()
            .map_err(|e| Error::Unexpected(e.to_string()))?;
        state.inserts_seen = 0;
        let snapshot = state.clone();
        let result = job(&mut *state);
        if result.is_err() {
            *state = snapshot;
        }
        result
    }
}

#[async_trait]
impl UnitOfWorkExecutor for InMemoryLedger {
    async fn execute_job(&self, job: UnitOfWorkJob) -> Result<UnitOfWorkOutput> {
        self.run(job)
    }
}

impl EntityRepositoryTrait for InMemoryLedger {
    fn get_by_id(&self, entity_id: &str) -> Result<Option<Entity>> {
        Ok(self.with_state(|s| s.entities.get(entity_id).cloned()))
    }

    fn list(&self) -> Result<Vec<Entity>> {
        Ok(self.with_state(|s| s.entities.values().cloned().collect()))
    }
}

impl SecurityClassRepositoryTrait for InMemoryLedger {
    fn get_by_id(&self, security_class_id: &str) -> Result<Option<SecurityClass>> {
        Ok(self.with_state(|s| s.classes.get(security_class_id).cloned()))
    }

    fn list_by_entity(
        &self,
        entity_id: &str,
        include_archived: bool,
    ) -> Result<Vec<SecurityClass>> {
        let mut classes: Vec<SecurityClass> = self.with_state(|s| {
            s.classes
                .values()
                .filter(|c| c.entity_id == entity_id && (include_archived || !c.is_archived))
                .cloned()
                .collect()
        });
        classes.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(classes)
    }
}

impl MemberRepositoryTrait for InMemoryLedger {
    fn get_by_id(&self, member_id: &str) -> Result<Option<Member>> {
        Ok(self.with_state(|s| s.members.get(member_id).cloned()))
    }

    fn list_by_entity(&self, entity_id: &str) -> Result<Vec<Member>> {
        let mut members: Vec<Member> = self.with_state(|s| {
            s.members
                .values()
                .filter(|m| m.entity_id == entity_id)
                .cloned()
                .collect()
        });
        members.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(members)
    }
}

impl TransactionRepositoryTrait for InMemoryLedger {
    fn get_by_id(&self, transaction_id: &str) -> Result<Option<Transaction>> {
        Ok(self.with_state(|s| s.transactions.get(transaction_id).cloned()))
    }

    fn list_by_entity(
        &self,
        entity_id: &str,
        security_class_id: Option<&str>,
    ) -> Result<Vec<Transaction>> {
        let mut transactions: Vec<Transaction> = self.with_state(|s| {
            s.transactions
                .values()
                .filter(|t| {
                    t.entity_id == entity_id
                        && security_class_id.map_or(true, |id| t.security_class_id == id)
                })
                .cloned()
                .collect()
        });
        transactions.sort_by(|a, b| {
            (a.posted_date, a.created_at, &a.id).cmp(&(b.posted_date, b.created_at, &b.id))
        });
        Ok(transactions)
    }
}

impl InMemoryLedger {
    fn audit_newest_first(&self, entity_id: &str, filter: &AuditLogFilter) -> Vec<AuditLogEntry> {
        let mut entries: Vec<AuditLogEntry> = self.with_state(|s| {
            s.audit
                .iter()
                .filter(|e| e.entity_id == entity_id && filter.matches(e))
                .cloned()
                .collect()
        });
        entries.sort_by(|a, b| (b.created_at, &b.id).cmp(&(a.created_at, &a.id)));
        entries
    }
}

impl AuditRepositoryTrait for InMemoryLedger {
    fn query(
        &self,
        entity_id: &str,
        filter: &AuditLogFilter,
        pagination: Pagination,
    ) -> Result<Vec<AuditLogEntry>> {
        Ok(self
            .audit_newest_first(entity_id, filter)
            .into_iter()
            .skip(pagination.offset as usize)
            .take(pagination.limit as usize)
            .collect())
    }

    fn count(&self, entity_id: &str, filter: &AuditLogFilter) -> Result<i64> {
        Ok(self.audit_newest_first(entity_id, filter).len() as i64)
    }

    fn query_after(
        &self,
        entity_id: &str,
        filter: &AuditLogFilter,
        after: Option<&AuditCursor>,
        limit: i64,
    ) -> Result<Vec<AuditLogEntry>> {
        Ok(self
            .audit_newest_first(entity_id, filter)
            .into_iter()
            .filter(|e| after.map_or(true, |cursor| cursor.precedes(e)))
            .take(limit.max(0) as usize)
            .collect())
    }
}
