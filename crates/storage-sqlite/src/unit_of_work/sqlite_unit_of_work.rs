use diesel::prelude::*;
use diesel::SqliteConnection;
use log::debug;
use std::collections::HashSet;

use sharebook_core::audit::{AuditLogEntry, AuditSink};
use sharebook_core::entities::Entity;
use sharebook_core::members::Member;
use sharebook_core::securities::SecurityClass;
use sharebook_core::transactions::Transaction;
use sharebook_core::unit_of_work::LedgerUnitOfWork;
use sharebook_core::Result;

use crate::audit::AuditLogDB;
use crate::entities::EntityDB;
use crate::errors::IntoCore;
use crate::members::MemberDB;
use crate::schema::{audit_log, entities, members, security_classes, transactions};
use crate::securities::SecurityClassDB;
use crate::transactions::TransactionDB;
use crate::utils::chunk_for_sqlite;

/// Ledger reads and writes on a connection that is already inside a
/// transaction. Built by [`SqliteUnitOfWorkExecutor`](super::SqliteUnitOfWorkExecutor).
pub struct SqliteUnitOfWork<'a> {
    conn: &'a mut SqliteConnection,
}

impl<'a> SqliteUnitOfWork<'a> {
    pub fn new(conn: &'a mut SqliteConnection) -> Self {
        Self { conn }
    }
}

impl AuditSink for SqliteUnitOfWork<'_> {
    fn append_audit_entry(&mut self, entry: &AuditLogEntry) -> Result<()> {
        let row = AuditLogDB::try_from(entry)?;
        diesel::insert_into(audit_log::table)
            .values(&row)
            .execute(&mut *self.conn)
            .into_core()?;
        Ok(())
    }
}

impl LedgerUnitOfWork for SqliteUnitOfWork<'_> {
    fn find_entity(&mut self, entity_id: &str) -> Result<Option<Entity>> {
        entities::table
            .find(entity_id)
            .select(EntityDB::as_select())
            .first(&mut *self.conn)
            .optional()
            .into_core()?
            .map(Entity::try_from)
            .transpose()
    }

    fn insert_entity(&mut self, entity: &Entity) -> Result<()> {
        diesel::insert_into(entities::table)
            .values(EntityDB::from(entity))
            .execute(&mut *self.conn)
            .into_core()?;
        Ok(())
    }

    // The surrounding IMMEDIATE transaction already holds the database write
    // lock, which covers the class row.
    fn lock_security_class(&mut self, security_class_id: &str) -> Result<Option<SecurityClass>> {
        security_classes::table
            .find(security_class_id)
            .select(SecurityClassDB::as_select())
            .first(&mut *self.conn)
            .optional()
            .into_core()?
            .map(SecurityClass::try_from)
            .transpose()
    }

    fn find_security_class_by_name(
        &mut self,
        entity_id: &str,
        name: &str,
    ) -> Result<Option<SecurityClass>> {
        security_classes::table
            .filter(security_classes::entity_id.eq(entity_id))
            .filter(security_classes::name.eq(name))
            .select(SecurityClassDB::as_select())
            .first(&mut *self.conn)
            .optional()
            .into_core()?
            .map(SecurityClass::try_from)
            .transpose()
    }

    fn insert_security_class(&mut self, class: &SecurityClass) -> Result<()> {
        diesel::insert_into(security_classes::table)
            .values(SecurityClassDB::from(class))
            .execute(&mut *self.conn)
            .into_core()?;
        Ok(())
    }

    fn update_security_class(&mut self, class: &SecurityClass) -> Result<()> {
        let row = SecurityClassDB::from(class);
        diesel::update(security_classes::table.find(&class.id))
            .set(&row)
            .execute(&mut *self.conn)
            .into_core()?;
        Ok(())
    }

    fn find_member(&mut self, member_id: &str) -> Result<Option<Member>> {
        members::table
            .find(member_id)
            .select(MemberDB::as_select())
            .first(&mut *self.conn)
            .optional()
            .into_core()?
            .map(Member::try_from)
            .transpose()
    }

    fn find_member_by_number(
        &mut self,
        entity_id: &str,
        member_number: &str,
    ) -> Result<Option<Member>> {
        members::table
            .filter(members::entity_id.eq(entity_id))
            .filter(members::member_number.eq(member_number))
            .select(MemberDB::as_select())
            .first(&mut *self.conn)
            .optional()
            .into_core()?
            .map(Member::try_from)
            .transpose()
    }

    fn find_existing_member_ids(
        &mut self,
        entity_id: &str,
        member_ids: &[String],
    ) -> Result<HashSet<String>> {
        let mut found = HashSet::with_capacity(member_ids.len());
        for chunk in chunk_for_sqlite(member_ids) {
            let ids: Vec<String> = members::table
                .filter(members::entity_id.eq(entity_id))
                .filter(members::id.eq_any(chunk))
                .select(members::id)
                .load(&mut *self.conn)
                .into_core()?;
            found.extend(ids);
        }
        debug!(
            "Member lookup in {}: {} of {} found",
            entity_id,
            found.len(),
            member_ids.len()
        );
        Ok(found)
    }

    fn count_member_references(&mut self, member_id: &str) -> Result<i64> {
        transactions::table
            .filter(
                transactions::from_member_id
                    .eq(member_id)
                    .or(transactions::to_member_id.eq(member_id)),
            )
            .count()
            .get_result(&mut *self.conn)
            .into_core()
    }

    fn insert_member(&mut self, member: &Member) -> Result<()> {
        diesel::insert_into(members::table)
            .values(MemberDB::from(member))
            .execute(&mut *self.conn)
            .into_core()?;
        Ok(())
    }

    fn delete_member(&mut self, member_id: &str) -> Result<()> {
        diesel::delete(members::table.find(member_id))
            .execute(&mut *self.conn)
            .into_core()?;
        Ok(())
    }

    fn find_transaction(&mut self, transaction_id: &str) -> Result<Option<Transaction>> {
        transactions::table
            .find(transaction_id)
            .select(TransactionDB::as_select())
            .first(&mut *self.conn)
            .optional()
            .into_core()?
            .map(Transaction::try_from)
            .transpose()
    }

    fn find_transaction_by_idempotency_key(
        &mut self,
        entity_id: &str,
        idempotency_key: &str,
    ) -> Result<Option<Transaction>> {
        transactions::table
            .filter(transactions::entity_id.eq(entity_id))
            .filter(transactions::idempotency_key.eq(idempotency_key))
            .select(TransactionDB::as_select())
            .first(&mut *self.conn)
            .optional()
            .into_core()?
            .map(Transaction::try_from)
            .transpose()
    }

    fn insert_transaction(&mut self, transaction: &Transaction) -> Result<()> {
        let row = TransactionDB::try_from(transaction)?;
        diesel::insert_into(transactions::table)
            .values(&row)
            .execute(&mut *self.conn)
            .into_core()?;
        Ok(())
    }

    fn update_transaction(&mut self, transaction: &Transaction) -> Result<()> {
        let row = TransactionDB::try_from(transaction)?;
        diesel::update(transactions::table.find(&transaction.id))
            .set(&row)
            .execute(&mut *self.conn)
            .into_core()?;
        Ok(())
    }

    fn delete_transaction(&mut self, transaction_id: &str) -> Result<()> {
        diesel::delete(transactions::table.find(transaction_id))
            .execute(&mut *self.conn)
            .into_core()?;
        Ok(())
    }
}
