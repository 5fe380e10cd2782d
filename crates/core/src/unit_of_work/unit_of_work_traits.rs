use async_trait::async_trait;
use std::any::Any;
use std::collections::HashSet;

use crate::audit::AuditSink;
use crate::entities::Entity;
use crate::errors::{Error, Result};
use crate::members::Member;
use crate::securities::SecurityClass;
use crate::transactions::{LedgerError, Transaction};

/// Reads and writes available inside one atomic scope.
///
/// Implementations serialise units of work that touch the same security
/// class, so a class read through [`lock_security_class`] cannot be archived
/// by a concurrent writer before this unit of work commits.
///
/// [`lock_security_class`]: LedgerUnitOfWork::lock_security_class
pub trait LedgerUnitOfWork: AuditSink {
    fn find_entity(&mut self, entity_id: &str) -> Result<Option<Entity>>;
    fn insert_entity(&mut self, entity: &Entity) -> Result<()>;

    /// Reads the class and holds the write lock on it until the unit of work ends.
    fn lock_security_class(&mut self, security_class_id: &str) -> Result<Option<SecurityClass>>;
    fn find_security_class_by_name(
        &mut self,
        entity_id: &str,
        name: &str,
    ) -> Result<Option<SecurityClass>>;
    fn insert_security_class(&mut self, class: &SecurityClass) -> Result<()>;
    fn update_security_class(&mut self, class: &SecurityClass) -> Result<()>;

    fn find_member(&mut self, member_id: &str) -> Result<Option<Member>>;
    fn find_member_by_number(
        &mut self,
        entity_id: &str,
        member_number: &str,
    ) -> Result<Option<Member>>;
    /// Returns the subset of `member_ids` that exist in `entity_id`, in one lookup.
    fn find_existing_member_ids(
        &mut self,
        entity_id: &str,
        member_ids: &[String],
    ) -> Result<HashSet<String>>;
    /// Number of transactions naming the member on either side.
    fn count_member_references(&mut self, member_id: &str) -> Result<i64>;
    fn insert_member(&mut self, member: &Member) -> Result<()>;
    fn delete_member(&mut self, member_id: &str) -> Result<()>;

    fn find_transaction(&mut self, transaction_id: &str) -> Result<Option<Transaction>>;
    fn find_transaction_by_idempotency_key(
        &mut self,
        entity_id: &str,
        idempotency_key: &str,
    ) -> Result<Option<Transaction>>;
    fn insert_transaction(&mut self, transaction: &Transaction) -> Result<()>;
    fn update_transaction(&mut self, transaction: &Transaction) -> Result<()>;
    fn delete_transaction(&mut self, transaction_id: &str) -> Result<()>;
}

pub type UnitOfWorkOutput = Box<dyn Any + Send>;

/// A type-erased unit of work job.
pub type UnitOfWorkJob =
    Box<dyn FnOnce(&mut dyn LedgerUnitOfWork) -> Result<UnitOfWorkOutput> + Send + 'static>;

/// Runs jobs atomically: all effects of a job commit if it returns `Ok`,
/// none do if it returns `Err`.
#[async_trait]
pub trait UnitOfWorkExecutor: Send + Sync {
    async fn execute_job(&self, job: UnitOfWorkJob) -> Result<UnitOfWorkOutput>;
}

/// Typed wrapper over [`UnitOfWorkExecutor::execute_job`].
pub async fn run_in_unit_of_work<F, T>(executor: &dyn UnitOfWorkExecutor, job: F) -> Result<T>
where
    F: FnOnce(&mut dyn LedgerUnitOfWork) -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    let erased: UnitOfWorkJob =
        Box::new(move |uow| job(uow).map(|value| Box::new(value) as UnitOfWorkOutput));
    let output = executor.execute_job(erased).await?;
    output
        .downcast::<T>()
        .map(|value| *value)
        .map_err(|_| Error::Unexpected("Unit of work returned an unexpected type".to_string()))
}

/// Resolves the acting user; mutations without one are rejected.
pub fn require_actor(actor_id: Option<String>) -> Result<String> {
    actor_id
        .map(|a| a.trim().to_string())
        .filter(|a| !a.is_empty())
        .ok_or_else(|| LedgerError::Unauthorized.into())
}
