use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use std::sync::Arc;
use uuid::Uuid;

use super::transactions_errors::LedgerError;
use super::transactions_model::{
    BulkCreateResult, NewBulkTransactions, NewTransaction, Transaction, TransactionUpdate,
    TRACKED_UPDATE_FIELDS,
};
use super::transactions_traits::{TransactionRepositoryTrait, TransactionServiceTrait};
use super::transactions_validator::{
    check_security_class, missing_member_ids, referenced_member_ids, validate_corrected,
    validate_new_transaction,
};
use crate::audit::{
    changed_fields, log_create, log_delete, log_record_changes, AuditAction, AuditSnapshot,
};
use crate::config::RegistryConfig;
use crate::constants::TABLE_TRANSACTIONS;
use crate::errors::Result;
use crate::unit_of_work::{
    require_actor, run_in_unit_of_work, LedgerUnitOfWork, UnitOfWorkExecutor,
};
use crate::utils::compute_total;

/// Ledger writer backed by a unit-of-work executor.
pub struct TransactionService {
    repository: Arc<dyn TransactionRepositoryTrait>,
    executor: Arc<dyn UnitOfWorkExecutor>,
    config: RegistryConfig,
}

impl TransactionService {
    pub fn new(
        repository: Arc<dyn TransactionRepositoryTrait>,
        executor: Arc<dyn UnitOfWorkExecutor>,
        config: RegistryConfig,
    ) -> Self {
        Self {
            repository,
            executor,
            config,
        }
    }
}

/// Recomputes every derived total from the per-security amounts.
fn with_totals(mut transaction: Transaction) -> Result<Transaction> {
    transaction.total_amount_paid =
        compute_total(transaction.amount_paid_per_security, transaction.quantity)?;
    transaction.total_amount_unpaid =
        compute_total(transaction.amount_unpaid_per_security, transaction.quantity)?;
    transaction.total_transfer_amount =
        compute_total(transaction.transfer_price_per_security, transaction.quantity)?;
    Ok(transaction)
}

fn build_transaction(
    new: NewTransaction,
    config: &RegistryConfig,
    actor: &str,
    now: DateTime<Utc>,
) -> Result<Transaction> {
    with_totals(Transaction {
        id: Uuid::new_v4().to_string(),
        currency: config.currency_or_default(new.currency.as_deref()),
        entity_id: new.entity_id,
        security_class_id: new.security_class_id,
        transaction_type: new.transaction_type,
        quantity: new.quantity,
        amount_paid_per_security: new.amount_paid_per_security,
        amount_unpaid_per_security: new.amount_unpaid_per_security,
        transfer_price_per_security: new.transfer_price_per_security,
        total_amount_paid: None,
        total_amount_unpaid: None,
        total_transfer_amount: None,
        from_member_id: new.from_member_id,
        to_member_id: new.to_member_id,
        tranche_number: new.tranche_number,
        tranche_sequence: new.tranche_sequence,
        posted_date: new.posted_date.unwrap_or(now),
        settlement_date: new.settlement_date,
        status: new.status.unwrap_or_default(),
        reference: new.reference,
        description: new.description,
        certificate_number: new.certificate_number,
        idempotency_key: new.idempotency_key,
        created_by: actor.to_string(),
        created_at: now,
        updated_at: now,
    })
}

/// Entity, class and member checks run inside the unit of work, before
/// the first write.
fn check_references(
    uow: &mut dyn LedgerUnitOfWork,
    entity_id: &str,
    security_class_id: &str,
    member_ids: &[String],
) -> Result<()> {
    if uow.find_entity(entity_id)?.is_none() {
        return Err(LedgerError::EntityNotFound(entity_id.to_string()).into());
    }
    let class = uow.lock_security_class(security_class_id)?;
    check_security_class(class, entity_id, security_class_id)?;

    if !member_ids.is_empty() {
        let existing = uow.find_existing_member_ids(entity_id, member_ids)?;
        let missing = missing_member_ids(member_ids, &existing);
        if !missing.is_empty() {
            return Err(LedgerError::MemberNotFound(missing).into());
        }
    }
    Ok(())
}

fn insert_with_audit(
    uow: &mut dyn LedgerUnitOfWork,
    transaction: &Transaction,
) -> Result<()> {
    uow.insert_transaction(transaction)?;
    log_create(
        uow,
        &transaction.entity_id,
        &transaction.created_by,
        TABLE_TRANSACTIONS,
        &transaction.id,
        transaction.audit_fields(),
    )?;
    Ok(())
}

/// Loads a transaction for correction or deletion; its class must still be writable.
fn load_writable(uow: &mut dyn LedgerUnitOfWork, transaction_id: &str) -> Result<Transaction> {
    let existing = uow
        .find_transaction(transaction_id)?
        .ok_or_else(|| LedgerError::TransactionNotFound(transaction_id.to_string()))?;
    let class = uow.lock_security_class(&existing.security_class_id)?;
    check_security_class(class, &existing.entity_id, &existing.security_class_id)?;
    Ok(existing)
}

#[async_trait]
impl TransactionServiceTrait for TransactionService {
    async fn create_transaction(
        &self,
        actor_id: Option<String>,
        new_transaction: NewTransaction,
    ) -> Result<Transaction> {
        let actor = require_actor(actor_id)?;
        let new = new_transaction.normalized();
        if let Err(e) = validate_new_transaction(&new) {
            warn!("Rejected {} transaction: {}", new.transaction_type, e);
            return Err(e);
        }

        let config = self.config.clone();
        let (transaction, created) = run_in_unit_of_work(self.executor.as_ref(), move |uow| {
            if let Some(key) = new.idempotency_key.as_deref() {
                if let Some(existing) =
                    uow.find_transaction_by_idempotency_key(&new.entity_id, key)?
                {
                    return Ok((existing, false));
                }
            }
            let member_ids = referenced_member_ids([(
                new.from_member_id.as_deref(),
                new.to_member_id.as_deref(),
            )]);
            check_references(uow, &new.entity_id, &new.security_class_id, &member_ids)?;

            let transaction = build_transaction(new, &config, &actor, Utc::now())?;
            insert_with_audit(uow, &transaction)?;
            Ok((transaction, true))
        })
        .await?;

        if created {
            info!(
                "Recorded {} {} of class {} ({})",
                transaction.transaction_type,
                transaction.quantity,
                transaction.security_class_id,
                transaction.id
            );
        } else {
            debug!(
                "Idempotent replay returned existing transaction {}",
                transaction.id
            );
        }
        Ok(transaction)
    }

    async fn create_transactions_bulk(
        &self,
        actor_id: Option<String>,
        request: NewBulkTransactions,
    ) -> Result<BulkCreateResult> {
        let actor = require_actor(actor_id)?;
        let entity_id = request.entity_id.trim().to_string();
        let security_class_id = request.security_class_id.trim().to_string();
        let lines = request.into_transactions()?;
        for (index, line) in lines.iter().enumerate() {
            if let Err(e) = validate_new_transaction(line) {
                warn!("Rejected bulk request: line item {} {}", index + 1, e);
                return Err(e);
            }
        }

        let config = self.config.clone();
        let created = run_in_unit_of_work(self.executor.as_ref(), move |uow| {
            let member_ids = referenced_member_ids(
                lines
                    .iter()
                    .map(|l| (l.from_member_id.as_deref(), l.to_member_id.as_deref())),
            );
            check_references(uow, &entity_id, &security_class_id, &member_ids)?;

            let now = Utc::now();
            let mut created = Vec::with_capacity(lines.len());
            for line in lines {
                let transaction = build_transaction(line, &config, &actor, now)?;
                insert_with_audit(uow, &transaction)?;
                created.push(transaction);
            }
            Ok(created)
        })
        .await?;

        info!("Recorded bulk batch of {} transactions", created.len());
        Ok(BulkCreateResult {
            count: created.len(),
            created,
        })
    }

    async fn update_transaction(
        &self,
        actor_id: Option<String>,
        transaction_id: &str,
        patch: TransactionUpdate,
    ) -> Result<Transaction> {
        let actor = require_actor(actor_id)?;
        let id = transaction_id.to_string();

        let (transaction, changed) = run_in_unit_of_work(self.executor.as_ref(), move |uow| {
            let existing = load_writable(uow, &id)?;
            let next = with_totals(patch.apply_to(&existing))?;
            validate_corrected(&next)?;

            let changes = changed_fields(
                &existing.audit_fields(),
                &next.audit_fields(),
                TRACKED_UPDATE_FIELDS,
            );
            if changes.is_empty() {
                return Ok((existing, 0));
            }

            let member_ids = referenced_member_ids([(
                next.from_member_id.as_deref(),
                next.to_member_id.as_deref(),
            )]);
            let existing_ids = uow.find_existing_member_ids(&next.entity_id, &member_ids)?;
            let missing = missing_member_ids(&member_ids, &existing_ids);
            if !missing.is_empty() {
                return Err(LedgerError::MemberNotFound(missing).into());
            }

            let next = Transaction {
                updated_at: Utc::now(),
                ..next
            };
            let changed = changes.len();
            uow.update_transaction(&next)?;
            log_record_changes(
                uow,
                &next.entity_id,
                &actor,
                AuditAction::Update,
                TABLE_TRANSACTIONS,
                &next.id,
                changes,
            )?;
            Ok((next, changed))
        })
        .await?;

        if changed == 0 {
            debug!("Update of transaction {} changed nothing", transaction.id);
        } else {
            info!(
                "Updated transaction {} ({} field(s) changed)",
                transaction.id, changed
            );
        }
        Ok(transaction)
    }

    async fn delete_transaction(
        &self,
        actor_id: Option<String>,
        transaction_id: &str,
    ) -> Result<()> {
        let actor = require_actor(actor_id)?;
        let id = transaction_id.to_string();

        run_in_unit_of_work(self.executor.as_ref(), move |uow| {
            let existing = load_writable(uow, &id)?;
            uow.delete_transaction(&existing.id)?;
            log_delete(
                uow,
                &existing.entity_id,
                &actor,
                TABLE_TRANSACTIONS,
                &existing.id,
                existing.audit_fields(),
            )?;
            Ok(())
        })
        .await?;

        info!("Deleted transaction {}", transaction_id);
        Ok(())
    }

    fn get_transaction(&self, transaction_id: &str) -> Result<Transaction> {
        self.repository
            .get_by_id(transaction_id)?
            .ok_or_else(|| LedgerError::TransactionNotFound(transaction_id.to_string()).into())
    }

    fn list_transactions(
        &self,
        entity_id: &str,
        security_class_id: Option<&str>,
    ) -> Result<Vec<Transaction>> {
        self.repository.list_by_entity(entity_id, security_class_id)
    }
}
