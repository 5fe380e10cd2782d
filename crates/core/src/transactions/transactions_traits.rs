//! Transaction repository and service traits.

use async_trait::async_trait;

use super::transactions_model::{
    BulkCreateResult, NewBulkTransactions, NewTransaction, Transaction, TransactionUpdate,
};
use crate::errors::Result;

/// Read access to persisted transactions. Writes go through the unit of work.
pub trait TransactionRepositoryTrait: Send + Sync {
    fn get_by_id(&self, transaction_id: &str) -> Result<Option<Transaction>>;

    /// Lists the entity's transactions, optionally for one class, ordered by
    /// posted date, then creation time, then id.
    fn list_by_entity(
        &self,
        entity_id: &str,
        security_class_id: Option<&str>,
    ) -> Result<Vec<Transaction>>;
}

/// The ledger writer.
///
/// Every mutation takes the acting user; a missing actor is rejected with
/// `Unauthorized` before anything else is checked.
#[async_trait]
pub trait TransactionServiceTrait: Send + Sync {
    /// Validates and records one transaction together with its audit entry.
    ///
    /// With an idempotency key already used in the entity, the original
    /// transaction is returned and nothing is written.
    async fn create_transaction(
        &self,
        actor_id: Option<String>,
        new_transaction: NewTransaction,
    ) -> Result<Transaction>;

    /// Records every line item or none of them.
    async fn create_transactions_bulk(
        &self,
        actor_id: Option<String>,
        request: NewBulkTransactions,
    ) -> Result<BulkCreateResult>;

    /// Applies a sparse correction, recomputing all totals.
    async fn update_transaction(
        &self,
        actor_id: Option<String>,
        transaction_id: &str,
        patch: TransactionUpdate,
    ) -> Result<Transaction>;

    async fn delete_transaction(&self, actor_id: Option<String>, transaction_id: &str)
        -> Result<()>;

    fn get_transaction(&self, transaction_id: &str) -> Result<Transaction>;

    fn list_transactions(
        &self,
        entity_id: &str,
        security_class_id: Option<&str>,
    ) -> Result<Vec<Transaction>>;
}
