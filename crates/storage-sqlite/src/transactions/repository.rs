use diesel::prelude::*;
use std::sync::Arc;

use sharebook_core::transactions::{Transaction, TransactionRepositoryTrait};
use sharebook_core::Result;

use super::model::TransactionDB;
use crate::db::{get_connection, DbPool};
use crate::errors::IntoCore;
use crate::schema::transactions;

pub struct TransactionRepository {
    pool: Arc<DbPool>,
}

impl TransactionRepository {
    pub fn new(pool: Arc<DbPool>) -> Self {
        Self { pool }
    }
}

impl TransactionRepositoryTrait for TransactionRepository {
    fn get_by_id(&self, transaction_id: &str) -> Result<Option<Transaction>> {
        let mut conn = get_connection(&self.pool)?;
        transactions::table
            .find(transaction_id)
            .select(TransactionDB::as_select())
            .first(&mut conn)
            .optional()
            .into_core()?
            .map(Transaction::try_from)
            .transpose()
    }

    /// Ledger order: posted date, then creation time, then id.
    fn list_by_entity(
        &self,
        entity_id: &str,
        security_class_id: Option<&str>,
    ) -> Result<Vec<Transaction>> {
        let mut conn = get_connection(&self.pool)?;
        let mut query = transactions::table
            .filter(transactions::entity_id.eq(entity_id))
            .into_boxed();
        if let Some(class_id) = security_class_id {
            query = query.filter(transactions::security_class_id.eq(class_id));
        }
        query
            .order((
                transactions::posted_date.asc(),
                transactions::created_at.asc(),
                transactions::id.asc(),
            ))
            .select(TransactionDB::as_select())
            .load(&mut conn)
            .into_core()?
            .into_iter()
            .map(Transaction::try_from)
            .collect()
    }
}
