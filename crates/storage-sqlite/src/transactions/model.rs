//! Database models for ledger transactions.
//!
//! Amounts are stored as decimal TEXT and read back exactly; timestamps use
//! the fixed-width UTC form from [`crate::utils::format_timestamp`].

use diesel::prelude::*;
use sharebook_core::errors::ValidationError;
use sharebook_core::transactions::Transaction;
use sharebook_core::{Error, Result};

use crate::errors::StorageError;
use crate::utils::{
    format_decimal, format_optional_timestamp, format_timestamp, parse_decimal, parse_enum,
    parse_optional_timestamp, parse_timestamp,
};

#[derive(Queryable, Selectable, Insertable, AsChangeset, Identifiable, Debug, Clone)]
#[diesel(table_name = crate::schema::transactions)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[diesel(treat_none_as_null = true)]
pub struct TransactionDB {
    pub id: String,
    pub entity_id: String,
    pub security_class_id: String,
    pub transaction_type: String,
    pub quantity: i64,
    pub amount_paid_per_security: Option<String>,
    pub amount_unpaid_per_security: Option<String>,
    pub transfer_price_per_security: Option<String>,
    pub currency: String,
    pub total_amount_paid: Option<String>,
    pub total_amount_unpaid: Option<String>,
    pub total_transfer_amount: Option<String>,
    pub from_member_id: Option<String>,
    pub to_member_id: Option<String>,
    pub tranche_number: Option<String>,
    pub tranche_sequence: Option<i32>,
    pub posted_date: String,
    pub settlement_date: Option<String>,
    pub status: String,
    pub reference: Option<String>,
    pub description: Option<String>,
    pub certificate_number: Option<String>,
    pub idempotency_key: Option<String>,
    pub created_by: String,
    pub created_at: String,
    pub updated_at: String,
}

impl TryFrom<&Transaction> for TransactionDB {
    type Error = Error;

    fn try_from(tx: &Transaction) -> Result<Self> {
        let quantity = i64::try_from(tx.quantity)
            .map_err(|_| Error::Validation(ValidationError::Overflow("quantity".to_string())))?;
        Ok(Self {
            id: tx.id.clone(),
            entity_id: tx.entity_id.clone(),
            security_class_id: tx.security_class_id.clone(),
            transaction_type: tx.transaction_type.as_str().to_string(),
            quantity,
            amount_paid_per_security: format_decimal(&tx.amount_paid_per_security),
            amount_unpaid_per_security: format_decimal(&tx.amount_unpaid_per_security),
            transfer_price_per_security: format_decimal(&tx.transfer_price_per_security),
            currency: tx.currency.clone(),
            total_amount_paid: format_decimal(&tx.total_amount_paid),
            total_amount_unpaid: format_decimal(&tx.total_amount_unpaid),
            total_transfer_amount: format_decimal(&tx.total_transfer_amount),
            from_member_id: tx.from_member_id.clone(),
            to_member_id: tx.to_member_id.clone(),
            tranche_number: tx.tranche_number.clone(),
            tranche_sequence: tx.tranche_sequence,
            posted_date: format_timestamp(&tx.posted_date),
            settlement_date: format_optional_timestamp(&tx.settlement_date),
            status: tx.status.as_str().to_string(),
            reference: tx.reference.clone(),
            description: tx.description.clone(),
            certificate_number: tx.certificate_number.clone(),
            idempotency_key: tx.idempotency_key.clone(),
            created_by: tx.created_by.clone(),
            created_at: format_timestamp(&tx.created_at),
            updated_at: format_timestamp(&tx.updated_at),
        })
    }
}

impl TryFrom<TransactionDB> for Transaction {
    type Error = Error;

    fn try_from(db: TransactionDB) -> Result<Self> {
        let quantity = u64::try_from(db.quantity).map_err(|_| {
            Error::from(StorageError::Corrupt(format!(
                "transactions.quantity {} on {}",
                db.quantity, db.id
            )))
        })?;
        Ok(Self {
            transaction_type: parse_enum(&db.transaction_type)?,
            quantity,
            amount_paid_per_security: parse_decimal(
                db.amount_paid_per_security.as_deref(),
                "amount_paid_per_security",
            )?,
            amount_unpaid_per_security: parse_decimal(
                db.amount_unpaid_per_security.as_deref(),
                "amount_unpaid_per_security",
            )?,
            transfer_price_per_security: parse_decimal(
                db.transfer_price_per_security.as_deref(),
                "transfer_price_per_security",
            )?,
            total_amount_paid: parse_decimal(db.total_amount_paid.as_deref(), "total_amount_paid")?,
            total_amount_unpaid: parse_decimal(
                db.total_amount_unpaid.as_deref(),
                "total_amount_unpaid",
            )?,
            total_transfer_amount: parse_decimal(
                db.total_transfer_amount.as_deref(),
                "total_transfer_amount",
            )?,
            posted_date: parse_timestamp(&db.posted_date, "posted_date")?,
            settlement_date: parse_optional_timestamp(
                db.settlement_date.as_deref(),
                "settlement_date",
            )?,
            status: parse_enum(&db.status)?,
            created_at: parse_timestamp(&db.created_at, "transactions.created_at")?,
            updated_at: parse_timestamp(&db.updated_at, "transactions.updated_at")?,
            id: db.id,
            entity_id: db.entity_id,
            security_class_id: db.security_class_id,
            currency: db.currency,
            from_member_id: db.from_member_id,
            to_member_id: db.to_member_id,
            tranche_number: db.tranche_number,
            tranche_sequence: db.tranche_sequence,
            reference: db.reference,
            description: db.description,
            certificate_number: db.certificate_number,
            idempotency_key: db.idempotency_key,
            created_by: db.created_by,
        })
    }
}
