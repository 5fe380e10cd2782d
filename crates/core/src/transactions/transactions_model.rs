//! Transaction domain models.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::fmt;
use std::str::FromStr;

use crate::audit::{AuditSnapshot, FieldMap};
use crate::utils::decimal_field_value;
use crate::utils::serde_formats::{
    optional_decimal_format, optional_timestamp_format, patch_decimal_format, patch_format,
    patch_timestamp_format, timestamp_format,
};
use crate::{errors::ValidationError, Error, Result};

/// Kind of ledger movement. Determines which member references are allowed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionType {
    Issue,
    Transfer,
    Cancellation,
    Redemption,
    ReturnOfCapital,
    CapitalCall,
}

impl TransactionType {
    pub const ALL: [TransactionType; 6] = [
        TransactionType::Issue,
        TransactionType::Transfer,
        TransactionType::Cancellation,
        TransactionType::Redemption,
        TransactionType::ReturnOfCapital,
        TransactionType::CapitalCall,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Issue => "ISSUE",
            TransactionType::Transfer => "TRANSFER",
            TransactionType::Cancellation => "CANCELLATION",
            TransactionType::Redemption => "REDEMPTION",
            TransactionType::ReturnOfCapital => "RETURN_OF_CAPITAL",
            TransactionType::CapitalCall => "CAPITAL_CALL",
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        TransactionType::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("Unknown transaction type: {}", s))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionStatus {
    #[default]
    Completed,
    Pending,
    Reversed,
}

impl TransactionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionStatus::Completed => "COMPLETED",
            TransactionStatus::Pending => "PENDING",
            TransactionStatus::Reversed => "REVERSED",
        }
    }
}

impl FromStr for TransactionStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "COMPLETED" => Ok(TransactionStatus::Completed),
            "PENDING" => Ok(TransactionStatus::Pending),
            "REVERSED" => Ok(TransactionStatus::Reversed),
            other => Err(format!("Unknown transaction status: {}", other)),
        }
    }
}

/// A persisted ledger transaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: String,
    pub entity_id: String,
    pub security_class_id: String,
    pub transaction_type: TransactionType,
    pub quantity: u64,
    #[serde(default, with = "optional_decimal_format")]
    pub amount_paid_per_security: Option<Decimal>,
    #[serde(default, with = "optional_decimal_format")]
    pub amount_unpaid_per_security: Option<Decimal>,
    #[serde(default, with = "optional_decimal_format")]
    pub transfer_price_per_security: Option<Decimal>,
    pub currency: String,
    #[serde(default, with = "optional_decimal_format")]
    pub total_amount_paid: Option<Decimal>,
    #[serde(default, with = "optional_decimal_format")]
    pub total_amount_unpaid: Option<Decimal>,
    #[serde(default, with = "optional_decimal_format")]
    pub total_transfer_amount: Option<Decimal>,
    pub from_member_id: Option<String>,
    pub to_member_id: Option<String>,
    pub tranche_number: Option<String>,
    pub tranche_sequence: Option<i32>,
    #[serde(with = "timestamp_format")]
    pub posted_date: DateTime<Utc>,
    #[serde(default, with = "optional_timestamp_format")]
    pub settlement_date: Option<DateTime<Utc>>,
    pub status: TransactionStatus,
    pub reference: Option<String>,
    pub description: Option<String>,
    pub certificate_number: Option<String>,
    pub idempotency_key: Option<String>,
    pub created_by: String,
    #[serde(with = "timestamp_format")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "timestamp_format")]
    pub updated_at: DateTime<Utc>,
}

/// Fields compared when a correction is applied. Bookkeeping columns
/// (`updated_at`, `created_by`) are not part of the delta.
pub const TRACKED_UPDATE_FIELDS: &[&str] = &[
    "quantity",
    "amount_paid_per_security",
    "amount_unpaid_per_security",
    "transfer_price_per_security",
    "total_amount_paid",
    "total_amount_unpaid",
    "total_transfer_amount",
    "from_member_id",
    "to_member_id",
    "posted_date",
    "settlement_date",
    "status",
    "reference",
    "description",
];

fn timestamp_value(value: Option<DateTime<Utc>>) -> Value {
    match value {
        Some(dt) => Value::String(dt.to_rfc3339()),
        None => Value::Null,
    }
}

impl AuditSnapshot for Transaction {
    fn audit_fields(&self) -> FieldMap {
        FieldMap::from([
            ("id".to_string(), json!(self.id)),
            ("entity_id".to_string(), json!(self.entity_id)),
            ("security_class_id".to_string(), json!(self.security_class_id)),
            (
                "transaction_type".to_string(),
                json!(self.transaction_type.as_str()),
            ),
            ("quantity".to_string(), json!(self.quantity)),
            (
                "amount_paid_per_security".to_string(),
                decimal_field_value(self.amount_paid_per_security),
            ),
            (
                "amount_unpaid_per_security".to_string(),
                decimal_field_value(self.amount_unpaid_per_security),
            ),
            (
                "transfer_price_per_security".to_string(),
                decimal_field_value(self.transfer_price_per_security),
            ),
            ("currency".to_string(), json!(self.currency)),
            (
                "total_amount_paid".to_string(),
                decimal_field_value(self.total_amount_paid),
            ),
            (
                "total_amount_unpaid".to_string(),
                decimal_field_value(self.total_amount_unpaid),
            ),
            (
                "total_transfer_amount".to_string(),
                decimal_field_value(self.total_transfer_amount),
            ),
            ("from_member_id".to_string(), json!(self.from_member_id)),
            ("to_member_id".to_string(), json!(self.to_member_id)),
            ("tranche_number".to_string(), json!(self.tranche_number)),
            ("tranche_sequence".to_string(), json!(self.tranche_sequence)),
            (
                "posted_date".to_string(),
                timestamp_value(Some(self.posted_date)),
            ),
            (
                "settlement_date".to_string(),
                timestamp_value(self.settlement_date),
            ),
            ("status".to_string(), json!(self.status.as_str())),
            ("reference".to_string(), json!(self.reference)),
            ("description".to_string(), json!(self.description)),
            (
                "certificate_number".to_string(),
                json!(self.certificate_number),
            ),
            ("idempotency_key".to_string(), json!(self.idempotency_key)),
            ("created_by".to_string(), json!(self.created_by)),
        ])
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Input model for recording one transaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTransaction {
    #[serde(default)]
    pub entity_id: String,
    pub security_class_id: String,
    pub transaction_type: TransactionType,
    pub quantity: u64,
    #[serde(default, with = "optional_decimal_format")]
    pub amount_paid_per_security: Option<Decimal>,
    #[serde(default, with = "optional_decimal_format")]
    pub amount_unpaid_per_security: Option<Decimal>,
    #[serde(default, with = "optional_decimal_format")]
    pub transfer_price_per_security: Option<Decimal>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub from_member_id: Option<String>,
    #[serde(default)]
    pub to_member_id: Option<String>,
    #[serde(default)]
    pub tranche_number: Option<String>,
    #[serde(default)]
    pub tranche_sequence: Option<i32>,
    /// Defaults to the time of the write
    #[serde(default, with = "optional_timestamp_format")]
    pub posted_date: Option<DateTime<Utc>>,
    #[serde(default, with = "optional_timestamp_format")]
    pub settlement_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub status: Option<TransactionStatus>,
    #[serde(default)]
    pub reference: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub certificate_number: Option<String>,
    /// Caller-supplied token; a repeat returns the original transaction.
    #[serde(default)]
    pub idempotency_key: Option<String>,
}

impl NewTransaction {
    /// Minimal input for a transaction of `transaction_type`.
    pub fn new(
        entity_id: &str,
        security_class_id: &str,
        transaction_type: TransactionType,
        quantity: u64,
    ) -> Self {
        Self {
            entity_id: entity_id.to_string(),
            security_class_id: security_class_id.to_string(),
            transaction_type,
            quantity,
            amount_paid_per_security: None,
            amount_unpaid_per_security: None,
            transfer_price_per_security: None,
            currency: None,
            from_member_id: None,
            to_member_id: None,
            tranche_number: None,
            tranche_sequence: None,
            posted_date: None,
            settlement_date: None,
            status: None,
            reference: None,
            description: None,
            certificate_number: None,
            idempotency_key: None,
        }
    }

    /// Trims free-text fields and turns blank strings into `None`.
    pub fn normalized(self) -> Self {
        Self {
            entity_id: self.entity_id.trim().to_string(),
            security_class_id: self.security_class_id.trim().to_string(),
            currency: non_blank(self.currency),
            from_member_id: non_blank(self.from_member_id),
            to_member_id: non_blank(self.to_member_id),
            tranche_number: non_blank(self.tranche_number),
            reference: non_blank(self.reference),
            description: non_blank(self.description),
            certificate_number: non_blank(self.certificate_number),
            idempotency_key: non_blank(self.idempotency_key),
            ..self
        }
    }
}

/// Sparse correction patch. Absent fields are left alone; `null` clears a
/// nullable field.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionUpdate {
    #[serde(default)]
    pub quantity: Option<u64>,
    #[serde(default, deserialize_with = "patch_decimal_format::deserialize")]
    pub amount_paid_per_security: Option<Option<Decimal>>,
    #[serde(default, deserialize_with = "patch_decimal_format::deserialize")]
    pub amount_unpaid_per_security: Option<Option<Decimal>>,
    #[serde(default, deserialize_with = "patch_decimal_format::deserialize")]
    pub transfer_price_per_security: Option<Option<Decimal>>,
    #[serde(default, deserialize_with = "patch_format::deserialize")]
    pub from_member_id: Option<Option<String>>,
    #[serde(default, deserialize_with = "patch_format::deserialize")]
    pub to_member_id: Option<Option<String>>,
    #[serde(default, with = "optional_timestamp_format")]
    pub posted_date: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "patch_timestamp_format::deserialize")]
    pub settlement_date: Option<Option<DateTime<Utc>>>,
    #[serde(default)]
    pub status: Option<TransactionStatus>,
    #[serde(default, deserialize_with = "patch_format::deserialize")]
    pub reference: Option<Option<String>>,
    #[serde(default, deserialize_with = "patch_format::deserialize")]
    pub description: Option<Option<String>>,
}

fn patched<T>(current: &Option<T>, patch: Option<Option<T>>) -> Option<T>
where
    T: Clone,
{
    match patch {
        Some(value) => value,
        None => current.clone(),
    }
}

impl TransactionUpdate {
    /// Returns `current` with every supplied field applied. Totals are not
    /// touched here.
    pub fn apply_to(self, current: &Transaction) -> Transaction {
        Transaction {
            quantity: self.quantity.unwrap_or(current.quantity),
            amount_paid_per_security: patched(
                &current.amount_paid_per_security,
                self.amount_paid_per_security,
            ),
            amount_unpaid_per_security: patched(
                &current.amount_unpaid_per_security,
                self.amount_unpaid_per_security,
            ),
            transfer_price_per_security: patched(
                &current.transfer_price_per_security,
                self.transfer_price_per_security,
            ),
            from_member_id: non_blank(patched(&current.from_member_id, self.from_member_id)),
            to_member_id: non_blank(patched(&current.to_member_id, self.to_member_id)),
            posted_date: self.posted_date.unwrap_or(current.posted_date),
            settlement_date: patched(&current.settlement_date, self.settlement_date),
            status: self.status.unwrap_or(current.status),
            reference: non_blank(patched(&current.reference, self.reference)),
            description: non_blank(patched(&current.description, self.description)),
            ..current.clone()
        }
    }
}

/// One line of a bulk request.
///
/// `member_id` is the counterpart: the receiving holder for ISSUE and the
/// source holder for every other type. `to_member_id` is read for TRANSFER only.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkLineItem {
    pub quantity: u64,
    #[serde(default, with = "optional_decimal_format")]
    pub amount_paid_per_security: Option<Decimal>,
    #[serde(default, with = "optional_decimal_format")]
    pub amount_unpaid_per_security: Option<Decimal>,
    #[serde(default, with = "optional_decimal_format")]
    pub transfer_price_per_security: Option<Decimal>,
    #[serde(default)]
    pub member_id: Option<String>,
    #[serde(default)]
    pub to_member_id: Option<String>,
    #[serde(default)]
    pub reference: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub certificate_number: Option<String>,
}

/// A batch of transactions of one type against one security class.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBulkTransactions {
    #[serde(default)]
    pub entity_id: String,
    pub security_class_id: String,
    pub transaction_type: TransactionType,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub tranche_number: Option<String>,
    #[serde(default, with = "optional_timestamp_format")]
    pub posted_date: Option<DateTime<Utc>>,
    #[serde(default, with = "optional_timestamp_format")]
    pub settlement_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub status: Option<TransactionStatus>,
    pub line_items: Vec<BulkLineItem>,
}

impl NewBulkTransactions {
    /// Expands the batch into one normalised `NewTransaction` per line item,
    /// numbering lines within the shared tranche from 1.
    pub fn into_transactions(self) -> Result<Vec<NewTransaction>> {
        if self.line_items.is_empty() {
            return Err(Error::Validation(ValidationError::InvalidInput(
                "Bulk request must contain at least one line item".to_string(),
            )));
        }
        let transaction_type = self.transaction_type;
        self.line_items
            .into_iter()
            .enumerate()
            .map(|(index, item)| {
                let sequence = i32::try_from(index + 1).map_err(|_| {
                    Error::Validation(ValidationError::InvalidInput(
                        "Too many line items".to_string(),
                    ))
                })?;
                let (from_member_id, to_member_id) = match transaction_type {
                    TransactionType::Issue => (None, item.member_id),
                    TransactionType::Transfer => (item.member_id, item.to_member_id),
                    _ => (item.member_id, None),
                };
                let new = NewTransaction {
                    entity_id: self.entity_id.clone(),
                    security_class_id: self.security_class_id.clone(),
                    transaction_type,
                    quantity: item.quantity,
                    amount_paid_per_security: item.amount_paid_per_security,
                    amount_unpaid_per_security: item.amount_unpaid_per_security,
                    transfer_price_per_security: item.transfer_price_per_security,
                    currency: self.currency.clone(),
                    from_member_id,
                    to_member_id,
                    tranche_number: self.tranche_number.clone(),
                    tranche_sequence: Some(sequence),
                    posted_date: self.posted_date,
                    settlement_date: self.settlement_date,
                    status: self.status,
                    reference: item.reference,
                    description: item.description,
                    certificate_number: item.certificate_number,
                    idempotency_key: None,
                };
                Ok(new.normalized())
            })
            .collect()
    }
}

/// Outcome of a successful bulk write.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkCreateResult {
    pub created: Vec<Transaction>,
    pub count: usize,
}
