//! Ledger error taxonomy.

use serde::Serialize;
use std::fmt;
use thiserror::Error;

use super::transactions_model::TransactionType;

/// The structural rule a transaction violated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ShapeRule {
    FromMemberRequired,
    FromMemberForbidden,
    ToMemberRequired,
    ToMemberForbidden,
    TransferPriceNotAllowed,
    NegativeAmount,
}

impl ShapeRule {
    pub fn code(&self) -> &'static str {
        match self {
            ShapeRule::FromMemberRequired => "FROM_MEMBER_REQUIRED",
            ShapeRule::FromMemberForbidden => "FROM_MEMBER_FORBIDDEN",
            ShapeRule::ToMemberRequired => "TO_MEMBER_REQUIRED",
            ShapeRule::ToMemberForbidden => "TO_MEMBER_FORBIDDEN",
            ShapeRule::TransferPriceNotAllowed => "TRANSFER_PRICE_NOT_ALLOWED",
            ShapeRule::NegativeAmount => "NEGATIVE_AMOUNT",
        }
    }
}

impl fmt::Display for ShapeRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let message = match self {
            ShapeRule::FromMemberRequired => "fromMemberId is required",
            ShapeRule::FromMemberForbidden => "fromMemberId must be absent",
            ShapeRule::ToMemberRequired => "toMemberId is required",
            ShapeRule::ToMemberForbidden => "toMemberId must be absent",
            ShapeRule::TransferPriceNotAllowed => {
                "transferPricePerSecurity is only allowed on TRANSFER"
            }
            ShapeRule::NegativeAmount => "per-security amounts must not be negative",
        };
        f.write_str(message)
    }
}

/// Errors raised by the ledger before or during a write.
///
/// Every variant is raised before anything is persisted, or inside a unit
/// of work that is then rolled back.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LedgerError {
    #[error("Transaction not found: {0}")]
    TransactionNotFound(String),

    #[error("Invalid {transaction_type} transaction: {rule}")]
    InvalidTransactionShape {
        transaction_type: TransactionType,
        rule: ShapeRule,
    },

    #[error("Security class {0} is archived")]
    SecurityClassArchived(String),

    #[error("Security class not found: {0}")]
    SecurityClassNotFound(String),

    #[error("Member(s) not found: {}", .0.join(", "))]
    MemberNotFound(Vec<String>),

    #[error("Entity not found: {0}")]
    EntityNotFound(String),

    #[error("Member {0} is referenced by one or more transactions")]
    MemberInUse(String),

    #[error("No authenticated actor for this mutation")]
    Unauthorized,
}

impl LedgerError {
    pub fn shape(transaction_type: TransactionType, rule: ShapeRule) -> Self {
        LedgerError::InvalidTransactionShape {
            transaction_type,
            rule,
        }
    }
}
