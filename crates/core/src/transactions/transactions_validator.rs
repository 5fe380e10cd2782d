//! Structural and referential rules shared by every ledger write path.
//!
//! The shape rules are pure; the referential helpers take what the unit of
//! work has already loaded so the same checks run identically for single,
//! bulk and corrective writes.

use rust_decimal::Decimal;
use std::collections::{BTreeSet, HashSet};

use super::transactions_errors::{LedgerError, ShapeRule};
use super::transactions_model::{NewTransaction, Transaction, TransactionType};
use crate::errors::{Error, Result, ValidationError};
use crate::securities::SecurityClass;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberRequirement {
    Required,
    Forbidden,
}

/// `(from_member, to_member)` requirements for a transaction type.
pub fn member_requirements(
    transaction_type: TransactionType,
) -> (MemberRequirement, MemberRequirement) {
    use MemberRequirement::*;
    match transaction_type {
        TransactionType::Issue => (Forbidden, Required),
        TransactionType::Transfer => (Required, Required),
        TransactionType::Cancellation
        | TransactionType::Redemption
        | TransactionType::ReturnOfCapital
        | TransactionType::CapitalCall => (Required, Forbidden),
    }
}

/// Checks member presence against the type's requirements.
pub fn validate_shape(
    transaction_type: TransactionType,
    from_member_id: Option<&str>,
    to_member_id: Option<&str>,
) -> std::result::Result<(), LedgerError> {
    let present = |id: Option<&str>| id.is_some_and(|s| !s.trim().is_empty());
    let (from_rule, to_rule) = member_requirements(transaction_type);

    match (from_rule, present(from_member_id)) {
        (MemberRequirement::Required, false) => {
            return Err(LedgerError::shape(
                transaction_type,
                ShapeRule::FromMemberRequired,
            ))
        }
        (MemberRequirement::Forbidden, true) => {
            return Err(LedgerError::shape(
                transaction_type,
                ShapeRule::FromMemberForbidden,
            ))
        }
        _ => {}
    }
    match (to_rule, present(to_member_id)) {
        (MemberRequirement::Required, false) => Err(LedgerError::shape(
            transaction_type,
            ShapeRule::ToMemberRequired,
        )),
        (MemberRequirement::Forbidden, true) => Err(LedgerError::shape(
            transaction_type,
            ShapeRule::ToMemberForbidden,
        )),
        _ => Ok(()),
    }
}

/// `amounts` is `[paid, unpaid, transfer_price]` per security.
fn validate_amounts(
    transaction_type: TransactionType,
    quantity: u64,
    amounts: [Option<Decimal>; 3],
) -> Result<()> {
    if amounts.iter().flatten().any(|a| a.is_sign_negative() && !a.is_zero()) {
        return Err(LedgerError::shape(transaction_type, ShapeRule::NegativeAmount).into());
    }
    if amounts[2].is_some() && transaction_type != TransactionType::Transfer {
        return Err(
            LedgerError::shape(transaction_type, ShapeRule::TransferPriceNotAllowed).into(),
        );
    }
    if i64::try_from(quantity).is_err() {
        return Err(Error::Validation(ValidationError::InvalidInput(format!(
            "quantity {} is out of range",
            quantity
        ))));
    }
    Ok(())
}

/// Validates a normalised input before any lookup or write.
pub fn validate_new_transaction(new: &NewTransaction) -> Result<()> {
    if new.entity_id.is_empty() {
        return Err(Error::Validation(ValidationError::MissingField(
            "entityId".to_string(),
        )));
    }
    if new.security_class_id.is_empty() {
        return Err(Error::Validation(ValidationError::MissingField(
            "securityClassId".to_string(),
        )));
    }
    validate_shape(
        new.transaction_type,
        new.from_member_id.as_deref(),
        new.to_member_id.as_deref(),
    )?;
    validate_amounts(
        new.transaction_type,
        new.quantity,
        [
            new.amount_paid_per_security,
            new.amount_unpaid_per_security,
            new.transfer_price_per_security,
        ],
    )
}

/// Validates a transaction after a correction has been applied to it.
pub fn validate_corrected(transaction: &Transaction) -> Result<()> {
    validate_shape(
        transaction.transaction_type,
        transaction.from_member_id.as_deref(),
        transaction.to_member_id.as_deref(),
    )?;
    validate_amounts(
        transaction.transaction_type,
        transaction.quantity,
        [
            transaction.amount_paid_per_security,
            transaction.amount_unpaid_per_security,
            transaction.transfer_price_per_security,
        ],
    )
}

/// Resolves the target class: it must exist, belong to `entity_id` and not
/// be archived.
pub fn check_security_class(
    class: Option<SecurityClass>,
    entity_id: &str,
    security_class_id: &str,
) -> std::result::Result<SecurityClass, LedgerError> {
    match class {
        Some(class) if class.entity_id == entity_id => {
            if class.is_archived {
                Err(LedgerError::SecurityClassArchived(class.id))
            } else {
                Ok(class)
            }
        }
        _ => Err(LedgerError::SecurityClassNotFound(
            security_class_id.to_string(),
        )),
    }
}

/// Distinct member ids referenced on either side, in sorted order.
pub fn referenced_member_ids<'a, I>(transactions: I) -> Vec<String>
where
    I: IntoIterator<Item = (Option<&'a str>, Option<&'a str>)>,
{
    transactions
        .into_iter()
        .flat_map(|(from, to)| [from, to])
        .flatten()
        .map(str::to_string)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Ids from `requested` that are not in `existing`.
pub fn missing_member_ids(requested: &[String], existing: &HashSet<String>) -> Vec<String> {
    requested
        .iter()
        .filter(|id| !existing.contains(*id))
        .cloned()
        .collect()
}
