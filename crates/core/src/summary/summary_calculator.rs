//! Pure folds over the transaction history.
//!
//! Quantity model: ISSUE adds to the class total and to the receiving
//! holder; CANCELLATION removes from both; TRANSFER moves between holders
//! without changing the total. Other types do not move quantity.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::collections::{BTreeMap, HashSet};

use super::summary_model::{MemberHolding, SecurityClassSummary, TrancheSummary};
use crate::constants::UNKNOWN_TRANCHE;
use crate::errors::{Result, ValidationError};
use crate::securities::SecurityClass;
use crate::transactions::{Transaction, TransactionStatus, TransactionType};
use crate::utils::{subtract_optional, sum_optional};

fn signed(quantity: u64) -> Result<i64> {
    i64::try_from(quantity)
        .map_err(|_| ValidationError::Overflow(format!("quantity {}", quantity)).into())
}

fn add(total: i64, delta: i64) -> Result<i64> {
    total
        .checked_add(delta)
        .ok_or_else(|| ValidationError::Overflow("quantity total".to_string()).into())
}

/// Completed transactions of one class posted on or before `as_of`, in
/// ledger order (posted date, creation time, id).
fn effective<'a>(
    security_class_id: &str,
    transactions: &'a [Transaction],
    as_of: Option<NaiveDate>,
) -> Vec<&'a Transaction> {
    let mut selected: Vec<&Transaction> = transactions
        .iter()
        .filter(|t| t.security_class_id == security_class_id)
        .filter(|t| t.status == TransactionStatus::Completed)
        .filter(|t| as_of.map_or(true, |day| t.posted_date.date_naive() <= day))
        .collect();
    selected.sort_by(|a, b| {
        (a.posted_date, a.created_at, &a.id).cmp(&(b.posted_date, b.created_at, &b.id))
    });
    selected
}

/// Folds the history of `class` into its summary.
///
/// `transactions` may contain other classes and non-completed records;
/// both are ignored. The result does not depend on the input order.
pub fn summarize_class(
    class: &SecurityClass,
    transactions: &[Transaction],
    as_of: Option<NaiveDate>,
) -> Result<SecurityClassSummary> {
    let mut total_quantity = 0i64;
    let mut total_amount_paid = Decimal::ZERO;
    let mut total_amount_unpaid = Decimal::ZERO;
    let mut holders: HashSet<&str> = HashSet::new();
    let mut tranche_numbers: HashSet<&str> = HashSet::new();
    let mut tranches: Vec<TrancheSummary> = Vec::new();

    for tx in effective(&class.id, transactions, as_of) {
        match tx.transaction_type {
            TransactionType::Issue => {
                let quantity = signed(tx.quantity)?;
                total_quantity = add(total_quantity, quantity)?;
                total_amount_paid = sum_optional(total_amount_paid, tx.total_amount_paid)?;
                total_amount_unpaid = sum_optional(total_amount_unpaid, tx.total_amount_unpaid)?;
                if let Some(number) = tx.tranche_number.as_deref() {
                    tranche_numbers.insert(number);
                }

                let key = tx.tranche_number.as_deref().unwrap_or(UNKNOWN_TRANCHE);
                match tranches.iter_mut().find(|t| t.tranche_number == key) {
                    Some(tranche) => {
                        tranche.quantity = add(tranche.quantity, quantity)?;
                        tranche.total_amount_paid =
                            sum_optional(tranche.total_amount_paid, tx.total_amount_paid)?;
                        tranche.total_amount_unpaid =
                            sum_optional(tranche.total_amount_unpaid, tx.total_amount_unpaid)?;
                        tranche.allocation_count += 1;
                    }
                    None => tranches.push(TrancheSummary {
                        tranche_number: key.to_string(),
                        quantity,
                        total_amount_paid: tx.total_amount_paid.unwrap_or_default(),
                        total_amount_unpaid: tx.total_amount_unpaid.unwrap_or_default(),
                        issue_date: tx.posted_date,
                        allocation_count: 1,
                    }),
                }
            }
            TransactionType::Cancellation => {
                total_quantity = add(total_quantity, -signed(tx.quantity)?)?;
                total_amount_paid = subtract_optional(total_amount_paid, tx.total_amount_paid)?;
                total_amount_unpaid =
                    subtract_optional(total_amount_unpaid, tx.total_amount_unpaid)?;
            }
            _ => {}
        }

        // Holder count looks at the receiving side only.
        if matches!(
            tx.transaction_type,
            TransactionType::Issue | TransactionType::Transfer
        ) {
            if let Some(member) = tx.to_member_id.as_deref() {
                holders.insert(member);
            }
        }
    }

    Ok(SecurityClassSummary {
        security_class_id: class.id.clone(),
        name: class.name.clone(),
        symbol: class.symbol.clone(),
        is_archived: class.is_archived,
        total_quantity,
        total_amount_paid,
        total_amount_unpaid,
        member_count: holders.len(),
        tranche_count: tranche_numbers.len(),
        tranches,
    })
}

/// Summaries for every class in `classes`, in the given order.
pub fn summarize_classes(
    classes: &[SecurityClass],
    transactions: &[Transaction],
    as_of: Option<NaiveDate>,
) -> Result<Vec<SecurityClassSummary>> {
    classes
        .iter()
        .map(|class| summarize_class(class, transactions, as_of))
        .collect()
}

/// Per-member quantities of one class. Members whose holding nets to zero
/// are left out; the rest are ordered by member id.
pub fn member_holdings(
    security_class_id: &str,
    transactions: &[Transaction],
    as_of: Option<NaiveDate>,
) -> Result<Vec<MemberHolding>> {
    let mut balances: BTreeMap<&str, i64> = BTreeMap::new();
    for tx in effective(security_class_id, transactions, as_of) {
        let quantity = signed(tx.quantity)?;
        let (debit, credit) = match tx.transaction_type {
            TransactionType::Issue => (None, tx.to_member_id.as_deref()),
            TransactionType::Transfer => (tx.from_member_id.as_deref(), tx.to_member_id.as_deref()),
            TransactionType::Cancellation => (tx.from_member_id.as_deref(), None),
            _ => (None, None),
        };
        if let Some(member) = debit {
            let balance = balances.entry(member).or_insert(0);
            *balance = add(*balance, -quantity)?;
        }
        if let Some(member) = credit {
            let balance = balances.entry(member).or_insert(0);
            *balance = add(*balance, quantity)?;
        }
    }

    Ok(balances
        .into_iter()
        .filter(|(_, quantity)| *quantity != 0)
        .map(|(member_id, quantity)| MemberHolding {
            member_id: member_id.to_string(),
            member_name: None,
            quantity,
        })
        .collect())
}
