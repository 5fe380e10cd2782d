//! Exact fixed-point arithmetic for per-security amounts.
//!
//! Every monetary value in the ledger is a `rust_decimal::Decimal`; binary
//! floating point never touches an amount. Totals keep the scale of the
//! per-unit input, so recomputing from the same inputs yields the same
//! digits every time.

use rust_decimal::Decimal;
use serde_json::Value;

use crate::errors::{Result, ValidationError};

/// Multiplies a per-security amount by a quantity.
///
/// Returns `Ok(None)` when `per_unit` is `None`. Overflow of the 96-bit
/// mantissa is reported instead of rounding.
pub fn compute_total(per_unit: Option<Decimal>, quantity: u64) -> Result<Option<Decimal>> {
    let Some(unit) = per_unit else {
        return Ok(None);
    };
    unit.checked_mul(Decimal::from(quantity))
        .map(Some)
        .ok_or_else(|| ValidationError::Overflow(format!("{} x {}", unit, quantity)).into())
}

/// Adds an optional amount into a running total, treating `None` as zero.
pub fn sum_optional(total: Decimal, value: Option<Decimal>) -> Result<Decimal> {
    let Some(v) = value else {
        return Ok(total);
    };
    total
        .checked_add(v)
        .ok_or_else(|| ValidationError::Overflow(format!("{} + {}", total, v)).into())
}

/// Subtracts an optional amount from a running total, treating `None` as zero.
pub fn subtract_optional(total: Decimal, value: Option<Decimal>) -> Result<Decimal> {
    let Some(v) = value else {
        return Ok(total);
    };
    total
        .checked_sub(v)
        .ok_or_else(|| ValidationError::Overflow(format!("{} - {}", total, v)).into())
}

/// Renders a decimal for field-level comparison: `1.0` and `1.00` compare equal.
pub fn decimal_field_value(value: Option<Decimal>) -> Value {
    match value {
        Some(d) => Value::String(d.normalize().to_string()),
        None => Value::Null,
    }
}
