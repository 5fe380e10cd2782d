//! Shared helpers.

pub mod decimal_utils;
pub mod serde_formats;

pub use decimal_utils::{compute_total, decimal_field_value, subtract_optional, sum_optional};
