//! Conversion helpers between domain values and their SQLite TEXT columns.

use chrono::{DateTime, SecondsFormat, Utc};
use rust_decimal::Decimal;
use std::str::FromStr;

use crate::errors::StorageError;
use sharebook_core::Result;

/// Maximum number of parameters for SQLite IN (...) queries.
///
/// SQLite caps bound parameters per statement (commonly 999). 500 leaves
/// room for the other parameters of the query.
pub const SQLITE_MAX_PARAMS_CHUNK: usize = 500;

/// Splits a slice into chunks small enough for one `IN (...)` clause.
pub fn chunk_for_sqlite<T>(items: &[T]) -> impl Iterator<Item = &[T]> {
    items.chunks(SQLITE_MAX_PARAMS_CHUNK)
}

/// Fixed-width UTC format, so TEXT ordering matches time ordering.
pub fn format_timestamp(value: &DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

pub fn format_optional_timestamp(value: &Option<DateTime<Utc>>) -> Option<String> {
    value.as_ref().map(format_timestamp)
}

pub fn parse_timestamp(value: &str, field: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| StorageError::Corrupt(format!("{} '{}': {}", field, value, e)).into())
}

pub fn parse_optional_timestamp(value: Option<&str>, field: &str) -> Result<Option<DateTime<Utc>>> {
    value.map(|v| parse_timestamp(v, field)).transpose()
}

pub fn format_decimal(value: &Option<Decimal>) -> Option<String> {
    value.as_ref().map(Decimal::to_string)
}

pub fn parse_decimal(value: Option<&str>, field: &str) -> Result<Option<Decimal>> {
    value
        .map(|v| {
            Decimal::from_str(v)
                .map_err(|e| StorageError::Corrupt(format!("{} '{}': {}", field, v, e)).into())
        })
        .transpose()
}

/// Parses an enum stored by its `as_str` name.
pub fn parse_enum<T: FromStr<Err = String>>(value: &str) -> Result<T> {
    T::from_str(value).map_err(|e| StorageError::Corrupt(e).into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    #[test]
    fn test_chunk_for_sqlite_over_limit() {
        let items: Vec<i32> = (0..1200).collect();
        let chunks: Vec<_> = chunk_for_sqlite(&items).collect();
        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[2].len(), 200);
    }

    #[test]
    fn test_timestamp_text_sorts_chronologically() {
        let early = Utc.with_ymd_and_hms(2024, 1, 9, 23, 59, 59).unwrap();
        let late = Utc.with_ymd_and_hms(2024, 1, 10, 0, 0, 0).unwrap();
        let (a, b) = (format_timestamp(&early), format_timestamp(&late));
        assert!(a < b);
        assert_eq!(b, "2024-01-10T00:00:00.000000000Z");
        assert_eq!(parse_timestamp(&b, "created_at").unwrap(), late);
    }

    #[test]
    fn test_decimal_text_keeps_scale() {
        let stored = format_decimal(&Some(dec!(1000.00)));
        assert_eq!(stored.as_deref(), Some("1000.00"));
        let read = parse_decimal(stored.as_deref(), "total_amount_paid").unwrap();
        assert_eq!(read.map(|d| d.to_string()), Some("1000.00".to_string()));
        assert!(parse_decimal(Some("abc"), "total_amount_paid").is_err());
    }
}
