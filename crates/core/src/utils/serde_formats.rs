//! Serde adapters shared by the register models.
//!
//! Decimals travel as strings so no amount ever passes through `f64`.
//! Inputs are lenient (strings or JSON numbers); outputs are always strings.
//! Timestamps are RFC 3339 in UTC; date-only inputs mean midnight UTC.

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer};
use std::str::FromStr;

#[derive(Deserialize)]
#[serde(untagged)]
enum DecimalInput {
    String(String),
    Number(serde_json::Number),
}

fn parse_decimal_value(value: &str) -> Result<Decimal, String> {
    let trimmed = value.trim();
    Decimal::from_str(trimmed)
        .or_else(|_| Decimal::from_scientific(trimmed))
        .map_err(|e| format!("Invalid decimal value '{}': {}", value, e))
}

fn decimal_from_input(input: DecimalInput) -> Result<Option<Decimal>, String> {
    match input {
        DecimalInput::String(s) if s.trim().is_empty() => Ok(None),
        DecimalInput::String(s) => parse_decimal_value(&s).map(Some),
        DecimalInput::Number(n) => parse_decimal_value(&n.to_string()).map(Some),
    }
}

pub(crate) fn parse_timestamp(s: &str) -> Result<DateTime<Utc>, String> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Ok(Utc.from_utc_datetime(&date.and_hms_opt(0, 0, 0).unwrap_or_default()));
    }
    Err(format!(
        "Invalid timestamp format: {}. Expected ISO 8601/RFC3339 or YYYY-MM-DD",
        s
    ))
}

pub mod timestamp_format {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(date: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&date.to_rfc3339())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        super::parse_timestamp(&s).map_err(serde::de::Error::custom)
    }
}

pub mod optional_timestamp_format {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(date: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match date {
            Some(d) => serializer.serialize_str(&d.to_rfc3339()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<String>::deserialize(deserializer)? {
            Some(s) if s.trim().is_empty() => Ok(None),
            Some(s) => super::parse_timestamp(&s)
                .map(Some)
                .map_err(serde::de::Error::custom),
            None => Ok(None),
        }
    }
}

pub mod optional_decimal_format {
    use rust_decimal::Decimal;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &Option<Decimal>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(d) => serializer.serialize_str(&d.to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<super::DecimalInput>::deserialize(deserializer)? {
            Some(input) => super::decimal_from_input(input).map_err(serde::de::Error::custom),
            None => Ok(None),
        }
    }
}

/// Sparse-patch fields: absent means "leave alone", `null` means "clear".
///
/// Use together with `#[serde(default)]` so a missing key becomes `None`.
pub mod patch_format {
    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
    where
        D: Deserializer<'de>,
        T: Deserialize<'de>,
    {
        Option::<T>::deserialize(deserializer).map(Some)
    }
}

pub mod patch_decimal_format {
    use rust_decimal::Decimal;
    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Option<Decimal>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<super::DecimalInput>::deserialize(deserializer)? {
            Some(input) => super::decimal_from_input(input)
                .map(Some)
                .map_err(serde::de::Error::custom),
            None => Ok(Some(None)),
        }
    }
}

pub mod patch_timestamp_format {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Option<DateTime<Utc>>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<String>::deserialize(deserializer)? {
            Some(s) if s.trim().is_empty() => Ok(Some(None)),
            Some(s) => super::parse_timestamp(&s)
                .map(|dt| Some(Some(dt)))
                .map_err(serde::de::Error::custom),
            None => Ok(Some(None)),
        }
    }
}

/// Deserializes a required decimal from a string or JSON number.
pub fn deserialize_decimal<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    let input = DecimalInput::deserialize(deserializer)?;
    decimal_from_input(input)
        .map_err(serde::de::Error::custom)?
        .ok_or_else(|| serde::de::Error::custom("decimal value is required"))
}
