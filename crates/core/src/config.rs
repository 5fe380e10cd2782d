//! Process-wide register defaults.

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_COUNTRY, DEFAULT_CURRENCY};
use crate::errors::{Error, Result};

/// Defaults applied by the ledger when a request leaves a field blank.
///
/// Built once at startup and handed to each service at construction time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistryConfig {
    pub default_currency: String,
    pub default_country: String,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            default_currency: DEFAULT_CURRENCY.to_string(),
            default_country: DEFAULT_COUNTRY.to_string(),
        }
    }
}

impl RegistryConfig {
    /// Builds a config from optional overrides, normalising codes to upper case.
    pub fn new(default_currency: Option<&str>, default_country: Option<&str>) -> Result<Self> {
        let base = Self::default();
        let default_currency = match default_currency.map(str::trim).filter(|s| !s.is_empty()) {
            Some(code) => normalize_code(code, 3, "currency")?,
            None => base.default_currency,
        };
        let default_country = match default_country.map(str::trim).filter(|s| !s.is_empty()) {
            Some(code) => normalize_code(code, 2, "country")?,
            None => base.default_country,
        };
        Ok(Self {
            default_currency,
            default_country,
        })
    }

    /// Returns the given currency, or the configured default when blank.
    pub fn currency_or_default(&self, currency: Option<&str>) -> String {
        currency
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(str::to_uppercase)
            .unwrap_or_else(|| self.default_currency.clone())
    }

    /// Returns the given country, or the configured default when blank.
    pub fn country_or_default(&self, country: Option<&str>) -> String {
        country
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(str::to_uppercase)
            .unwrap_or_else(|| self.default_country.clone())
    }
}

fn normalize_code(code: &str, len: usize, what: &str) -> Result<String> {
    if code.len() != len || !code.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(Error::InvalidConfigValue(format!(
            "default {} '{}' must be a {}-letter code",
            what, code, len
        )));
    }
    Ok(code.to_uppercase())
}
