//! Security class domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::audit::{AuditSnapshot, FieldMap};
use crate::utils::serde_formats::timestamp_format;
use crate::{errors::ValidationError, Error, Result};

/// A category of security (e.g. ordinary shares) issued by one entity.
///
/// Archived classes keep their history but accept no further ledger writes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecurityClass {
    pub id: String,
    pub entity_id: String,
    pub name: String,
    pub symbol: Option<String>,
    pub has_voting_rights: bool,
    pub has_dividend_rights: bool,
    pub is_active: bool,
    pub is_archived: bool,
    #[serde(with = "timestamp_format")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "timestamp_format")]
    pub updated_at: DateTime<Utc>,
}

fn default_true() -> bool {
    true
}

/// Input model for creating a security class.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSecurityClass {
    #[serde(default)]
    pub entity_id: String,
    pub name: String,
    #[serde(default)]
    pub symbol: Option<String>,
    #[serde(default = "default_true")]
    pub has_voting_rights: bool,
    #[serde(default = "default_true")]
    pub has_dividend_rights: bool,
}

impl NewSecurityClass {
    pub fn validate(&self) -> Result<()> {
        if self.entity_id.trim().is_empty() {
            return Err(Error::Validation(ValidationError::MissingField(
                "entityId".to_string(),
            )));
        }
        if self.name.trim().is_empty() {
            return Err(Error::Validation(ValidationError::MissingField(
                "name".to_string(),
            )));
        }
        Ok(())
    }
}

impl AuditSnapshot for SecurityClass {
    fn audit_fields(&self) -> FieldMap {
        FieldMap::from([
            ("id".to_string(), json!(self.id)),
            ("entity_id".to_string(), json!(self.entity_id)),
            ("name".to_string(), json!(self.name)),
            ("symbol".to_string(), json!(self.symbol)),
            ("has_voting_rights".to_string(), json!(self.has_voting_rights)),
            ("has_dividend_rights".to_string(), json!(self.has_dividend_rights)),
            ("is_active".to_string(), json!(self.is_active)),
            ("is_archived".to_string(), json!(self.is_archived)),
        ])
    }
}
