//! Entity domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::audit::{AuditSnapshot, FieldMap};
use crate::utils::serde_formats::timestamp_format;
use crate::{errors::ValidationError, Error, Result};

/// A company (or trust, fund) whose securities are tracked by the register.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entity {
    pub id: String,
    pub name: String,
    pub country: String,
    #[serde(with = "timestamp_format")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "timestamp_format")]
    pub updated_at: DateTime<Utc>,
}

/// Input model for creating a new entity.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewEntity {
    pub name: String,
    #[serde(default)]
    pub country: Option<String>,
}

impl NewEntity {
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::Validation(ValidationError::MissingField(
                "name".to_string(),
            )));
        }
        Ok(())
    }
}

impl AuditSnapshot for Entity {
    fn audit_fields(&self) -> FieldMap {
        FieldMap::from([
            ("id".to_string(), json!(self.id)),
            ("name".to_string(), json!(self.name)),
            ("country".to_string(), json!(self.country)),
        ])
    }
}
