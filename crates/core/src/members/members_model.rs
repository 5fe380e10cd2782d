//! Member domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::str::FromStr;

use crate::audit::{AuditSnapshot, FieldMap};
use crate::utils::serde_formats::timestamp_format;
use crate::{errors::ValidationError, Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MemberType {
    #[default]
    Individual,
    Joint,
    Organization,
}

impl MemberType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MemberType::Individual => "INDIVIDUAL",
            MemberType::Joint => "JOINT",
            MemberType::Organization => "ORGANIZATION",
        }
    }
}

impl FromStr for MemberType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "INDIVIDUAL" => Ok(MemberType::Individual),
            "JOINT" => Ok(MemberType::Joint),
            "ORGANIZATION" => Ok(MemberType::Organization),
            other => Err(format!("Unknown member type: {}", other)),
        }
    }
}

/// A holder or counterparty of securities within one entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    pub id: String,
    pub entity_id: String,
    /// Register number, unique within the entity when present
    pub member_number: Option<String>,
    pub member_type: MemberType,
    pub name: String,
    pub email: Option<String>,
    pub country: String,
    #[serde(with = "timestamp_format")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "timestamp_format")]
    pub updated_at: DateTime<Utc>,
}

/// Input model for creating a member.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewMember {
    #[serde(default)]
    pub entity_id: String,
    #[serde(default)]
    pub member_type: MemberType,
    pub name: String,
    #[serde(default)]
    pub member_number: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
}

impl NewMember {
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
        if let Some(email) = self.email.as_deref().map(str::trim) {
            if !email.is_empty() && !email.contains('@') {
                return Err(Error::Validation(ValidationError::InvalidInput(format!(
                    "Invalid email address: {}",
                    email
                ))));
            }
        }
        Ok(())
    }
}

impl AuditSnapshot for Member {
    fn audit_fields(&self) -> FieldMap {
        FieldMap::from([
            ("id".to_string(), json!(self.id)),
            ("entity_id".to_string(), json!(self.entity_id)),
            ("member_number".to_string(), json!(self.member_number)),
            ("member_type".to_string(), json!(self.member_type.as_str())),
            ("name".to_string(), json!(self.name)),
            ("email".to_string(), json!(self.email)),
            ("country".to_string(), json!(self.country)),
        ])
    }
}
