//! Database models for security classes.

use diesel::prelude::*;
use sharebook_core::securities::SecurityClass;
use sharebook_core::Result;

use crate::utils::{format_timestamp, parse_timestamp};

#[derive(Queryable, Selectable, Insertable, AsChangeset, Identifiable, Debug, Clone)]
#[diesel(table_name = crate::schema::security_classes)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[diesel(treat_none_as_null = true)]
pub struct SecurityClassDB {
    pub id: String,
    pub entity_id: String,
    pub name: String,
    pub symbol: Option<String>,
    pub has_voting_rights: bool,
    pub has_dividend_rights: bool,
    pub is_active: bool,
    pub is_archived: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl From<&SecurityClass> for SecurityClassDB {
    fn from(class: &SecurityClass) -> Self {
        Self {
            id: class.id.clone(),
            entity_id: class.entity_id.clone(),
            name: class.name.clone(),
            symbol: class.symbol.clone(),
            has_voting_rights: class.has_voting_rights,
            has_dividend_rights: class.has_dividend_rights,
            is_active: class.is_active,
            is_archived: class.is_archived,
            created_at: format_timestamp(&class.created_at),
            updated_at: format_timestamp(&class.updated_at),
        }
    }
}

impl TryFrom<SecurityClassDB> for SecurityClass {
    type Error = sharebook_core::Error;

    fn try_from(db: SecurityClassDB) -> Result<Self> {
        Ok(Self {
            created_at: parse_timestamp(&db.created_at, "security_classes.created_at")?,
            updated_at: parse_timestamp(&db.updated_at, "security_classes.updated_at")?,
            id: db.id,
            entity_id: db.entity_id,
            name: db.name,
            symbol: db.symbol,
            has_voting_rights: db.has_voting_rights,
            has_dividend_rights: db.has_dividend_rights,
            is_active: db.is_active,
            is_archived: db.is_archived,
        })
    }
}
