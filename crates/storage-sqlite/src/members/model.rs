//! Database models for members.

use diesel::prelude::*;
use sharebook_core::members::Member;
use sharebook_core::Result;

use crate::utils::{format_timestamp, parse_enum, parse_timestamp};

#[derive(Queryable, Selectable, Insertable, Identifiable, Debug, Clone)]
#[diesel(table_name = crate::schema::members)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct MemberDB {
    pub id: String,
    pub entity_id: String,
    pub member_number: Option<String>,
    pub member_type: String,
    pub name: String,
    pub email: Option<String>,
    pub country: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<&Member> for MemberDB {
    fn from(member: &Member) -> Self {
        Self {
            id: member.id.clone(),
            entity_id: member.entity_id.clone(),
            member_number: member.member_number.clone(),
            member_type: member.member_type.as_str().to_string(),
            name: member.name.clone(),
            email: member.email.clone(),
            country: member.country.clone(),
            created_at: format_timestamp(&member.created_at),
            updated_at: format_timestamp(&member.updated_at),
        }
    }
}

impl TryFrom<MemberDB> for Member {
    type Error = sharebook_core::Error;

    fn try_from(db: MemberDB) -> Result<Self> {
        Ok(Self {
            member_type: parse_enum(&db.member_type)?,
            created_at: parse_timestamp(&db.created_at, "members.created_at")?,
            updated_at: parse_timestamp(&db.updated_at, "members.updated_at")?,
            id: db.id,
            entity_id: db.entity_id,
            member_number: db.member_number,
            name: db.name,
            email: db.email,
            country: db.country,
        })
    }
}
