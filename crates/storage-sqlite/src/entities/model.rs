//! Database models for entities.

use diesel::prelude::*;
use sharebook_core::entities::Entity;
use sharebook_core::Result;

use crate::utils::{format_timestamp, parse_timestamp};

#[derive(Queryable, Selectable, Insertable, Identifiable, Debug, Clone)]
#[diesel(table_name = crate::schema::entities)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct EntityDB {
    pub id: String,
    pub name: String,
    pub country: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<&Entity> for EntityDB {
    fn from(entity: &Entity) -> Self {
        Self {
            id: entity.id.clone(),
            name: entity.name.clone(),
            country: entity.country.clone(),
            created_at: format_timestamp(&entity.created_at),
            updated_at: format_timestamp(&entity.updated_at),
        }
    }
}

impl TryFrom<EntityDB> for Entity {
    type Error = sharebook_core::Error;

    fn try_from(db: EntityDB) -> Result<Self> {
        Ok(Self {
            created_at: parse_timestamp(&db.created_at, "entities.created_at")?,
            updated_at: parse_timestamp(&db.updated_at, "entities.updated_at")?,
            id: db.id,
            name: db.name,
            country: db.country,
        })
    }
}
