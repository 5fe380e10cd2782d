use diesel::prelude::*;
use std::sync::Arc;

use sharebook_core::entities::{Entity, EntityRepositoryTrait};
use sharebook_core::Result;

use super::model::EntityDB;
use crate::db::{get_connection, DbPool};
use crate::errors::IntoCore;
use crate::schema::entities;

pub struct EntityRepository {
    pool: Arc<DbPool>,
}

impl EntityRepository {
    pub fn new(pool: Arc<DbPool>) -> Self {
        Self { pool }
    }
}

impl EntityRepositoryTrait for EntityRepository {
    fn get_by_id(&self, entity_id: &str) -> Result<Option<Entity>> {
        let mut conn = get_connection(&self.pool)?;
        entities::table
            .find(entity_id)
            .select(EntityDB::as_select())
            .first(&mut conn)
            .optional()
            .into_core()?
            .map(Entity::try_from)
            .transpose()
    }

    fn list(&self) -> Result<Vec<Entity>> {
        let mut conn = get_connection(&self.pool)?;
        entities::table
            .order((entities::name.asc(), entities::id.asc()))
            .select(EntityDB::as_select())
            .load(&mut conn)
            .into_core()?
            .into_iter()
            .map(Entity::try_from)
            .collect()
    }
}
