use diesel::prelude::*;
use std::sync::Arc;

use sharebook_core::securities::{SecurityClass, SecurityClassRepositoryTrait};
use sharebook_core::Result;

use super::model::SecurityClassDB;
use crate::db::{get_connection, DbPool};
use crate::errors::IntoCore;
use crate::schema::security_classes;

pub struct SecurityClassRepository {
    pool: Arc<DbPool>,
}

impl SecurityClassRepository {
    pub fn new(pool: Arc<DbPool>) -> Self {
        Self { pool }
    }
}

impl SecurityClassRepositoryTrait for SecurityClassRepository {
    fn get_by_id(&self, security_class_id: &str) -> Result<Option<SecurityClass>> {
        let mut conn = get_connection(&self.pool)?;
        security_classes::table
            .find(security_class_id)
            .select(SecurityClassDB::as_select())
            .first(&mut conn)
            .optional()
            .into_core()?
            .map(SecurityClass::try_from)
            .transpose()
    }

    fn list_by_entity(
        &self,
        entity_id: &str,
        include_archived: bool,
    ) -> Result<Vec<SecurityClass>> {
        let mut conn = get_connection(&self.pool)?;
        let mut query = security_classes::table
            .filter(security_classes::entity_id.eq(entity_id))
            .into_boxed();
        if !include_archived {
            query = query.filter(security_classes::is_archived.eq(false));
        }
        query
            .order((security_classes::name.asc(), security_classes::id.asc()))
            .select(SecurityClassDB::as_select())
            .load(&mut conn)
            .into_core()?
            .into_iter()
            .map(SecurityClass::try_from)
            .collect()
    }
}
