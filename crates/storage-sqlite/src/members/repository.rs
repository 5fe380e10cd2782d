use diesel::prelude::*;
use std::sync::Arc;

use sharebook_core::members::{Member, MemberRepositoryTrait};
use sharebook_core::Result;

use super::model::MemberDB;
use crate::db::{get_connection, DbPool};
use crate::errors::IntoCore;
use crate::schema::members;

pub struct MemberRepository {
    pool: Arc<DbPool>,
}

impl MemberRepository {
    pub fn new(pool: Arc<DbPool>) -> Self {
        Self { pool }
    }
}

impl MemberRepositoryTrait for MemberRepository {
    fn get_by_id(&self, member_id: &str) -> Result<Option<Member>> {
        let mut conn = get_connection(&self.pool)?;
        members::table
            .find(member_id)
            .select(MemberDB::as_select())
            .first(&mut conn)
            .optional()
            .into_core()?
            .map(Member::try_from)
            .transpose()
    }

    fn list_by_entity(&self, entity_id: &str) -> Result<Vec<Member>> {
        let mut conn = get_connection(&self.pool)?;
        members::table
            .filter(members::entity_id.eq(entity_id))
            .order((members::name.asc(), members::id.asc()))
            .select(MemberDB::as_select())
            .load(&mut conn)
            .into_core()?
            .into_iter()
            .map(Member::try_from)
            .collect()
    }
}
