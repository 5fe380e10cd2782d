use chrono::Utc;
use log::info;
use std::sync::Arc;
use uuid::Uuid;

use super::entities_model::{Entity, NewEntity};
use super::entities_traits::{EntityRepositoryTrait, EntityServiceTrait};
use crate::audit::{log_create, AuditSnapshot};
use crate::config::RegistryConfig;
use crate::constants::TABLE_ENTITIES;
use crate::errors::Result;
use crate::transactions::LedgerError;
use crate::unit_of_work::{require_actor, run_in_unit_of_work, UnitOfWorkExecutor};

pub struct EntityService {
    repository: Arc<dyn EntityRepositoryTrait>,
    executor: Arc<dyn UnitOfWorkExecutor>,
    config: RegistryConfig,
}

impl EntityService {
    pub fn new(
        repository: Arc<dyn EntityRepositoryTrait>,
        executor: Arc<dyn UnitOfWorkExecutor>,
        config: RegistryConfig,
    ) -> Self {
        Self {
            repository,
            executor,
            config,
        }
    }
}

#[async_trait::async_trait]
impl EntityServiceTrait for EntityService {
    async fn create_entity(
        &self,
        actor_id: Option<String>,
        new_entity: NewEntity,
    ) -> Result<Entity> {
        let actor = require_actor(actor_id)?;
        new_entity.validate()?;

        let now = Utc::now();
        let entity = Entity {
            id: Uuid::new_v4().to_string(),
            name: new_entity.name.trim().to_string(),
            country: self.config.country_or_default(new_entity.country.as_deref()),
            created_at: now,
            updated_at: now,
        };

        let created = run_in_unit_of_work(self.executor.as_ref(), move |uow| {
            uow.insert_entity(&entity)?;
            log_create(
                uow,
                &entity.id,
                &actor,
                TABLE_ENTITIES,
                &entity.id,
                entity.audit_fields(),
            )?;
            Ok(entity)
        })
        .await?;

        info!("Created entity {} ({})", created.id, created.name);
        Ok(created)
    }

    fn get_entity(&self, entity_id: &str) -> Result<Entity> {
        self.repository
            .get_by_id(entity_id)?
            .ok_or_else(|| LedgerError::EntityNotFound(entity_id.to_string()).into())
    }

    fn list_entities(&self) -> Result<Vec<Entity>> {
        self.repository.list()
    }
}
