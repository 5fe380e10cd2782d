use chrono::Utc;
use log::info;
use std::sync::Arc;
use uuid::Uuid;

use super::securities_model::{NewSecurityClass, SecurityClass};
use super::securities_traits::{SecurityClassRepositoryTrait, SecurityClassServiceTrait};
use crate::audit::{changed_fields, log_create, log_record_changes, AuditAction, AuditSnapshot};
use crate::constants::TABLE_SECURITY_CLASSES;
use crate::errors::{Error, Result};
use crate::transactions::LedgerError;
use crate::unit_of_work::{require_actor, run_in_unit_of_work, UnitOfWorkExecutor};

const ARCHIVE_FIELDS: &[&str] = &["is_active", "is_archived"];

pub struct SecurityClassService {
    repository: Arc<dyn SecurityClassRepositoryTrait>,
    executor: Arc<dyn UnitOfWorkExecutor>,
}

impl SecurityClassService {
    pub fn new(
        repository: Arc<dyn SecurityClassRepositoryTrait>,
        executor: Arc<dyn UnitOfWorkExecutor>,
    ) -> Self {
        Self {
            repository,
            executor,
        }
    }

    async fn set_archived(
        &self,
        actor_id: Option<String>,
        security_class_id: &str,
        archived: bool,
    ) -> Result<SecurityClass> {
        let actor = require_actor(actor_id)?;
        let class_id = security_class_id.to_string();

        let class = run_in_unit_of_work(self.executor.as_ref(), move |uow| {
            let current = uow
                .lock_security_class(&class_id)?
                .ok_or_else(|| LedgerError::SecurityClassNotFound(class_id.clone()))?;
            let mut next = current.clone();
            next.is_archived = archived;
            next.is_active = !archived;

            let changes = changed_fields(
                &current.audit_fields(),
                &next.audit_fields(),
                ARCHIVE_FIELDS,
            );
            if changes.is_empty() {
                return Ok(current);
            }
            next.updated_at = Utc::now();
            uow.update_security_class(&next)?;
            log_record_changes(
                uow,
                &next.entity_id,
                &actor,
                AuditAction::Update,
                TABLE_SECURITY_CLASSES,
                &next.id,
                changes,
            )?;
            Ok(next)
        })
        .await?;

        info!(
            "Security class {} is now {}",
            class.id,
            if class.is_archived { "archived" } else { "active" }
        );
        Ok(class)
    }
}

#[async_trait::async_trait]
impl SecurityClassServiceTrait for SecurityClassService {
    async fn create_security_class(
        &self,
        actor_id: Option<String>,
        new_class: NewSecurityClass,
    ) -> Result<SecurityClass> {
        let actor = require_actor(actor_id)?;
        new_class.validate()?;

        let now = Utc::now();
        let class = SecurityClass {
            id: Uuid::new_v4().to_string(),
            entity_id: new_class.entity_id.clone(),
            name: new_class.name.trim().to_string(),
            symbol: new_class
                .symbol
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty()),
            has_voting_rights: new_class.has_voting_rights,
            has_dividend_rights: new_class.has_dividend_rights,
            is_active: true,
            is_archived: false,
            created_at: now,
            updated_at: now,
        };

        let created = run_in_unit_of_work(self.executor.as_ref(), move |uow| {
            if uow.find_entity(&class.entity_id)?.is_none() {
                return Err(LedgerError::EntityNotFound(class.entity_id.clone()).into());
            }
            if uow
                .find_security_class_by_name(&class.entity_id, &class.name)?
                .is_some()
            {
                return Err(Error::ConstraintViolation(format!(
                    "Security class '{}' already exists in entity {}",
                    class.name, class.entity_id
                )));
            }
            uow.insert_security_class(&class)?;
            log_create(
                uow,
                &class.entity_id,
                &actor,
                TABLE_SECURITY_CLASSES,
                &class.id,
                class.audit_fields(),
            )?;
            Ok(class)
        })
        .await?;

        info!(
            "Created security class {} '{}' in entity {}",
            created.id, created.name, created.entity_id
        );
        Ok(created)
    }

    async fn archive_security_class(
        &self,
        actor_id: Option<String>,
        security_class_id: &str,
    ) -> Result<SecurityClass> {
        self.set_archived(actor_id, security_class_id, true).await
    }

    async fn restore_security_class(
        &self,
        actor_id: Option<String>,
        security_class_id: &str,
    ) -> Result<SecurityClass> {
        self.set_archived(actor_id, security_class_id, false).await
    }

    fn get_security_class(&self, security_class_id: &str) -> Result<SecurityClass> {
        self.repository
            .get_by_id(security_class_id)?
            .ok_or_else(|| LedgerError::SecurityClassNotFound(security_class_id.to_string()).into())
    }

    fn list_security_classes(
        &self,
        entity_id: &str,
        include_archived: bool,
    ) -> Result<Vec<SecurityClass>> {
        self.repository.list_by_entity(entity_id, include_archived)
    }
}
