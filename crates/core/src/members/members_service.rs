use chrono::Utc;
use log::{info, warn};
use std::sync::Arc;
use uuid::Uuid;

use super::members_model::{Member, NewMember};
use super::members_traits::{MemberRepositoryTrait, MemberServiceTrait};
use crate::audit::{log_create, log_delete, AuditSnapshot};
use crate::config::RegistryConfig;
use crate::constants::TABLE_MEMBERS;
use crate::errors::{Error, Result};
use crate::transactions::LedgerError;
use crate::unit_of_work::{require_actor, run_in_unit_of_work, UnitOfWorkExecutor};

pub struct MemberService {
    repository: Arc<dyn MemberRepositoryTrait>,
    executor: Arc<dyn UnitOfWorkExecutor>,
    config: RegistryConfig,
}

impl MemberService {
    pub fn new(
        repository: Arc<dyn MemberRepositoryTrait>,
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

fn trimmed(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[async_trait::async_trait]
impl MemberServiceTrait for MemberService {
    async fn create_member(
        &self,
        actor_id: Option<String>,
        new_member: NewMember,
    ) -> Result<Member> {
        let actor = require_actor(actor_id)?;
        new_member.validate()?;

        let now = Utc::now();
        let member = Member {
            id: Uuid::new_v4().to_string(),
            entity_id: new_member.entity_id.clone(),
            member_number: trimmed(new_member.member_number),
            member_type: new_member.member_type,
            name: new_member.name.trim().to_string(),
            email: trimmed(new_member.email),
            country: self.config.country_or_default(new_member.country.as_deref()),
            created_at: now,
            updated_at: now,
        };

        let created = run_in_unit_of_work(self.executor.as_ref(), move |uow| {
            if uow.find_entity(&member.entity_id)?.is_none() {
                return Err(LedgerError::EntityNotFound(member.entity_id.clone()).into());
            }
            if let Some(number) = member.member_number.as_deref() {
                if uow
                    .find_member_by_number(&member.entity_id, number)?
                    .is_some()
                {
                    return Err(Error::ConstraintViolation(format!(
                        "Member number '{}' already exists in entity {}",
                        number, member.entity_id
                    )));
                }
            }
            uow.insert_member(&member)?;
            log_create(
                uow,
                &member.entity_id,
                &actor,
                TABLE_MEMBERS,
                &member.id,
                member.audit_fields(),
            )?;
            Ok(member)
        })
        .await?;

        info!("Created member {} in entity {}", created.id, created.entity_id);
        Ok(created)
    }

    async fn delete_member(&self, actor_id: Option<String>, member_id: &str) -> Result<()> {
        let actor = require_actor(actor_id)?;
        let id = member_id.to_string();

        run_in_unit_of_work(self.executor.as_ref(), move |uow| {
            let member = uow
                .find_member(&id)?
                .ok_or_else(|| LedgerError::MemberNotFound(vec![id.clone()]))?;
            let references = uow.count_member_references(&id)?;
            if references > 0 {
                warn!(
                    "Refusing to delete member {}: referenced by {} transaction(s)",
                    id, references
                );
                return Err(LedgerError::MemberInUse(id.clone()).into());
            }
            uow.delete_member(&id)?;
            log_delete(
                uow,
                &member.entity_id,
                &actor,
                TABLE_MEMBERS,
                &member.id,
                member.audit_fields(),
            )?;
            Ok(())
        })
        .await?;

        info!("Deleted member {}", member_id);
        Ok(())
    }

    fn get_member(&self, member_id: &str) -> Result<Member> {
        self.repository
            .get_by_id(member_id)?
            .ok_or_else(|| LedgerError::MemberNotFound(vec![member_id.to_string()]).into())
    }

    fn list_members(&self, entity_id: &str) -> Result<Vec<Member>> {
        self.repository.list_by_entity(entity_id)
    }
}
