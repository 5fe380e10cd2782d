use super::securities_model::{NewSecurityClass, SecurityClass};
use crate::errors::Result;

/// Read access to security classes.
pub trait SecurityClassRepositoryTrait: Send + Sync {
    fn get_by_id(&self, security_class_id: &str) -> Result<Option<SecurityClass>>;

    /// Lists the entity's classes ordered by name.
    fn list_by_entity(&self, entity_id: &str, include_archived: bool)
        -> Result<Vec<SecurityClass>>;
}

#[async_trait::async_trait]
pub trait SecurityClassServiceTrait: Send + Sync {
    async fn create_security_class(
        &self,
        actor_id: Option<String>,
        new_class: NewSecurityClass,
    ) -> Result<SecurityClass>;

    /// Marks the class archived. Archiving an archived class is a no-op.
    async fn archive_security_class(
        &self,
        actor_id: Option<String>,
        security_class_id: &str,
    ) -> Result<SecurityClass>;

    async fn restore_security_class(
        &self,
        actor_id: Option<String>,
        security_class_id: &str,
    ) -> Result<SecurityClass>;

    fn get_security_class(&self, security_class_id: &str) -> Result<SecurityClass>;

    fn list_security_classes(
        &self,
        entity_id: &str,
        include_archived: bool,
    ) -> Result<Vec<SecurityClass>>;
}
