use super::entities_model::{Entity, NewEntity};
use crate::errors::Result;

/// Read access to entities. Writes go through the unit of work.
pub trait EntityRepositoryTrait: Send + Sync {
    fn get_by_id(&self, entity_id: &str) -> Result<Option<Entity>>;
    fn list(&self) -> Result<Vec<Entity>>;
}

#[async_trait::async_trait]
pub trait EntityServiceTrait: Send + Sync {
    /// Creates an entity; the country falls back to the configured default.
    async fn create_entity(&self, actor_id: Option<String>, new_entity: NewEntity)
        -> Result<Entity>;
    fn get_entity(&self, entity_id: &str) -> Result<Entity>;
    fn list_entities(&self) -> Result<Vec<Entity>>;
}
