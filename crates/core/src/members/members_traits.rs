use super::members_model::{Member, NewMember};
use crate::errors::Result;

/// Read access to members.
pub trait MemberRepositoryTrait: Send + Sync {
    fn get_by_id(&self, member_id: &str) -> Result<Option<Member>>;

    /// Lists the entity's members ordered by name.
    fn list_by_entity(&self, entity_id: &str) -> Result<Vec<Member>>;
}

#[async_trait::async_trait]
pub trait MemberServiceTrait: Send + Sync {
    async fn create_member(&self, actor_id: Option<String>, new_member: NewMember)
        -> Result<Member>;

    /// Deletes a member that no transaction references.
    ///
    /// Fails with `MemberInUse` when the member appears on either side of
    /// any transaction.
    async fn delete_member(&self, actor_id: Option<String>, member_id: &str) -> Result<()>;

    fn get_member(&self, member_id: &str) -> Result<Member>;
    fn list_members(&self, entity_id: &str) -> Result<Vec<Member>>;
}
