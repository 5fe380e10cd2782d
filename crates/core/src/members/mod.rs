//! Members module - holders and counterparties of an entity's securities.

mod members_model;
mod members_service;
mod members_traits;


pub use members_model::{Member, MemberType, NewMember};
pub use members_service::MemberService;
pub use members_traits::{MemberRepositoryTrait, MemberServiceTrait};
