//! Entities module - the issuing companies that own every other register record.

mod entities_model;
mod entities_service;
mod entities_traits;

pub use entities_model::{Entity, NewEntity};
pub use entities_service::EntityService;
pub use entities_traits::{EntityRepositoryTrait, EntityServiceTrait};
