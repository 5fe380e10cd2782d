//! Securities module - security classes issued by an entity.

mod securities_model;
mod securities_service;
mod securities_traits;


pub use securities_model::{NewSecurityClass, SecurityClass};
pub use securities_service::SecurityClassService;
pub use securities_traits::{SecurityClassRepositoryTrait, SecurityClassServiceTrait};
