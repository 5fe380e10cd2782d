mod model;
mod repository;

pub use model::EntityDB;
pub use repository::EntityRepository;
