mod model;
mod repository;

pub use model::SecurityClassDB;
pub use repository::SecurityClassRepository;
