//! SQLite implementation of the ledger unit of work.

mod executor;
mod sqlite_unit_of_work;

pub use executor::SqliteUnitOfWorkExecutor;
pub use sqlite_unit_of_work::SqliteUnitOfWork;
