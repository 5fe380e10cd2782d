//! Unit of work - the atomic write scope shared by every register mutation.
//!
//! Services describe a mutation as a closure over [`LedgerUnitOfWork`]; the
//! storage layer runs that closure inside one database transaction, so
//! reads, writes and audit entries made by the closure commit or roll back
//! together.

mod unit_of_work_traits;

#[cfg(test)]
pub(crate) mod in_memory;

pub use unit_of_work_traits::{
    require_actor, run_in_unit_of_work, LedgerUnitOfWork, UnitOfWorkExecutor, UnitOfWorkJob,
    UnitOfWorkOutput,
};
