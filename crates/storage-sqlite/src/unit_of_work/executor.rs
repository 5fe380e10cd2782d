use async_trait::async_trait;

use sharebook_core::unit_of_work::{UnitOfWorkExecutor, UnitOfWorkJob, UnitOfWorkOutput};
use sharebook_core::Result;

use super::SqliteUnitOfWork;
use crate::db::WriteHandle;

/// Runs ledger jobs on the writer actor, one immediate transaction per job.
///
/// Every write in the process goes through the same actor, so a job that
/// reads a security class holds it unchanged until the job commits.
#[derive(Clone)]
pub struct SqliteUnitOfWorkExecutor {
    writer: WriteHandle,
}

impl SqliteUnitOfWorkExecutor {
    pub fn new(writer: WriteHandle) -> Self {
        Self { writer }
    }
}

#[async_trait]
impl UnitOfWorkExecutor for SqliteUnitOfWorkExecutor {
    async fn execute_job(&self, job: UnitOfWorkJob) -> Result<UnitOfWorkOutput> {
        self.writer
            .exec_erased(Box::new(move |conn| {
                let mut uow = SqliteUnitOfWork::new(conn);
                job(&mut uow)
            }))
            .await
    }
}
