use super::DbPool;
use crate::errors::StorageError;
use diesel::SqliteConnection;
use log::error;
use sharebook_core::errors::{Error, Result};
use std::any::Any;
use tokio::sync::{mpsc, oneshot};

type ErasedOutput = Box<dyn Any + Send + 'static>;

/// A job for the writer actor; its return type is erased so one channel
/// carries every kind of write.
pub type WriteJob = Box<dyn FnOnce(&mut SqliteConnection) -> Result<ErasedOutput> + Send + 'static>;

type Envelope = (WriteJob, oneshot::Sender<Result<ErasedOutput>>);

/// Handle for sending jobs to the writer actor.
#[derive(Clone)]
pub struct WriteHandle {
    tx: mpsc::Sender<Envelope>,
}

impl WriteHandle {
    /// Runs `job` on the writer's connection inside an immediate transaction.
    ///
    /// The transaction commits when the job returns `Ok` and rolls back
    /// otherwise.
    pub async fn exec<F, T>(&self, job: F) -> Result<T>
    where
        F: FnOnce(&mut SqliteConnection) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let boxed = self
            .exec_erased(Box::new(move |c| {
                job(c).map(|v| Box::new(v) as ErasedOutput)
            }))
            .await?;
        boxed
            .downcast::<T>()
            .map(|v| *v)
            .map_err(|_| Error::Unexpected("Writer actor returned an unexpected type".to_string()))
    }

    /// Like [`exec`](Self::exec) for a job whose output is already erased.
    pub async fn exec_erased(&self, job: WriteJob) -> Result<ErasedOutput> {
        let (ret_tx, ret_rx) = oneshot::channel();

        self.tx
            .send((job, ret_tx))
            .await
            .map_err(|_| StorageError::WriterUnavailable("writer actor has stopped".to_string()))?;

        ret_rx.await.map_err(|_| {
            Error::from(StorageError::WriterUnavailable(
                "writer actor dropped the reply".to_string(),
            ))
        })?
    }
}

/// Spawns a background Tokio task that acts as the single writer to the
/// database. The actor owns one pooled connection and processes jobs in
/// arrival order, so no two write transactions ever overlap.
pub fn spawn_writer(pool: DbPool) -> WriteHandle {
    let (tx, mut rx) = mpsc::channel::<Envelope>(1024);

    tokio::spawn(async move {
        let mut conn = match pool.get() {
            Ok(conn) => conn,
            Err(e) => {
                // Dropping the receiver makes every pending and future send fail.
                error!("Writer actor could not acquire a connection: {}", e);
                return;
            }
        };

        while let Some((job, reply_tx)) = rx.recv().await {
            let result: Result<ErasedOutput> = conn
                .immediate_transaction::<_, StorageError, _>(|c| job(c).map_err(StorageError::from))
                .map_err(Error::from);

            // The requester may have gone away; nothing to do then.
            let _ = reply_tx.send(result);
        }
    });

    WriteHandle { tx }
}
