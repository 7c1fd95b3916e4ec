use sqlx::{Postgres, Transaction};
use std::sync::Arc;
use tokio::sync::{Mutex, MutexGuard};

use super::StoreResult;

type SharedTransaction = Arc<Mutex<Option<Transaction<'static, Postgres>>>>;

/// Shared handle on the transaction a unit-of-work session is running.
///
/// Cloned into every query issued inside the session; the transaction itself
/// is taken out exactly once, on commit or rollback.
#[derive(Clone, Debug)]
pub struct Executor {
    tx: SharedTransaction,
}

/// Locked access to a live transaction.
pub struct TransactionGuard<'a> {
    guard: MutexGuard<'a, Option<Transaction<'static, Postgres>>>,
}

impl TransactionGuard<'_> {
    /// The open transaction, or `PoolClosed` if the session already settled.
    pub fn transaction(&mut self) -> StoreResult<&mut Transaction<'static, Postgres>> {
        Ok(self.guard.as_mut().ok_or(sqlx::Error::PoolClosed)?)
    }
}

impl Executor {
    pub fn new(tx: Transaction<'static, Postgres>) -> Self {
        Self {
            tx: Arc::new(Mutex::new(Some(tx))),
        }
    }

    pub async fn lock(&self) -> TransactionGuard<'_> {
        TransactionGuard {
            guard: self.tx.lock().await,
        }
    }

    /// Takes ownership of the transaction, leaving None in its place.
    pub(crate) async fn take_transaction(&self) -> StoreResult<Transaction<'static, Postgres>> {
        Ok(self.tx.lock().await.take().ok_or(sqlx::Error::PoolClosed)?)
    }
}
