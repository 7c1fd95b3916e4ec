use async_trait::async_trait;
use parking_lot::RwLock;
use sqlx::{PgPool, Postgres, Transaction};
use std::sync::Arc;
use tracing::debug;

use super::{Executor, StoreError, StoreResult, TransactionAware};

/// Opens transaction sessions for write paths.
#[async_trait]
pub trait UnitOfWork: Send + Sync {
    type Session: UnitOfWorkSession;

    /// Begin a new transaction session.
    async fn begin(&self) -> StoreResult<Self::Session>;
}

/// A single database transaction plus the observers waiting on its outcome.
#[async_trait]
pub trait UnitOfWorkSession: Send + Sync {
    fn executor(&self) -> &Executor;

    fn register_transaction_aware(&self, observer: Arc<dyn TransactionAware>);

    /// Commit, then notify every registered observer.
    async fn commit(self) -> StoreResult<()>;

    /// Roll back, then notify every registered observer.
    async fn rollback(self) -> StoreResult<()>;
}

#[derive(Clone)]
pub struct PgUnitOfWork {
    pool: PgPool,
}

impl PgUnitOfWork {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UnitOfWork for PgUnitOfWork {
    type Session = PgSession;

    async fn begin(&self) -> StoreResult<Self::Session> {
        let tx = self.pool.begin().await?;
        debug!("transaction opened");
        Ok(PgSession::new(tx))
    }
}

pub struct PgSession {
    executor: Executor,
    observers: RwLock<Vec<Arc<dyn TransactionAware>>>,
}

impl PgSession {
    pub fn new(tx: Transaction<'static, Postgres>) -> Self {
        Self {
            executor: Executor::new(tx),
            observers: RwLock::new(Vec::new()),
        }
    }

    fn observers(&self) -> Vec<Arc<dyn TransactionAware>> {
        self.observers.read().clone()
    }
}

#[async_trait]
impl UnitOfWorkSession for PgSession {
    fn executor(&self) -> &Executor {
        &self.executor
    }

    fn register_transaction_aware(&self, observer: Arc<dyn TransactionAware>) {
        self.observers.write().push(observer);
    }

    async fn commit(self) -> StoreResult<()> {
        let tx = self.executor.take_transaction().await?;
        tx.commit()
            .await
            .map_err(|e| StoreError::CommitFailed(e.to_string()))?;

        for observer in self.observers() {
            observer.on_commit().await?;
        }
        Ok(())
    }

    async fn rollback(self) -> StoreResult<()> {
        let tx = self.executor.take_transaction().await?;
        tx.rollback()
            .await
            .map_err(|e| StoreError::RollbackFailed(e.to_string()))?;

        for observer in self.observers() {
            observer.on_rollback().await?;
        }
        Ok(())
    }
}
