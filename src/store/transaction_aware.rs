use async_trait::async_trait;
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::{info, warn};

use super::{StoreError, StoreResult};

/// Trait for components that need to be notified of transaction lifecycle events.
///
/// Observers are registered with a [`super::UnitOfWorkSession`] and are called
/// only after the database has accepted the commit or rollback.
#[async_trait]
pub trait TransactionAware: Send + Sync {
    /// Called after a successful transaction commit.
    async fn on_commit(&self) -> StoreResult<()>;

    /// Called after a transaction rollback.
    async fn on_rollback(&self) -> StoreResult<()>;
}

/// Outcome recorded by a [`StatusAudit`] once its transaction settles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuditOutcome {
    Pending,
    Committed,
    RolledBack,
}

/// Logs an administrative status change once the transaction carrying it settles.
pub struct StatusAudit {
    entity: &'static str,
    id: i32,
    status: String,
    outcome: RwLock<AuditOutcome>,
}

impl StatusAudit {
    pub fn new(entity: &'static str, id: i32, status: impl Into<String>) -> Arc<Self> {
        Arc::new(Self {
            entity,
            id,
            status: status.into(),
            outcome: RwLock::new(AuditOutcome::Pending),
        })
    }

    pub fn outcome(&self) -> AuditOutcome {
        *self.outcome.read()
    }

    fn settle(&self, outcome: AuditOutcome) -> StoreResult<()> {
        let mut current = self.outcome.write();
        if *current != AuditOutcome::Pending {
            return Err(StoreError::AlreadySettled(self.entity, self.id));
        }
        *current = outcome;
        Ok(())
    }
}

#[async_trait]
impl TransactionAware for StatusAudit {
    async fn on_commit(&self) -> StoreResult<()> {
        self.settle(AuditOutcome::Committed)?;
        info!(entity = self.entity, id = self.id, status = %self.status, "status updated");
        Ok(())
    }

    async fn on_rollback(&self) -> StoreResult<()> {
        self.settle(AuditOutcome::RolledBack)?;
        warn!(entity = self.entity, id = self.id, status = %self.status, "status update rolled back");
        Ok(())
    }
}
