//! Database access functions.
//!
//! Every function maps to one query against the backing store. Lookups that
//! match nothing return `None` or an empty `Vec`; only transport and decode
//! failures are errors.

pub mod executor;
pub mod memory;
pub mod postgres;
pub mod schema;
pub mod transaction_aware;
pub mod unit_of_work;

use async_trait::async_trait;
use std::sync::Arc;

use crate::model::{
    DeliveryOrder, DeliveryStatus, Invoice, InvoiceStatus, Order, OrderItem, Product,
};

pub use executor::Executor;
pub use memory::MemoryStore;
pub use postgres::PgStore;
pub use transaction_aware::{AuditOutcome, StatusAudit, TransactionAware};
pub use unit_of_work::{PgSession, PgUnitOfWork, UnitOfWork, UnitOfWorkSession};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Transaction commit failed: {0}")]
    CommitFailed(String),

    #[error("Transaction rollback failed: {0}")]
    RollbackFailed(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Unreadable value in column {column}: {value}")]
    Decode { column: &'static str, value: String },

    #[error("Status change on {0} {1} was already settled")]
    AlreadySettled(&'static str, i32),
}

pub type StoreResult<T> = Result<T, StoreError>;

#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// All products ordered by id.
    async fn list_products(&self) -> StoreResult<Vec<Product>>;

    async fn product_by_id(&self, id: i32) -> StoreResult<Option<Product>>;

    /// Products whose name or description contains `term`, ignoring case.
    async fn search_products(&self, term: &str) -> StoreResult<Vec<Product>>;

    async fn products_in_category(&self, category: &str) -> StoreResult<Vec<Product>>;
}

#[async_trait]
pub trait OrderRepository: Send + Sync {
    async fn order_by_number(&self, order_number: &str) -> StoreResult<Option<Order>>;

    /// Line items of an order ordered by id; empty for unknown orders.
    async fn order_items(&self, order_id: i32) -> StoreResult<Vec<OrderItem>>;
}

#[async_trait]
pub trait InvoiceRepository: Send + Sync {
    async fn list_invoices(&self) -> StoreResult<Vec<Invoice>>;

    async fn invoice_by_id(&self, id: i32) -> StoreResult<Option<Invoice>>;

    /// Returns `false` when no invoice has this id.
    async fn update_invoice_status(&self, id: i32, status: InvoiceStatus) -> StoreResult<bool>;
}

#[async_trait]
pub trait DeliveryOrderRepository: Send + Sync {
    async fn list_delivery_orders(&self) -> StoreResult<Vec<DeliveryOrder>>;

    async fn delivery_order_by_id(&self, id: i32) -> StoreResult<Option<DeliveryOrder>>;

    /// Returns `false` when no delivery order has this id.
    async fn update_delivery_status(&self, id: i32, status: DeliveryStatus)
        -> StoreResult<bool>;
}

/// The repositories the RPC layer dispatches to.
#[derive(Clone)]
pub struct Repositories {
    pub products: Arc<dyn ProductRepository>,
    pub orders: Arc<dyn OrderRepository>,
    pub invoices: Arc<dyn InvoiceRepository>,
    pub delivery_orders: Arc<dyn DeliveryOrderRepository>,
}

impl Repositories {
    /// Uses one store for every resource.
    pub fn from_store<S>(store: Arc<S>) -> Self
    where
        S: ProductRepository
            + OrderRepository
            + InvoiceRepository
            + DeliveryOrderRepository
            + 'static,
    {
        Self {
            products: store.clone(),
            orders: store.clone(),
            invoices: store.clone(),
            delivery_orders: store,
        }
    }
}
