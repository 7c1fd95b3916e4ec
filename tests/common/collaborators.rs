use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use wholesale_rpc::chat::{CatalogChat, ChatBackend, ChatError, ChatMessage, ChatReply};
use wholesale_rpc::model::{
    DeliveryOrder, DeliveryStatus, Invoice, InvoiceStatus, Order, OrderItem, Product,
};
use wholesale_rpc::store::{
    DeliveryOrderRepository, InvoiceRepository, OrderRepository, ProductRepository,
};
use wholesale_rpc::{MemoryStore, StoreError, StoreResult};

/// Seeded memory store that counts every repository call.
pub struct CountingStore {
    inner: MemoryStore,
    calls: AtomicUsize,
}

impl CountingStore {
    pub fn seeded() -> Arc<Self> {
        Arc::new(Self {
            inner: MemoryStore::seeded(),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn hit(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl ProductRepository for CountingStore {
    async fn list_products(&self) -> StoreResult<Vec<Product>> {
        self.hit();
        self.inner.list_products().await
    }

    async fn product_by_id(&self, id: i32) -> StoreResult<Option<Product>> {
        self.hit();
        self.inner.product_by_id(id).await
    }

    async fn search_products(&self, term: &str) -> StoreResult<Vec<Product>> {
        self.hit();
        self.inner.search_products(term).await
    }

    async fn products_in_category(&self, category: &str) -> StoreResult<Vec<Product>> {
        self.hit();
        self.inner.products_in_category(category).await
    }
}

#[async_trait]
impl OrderRepository for CountingStore {
    async fn order_by_number(&self, order_number: &str) -> StoreResult<Option<Order>> {
        self.hit();
        self.inner.order_by_number(order_number).await
    }

    async fn order_items(&self, order_id: i32) -> StoreResult<Vec<OrderItem>> {
        self.hit();
        self.inner.order_items(order_id).await
    }
}

#[async_trait]
impl InvoiceRepository for CountingStore {
    async fn list_invoices(&self) -> StoreResult<Vec<Invoice>> {
        self.hit();
        self.inner.list_invoices().await
    }

    async fn invoice_by_id(&self, id: i32) -> StoreResult<Option<Invoice>> {
        self.hit();
        self.inner.invoice_by_id(id).await
    }

    async fn update_invoice_status(&self, id: i32, status: InvoiceStatus) -> StoreResult<bool> {
        self.hit();
        self.inner.update_invoice_status(id, status).await
    }
}

#[async_trait]
impl DeliveryOrderRepository for CountingStore {
    async fn list_delivery_orders(&self) -> StoreResult<Vec<DeliveryOrder>> {
        self.hit();
        self.inner.list_delivery_orders().await
    }

    async fn delivery_order_by_id(&self, id: i32) -> StoreResult<Option<DeliveryOrder>> {
        self.hit();
        self.inner.delivery_order_by_id(id).await
    }

    async fn update_delivery_status(
        &self,
        id: i32,
        status: DeliveryStatus,
    ) -> StoreResult<bool> {
        self.hit();
        self.inner.update_delivery_status(id, status).await
    }
}

/// Chat backend that counts calls before delegating to the catalogue chat.
pub struct CountingChat {
    inner: CatalogChat,
    calls: AtomicUsize,
}

impl CountingChat {
    pub fn over(products: Arc<dyn ProductRepository>) -> Arc<Self> {
        Arc::new(Self {
            inner: CatalogChat::new(products),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn hit(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl ChatBackend for CountingChat {
    async fn reply(
        &self,
        messages: &[ChatMessage],
        user_query: &str,
    ) -> Result<ChatReply, ChatError> {
        self.hit();
        self.inner.reply(messages, user_query).await
    }

    async fn alternatives(&self, product_id: i32) -> Result<Vec<Product>, ChatError> {
        self.hit();
        self.inner.alternatives(product_id).await
    }

    async fn export_transcript(
        &self,
        email: &str,
        messages: &[ChatMessage],
    ) -> Result<bool, ChatError> {
        self.hit();
        self.inner.export_transcript(email, messages).await
    }
}

/// Product repository whose connection is always gone.
pub struct FailingStore;

#[async_trait]
impl ProductRepository for FailingStore {
    async fn list_products(&self) -> StoreResult<Vec<Product>> {
        Err(StoreError::Database(sqlx::Error::PoolClosed))
    }

    async fn product_by_id(&self, _id: i32) -> StoreResult<Option<Product>> {
        Err(StoreError::Database(sqlx::Error::PoolClosed))
    }

    async fn search_products(&self, _term: &str) -> StoreResult<Vec<Product>> {
        Err(StoreError::Database(sqlx::Error::PoolClosed))
    }

    async fn products_in_category(&self, _category: &str) -> StoreResult<Vec<Product>> {
        Err(StoreError::Database(sqlx::Error::PoolClosed))
    }
}
