use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;

use super::{
    DeliveryOrderRepository, InvoiceRepository, OrderRepository, ProductRepository, StoreResult,
};
use crate::model::{
    DeliveryOrder, DeliveryStatus, Invoice, InvoiceStatus, Order, OrderItem, Product,
};
use crate::seed::SeedData;

/// Repository over seed data held in process memory.
///
/// Catalogue and order tables are fixed after construction. Only the status
/// of invoices and delivery orders can change.
pub struct MemoryStore {
    products: Vec<Product>,
    orders: Vec<Order>,
    order_items: Vec<OrderItem>,
    invoices: RwLock<Vec<Invoice>>,
    delivery_orders: RwLock<Vec<DeliveryOrder>>,
}

impl MemoryStore {
    pub fn new(data: &SeedData) -> Self {
        let mut products = data.products.clone();
        products.sort_by_key(|p| p.id);
        let mut order_items = data.order_items.clone();
        order_items.sort_by_key(|i| i.id);

        Self {
            products,
            orders: data.orders.clone(),
            order_items,
            invoices: RwLock::new(data.invoices.clone()),
            delivery_orders: RwLock::new(data.delivery_orders.clone()),
        }
    }

    /// A store loaded with the bundled mock tables.
    pub fn seeded() -> Self {
        Self::new(&SeedData::mock())
    }
}

#[async_trait]
impl ProductRepository for MemoryStore {
    async fn list_products(&self) -> StoreResult<Vec<Product>> {
        Ok(self.products.clone())
    }

    async fn product_by_id(&self, id: i32) -> StoreResult<Option<Product>> {
        Ok(self.products.iter().find(|p| p.id == id).cloned())
    }

    async fn search_products(&self, term: &str) -> StoreResult<Vec<Product>> {
        Ok(self
            .products
            .iter()
            .filter(|p| p.matches(term))
            .cloned()
            .collect())
    }

    async fn products_in_category(&self, category: &str) -> StoreResult<Vec<Product>> {
        Ok(self
            .products
            .iter()
            .filter(|p| p.category == category)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl OrderRepository for MemoryStore {
    async fn order_by_number(&self, order_number: &str) -> StoreResult<Option<Order>> {
        Ok(self
            .orders
            .iter()
            .find(|o| o.order_number == order_number)
            .cloned())
    }

    async fn order_items(&self, order_id: i32) -> StoreResult<Vec<OrderItem>> {
        Ok(self
            .order_items
            .iter()
            .filter(|i| i.order_id == order_id)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl InvoiceRepository for MemoryStore {
    async fn list_invoices(&self) -> StoreResult<Vec<Invoice>> {
        Ok(self.invoices.read().clone())
    }

    async fn invoice_by_id(&self, id: i32) -> StoreResult<Option<Invoice>> {
        Ok(self.invoices.read().iter().find(|i| i.id == id).cloned())
    }

    async fn update_invoice_status(&self, id: i32, status: InvoiceStatus) -> StoreResult<bool> {
        let mut invoices = self.invoices.write();
        match invoices.iter_mut().find(|i| i.id == id) {
            Some(invoice) => {
                invoice.apply_status(status, Utc::now());
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[async_trait]
impl DeliveryOrderRepository for MemoryStore {
    async fn list_delivery_orders(&self) -> StoreResult<Vec<DeliveryOrder>> {
        Ok(self.delivery_orders.read().clone())
    }

    async fn delivery_order_by_id(&self, id: i32) -> StoreResult<Option<DeliveryOrder>> {
        Ok(self
            .delivery_orders
            .read()
            .iter()
            .find(|d| d.id == id)
            .cloned())
    }

    async fn update_delivery_status(
        &self,
        id: i32,
        status: DeliveryStatus,
    ) -> StoreResult<bool> {
        let mut records = self.delivery_orders.write();
        match records.iter_mut().find(|d| d.id == id) {
            Some(record) => {
                record.apply_status(status, Utc::now());
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
