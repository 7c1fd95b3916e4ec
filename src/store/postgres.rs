use async_trait::async_trait;
use serde_json::Value;
use sqlx::postgres::PgRow;
use sqlx::types::Json;
use sqlx::{PgPool, Row};
use std::str::FromStr;
use tracing::{debug, warn};

use super::{
    DeliveryOrderRepository, InvoiceRepository, OrderRepository, PgUnitOfWork, ProductRepository,
    StatusAudit, StoreError, StoreResult, UnitOfWork, UnitOfWorkSession,
};
use crate::model::{
    DeliveryOrder, DeliveryStatus, Invoice, InvoiceStatus, Order, OrderItem, Product,
};

const PRODUCT_COLUMNS: &str =
    "id, sku, name, description, category, price, stock, image_url, specifications";
const ORDER_COLUMNS: &str = "id, order_number, customer_name, customer_email, customer_phone, \
    delivery_address, status, subtotal, shipping_fee, total, payment_status, courier, \
    tracking_number, created_at, estimated_delivery";
const ORDER_ITEM_COLUMNS: &str =
    "id, order_id, product_id, product_name, product_sku, quantity, unit_price, subtotal";
const INVOICE_COLUMNS: &str =
    "id, invoice_number, order_id, dealer_name, amount, status, issued_at, due_date, paid_at";
const DELIVERY_ORDER_COLUMNS: &str = "id, do_number, order_id, courier, tracking_number, status, \
    created_at, dispatched_at, delivered_at";

/// Repository backed by PostgreSQL through a shared connection pool.
///
/// Reads go straight to the pool. Status updates run inside a unit-of-work
/// session with a [`StatusAudit`] observer attached.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
    uow: PgUnitOfWork,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            uow: PgUnitOfWork::new(pool.clone()),
            pool,
        }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Runs a single-row UPDATE in its own transaction.
    ///
    /// Commits when a row was touched and rolls back otherwise, reporting which.
    /// A failed statement is rolled back too, so observers always settle.
    async fn update_status(
        &self,
        audit: std::sync::Arc<StatusAudit>,
        sql: &str,
        id: i32,
        status: String,
    ) -> StoreResult<bool> {
        let session = self.uow.begin().await?;
        session.register_transaction_aware(audit);

        let affected = {
            let mut guard = session.executor().lock().await;
            match guard.transaction() {
                Ok(tx) => sqlx::query(sql)
                    .bind(id)
                    .bind(status)
                    .execute(&mut **tx)
                    .await
                    .map(|done| done.rows_affected())
                    .map_err(StoreError::from),
                Err(err) => Err(err),
            }
        };

        match affected {
            Ok(0) => {
                session.rollback().await?;
                Ok(false)
            }
            Ok(_) => {
                session.commit().await?;
                Ok(true)
            }
            Err(err) => {
                if let Err(rollback_err) = session.rollback().await {
                    warn!(error = %rollback_err, "rollback after failed update also failed");
                }
                Err(err)
            }
        }
    }
}

fn parse_column<T: FromStr>(row: &PgRow, column: &'static str) -> StoreResult<T> {
    let raw: String = row.try_get(column)?;
    raw.parse()
        .map_err(|_| StoreError::Decode { column, value: raw })
}

fn product_from_row(row: &PgRow) -> StoreResult<Product> {
    let specifications: Json<Value> = row.try_get("specifications")?;
    Ok(Product {
        id: row.try_get("id")?,
        sku: row.try_get("sku")?,
        name: row.try_get("name")?,
        description: row.try_get("description")?,
        category: row.try_get("category")?,
        price: row.try_get("price")?,
        stock: row.try_get("stock")?,
        image_url: row.try_get("image_url")?,
        specifications: specifications.0,
    })
}

fn order_from_row(row: &PgRow) -> StoreResult<Order> {
    Ok(Order {
        id: row.try_get("id")?,
        order_number: row.try_get("order_number")?,
        customer_name: row.try_get("customer_name")?,
        customer_email: row.try_get("customer_email")?,
        customer_phone: row.try_get("customer_phone")?,
        delivery_address: row.try_get("delivery_address")?,
        status: parse_column(row, "status")?,
        subtotal: row.try_get("subtotal")?,
        shipping_fee: row.try_get("shipping_fee")?,
        total: row.try_get("total")?,
        payment_status: parse_column(row, "payment_status")?,
        courier: row.try_get("courier")?,
        tracking_number: row.try_get("tracking_number")?,
        created_at: row.try_get("created_at")?,
        estimated_delivery: row.try_get("estimated_delivery")?,
    })
}

fn order_item_from_row(row: &PgRow) -> StoreResult<OrderItem> {
    Ok(OrderItem {
        id: row.try_get("id")?,
        order_id: row.try_get("order_id")?,
        product_id: row.try_get("product_id")?,
        product_name: row.try_get("product_name")?,
        product_sku: row.try_get("product_sku")?,
        quantity: row.try_get("quantity")?,
        unit_price: row.try_get("unit_price")?,
        subtotal: row.try_get("subtotal")?,
    })
}

fn invoice_from_row(row: &PgRow) -> StoreResult<Invoice> {
    Ok(Invoice {
        id: row.try_get("id")?,
        invoice_number: row.try_get("invoice_number")?,
        order_id: row.try_get("order_id")?,
        dealer_name: row.try_get("dealer_name")?,
        amount: row.try_get("amount")?,
        status: parse_column(row, "status")?,
        issued_at: row.try_get("issued_at")?,
        due_date: row.try_get("due_date")?,
        paid_at: row.try_get("paid_at")?,
    })
}

fn delivery_order_from_row(row: &PgRow) -> StoreResult<DeliveryOrder> {
    Ok(DeliveryOrder {
        id: row.try_get("id")?,
        do_number: row.try_get("do_number")?,
        order_id: row.try_get("order_id")?,
        courier: row.try_get("courier")?,
        tracking_number: row.try_get("tracking_number")?,
        status: parse_column(row, "status")?,
        created_at: row.try_get("created_at")?,
        dispatched_at: row.try_get("dispatched_at")?,
        delivered_at: row.try_get("delivered_at")?,
    })
}

/// Escapes LIKE metacharacters so user text only ever matches literally.
fn like_pattern(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len() + 2);
    escaped.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

#[async_trait]
impl ProductRepository for PgStore {
    async fn list_products(&self) -> StoreResult<Vec<Product>> {
        let rows = sqlx::query(&format!("SELECT {PRODUCT_COLUMNS} FROM products ORDER BY id"))
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(product_from_row).collect()
    }

    async fn product_by_id(&self, id: i32) -> StoreResult<Option<Product>> {
        let row = sqlx::query(&format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(product_from_row).transpose()
    }

    async fn search_products(&self, term: &str) -> StoreResult<Vec<Product>> {
        debug!(term, "searching products");
        let rows = sqlx::query(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products \
             WHERE name ILIKE $1 OR description ILIKE $1 ORDER BY id"
        ))
        .bind(like_pattern(term))
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(product_from_row).collect()
    }

    async fn products_in_category(&self, category: &str) -> StoreResult<Vec<Product>> {
        let rows = sqlx::query(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE category = $1 ORDER BY id"
        ))
        .bind(category)
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(product_from_row).collect()
    }
}

#[async_trait]
impl OrderRepository for PgStore {
    async fn order_by_number(&self, order_number: &str) -> StoreResult<Option<Order>> {
        let row = sqlx::query(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE order_number = $1"
        ))
        .bind(order_number)
        .fetch_optional(&self.pool)
        .await?;
        row.as_ref().map(order_from_row).transpose()
    }

    async fn order_items(&self, order_id: i32) -> StoreResult<Vec<OrderItem>> {
        let rows = sqlx::query(&format!(
            "SELECT {ORDER_ITEM_COLUMNS} FROM order_items WHERE order_id = $1 ORDER BY id"
        ))
        .bind(order_id)
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(order_item_from_row).collect()
    }
}

#[async_trait]
impl InvoiceRepository for PgStore {
    async fn list_invoices(&self) -> StoreResult<Vec<Invoice>> {
        let rows = sqlx::query(&format!(
            "SELECT {INVOICE_COLUMNS} FROM invoices ORDER BY id"
        ))
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(invoice_from_row).collect()
    }

    async fn invoice_by_id(&self, id: i32) -> StoreResult<Option<Invoice>> {
        let row = sqlx::query(&format!("SELECT {INVOICE_COLUMNS} FROM invoices WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(invoice_from_row).transpose()
    }

    async fn update_invoice_status(&self, id: i32, status: InvoiceStatus) -> StoreResult<bool> {
        let status = status.to_string();
        self.update_status(
            StatusAudit::new("invoice", id, status.clone()),
            "UPDATE invoices SET status = $2::text, \
                 paid_at = CASE WHEN $2::text = 'paid' AND paid_at IS NULL THEN NOW() ELSE paid_at END \
             WHERE id = $1",
            id,
            status,
        )
        .await
    }
}

#[async_trait]
impl DeliveryOrderRepository for PgStore {
    async fn list_delivery_orders(&self) -> StoreResult<Vec<DeliveryOrder>> {
        let rows = sqlx::query(&format!(
            "SELECT {DELIVERY_ORDER_COLUMNS} FROM delivery_orders ORDER BY id"
        ))
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(delivery_order_from_row).collect()
    }

    async fn delivery_order_by_id(&self, id: i32) -> StoreResult<Option<DeliveryOrder>> {
        let row = sqlx::query(&format!(
            "SELECT {DELIVERY_ORDER_COLUMNS} FROM delivery_orders WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        row.as_ref().map(delivery_order_from_row).transpose()
    }

    async fn update_delivery_status(
        &self,
        id: i32,
        status: DeliveryStatus,
    ) -> StoreResult<bool> {
        let status = status.to_string();
        self.update_status(
            StatusAudit::new("delivery_order", id, status.clone()),
            "UPDATE delivery_orders SET status = $2::text, \
                 dispatched_at = CASE WHEN $2::text = 'dispatched' AND dispatched_at IS NULL \
                     THEN NOW() ELSE dispatched_at END, \
                 delivered_at = CASE WHEN $2::text = 'delivered' AND delivered_at IS NULL \
                     THEN NOW() ELSE delivered_at END \
             WHERE id = $1",
            id,
            status,
        )
        .await
    }
}
