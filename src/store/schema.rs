//! Relational schema and seed loader for the PostgreSQL store.

use sqlx::types::Json;
use sqlx::PgPool;
use tracing::info;

use super::StoreResult;
use crate::seed::SeedData;

const TABLES: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS products (
        id INTEGER PRIMARY KEY,
        sku VARCHAR(64) NOT NULL UNIQUE,
        name VARCHAR(255) NOT NULL,
        description TEXT NOT NULL,
        category VARCHAR(128) NOT NULL,
        price BIGINT NOT NULL,
        stock INTEGER NOT NULL,
        image_url TEXT NOT NULL,
        specifications JSONB NOT NULL DEFAULT '{}'::jsonb
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS orders (
        id INTEGER PRIMARY KEY,
        order_number VARCHAR(64) NOT NULL UNIQUE,
        customer_name VARCHAR(255) NOT NULL,
        customer_email VARCHAR(255) NOT NULL,
        customer_phone VARCHAR(64) NOT NULL,
        delivery_address TEXT NOT NULL,
        status VARCHAR(32) NOT NULL,
        subtotal BIGINT NOT NULL,
        shipping_fee BIGINT NOT NULL,
        total BIGINT NOT NULL,
        payment_status VARCHAR(32) NOT NULL,
        courier VARCHAR(128),
        tracking_number VARCHAR(128),
        created_at TIMESTAMPTZ NOT NULL,
        estimated_delivery TIMESTAMPTZ
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS order_items (
        id INTEGER PRIMARY KEY,
        order_id INTEGER NOT NULL REFERENCES orders(id),
        product_id INTEGER NOT NULL,
        product_name VARCHAR(255) NOT NULL,
        product_sku VARCHAR(64) NOT NULL,
        quantity INTEGER NOT NULL,
        unit_price BIGINT NOT NULL,
        subtotal BIGINT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS invoices (
        id INTEGER PRIMARY KEY,
        invoice_number VARCHAR(64) NOT NULL UNIQUE,
        order_id INTEGER NOT NULL REFERENCES orders(id),
        dealer_name VARCHAR(255) NOT NULL,
        amount BIGINT NOT NULL,
        status VARCHAR(32) NOT NULL,
        issued_at TIMESTAMPTZ NOT NULL,
        due_date TIMESTAMPTZ NOT NULL,
        paid_at TIMESTAMPTZ
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS delivery_orders (
        id INTEGER PRIMARY KEY,
        do_number VARCHAR(64) NOT NULL UNIQUE,
        order_id INTEGER NOT NULL REFERENCES orders(id),
        courier VARCHAR(128) NOT NULL,
        tracking_number VARCHAR(128),
        status VARCHAR(32) NOT NULL,
        created_at TIMESTAMPTZ NOT NULL,
        dispatched_at TIMESTAMPTZ,
        delivered_at TIMESTAMPTZ
    )
    "#,
];

/// Table names in dependency order, parents first.
pub const TABLE_NAMES: &[&str] = &[
    "products",
    "orders",
    "order_items",
    "invoices",
    "delivery_orders",
];

/// Creates any missing tables.
pub async fn migrate(pool: &PgPool) -> StoreResult<()> {
    for ddl in TABLES {
        sqlx::query(ddl).execute(pool).await?;
    }
    info!(tables = TABLES.len(), "schema ready");
    Ok(())
}

/// Drops every table. Used by tests to start from a clean database.
pub async fn drop_all(pool: &PgPool) -> StoreResult<()> {
    for table in TABLE_NAMES.iter().rev() {
        sqlx::query(&format!("DROP TABLE IF EXISTS {table} CASCADE"))
            .execute(pool)
            .await?;
    }
    Ok(())
}

/// Loads seed rows, leaving rows that already exist untouched.
pub async fn seed(pool: &PgPool, data: &SeedData) -> StoreResult<()> {
    let mut tx = pool.begin().await?;

    for p in &data.products {
        sqlx::query(
            "INSERT INTO products (id, sku, name, description, category, price, stock, image_url, specifications)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
             ON CONFLICT (id) DO NOTHING",
        )
        .bind(p.id)
        .bind(&p.sku)
        .bind(&p.name)
        .bind(&p.description)
        .bind(&p.category)
        .bind(p.price)
        .bind(p.stock)
        .bind(&p.image_url)
        .bind(Json(&p.specifications))
        .execute(&mut *tx)
        .await?;
    }

    for o in &data.orders {
        sqlx::query(
            "INSERT INTO orders (id, order_number, customer_name, customer_email, customer_phone,
                delivery_address, status, subtotal, shipping_fee, total, payment_status,
                courier, tracking_number, created_at, estimated_delivery)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
             ON CONFLICT (id) DO NOTHING",
        )
        .bind(o.id)
        .bind(&o.order_number)
        .bind(&o.customer_name)
        .bind(&o.customer_email)
        .bind(&o.customer_phone)
        .bind(&o.delivery_address)
        .bind(o.status.to_string())
        .bind(o.subtotal)
        .bind(o.shipping_fee)
        .bind(o.total)
        .bind(o.payment_status.to_string())
        .bind(&o.courier)
        .bind(&o.tracking_number)
        .bind(o.created_at)
        .bind(o.estimated_delivery)
        .execute(&mut *tx)
        .await?;
    }

    for i in &data.order_items {
        sqlx::query(
            "INSERT INTO order_items (id, order_id, product_id, product_name, product_sku,
                quantity, unit_price, subtotal)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             ON CONFLICT (id) DO NOTHING",
        )
        .bind(i.id)
        .bind(i.order_id)
        .bind(i.product_id)
        .bind(&i.product_name)
        .bind(&i.product_sku)
        .bind(i.quantity)
        .bind(i.unit_price)
        .bind(i.subtotal)
        .execute(&mut *tx)
        .await?;
    }

    for inv in &data.invoices {
        sqlx::query(
            "INSERT INTO invoices (id, invoice_number, order_id, dealer_name, amount, status,
                issued_at, due_date, paid_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
             ON CONFLICT (id) DO NOTHING",
        )
        .bind(inv.id)
        .bind(&inv.invoice_number)
        .bind(inv.order_id)
        .bind(&inv.dealer_name)
        .bind(inv.amount)
        .bind(inv.status.to_string())
        .bind(inv.issued_at)
        .bind(inv.due_date)
        .bind(inv.paid_at)
        .execute(&mut *tx)
        .await?;
    }

    for d in &data.delivery_orders {
        sqlx::query(
            "INSERT INTO delivery_orders (id, do_number, order_id, courier, tracking_number,
                status, created_at, dispatched_at, delivered_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
             ON CONFLICT (id) DO NOTHING",
        )
        .bind(d.id)
        .bind(&d.do_number)
        .bind(d.order_id)
        .bind(&d.courier)
        .bind(&d.tracking_number)
        .bind(d.status.to_string())
        .bind(d.created_at)
        .bind(d.dispatched_at)
        .bind(d.delivered_at)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;
    info!(
        products = data.products.len(),
        orders = data.orders.len(),
        "seed data loaded"
    );
    Ok(())
}
