//! Mock data loaded into a repository once at start-up.

use chrono::{DateTime, NaiveDate, Utc};
use serde_json::json;

use crate::model::{
    AgentProfile, CartLine, Dealer, DealerOrder, DealerOrderStatus, DeliveryOrder, DeliveryStatus,
    Invoice, InvoiceStatus, LoyaltyTier, Order, OrderItem, PaymentStatus, Product,
};

/// Every table the prototype ships with.
#[derive(Debug, Clone)]
pub struct SeedData {
    pub products: Vec<Product>,
    pub orders: Vec<Order>,
    pub order_items: Vec<OrderItem>,
    pub invoices: Vec<Invoice>,
    pub delivery_orders: Vec<DeliveryOrder>,
    pub dealers: Vec<Dealer>,
    pub loyalty_tiers: Vec<LoyaltyTier>,
    pub agents: Vec<AgentProfile>,
    /// Pre-computed reorder lists keyed by dealer id.
    pub predictive_carts: Vec<(i32, Vec<CartLine>)>,
}

impl SeedData {
    pub fn mock() -> Self {
        Self {
            products: products(),
            orders: orders(),
            order_items: order_items(),
            invoices: invoices(),
            delivery_orders: delivery_orders(),
            dealers: dealers(),
            loyalty_tiers: loyalty_tiers(),
            agents: agents(),
            predictive_carts: predictive_carts(),
        }
    }
}

/// Dealer-portal tables served straight from memory.
#[derive(Debug, Clone)]
pub struct ReferenceData {
    pub dealers: Vec<Dealer>,
    pub loyalty_tiers: Vec<LoyaltyTier>,
    pub agents: Vec<AgentProfile>,
    predictive_carts: Vec<(i32, Vec<CartLine>)>,
}

impl ReferenceData {
    pub fn new(data: &SeedData) -> Self {
        Self {
            dealers: data.dealers.clone(),
            loyalty_tiers: data.loyalty_tiers.clone(),
            agents: data.agents.clone(),
            predictive_carts: data.predictive_carts.clone(),
        }
    }

    pub fn mock() -> Self {
        Self::new(&SeedData::mock())
    }

    /// The pre-computed cart for a dealer; empty when none was prepared.
    pub fn predictive_cart(&self, dealer_id: i32) -> &[CartLine] {
        self.predictive_carts
            .iter()
            .find(|(id, _)| *id == dealer_id)
            .map(|(_, lines)| lines.as_slice())
            .unwrap_or(&[])
    }
}

fn at(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|date| date.and_hms_opt(9, 0, 0))
        .map(|naive| naive.and_utc())
        .unwrap_or_default()
}

#[allow(clippy::too_many_arguments)]
fn product(
    id: i32,
    sku: &str,
    name: &str,
    description: &str,
    category: &str,
    price: i64,
    stock: i32,
    specifications: serde_json::Value,
) -> Product {
    Product {
        id,
        sku: sku.to_string(),
        name: name.to_string(),
        description: description.to_string(),
        category: category.to_string(),
        price,
        stock,
        image_url: format!("/images/products/{}.jpg", sku.to_lowercase()),
        specifications,
    }
}

fn products() -> Vec<Product> {
    vec![
        product(
            1,
            "CBL-USBC-1M",
            "USB-C to USB-C Cable 1m",
            "Braided fast-charge cable rated for 60W power delivery.",
            "Cables",
            34900,
            1200,
            json!({ "length": "1m", "power": "60W", "jacket": "nylon braid" }),
        ),
        product(
            2,
            "CBL-LTNG-2M",
            "Lightning Cable 2m",
            "MFi certified Lightning to USB-C cable for phones and tablets.",
            "Cables",
            44900,
            800,
            json!({ "length": "2m", "certification": "MFi" }),
        ),
        product(
            3,
            "CBL-HDMI-3M",
            "HDMI 2.1 Cable 3m",
            "Ultra high speed 8K video cable with gold plated connectors.",
            "Cables",
            79900,
            350,
            json!({ "length": "3m", "bandwidth": "48Gbps" }),
        ),
        product(
            4,
            "CHG-GAN-65W",
            "65W GaN Wall Charger",
            "Dual port gallium nitride charger for laptops and phones.",
            "Chargers",
            189900,
            420,
            json!({ "ports": 2, "output": "65W" }),
        ),
        product(
            5,
            "CHG-CAR-30W",
            "30W Car Charger",
            "Compact in-car adapter with USB-C PD and USB-A ports.",
            "Chargers",
            89900,
            610,
            json!({ "ports": 2, "output": "30W" }),
        ),
        product(
            6,
            "PWB-10K",
            "Power Bank 10000mAh",
            "Slim power bank with 20W fast charging. Ships with a short cable.",
            "Power Banks",
            149900,
            300,
            json!({ "capacity": "10000mAh", "output": "20W" }),
        ),
        product(
            7,
            "PWB-20K",
            "Power Bank 20000mAh",
            "High capacity power bank with LED display and three outputs.",
            "Power Banks",
            249900,
            180,
            json!({ "capacity": "20000mAh", "output": "22.5W" }),
        ),
        product(
            8,
            "AUD-TWS-01",
            "Wireless Earbuds",
            "True wireless earbuds with charging case and 24h battery.",
            "Audio",
            299900,
            260,
            json!({ "bluetooth": "5.3", "battery": "24h" }),
        ),
        product(
            9,
            "AUD-NBD-02",
            "Neckband Headset",
            "Magnetic neckband headset with 30h playback.",
            "Audio",
            129900,
            340,
            json!({ "bluetooth": "5.0", "battery": "30h" }),
        ),
        product(
            10,
            "ACC-SCR-G",
            "Tempered Glass Screen Guard",
            "9H hardness screen protector, pack of 10.",
            "Accessories",
            24900,
            5000,
            json!({ "hardness": "9H", "pack": 10 }),
        ),
        product(
            11,
            "ACC-CASE-S",
            "Silicone Phone Case",
            "Shock absorbing silicone case in assorted colours.",
            "Accessories",
            19900,
            2600,
            json!({ "material": "silicone" }),
        ),
        product(
            12,
            "ACC-ORG-01",
            "Cable Organiser Kit",
            "Velcro ties and clips for desk cable management.",
            "Accessories",
            14900,
            900,
            json!({ "pieces": 24 }),
        ),
    ]
}

fn orders() -> Vec<Order> {
    vec![
        Order {
            id: 1,
            order_number: "ORD-2026-0041".into(),
            customer_name: "Priya Raman".into(),
            customer_email: "priya@example.com".into(),
            customer_phone: "+91 98450 11223".into(),
            delivery_address: "14 MG Road, Bengaluru 560001".into(),
            status: DeliveryStatus::Delivered,
            subtotal: 189900,
            shipping_fee: 0,
            total: 189900,
            payment_status: PaymentStatus::Paid,
            courier: Some("BlueDart".into()),
            tracking_number: Some("BD7781230041".into()),
            created_at: at(2026, 3, 2),
            estimated_delivery: Some(at(2026, 3, 5)),
        },
        Order {
            id: 2,
            order_number: "ORD-2026-0042".into(),
            customer_name: "Arjun Mehta".into(),
            customer_email: "arjun@example.com".into(),
            customer_phone: "+91 99020 44556".into(),
            delivery_address: "221 Linking Road, Mumbai 400050".into(),
            status: DeliveryStatus::InTransit,
            subtotal: 689200,
            shipping_fee: 9900,
            total: 699100,
            payment_status: PaymentStatus::Paid,
            courier: Some("Delhivery".into()),
            tracking_number: Some("DLV5521900042".into()),
            created_at: at(2026, 3, 9),
            estimated_delivery: Some(at(2026, 3, 13)),
        },
        Order {
            id: 3,
            order_number: "ORD-2026-0043".into(),
            customer_name: "Meera Iyer".into(),
            customer_email: "meera@example.com".into(),
            customer_phone: "+91 90080 77889".into(),
            delivery_address: "7 Anna Salai, Chennai 600002".into(),
            status: DeliveryStatus::Generated,
            subtotal: 0,
            shipping_fee: 0,
            total: 0,
            payment_status: PaymentStatus::Pending,
            courier: None,
            tracking_number: None,
            created_at: at(2026, 3, 11),
            estimated_delivery: None,
        },
    ]
}

fn item(id: i32, order_id: i32, product: &Product, quantity: i32) -> OrderItem {
    OrderItem {
        id,
        order_id,
        product_id: product.id,
        product_name: product.name.clone(),
        product_sku: product.sku.clone(),
        quantity,
        unit_price: product.price,
        subtotal: product.price * i64::from(quantity),
    }
}

fn order_items() -> Vec<OrderItem> {
    let catalogue = products();
    let find = |id: i32| catalogue.iter().find(|p| p.id == id);
    let lines = [(1, 1, 4, 1), (2, 2, 1, 5), (3, 2, 4, 1), (4, 2, 8, 1), (5, 2, 10, 1)];
    lines
        .iter()
        .filter_map(|&(id, order_id, product_id, quantity)| {
            find(product_id).map(|p| item(id, order_id, p, quantity))
        })
        .collect()
}

fn invoices() -> Vec<Invoice> {
    vec![
        Invoice {
            id: 1,
            invoice_number: "INV-2026-0101".into(),
            order_id: 1,
            dealer_name: "Sharma Electronics".into(),
            amount: 189900,
            status: InvoiceStatus::Paid,
            issued_at: at(2026, 3, 2),
            due_date: at(2026, 4, 1),
            paid_at: Some(at(2026, 3, 20)),
        },
        Invoice {
            id: 2,
            invoice_number: "INV-2026-0102".into(),
            order_id: 2,
            dealer_name: "Mehta Mobiles".into(),
            amount: 699100,
            status: InvoiceStatus::Sent,
            issued_at: at(2026, 3, 9),
            due_date: at(2026, 4, 8),
            paid_at: None,
        },
        Invoice {
            id: 3,
            invoice_number: "INV-2026-0103".into(),
            order_id: 3,
            dealer_name: "Coastal Gadgets".into(),
            amount: 0,
            status: InvoiceStatus::Draft,
            issued_at: at(2026, 3, 11),
            due_date: at(2026, 4, 10),
            paid_at: None,
        },
    ]
}

fn delivery_orders() -> Vec<DeliveryOrder> {
    vec![
        DeliveryOrder {
            id: 1,
            do_number: "DO-2026-0201".into(),
            order_id: 1,
            courier: "BlueDart".into(),
            tracking_number: Some("BD7781230041".into()),
            status: DeliveryStatus::Delivered,
            created_at: at(2026, 3, 2),
            dispatched_at: Some(at(2026, 3, 3)),
            delivered_at: Some(at(2026, 3, 5)),
        },
        DeliveryOrder {
            id: 2,
            do_number: "DO-2026-0202".into(),
            order_id: 2,
            courier: "Delhivery".into(),
            tracking_number: Some("DLV5521900042".into()),
            status: DeliveryStatus::InTransit,
            created_at: at(2026, 3, 9),
            dispatched_at: Some(at(2026, 3, 10)),
            delivered_at: None,
        },
        DeliveryOrder {
            id: 3,
            do_number: "DO-2026-0203".into(),
            order_id: 3,
            courier: "Ekart".into(),
            tracking_number: None,
            status: DeliveryStatus::Generated,
            created_at: at(2026, 3, 11),
            dispatched_at: None,
            delivered_at: None,
        },
    ]
}

fn dealers() -> Vec<Dealer> {
    vec![
        Dealer {
            id: 1,
            name: "Sharma Electronics".into(),
            city: "Bengaluru".into(),
            tier: "Gold".into(),
            credit_limit: 5000000,
            outstanding: 1250000,
            recent_orders: vec![
                DealerOrder {
                    order_number: "DLR-1001".into(),
                    placed_at: at(2026, 2, 14),
                    total: 840000,
                    status: DealerOrderStatus::Delivered,
                },
                DealerOrder {
                    order_number: "DLR-1007".into(),
                    placed_at: at(2026, 3, 8),
                    total: 410000,
                    status: DealerOrderStatus::Shipped,
                },
            ],
        },
        Dealer {
            id: 2,
            name: "Mehta Mobiles".into(),
            city: "Mumbai".into(),
            tier: "Silver".into(),
            credit_limit: 2500000,
            outstanding: 699100,
            recent_orders: vec![DealerOrder {
                order_number: "DLR-1004".into(),
                placed_at: at(2026, 3, 1),
                total: 699100,
                status: DealerOrderStatus::Processing,
            }],
        },
        Dealer {
            id: 3,
            name: "Coastal Gadgets".into(),
            city: "Chennai".into(),
            tier: "Bronze".into(),
            credit_limit: 1000000,
            outstanding: 0,
            recent_orders: vec![DealerOrder {
                order_number: "DLR-1009".into(),
                placed_at: at(2026, 3, 11),
                total: 199000,
                status: DealerOrderStatus::Pending,
            }],
        },
    ]
}

fn loyalty_tiers() -> Vec<LoyaltyTier> {
    [
        ("Bronze", 0, 0),
        ("Silver", 20000000, 3),
        ("Gold", 50000000, 5),
        ("Platinum", 100000000, 8),
    ]
    .into_iter()
    .map(|(name, min_spend, discount_percent)| LoyaltyTier {
        name: name.to_string(),
        min_spend,
        discount_percent,
    })
    .collect()
}

fn agents() -> Vec<AgentProfile> {
    [
        ("Demand Forecaster", "Predicts reorder quantities", 0.94, 1280),
        ("Bundle Advisor", "Suggests companion products", 0.91, 3410),
        ("Credit Sentinel", "Flags overdue dealer accounts", 0.97, 612),
        ("Dispatch Planner", "Groups delivery orders by courier", 0.89, 905),
    ]
    .into_iter()
    .map(|(name, role, accuracy, tasks_completed)| AgentProfile {
        name: name.to_string(),
        role: role.to_string(),
        accuracy,
        tasks_completed,
    })
    .collect()
}

fn cart_line(product_id: i32, quantity: i32, reason: &str) -> CartLine {
    CartLine {
        product_id,
        quantity,
        reason: reason.to_string(),
    }
}

fn predictive_carts() -> Vec<(i32, Vec<CartLine>)> {
    vec![
        (
            1,
            vec![
                cart_line(1, 200, "Reordered every 3 weeks"),
                cart_line(4, 50, "Stock falls below 20 units by month end"),
                cart_line(10, 500, "Top seller in your region"),
            ],
        ),
        (
            2,
            vec![
                cart_line(2, 120, "Reordered every 4 weeks"),
                cart_line(8, 30, "Seasonal demand rising"),
            ],
        ),
        (3, vec![cart_line(11, 150, "Pairs with recent screen guard order")]),
    ]
}
