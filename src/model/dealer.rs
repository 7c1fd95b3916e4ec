use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Commercial lifecycle of a dealer-portal order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DealerOrderStatus {
    Pending,
    Confirmed,
    Processing,
    Shipped,
    Delivered,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DealerOrder {
    pub order_number: String,
    pub placed_at: DateTime<Utc>,
    pub total: i64,
    pub status: DealerOrderStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dealer {
    pub id: i32,
    pub name: String,
    pub city: String,
    pub tier: String,
    pub credit_limit: i64,
    pub outstanding: i64,
    pub recent_orders: Vec<DealerOrder>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoyaltyTier {
    pub name: String,
    pub min_spend: i64,
    pub discount_percent: u8,
}

/// Display metadata for the dashboard's assistant cards. Carries no logic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentProfile {
    pub name: String,
    pub role: String,
    pub accuracy: f32,
    pub tasks_completed: u32,
}

/// A pre-computed reorder suggestion for a dealer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    pub product_id: i32,
    pub quantity: i32,
    pub reason: String,
}
