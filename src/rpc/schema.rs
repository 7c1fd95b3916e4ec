//! Input schemas, one per shape-checked procedure.
//!
//! `serde` checks the structural shape; [`InputSchema::check`] adds the value
//! constraints serde cannot express.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

use super::ValidationError;
use crate::chat::ChatMessage;
use crate::model::{DeliveryStatus, InvoiceStatus};

const MAX_RECOMMEND_IDS: usize = 50;

pub trait InputSchema: DeserializeOwned {
    fn check(&self) -> Result<(), ValidationError> {
        Ok(())
    }
}

/// The single validation entry point: raw JSON in, typed value out.
pub fn parse_input<T: InputSchema>(input: Value) -> Result<T, ValidationError> {
    let parsed: T = serde_json::from_value(input)?;
    parsed.check()?;
    Ok(parsed)
}

fn require_text(path: &str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new(path, "must not be empty"));
    }
    Ok(())
}

fn require_positive(path: &str, value: i32) -> Result<(), ValidationError> {
    if value <= 0 {
        return Err(ValidationError::new(path, "must be a positive integer"));
    }
    Ok(())
}

/// `products.getById`: a bare number.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(transparent)]
pub struct ProductIdInput(pub i32);

impl InputSchema for ProductIdInput {}

/// `products.search`: a bare, non-blank string.
#[derive(Debug, Clone, Deserialize)]
#[serde(transparent)]
pub struct SearchInput(pub String);

impl InputSchema for SearchInput {
    fn check(&self) -> Result<(), ValidationError> {
        require_text("input", &self.0)
    }
}

/// `orders.getByNumber`: a bare, non-blank string.
#[derive(Debug, Clone, Deserialize)]
#[serde(transparent)]
pub struct OrderNumberInput(pub String);

impl InputSchema for OrderNumberInput {
    fn check(&self) -> Result<(), ValidationError> {
        require_text("input", &self.0)
    }
}

/// `orders.getItems`: a bare number.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(transparent)]
pub struct OrderIdInput(pub i32);

impl InputSchema for OrderIdInput {}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendMessageInput {
    pub messages: Vec<ChatMessage>,
    pub user_query: String,
}

impl InputSchema for SendMessageInput {
    fn check(&self) -> Result<(), ValidationError> {
        require_text("userQuery", &self.user_query)
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlternativesInput {
    pub product_id: i32,
}

impl InputSchema for AlternativesInput {
    fn check(&self) -> Result<(), ValidationError> {
        require_positive("productId", self.product_id)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExportInput {
    pub email: String,
    pub messages: Vec<ChatMessage>,
}

impl InputSchema for ExportInput {
    fn check(&self) -> Result<(), ValidationError> {
        let plausible = self
            .email
            .trim()
            .split_once('@')
            .is_some_and(|(local, domain)| {
                !local.is_empty() && !domain.is_empty() && !domain.contains('@')
            });
        if !plausible {
            return Err(ValidationError::new("email", "must be an email address"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendInput {
    pub product_ids: Vec<i32>,
}

impl InputSchema for RecommendInput {
    fn check(&self) -> Result<(), ValidationError> {
        if self.product_ids.len() > MAX_RECOMMEND_IDS {
            return Err(ValidationError::new(
                "productIds",
                format!("at most {MAX_RECOMMEND_IDS} ids"),
            ));
        }
        for (i, id) in self.product_ids.iter().enumerate() {
            require_positive(&format!("productIds[{i}]"), *id)?;
        }
        Ok(())
    }
}

/// `invoices.getById` and `deliveryOrders.getById`.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct IdInput {
    pub id: i32,
}

impl InputSchema for IdInput {}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DealerIdInput {
    pub dealer_id: i32,
}

impl InputSchema for DealerIdInput {
    fn check(&self) -> Result<(), ValidationError> {
        require_positive("dealerId", self.dealer_id)
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct InvoiceStatusInput {
    pub id: i32,
    pub status: InvoiceStatus,
}

impl InputSchema for InvoiceStatusInput {
    fn check(&self) -> Result<(), ValidationError> {
        require_positive("id", self.id)
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct DeliveryStatusInput {
    pub id: i32,
    pub status: DeliveryStatus,
}

impl InputSchema for DeliveryStatusInput {
    fn check(&self) -> Result<(), ValidationError> {
        require_positive("id", self.id)
    }
}
