//! Shopping-assistant collaborator behind the `chat.*` procedures.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::info;

use crate::model::Product;
use crate::store::{ProductRepository, StoreError};

const MAX_REPLY_PRODUCTS: usize = 5;
const MIN_KEYWORD_LEN: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
    System,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatReply {
    pub response: String,
    pub products: Vec<Product>,
}

#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error("Catalogue unavailable: {0}")]
    Catalogue(#[from] StoreError),
}

#[async_trait]
pub trait ChatBackend: Send + Sync {
    async fn reply(&self, messages: &[ChatMessage], user_query: &str)
        -> Result<ChatReply, ChatError>;

    /// Other products that could stand in for `product_id`.
    async fn alternatives(&self, product_id: i32) -> Result<Vec<Product>, ChatError>;

    /// Hands a transcript to the mail collaborator; `false` if it was refused.
    async fn export_transcript(
        &self,
        email: &str,
        messages: &[ChatMessage],
    ) -> Result<bool, ChatError>;
}

/// Answers by keyword search over the product catalogue.
pub struct CatalogChat {
    products: Arc<dyn ProductRepository>,
}

impl CatalogChat {
    pub fn new(products: Arc<dyn ProductRepository>) -> Self {
        Self { products }
    }
}

fn keywords(query: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    query
        .split(|c: char| !c.is_alphanumeric())
        .filter(|word| word.chars().count() >= MIN_KEYWORD_LEN)
        .map(str::to_lowercase)
        .filter(|word| seen.insert(word.clone()))
        .collect()
}

#[async_trait]
impl ChatBackend for CatalogChat {
    async fn reply(
        &self,
        messages: &[ChatMessage],
        user_query: &str,
    ) -> Result<ChatReply, ChatError> {
        let mut ids = HashSet::new();
        let mut products = Vec::new();
        for word in keywords(user_query) {
            for product in self.products.search_products(&word).await? {
                if products.len() < MAX_REPLY_PRODUCTS && ids.insert(product.id) {
                    products.push(product);
                }
            }
        }

        let response = match products.len() {
            0 => format!(
                "I couldn't find anything matching \"{}\". Try a product name or category.",
                user_query.trim()
            ),
            1 => format!("I found 1 product matching \"{}\".", user_query.trim()),
            n => format!("I found {n} products matching \"{}\".", user_query.trim()),
        };
        info!(history = messages.len(), hits = products.len(), "chat reply");
        Ok(ChatReply { response, products })
    }

    async fn alternatives(&self, product_id: i32) -> Result<Vec<Product>, ChatError> {
        let Some(product) = self.products.product_by_id(product_id).await? else {
            return Ok(Vec::new());
        };
        let mut peers = self.products.products_in_category(&product.category).await?;
        peers.retain(|p| p.id != product_id);
        Ok(peers)
    }

    async fn export_transcript(
        &self,
        email: &str,
        messages: &[ChatMessage],
    ) -> Result<bool, ChatError> {
        info!(to = email, messages = messages.len(), "chat transcript queued for email");
        Ok(true)
    }
}
