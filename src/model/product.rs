use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A catalogue entry. Read-only from the application's point of view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: i32,
    pub sku: String,
    pub name: String,
    pub description: String,
    pub category: String,
    pub price: i64,
    pub stock: i32,
    pub image_url: String,
    /// Opaque key/value data shown on the product page.
    pub specifications: Value,
}

impl Product {
    /// Case-insensitive match of `term` against name or description.
    pub fn matches(&self, term: &str) -> bool {
        let needle = term.to_lowercase();
        self.name.to_lowercase().contains(&needle)
            || self.description.to_lowercase().contains(&needle)
    }
}
