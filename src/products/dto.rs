use serde::{Deserialize, Serialize};

use crate::products::repo::{Product, ProductFields};

/// Request body for product create and update. Only name and price are
/// required; the rest fall back to the catalog defaults.
#[derive(Debug, Deserialize)]
pub struct ProductInput {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: f64,
    #[serde(default)]
    pub image_url: String,
    pub category: Option<String>,
    #[serde(default)]
    pub stock: i64,
}

impl ProductInput {
    pub fn into_fields(self) -> ProductFields {
        ProductFields {
            name: self.name,
            description: self.description,
            price: self.price,
            image_url: self.image_url,
            category: self.category.unwrap_or_else(|| "General".into()),
            stock: self.stock,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ProductResponse {
    pub message: String,
    pub product: Product,
}

#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub message: String,
}
