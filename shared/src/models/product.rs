//! Product Model
//!
//! Slim catalog view consumed by the cart: price, sale price, stock.

use serde::{Deserialize, Serialize};

/// Catalog product
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub name: String,
    pub price: f64,
    /// Pre-sale price; drives the cart's savings figure
    pub old_price: Option<f64>,
    pub stock: i32,
    #[serde(default)]
    pub image: String,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_enabled() -> bool {
    true
}
