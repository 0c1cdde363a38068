//! Products
//!
//! # Schema
//!
//! ```sql
//! CREATE TABLE products (
//!     id UUID PRIMARY KEY,
//!     name VARCHAR(255) NOT NULL,
//!     description TEXT NOT NULL,
//!     price DOUBLE PRECISION NOT NULL CHECK (price > 0),
//!     stock INTEGER NOT NULL CHECK (stock >= 0),
//!     category VARCHAR(255) NOT NULL,
//!     sku VARCHAR(100) NOT NULL,        -- unique among live rows
//!     created_at TIMESTAMPTZ NOT NULL,
//!     updated_at TIMESTAMPTZ NOT NULL,
//!     deleted_at TIMESTAMPTZ
//! );
//! ```
//!
//! Stock only changes through the atomic stock adjustment; a general update
//! never writes it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::query::{Condition, Conditions, Filter};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub description: String,

    /// Always greater than zero
    pub price: f64,

    /// Units on hand, never negative
    pub stock: i32,

    pub category: String,

    /// Stock keeping unit, unique among live products
    pub sku: String,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

/// Input for creating a product
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateProduct {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: f64,
    #[serde(default)]
    pub stock: i32,
    #[serde(default)]
    pub category: String,
    pub sku: String,
}

/// Partial update; stock is deliberately absent
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateProduct {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub category: Option<String>,
    pub sku: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductFilter {
    pub name: Option<String>,
    pub category: Option<String>,
    pub sku: Option<String>,
    pub price_from: Option<f64>,
    pub price_to: Option<f64>,
    pub stock_from: Option<i32>,
    pub stock_to: Option<i32>,
    pub created_at_from: Option<DateTime<Utc>>,
    pub created_at_to: Option<DateTime<Utc>>,
}

impl Filter for ProductFilter {
    fn conditions(&self) -> Vec<Condition> {
        Conditions::new()
            .contains("name", &self.name)
            .contains("category", &self.category)
            .contains("sku", &self.sku)
            .range("price", &self.price_from, &self.price_to)
            .range("stock", &self.stock_from, &self.stock_to)
            .range("created_at", &self.created_at_from, &self.created_at_to)
            .build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::Value;

    #[test]
    fn test_filter_order() {
        let filter = ProductFilter {
            name: Some("desk".to_string()),
            category: Some("furniture".to_string()),
            sku: Some("DSK".to_string()),
            price_from: Some(10.0),
            price_to: Some(20.0),
            stock_from: Some(1),
            stock_to: None,
            created_at_from: None,
            created_at_to: Some(Utc::now()),
        };

        let columns: Vec<_> = filter.conditions().iter().map(Condition::column).collect();
        assert_eq!(
            columns,
            vec!["name", "category", "sku", "price", "price", "stock", "created_at"]
        );
    }

    #[test]
    fn test_stock_bound_is_integer() {
        let filter = ProductFilter {
            stock_to: Some(5),
            ..Default::default()
        };

        assert_eq!(
            filter.conditions(),
            vec![Condition::AtMost {
                column: "stock",
                value: Value::Int(5)
            }]
        );
    }

    #[test]
    fn test_create_product_defaults() {
        let input: CreateProduct =
            serde_json::from_str(r#"{"name":"Desk","price":10.5,"sku":"DSK-1"}"#).unwrap();
        assert_eq!(input.stock, 0);
        assert_eq!(input.description, "");
        assert_eq!(input.category, "");
    }
}
