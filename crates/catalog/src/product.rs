use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stockyard_core::{CategoryId, ProductId, StockError, StockResult};

/// Catalog entity: Product.
///
/// A product owns no stock directly; on-hand quantity is derived by summing
/// the ledger's StockQuant rows for it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub sku: String,
    pub name: String,
    pub category_id: Option<CategoryId>,
    pub unit_of_measure: String,
    /// Reorder threshold: total on-hand below this counts as low stock.
    pub reorder_min: f64,
    pub cost: f64,
    pub sales_price: f64,
    pub created_at: DateTime<Utc>,
}

/// Input for creating a product. SKU uniqueness is enforced by the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductSpec {
    pub sku: String,
    pub name: String,
    pub category_id: Option<CategoryId>,
    pub unit_of_measure: Option<String>,
    pub reorder_min: f64,
    pub cost: f64,
    pub sales_price: f64,
}

impl Product {
    pub fn new(id: ProductId, spec: ProductSpec, now: DateTime<Utc>) -> StockResult<Self> {
        if spec.name.trim().is_empty() {
            return Err(StockError::validation("product name cannot be empty"));
        }
        if spec.sku.trim().is_empty() {
            return Err(StockError::validation("product sku cannot be empty"));
        }
        if spec.reorder_min < 0.0 {
            return Err(StockError::validation("reorder_min cannot be negative"));
        }
        if spec.cost < 0.0 || spec.sales_price < 0.0 {
            return Err(StockError::validation("prices cannot be negative"));
        }

        Ok(Self {
            id,
            sku: spec.sku,
            name: spec.name,
            category_id: spec.category_id,
            unit_of_measure: spec.unit_of_measure.unwrap_or_else(|| "pcs".to_string()),
            reorder_min: spec.reorder_min,
            cost: spec.cost,
            sales_price: spec.sales_price,
            created_at: now,
        })
    }
}
