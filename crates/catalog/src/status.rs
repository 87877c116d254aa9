//! Derived stock-status predicates.
//!
//! Centralized here so every caller (dashboards, document views, alerts)
//! classifies quantities the same way instead of re-deriving thresholds ad
//! hoc per endpoint.

use serde::{Deserialize, Serialize};

/// Display classification of an on-hand quantity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StockStatus {
    InStock,
    LowStock,
    OutOfStock,
}

impl StockStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            StockStatus::InStock => "in_stock",
            StockStatus::LowStock => "low_stock",
            StockStatus::OutOfStock => "out_of_stock",
        }
    }
}

/// Classify a product's total on-hand against its reorder threshold.
pub fn stock_status(on_hand: f64, reorder_min: f64) -> StockStatus {
    if on_hand <= 0.0 {
        StockStatus::OutOfStock
    } else if on_hand < reorder_min {
        StockStatus::LowStock
    } else {
        StockStatus::InStock
    }
}

/// Classify whether a line's demand is currently coverable from on-hand.
pub fn demand_status(on_hand: f64, demand: f64) -> StockStatus {
    if on_hand >= demand {
        StockStatus::InStock
    } else {
        StockStatus::LowStock
    }
}
