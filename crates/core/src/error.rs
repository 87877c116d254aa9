//! Domain error model.

use thiserror::Error;

use crate::id::{ProductId, WarehouseId};

/// Result type used across the domain layer.
pub type StockResult<T> = Result<T, StockError>;

/// Domain-level error.
///
/// Keep this focused on deterministic, business/domain failures (quantity
/// invariants, lifecycle preconditions, validation). Infrastructure concerns
/// surface only through `Storage`.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum StockError {
    /// An applied delta would drive a stock quantity below zero. Always aborts
    /// the entire triggering operation.
    #[error("negative stock prevented for product {product_id} in warehouse {warehouse_id}")]
    NegativeStock {
        product_id: ProductId,
        warehouse_id: WarehouseId,
    },

    /// A done/counted quantity exceeds the line's demand during validation.
    #[error("done qty {done} exceeds demand {demand} for product {product_id}")]
    OverDemand {
        product_id: ProductId,
        demand: f64,
        done: f64,
    },

    /// Pre-check failure: source on-hand is below the requested quantity.
    #[error("insufficient stock for product {product_id} (needed {needed}, available {available})")]
    InsufficientStock {
        product_id: ProductId,
        needed: f64,
        available: f64,
    },

    /// A lifecycle transition was attempted from a status that forbids it.
    #[error("invalid state: {0}")]
    InvalidState(String),

    /// A referenced document/product/warehouse does not exist.
    #[error("not found")]
    NotFound,

    /// A value failed validation (e.g. malformed or out-of-range input).
    #[error("validation failed: {0}")]
    Validation(String),

    /// An identifier was invalid (e.g. parse failure).
    #[error("invalid identifier: {0}")]
    InvalidId(String),

    /// A uniqueness conflict (duplicate SKU, short code, category name).
    #[error("conflict: {0}")]
    Conflict(String),

    /// The backing store failed (lock poisoning). Not a business failure.
    #[error("storage failure: {0}")]
    Storage(String),
}

impl StockError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn invalid_state(msg: impl Into<String>) -> Self {
        Self::InvalidState(msg.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }

    pub fn not_found() -> Self {
        Self::NotFound
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negative_stock_names_product_and_warehouse() {
        let product_id = ProductId::new();
        let warehouse_id = WarehouseId::new();
        let err = StockError::NegativeStock {
            product_id,
            warehouse_id,
        };
        let msg = err.to_string();
        assert!(msg.contains(&product_id.to_string()));
        assert!(msg.contains(&warehouse_id.to_string()));
    }

    #[test]
    fn insufficient_stock_reports_needed_and_available() {
        let err = StockError::InsufficientStock {
            product_id: ProductId::new(),
            needed: 25.0,
            available: 20.0,
        };
        let msg = err.to_string();
        assert!(msg.contains("needed 25"));
        assert!(msg.contains("available 20"));
    }
}
