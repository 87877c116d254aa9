//! `stockyard-core` — domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns).

pub mod error;
pub mod id;

pub use error::{StockError, StockResult};
pub use id::{CategoryId, DocumentId, LocationId, ProductId, UserId, WarehouseId};
