//! Catalog domain module: products, warehouses, locations, categories.
//!
//! This crate contains the reference data the ledger and documents point at,
//! implemented purely as deterministic domain logic (no IO, no storage).
//! Stock quantities never live here; they are owned by `stockyard-ledger`.

pub mod product;
pub mod status;
pub mod warehouse;

pub use product::{Product, ProductSpec};
pub use status::{demand_status, stock_status, StockStatus};
pub use warehouse::{Category, Location, Warehouse, WarehouseSpec};
