//! Infrastructure layer: in-memory stores and the orchestrating service.
//!
//! The domain crates (`catalog`, `ledger`, `documents`) are pure; everything
//! that holds state behind a lock or spans more than one store lives here.

pub mod catalog_store;
pub mod document_store;
pub mod moves;
pub mod reference;
pub mod reporting;
pub mod service;

#[cfg(test)]
mod integration_tests;

pub use catalog_store::CatalogStore;
pub use document_store::DocumentStore;
pub use moves::ResolvedMove;
pub use reference::format_reference;
pub use reporting::{
    document_counts, DashboardSummary, DeliveryLineStatus, DocumentCounts, OnHand, ProductStock,
    StockAlertRow,
};
pub use service::InventoryService;
