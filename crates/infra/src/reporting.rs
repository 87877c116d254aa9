use chrono::{DateTime, Utc};
use serde::Serialize;

use stockyard_catalog::{Product, StockStatus};
use stockyard_core::{ProductId, WarehouseId};
use stockyard_documents::{Document, DocumentKind};

/// On-hand quantity for one product: the total plus its per-warehouse split.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OnHand {
    pub total: f64,
    pub by_warehouse: Vec<(WarehouseId, f64)>,
}

/// A product joined with its total on-hand and derived status, as listings
/// and search results present it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductStock {
    pub product: Product,
    pub on_hand: f64,
    pub status: StockStatus,
}

/// One row of the low-stock / out-of-stock reports.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StockAlertRow {
    pub product_id: ProductId,
    pub sku: String,
    pub name: String,
    pub on_hand: f64,
    pub reorder_min: f64,
}

/// One delivery line joined with current stock and whether the demand is
/// coverable, as the delivery detail view presents it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeliveryLineStatus {
    pub product_id: ProductId,
    pub demand_qty: f64,
    pub on_hand: f64,
    pub status: StockStatus,
}

/// Open/late/total counts for one document type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct DocumentCounts {
    pub open: usize,
    pub late: usize,
    pub total: usize,
}

/// Count a document type's open, late, and total documents.
pub fn document_counts<K: DocumentKind>(
    docs: &[Document<K>],
    now: DateTime<Utc>,
) -> DocumentCounts {
    DocumentCounts {
        open: docs.iter().filter(|d| d.status().is_open()).count(),
        late: docs.iter().filter(|d| d.is_late(now)).count(),
        total: docs.len(),
    }
}

/// Aggregate figures for the operational overview.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSummary {
    pub total_products: usize,
    /// Sum of on-hand quantity times product cost across the catalog.
    pub total_stock_value: f64,
    pub low_stock_count: usize,
    pub out_of_stock_count: usize,
    pub receipts_to_receive: usize,
    pub late_receipts: usize,
    pub total_receipt_operations: usize,
    pub deliveries_to_deliver: usize,
    pub late_deliveries: usize,
    pub total_delivery_operations: usize,
    pub pending_transfers: usize,
}
