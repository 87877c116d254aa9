use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use stockyard_core::{ProductId, WarehouseId};

/// Snapshot of the authoritative fact table: one row per (product, warehouse)
/// pair that has ever held stock. Absence means zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockQuant {
    pub product_id: ProductId,
    pub warehouse_id: WarehouseId,
    pub quantity: f64,
}

/// Read-only view of current on-hand quantities.
///
/// This is the seam between the document state machine (which plans stock
/// effects) and the ledger (which owns them). Tests substitute a plain map.
pub trait StockView {
    /// Current on-hand quantity for the pair; zero when no quant exists.
    fn on_hand(&self, product_id: ProductId, warehouse_id: WarehouseId) -> f64;
}

impl StockView for HashMap<(ProductId, WarehouseId), f64> {
    fn on_hand(&self, product_id: ProductId, warehouse_id: WarehouseId) -> f64 {
        self.get(&(product_id, warehouse_id)).copied().unwrap_or(0.0)
    }
}

impl<V: StockView + ?Sized> StockView for &V {
    fn on_hand(&self, product_id: ProductId, warehouse_id: WarehouseId) -> f64 {
        (**self).on_hand(product_id, warehouse_id)
    }
}
