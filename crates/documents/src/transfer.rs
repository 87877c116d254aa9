use serde::{Deserialize, Serialize};

use stockyard_core::{ProductId, StockError, StockResult, WarehouseId};
use stockyard_ledger::{LedgerEntry, MoveType, StockView};

use crate::document::{Document, DocumentKind};
use crate::status::DocumentStatus;

/// Goods moved between two warehouses. Total stock is conserved.
pub type Transfer = Document<TransferKind>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransferHeader {
    pub from_warehouse_id: WarehouseId,
    pub to_warehouse_id: WarehouseId,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransferLine {
    pub product_id: ProductId,
    pub quantity: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferKind;

impl DocumentKind for TransferKind {
    type Header = TransferHeader;
    type Line = TransferLine;

    const NAME: &'static str = "transfer";
    const PREFIX: &'static str = "WH/TR";
    const MOVE_TYPE: MoveType = MoveType::Transfer;
    const VALIDATE_FROM: DocumentStatus = DocumentStatus::Draft;
    const SUPPORTS_MARK_READY: bool = false;

    fn plan(
        header: &Self::Header,
        lines: &[Self::Line],
        stock: &dyn StockView,
    ) -> StockResult<Vec<LedgerEntry>> {
        if header.from_warehouse_id == header.to_warehouse_id {
            return Err(StockError::validation(
                "transfer source and destination warehouses must differ",
            ));
        }
        let mut entries = Vec::new();
        for line in lines {
            if line.quantity < 0.0 {
                return Err(StockError::validation(
                    "transfer quantities cannot be negative",
                ));
            }
            let available = stock.on_hand(line.product_id, header.from_warehouse_id);
            if available < line.quantity {
                return Err(StockError::InsufficientStock {
                    product_id: line.product_id,
                    needed: line.quantity,
                    available,
                });
            }
            if line.quantity > 0.0 {
                entries.push(LedgerEntry::delta(
                    line.product_id,
                    header.from_warehouse_id,
                    -line.quantity,
                ));
                entries.push(LedgerEntry::delta(
                    line.product_id,
                    header.to_warehouse_id,
                    line.quantity,
                ));
            }
        }
        Ok(entries)
    }
}
