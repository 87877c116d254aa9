use serde::{Deserialize, Serialize};

use stockyard_core::{ProductId, StockError, StockResult, UserId, WarehouseId};
use stockyard_ledger::{LedgerEntry, MoveType, StockView};

use crate::document::{Document, DocumentKind};
use crate::status::DocumentStatus;

/// Incoming goods from a vendor into one warehouse.
pub type Receipt = Document<ReceiptKind>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReceiptHeader {
    pub vendor: String,
    pub warehouse_id: WarehouseId,
    pub responsible: Option<UserId>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReceiptLine {
    pub product_id: ProductId,
    /// Expected quantity.
    pub demand_qty: f64,
    /// Actually received quantity, settable up to validation.
    pub done_qty: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReceiptKind;

impl DocumentKind for ReceiptKind {
    type Header = ReceiptHeader;
    type Line = ReceiptLine;

    const NAME: &'static str = "receipt";
    const PREFIX: &'static str = "WH/IN";
    const MOVE_TYPE: MoveType = MoveType::Receipt;
    const VALIDATE_FROM: DocumentStatus = DocumentStatus::Draft;
    const SUPPORTS_MARK_READY: bool = false;

    fn plan(
        header: &Self::Header,
        lines: &[Self::Line],
        _stock: &dyn StockView,
    ) -> StockResult<Vec<LedgerEntry>> {
        let mut entries = Vec::new();
        for line in lines {
            if line.demand_qty < 0.0 || line.done_qty < 0.0 {
                return Err(StockError::validation(
                    "receipt quantities cannot be negative",
                ));
            }
            if line.done_qty > line.demand_qty {
                return Err(StockError::OverDemand {
                    product_id: line.product_id,
                    demand: line.demand_qty,
                    done: line.done_qty,
                });
            }
            if line.done_qty > 0.0 {
                entries.push(LedgerEntry::delta(
                    line.product_id,
                    header.warehouse_id,
                    line.done_qty,
                ));
            }
        }
        Ok(entries)
    }
}
