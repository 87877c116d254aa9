use serde::{Deserialize, Serialize};

use stockyard_core::{ProductId, StockError, StockResult, WarehouseId};
use stockyard_ledger::{LedgerEntry, MoveType, StockView};

use crate::document::{Document, DocumentKind};
use crate::status::DocumentStatus;

/// A physical stock count for one warehouse. Unlike the other documents an
/// adjustment is created and validated in a single step, so its lines carry a
/// snapshot of what the system believed at count time.
pub type Adjustment = Document<AdjustmentKind>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdjustmentHeader {
    pub warehouse_id: WarehouseId,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdjustmentLine {
    pub product_id: ProductId,
    /// Quantity found during the physical count.
    pub counted_qty: f64,
    /// System quantity at count time.
    pub previous_qty: f64,
    /// `counted_qty - previous_qty`; negative for shrinkage.
    pub difference: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdjustmentKind;

impl DocumentKind for AdjustmentKind {
    type Header = AdjustmentHeader;
    type Line = AdjustmentLine;

    const NAME: &'static str = "adjustment";
    const PREFIX: &'static str = "WH/ADJ";
    const MOVE_TYPE: MoveType = MoveType::Adjustment;
    const VALIDATE_FROM: DocumentStatus = DocumentStatus::Draft;
    const SUPPORTS_MARK_READY: bool = false;

    fn plan(
        header: &Self::Header,
        lines: &[Self::Line],
        _stock: &dyn StockView,
    ) -> StockResult<Vec<LedgerEntry>> {
        lines
            .iter()
            .map(|line| {
                if line.counted_qty < 0.0 {
                    return Err(StockError::validation(
                        "counted quantities cannot be negative",
                    ));
                }
                Ok(LedgerEntry::count(
                    line.product_id,
                    header.warehouse_id,
                    line.difference,
                    line.counted_qty,
                ))
            })
            .collect()
    }
}
