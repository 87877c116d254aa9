use serde::{Deserialize, Serialize};

use stockyard_core::{ProductId, StockError, StockResult, UserId, WarehouseId};
use stockyard_ledger::{LedgerEntry, MoveType, StockView};

use crate::document::{Document, DocumentKind};
use crate::status::DocumentStatus;

/// Outgoing goods from one warehouse to a customer.
pub type Delivery = Document<DeliveryKind>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeliveryHeader {
    pub delivery_address: String,
    pub warehouse_id: WarehouseId,
    pub responsible: Option<UserId>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeliveryLine {
    pub product_id: ProductId,
    /// Quantity the customer ordered.
    pub demand_qty: f64,
    /// Quantity actually picked, settable up to validation.
    pub done_qty: f64,
}

/// Result of a non-mutating availability check against current stock.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Availability {
    pub available: bool,
    pub issues: Vec<AvailabilityIssue>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AvailabilityIssue {
    pub product_id: ProductId,
    pub needed: f64,
    pub available: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryKind;

impl DocumentKind for DeliveryKind {
    type Header = DeliveryHeader;
    type Line = DeliveryLine;

    const NAME: &'static str = "delivery";
    const PREFIX: &'static str = "WH/OUT";
    const MOVE_TYPE: MoveType = MoveType::Delivery;
    const VALIDATE_FROM: DocumentStatus = DocumentStatus::Ready;
    const SUPPORTS_MARK_READY: bool = true;

    fn plan(
        header: &Self::Header,
        lines: &[Self::Line],
        stock: &dyn StockView,
    ) -> StockResult<Vec<LedgerEntry>> {
        let mut entries = Vec::new();
        for line in lines {
            if line.demand_qty < 0.0 || line.done_qty < 0.0 {
                return Err(StockError::validation(
                    "delivery quantities cannot be negative",
                ));
            }
            // Stock sufficiency is checked before over-demand so pickers get
            // the actionable error first.
            let available = stock.on_hand(line.product_id, header.warehouse_id);
            if available < line.done_qty {
                return Err(StockError::InsufficientStock {
                    product_id: line.product_id,
                    needed: line.done_qty,
                    available,
                });
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
                    -line.done_qty,
                ));
            }
        }
        Ok(entries)
    }
}

impl Document<DeliveryKind> {
    /// Check whether every line's demand could be served from current stock.
    /// Reads only; the answer can go stale the moment the ledger moves.
    pub fn check_availability(&self, stock: &dyn StockView) -> Availability {
        let warehouse_id = self.header().warehouse_id;
        let issues: Vec<AvailabilityIssue> = self
            .lines()
            .iter()
            .filter_map(|line| {
                let available = stock.on_hand(line.product_id, warehouse_id);
                (available < line.demand_qty).then_some(AvailabilityIssue {
                    product_id: line.product_id,
                    needed: line.demand_qty,
                    available,
                })
            })
            .collect();
        Availability {
            available: issues.is_empty(),
            issues,
        }
    }
}
