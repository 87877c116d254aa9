use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use stockyard_core::{ProductId, UserId, WarehouseId};

/// Kind of document that caused a stock move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MoveType {
    Receipt,
    Delivery,
    Transfer,
    Adjustment,
}

impl MoveType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MoveType::Receipt => "receipt",
            MoveType::Delivery => "delivery",
            MoveType::Transfer => "transfer",
            MoveType::Adjustment => "adjustment",
        }
    }
}

impl core::fmt::Display for MoveType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Immutable audit record of one ledger delta application.
///
/// `quantity` is always the magnitude of the delta; direction is carried by
/// the endpoint pair. A `None` endpoint is external to the system (vendor on
/// the inbound side, customer on the outbound side).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockMove {
    pub id: Uuid,
    /// Reference of the originating document, or `"SYSTEM"`.
    pub reference: String,
    pub product_id: ProductId,
    pub from_warehouse: Option<WarehouseId>,
    pub to_warehouse: Option<WarehouseId>,
    pub quantity: f64,
    pub move_type: MoveType,
    pub user_id: Option<UserId>,
    pub recorded_at: DateTime<Utc>,
}

/// Derive the (from, to) endpoints of a move from the sign of its delta.
///
/// Inbound deltas come from outside into the warehouse; outbound deltas leave
/// the warehouse for the outside. Transfers record one move per half, and
/// adjustments follow the same rule, which resolves the upstream ambiguity of
/// where adjustment moves point.
pub fn move_endpoints(
    delta: f64,
    warehouse_id: WarehouseId,
) -> (Option<WarehouseId>, Option<WarehouseId>) {
    if delta >= 0.0 {
        (None, Some(warehouse_id))
    } else {
        (Some(warehouse_id), None)
    }
}
