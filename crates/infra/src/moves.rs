use chrono::{DateTime, Utc};
use serde::Serialize;

use stockyard_core::ProductId;
use stockyard_ledger::{MoveType, StockMove};

/// A stock move joined with display names for listing.
///
/// The raw [`StockMove`] carries warehouse ids and optional endpoints; this
/// view resolves them to human-readable labels, filling external endpoints
/// with the counterparty from the originating document where one exists.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedMove {
    pub reference: String,
    pub product_id: ProductId,
    pub product_name: String,
    pub sku: String,
    pub from: String,
    pub to: String,
    pub quantity: f64,
    pub move_type: MoveType,
    pub recorded_at: DateTime<Utc>,
}

/// Label for an external move endpoint when no counterparty name is known.
pub fn external_endpoint_label(move_type: MoveType) -> &'static str {
    match move_type {
        MoveType::Receipt => "Vendor",
        MoveType::Delivery => "Customer",
        MoveType::Transfer | MoveType::Adjustment => "Inventory",
    }
}

impl ResolvedMove {
    /// Build a resolved view from a raw move and pre-resolved labels.
    pub fn from_parts(
        raw: &StockMove,
        product_name: String,
        sku: String,
        from: String,
        to: String,
    ) -> Self {
        Self {
            reference: raw.reference.clone(),
            product_id: raw.product_id,
            product_name,
            sku,
            from,
            to,
            quantity: raw.quantity,
            move_type: raw.move_type,
            recorded_at: raw.recorded_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn external_labels_follow_the_move_type() {
        assert_eq!(external_endpoint_label(MoveType::Receipt), "Vendor");
        assert_eq!(external_endpoint_label(MoveType::Delivery), "Customer");
        assert_eq!(external_endpoint_label(MoveType::Adjustment), "Inventory");
    }
}
