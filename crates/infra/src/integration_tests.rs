//! Integration tests for the full document → ledger pipeline.
//!
//! Flow under test: service → document store → document plan → ledger batch
//! → move log, exercising receipts, deliveries, transfers, adjustments, and
//! the derived reports on top of them.

use std::sync::Arc;

use chrono::{Duration, Utc};

use stockyard_catalog::{ProductSpec, WarehouseSpec};
use stockyard_core::{StockError, WarehouseId};
use stockyard_documents::{
    DeliveryHeader, DeliveryLine, DocumentPatch, DocumentStatus, ReceiptHeader, ReceiptLine,
    TransferHeader, TransferLine,
};
use stockyard_ledger::MoveType;

use crate::service::InventoryService;

fn product_spec(sku: &str, reorder_min: f64) -> ProductSpec {
    ProductSpec {
        sku: sku.to_string(),
        name: format!("Product {sku}"),
        category_id: None,
        unit_of_measure: None,
        reorder_min,
        cost: 10.0,
        sales_price: 25.0,
    }
}

fn warehouse(service: &InventoryService, name: &str) -> WarehouseId {
    service
        .catalog()
        .create_warehouse(WarehouseSpec {
            name: name.to_string(),
            short_code: None,
            address: None,
            is_default: false,
        })
        .unwrap()
        .id
}

fn receipt_header(warehouse_id: WarehouseId) -> ReceiptHeader {
    ReceiptHeader {
        vendor: "Acme Supply".to_string(),
        warehouse_id,
        responsible: None,
    }
}

fn delivery_header(warehouse_id: WarehouseId) -> DeliveryHeader {
    DeliveryHeader {
        delivery_address: "12 Dock Rd".to_string(),
        warehouse_id,
        responsible: None,
    }
}

/// Receive goods, then deliver part of them: the happy path across both
/// document types and the ledger.
#[test]
fn receive_then_deliver_updates_stock_and_move_log() {
    let service = InventoryService::new();
    let wh = warehouse(&service, "Main");
    let product = service
        .create_product(product_spec("DESK-001", 5.0), None)
        .unwrap();

    let receipt = service
        .create_receipt(
            receipt_header(wh),
            vec![ReceiptLine {
                product_id: product.id,
                demand_qty: 20.0,
                done_qty: 20.0,
            }],
            None,
        )
        .unwrap();
    assert_eq!(receipt.reference(), "WH/IN/0001");
    assert_eq!(receipt.status(), DocumentStatus::Draft);
    // Nothing lands until validation.
    assert_eq!(service.on_hand(product.id).unwrap().total, 0.0);

    let receipt = service.validate_receipt(receipt.id(), None).unwrap();
    assert_eq!(receipt.status(), DocumentStatus::Done);
    assert!(receipt.validated_at().is_some());
    assert_eq!(service.on_hand(product.id).unwrap().total, 20.0);

    let delivery = service
        .create_delivery(
            delivery_header(wh),
            vec![DeliveryLine {
                product_id: product.id,
                demand_qty: 8.0,
                done_qty: 8.0,
            }],
            None,
        )
        .unwrap();
    assert_eq!(delivery.reference(), "WH/OUT/0001");
    service.mark_delivery_ready(delivery.id()).unwrap();
    service.validate_delivery(delivery.id(), None).unwrap();

    assert_eq!(service.on_hand(product.id).unwrap().total, 12.0);

    // Newest first: the delivery move precedes the receipt move.
    let moves = service.moves(Some(product.id), None).unwrap();
    assert_eq!(moves.len(), 2);
    assert_eq!(moves[0].move_type, MoveType::Delivery);
    assert_eq!(moves[0].to, "12 Dock Rd");
    assert_eq!(moves[1].move_type, MoveType::Receipt);
    assert_eq!(moves[1].from, "Acme Supply");
}

/// A delivery whose done quantity exceeds stock is refused whole, leaving
/// stock and the document untouched so it can be retried after receiving.
#[test]
fn delivery_exceeding_stock_is_refused_and_retryable() {
    let service = InventoryService::new();
    let wh = warehouse(&service, "Main");
    let product = service
        .create_product(product_spec("DESK-001", 5.0), Some((wh, 5.0)))
        .unwrap();

    let delivery = service
        .create_delivery(
            delivery_header(wh),
            vec![DeliveryLine {
                product_id: product.id,
                demand_qty: 8.0,
                done_qty: 8.0,
            }],
            None,
        )
        .unwrap();
    service.mark_delivery_ready(delivery.id()).unwrap();

    let availability = service.check_delivery_availability(delivery.id()).unwrap();
    assert!(!availability.available);
    assert_eq!(availability.issues[0].needed, 8.0);
    assert_eq!(availability.issues[0].available, 5.0);

    let err = service.validate_delivery(delivery.id(), None).unwrap_err();
    assert!(matches!(
        err,
        StockError::InsufficientStock { needed, available, .. }
            if needed == 8.0 && available == 5.0
    ));
    assert_eq!(service.on_hand(product.id).unwrap().total, 5.0);
    assert_eq!(
        service.get_delivery(delivery.id()).unwrap().status(),
        DocumentStatus::Ready
    );

    // Receive the shortfall, then the same delivery validates.
    let receipt = service
        .create_receipt(
            receipt_header(wh),
            vec![ReceiptLine {
                product_id: product.id,
                demand_qty: 10.0,
                done_qty: 10.0,
            }],
            None,
        )
        .unwrap();
    service.validate_receipt(receipt.id(), None).unwrap();
    service.validate_delivery(delivery.id(), None).unwrap();
    assert_eq!(service.on_hand(product.id).unwrap().total, 7.0);
}

/// Receiving more than a line's demand is refused at validation with no
/// ledger effect.
#[test]
fn over_receipt_leaves_stock_untouched() {
    let service = InventoryService::new();
    let wh = warehouse(&service, "Main");
    let product = service
        .create_product(product_spec("DESK-001", 5.0), None)
        .unwrap();

    let receipt = service
        .create_receipt(
            receipt_header(wh),
            vec![ReceiptLine {
                product_id: product.id,
                demand_qty: 20.0,
                done_qty: 30.0,
            }],
            None,
        )
        .unwrap();

    let err = service.validate_receipt(receipt.id(), None).unwrap_err();
    assert!(matches!(
        err,
        StockError::OverDemand { demand, done, .. } if demand == 20.0 && done == 30.0
    ));
    assert_eq!(service.on_hand(product.id).unwrap().total, 0.0);
    assert!(service.moves(Some(product.id), None).unwrap().is_empty());
    assert_eq!(
        service.get_receipt(receipt.id()).unwrap().status(),
        DocumentStatus::Draft
    );
}

/// A transfer moves quantity between warehouses without changing the total,
/// and records one move per half tagged as a transfer.
#[test]
fn transfer_conserves_total_stock_across_warehouses() {
    let service = InventoryService::new();
    let main = warehouse(&service, "Main");
    let overflow = warehouse(&service, "Overflow");
    let product = service
        .create_product(product_spec("DESK-001", 5.0), Some((main, 30.0)))
        .unwrap();

    let transfer = service
        .create_transfer(
            TransferHeader {
                from_warehouse_id: main,
                to_warehouse_id: overflow,
            },
            vec![TransferLine {
                product_id: product.id,
                quantity: 12.0,
            }],
            None,
        )
        .unwrap();
    assert_eq!(transfer.reference(), "WH/TR/0001");
    service.validate_transfer(transfer.id(), None).unwrap();

    let on_hand = service.on_hand(product.id).unwrap();
    assert_eq!(on_hand.total, 30.0);
    let by_wh: std::collections::HashMap<_, _> = on_hand.by_warehouse.into_iter().collect();
    assert_eq!(by_wh[&main], 18.0);
    assert_eq!(by_wh[&overflow], 12.0);

    let transfer_moves: Vec<_> = service
        .moves(Some(product.id), None)
        .unwrap()
        .into_iter()
        .filter(|m| m.move_type == MoveType::Transfer)
        .collect();
    assert_eq!(transfer_moves.len(), 2);
    assert!(transfer_moves.iter().all(|m| m.quantity == 12.0));
}

/// A transfer short on source stock fails whole: neither warehouse moves.
#[test]
fn failed_transfer_changes_neither_warehouse() {
    let service = InventoryService::new();
    let main = warehouse(&service, "Main");
    let overflow = warehouse(&service, "Overflow");
    let product = service
        .create_product(product_spec("DESK-001", 5.0), Some((main, 4.0)))
        .unwrap();

    let transfer = service
        .create_transfer(
            TransferHeader {
                from_warehouse_id: main,
                to_warehouse_id: overflow,
            },
            vec![TransferLine {
                product_id: product.id,
                quantity: 12.0,
            }],
            None,
        )
        .unwrap();
    let err = service.validate_transfer(transfer.id(), None).unwrap_err();
    assert!(matches!(err, StockError::InsufficientStock { .. }));

    let on_hand = service.on_hand(product.id).unwrap();
    assert_eq!(on_hand.total, 4.0);
    assert_eq!(on_hand.by_warehouse.len(), 1);
    assert_eq!(
        service.get_transfer(transfer.id()).unwrap().status(),
        DocumentStatus::Draft
    );
}

/// An adjustment snapshots the system quantity, forces the counted value,
/// and lands already validated.
#[test]
fn adjustment_counts_force_exact_quantities() {
    let service = InventoryService::new();
    let wh = warehouse(&service, "Main");
    let counted_down = service
        .create_product(product_spec("DESK-001", 5.0), Some((wh, 30.0)))
        .unwrap();
    let found = service
        .create_product(product_spec("CHAIR-001", 5.0), None)
        .unwrap();

    let adjustment = service
        .create_adjustment(
            wh,
            "cycle count".to_string(),
            &[(counted_down.id, 27.0), (found.id, 4.0)],
            None,
        )
        .unwrap();
    assert_eq!(adjustment.reference(), "WH/ADJ/0001");
    assert_eq!(adjustment.status(), DocumentStatus::Done);
    assert_eq!(adjustment.lines()[0].previous_qty, 30.0);
    assert_eq!(adjustment.lines()[0].difference, -3.0);

    assert_eq!(service.on_hand(counted_down.id).unwrap().total, 27.0);
    assert_eq!(service.on_hand(found.id).unwrap().total, 4.0);

    // Shrinkage shows as an outbound adjustment move, findings as inbound.
    let moves = service.moves(Some(counted_down.id), None).unwrap();
    assert_eq!(moves[0].move_type, MoveType::Adjustment);
    assert_eq!(moves[0].quantity, 3.0);
    assert_eq!(moves[0].from, "Main");
    assert_eq!(moves[0].to, "Inventory");
}

/// Lifecycle edges: editing after validation, double validation, canceling
/// done documents, and validating a draft delivery are all refused.
#[test]
fn lifecycle_misuse_is_refused() {
    let service = InventoryService::new();
    let wh = warehouse(&service, "Main");
    let product = service
        .create_product(product_spec("DESK-001", 5.0), Some((wh, 10.0)))
        .unwrap();

    let receipt = service
        .create_receipt(
            receipt_header(wh),
            vec![ReceiptLine {
                product_id: product.id,
                demand_qty: 5.0,
                done_qty: 5.0,
            }],
            None,
        )
        .unwrap();
    service.validate_receipt(receipt.id(), None).unwrap();

    assert!(matches!(
        service.edit_receipt(receipt.id(), DocumentPatch::default()),
        Err(StockError::InvalidState(_))
    ));
    assert!(matches!(
        service.validate_receipt(receipt.id(), None),
        Err(StockError::InvalidState(_))
    ));
    assert!(matches!(
        service.cancel_receipt(receipt.id()),
        Err(StockError::InvalidState(_))
    ));
    // Double validation applied nothing twice.
    assert_eq!(service.on_hand(product.id).unwrap().total, 15.0);

    let delivery = service
        .create_delivery(
            delivery_header(wh),
            vec![DeliveryLine {
                product_id: product.id,
                demand_qty: 2.0,
                done_qty: 2.0,
            }],
            None,
        )
        .unwrap();
    // Still draft: validation requires ready.
    assert!(matches!(
        service.validate_delivery(delivery.id(), None),
        Err(StockError::InvalidState(_))
    ));

    service.cancel_delivery(delivery.id()).unwrap();
    assert!(matches!(
        service.mark_delivery_ready(delivery.id()),
        Err(StockError::InvalidState(_))
    ));
    assert_eq!(service.on_hand(product.id).unwrap().total, 15.0);
}

/// References stay unique per document type under concurrent creation.
#[test]
fn concurrent_receipt_creation_yields_unique_references() {
    let service = Arc::new(InventoryService::new());
    let wh = warehouse(&service, "Main");

    let mut handles = Vec::new();
    for _ in 0..8 {
        let service = service.clone();
        handles.push(std::thread::spawn(move || {
            let mut refs = Vec::new();
            for _ in 0..20 {
                let receipt = service
                    .create_receipt(receipt_header(wh), Vec::new(), None)
                    .unwrap();
                refs.push(receipt.reference().to_string());
            }
            refs
        }));
    }

    let mut all: Vec<String> = handles
        .into_iter()
        .flat_map(|h| h.join().unwrap())
        .collect();
    let total = all.len();
    all.sort();
    all.dedup();
    assert_eq!(all.len(), total);

    // The numeric suffixes cover 1..=N with no gaps.
    let mut suffixes: Vec<u64> = all
        .iter()
        .map(|r| r.rsplit('/').next().unwrap().parse().unwrap())
        .collect();
    suffixes.sort_unstable();
    assert_eq!(suffixes, (1..=total as u64).collect::<Vec<_>>());
}

/// Concurrent deliveries racing for the same stock never drive it negative;
/// exactly as many succeed as stock allows.
#[test]
fn racing_deliveries_never_oversell() {
    let service = Arc::new(InventoryService::new());
    let wh = warehouse(&service, "Main");
    let product = service
        .create_product(product_spec("DESK-001", 0.0), Some((wh, 5.0)))
        .unwrap();

    let mut ids = Vec::new();
    for _ in 0..10 {
        let delivery = service
            .create_delivery(
                delivery_header(wh),
                vec![DeliveryLine {
                    product_id: product.id,
                    demand_qty: 1.0,
                    done_qty: 1.0,
                }],
                None,
            )
            .unwrap();
        service.mark_delivery_ready(delivery.id()).unwrap();
        ids.push(delivery.id());
    }

    let handles: Vec<_> = ids
        .into_iter()
        .map(|id| {
            let service = service.clone();
            std::thread::spawn(move || service.validate_delivery(id, None).is_ok())
        })
        .collect();
    let succeeded = handles
        .into_iter()
        .map(|h| h.join().unwrap_or(false))
        .filter(|&ok| ok)
        .count();

    assert_eq!(succeeded, 5);
    assert_eq!(service.on_hand(product.id).unwrap().total, 0.0);
}

/// Dashboard figures derive from the catalog, the ledger, and the open
/// documents in one place.
#[test]
fn dashboard_summarizes_stock_and_open_documents() {
    let service = InventoryService::new();
    let wh = warehouse(&service, "Main");
    let now = Utc::now();

    let stocked = service
        .create_product(product_spec("DESK-001", 5.0), Some((wh, 10.0)))
        .unwrap();
    service
        .create_product(product_spec("LOW-001", 8.0), Some((wh, 2.0)))
        .unwrap();
    service
        .create_product(product_spec("OUT-001", 5.0), None)
        .unwrap();

    // One late receipt, one future one, one validated.
    service
        .create_receipt(receipt_header(wh), Vec::new(), Some(now - Duration::days(2)))
        .unwrap();
    service
        .create_receipt(receipt_header(wh), Vec::new(), Some(now + Duration::days(2)))
        .unwrap();
    let done = service
        .create_receipt(
            receipt_header(wh),
            vec![ReceiptLine {
                product_id: stocked.id,
                demand_qty: 1.0,
                done_qty: 1.0,
            }],
            None,
        )
        .unwrap();
    service.validate_receipt(done.id(), None).unwrap();

    service
        .create_delivery(delivery_header(wh), Vec::new(), Some(now - Duration::days(1)))
        .unwrap();

    let summary = service.dashboard(now).unwrap();
    assert_eq!(summary.total_products, 3);
    // 11 desks + 2 low + 0 out, all at cost 10.
    assert_eq!(summary.total_stock_value, 130.0);
    assert_eq!(summary.low_stock_count, 1);
    assert_eq!(summary.out_of_stock_count, 1);
    assert_eq!(summary.receipts_to_receive, 2);
    assert_eq!(summary.late_receipts, 1);
    assert_eq!(summary.total_receipt_operations, 3);
    assert_eq!(summary.deliveries_to_deliver, 1);
    assert_eq!(summary.late_deliveries, 1);
    assert_eq!(summary.total_delivery_operations, 1);
    assert_eq!(summary.pending_transfers, 0);
}

/// Documents serialize to JSON with their kind-specific header and lines
/// inlined, ready for an HTTP layer to expose, and round-trip losslessly.
#[test]
fn documents_round_trip_through_json() {
    let service = InventoryService::new();
    let wh = warehouse(&service, "Main");
    let product = service
        .create_product(product_spec("DESK-001", 5.0), None)
        .unwrap();

    let receipt = service
        .create_receipt(
            receipt_header(wh),
            vec![ReceiptLine {
                product_id: product.id,
                demand_qty: 20.0,
                done_qty: 0.0,
            }],
            None,
        )
        .unwrap();

    let json = serde_json::to_value(&receipt).unwrap();
    assert_eq!(json["reference"], "WH/IN/0001");
    assert_eq!(json["status"], "draft");
    assert_eq!(json["header"]["vendor"], "Acme Supply");
    assert_eq!(json["lines"][0]["demand_qty"], 20.0);

    let back: stockyard_documents::Receipt = serde_json::from_value(json).unwrap();
    assert_eq!(back, receipt);
}

/// Every committed change is visible in the move log with the document's
/// reference, so stock can be audited end to end.
#[test]
fn move_log_accounts_for_every_committed_change() {
    let service = InventoryService::new();
    let main = warehouse(&service, "Main");
    let overflow = warehouse(&service, "Overflow");
    let product = service
        .create_product(product_spec("DESK-001", 5.0), Some((main, 10.0)))
        .unwrap();

    let transfer = service
        .create_transfer(
            TransferHeader {
                from_warehouse_id: main,
                to_warehouse_id: overflow,
            },
            vec![TransferLine {
                product_id: product.id,
                quantity: 4.0,
            }],
            None,
        )
        .unwrap();
    service.validate_transfer(transfer.id(), None).unwrap();
    service
        .create_adjustment(overflow, "recount".to_string(), &[(product.id, 3.0)], None)
        .unwrap();

    let moves = service.moves(Some(product.id), None).unwrap();
    // SYSTEM seed + two transfer halves + one adjustment.
    assert_eq!(moves.len(), 4);
    let refs: Vec<&str> = moves.iter().map(|m| m.reference.as_str()).collect();
    assert_eq!(refs, ["WH/ADJ/0001", "WH/TR/0001", "WH/TR/0001", "SYSTEM"]);

    // Net effect reconciles with on-hand.
    let on_hand = service.on_hand(product.id).unwrap();
    assert_eq!(on_hand.total, 9.0);
}
