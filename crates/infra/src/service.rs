use chrono::{DateTime, Utc};

use stockyard_catalog::{demand_status, stock_status, Product, ProductSpec, StockStatus};
use stockyard_core::{
    CategoryId, DocumentId, ProductId, StockError, StockResult, UserId, WarehouseId,
};
use stockyard_documents::{
    Adjustment, AdjustmentHeader, AdjustmentKind, AdjustmentLine, Availability, Delivery,
    DeliveryHeader, DeliveryKind, DeliveryLine, Document, DocumentKind, DocumentPatch,
    DocumentStatus, Receipt, ReceiptHeader, ReceiptKind, ReceiptLine, Transfer, TransferHeader,
    TransferKind, TransferLine,
};
use stockyard_ledger::{MoveType, StockLedger, StockView};

use crate::catalog_store::CatalogStore;
use crate::document_store::DocumentStore;
use crate::moves::{external_endpoint_label, ResolvedMove};
use crate::reporting::{
    document_counts, DashboardSummary, DeliveryLineStatus, OnHand, ProductStock, StockAlertRow,
};

/// Reference stamped on ledger moves that no document produced (initial
/// stock on product creation).
const SYSTEM_REFERENCE: &str = "SYSTEM";

/// The composition root: owns the catalog, the ledger, and one document store
/// per type, and orchestrates every operation that spans more than one of
/// them.
///
/// Consistency model: each store serializes its own mutations behind a lock;
/// cross-store operations (document validation) hold the document store's
/// write lock while the ledger batch commits, so a document can never be
/// `done` without its stock effects, nor vice versa.
#[derive(Debug, Default)]
pub struct InventoryService {
    catalog: CatalogStore,
    ledger: StockLedger,
    receipts: DocumentStore<ReceiptKind>,
    deliveries: DocumentStore<DeliveryKind>,
    transfers: DocumentStore<TransferKind>,
    adjustments: DocumentStore<AdjustmentKind>,
}

impl InventoryService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn catalog(&self) -> &CatalogStore {
        &self.catalog
    }

    pub fn ledger(&self) -> &StockLedger {
        &self.ledger
    }

    // ----- catalog -----

    /// Create a product, optionally seeding stock in one warehouse. Seeded
    /// stock goes through the ledger like any other change, recorded as an
    /// adjustment move with the `SYSTEM` reference.
    pub fn create_product(
        &self,
        spec: ProductSpec,
        initial_stock: Option<(WarehouseId, f64)>,
    ) -> StockResult<Product> {
        if let Some((warehouse_id, qty)) = initial_stock {
            if !(qty.is_finite() && qty >= 0.0) {
                return Err(StockError::validation(
                    "initial stock must be a finite non-negative number",
                ));
            }
            self.catalog.get_warehouse(warehouse_id)?;
        }
        let product = self.catalog.create_product(spec)?;
        if let Some((warehouse_id, qty)) = initial_stock {
            if qty > 0.0 {
                self.ledger.apply_delta(
                    product.id,
                    warehouse_id,
                    qty,
                    MoveType::Adjustment,
                    SYSTEM_REFERENCE,
                    None,
                )?;
            }
        }
        tracing::info!(product_id = %product.id, sku = %product.sku, "product created");
        Ok(product)
    }

    pub fn update_product(&self, id: ProductId, spec: ProductSpec) -> StockResult<Product> {
        self.catalog.update_product(id, spec)
    }

    /// Delete a product. Refused while any warehouse still holds its stock,
    /// so the move log never points at quantities that vanished silently.
    pub fn delete_product(&self, id: ProductId) -> StockResult<Product> {
        if self.ledger.product_has_stock(id) {
            return Err(StockError::conflict("product still has stock"));
        }
        self.catalog.delete_product(id)
    }

    pub fn delete_warehouse(&self, id: WarehouseId) -> StockResult<()> {
        if self.ledger.warehouse_has_stock(id) {
            return Err(StockError::conflict("warehouse still has stock"));
        }
        self.catalog.delete_warehouse(id)?;
        Ok(())
    }

    pub fn delete_category(&self, id: CategoryId) -> StockResult<()> {
        self.catalog.delete_category(id)?;
        Ok(())
    }

    // ----- stock queries -----

    /// All products joined with their on-hand totals, ordered by name.
    pub fn list_products(&self) -> StockResult<Vec<ProductStock>> {
        Ok(self.with_stock(self.catalog.list_products()?))
    }

    /// Case-insensitive substring search over name and SKU, with totals.
    pub fn search_products(&self, query: &str) -> StockResult<Vec<ProductStock>> {
        Ok(self.with_stock(self.catalog.search_products(query)?))
    }

    fn with_stock(&self, products: Vec<Product>) -> Vec<ProductStock> {
        products
            .into_iter()
            .map(|product| {
                let on_hand = self.ledger.total_on_hand(product.id);
                ProductStock {
                    status: stock_status(on_hand, product.reorder_min),
                    on_hand,
                    product,
                }
            })
            .collect()
    }

    pub fn on_hand(&self, product_id: ProductId) -> StockResult<OnHand> {
        self.catalog.get_product(product_id)?;
        Ok(OnHand {
            total: self.ledger.total_on_hand(product_id),
            by_warehouse: self.ledger.by_warehouse(product_id),
        })
    }

    pub fn product_stock_status(&self, product_id: ProductId) -> StockResult<StockStatus> {
        let product = self.catalog.get_product(product_id)?;
        Ok(stock_status(
            self.ledger.total_on_hand(product_id),
            product.reorder_min,
        ))
    }

    // ----- receipts -----

    pub fn create_receipt(
        &self,
        header: ReceiptHeader,
        lines: Vec<ReceiptLine>,
        scheduled_date: Option<DateTime<Utc>>,
    ) -> StockResult<Receipt> {
        self.catalog.get_warehouse(header.warehouse_id)?;
        self.check_line_products(lines.iter().map(|l| l.product_id))?;
        self.create_doc(&self.receipts, header, lines, scheduled_date)
    }

    pub fn get_receipt(&self, id: DocumentId) -> StockResult<Receipt> {
        self.receipts.get(id)
    }

    pub fn list_receipts(
        &self,
        status: Option<DocumentStatus>,
        warehouse_id: Option<WarehouseId>,
    ) -> StockResult<Vec<Receipt>> {
        Ok(self
            .receipts
            .list()?
            .into_iter()
            .filter(|d| status.is_none_or(|s| d.status() == s))
            .filter(|d| warehouse_id.is_none_or(|w| d.header().warehouse_id == w))
            .collect())
    }

    pub fn edit_receipt(
        &self,
        id: DocumentId,
        patch: DocumentPatch<ReceiptKind>,
    ) -> StockResult<Receipt> {
        self.edit_doc(&self.receipts, id, patch)
    }

    /// Validate a receipt: commit its done quantities into stock and mark it
    /// done.
    pub fn validate_receipt(&self, id: DocumentId, user_id: Option<UserId>) -> StockResult<Receipt> {
        self.validate_doc(&self.receipts, id, user_id)
    }

    pub fn cancel_receipt(&self, id: DocumentId) -> StockResult<Receipt> {
        self.cancel_doc(&self.receipts, id)
    }

    // ----- deliveries -----

    pub fn create_delivery(
        &self,
        header: DeliveryHeader,
        lines: Vec<DeliveryLine>,
        scheduled_date: Option<DateTime<Utc>>,
    ) -> StockResult<Delivery> {
        self.catalog.get_warehouse(header.warehouse_id)?;
        self.check_line_products(lines.iter().map(|l| l.product_id))?;
        self.create_doc(&self.deliveries, header, lines, scheduled_date)
    }

    pub fn get_delivery(&self, id: DocumentId) -> StockResult<Delivery> {
        self.deliveries.get(id)
    }

    pub fn list_deliveries(
        &self,
        status: Option<DocumentStatus>,
        warehouse_id: Option<WarehouseId>,
    ) -> StockResult<Vec<Delivery>> {
        Ok(self
            .deliveries
            .list()?
            .into_iter()
            .filter(|d| status.is_none_or(|s| d.status() == s))
            .filter(|d| warehouse_id.is_none_or(|w| d.header().warehouse_id == w))
            .collect())
    }

    pub fn edit_delivery(
        &self,
        id: DocumentId,
        patch: DocumentPatch<DeliveryKind>,
    ) -> StockResult<Delivery> {
        self.edit_doc(&self.deliveries, id, patch)
    }

    pub fn mark_delivery_ready(&self, id: DocumentId) -> StockResult<Delivery> {
        self.deliveries.with_mut(id, |doc| {
            doc.mark_ready()?;
            tracing::info!(reference = doc.reference(), "delivery marked ready");
            Ok(doc.clone())
        })
    }

    /// Non-mutating availability check against current stock. The answer can
    /// go stale the moment the ledger moves; validation re-checks under lock.
    pub fn check_delivery_availability(&self, id: DocumentId) -> StockResult<Availability> {
        Ok(self.deliveries.get(id)?.check_availability(&self.ledger))
    }

    /// Per-line demand coverage for a delivery's detail view: each line with
    /// the source warehouse's current on-hand and whether it covers demand.
    pub fn delivery_line_statuses(&self, id: DocumentId) -> StockResult<Vec<DeliveryLineStatus>> {
        let doc = self.deliveries.get(id)?;
        let warehouse_id = doc.header().warehouse_id;
        Ok(doc
            .lines()
            .iter()
            .map(|line| {
                let on_hand = self.ledger.on_hand(line.product_id, warehouse_id);
                DeliveryLineStatus {
                    product_id: line.product_id,
                    demand_qty: line.demand_qty,
                    on_hand,
                    status: demand_status(on_hand, line.demand_qty),
                }
            })
            .collect())
    }

    /// Validate a delivery: deduct its done quantities from stock and mark it
    /// done. Only `ready` deliveries qualify.
    pub fn validate_delivery(
        &self,
        id: DocumentId,
        user_id: Option<UserId>,
    ) -> StockResult<Delivery> {
        self.validate_doc(&self.deliveries, id, user_id)
    }

    pub fn cancel_delivery(&self, id: DocumentId) -> StockResult<Delivery> {
        self.cancel_doc(&self.deliveries, id)
    }

    // ----- transfers -----

    pub fn create_transfer(
        &self,
        header: TransferHeader,
        lines: Vec<TransferLine>,
        scheduled_date: Option<DateTime<Utc>>,
    ) -> StockResult<Transfer> {
        self.catalog.get_warehouse(header.from_warehouse_id)?;
        self.catalog.get_warehouse(header.to_warehouse_id)?;
        self.check_line_products(lines.iter().map(|l| l.product_id))?;
        self.create_doc(&self.transfers, header, lines, scheduled_date)
    }

    pub fn get_transfer(&self, id: DocumentId) -> StockResult<Transfer> {
        self.transfers.get(id)
    }

    /// Transfers touching the given warehouse on either end.
    pub fn list_transfers(
        &self,
        status: Option<DocumentStatus>,
        warehouse_id: Option<WarehouseId>,
    ) -> StockResult<Vec<Transfer>> {
        Ok(self
            .transfers
            .list()?
            .into_iter()
            .filter(|d| status.is_none_or(|s| d.status() == s))
            .filter(|d| {
                warehouse_id.is_none_or(|w| {
                    d.header().from_warehouse_id == w || d.header().to_warehouse_id == w
                })
            })
            .collect())
    }

    pub fn edit_transfer(
        &self,
        id: DocumentId,
        patch: DocumentPatch<TransferKind>,
    ) -> StockResult<Transfer> {
        self.edit_doc(&self.transfers, id, patch)
    }

    /// Validate a transfer: move each line's quantity out of the source and
    /// into the destination in one atomic batch.
    pub fn validate_transfer(
        &self,
        id: DocumentId,
        user_id: Option<UserId>,
    ) -> StockResult<Transfer> {
        self.validate_doc(&self.transfers, id, user_id)
    }

    pub fn cancel_transfer(&self, id: DocumentId) -> StockResult<Transfer> {
        self.cancel_doc(&self.transfers, id)
    }

    // ----- adjustments -----

    /// Create and validate a stock count in one step.
    ///
    /// The ledger snapshots previous quantities and forces the counted ones
    /// inside a single critical section, so the lines always describe exactly
    /// the change the move log recorded, even with deliveries racing the
    /// count. The adjustment lands as `done` with its moves committed, or not
    /// at all.
    pub fn create_adjustment(
        &self,
        warehouse_id: WarehouseId,
        reason: String,
        counts: &[(ProductId, f64)],
        user_id: Option<UserId>,
    ) -> StockResult<Adjustment> {
        self.catalog.get_warehouse(warehouse_id)?;
        self.check_line_products(counts.iter().map(|(p, _)| *p))?;
        let reason = if reason.trim().is_empty() {
            "Inventory Adjustment".to_string()
        } else {
            reason
        };
        let doc = self.adjustments.create_with(|id, reference| {
            let changes = self
                .ledger
                .apply_counts(warehouse_id, counts, &reference, user_id)?;
            let lines = changes
                .into_iter()
                .map(|c| AdjustmentLine {
                    product_id: c.product_id,
                    counted_qty: c.counted_qty,
                    previous_qty: c.previous_qty,
                    difference: c.difference,
                })
                .collect();
            let now = Utc::now();
            let mut doc = Adjustment::new(
                id,
                reference,
                AdjustmentHeader {
                    warehouse_id,
                    reason,
                },
                lines,
                None,
                now,
            );
            doc.complete_validation(now);
            Ok(doc)
        })?;
        tracing::info!(reference = doc.reference(), "adjustment recorded");
        Ok(doc)
    }

    pub fn get_adjustment(&self, id: DocumentId) -> StockResult<Adjustment> {
        self.adjustments.get(id)
    }

    pub fn list_adjustments(
        &self,
        warehouse_id: Option<WarehouseId>,
    ) -> StockResult<Vec<Adjustment>> {
        Ok(self
            .adjustments
            .list()?
            .into_iter()
            .filter(|d| warehouse_id.is_none_or(|w| d.header().warehouse_id == w))
            .collect())
    }

    // ----- move history -----

    /// Recent moves, newest first, joined with product and endpoint labels.
    /// `limit` defaults to 100.
    pub fn moves(
        &self,
        product_id: Option<ProductId>,
        limit: Option<usize>,
    ) -> StockResult<Vec<ResolvedMove>> {
        let raw = self.ledger.moves(product_id, Some(limit.unwrap_or(100)));
        raw.iter()
            .map(|m| {
                let (product_name, sku) = match self.catalog.get_product(m.product_id) {
                    Ok(p) => (p.name, p.sku),
                    Err(_) => (m.product_id.to_string(), String::new()),
                };
                let from = match m.from_warehouse {
                    Some(id) => self.endpoint_warehouse_label(id),
                    None => self.inbound_counterparty(m)?,
                };
                let to = match m.to_warehouse {
                    Some(id) => self.endpoint_warehouse_label(id),
                    None => self.outbound_counterparty(m)?,
                };
                Ok(ResolvedMove::from_parts(m, product_name, sku, from, to))
            })
            .collect()
    }

    fn endpoint_warehouse_label(&self, id: WarehouseId) -> String {
        self.catalog
            .warehouse_name(id)
            .unwrap_or_else(|| id.to_string())
    }

    fn inbound_counterparty(&self, m: &stockyard_ledger::StockMove) -> StockResult<String> {
        if m.move_type == MoveType::Receipt {
            if let Some(receipt) = self.receipts.find_by_reference(&m.reference)? {
                return Ok(receipt.header().vendor.clone());
            }
        }
        Ok(external_endpoint_label(m.move_type).to_string())
    }

    fn outbound_counterparty(&self, m: &stockyard_ledger::StockMove) -> StockResult<String> {
        if m.move_type == MoveType::Delivery {
            if let Some(delivery) = self.deliveries.find_by_reference(&m.reference)? {
                return Ok(delivery.header().delivery_address.clone());
            }
        }
        Ok(external_endpoint_label(m.move_type).to_string())
    }

    // ----- reporting -----

    /// Products with positive stock below their reorder threshold.
    pub fn low_stock(&self) -> StockResult<Vec<StockAlertRow>> {
        Ok(self
            .alert_rows()?
            .into_iter()
            .filter(|r| r.on_hand > 0.0 && r.on_hand < r.reorder_min)
            .collect())
    }

    /// Products with no stock anywhere.
    pub fn out_of_stock(&self) -> StockResult<Vec<StockAlertRow>> {
        Ok(self
            .alert_rows()?
            .into_iter()
            .filter(|r| r.on_hand <= 0.0)
            .collect())
    }

    pub fn dashboard(&self, now: DateTime<Utc>) -> StockResult<DashboardSummary> {
        let products = self.catalog.list_products()?;
        let total_stock_value = products
            .iter()
            .map(|p| self.ledger.total_on_hand(p.id) * p.cost)
            .sum();
        let receipts = document_counts(&self.receipts.list()?, now);
        let deliveries = document_counts(&self.deliveries.list()?, now);
        let transfers = document_counts(&self.transfers.list()?, now);

        Ok(DashboardSummary {
            total_products: products.len(),
            total_stock_value,
            low_stock_count: self.low_stock()?.len(),
            out_of_stock_count: self.out_of_stock()?.len(),
            receipts_to_receive: receipts.open,
            late_receipts: receipts.late,
            total_receipt_operations: receipts.total,
            deliveries_to_deliver: deliveries.open,
            late_deliveries: deliveries.late,
            total_delivery_operations: deliveries.total,
            pending_transfers: transfers.open,
        })
    }

    fn alert_rows(&self) -> StockResult<Vec<StockAlertRow>> {
        Ok(self
            .catalog
            .list_products()?
            .into_iter()
            .map(|p| StockAlertRow {
                on_hand: self.ledger.total_on_hand(p.id),
                product_id: p.id,
                sku: p.sku,
                name: p.name,
                reorder_min: p.reorder_min,
            })
            .collect())
    }

    // ----- generic document plumbing -----

    fn check_line_products(&self, ids: impl Iterator<Item = ProductId>) -> StockResult<()> {
        for id in ids {
            self.catalog.get_product(id)?;
        }
        Ok(())
    }

    fn create_doc<K: DocumentKind>(
        &self,
        store: &DocumentStore<K>,
        header: K::Header,
        lines: Vec<K::Line>,
        scheduled_date: Option<DateTime<Utc>>,
    ) -> StockResult<Document<K>> {
        let doc = store.create_with(|id, reference| {
            Ok(Document::new(
                id,
                reference,
                header,
                lines,
                scheduled_date,
                Utc::now(),
            ))
        })?;
        tracing::info!(reference = doc.reference(), kind = K::NAME, "document created");
        Ok(doc)
    }

    fn edit_doc<K: DocumentKind>(
        &self,
        store: &DocumentStore<K>,
        id: DocumentId,
        patch: DocumentPatch<K>,
    ) -> StockResult<Document<K>> {
        store.with_mut(id, |doc| {
            doc.edit(patch)?;
            Ok(doc.clone())
        })
    }

    /// Plan, commit, complete: the document plans its ledger entries against
    /// current stock, the ledger applies them atomically, and only then does
    /// the document become `done`. Runs under the document store's write
    /// lock, so two validators of the same document serialize and the loser
    /// gets `InvalidState`.
    fn validate_doc<K: DocumentKind>(
        &self,
        store: &DocumentStore<K>,
        id: DocumentId,
        user_id: Option<UserId>,
    ) -> StockResult<Document<K>> {
        store.with_mut(id, |doc| {
            let entries = doc.plan_validation(&self.ledger)?;
            self.ledger
                .apply_batch(&entries, K::MOVE_TYPE, doc.reference(), user_id)?;
            doc.complete_validation(Utc::now());
            tracing::info!(reference = doc.reference(), kind = K::NAME, "document validated");
            Ok(doc.clone())
        })
    }

    fn cancel_doc<K: DocumentKind>(
        &self,
        store: &DocumentStore<K>,
        id: DocumentId,
    ) -> StockResult<Document<K>> {
        store.with_mut(id, |doc| {
            doc.cancel()?;
            tracing::info!(reference = doc.reference(), kind = K::NAME, "document canceled");
            Ok(doc.clone())
        })
    }
}
