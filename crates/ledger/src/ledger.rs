use std::collections::HashMap;
use std::sync::RwLock;

use chrono::Utc;
use uuid::Uuid;

use stockyard_core::{ProductId, StockError, StockResult, UserId, WarehouseId};

use crate::move_log::{move_endpoints, MoveType, StockMove};
use crate::quant::{StockQuant, StockView};

/// One planned quantity change inside an atomic batch.
#[derive(Debug, Clone, PartialEq)]
pub struct LedgerEntry {
    pub product_id: ProductId,
    pub warehouse_id: WarehouseId,
    pub delta: f64,
    /// Force the quantity to this value after the delta lands. Used by
    /// inventory counts to absorb rounding drift.
    pub exact: Option<f64>,
}

impl LedgerEntry {
    pub fn delta(product_id: ProductId, warehouse_id: WarehouseId, delta: f64) -> Self {
        Self {
            product_id,
            warehouse_id,
            delta,
            exact: None,
        }
    }

    pub fn count(
        product_id: ProductId,
        warehouse_id: WarehouseId,
        delta: f64,
        counted: f64,
    ) -> Self {
        Self {
            product_id,
            warehouse_id,
            delta,
            exact: Some(counted),
        }
    }
}

/// Outcome of one counted product inside [`StockLedger::apply_counts`].
#[derive(Debug, Clone, PartialEq)]
pub struct CountChange {
    pub product_id: ProductId,
    pub counted_qty: f64,
    /// Quantity at the moment the count committed.
    pub previous_qty: f64,
    /// `counted_qty - previous_qty`; negative for shrinkage.
    pub difference: f64,
}

#[derive(Debug, Default)]
struct LedgerState {
    quants: HashMap<(ProductId, WarehouseId), f64>,
    moves: Vec<StockMove>,
}

/// The authoritative stock store.
///
/// Quantities live behind a single `RwLock`; every mutating operation is one
/// write-locked critical section that stages all new quantities, validates
/// them, and only then commits and appends moves. A failed batch leaves the
/// store exactly as it was, so callers may retry safely.
#[derive(Debug, Default)]
pub struct StockLedger {
    state: RwLock<LedgerState>,
}

impl StockLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply a single signed delta. See [`StockLedger::apply_batch`].
    pub fn apply_delta(
        &self,
        product_id: ProductId,
        warehouse_id: WarehouseId,
        delta: f64,
        move_type: MoveType,
        reference: &str,
        user_id: Option<UserId>,
    ) -> StockResult<f64> {
        let applied = self.apply_batch(
            &[LedgerEntry::delta(product_id, warehouse_id, delta)],
            move_type,
            reference,
            user_id,
        )?;
        Ok(applied[0])
    }

    /// Atomically apply a batch of quantity changes and record their moves.
    ///
    /// Either every entry commits or none does: all resulting quantities are
    /// computed and checked for non-negativity before the first one is
    /// written. Returns the new quantity produced by each entry, in order.
    /// One `StockMove` is appended per entry with a non-zero delta.
    pub fn apply_batch(
        &self,
        entries: &[LedgerEntry],
        move_type: MoveType,
        reference: &str,
        user_id: Option<UserId>,
    ) -> StockResult<Vec<f64>> {
        if entries.is_empty() {
            return Ok(Vec::new());
        }

        let mut state = self
            .state
            .write()
            .map_err(|_| StockError::storage("ledger lock poisoned"))?;

        // Stage first: later entries in the batch must see earlier ones
        // (a transfer may touch the same pair twice).
        let mut staged: HashMap<(ProductId, WarehouseId), f64> = HashMap::new();
        let mut applied = Vec::with_capacity(entries.len());
        for entry in entries {
            if !entry.delta.is_finite() {
                return Err(StockError::validation("delta must be a finite number"));
            }
            let key = (entry.product_id, entry.warehouse_id);
            let current = staged
                .get(&key)
                .copied()
                .unwrap_or_else(|| state.quants.get(&key).copied().unwrap_or(0.0));
            let mut next = current + entry.delta;
            if next < 0.0 {
                tracing::warn!(
                    product_id = %entry.product_id,
                    warehouse_id = %entry.warehouse_id,
                    current,
                    delta = entry.delta,
                    reference,
                    "negative stock prevented, batch aborted"
                );
                return Err(StockError::NegativeStock {
                    product_id: entry.product_id,
                    warehouse_id: entry.warehouse_id,
                });
            }
            if let Some(exact) = entry.exact {
                if !(exact.is_finite() && exact >= 0.0) {
                    return Err(StockError::validation(
                        "counted quantity must be a finite non-negative number",
                    ));
                }
                next = exact;
            }
            staged.insert(key, next);
            applied.push(next);
        }

        // Commit: write staged quantities and append the audit trail.
        let now = Utc::now();
        for entry in entries {
            let key = (entry.product_id, entry.warehouse_id);
            state.quants.insert(key, staged[&key]);
            if entry.delta != 0.0 {
                let (from_warehouse, to_warehouse) =
                    move_endpoints(entry.delta, entry.warehouse_id);
                state.moves.push(StockMove {
                    id: Uuid::now_v7(),
                    reference: reference.to_string(),
                    product_id: entry.product_id,
                    from_warehouse,
                    to_warehouse,
                    quantity: entry.delta.abs(),
                    move_type,
                    user_id,
                    recorded_at: now,
                });
            }
        }

        tracing::debug!(
            entries = entries.len(),
            move_type = %move_type,
            reference,
            "ledger batch committed"
        );
        Ok(applied)
    }

    /// Atomically force counted quantities for one warehouse.
    ///
    /// Snapshot, difference derivation, and commit all happen inside a
    /// single write-locked critical section, so the recorded
    /// `previous_qty`/`difference` always match the change the moves
    /// describe, no matter what other writers commit around the count.
    /// One adjustment move is appended per non-zero difference, endpoints
    /// derived from its sign.
    pub fn apply_counts(
        &self,
        warehouse_id: WarehouseId,
        counts: &[(ProductId, f64)],
        reference: &str,
        user_id: Option<UserId>,
    ) -> StockResult<Vec<CountChange>> {
        if counts.is_empty() {
            return Ok(Vec::new());
        }

        let mut state = self
            .state
            .write()
            .map_err(|_| StockError::storage("ledger lock poisoned"))?;

        // Stage first, as in apply_batch: a product counted twice sees the
        // earlier count as its previous quantity.
        let mut staged: HashMap<ProductId, f64> = HashMap::new();
        let mut changes = Vec::with_capacity(counts.len());
        for &(product_id, counted_qty) in counts {
            if !(counted_qty.is_finite() && counted_qty >= 0.0) {
                return Err(StockError::validation(
                    "counted quantity must be a finite non-negative number",
                ));
            }
            let previous_qty = staged.get(&product_id).copied().unwrap_or_else(|| {
                state
                    .quants
                    .get(&(product_id, warehouse_id))
                    .copied()
                    .unwrap_or(0.0)
            });
            staged.insert(product_id, counted_qty);
            changes.push(CountChange {
                product_id,
                counted_qty,
                previous_qty,
                difference: counted_qty - previous_qty,
            });
        }

        let now = Utc::now();
        for change in &changes {
            state
                .quants
                .insert((change.product_id, warehouse_id), change.counted_qty);
            if change.difference != 0.0 {
                let (from_warehouse, to_warehouse) =
                    move_endpoints(change.difference, warehouse_id);
                state.moves.push(StockMove {
                    id: Uuid::now_v7(),
                    reference: reference.to_string(),
                    product_id: change.product_id,
                    from_warehouse,
                    to_warehouse,
                    quantity: change.difference.abs(),
                    move_type: MoveType::Adjustment,
                    user_id,
                    recorded_at: now,
                });
            }
        }

        tracing::debug!(counts = changes.len(), reference, "inventory count committed");
        Ok(changes)
    }

    /// Total on-hand for a product across all warehouses.
    pub fn total_on_hand(&self, product_id: ProductId) -> f64 {
        self.state
            .read()
            .map(|s| {
                s.quants
                    .iter()
                    .filter(|((p, _), _)| *p == product_id)
                    .map(|(_, qty)| qty)
                    .sum()
            })
            .unwrap_or(0.0)
    }

    /// Per-warehouse breakdown for a product, ordered by warehouse id.
    pub fn by_warehouse(&self, product_id: ProductId) -> Vec<(WarehouseId, f64)> {
        let mut rows: Vec<(WarehouseId, f64)> = self
            .state
            .read()
            .map(|s| {
                s.quants
                    .iter()
                    .filter(|((p, _), _)| *p == product_id)
                    .map(|((_, w), qty)| (*w, *qty))
                    .collect()
            })
            .unwrap_or_default();
        rows.sort_by_key(|(w, _)| *w);
        rows
    }

    /// Every quant row currently held (including zero-quantity rows).
    pub fn quants(&self) -> Vec<StockQuant> {
        self.state
            .read()
            .map(|s| {
                s.quants
                    .iter()
                    .map(|((product_id, warehouse_id), quantity)| StockQuant {
                        product_id: *product_id,
                        warehouse_id: *warehouse_id,
                        quantity: *quantity,
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Whether any warehouse currently holds a positive quantity of the product.
    pub fn product_has_stock(&self, product_id: ProductId) -> bool {
        self.state
            .read()
            .map(|s| {
                s.quants
                    .iter()
                    .any(|((p, _), qty)| *p == product_id && *qty > 0.0)
            })
            .unwrap_or(false)
    }

    /// Whether the warehouse currently holds positive stock of any product.
    pub fn warehouse_has_stock(&self, warehouse_id: WarehouseId) -> bool {
        self.state
            .read()
            .map(|s| {
                s.quants
                    .iter()
                    .any(|((_, w), qty)| *w == warehouse_id && *qty > 0.0)
            })
            .unwrap_or(false)
    }

    /// Moves in reverse-chronological order, optionally filtered by product
    /// and capped at `limit`.
    pub fn moves(&self, product_id: Option<ProductId>, limit: Option<usize>) -> Vec<StockMove> {
        self.state
            .read()
            .map(|s| {
                s.moves
                    .iter()
                    .rev()
                    .filter(|m| product_id.is_none_or(|p| m.product_id == p))
                    .take(limit.unwrap_or(usize::MAX))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Total number of recorded moves.
    pub fn move_count(&self) -> usize {
        self.state.read().map(|s| s.moves.len()).unwrap_or(0)
    }
}

impl StockView for StockLedger {
    fn on_hand(&self, product_id: ProductId, warehouse_id: WarehouseId) -> f64 {
        self.state
            .read()
            .map(|s| {
                s.quants
                    .get(&(product_id, warehouse_id))
                    .copied()
                    .unwrap_or(0.0)
            })
            .unwrap_or(0.0)
    }
}
