//! Stock ledger: the authoritative on-hand quantity per (product, warehouse)
//! pair, plus the append-only move log recording every change.
//!
//! The ledger guarantees that no quantity is ever observably negative between
//! two committed operations, and that every committed change leaves exactly
//! one `StockMove`.

pub mod ledger;
pub mod move_log;
pub mod quant;

pub use ledger::{CountChange, LedgerEntry, StockLedger};
pub use move_log::{move_endpoints, MoveType, StockMove};
pub use quant::{StockQuant, StockView};
