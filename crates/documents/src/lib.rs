//! Document domain module: the draft→ready→done/canceled lifecycle shared by
//! receipts, deliveries, transfers, and adjustments.
//!
//! One generic [`Document`] state machine is parameterized by a
//! [`DocumentKind`] policy that supplies the variant-specific pieces: which
//! header fields exist, which status `validate` runs from, and which ledger
//! entries a validation plans. Documents never touch the ledger themselves;
//! they *plan* entries and the service layer applies them atomically.

pub mod adjustment;
pub mod delivery;
pub mod document;
pub mod receipt;
pub mod status;
pub mod transfer;

pub use adjustment::{Adjustment, AdjustmentHeader, AdjustmentKind, AdjustmentLine};
pub use delivery::{
    Availability, AvailabilityIssue, Delivery, DeliveryHeader, DeliveryKind, DeliveryLine,
};
pub use document::{Document, DocumentKind, DocumentPatch};
pub use receipt::{Receipt, ReceiptHeader, ReceiptKind, ReceiptLine};
pub use status::{is_late, DocumentStatus};
pub use transfer::{Transfer, TransferHeader, TransferKind, TransferLine};
