use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use stockyard_core::{DocumentId, StockError, StockResult};
use stockyard_ledger::{LedgerEntry, MoveType, StockView};

use crate::status::{is_late, DocumentStatus};

/// Variant-specific policy for a document type.
///
/// The lifecycle (draft → ready → done / canceled) is identical across
/// variants; only the header shape, the line shape, and the ledger entries a
/// validation plans differ. Implementors are zero-sized marker types.
pub trait DocumentKind: Copy + Clone + core::fmt::Debug + PartialEq + Eq {
    type Header: Clone + core::fmt::Debug + PartialEq + Serialize + DeserializeOwned;
    type Line: Clone + core::fmt::Debug + PartialEq + Serialize + DeserializeOwned;

    /// Lowercase display name ("receipt", "delivery", ...).
    const NAME: &'static str;
    /// Reference prefix ("WH/IN", "WH/OUT", ...).
    const PREFIX: &'static str;
    /// Move type stamped on every ledger entry this document plans.
    const MOVE_TYPE: MoveType;
    /// Status a document must hold for `validate` to run.
    const VALIDATE_FROM: DocumentStatus;
    /// Whether the explicit draft → ready transition exists for this kind.
    const SUPPORTS_MARK_READY: bool;

    /// Decide which ledger entries validating this document would apply.
    ///
    /// Pure: reads current stock through the view, mutates nothing. Any
    /// violated invariant (over-demand, insufficient stock) aborts the whole
    /// plan, so validation is all-or-nothing per document.
    fn plan(
        header: &Self::Header,
        lines: &[Self::Line],
        stock: &dyn StockView,
    ) -> StockResult<Vec<LedgerEntry>>;
}

/// Partial update for a draft document. Lines are replaced wholesale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct DocumentPatch<K: DocumentKind> {
    pub header: Option<K::Header>,
    /// `Some(None)` clears the scheduled date; `None` leaves it untouched.
    pub scheduled_date: Option<Option<DateTime<Utc>>>,
    pub lines: Option<Vec<K::Line>>,
}

impl<K: DocumentKind> Default for DocumentPatch<K> {
    fn default() -> Self {
        Self {
            header: None,
            scheduled_date: None,
            lines: None,
        }
    }
}

/// A stock document: one transactional unit of warehouse work.
///
/// Lines are editable only while the document is draft; once validated the
/// lines are frozen and the ledger effects have already been committed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct Document<K: DocumentKind> {
    id: DocumentId,
    reference: String,
    header: K::Header,
    status: DocumentStatus,
    scheduled_date: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    validated_at: Option<DateTime<Utc>>,
    lines: Vec<K::Line>,
}

impl<K: DocumentKind> Document<K> {
    /// Create a new draft document. Reference assignment belongs to the store.
    pub fn new(
        id: DocumentId,
        reference: String,
        header: K::Header,
        lines: Vec<K::Line>,
        scheduled_date: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            reference,
            header,
            status: DocumentStatus::Draft,
            scheduled_date,
            created_at: now,
            validated_at: None,
            lines,
        }
    }

    pub fn id(&self) -> DocumentId {
        self.id
    }

    pub fn reference(&self) -> &str {
        &self.reference
    }

    pub fn header(&self) -> &K::Header {
        &self.header
    }

    pub fn status(&self) -> DocumentStatus {
        self.status
    }

    pub fn scheduled_date(&self) -> Option<DateTime<Utc>> {
        self.scheduled_date
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn validated_at(&self) -> Option<DateTime<Utc>> {
        self.validated_at
    }

    pub fn lines(&self) -> &[K::Line] {
        &self.lines
    }

    /// Derived late flag; see [`crate::status::is_late`].
    pub fn is_late(&self, now: DateTime<Utc>) -> bool {
        is_late(self.status, self.scheduled_date, now)
    }

    /// Apply a partial edit. Only draft documents are editable; edited lines
    /// replace the previous set wholesale.
    pub fn edit(&mut self, patch: DocumentPatch<K>) -> StockResult<()> {
        if self.status != DocumentStatus::Draft {
            return Err(StockError::invalid_state(format!(
                "can only edit draft {}s, status is {}",
                K::NAME,
                self.status
            )));
        }
        if let Some(header) = patch.header {
            self.header = header;
        }
        if let Some(scheduled_date) = patch.scheduled_date {
            self.scheduled_date = scheduled_date;
        }
        if let Some(lines) = patch.lines {
            self.lines = lines;
        }
        Ok(())
    }

    /// Explicit draft → ready transition (deliveries only).
    pub fn mark_ready(&mut self) -> StockResult<()> {
        if !K::SUPPORTS_MARK_READY {
            return Err(StockError::invalid_state(format!(
                "{}s do not support mark-ready",
                K::NAME
            )));
        }
        if self.status != DocumentStatus::Draft {
            return Err(StockError::invalid_state(format!(
                "can only mark draft {}s as ready, status is {}",
                K::NAME,
                self.status
            )));
        }
        self.status = DocumentStatus::Ready;
        Ok(())
    }

    /// Plan the ledger entries this document's validation would apply.
    ///
    /// Checks the lifecycle precondition first: validating from any status
    /// other than `K::VALIDATE_FROM` is refused, which also protects a `done`
    /// document from double-applying its stock effects.
    pub fn plan_validation(&self, stock: &dyn StockView) -> StockResult<Vec<LedgerEntry>> {
        if self.status != K::VALIDATE_FROM {
            return Err(StockError::invalid_state(format!(
                "{} must be {} to validate, status is {}",
                K::NAME,
                K::VALIDATE_FROM,
                self.status
            )));
        }
        K::plan(&self.header, &self.lines, stock)
    }

    /// Mark the document done after its planned entries committed.
    pub fn complete_validation(&mut self, now: DateTime<Utc>) {
        self.status = DocumentStatus::Done;
        self.validated_at = Some(now);
    }

    /// Cancel the document. Draft/ready documents never touched stock, so no
    /// ledger compensation is needed; done documents cannot be canceled.
    pub fn cancel(&mut self) -> StockResult<()> {
        if self.status == DocumentStatus::Done {
            return Err(StockError::invalid_state(format!(
                "cannot cancel a done {}",
                K::NAME
            )));
        }
        self.status = DocumentStatus::Canceled;
        Ok(())
    }
}
