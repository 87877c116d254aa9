use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Document lifecycle status. `Done` and `Canceled` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentStatus {
    Draft,
    Ready,
    Done,
    Canceled,
}

impl DocumentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentStatus::Draft => "draft",
            DocumentStatus::Ready => "ready",
            DocumentStatus::Done => "done",
            DocumentStatus::Canceled => "canceled",
        }
    }

    /// An open document has not reached a terminal state yet.
    pub fn is_open(&self) -> bool {
        matches!(self, DocumentStatus::Draft | DocumentStatus::Ready)
    }
}

impl core::fmt::Display for DocumentStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Late flag: a derived predicate, never stored state.
///
/// A document is late while it is still open and its scheduled date has
/// passed. Documents without a scheduled date are never late.
pub fn is_late(
    status: DocumentStatus,
    scheduled_date: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> bool {
    status.is_open() && scheduled_date.is_some_and(|d| d < now)
}
