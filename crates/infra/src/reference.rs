//! Document reference formatting.
//!
//! References are human-facing identifiers like `WH/IN/0001`, unique per
//! document type. The sequence is the document's numeric id, assigned under
//! the store's write lock so concurrent creators can never collide.

/// Format a document reference: `"{prefix}/{sequence:04}"`.
///
/// The sequence is zero-padded to four digits and grows past the padding
/// without truncation.
pub fn format_reference(prefix: &str, sequence: u64) -> String {
    format!("{prefix}/{sequence:04}")
}
