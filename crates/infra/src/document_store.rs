use std::collections::BTreeMap;
use std::sync::RwLock;

use stockyard_core::{DocumentId, StockError, StockResult};
use stockyard_documents::{Document, DocumentKind};

use crate::reference::format_reference;

/// In-memory store for one document type.
///
/// Ids are assigned sequentially under the write lock, and the reference is
/// derived from the id, so reference uniqueness per type holds under any
/// interleaving of concurrent creators.
#[derive(Debug)]
pub struct DocumentStore<K: DocumentKind> {
    state: RwLock<BTreeMap<DocumentId, Document<K>>>,
}

impl<K: DocumentKind> Default for DocumentStore<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: DocumentKind> DocumentStore<K> {
    pub fn new() -> Self {
        Self {
            state: RwLock::new(BTreeMap::new()),
        }
    }

    /// Create a document via a fallible builder.
    ///
    /// The builder receives the freshly assigned id and reference and runs
    /// inside the store's critical section; if it fails nothing is inserted
    /// and the id is reused by the next creator. Adjustments use this to
    /// plan-and-commit their ledger batch atomically with document creation.
    pub fn create_with(
        &self,
        build: impl FnOnce(DocumentId, String) -> StockResult<Document<K>>,
    ) -> StockResult<Document<K>> {
        let mut docs = self.write()?;
        let id = DocumentId(docs.keys().next_back().map_or(1, |last| last.value() + 1));
        let reference = format_reference(K::PREFIX, id.value());
        let doc = build(id, reference)?;
        docs.insert(id, doc.clone());
        Ok(doc)
    }

    pub fn get(&self, id: DocumentId) -> StockResult<Document<K>> {
        self.read()?.get(&id).cloned().ok_or(StockError::NotFound)
    }

    pub fn find_by_reference(&self, reference: &str) -> StockResult<Option<Document<K>>> {
        Ok(self
            .read()?
            .values()
            .find(|d| d.reference() == reference)
            .cloned())
    }

    /// All documents, newest first.
    pub fn list(&self) -> StockResult<Vec<Document<K>>> {
        let docs = self.read()?;
        let mut all: Vec<Document<K>> = docs.values().cloned().collect();
        all.sort_by(|a, b| b.created_at().cmp(&a.created_at()));
        Ok(all)
    }

    /// Run a mutation against one document inside the store's critical
    /// section. The closure's error leaves the document untouched only if the
    /// closure itself mutated nothing before failing; lifecycle methods on
    /// `Document` uphold that by checking preconditions first.
    pub fn with_mut<R>(
        &self,
        id: DocumentId,
        f: impl FnOnce(&mut Document<K>) -> StockResult<R>,
    ) -> StockResult<R> {
        let mut docs = self.write()?;
        let doc = docs.get_mut(&id).ok_or(StockError::NotFound)?;
        f(doc)
    }

    pub fn len(&self) -> usize {
        self.read().map(|d| d.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn read(
        &self,
    ) -> StockResult<std::sync::RwLockReadGuard<'_, BTreeMap<DocumentId, Document<K>>>> {
        self.state
            .read()
            .map_err(|_| StockError::storage("document store lock poisoned"))
    }

    fn write(
        &self,
    ) -> StockResult<std::sync::RwLockWriteGuard<'_, BTreeMap<DocumentId, Document<K>>>> {
        self.state
            .write()
            .map_err(|_| StockError::storage("document store lock poisoned"))
    }
}
