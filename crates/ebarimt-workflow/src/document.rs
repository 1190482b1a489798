//! # Document Store
//!
//! The seam between this workflow and the host ERP: retry needs to
//! reload the original invoice document to rebuild its payload, and the
//! host owns those documents. Implementations adapt whatever the host
//! framework is to the one `fetch` call the workflow needs.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Mutex;

use thiserror::Error;

use ebarimt_core::{DocumentRef, SourceDocument};

/// A source document could not be loaded from the host framework.
#[derive(Debug, Error)]
#[error("Could not load {reference}: {message}")]
pub struct DocumentLoadError {
    /// The document that was requested.
    pub reference: DocumentRef,
    /// Host-side failure description.
    pub message: String,
}

impl DocumentLoadError {
    pub fn new(reference: DocumentRef, message: impl Into<String>) -> Self {
        DocumentLoadError {
            reference,
            message: message.into(),
        }
    }
}

/// Loads source documents from the host framework.
pub trait DocumentStore: Send + Sync {
    /// Loads the document behind a reference.
    fn fetch(
        &self,
        reference: &DocumentRef,
    ) -> impl Future<Output = Result<SourceDocument, DocumentLoadError>> + Send;
}

/// In-memory document store.
///
/// Backs tests and tools that drive the workflow without a host
/// framework; documents are keyed by their reference.
#[derive(Debug, Default)]
pub struct InMemoryDocumentStore {
    documents: Mutex<HashMap<String, SourceDocument>>,
}

impl InMemoryDocumentStore {
    pub fn new() -> Self {
        InMemoryDocumentStore::default()
    }

    /// Adds or replaces a document.
    pub fn insert(&self, document: SourceDocument) {
        let key = document.reference.to_string();
        self.documents
            .lock()
            .expect("document store lock poisoned")
            .insert(key, document);
    }

    /// Removes a document, returning it if present.
    pub fn remove(&self, reference: &DocumentRef) -> Option<SourceDocument> {
        self.documents
            .lock()
            .expect("document store lock poisoned")
            .remove(&reference.to_string())
    }
}

impl DocumentStore for InMemoryDocumentStore {
    async fn fetch(&self, reference: &DocumentRef) -> Result<SourceDocument, DocumentLoadError> {
        self.documents
            .lock()
            .expect("document store lock poisoned")
            .get(&reference.to_string())
            .cloned()
            .ok_or_else(|| DocumentLoadError::new(reference.clone(), "document does not exist"))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn doc(name: &str) -> SourceDocument {
        SourceDocument {
            reference: DocumentRef::new("Sales Invoice", name),
            customer: "Walk-in".to_string(),
            customer_tin: None,
            customer_regno: None,
            consumer_regno: None,
            posting_date: NaiveDate::from_ymd_opt(2025, 3, 14).unwrap(),
            grand_total_mongo: 110_000_00,
            lines: vec![],
            payments: vec![],
        }
    }

    #[tokio::test]
    async fn test_fetch_round_trip() {
        let store = InMemoryDocumentStore::new();
        store.insert(doc("INV-001"));

        let loaded = store
            .fetch(&DocumentRef::new("Sales Invoice", "INV-001"))
            .await
            .unwrap();
        assert_eq!(loaded.customer, "Walk-in");
    }

    #[tokio::test]
    async fn test_missing_document_errors() {
        let store = InMemoryDocumentStore::new();
        let err = store
            .fetch(&DocumentRef::new("Sales Invoice", "NOPE"))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("Sales Invoice/NOPE"));
    }
}
