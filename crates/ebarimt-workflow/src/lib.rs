//! # ebarimt-workflow: Submission Orchestration
//!
//! The operations the host ERP invokes: submit a document for a VAT
//! receipt, void a receipt, retry failed submissions, test the
//! connection and sync fixtures. Every operation runs to completion
//! synchronously and records its outcome on the receipt log.
//!
//! ## Operation Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Submit Flow                                      │
//! │                                                                         │
//! │  submit(document)                                                      │
//! │       │                                                                 │
//! │       ├── 1. State check: active log Success/Pending? → StateError     │
//! │       │      (no log write, nothing sent)                              │
//! │       │                                                                 │
//! │       ├── 2. Build payload (pure) → ValidationError aborts             │
//! │       │                                                                 │
//! │       ├── 3. Open/reopen log as Pending                                │
//! │       │                                                                 │
//! │       └── 4. create_receipt                                            │
//! │              ├── Success  → log Success + receipt id + lottery + QR    │
//! │              ├── Rejected → log Failed + verbatim remote message       │
//! │              └── Transport→ log Failed + transport message             │
//! │                                                                         │
//! │  Rejections and transport failures are RECORDED outcomes: submit      │
//! │  returns the Failed log rather than an error, and retry picks the     │
//! │  document up later.                                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Concurrency Contract
//!
//! Different documents may be submitted concurrently; each touches only
//! its own log row. Concurrent submits of the SAME document must be
//! serialized by the caller (the host framework's document lock); the
//! partial unique index on the log table backstops that assumption.

// =============================================================================
// Module Declarations
// =============================================================================

pub mod connection;
pub mod document;
pub mod error;
pub mod hooks;
pub mod lookup;
pub mod retry;
pub mod submit;

// =============================================================================
// Re-exports
// =============================================================================

pub use connection::ConnectionReport;
pub use document::{DocumentLoadError, DocumentStore, InMemoryDocumentStore};
pub use error::{WorkflowError, WorkflowResult};
pub use hooks::{handle_document_event, DocumentEvent};
pub use retry::RetryReport;

use ebarimt_client::{ClientConfig, EbarimtClient};
use ebarimt_db::Database;

/// Orchestrates receipt submission against the tax authority.
///
/// Holds the database handle and the API client; all state lives in the
/// database, so the workflow itself is cheap to construct and may be
/// shared freely.
pub struct ReceiptWorkflow {
    client: EbarimtClient,
    db: Database,
}

impl ReceiptWorkflow {
    /// Creates a workflow from an existing client and database.
    pub fn new(client: EbarimtClient, db: Database) -> Self {
        ReceiptWorkflow { client, db }
    }

    /// Creates a workflow configured from the persisted settings record.
    pub async fn from_settings(db: Database) -> WorkflowResult<Self> {
        let settings = db.settings().load().await?;
        let config = ClientConfig::from_settings(&settings);
        let client = EbarimtClient::new(config)?;
        Ok(ReceiptWorkflow { client, db })
    }

    /// The underlying database handle.
    pub fn db(&self) -> &Database {
        &self.db
    }

    /// The underlying API client.
    pub fn client(&self) -> &EbarimtClient {
        &self.client
    }
}
