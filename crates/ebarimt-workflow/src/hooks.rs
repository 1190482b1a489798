//! # Document Event Hooks
//!
//! Automatic behavior driven by host-framework document events.
//!
//! The host dispatches an event when an invoice is submitted or
//! cancelled; depending on settings this triggers an automatic receipt
//! submission or void. Hook failures are logged as warnings and NEVER
//! propagated: a tax-receipt problem must not block the invoice itself.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Invoice submitted ──► Submitted event ──► auto_submit_on_invoice?     │
//! │                                               └── yes → submit()       │
//! │                                                                         │
//! │  Invoice cancelled ──► Cancelled event                                 │
//! │       ├── live log Success + auto_void_on_cancel → void()              │
//! │       └── live log Pending/Failed → mark Cancelled (close the log)     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use tracing::{info, warn};

use ebarimt_core::{DocumentRef, ReceiptStatus};

use crate::document::DocumentStore;
use crate::ReceiptWorkflow;

/// Host-framework document lifecycle events the integration reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentEvent {
    /// The source document was submitted (finalized) in the host.
    Submitted,
    /// The source document was cancelled in the host.
    Cancelled,
}

/// Reacts to a document event according to the persisted settings.
///
/// Never returns an error: every failure path is logged and swallowed so
/// the host document operation always completes.
pub async fn handle_document_event<S: DocumentStore>(
    workflow: &ReceiptWorkflow,
    store: &S,
    event: DocumentEvent,
    reference: &DocumentRef,
) {
    match event {
        DocumentEvent::Submitted => on_submitted(workflow, store, reference).await,
        DocumentEvent::Cancelled => on_cancelled(workflow, reference).await,
    }
}

async fn on_submitted<S: DocumentStore>(
    workflow: &ReceiptWorkflow,
    store: &S,
    reference: &DocumentRef,
) {
    let settings = match workflow.db().settings().load().await {
        Ok(settings) => settings,
        Err(err) => {
            warn!(document = %reference, error = %err, "Could not load settings for hook");
            return;
        }
    };
    if !settings.enabled || !settings.auto_submit_on_invoice {
        return;
    }

    let document = match store.fetch(reference).await {
        Ok(document) => document,
        Err(err) => {
            warn!(document = %reference, error = %err, "Auto-submit could not load document");
            return;
        }
    };

    match workflow.submit(&document).await {
        Ok(log) => info!(document = %reference, status = %log.status, "Auto-submit recorded"),
        Err(err) => warn!(document = %reference, error = %err, "Auto-submit failed"),
    }
}

async fn on_cancelled(workflow: &ReceiptWorkflow, reference: &DocumentRef) {
    let log = match workflow
        .db()
        .receipt_logs()
        .find_active(&reference.doctype, &reference.name)
        .await
    {
        Ok(Some(log)) => log,
        Ok(None) => return,
        Err(err) => {
            warn!(document = %reference, error = %err, "Could not look up log for cancel hook");
            return;
        }
    };

    match log.status {
        ReceiptStatus::Success => {
            let settings = match workflow.db().settings().load().await {
                Ok(settings) => settings,
                Err(err) => {
                    warn!(document = %reference, error = %err, "Could not load settings for hook");
                    return;
                }
            };
            if !settings.auto_void_on_cancel {
                warn!(
                    document = %reference,
                    "Document cancelled but its receipt stays live (auto-void disabled)"
                );
                return;
            }
            match workflow.void(&log.id).await {
                Ok(_) => info!(document = %reference, "Auto-void complete"),
                Err(err) => warn!(document = %reference, error = %err, "Auto-void failed"),
            }
        }
        ReceiptStatus::Pending | ReceiptStatus::Failed => {
            if let Err(err) = workflow.db().receipt_logs().mark_cancelled(&log.id).await {
                warn!(document = %reference, error = %err, "Could not close log on cancel");
            }
        }
        ReceiptStatus::Voided | ReceiptStatus::Cancelled => {}
    }
}
