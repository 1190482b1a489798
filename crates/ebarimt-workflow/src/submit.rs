//! # Submit & Void
//!
//! The two receipt-issuing operations.
//!
//! ## State Machine
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   (no log) ──submit──► Pending ──┬──► Success ──void──► Voided         │
//! │                          ▲       │                      (terminal)     │
//! │                          │       └──► Failed                           │
//! │                          │              │                              │
//! │                          └────retry─────┘                              │
//! │                                                                         │
//! │   Submit over Success or Pending → StateError, log untouched.          │
//! │   Void from anything but Success → StateError, log untouched.          │
//! │   B2B receipts are never voided here; the authority requires a         │
//! │   return invoice for B2B corrections.                                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use tracing::{info, warn};

use ebarimt_client::ApiOutcome;
use ebarimt_core::payload::build_receipt_payload;
use ebarimt_core::{BillType, CoreError, ReceiptLog, ReceiptStatus, SourceDocument, ValidationError};
use ebarimt_db::DbError;

use crate::error::{WorkflowError, WorkflowResult};
use crate::ReceiptWorkflow;

impl ReceiptWorkflow {
    /// Submits a document for a VAT receipt.
    ///
    /// Returns the updated log in every attempted case: `Success` when
    /// the authority issued a receipt, `Failed` (with the verbatim remote
    /// message or a transport message) when it did not. Errors are
    /// returned only when nothing was attempted: a state conflict, a
    /// validation failure or a local persistence problem.
    pub async fn submit(&self, document: &SourceDocument) -> WorkflowResult<ReceiptLog> {
        let reference = &document.reference;
        let settings = self.db().settings().load().await?;

        if !settings.enabled {
            return Err(WorkflowError::Validation(ValidationError::Required {
                field: "eBarimt Settings: enabled".to_string(),
            }));
        }

        // State check before anything is built or sent.
        let existing = self
            .db()
            .receipt_logs()
            .find_active(&reference.doctype, &reference.name)
            .await?;
        if let Some(log) = &existing {
            if !log.status.eligible_for_submit() {
                return Err(WorkflowError::State(CoreError::InvalidReceiptStatus {
                    reference: reference.to_string(),
                    current_status: log.status.to_string(),
                    operation: "submit".to_string(),
                }));
            }
        }

        // Build the payload before touching the log; a validation failure
        // must leave no trace.
        let codes: Vec<String> = document
            .lines
            .iter()
            .filter_map(|line| line.classification_code.clone())
            .collect();
        let product_codes = self.db().product_codes().get_many(&codes).await?;
        let payment_types = self.db().payment_types().load_map().await?;
        let payload =
            build_receipt_payload(document, &settings, &product_codes, &payment_types)?;

        // Open a fresh log, or reopen the Failed one.
        let log_id = match existing {
            Some(log) => {
                self.db()
                    .receipt_logs()
                    .mark_pending_for_retry(&log.id)
                    .await?;
                log.id
            }
            None => {
                self.db()
                    .receipt_logs()
                    .create_pending(
                        &reference.doctype,
                        &reference.name,
                        document.bill_type(),
                        settings.environment,
                        payload.amount.mongo(),
                        payload.vat.mongo(),
                        payload.city_tax.mongo(),
                        document.customer_tin.as_deref(),
                    )
                    .await?
                    .id
            }
        };

        info!(document = %reference, log_id, "Submitting receipt");

        match self.client().create_receipt(&payload).await {
            Ok(ApiOutcome::Success(receipt)) => match receipt.receipt_id() {
                Some(receipt_id) => {
                    info!(document = %reference, receipt_id, "Receipt issued");
                    self.db()
                        .receipt_logs()
                        .mark_success(
                            &log_id,
                            receipt_id,
                            receipt.lottery.as_deref(),
                            receipt.qr_data.as_deref(),
                        )
                        .await?;
                }
                None => {
                    warn!(document = %reference, "Remote accepted but sent no receipt id");
                    self.db()
                        .receipt_logs()
                        .mark_failed(&log_id, "remote response carried no receipt id")
                        .await?;
                }
            },
            Ok(ApiOutcome::Rejected(rejection)) => {
                warn!(document = %reference, message = %rejection.message, "Receipt rejected");
                self.db()
                    .receipt_logs()
                    .mark_failed(&log_id, &rejection.message)
                    .await?;
            }
            Err(transport) => {
                warn!(document = %reference, error = %transport, "Receipt submission failed");
                self.db()
                    .receipt_logs()
                    .mark_failed(&log_id, &transport.to_string())
                    .await?;
            }
        }

        let log = self
            .db()
            .receipt_logs()
            .get_by_id(&log_id)
            .await?
            .ok_or_else(|| DbError::not_found("Receipt log", &log_id))?;
        Ok(log)
    }

    /// Voids a successful receipt.
    ///
    /// Only B2C receipts in `Success` may be voided; a remote refusal or
    /// transport failure leaves the log unchanged and is surfaced as an
    /// error (void is never retried automatically).
    pub async fn void(&self, log_id: &str) -> WorkflowResult<ReceiptLog> {
        let log = self
            .db()
            .receipt_logs()
            .get_by_id(log_id)
            .await?
            .ok_or_else(|| DbError::not_found("Receipt log", log_id))?;

        if log.status != ReceiptStatus::Success {
            return Err(WorkflowError::State(CoreError::InvalidReceiptStatus {
                reference: log.reference().to_string(),
                current_status: log.status.to_string(),
                operation: "void".to_string(),
            }));
        }
        if log.bill_type == BillType::B2bReceipt {
            return Err(WorkflowError::State(CoreError::B2bVoidNotAllowed {
                reference: log.reference().to_string(),
            }));
        }

        let receipt_id = log
            .receipt_id
            .as_deref()
            .ok_or_else(|| DbError::Internal(format!("Success log {log_id} has no receipt id")))?;
        let receipt_date = log.updated_at.format("%Y-%m-%d %H:%M:%S").to_string();

        info!(log_id, receipt_id, "Voiding receipt");

        match self.client().delete_receipt(receipt_id, &receipt_date).await? {
            ApiOutcome::Success(()) => {
                self.db().receipt_logs().mark_voided(log_id).await?;
            }
            ApiOutcome::Rejected(rejection) => {
                warn!(log_id, message = %rejection.message, "Void rejected");
                return Err(WorkflowError::Remote(rejection));
            }
        }

        let updated = self
            .db()
            .receipt_logs()
            .get_by_id(log_id)
            .await?
            .ok_or_else(|| DbError::not_found("Receipt log", log_id))?;
        Ok(updated)
    }
}
