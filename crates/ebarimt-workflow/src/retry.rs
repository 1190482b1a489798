//! # Retry
//!
//! Re-submission of failed receipts, single or in bulk.
//!
//! Bulk retry is capped per invocation so a large backlog drains over
//! repeated runs instead of hammering the tax authority in one burst.
//! Each item is independent: one document's failure never aborts the
//! rest of the batch.

use serde::Serialize;
use tracing::{info, warn};

use ebarimt_core::{CoreError, ReceiptLog, ReceiptStatus};
use ebarimt_db::repository::receipt_log::FailedFilter;
use ebarimt_db::DbError;

use crate::document::DocumentStore;
use crate::error::{WorkflowError, WorkflowResult};
use crate::ReceiptWorkflow;

/// Maximum number of failed logs processed by one bulk retry call.
pub const RETRY_BATCH_LIMIT: i64 = 100;

/// Outcome of a bulk retry run.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct RetryReport {
    /// Failed logs picked up in this run.
    pub attempted: usize,
    /// Logs that transitioned to Success.
    pub succeeded: usize,
}

impl ReceiptWorkflow {
    /// Retries a single failed submission.
    ///
    /// Reloads the source document from the host and re-runs submit; the
    /// log keeps its identity, with `retry_count` incremented.
    pub async fn retry<S: DocumentStore>(
        &self,
        log_id: &str,
        store: &S,
    ) -> WorkflowResult<ReceiptLog> {
        let log = self
            .db()
            .receipt_logs()
            .get_by_id(log_id)
            .await?
            .ok_or_else(|| DbError::not_found("Receipt log", log_id))?;

        if log.status != ReceiptStatus::Failed {
            return Err(WorkflowError::State(CoreError::InvalidReceiptStatus {
                reference: log.reference().to_string(),
                current_status: log.status.to_string(),
                operation: "retry".to_string(),
            }));
        }

        let document = store.fetch(&log.reference()).await?;
        self.submit(&document).await
    }

    /// Retries every failed submission matching the filter, oldest first,
    /// up to [`RETRY_BATCH_LIMIT`] per invocation.
    ///
    /// Per-item failures are recorded on their own logs and counted, not
    /// propagated; only a failure to LIST the candidates is an error.
    pub async fn retry_all_failed<S: DocumentStore>(
        &self,
        filter: &FailedFilter,
        store: &S,
    ) -> WorkflowResult<RetryReport> {
        let failed = self
            .db()
            .receipt_logs()
            .list_failed(filter, RETRY_BATCH_LIMIT)
            .await?;

        let mut report = RetryReport::default();
        for log in failed {
            report.attempted += 1;
            match self.retry(&log.id, store).await {
                Ok(updated) if updated.status == ReceiptStatus::Success => {
                    report.succeeded += 1;
                }
                Ok(updated) => {
                    // Still Failed; its error message was refreshed.
                    info!(log_id = %updated.id, "Retry left receipt in Failed state");
                }
                Err(err) => {
                    warn!(log_id = %log.id, error = %err, "Retry skipped receipt");
                }
            }
        }

        info!(
            attempted = report.attempted,
            succeeded = report.succeeded,
            "Bulk retry complete"
        );
        Ok(report)
    }
}
