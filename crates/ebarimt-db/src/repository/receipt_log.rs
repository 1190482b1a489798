//! # Receipt Log Repository
//!
//! Database operations for receipt submission logs.
//!
//! ## Log Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Receipt Log Lifecycle                               │
//! │                                                                         │
//! │  1. SUBMIT STARTS                                                      │
//! │     └── create_pending() → ReceiptLog { status: Pending }              │
//! │                                                                         │
//! │  2. OUTCOME RECORDED                                                   │
//! │     ├── mark_success() → Success + receipt id + lottery + QR           │
//! │     └── mark_failed()  → Failed + error message                        │
//! │                                                                         │
//! │  3. RETRY (from Failed only)                                           │
//! │     └── mark_pending_for_retry() → Pending, retry_count + 1            │
//! │                                                                         │
//! │  4. VOID (from Success only)                                           │
//! │     └── mark_voided() → Voided (terminal)                              │
//! │                                                                         │
//! │  Every transition is guarded in SQL (WHERE status = ...); a guard      │
//! │  that matches no row surfaces as DbError::StateConflict.               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use ebarimt_core::{BillType, Environment, ReceiptLog, ReceiptStatus};

/// Columns selected for every `ReceiptLog` read.
const LOG_COLUMNS: &str = "id, doctype, docname, bill_type, status, environment, \
     receipt_id, lottery_number, qr_data, error_message, \
     total_amount_mongo, vat_amount_mongo, city_tax_mongo, customer_tin, \
     retry_count, last_retry, created_at, updated_at";

/// Optional scoping for the failed-log listing used by bulk retry.
#[derive(Debug, Clone, Default)]
pub struct FailedFilter {
    /// Only logs created at or after this instant.
    pub from: Option<DateTime<Utc>>,
    /// Only logs created at or before this instant.
    pub to: Option<DateTime<Utc>>,
    /// Only logs for this customer TIN.
    pub customer_tin: Option<String>,
}

/// Repository for receipt log database operations.
#[derive(Debug, Clone)]
pub struct ReceiptLogRepository {
    pool: SqlitePool,
}

impl ReceiptLogRepository {
    /// Creates a new ReceiptLogRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ReceiptLogRepository { pool }
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// Gets a log by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<ReceiptLog>> {
        let sql = format!("SELECT {LOG_COLUMNS} FROM receipt_logs WHERE id = ?1");
        let log = sqlx::query_as::<_, ReceiptLog>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(log)
    }

    /// The live (non-Voided, non-Cancelled) log for a document, if any.
    ///
    /// The partial unique index on (doctype, docname) guarantees at most
    /// one such row exists.
    pub async fn find_active(&self, doctype: &str, docname: &str) -> DbResult<Option<ReceiptLog>> {
        let sql = format!(
            "SELECT {LOG_COLUMNS} FROM receipt_logs \
             WHERE doctype = ?1 AND docname = ?2 \
               AND status IN ('Pending', 'Success', 'Failed')"
        );
        let log = sqlx::query_as::<_, ReceiptLog>(&sql)
            .bind(doctype)
            .bind(docname)
            .fetch_optional(&self.pool)
            .await?;
        Ok(log)
    }

    /// Failed logs matching the filter, oldest first.
    pub async fn list_failed(&self, filter: &FailedFilter, limit: i64) -> DbResult<Vec<ReceiptLog>> {
        let sql = format!(
            "SELECT {LOG_COLUMNS} FROM receipt_logs \
             WHERE status = 'Failed' \
               AND (?1 IS NULL OR created_at >= ?1) \
               AND (?2 IS NULL OR created_at <= ?2) \
               AND (?3 IS NULL OR customer_tin = ?3) \
             ORDER BY created_at ASC \
             LIMIT ?4"
        );
        let logs = sqlx::query_as::<_, ReceiptLog>(&sql)
            .bind(filter.from)
            .bind(filter.to)
            .bind(filter.customer_tin.as_deref())
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;
        Ok(logs)
    }

    /// Number of logs in the given status.
    pub async fn count_by_status(&self, status: ReceiptStatus) -> DbResult<i64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM receipt_logs WHERE status = ?1")
                .bind(status)
                .fetch_one(&self.pool)
                .await?;
        Ok(count)
    }

    /// Sum of issued receipt amounts in möngö, for the stats screen.
    pub async fn success_amount_total(&self) -> DbResult<i64> {
        let total: i64 = sqlx::query_scalar(
            "SELECT COALESCE(SUM(total_amount_mongo), 0) FROM receipt_logs WHERE status = 'Success'",
        )
        .fetch_one(&self.pool)
        .await?;
        Ok(total)
    }

    // =========================================================================
    // Writes
    // =========================================================================

    /// Creates a Pending log for a submission attempt.
    ///
    /// Fails with [`DbError::UniqueViolation`] if the document already has
    /// a live log; callers are expected to check eligibility first.
    #[allow(clippy::too_many_arguments)]
    pub async fn create_pending(
        &self,
        doctype: &str,
        docname: &str,
        bill_type: BillType,
        environment: Environment,
        total_amount_mongo: i64,
        vat_amount_mongo: i64,
        city_tax_mongo: i64,
        customer_tin: Option<&str>,
    ) -> DbResult<ReceiptLog> {
        let now = Utc::now();
        let log = ReceiptLog {
            id: Uuid::new_v4().to_string(),
            doctype: doctype.to_string(),
            docname: docname.to_string(),
            bill_type,
            status: ReceiptStatus::Pending,
            environment,
            receipt_id: None,
            lottery_number: None,
            qr_data: None,
            error_message: None,
            total_amount_mongo,
            vat_amount_mongo,
            city_tax_mongo,
            customer_tin: customer_tin.map(str::to_string),
            retry_count: 0,
            last_retry: None,
            created_at: now,
            updated_at: now,
        };

        debug!(id = %log.id, document = %log.reference(), "Creating pending receipt log");

        sqlx::query(
            "INSERT INTO receipt_logs ( \
                id, doctype, docname, bill_type, status, environment, \
                receipt_id, lottery_number, qr_data, error_message, \
                total_amount_mongo, vat_amount_mongo, city_tax_mongo, customer_tin, \
                retry_count, last_retry, created_at, updated_at \
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18)",
        )
        .bind(&log.id)
        .bind(&log.doctype)
        .bind(&log.docname)
        .bind(log.bill_type)
        .bind(log.status)
        .bind(log.environment)
        .bind(&log.receipt_id)
        .bind(&log.lottery_number)
        .bind(&log.qr_data)
        .bind(&log.error_message)
        .bind(log.total_amount_mongo)
        .bind(log.vat_amount_mongo)
        .bind(log.city_tax_mongo)
        .bind(&log.customer_tin)
        .bind(log.retry_count)
        .bind(log.last_retry)
        .bind(log.created_at)
        .bind(log.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(log)
    }

    /// Records a successful submission. Guarded: the log must be Pending.
    pub async fn mark_success(
        &self,
        id: &str,
        receipt_id: &str,
        lottery_number: Option<&str>,
        qr_data: Option<&str>,
    ) -> DbResult<()> {
        debug!(id, receipt_id, "Marking receipt log Success");

        let result = sqlx::query(
            "UPDATE receipt_logs \
             SET status = 'Success', receipt_id = ?2, lottery_number = ?3, \
                 qr_data = ?4, error_message = NULL, updated_at = ?5 \
             WHERE id = ?1 AND status = 'Pending'",
        )
        .bind(id)
        .bind(receipt_id)
        .bind(lottery_number)
        .bind(qr_data)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::state_conflict(id, "Pending"));
        }
        Ok(())
    }

    /// Records a failed submission. Guarded: the log must be Pending.
    ///
    /// An empty message is replaced so a Failed log always carries one.
    pub async fn mark_failed(&self, id: &str, error_message: &str) -> DbResult<()> {
        let message = if error_message.trim().is_empty() {
            "submission failed (no error message from remote)"
        } else {
            error_message
        };

        debug!(id, error = message, "Marking receipt log Failed");

        let result = sqlx::query(
            "UPDATE receipt_logs \
             SET status = 'Failed', error_message = ?2, \
                 receipt_id = NULL, lottery_number = NULL, qr_data = NULL, \
                 updated_at = ?3 \
             WHERE id = ?1 AND status = 'Pending'",
        )
        .bind(id)
        .bind(message)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::state_conflict(id, "Pending"));
        }
        Ok(())
    }

    /// Re-opens a Failed log for another attempt. Guarded: Failed only.
    pub async fn mark_pending_for_retry(&self, id: &str) -> DbResult<()> {
        debug!(id, "Re-opening receipt log for retry");

        let result = sqlx::query(
            "UPDATE receipt_logs \
             SET status = 'Pending', retry_count = retry_count + 1, \
                 last_retry = ?2, updated_at = ?2 \
             WHERE id = ?1 AND status = 'Failed'",
        )
        .bind(id)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::state_conflict(id, "Failed"));
        }
        Ok(())
    }

    /// Marks a successful receipt as voided. Guarded: Success only.
    pub async fn mark_voided(&self, id: &str) -> DbResult<()> {
        debug!(id, "Marking receipt log Voided");

        let result = sqlx::query(
            "UPDATE receipt_logs \
             SET status = 'Voided', updated_at = ?2 \
             WHERE id = ?1 AND status = 'Success'",
        )
        .bind(id)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::state_conflict(id, "Success"));
        }
        Ok(())
    }

    /// Closes a log whose source document was cancelled before a receipt
    /// was issued. Guarded: Pending or Failed.
    pub async fn mark_cancelled(&self, id: &str) -> DbResult<()> {
        debug!(id, "Marking receipt log Cancelled");

        let result = sqlx::query(
            "UPDATE receipt_logs \
             SET status = 'Cancelled', updated_at = ?2 \
             WHERE id = ?1 AND status IN ('Pending', 'Failed')",
        )
        .bind(id)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::state_conflict(id, "Pending or Failed"));
        }
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};

    async fn repo() -> ReceiptLogRepository {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        db.receipt_logs()
    }

    async fn pending(repo: &ReceiptLogRepository, docname: &str) -> ReceiptLog {
        repo.create_pending(
            "Sales Invoice",
            docname,
            BillType::B2cReceipt,
            Environment::Staging,
            110_000_00,
            10_000_00,
            0,
            None,
        )
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn test_pending_then_success() {
        let repo = repo().await;
        let log = pending(&repo, "INV-001").await;

        repo.mark_success(&log.id, "330000012345", Some("AB123456"), Some("qr"))
            .await
            .unwrap();

        let stored = repo.get_by_id(&log.id).await.unwrap().unwrap();
        assert_eq!(stored.status, ReceiptStatus::Success);
        assert_eq!(stored.receipt_id.as_deref(), Some("330000012345"));
        assert!(stored.invariants_hold());
    }

    #[tokio::test]
    async fn test_success_twice_is_a_state_conflict() {
        let repo = repo().await;
        let log = pending(&repo, "INV-002").await;

        repo.mark_success(&log.id, "330000012345", None, None)
            .await
            .unwrap();
        let err = repo
            .mark_success(&log.id, "330000099999", None, None)
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::StateConflict { .. }));

        // The first receipt id survives the stale second call.
        let stored = repo.get_by_id(&log.id).await.unwrap().unwrap();
        assert_eq!(stored.receipt_id.as_deref(), Some("330000012345"));
    }

    #[tokio::test]
    async fn test_success_amount_total_ignores_other_statuses() {
        let repo = repo().await;
        let a = pending(&repo, "INV-101").await;
        repo.mark_success(&a.id, "330000012345", None, None)
            .await
            .unwrap();
        let b = pending(&repo, "INV-102").await;
        repo.mark_failed(&b.id, "rejected").await.unwrap();

        assert_eq!(repo.success_amount_total().await.unwrap(), 110_000_00);
        assert_eq!(repo.count_by_status(ReceiptStatus::Failed).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_failed_always_carries_a_message() {
        let repo = repo().await;
        let log = pending(&repo, "INV-003").await;

        repo.mark_failed(&log.id, "   ").await.unwrap();

        let stored = repo.get_by_id(&log.id).await.unwrap().unwrap();
        assert_eq!(stored.status, ReceiptStatus::Failed);
        assert!(!stored.error_message.unwrap().trim().is_empty());
    }

    #[tokio::test]
    async fn test_void_requires_success() {
        let repo = repo().await;
        let log = pending(&repo, "INV-004").await;
        repo.mark_failed(&log.id, "TIN not found").await.unwrap();

        let err = repo.mark_voided(&log.id).await.unwrap_err();
        assert!(matches!(err, DbError::StateConflict { .. }));

        let stored = repo.get_by_id(&log.id).await.unwrap().unwrap();
        assert_eq!(stored.status, ReceiptStatus::Failed);
    }

    #[tokio::test]
    async fn test_retry_reopens_and_counts() {
        let repo = repo().await;
        let log = pending(&repo, "INV-005").await;
        repo.mark_failed(&log.id, "timeout").await.unwrap();

        repo.mark_pending_for_retry(&log.id).await.unwrap();

        let stored = repo.get_by_id(&log.id).await.unwrap().unwrap();
        assert_eq!(stored.status, ReceiptStatus::Pending);
        assert_eq!(stored.retry_count, 1);
        assert!(stored.last_retry.is_some());
    }

    #[tokio::test]
    async fn test_one_live_log_per_document() {
        let repo = repo().await;
        pending(&repo, "INV-006").await;

        let err = repo
            .create_pending(
                "Sales Invoice",
                "INV-006",
                BillType::B2cReceipt,
                Environment::Staging,
                0,
                0,
                0,
                None,
            )
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::UniqueViolation { .. }));
    }

    #[tokio::test]
    async fn test_voided_log_frees_the_document() {
        let repo = repo().await;
        let log = pending(&repo, "INV-007").await;
        repo.mark_success(&log.id, "330000012345", None, None)
            .await
            .unwrap();
        repo.mark_voided(&log.id).await.unwrap();

        assert!(repo
            .find_active("Sales Invoice", "INV-007")
            .await
            .unwrap()
            .is_none());

        // A fresh submission may now open a new log.
        pending(&repo, "INV-007").await;
    }

    #[tokio::test]
    async fn test_list_failed_is_oldest_first() {
        let repo = repo().await;
        for name in ["INV-A", "INV-B", "INV-C"] {
            let log = pending(&repo, name).await;
            repo.mark_failed(&log.id, "remote down").await.unwrap();
        }

        let failed = repo.list_failed(&FailedFilter::default(), 100).await.unwrap();
        assert_eq!(failed.len(), 3);
        assert!(failed.windows(2).all(|w| w[0].created_at <= w[1].created_at));
    }

    #[tokio::test]
    async fn test_list_failed_filters_by_tin() {
        let repo = repo().await;
        let a = repo
            .create_pending(
                "Sales Invoice",
                "INV-TIN",
                BillType::B2bReceipt,
                Environment::Staging,
                0,
                0,
                0,
                Some("77100012345"),
            )
            .await
            .unwrap();
        repo.mark_failed(&a.id, "rejected").await.unwrap();
        let b = pending(&repo, "INV-NOTIN").await;
        repo.mark_failed(&b.id, "rejected").await.unwrap();

        let filter = FailedFilter {
            customer_tin: Some("77100012345".to_string()),
            ..Default::default()
        };
        let failed = repo.list_failed(&filter, 100).await.unwrap();
        assert_eq!(failed.len(), 1);
        assert_eq!(failed[0].docname, "INV-TIN");
    }
}
