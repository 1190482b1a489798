//! # Settings Repository
//!
//! Storage for the singleton integration settings record (row id = 1,
//! seeded by the initial migration).

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;
use ebarimt_core::{ConnectionStatus, Settings};

const SETTINGS_COLUMNS: &str = "enabled, environment, api_username, api_password, api_key, \
     merchant_tin, pos_no, district_code, branch_no, \
     auto_submit_on_invoice, auto_void_on_cancel, connection_status, \
     operator_name, operator_tin, left_lotteries, last_sync";

/// Repository for the settings singleton.
#[derive(Debug, Clone)]
pub struct SettingsRepository {
    pool: SqlitePool,
}

impl SettingsRepository {
    /// Creates a new SettingsRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SettingsRepository { pool }
    }

    /// Loads the settings record.
    pub async fn load(&self) -> DbResult<Settings> {
        let sql = format!("SELECT {SETTINGS_COLUMNS} FROM settings WHERE id = 1");
        let settings = sqlx::query_as::<_, Settings>(&sql)
            .fetch_one(&self.pool)
            .await?;
        Ok(settings)
    }

    /// Persists the full settings record.
    pub async fn save(&self, settings: &Settings) -> DbResult<()> {
        debug!("Saving integration settings");

        sqlx::query(
            "UPDATE settings SET \
                enabled = ?1, environment = ?2, api_username = ?3, \
                api_password = ?4, api_key = ?5, merchant_tin = ?6, \
                pos_no = ?7, district_code = ?8, branch_no = ?9, \
                auto_submit_on_invoice = ?10, auto_void_on_cancel = ?11, \
                connection_status = ?12, operator_name = ?13, \
                operator_tin = ?14, left_lotteries = ?15, last_sync = ?16 \
             WHERE id = 1",
        )
        .bind(settings.enabled)
        .bind(settings.environment)
        .bind(&settings.api_username)
        .bind(&settings.api_password)
        .bind(&settings.api_key)
        .bind(&settings.merchant_tin)
        .bind(&settings.pos_no)
        .bind(&settings.district_code)
        .bind(&settings.branch_no)
        .bind(settings.auto_submit_on_invoice)
        .bind(settings.auto_void_on_cancel)
        .bind(settings.connection_status)
        .bind(&settings.operator_name)
        .bind(&settings.operator_tin)
        .bind(settings.left_lotteries)
        .bind(settings.last_sync)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Records the outcome of a connection test.
    ///
    /// On a successful test the terminal metadata (operator, POS number,
    /// remaining lotteries) is refreshed along with the status.
    pub async fn record_connection(
        &self,
        status: ConnectionStatus,
        operator_name: Option<&str>,
        operator_tin: Option<&str>,
        pos_no: Option<&str>,
        left_lotteries: Option<i64>,
    ) -> DbResult<()> {
        debug!(?status, "Recording connection test result");

        sqlx::query(
            "UPDATE settings SET \
                connection_status = ?1, \
                operator_name = COALESCE(?2, operator_name), \
                operator_tin = COALESCE(?3, operator_tin), \
                pos_no = COALESCE(?4, pos_no), \
                left_lotteries = COALESCE(?5, left_lotteries), \
                last_sync = ?6 \
             WHERE id = 1",
        )
        .bind(status)
        .bind(operator_name)
        .bind(operator_tin)
        .bind(pos_no)
        .bind(left_lotteries)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

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
    use ebarimt_core::Environment;

    async fn repo() -> SettingsRepository {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        db.settings()
    }

    #[tokio::test]
    async fn test_defaults_after_migration() {
        let repo = repo().await;
        let settings = repo.load().await.unwrap();

        assert!(!settings.enabled);
        assert_eq!(settings.environment, Environment::Production);
        assert_eq!(settings.connection_status, ConnectionStatus::NotConfigured);
        assert!(settings.api_username.is_none());
    }

    #[tokio::test]
    async fn test_save_round_trip() {
        let repo = repo().await;
        let mut settings = repo.load().await.unwrap();
        settings.enabled = true;
        settings.environment = Environment::Staging;
        settings.api_username = Some("operator".to_string());
        settings.district_code = Some("3420".to_string());
        settings.auto_submit_on_invoice = true;

        repo.save(&settings).await.unwrap();

        let stored = repo.load().await.unwrap();
        assert!(stored.enabled);
        assert_eq!(stored.environment, Environment::Staging);
        assert_eq!(stored.district_code.as_deref(), Some("3420"));
        assert!(stored.auto_submit_on_invoice);
    }

    #[tokio::test]
    async fn test_record_connection_refreshes_terminal_metadata() {
        let repo = repo().await;
        repo.record_connection(
            ConnectionStatus::Connected,
            Some("Test Operator"),
            Some("77100012345"),
            Some("10012345"),
            Some(920),
        )
        .await
        .unwrap();

        let stored = repo.load().await.unwrap();
        assert_eq!(stored.connection_status, ConnectionStatus::Connected);
        assert_eq!(stored.operator_name.as_deref(), Some("Test Operator"));
        assert_eq!(stored.left_lotteries, 920);
        assert!(stored.last_sync.is_some());
    }

    #[tokio::test]
    async fn test_record_disconnection_keeps_metadata() {
        let repo = repo().await;
        repo.record_connection(
            ConnectionStatus::Connected,
            Some("Test Operator"),
            None,
            None,
            Some(920),
        )
        .await
        .unwrap();
        repo.record_connection(ConnectionStatus::Disconnected, None, None, None, None)
            .await
            .unwrap();

        let stored = repo.load().await.unwrap();
        assert_eq!(stored.connection_status, ConnectionStatus::Disconnected);
        assert_eq!(stored.operator_name.as_deref(), Some("Test Operator"));
    }
}
