//! # Connection Test & Fixture Sync
//!
//! Operations behind the settings screen: verify the terminal is
//! reachable and pull reference data (tax codes, payment defaults).
//! None of these touch receipt state.

use serde::Serialize;
use tracing::{info, warn};

use ebarimt_client::wire::MerchantInfo;
use ebarimt_client::ApiOutcome;
use ebarimt_core::{ConnectionStatus, VatType};

use crate::error::{WorkflowError, WorkflowResult};
use crate::ReceiptWorkflow;

/// Result of a connection test, returned to the settings UI.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ConnectionReport {
    pub success: bool,
    pub operator_name: Option<String>,
    pub operator_tin: Option<String>,
    pub pos_no: Option<String>,
    pub left_lotteries: i64,
    pub merchants: Vec<MerchantInfo>,
    /// Failure description when `success` is false.
    pub message: Option<String>,
}

impl ReceiptWorkflow {
    /// Tests connectivity to the POS terminal API.
    ///
    /// A reachable terminal persists `Connected` plus the operator
    /// metadata it reported; any failure persists `Disconnected` while
    /// leaving previously stored metadata in place.
    pub async fn test_connection(&self) -> WorkflowResult<ConnectionReport> {
        match self.client().get_info().await {
            Ok(ApiOutcome::Success(pos)) => {
                info!(
                    pos_no = pos.pos_no.as_deref().unwrap_or("-"),
                    left_lotteries = pos.left_lotteries,
                    "Connection test succeeded"
                );
                self.db()
                    .settings()
                    .record_connection(
                        ConnectionStatus::Connected,
                        pos.operator_name.as_deref(),
                        pos.operator_tin.as_deref(),
                        pos.pos_no.as_deref(),
                        Some(pos.left_lotteries),
                    )
                    .await?;
                Ok(ConnectionReport {
                    success: true,
                    operator_name: pos.operator_name,
                    operator_tin: pos.operator_tin,
                    pos_no: pos.pos_no,
                    left_lotteries: pos.left_lotteries,
                    merchants: pos.merchants,
                    message: None,
                })
            }
            Ok(ApiOutcome::Rejected(rejection)) => {
                warn!(message = %rejection.message, "Connection test rejected");
                self.record_disconnected().await?;
                Ok(ConnectionReport {
                    message: Some(rejection.message),
                    ..Default::default()
                })
            }
            Err(transport) => {
                warn!(error = %transport, "Connection test failed");
                self.record_disconnected().await?;
                Ok(ConnectionReport {
                    message: Some(transport.to_string()),
                    ..Default::default()
                })
            }
        }
    }

    async fn record_disconnected(&self) -> WorkflowResult<()> {
        self.db()
            .settings()
            .record_connection(ConnectionStatus::Disconnected, None, None, None, None)
            .await?;
        Ok(())
    }

    /// Pulls the authority's zero-rate/exempt tax code list and applies
    /// it to the local product code table.
    ///
    /// Returns the number of codes applied. Idempotent: re-running with
    /// an unchanged remote list yields the same count and no new rows.
    pub async fn sync_tax_codes(&self) -> WorkflowResult<usize> {
        let entries = match self.client().get_tax_codes().await? {
            ApiOutcome::Success(entries) => entries,
            ApiOutcome::Rejected(rejection) => return Err(WorkflowError::Remote(rejection)),
        };

        let repo = self.db().product_codes();
        let mut applied = 0;
        for entry in entries {
            let Some(code) = entry.code.as_deref() else {
                continue;
            };
            let vat_type = match entry.tax_type.as_deref() {
                Some("VAT_ZERO") => VatType::Zero,
                Some("VAT_EXEMPT") => VatType::Exempt,
                other => {
                    warn!(code, tax_type = ?other, "Skipping unrecognized tax code entry");
                    continue;
                }
            };
            repo.set_vat_type(code, vat_type).await?;
            applied += 1;
        }

        info!(applied, "Tax code sync complete");
        Ok(applied)
    }

    /// Seeds the default ERP mode-of-payment mappings.
    ///
    /// Existing manual mappings are never overwritten; returns the number
    /// of mappings created.
    pub async fn seed_payment_types(&self) -> WorkflowResult<usize> {
        let seeded = self.db().payment_types().seed_defaults().await?;
        info!(seeded, "Payment type defaults seeded");
        Ok(seeded)
    }
}
