//! # Lookup Passthroughs
//!
//! Read-only lookups the host UI calls (customer TIN verification,
//! barcode classification browsing, consumer search). Pure passthroughs
//! to the client; no local state is mutated.

use ebarimt_client::wire::{BarcodeNode, ConsumerInfo, TaxpayerInfo};
use ebarimt_client::ApiOutcome;

use crate::error::WorkflowResult;
use crate::ReceiptWorkflow;

impl ReceiptWorkflow {
    /// Taxpayer record by TIN.
    pub async fn lookup_taxpayer(&self, tin: &str) -> WorkflowResult<ApiOutcome<TaxpayerInfo>> {
        Ok(self.client().get_taxpayer_info(tin).await?)
    }

    /// Resolves a registration number to a TIN.
    pub async fn lookup_tin_by_regno(&self, reg_no: &str) -> WorkflowResult<ApiOutcome<String>> {
        Ok(self.client().get_tin_by_regno(reg_no).await?)
    }

    /// Walks one level of the BUNA barcode classification.
    pub async fn lookup_barcode(
        &self,
        levels: &[&str],
    ) -> WorkflowResult<ApiOutcome<Vec<BarcodeNode>>> {
        Ok(self.client().lookup_barcode(levels).await?)
    }

    /// Consumer lottery account by phone number.
    pub async fn lookup_consumer_by_phone(
        &self,
        phone: &str,
    ) -> WorkflowResult<ApiOutcome<ConsumerInfo>> {
        Ok(self.client().lookup_consumer_by_phone(phone).await?)
    }
}
