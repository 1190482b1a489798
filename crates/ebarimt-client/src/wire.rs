//! # Wire Types
//!
//! Request/response shapes as the eBarimt services define them.
//!
//! Field names and types are preserved exactly as received/sent
//! (camelCase on the wire); the only interpretation this crate performs
//! is status-indicator parsing, which lives in [`crate::client`].

use serde::{Deserialize, Serialize};

// =============================================================================
// Public API Envelope
// =============================================================================

/// Standard envelope used by the public and ITC service APIs.
///
/// `status == 200` marks success; anything else is a remote rejection
/// whose `message`/`msg` is surfaced verbatim.
#[derive(Debug, Clone, Deserialize)]
pub struct Envelope<T> {
    pub status: i64,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub msg: Option<String>,
    #[serde(default = "none_data")]
    pub data: Option<T>,
}

fn none_data<T>() -> Option<T> {
    None
}

impl<T> Envelope<T> {
    /// Remote message, preferring `message` over the legacy `msg` field.
    pub fn remote_message(&self) -> String {
        self.message
            .clone()
            .or_else(|| self.msg.clone())
            .unwrap_or_else(|| format!("remote status {}", self.status))
    }
}

// =============================================================================
// POS API - Terminal & Receipts
// =============================================================================

/// POS terminal registration info (`GET /info`).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PosInfo {
    #[serde(default)]
    pub operator_name: Option<String>,
    /// The API spells this field `operatorTIN`.
    #[serde(rename = "operatorTIN", default)]
    pub operator_tin: Option<String>,
    #[serde(default)]
    pub pos_no: Option<String>,
    #[serde(default)]
    pub left_lotteries: i64,
    #[serde(default)]
    pub merchants: Vec<MerchantInfo>,
}

/// One merchant registered on the POS terminal.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MerchantInfo {
    #[serde(default)]
    pub tin: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

/// Result of receipt creation (`POST /receipt`).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceiptResult {
    /// 33-digit DDTD receipt id; some deployments return it as `id`.
    #[serde(default)]
    pub bill_id: Option<String>,
    #[serde(default)]
    pub id: Option<String>,
    /// Consumer lottery number (B2C only).
    #[serde(default)]
    pub lottery: Option<String>,
    /// Opaque QR payload for the printed receipt.
    #[serde(default)]
    pub qr_data: Option<String>,
    /// Internal short code shown on the terminal.
    #[serde(default)]
    pub internal_code: Option<String>,
    /// Receipt timestamp as the authority recorded it.
    #[serde(default)]
    pub date: Option<String>,
}

impl ReceiptResult {
    /// The receipt id regardless of which field the deployment used.
    pub fn receipt_id(&self) -> Option<&str> {
        self.bill_id.as_deref().or(self.id.as_deref())
    }
}

/// Body for voiding a receipt (`DELETE /receipt`).
#[derive(Debug, Clone, Serialize)]
pub struct VoidRequest {
    /// 33-digit DDTD receipt id.
    pub id: String,
    /// Receipt date, `yyyy-MM-dd HH:mm:ss`.
    pub date: String,
}

/// A registered merchant bank account (`GET /bankAccounts`).
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BankAccount {
    #[serde(default)]
    pub bank_name: Option<String>,
    #[serde(default)]
    pub account_no: Option<String>,
}

// =============================================================================
// Public API - Taxpayer, Districts, Tax Codes, Barcodes
// =============================================================================

/// Taxpayer record (`getInfo`).
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaxpayerInfo {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub vat_payer: bool,
    #[serde(default)]
    pub city_payer: bool,
    #[serde(default)]
    pub vat_payer_registered_date: Option<String>,
}

/// District/branch code entry (`getBranchInfo`).
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DistrictInfo {
    #[serde(default)]
    pub branch_code: Option<String>,
    #[serde(default)]
    pub branch_name: Option<String>,
}

/// VAT exempt/zero-rate product code entry (`getProductTaxCode`).
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaxCodeInfo {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    /// "VAT_ZERO" or "VAT_EXEMPT".
    #[serde(default)]
    pub tax_type: Option<String>,
    #[serde(default)]
    pub begin_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
}

/// One node of the hierarchical BUNA barcode classification.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BarcodeNode {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

// =============================================================================
// Easy Register API - Consumers & Foreigners
// =============================================================================

/// Consumer profile (`info/consumer/{regNo}` / `getProfile`).
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsumerInfo {
    #[serde(default)]
    pub login_name: Option<String>,
    #[serde(default)]
    pub given_name: Option<String>,
    #[serde(default)]
    pub customer_no: Option<String>,
}

/// Body for `getProfile` (consumer lookup by phone).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileRequest {
    pub phone_num: String,
}

/// Body for `approveQr` (consumer lottery approval).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApproveQrRequest {
    /// 8-9 digit eBarimt customer code.
    pub customer_no: String,
    /// Receipt QR code data.
    pub qr_data: String,
}

/// Body for `setReturnReceipt` (confirm return of a registered receipt).
///
/// Exactly one of `pos_rno` / `lottery_number` is sent.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReturnReceiptRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pos_rno: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lottery_number: Option<String>,
}

/// Foreign tourist record (VAT refund registration).
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForeignerInfo {
    #[serde(default)]
    pub customer_no: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub passport_no: Option<String>,
}

/// Body for `getForeignerInfo`: one of passport or F-register.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ForeignerLookupRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub passport_no: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub f_register: Option<String>,
}

/// Body for `setForeignerInfo` (tourist registration).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterForeignerRequest {
    pub passport_no: String,
    pub first_name: String,
    pub last_name: String,
    /// ISO country code ('US', 'CN', 'KR', ...).
    pub country_code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_num: Option<String>,
}

// =============================================================================
// OAT API - Excise Stamps
// =============================================================================

/// Excise product info (`getInventoryList`).
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OatProductInfo {
    #[serde(default)]
    pub bar_code: Option<String>,
    #[serde(default)]
    pub product_name: Option<String>,
    #[serde(default)]
    pub stock_type: Option<String>,
}

/// Detailed stamp info (`getActiveStockInfo`).
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StampInfo {
    #[serde(default)]
    pub bar_code: Option<String>,
    #[serde(default)]
    pub order_date: Option<String>,
    /// The API spells this field `manufactorRegno`.
    #[serde(default)]
    pub manufactor_regno: Option<String>,
    #[serde(default)]
    pub product_name: Option<String>,
    #[serde(default)]
    pub qr_code: Option<String>,
    #[serde(default)]
    pub stock_number: Option<String>,
}

/// One stamped product group in a stamp sale transaction.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StampStockLine {
    pub bar_code: String,
    /// Product type code (4-33).
    pub stock_type: String,
    /// Stamp type code (3-6).
    pub position_no: String,
    /// Individual stamp numbers sold.
    pub stock_no: Vec<String>,
}

/// Body for `posSetTransaction` (record a stamp sale).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StampSaleRequest {
    /// Receipt id the sale belongs to.
    pub pos_rno: String,
    /// Seller registration number.
    pub mrch_regno: String,
    /// Buyer registration number.
    pub customer_no: String,
    pub date: String,
    pub stocks: Vec<StampStockLine>,
}

/// One detail line of an OAT receipt.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OatDetailLine {
    pub bar_code: String,
    pub qty: i64,
    pub unit_price: f64,
    pub position_no: String,
    pub stock: Vec<String>,
}

/// Body for `createReceiptApi` (OAT breakage/spoilage/promotion receipt).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OatReceiptRequest {
    pub total_amount: f64,
    pub merchant_tin: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_tin: Option<String>,
    /// 1=Raw materials, 2=Promotion, 3=Breakage.
    pub tran_type: i64,
    /// 1=Spirit, 2=Sales.
    pub receipt_type: i64,
    pub details: Vec<OatDetailLine>,
}

/// One product-ownership flag for `setPosReceiptDtlByProductOwner`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductOwnerFlag {
    pub barcode: String,
    /// 1 = own-manufactured, 0 = other manufacturer.
    pub is_product_owner: i64,
}

/// Body for `setPosReceiptDtlByProductOwner`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductOwnerRequest {
    pub pos_rno: String,
    pub product_owner_dtl_model_list: Vec<ProductOwnerFlag>,
}

// =============================================================================
// TPI / Operator API
// =============================================================================

/// Body for `getSalesTotalData` (night-time sales breakdown).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesDataRequest {
    pub tin: String,
    pub start_date: String,
    pub end_date: String,
}

/// Body for `saveOprMerchants` (operator merchant registration).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterMerchantRequest {
    pub pos_no: String,
    pub merchant_tins: Vec<String>,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_receipt_result_id_fallback() {
        let via_bill_id: ReceiptResult =
            serde_json::from_str(r#"{"billId": "123", "lottery": "AB1234"}"#).unwrap();
        assert_eq!(via_bill_id.receipt_id(), Some("123"));

        let via_id: ReceiptResult = serde_json::from_str(r#"{"id": "456"}"#).unwrap();
        assert_eq!(via_id.receipt_id(), Some("456"));
    }

    #[test]
    fn test_pos_info_operator_tin_spelling() {
        let info: PosInfo = serde_json::from_str(
            r#"{"operatorName": "Test Operator", "operatorTIN": "77100012345",
                "posNo": "10012345", "leftLotteries": 920}"#,
        )
        .unwrap();
        assert_eq!(info.operator_tin.as_deref(), Some("77100012345"));
        assert_eq!(info.left_lotteries, 920);
        assert!(info.merchants.is_empty());
    }

    #[test]
    fn test_envelope_message_fallback() {
        let env: Envelope<Vec<String>> =
            serde_json::from_str(r#"{"status": 404, "msg": "not found"}"#).unwrap();
        assert_eq!(env.remote_message(), "not found");
        assert!(env.data.is_none());
    }

    #[test]
    fn test_return_receipt_serializes_one_key() {
        let req = ReturnReceiptRequest {
            pos_rno: Some("0001".into()),
            lottery_number: None,
        };
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json, serde_json::json!({"posRno": "0001"}));
    }
}
