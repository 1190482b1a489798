//! # eBarimt API Client
//!
//! One async method per endpoint across the four service families.
//!
//! ## Response Classification
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  HTTP 200, body parses, no failure indicator ──► ApiOutcome::Success   │
//! │  HTTP 200, body has success:false / status!=200 ─► ApiOutcome::Rejected│
//! │  non-2xx with a parseable {"message"} body ─────► ApiOutcome::Rejected │
//! │  non-2xx, opaque body ──────────────────────────► ClientError::Http    │
//! │  timeout / refused / bad JSON on 2xx ───────────► ClientError::*       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! POS terminal endpoints answer with bare JSON objects; the public and
//! ITC services wrap payloads in a `{status, message, data}` envelope.
//! Both families funnel through the classifiers below so every method
//! returns `ClientResult<ApiOutcome<T>>`.

use reqwest::{RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use ebarimt_core::payload::ReceiptPayload;

use crate::auth::TokenCache;
use crate::config::ClientConfig;
use crate::error::{ApiOutcome, ClientError, ClientResult, RemoteRejection};
use crate::wire::{
    ApproveQrRequest, BankAccount, BarcodeNode, ConsumerInfo, DistrictInfo, Envelope,
    ForeignerInfo, ForeignerLookupRequest, OatProductInfo, OatReceiptRequest, PosInfo,
    ProfileRequest, ReceiptResult, RegisterForeignerRequest, RegisterMerchantRequest,
    ReturnReceiptRequest, SalesDataRequest, StampInfo, StampSaleRequest, TaxpayerInfo,
    TaxCodeInfo, VoidRequest,
};

/// HTTP client for the eBarimt services.
///
/// Stateless apart from the cached OAuth token; cheap to hold for the
/// lifetime of the application. The client performs no retry and no
/// de-duplication.
pub struct EbarimtClient {
    http: reqwest::Client,
    config: ClientConfig,
    auth: TokenCache,
}

impl EbarimtClient {
    /// Creates a client from the given configuration.
    pub fn new(config: ClientConfig) -> ClientResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ClientError::Transport {
                message: format!("client construction failed: {e}"),
            })?;
        Ok(EbarimtClient {
            http,
            config,
            auth: TokenCache::new(),
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Drops the cached OAuth token (call after changing credentials).
    pub async fn invalidate_token(&self) {
        self.auth.clear().await;
    }

    // =========================================================================
    // POS API - Terminal & Receipts
    // =========================================================================

    /// Terminal registration info: operator, merchants, remaining lotteries.
    pub async fn get_info(&self) -> ClientResult<ApiOutcome<PosInfo>> {
        let url = format!("{}/info", self.config.pos_base);
        let (status, body) = self.send(self.http.get(&url), "GET", &url).await?;
        classify_pos(status, &body)
    }

    /// Registers a VAT receipt with the terminal.
    pub async fn create_receipt(
        &self,
        payload: &ReceiptPayload,
    ) -> ClientResult<ApiOutcome<ReceiptResult>> {
        let url = format!("{}/receipt", self.config.pos_base);
        let (status, body) = self
            .send(self.http.post(&url).json(payload), "POST", &url)
            .await?;
        classify_pos(status, &body)
    }

    /// Fetches a registered receipt by its 33-digit DDTD id.
    pub async fn get_receipt(
        &self,
        receipt_id: &str,
    ) -> ClientResult<ApiOutcome<ReceiptResult>> {
        let url = format!("{}/receipt/{}", self.config.pos_base, receipt_id);
        let (status, body) = self.send(self.http.get(&url), "GET", &url).await?;
        classify_pos(status, &body)
    }

    /// Voids a receipt. `receipt_date` is `yyyy-MM-dd HH:mm:ss`.
    ///
    /// Only unconfirmed consumer receipts can be voided.
    pub async fn delete_receipt(
        &self,
        receipt_id: &str,
        receipt_date: &str,
    ) -> ClientResult<ApiOutcome<()>> {
        let url = format!("{}/receipt", self.config.pos_base);
        let req = VoidRequest {
            id: receipt_id.to_string(),
            date: receipt_date.to_string(),
        };
        let (status, body) = self
            .send(self.http.delete(&url).json(&req), "DELETE", &url)
            .await?;
        classify_pos_ack(status, &body)
    }

    /// Triggers a sync of locally buffered receipts to the central system.
    pub async fn send_data(&self) -> ClientResult<ApiOutcome<()>> {
        let url = format!("{}/sendData", self.config.pos_base);
        let (status, body) = self.send(self.http.get(&url), "GET", &url).await?;
        classify_pos_ack(status, &body)
    }

    /// Registered merchant bank accounts, optionally scoped to one TIN.
    pub async fn get_bank_accounts(
        &self,
        tin: Option<&str>,
    ) -> ClientResult<ApiOutcome<Vec<BankAccount>>> {
        let url = format!("{}/bankAccounts", self.config.pos_base);
        let mut req = self.http.get(&url);
        if let Some(tin) = tin {
            req = req.query(&[("tin", tin)]);
        }
        let (status, body) = self.send(req, "GET", &url).await?;
        classify_pos(status, &body)
    }

    // =========================================================================
    // Public API - Taxpayer & Product Lookup
    // =========================================================================

    /// Taxpayer record by TIN (name, VAT payer flag, city tax flag).
    pub async fn get_taxpayer_info(
        &self,
        tin: &str,
    ) -> ClientResult<ApiOutcome<TaxpayerInfo>> {
        let url = format!("{}/api/info/check/getInfo", self.config.api_base);
        let req = self.http.get(&url).query(&[("tin", tin)]);
        let (status, body) = self.send(req, "GET", &url).await?;
        classify_envelope(status, &body)
    }

    /// Resolves a company or personal registration number to a TIN.
    pub async fn get_tin_by_regno(&self, reg_no: &str) -> ClientResult<ApiOutcome<String>> {
        let url = format!("{}/api/info/check/getTinInfo", self.config.api_base);
        let req = self.http.get(&url).query(&[("regNo", reg_no)]);
        let (status, body) = self.send(req, "GET", &url).await?;
        // The TIN comes back as a bare number in `data`.
        Ok(classify_envelope::<Value>(status, &body)?.map(|v| match v {
            Value::String(s) => s,
            other => other.to_string(),
        }))
    }

    /// All district/branch codes with Mongolian names.
    pub async fn get_district_codes(&self) -> ClientResult<ApiOutcome<Vec<DistrictInfo>>> {
        let url = format!("{}/api/info/check/getBranchInfo", self.config.api_base);
        let (status, body) = self.send(self.http.get(&url), "GET", &url).await?;
        classify_envelope(status, &body)
    }

    /// VAT zero-rate / exempt product tax codes with validity dates.
    pub async fn get_tax_codes(&self) -> ClientResult<ApiOutcome<Vec<TaxCodeInfo>>> {
        let url = format!(
            "{}/api/receipt/receipt/getProductTaxCode",
            self.config.api_base
        );
        let (status, body) = self.send(self.http.get(&url), "GET", &url).await?;
        classify_envelope(status, &body)
    }

    /// Walks the BUNA classification hierarchy.
    ///
    /// Zero levels list the sectors; each further level narrows
    /// Sector > SubSector > Group > Class > SubClass > BUNA > Barcode.
    pub async fn lookup_barcode(
        &self,
        levels: &[&str],
    ) -> ClientResult<ApiOutcome<Vec<BarcodeNode>>> {
        let mut url = format!("{}/api/info/check/barcode/v2", self.config.api_base);
        for level in levels {
            url.push('/');
            url.push_str(level);
        }
        let (status, body) = self.send(self.http.get(&url), "GET", &url).await?;
        classify_pos(status, &body)
    }

    // =========================================================================
    // Easy Register API - Consumer Lottery
    // =========================================================================

    /// Consumer lookup by registration number or civil id.
    pub async fn lookup_consumer_by_regno(
        &self,
        reg_no: &str,
    ) -> ClientResult<ApiOutcome<ConsumerInfo>> {
        let url = format!(
            "{}/api/easy-register/api/info/consumer/{}",
            self.config.itc_base, reg_no
        );
        let bearer = self.bearer().await?;
        let (status, body) = self
            .send(self.http.get(&url).bearer_auth(bearer), "GET", &url)
            .await?;
        classify_pos(status, &body)
    }

    /// Consumer lookup by phone number.
    pub async fn lookup_consumer_by_phone(
        &self,
        phone: &str,
    ) -> ClientResult<ApiOutcome<ConsumerInfo>> {
        let url = format!(
            "{}/api/easy-register/rest/v1/getProfile",
            self.config.itc_base
        );
        let bearer = self.bearer().await?;
        let req = self
            .http
            .post(&url)
            .bearer_auth(bearer)
            .json(&ProfileRequest {
                phone_num: phone.to_string(),
            });
        let (status, body) = self.send(req, "POST", &url).await?;
        classify_envelope(status, &body)
    }

    /// Attaches a registered receipt to a consumer's lottery account.
    pub async fn approve_receipt_qr(
        &self,
        customer_no: &str,
        qr_data: &str,
    ) -> ClientResult<ApiOutcome<()>> {
        let url = format!(
            "{}/api/easy-register/rest/v1/approveQr",
            self.config.itc_base
        );
        let bearer = self.bearer().await?;
        let req = self
            .http
            .post(&url)
            .bearer_auth(bearer)
            .json(&ApproveQrRequest {
                customer_no: customer_no.to_string(),
                qr_data: qr_data.to_string(),
            });
        let (status, body) = self.send(req, "POST", &url).await?;
        classify_ack(status, &body)
    }

    /// Confirms the return of a consumer-registered receipt.
    ///
    /// Identify the receipt by id or by lottery number.
    pub async fn confirm_return_receipt(
        &self,
        pos_rno: Option<&str>,
        lottery_number: Option<&str>,
    ) -> ClientResult<ApiOutcome<()>> {
        let url = format!(
            "{}/api/easy-register/rest/v1/setReturnReceipt",
            self.config.itc_base
        );
        let bearer = self.bearer().await?;
        let api_key = self.api_key()?.to_string();
        let req = self
            .http
            .post(&url)
            .bearer_auth(bearer)
            .header("X-API-KEY", api_key)
            .json(&ReturnReceiptRequest {
                pos_rno: pos_rno.map(str::to_string),
                lottery_number: lottery_number.map(str::to_string),
            });
        let (status, body) = self.send(req, "POST", &url).await?;
        classify_ack(status, &body)
    }

    // =========================================================================
    // Easy Register API - Foreign Tourists (VAT Refund)
    // =========================================================================

    /// Tourist lookup by passport number or F-register number.
    pub async fn get_foreigner_info(
        &self,
        lookup: &ForeignerLookupRequest,
    ) -> ClientResult<ApiOutcome<ForeignerInfo>> {
        let url = format!(
            "{}/api/easy-register/rest/v1/getForeignerInfo",
            self.config.itc_base
        );
        let bearer = self.bearer().await?;
        let req = self.http.post(&url).bearer_auth(bearer).json(lookup);
        let (status, body) = self.send(req, "POST", &url).await?;
        classify_envelope(status, &body)
    }

    /// Tourist lookup by eBarimt login name.
    pub async fn get_foreigner_by_username(
        &self,
        username: &str,
    ) -> ClientResult<ApiOutcome<ForeignerInfo>> {
        let url = format!(
            "{}/api/easy-register/rest/v1/getForeignerByUsername",
            self.config.itc_base
        );
        let bearer = self.bearer().await?;
        let req = self
            .http
            .post(&url)
            .bearer_auth(bearer)
            .json(&serde_json::json!({ "username": username }));
        let (status, body) = self.send(req, "POST", &url).await?;
        classify_envelope(status, &body)
    }

    /// Registers a foreign tourist for the VAT refund scheme.
    pub async fn register_foreigner(
        &self,
        registration: &RegisterForeignerRequest,
    ) -> ClientResult<ApiOutcome<ForeignerInfo>> {
        let url = format!(
            "{}/api/easy-register/rest/v1/setForeignerInfo",
            self.config.itc_base
        );
        let bearer = self.bearer().await?;
        let req = self.http.post(&url).bearer_auth(bearer).json(registration);
        let (status, body) = self.send(req, "POST", &url).await?;
        classify_envelope(status, &body)
    }

    // =========================================================================
    // OAT API - Excise Tax Stamps
    // =========================================================================

    /// Excise product info by barcode.
    pub async fn get_oat_product_info(
        &self,
        barcode: &str,
    ) -> ClientResult<ApiOutcome<Vec<OatProductInfo>>> {
        let url = format!(
            "{}/rest/tpiMain/mainApi/getInventoryList",
            self.config.itc_base
        );
        let req = self.http.get(&url).query(&[("barcode", barcode)]);
        let (status, body) = self.send(req, "GET", &url).await?;
        classify_pos(status, &body)
    }

    /// Excise stamp info by the QR printed on the stamp.
    pub async fn get_oat_stock_by_qr(
        &self,
        qr_code: &str,
    ) -> ClientResult<ApiOutcome<StampInfo>> {
        let url = format!("{}/api/inventory/stock/getStockQr", self.config.itc_base);
        let bearer = self.bearer().await?;
        let req = self
            .http
            .get(&url)
            .bearer_auth(bearer)
            .query(&[("stockQr", qr_code)]);
        let (status, body) = self.send(req, "GET", &url).await?;
        classify_envelope(status, &body)
    }

    /// Stamp numbers available for sale in the given month.
    #[allow(clippy::too_many_arguments)]
    pub async fn get_available_stamps(
        &self,
        reg_no: &str,
        barcode: &str,
        stock_type: &str,
        position_id: &str,
        year: i32,
        month: u32,
    ) -> ClientResult<ApiOutcome<Vec<String>>> {
        let url = format!("{}/api/inventory/getActiveStockNoPos", self.config.itc_base);
        let bearer = self.bearer().await?;
        let req = self.http.get(&url).bearer_auth(bearer).query(&[
            ("regNo", reg_no),
            ("barCode", barcode),
            ("stockType", stock_type),
            ("positionId", position_id),
            ("year", &year.to_string()),
            ("month", &month.to_string()),
        ]);
        let (status, body) = self.send(req, "GET", &url).await?;
        classify_envelope(status, &body)
    }

    /// Detailed stamp info, paginated (manufacturer, QR, stock numbers).
    #[allow(clippy::too_many_arguments)]
    pub async fn get_available_stamps_paginated(
        &self,
        reg_no: &str,
        barcode: &str,
        stock_type: &str,
        position_id: &str,
        page_number: u32,
        page_size: u32,
    ) -> ClientResult<ApiOutcome<Vec<StampInfo>>> {
        let url = format!("{}/api/inventory/getActiveStockInfo", self.config.itc_base);
        let bearer = self.bearer().await?;
        let mut req = self.http.get(&url).bearer_auth(bearer).query(&[
            ("regNo", reg_no),
            ("barCode", barcode),
            ("stockType", stock_type),
            ("positionId", position_id),
            ("pageNumber", &page_number.to_string()),
            ("pageSize", &page_size.to_string()),
        ]);
        if let Some(key) = self.config.api_key.as_deref() {
            req = req.header("X-API-KEY", key);
        }
        let (status, body) = self.send(req, "GET", &url).await?;
        classify_envelope(status, &body)
    }

    /// Records which individual stamps left stock in a sale.
    pub async fn record_stamp_sale(
        &self,
        sale: &StampSaleRequest,
    ) -> ClientResult<ApiOutcome<()>> {
        let url = format!("{}/api/inventory/posSetTransaction", self.config.itc_base);
        let bearer = self.bearer().await?;
        let req = self.http.post(&url).bearer_auth(bearer).json(sale);
        let (status, body) = self.send(req, "POST", &url).await?;
        classify_ack(status, &body)
    }

    /// Registers an OAT receipt for breakage, spoilage or promotion.
    pub async fn create_oat_receipt(
        &self,
        receipt: &OatReceiptRequest,
    ) -> ClientResult<ApiOutcome<()>> {
        let url = format!("{}/api/inventory/createReceiptApi", self.config.itc_base);
        let bearer = self.bearer().await?;
        let req = self.http.post(&url).bearer_auth(bearer).json(receipt);
        let (status, body) = self.send(req, "POST", &url).await?;
        classify_ack(status, &body)
    }

    /// Flags receipt lines as own-manufactured products.
    pub async fn set_product_owner(
        &self,
        request: &crate::wire::ProductOwnerRequest,
    ) -> ClientResult<ApiOutcome<()>> {
        let url = format!(
            "{}/api/tpi/receipt/setPosReceiptDtlByProductOwner",
            self.config.api_base
        );
        let bearer = self.bearer().await?;
        let req = self.http.post(&url).bearer_auth(bearer).json(request);
        let (status, body) = self.send(req, "POST", &url).await?;
        classify_ack(status, &body)
    }

    // =========================================================================
    // TPI / Operator API
    // =========================================================================

    /// Sales breakdown data. The authority serves this endpoint only
    /// between 01:00 and 07:00 local time.
    pub async fn get_sales_data(
        &self,
        request: &SalesDataRequest,
    ) -> ClientResult<ApiOutcome<Value>> {
        let url = format!("{}/api/tpi/receipt/getSalesTotalData", self.config.api_base);
        let bearer = self.bearer().await?;
        let api_key = self.api_key()?.to_string();
        let req = self
            .http
            .post(&url)
            .bearer_auth(bearer)
            .header("X-API-KEY", api_key)
            .json(request);
        let (status, body) = self.send(req, "POST", &url).await?;
        classify_envelope(status, &body)
    }

    /// Registers merchants under an operator POS.
    pub async fn register_merchant(
        &self,
        request: &RegisterMerchantRequest,
    ) -> ClientResult<ApiOutcome<()>> {
        let url = format!("{}/api/tpi/receipt/saveOprMerchants", self.config.api_base);
        let bearer = self.bearer().await?;
        let api_key = self.api_key()?.to_string();
        let req = self
            .http
            .post(&url)
            .bearer_auth(bearer)
            .header("X-API-KEY", api_key)
            .json(request);
        let (status, body) = self.send(req, "POST", &url).await?;
        classify_ack(status, &body)
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    async fn bearer(&self) -> ClientResult<String> {
        self.auth.bearer(&self.http, &self.config).await
    }

    fn api_key(&self) -> ClientResult<&str> {
        self.config
            .api_key
            .as_deref()
            .filter(|k| !k.is_empty())
            .ok_or(ClientError::NotConfigured { field: "api_key" })
    }

    /// Executes one request and returns the status plus raw body text.
    async fn send(
        &self,
        request: RequestBuilder,
        method: &str,
        url: &str,
    ) -> ClientResult<(StatusCode, String)> {
        let response = request.send().await?;
        let status = response.status();
        debug!(method, url, status = status.as_u16(), "eBarimt API call");
        let body = response.text().await?;
        Ok((status, body))
    }
}

// =============================================================================
// Response Classification
// =============================================================================

/// Classifies a bare-JSON (POS style) response into an outcome.
fn classify_pos<T: DeserializeOwned>(
    status: StatusCode,
    body: &str,
) -> ClientResult<ApiOutcome<T>> {
    if !status.is_success() {
        return non_success(status, body);
    }
    let value: Value = serde_json::from_str(body).map_err(|e| ClientError::MalformedResponse {
        message: format!("invalid JSON: {e}"),
    })?;
    if let Some(rejection) = body_rejection(&value) {
        return Ok(ApiOutcome::Rejected(rejection));
    }
    let parsed = serde_json::from_value(value).map_err(|e| ClientError::MalformedResponse {
        message: format!("unexpected shape: {e}"),
    })?;
    Ok(ApiOutcome::Success(parsed))
}

/// Classifies a bare-JSON response where only acceptance matters.
fn classify_pos_ack(status: StatusCode, body: &str) -> ClientResult<ApiOutcome<()>> {
    if !status.is_success() {
        return non_success(status, body);
    }
    // Empty bodies count as acceptance on the ack endpoints.
    if body.trim().is_empty() {
        return Ok(ApiOutcome::Success(()));
    }
    let value: Value = serde_json::from_str(body).map_err(|e| ClientError::MalformedResponse {
        message: format!("invalid JSON: {e}"),
    })?;
    if let Some(rejection) = body_rejection(&value) {
        return Ok(ApiOutcome::Rejected(rejection));
    }
    Ok(ApiOutcome::Success(()))
}

/// Classifies a `{status, message, data}` envelope response.
fn classify_envelope<T: DeserializeOwned>(
    status: StatusCode,
    body: &str,
) -> ClientResult<ApiOutcome<T>> {
    if !status.is_success() {
        return non_success(status, body);
    }
    let envelope: Envelope<T> =
        serde_json::from_str(body).map_err(|e| ClientError::MalformedResponse {
            message: format!("invalid envelope: {e}"),
        })?;
    if envelope.status != 200 {
        return Ok(ApiOutcome::Rejected(RemoteRejection {
            message: envelope.remote_message(),
            code: Some(envelope.status),
        }));
    }
    match envelope.data {
        Some(data) => Ok(ApiOutcome::Success(data)),
        None => Err(ClientError::MalformedResponse {
            message: "envelope status 200 without data".to_string(),
        }),
    }
}

/// Classifies an envelope response where only acceptance matters.
fn classify_ack(status: StatusCode, body: &str) -> ClientResult<ApiOutcome<()>> {
    if !status.is_success() {
        return non_success(status, body);
    }
    let envelope: Envelope<Value> =
        serde_json::from_str(body).map_err(|e| ClientError::MalformedResponse {
            message: format!("invalid envelope: {e}"),
        })?;
    if envelope.status != 200 {
        return Ok(ApiOutcome::Rejected(RemoteRejection {
            message: envelope.remote_message(),
            code: Some(envelope.status),
        }));
    }
    Ok(ApiOutcome::Success(()))
}

/// Non-2xx: a parseable failure body is still a remote rejection.
fn non_success<T>(status: StatusCode, body: &str) -> ClientResult<ApiOutcome<T>> {
    if let Ok(value) = serde_json::from_str::<Value>(body) {
        if let Some(message) = extract_message(&value) {
            return Ok(ApiOutcome::Rejected(RemoteRejection {
                message,
                code: Some(i64::from(status.as_u16())),
            }));
        }
    }
    Err(ClientError::Http {
        status: status.as_u16(),
        body: body.to_string(),
    })
}

/// A 200 body carrying an explicit failure indicator.
fn body_rejection(value: &Value) -> Option<RemoteRejection> {
    if value.get("success").and_then(Value::as_bool) == Some(false) {
        let message =
            extract_message(value).unwrap_or_else(|| "request rejected".to_string());
        let code = value.get("code").and_then(Value::as_i64);
        return Some(RemoteRejection { message, code });
    }
    None
}

fn extract_message(value: &Value) -> Option<String> {
    for key in ["message", "msg", "errorMessage"] {
        if let Some(s) = value.get(key).and_then(Value::as_str) {
            if !s.is_empty() {
                return Some(s.to_string());
            }
        }
    }
    None
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wire::ReceiptResult;

    #[test]
    fn test_pos_200_success() {
        let body = r#"{"billId": "999", "lottery": "XY1234", "qrData": "qr"}"#;
        let outcome: ApiOutcome<ReceiptResult> =
            classify_pos(StatusCode::OK, body).unwrap();
        match outcome {
            ApiOutcome::Success(r) => assert_eq!(r.receipt_id(), Some("999")),
            ApiOutcome::Rejected(r) => panic!("unexpected rejection: {r}"),
        }
    }

    #[test]
    fn test_pos_200_with_failure_body_is_rejection() {
        let body = r#"{"success": false, "message": "TIN not found", "code": 400}"#;
        let outcome: ApiOutcome<ReceiptResult> =
            classify_pos(StatusCode::OK, body).unwrap();
        match outcome {
            ApiOutcome::Rejected(r) => {
                assert_eq!(r.message, "TIN not found");
                assert_eq!(r.code, Some(400));
            }
            ApiOutcome::Success(_) => panic!("expected rejection"),
        }
    }

    #[test]
    fn test_pos_non_2xx_with_message_is_rejection() {
        let body = r#"{"message": "merchant not registered"}"#;
        let outcome: ApiOutcome<ReceiptResult> =
            classify_pos(StatusCode::BAD_REQUEST, body).unwrap();
        assert!(outcome.is_rejected());
    }

    #[test]
    fn test_pos_non_2xx_opaque_body_is_http_error() {
        let result: ClientResult<ApiOutcome<ReceiptResult>> =
            classify_pos(StatusCode::SERVICE_UNAVAILABLE, "<html>nope</html>");
        match result {
            Err(ClientError::Http { status, .. }) => assert_eq!(status, 503),
            other => panic!("expected Http error, got {other:?}"),
        }
    }

    #[test]
    fn test_pos_200_invalid_json_is_malformed() {
        let result: ClientResult<ApiOutcome<ReceiptResult>> =
            classify_pos(StatusCode::OK, "not json at all");
        assert!(matches!(
            result,
            Err(ClientError::MalformedResponse { .. })
        ));
    }

    #[test]
    fn test_envelope_status_mismatch_is_rejection() {
        let body = r#"{"status": 404, "message": "regNo not found"}"#;
        let outcome: ApiOutcome<Value> = classify_envelope(StatusCode::OK, body).unwrap();
        match outcome {
            ApiOutcome::Rejected(r) => {
                assert_eq!(r.message, "regNo not found");
                assert_eq!(r.code, Some(404));
            }
            ApiOutcome::Success(_) => panic!("expected rejection"),
        }
    }

    #[test]
    fn test_envelope_success_unwraps_data() {
        let body = r#"{"status": 200, "data": {"name": "Test LLC", "vatPayer": true}}"#;
        let outcome: ApiOutcome<crate::wire::TaxpayerInfo> =
            classify_envelope(StatusCode::OK, body).unwrap();
        match outcome {
            ApiOutcome::Success(info) => {
                assert_eq!(info.name.as_deref(), Some("Test LLC"));
                assert!(info.vat_payer);
            }
            ApiOutcome::Rejected(r) => panic!("unexpected rejection: {r}"),
        }
    }

    #[test]
    fn test_ack_empty_body_is_success() {
        let outcome = classify_pos_ack(StatusCode::OK, "").unwrap();
        assert!(!outcome.is_rejected());
    }
}
