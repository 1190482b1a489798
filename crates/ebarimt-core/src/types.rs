//! # Domain Types
//!
//! Core domain types for the eBarimt integration.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │ SourceDocument  │   │   ReceiptLog    │   │    Settings     │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  doctype/name   │   │  id (UUID)      │   │  environment    │       │
//! │  │  customer_tin   │   │  status         │   │  credentials    │       │
//! │  │  lines          │   │  receipt_id     │   │  operator meta  │       │
//! │  │  payments       │   │  lottery/QR     │   │  district code  │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │  ReceiptStatus  │   │    BillType     │   │   ProductCode   │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  Pending        │   │  B2C_RECEIPT    │   │  GS1 code       │       │
//! │  │  Success/Failed │   │  B2B_RECEIPT    │   │  VatType        │       │
//! │  │  Voided         │   └─────────────────┘   │  city tax/OAT   │       │
//! │  └─────────────────┘                         └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Dual-Key Identity Pattern
//! A receipt log has:
//! - `id`: UUID v4 - immutable, used for database relations
//! - `receipt_id`: the 33-digit DDTD id the tax authority assigns on success

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::money::Money;
use crate::{CITY_TAX_BPS, STANDARD_VAT_BPS};

// =============================================================================
// Receipt Status
// =============================================================================

/// The lifecycle status of a receipt submission.
///
/// ## State Machine
/// ```text
/// (absent) ──► Pending ──► Success ──► Voided   (terminal)
///                 │            │
///                 ▼            └─── re-submit rejected (StateError)
///              Failed ──► Pending (retry) ──► Success | Failed
/// ```
///
/// `Cancelled` marks logs whose source document was cancelled in the host
/// framework before a receipt was ever issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
pub enum ReceiptStatus {
    /// Submission attempt in flight (or queued for retry).
    Pending,
    /// The tax authority issued a receipt.
    Success,
    /// Submission failed; `error_message` carries the reason.
    Failed,
    /// A previously successful receipt was voided. Terminal.
    Voided,
    /// Source document cancelled before any receipt was issued. Terminal.
    Cancelled,
}

impl ReceiptStatus {
    /// Whether a document in this state may be (re)submitted.
    ///
    /// Only absent or Failed logs are eligible; a Success receipt must be
    /// voided first so one invoice can never hold two live receipts.
    pub fn eligible_for_submit(&self) -> bool {
        matches!(self, ReceiptStatus::Failed)
    }
}

impl std::fmt::Display for ReceiptStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ReceiptStatus::Pending => "Pending",
            ReceiptStatus::Success => "Success",
            ReceiptStatus::Failed => "Failed",
            ReceiptStatus::Voided => "Voided",
            ReceiptStatus::Cancelled => "Cancelled",
        };
        f.write_str(s)
    }
}

// =============================================================================
// Bill Type
// =============================================================================

/// Receipt variant: business-to-consumer or business-to-business.
///
/// Derived from the customer: a customer with a TIN gets a B2B receipt,
/// one without gets a B2C receipt (with lottery eligibility).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
pub enum BillType {
    #[serde(rename = "B2C_RECEIPT")]
    #[cfg_attr(feature = "sqlx", sqlx(rename = "B2C_RECEIPT"))]
    B2cReceipt,
    #[serde(rename = "B2B_RECEIPT")]
    #[cfg_attr(feature = "sqlx", sqlx(rename = "B2B_RECEIPT"))]
    B2bReceipt,
}

impl BillType {
    /// Wire name as the POS API expects it.
    pub fn as_wire(&self) -> &'static str {
        match self {
            BillType::B2cReceipt => "B2C_RECEIPT",
            BillType::B2bReceipt => "B2B_RECEIPT",
        }
    }
}

// =============================================================================
// VAT Type
// =============================================================================

/// VAT category of a product, from the GS1 classification table.
///
/// - STANDARD: 10% VAT (most products)
/// - ZERO: 0% VAT (export, mining, etc.)
/// - EXEMPT: VAT exempt (healthcare, education, etc.)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
pub enum VatType {
    #[default]
    #[serde(rename = "STANDARD")]
    #[cfg_attr(feature = "sqlx", sqlx(rename = "STANDARD"))]
    Standard,
    #[serde(rename = "ZERO")]
    #[cfg_attr(feature = "sqlx", sqlx(rename = "ZERO"))]
    Zero,
    #[serde(rename = "EXEMPT")]
    #[cfg_attr(feature = "sqlx", sqlx(rename = "EXEMPT"))]
    Exempt,
}

impl VatType {
    /// VAT rate in basis points for this category.
    pub fn rate_bps(&self) -> u32 {
        match self {
            VatType::Standard => STANDARD_VAT_BPS,
            VatType::Zero | VatType::Exempt => 0,
        }
    }
}

// =============================================================================
// Excise Type
// =============================================================================

/// Excise (OAT) category requiring stamp tracking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
pub enum ExciseType {
    Alcohol,
    Tobacco,
    Fuel,
}

// =============================================================================
// Payment Code
// =============================================================================

/// Payment class understood by the POS API.
///
/// ERP modes of payment are mapped to one of these via the payment type
/// table; an unmapped mode falls back to `Other` rather than failing the
/// submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
pub enum PaymentCode {
    Cash,
    Card,
    Transfer,
    #[default]
    Other,
}

impl PaymentCode {
    /// Wire code as the POS API expects it.
    pub fn as_wire(&self) -> &'static str {
        match self {
            PaymentCode::Cash => "CASH",
            PaymentCode::Card => "PAYMENT_CARD",
            PaymentCode::Transfer => "BANK_TRANSFER",
            PaymentCode::Other => "OTHER",
        }
    }
}

// =============================================================================
// Environment & Connection Status
// =============================================================================

/// Which tax authority deployment the integration talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
pub enum Environment {
    #[default]
    Production,
    Staging,
}

/// Result of the last connection test, persisted on Settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
pub enum ConnectionStatus {
    #[default]
    #[serde(rename = "Not Configured")]
    #[cfg_attr(feature = "sqlx", sqlx(rename = "Not Configured"))]
    NotConfigured,
    Connected,
    Disconnected,
}

// =============================================================================
// Product Code (GS1 classification)
// =============================================================================

/// GS1 Mongolia product classification record with tax configuration.
///
/// ## Classification Hierarchy
/// - Segment (2 digits): major category
/// - Family (3 digits): sub-category
/// - Class (4 digits): product group
/// - Brick (6 digits): specific product
///
/// Owned by the fixture-import process; the submission workflow only
/// reads it to derive per-line tax fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct ProductCode {
    /// Six-digit GS1 classification code (zero-padded).
    pub classification_code: String,
    /// Mongolian name.
    pub name_mn: Option<String>,
    /// English name.
    pub name_en: Option<String>,
    /// VAT category.
    pub vat_type: VatType,
    /// Whether the 2% Ulaanbaatar city tax applies.
    pub city_tax_applicable: bool,
    /// Excise category, if any.
    pub excise_type: Option<ExciseType>,
    /// OAT product type code for stamp tracking (present with excise_type).
    pub oat_product_code: Option<String>,
}

impl ProductCode {
    /// Segment code: first 2 digits of the classification.
    pub fn segment_code(&self) -> &str {
        prefix(&self.classification_code, 2)
    }

    /// Family code: first 3 digits.
    pub fn family_code(&self) -> &str {
        prefix(&self.classification_code, 3)
    }

    /// Class code: first 4 digits.
    pub fn class_code(&self) -> &str {
        prefix(&self.classification_code, 4)
    }

    /// VAT rate in basis points.
    pub fn vat_rate_bps(&self) -> u32 {
        self.vat_type.rate_bps()
    }

    /// City tax rate in basis points (0 when not applicable).
    pub fn city_tax_rate_bps(&self) -> u32 {
        if self.city_tax_applicable {
            CITY_TAX_BPS
        } else {
            0
        }
    }

    /// Whether this product requires an OAT excise stamp on sale.
    pub fn requires_oat_stamp(&self) -> bool {
        self.excise_type.is_some() && self.oat_product_code.is_some()
    }
}

fn prefix(code: &str, len: usize) -> &str {
    if code.len() >= len {
        &code[..len]
    } else {
        code
    }
}

// =============================================================================
// Payment Type Mapping
// =============================================================================

/// Maps an ERP mode of payment to a POS API payment code.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct PaymentTypeMapping {
    /// ERP mode-of-payment name ("Cash", "QPay", ...).
    pub mode_of_payment: String,
    /// POS API payment class.
    pub payment_code: PaymentCode,
    /// Whether this counts toward the receipt's cash amount.
    pub is_cash: bool,
}

// =============================================================================
// Settings
// =============================================================================

/// Process-wide configuration record, effectively a singleton per company.
///
/// Mutated only by `test_connection` (connection status, operator
/// metadata) and fixture sync; every workflow operation receives it
/// explicitly instead of reading ambient global state.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Settings {
    /// Master switch for the integration.
    pub enabled: bool,
    /// Production or Staging deployment.
    pub environment: Environment,
    /// ITC OAuth username.
    pub api_username: Option<String>,
    /// ITC OAuth password.
    pub api_password: Option<String>,
    /// X-API-KEY for operator endpoints.
    pub api_key: Option<String>,
    /// Merchant taxpayer identification number.
    pub merchant_tin: Option<String>,
    /// POS terminal registration number.
    pub pos_no: Option<String>,
    /// Default district code (4 digits) stamped on receipts.
    pub district_code: Option<String>,
    /// Branch number within the merchant.
    pub branch_no: Option<String>,
    /// Submit a receipt automatically when an invoice is submitted.
    pub auto_submit_on_invoice: bool,
    /// Void the receipt automatically when the invoice is cancelled.
    pub auto_void_on_cancel: bool,
    /// Outcome of the last connection test.
    pub connection_status: ConnectionStatus,
    /// Operator name reported by the POS terminal.
    pub operator_name: Option<String>,
    /// Operator TIN reported by the POS terminal.
    pub operator_tin: Option<String>,
    /// Remaining consumer lottery count.
    pub left_lotteries: i64,
    /// When the POS terminal info was last refreshed.
    pub last_sync: Option<DateTime<Utc>>,
}

impl Settings {
    /// A disabled, unconfigured settings record.
    pub fn unconfigured() -> Self {
        Settings {
            enabled: false,
            environment: Environment::default(),
            api_username: None,
            api_password: None,
            api_key: None,
            merchant_tin: None,
            pos_no: None,
            district_code: None,
            branch_no: None,
            auto_submit_on_invoice: true,
            auto_void_on_cancel: true,
            connection_status: ConnectionStatus::NotConfigured,
            operator_name: None,
            operator_tin: None,
            left_lotteries: 0,
            last_sync: None,
        }
    }
}

// =============================================================================
// Source Document (host framework snapshot)
// =============================================================================

/// Reference to a host framework document (doctype + name).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DocumentRef {
    /// Host document type ("Sales Invoice", "POS Invoice").
    pub doctype: String,
    /// Host document name ("SINV-0001").
    pub name: String,
}

impl DocumentRef {
    pub fn new(doctype: impl Into<String>, name: impl Into<String>) -> Self {
        DocumentRef {
            doctype: doctype.into(),
            name: name.into(),
        }
    }
}

impl std::fmt::Display for DocumentRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.doctype, self.name)
    }
}

/// Strongly typed snapshot of an invoice-like host document.
///
/// Built by an adapter at the framework boundary; the payload builder
/// never does untyped field lookups.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceDocument {
    /// Which host document this snapshot came from.
    pub reference: DocumentRef,
    /// Customer display name.
    pub customer: String,
    /// Customer TIN; presence selects a B2B receipt.
    pub customer_tin: Option<String>,
    /// Customer registration number (company or personal).
    pub customer_regno: Option<String>,
    /// Consumer's eBarimt register number for lottery attribution (B2C).
    pub consumer_regno: Option<String>,
    /// Posting date; drives the reportMonth field.
    pub posting_date: NaiveDate,
    /// Grand total in möngö (VAT-inclusive).
    pub grand_total_mongo: i64,
    /// Line items.
    pub lines: Vec<DocumentLine>,
    /// Allocated payments; empty means "single default payment".
    pub payments: Vec<DocumentPayment>,
}

impl SourceDocument {
    /// Grand total as Money.
    #[inline]
    pub fn grand_total(&self) -> Money {
        Money::from_mongo(self.grand_total_mongo)
    }

    /// Bill type derived from the customer's tax identifier.
    pub fn bill_type(&self) -> BillType {
        match self.customer_tin.as_deref() {
            Some(tin) if !tin.trim().is_empty() => BillType::B2bReceipt,
            _ => BillType::B2cReceipt,
        }
    }
}

/// A line item row frozen at submission time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentLine {
    /// ERP item code.
    pub item_code: String,
    /// Display name shown on the receipt.
    pub item_name: String,
    /// GS1 classification code, if the item is mapped.
    pub classification_code: Option<String>,
    /// Product barcode (EAN-13, UPC-A, ...).
    pub barcode: Option<String>,
    /// Unit of measure; falls back to the eBarimt "piece" default.
    pub measure_unit: Option<String>,
    /// Quantity sold.
    pub qty: i64,
    /// Unit price in möngö (VAT-inclusive).
    pub unit_price_mongo: i64,
}

impl DocumentLine {
    /// Line total (unit price × quantity) as Money.
    #[inline]
    pub fn line_total(&self) -> Money {
        Money::from_mongo(self.unit_price_mongo) * self.qty
    }
}

/// An allocated payment row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentPayment {
    /// ERP mode-of-payment name; mapped via the payment type table.
    pub mode_of_payment: String,
    /// Allocated amount in möngö.
    pub amount_mongo: i64,
    /// Payment posting date.
    pub paid_on: NaiveDate,
}

// =============================================================================
// Receipt Log
// =============================================================================

/// One record per submission attempt for a source document.
///
/// ## Invariants
/// - a `Voided` record must previously have been `Success`
/// - a `Failed` record carries a non-empty `error_message`
/// - `receipt_id` is present iff status is `Success` or `Voided`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct ReceiptLog {
    /// Unique identifier (UUID v4).
    pub id: String,
    /// Source document type.
    pub doctype: String,
    /// Source document name.
    pub docname: String,
    /// Receipt variant submitted.
    pub bill_type: BillType,
    /// Lifecycle status.
    pub status: ReceiptStatus,
    /// Deployment the receipt was submitted to.
    pub environment: Environment,
    /// 33-digit DDTD receipt id assigned by the tax authority.
    pub receipt_id: Option<String>,
    /// Consumer lottery number (B2C success only).
    pub lottery_number: Option<String>,
    /// Opaque QR payload returned on success.
    pub qr_data: Option<String>,
    /// Failure reason (present on Failed).
    pub error_message: Option<String>,
    /// Total amount in möngö.
    pub total_amount_mongo: i64,
    /// VAT portion in möngö.
    pub vat_amount_mongo: i64,
    /// City tax portion in möngö.
    pub city_tax_mongo: i64,
    /// Customer TIN (B2B receipts).
    pub customer_tin: Option<String>,
    /// Number of submission attempts after the first.
    pub retry_count: i64,
    /// When the last retry ran.
    pub last_retry: Option<DateTime<Utc>>,
    /// When the record was created.
    pub created_at: DateTime<Utc>,
    /// When the record was last updated.
    pub updated_at: DateTime<Utc>,
}

impl ReceiptLog {
    /// Source document reference.
    pub fn reference(&self) -> DocumentRef {
        DocumentRef::new(self.doctype.clone(), self.docname.clone())
    }

    /// Checks the record's internal invariants.
    ///
    /// Used by tests and by the repository layer after transitions.
    pub fn invariants_hold(&self) -> bool {
        let id_ok = match self.status {
            ReceiptStatus::Success | ReceiptStatus::Voided => self.receipt_id.is_some(),
            _ => self.receipt_id.is_none(),
        };
        let msg_ok = match self.status {
            ReceiptStatus::Failed => self
                .error_message
                .as_deref()
                .map(|m| !m.trim().is_empty())
                .unwrap_or(false),
            _ => true,
        };
        id_ok && msg_ok
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
