//! # Receipt Payload Builder
//!
//! Pure function of (source document, product code table, payment type
//! table, settings) → receipt payload. No I/O.
//!
//! ## Determinism Contract
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Identical inputs ALWAYS produce an identical payload.                  │
//! │                                                                         │
//! │  The submit workflow's idempotency story depends on this: a retried    │
//! │  Submit for the same unchanged document produces the same request,     │
//! │  so the tax authority sees a duplicate rather than a new receipt.      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Field Derivation
//! - bill type: customer has a TIN → B2B_RECEIPT, otherwise B2C_RECEIPT
//! - per-line VAT/city tax: looked up from the product code table by the
//!   item's classification code; a missing mapping falls back to the
//!   STANDARD 10% rate and never fails the submission
//! - payments: mapped via the payment type table; an unmapped mode of
//!   payment falls back to OTHER

use std::collections::HashMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::money::Money;
use crate::types::{
    BillType, DocumentPayment, PaymentCode, PaymentTypeMapping, ProductCode, Settings,
    SourceDocument,
};
use crate::DEFAULT_MEASURE_UNIT;

// =============================================================================
// Wire Payload Types
// =============================================================================

/// The exact request body for the POS API's create-receipt endpoint.
///
/// Field names and shapes are defined by the tax authority; this crate
/// preserves them verbatim and adds no semantic reinterpretation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceiptPayload {
    /// Grand total, VAT-inclusive.
    #[serde(with = "decimal_tugrik")]
    pub amount: Money,
    /// Total VAT portion.
    #[serde(with = "decimal_tugrik")]
    pub vat: Money,
    /// Total city tax portion.
    #[serde(with = "decimal_tugrik")]
    pub city_tax: Money,
    /// District code (4 digits).
    pub district_code: String,
    /// Branch number within the merchant.
    pub branch_no: String,
    /// Receipt variant (B2C_RECEIPT / B2B_RECEIPT).
    pub bill_type: BillType,
    /// Line items.
    pub stocks: Vec<StockLine>,
    /// Payment lines.
    pub payments: Vec<PaymentLine>,
    /// Tax reporting month, YYYYMM.
    pub report_month: String,
    /// Customer TIN (B2B receipts only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_tin: Option<String>,
    /// Customer registration number (B2B, when known).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_regno: Option<String>,
    /// Consumer register number for lottery attribution (B2C, opt-in).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub register_no: Option<String>,
}

/// One line item as the POS API expects it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockLine {
    /// Item code (barcode when present, ERP item code otherwise).
    pub code: String,
    /// Display name.
    pub name: String,
    /// Unit of measure.
    pub measure_unit: String,
    /// Quantity.
    pub qty: i64,
    /// Unit price, VAT-inclusive.
    #[serde(with = "decimal_tugrik")]
    pub unit_price: Money,
    /// Line total.
    #[serde(with = "decimal_tugrik")]
    pub total_amount: Money,
    /// VAT portion of the line.
    #[serde(with = "decimal_tugrik")]
    pub vat: Money,
    /// City tax portion of the line.
    #[serde(with = "decimal_tugrik")]
    pub city_tax: Money,
    /// Product barcode.
    pub bar_code: String,
    /// Tax product code for ZERO/EXEMPT lines.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tax_product_code: Option<String>,
}

/// One payment line as the POS API expects it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentLine {
    /// Payment class wire code (CASH, PAYMENT_CARD, ...).
    pub code: String,
    /// Settlement status; always PAID for submitted invoices.
    pub status: String,
    /// Paid amount.
    #[serde(with = "decimal_tugrik")]
    pub paid_amount: Money,
    /// Payment date, yyyy-MM-dd.
    pub date: String,
}

/// Serializes Money as decimal tögrög (the only place integers leave
/// möngö space).
mod decimal_tugrik {
    use serde::{Deserialize, Deserializer, Serializer};

    use crate::money::Money;

    pub fn serialize<S: Serializer>(money: &Money, ser: S) -> Result<S::Ok, S::Error> {
        ser.serialize_f64(money.mongo() as f64 / 100.0)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(de: D) -> Result<Money, D::Error> {
        let value = f64::deserialize(de)?;
        Ok(Money::from_mongo((value * 100.0).round() as i64))
    }
}

// =============================================================================
// Builder
// =============================================================================

/// Builds the create-receipt payload for a source document.
///
/// ## Errors
/// `ValidationError` when the payload cannot be built (empty document,
/// missing district code, non-positive amounts). A validation failure
/// means submission was never attempted and no log record is written.
///
/// ## Guarantees
/// - missing product code mapping → STANDARD VAT fallback, never an error
/// - unmapped mode of payment → OTHER, never an error
/// - deterministic: identical inputs produce an identical payload
pub fn build_receipt_payload(
    doc: &SourceDocument,
    settings: &Settings,
    product_codes: &HashMap<String, ProductCode>,
    payment_types: &HashMap<String, PaymentTypeMapping>,
) -> Result<ReceiptPayload, ValidationError> {
    if doc.lines.is_empty() {
        return Err(ValidationError::EmptyDocument {
            reference: doc.reference.to_string(),
        });
    }
    if doc.grand_total_mongo <= 0 {
        return Err(ValidationError::NonPositiveAmount {
            field: "grand_total".to_string(),
            amount: doc.grand_total_mongo,
        });
    }
    let district_code = settings
        .district_code
        .as_deref()
        .filter(|c| !c.is_empty())
        .ok_or_else(|| ValidationError::Required {
            field: "district_code".to_string(),
        })?;

    let bill_type = doc.bill_type();
    if bill_type == BillType::B2bReceipt {
        // bill_type() only selects B2B when a non-blank TIN exists, but
        // the check also guards documents assembled by other adapters.
        let tin_ok = doc
            .customer_tin
            .as_deref()
            .map(|t| !t.trim().is_empty())
            .unwrap_or(false);
        if !tin_ok {
            return Err(ValidationError::MissingCustomerTin {
                reference: doc.reference.to_string(),
            });
        }
    }

    let mut stocks = Vec::with_capacity(doc.lines.len());
    let mut total_vat = Money::zero();
    let mut total_city_tax = Money::zero();

    for (index, line) in doc.lines.iter().enumerate() {
        if line.qty <= 0 {
            return Err(ValidationError::InvalidQuantity {
                reference: doc.reference.to_string(),
                index,
                qty: line.qty,
            });
        }

        let stock = build_stock_line(line, product_codes);
        total_vat += stock.vat;
        total_city_tax += stock.city_tax;
        stocks.push(stock);
    }

    let payments = build_payment_lines(doc, payment_types);

    Ok(ReceiptPayload {
        amount: doc.grand_total(),
        vat: total_vat,
        city_tax: total_city_tax,
        district_code: district_code.to_string(),
        branch_no: settings.branch_no.clone().unwrap_or_default(),
        bill_type,
        stocks,
        payments,
        report_month: doc.posting_date.format("%Y%m").to_string(),
        customer_tin: match bill_type {
            BillType::B2bReceipt => doc.customer_tin.clone(),
            BillType::B2cReceipt => None,
        },
        customer_regno: match bill_type {
            BillType::B2bReceipt => doc.customer_regno.clone(),
            BillType::B2cReceipt => None,
        },
        register_no: match bill_type {
            BillType::B2cReceipt => doc.consumer_regno.clone(),
            BillType::B2bReceipt => None,
        },
    })
}

/// Builds one stock line, deriving taxes from the product code table.
///
/// A line whose classification code is absent from the table gets the
/// STANDARD 10% treatment; a missing mapping must not fail the receipt.
fn build_stock_line(
    line: &crate::types::DocumentLine,
    product_codes: &HashMap<String, ProductCode>,
) -> StockLine {
    let mapping = line
        .classification_code
        .as_deref()
        .and_then(|code| product_codes.get(code));

    let (vat_bps, city_tax_bps, tax_product_code) = match mapping {
        Some(pc) => {
            // ZERO/EXEMPT lines must carry their classification code so
            // the authority can verify the exemption.
            let tax_code = if pc.vat_rate_bps() == 0 {
                Some(pc.classification_code.clone())
            } else {
                None
            };
            (pc.vat_rate_bps(), pc.city_tax_rate_bps(), tax_code)
        }
        None => (crate::STANDARD_VAT_BPS, 0, None),
    };

    let total = line.line_total();
    let vat = total.vat_from_gross(vat_bps);
    let net = total - vat;
    let city_tax = net.tax_at(city_tax_bps);
    let barcode = line.barcode.clone().unwrap_or_default();

    StockLine {
        code: if barcode.is_empty() {
            line.item_code.clone()
        } else {
            barcode.clone()
        },
        name: line.item_name.clone(),
        measure_unit: line
            .measure_unit
            .clone()
            .unwrap_or_else(|| DEFAULT_MEASURE_UNIT.to_string()),
        qty: line.qty,
        unit_price: Money::from_mongo(line.unit_price_mongo),
        total_amount: total,
        vat,
        city_tax,
        bar_code: barcode,
        tax_product_code,
    }
}

/// Builds payment lines from allocated payments, or a single cash line
/// covering the grand total when the document carries none.
fn build_payment_lines(
    doc: &SourceDocument,
    payment_types: &HashMap<String, PaymentTypeMapping>,
) -> Vec<PaymentLine> {
    if doc.payments.is_empty() {
        return vec![PaymentLine {
            code: PaymentCode::Cash.as_wire().to_string(),
            status: "PAID".to_string(),
            paid_amount: doc.grand_total(),
            date: doc.posting_date.format("%Y-%m-%d").to_string(),
        }];
    }

    doc.payments
        .iter()
        .map(|p| PaymentLine {
            code: payment_code_for(p, payment_types).as_wire().to_string(),
            status: "PAID".to_string(),
            paid_amount: Money::from_mongo(p.amount_mongo),
            date: p.paid_on.format("%Y-%m-%d").to_string(),
        })
        .collect()
}

/// Maps an ERP mode of payment; unmapped modes fall back to OTHER.
fn payment_code_for(
    payment: &DocumentPayment,
    payment_types: &HashMap<String, PaymentTypeMapping>,
) -> PaymentCode {
    payment_types
        .get(&payment.mode_of_payment)
        .map(|m| m.payment_code)
        .unwrap_or(PaymentCode::Other)
}

/// Formats a posting date as the tax reporting month (YYYYMM).
pub fn report_month(date: NaiveDate) -> String {
    date.format("%Y%m").to_string()
}

// =============================================================================
// Unit Tests
// =============================================================================
